use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Catalog classification. Affects presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Signature,
    Essentials,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Signature => "Signature Series",
            Tier::Essentials => "Essentials",
        }
    }

    /// CSS class hook used by the grid cards.
    pub fn css_class(self) -> &'static str {
        match self {
            Tier::Signature => "tier-signature",
            Tier::Essentials => "tier-essentials",
        }
    }
}

/// A product record as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tier: Tier,
    pub price: Money,
    #[serde(default)]
    pub specs: Vec<String>,
    #[serde(default)]
    pub eng_comment: Option<String>,
    /// Selectable options in display order: named finishes or color tokens.
    #[serde(default)]
    pub variants: Vec<String>,
}

/// A grid card for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub tier: Tier,
    pub tier_label: String,
    pub tier_class: String,
    pub price: Money,
    pub price_label: String,
    /// Only populated for signature products.
    pub specs: Vec<String>,
    pub eng_comment: Option<String>,
}

/// The product detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub card: ProductCard,
    pub variants: Vec<String>,
    pub default_variant: Option<String>,
}
