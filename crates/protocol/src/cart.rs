use serde::{Deserialize, Serialize};

use crate::types::Money;

/// One persisted cart entry. Product data is looked up by `product_id` at
/// render time; the cart never copies titles or prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub variant: String,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, variant: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            variant: variant.into(),
            quantity,
        }
    }

    /// Whether this entry is the same `(product, variant)` pair.
    pub fn matches(&self, product_id: &str, variant: &str) -> bool {
        self.product_id == product_id && self.variant == variant
    }
}

/// A rendered cart row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Position in the cart; pass back to update/remove.
    pub index: usize,
    pub product_id: String,
    pub title: String,
    pub variant: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub line_total: Money,
    pub can_increment: bool,
    pub can_decrement: bool,
}

/// Summary shown next to the cart rows and in the header badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub item_count: u32,
    pub total: Money,
    pub total_label: String,
}
