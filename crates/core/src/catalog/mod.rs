//! Read-only product catalog: lookup by id, tier filtering, and the grid and
//! detail view models built on top of it.

pub mod views;

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use storefront_protocol::{Product, Tier};
use thiserror::Error;

pub use views::{product_card, product_detail};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate product id `{0}`")]
    DuplicateId(String),
    #[error("unknown tier filter `{0}`")]
    UnknownFilter(String),
}

/// Resolves product ids to records. Missing ids are not an error.
pub trait CatalogLookup {
    fn product(&self, id: &str) -> Option<&Product>;
}

impl CatalogLookup for HashMap<String, Product> {
    fn product(&self, id: &str) -> Option<&Product> {
        self.get(id)
    }
}

/// Which tiers a product grid shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TierFilter {
    #[default]
    All,
    Signature,
    Essentials,
}

impl TierFilter {
    pub fn accepts(self, tier: Tier) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Signature => tier == Tier::Signature,
            TierFilter::Essentials => tier == Tier::Essentials,
        }
    }

    /// Pick the grid filter for a page path: the collections page shows the
    /// signature tier, the essentials page the essentials tier, anything
    /// else the full catalog.
    pub fn from_page_path(path: &str) -> Self {
        if path.contains("collections.html") {
            TierFilter::Signature
        } else if path.contains("essentials.html") {
            TierFilter::Essentials
        } else {
            TierFilter::All
        }
    }
}

impl FromStr for TierFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(TierFilter::All),
            "signature" => Ok(TierFilter::Signature),
            "essentials" => Ok(TierFilter::Essentials),
            other => Err(CatalogError::UnknownFilter(other.to_string())),
        }
    }
}

/// Products in display order with an id index.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter().enumerate() {
            if by_id.insert(product.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }
        Ok(Self { products, by_id })
    }

    /// Parse a JSON array of product records.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(text)?;
        Self::new(products)
    }

    /// The storefront's bundled print catalog.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn filter(&self, filter: TierFilter) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(move |p| filter.accepts(p.tier))
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

impl CatalogLookup for Catalog {
    fn product(&self, id: &str) -> Option<&Product> {
        self.by_id.get(id).and_then(|&idx| self.products.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use storefront_protocol::Money;

    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 9);
        let bridge = catalog.product("ls-002").unwrap();
        assert_eq!(bridge.price, Money::from_cents(18_000));
        assert_eq!(bridge.tier, Tier::Signature);
        assert_eq!(catalog.categories(), vec!["workspace", "living", "studio"]);
    }

    #[test]
    fn every_builtin_product_has_a_variant() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.products().iter().all(|p| !p.variants.is_empty()));
    }

    #[test]
    fn filter_by_tier() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.filter(TierFilter::Signature).count(), 5);
        assert_eq!(catalog.filter(TierFilter::Essentials).count(), 4);
        assert_eq!(catalog.filter(TierFilter::All).count(), 9);
    }

    #[test]
    fn filter_from_page_path() {
        assert_eq!(
            TierFilter::from_page_path("/shop/collections.html"),
            TierFilter::Signature
        );
        assert_eq!(
            TierFilter::from_page_path("/essentials.html"),
            TierFilter::Essentials
        );
        assert_eq!(TierFilter::from_page_path("/gallery.html"), TierFilter::All);
    }

    #[test]
    fn filter_from_str() {
        assert_eq!("Signature".parse::<TierFilter>().unwrap(), TierFilter::Signature);
        assert!(matches!(
            "premium".parse::<TierFilter>(),
            Err(CatalogError::UnknownFilter(_))
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let json = r#"[
            {"id": "a", "title": "A", "category": "c", "tier": "essentials", "price": 1},
            {"id": "a", "title": "B", "category": "c", "tier": "essentials", "price": 2}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn unknown_id_is_none() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.product("retired-print").is_none());
    }
}
