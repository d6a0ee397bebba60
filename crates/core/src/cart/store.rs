use std::fmt;

use storefront_protocol::{CartItem, CartLine, CartSummary, Money};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cart::storage::{CartStorage, StorageError};
use crate::catalog::CatalogLookup;
use crate::config::{CartConfig, ConfigError};

/// Rejected cart operations. The cart and its storage are untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be at least {min}, got {quantity}")]
    InvalidQuantity { quantity: u32, min: u32 },
    #[error("no cart item at index {index} (cart has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("quantity {requested} is outside {min}..={max}")]
    QuantityOutOfRange { requested: i64, min: u32, max: u32 },
}

/// A save that failed after the in-memory cart was already changed.
///
/// Hosts show this as a non-blocking message; the page keeps working with
/// the in-memory cart until storage recovers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageNotice {
    pub message: String,
}

impl fmt::Display for StorageNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    /// Sum of all quantities after the mutation, for the header badge.
    pub item_count: u32,
    /// Set when an add would have pushed a line past the maximum quantity.
    pub capped: bool,
    pub notice: Option<StorageNotice>,
}

/// Read the cart from `storage`.
///
/// Missing, unreadable or unparsable slots yield an empty cart. Parsed
/// records are normalized: zero quantities are dropped, the rest clamped into
/// the configured range, and duplicate `(product, variant)` pairs merged in
/// first-seen order.
pub fn load_cart<S: CartStorage + ?Sized>(storage: &S, config: &CartConfig) -> Vec<CartItem> {
    let raw = match storage.read(&config.storage_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key = %config.storage_key, error = %e, "cart storage unreadable, starting empty");
            return Vec::new();
        }
    };

    let records: Vec<CartItem> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(key = %config.storage_key, error = %e, "stored cart is corrupt, starting empty");
            return Vec::new();
        }
    };

    let mut items: Vec<CartItem> = Vec::with_capacity(records.len());
    for record in records {
        if record.quantity == 0 {
            continue;
        }
        match items
            .iter_mut()
            .find(|i| i.matches(&record.product_id, &record.variant))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(record.quantity);
            }
            None => items.push(record),
        }
    }
    for item in &mut items {
        item.quantity = item.quantity.clamp(config.min_quantity, config.max_quantity);
    }
    items
}

/// The shopping cart, persisted through an injected [`CartStorage`].
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    config: CartConfig,
    items: Vec<CartItem>,
}

impl<S: CartStorage> CartStore<S> {
    /// Open the cart, reading whatever the storage slot currently holds.
    ///
    /// Fails without touching storage if `config` does not validate.
    pub fn new(storage: S, config: CartConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let items = load_cart(&storage, &config);
        debug!(lines = items.len(), "cart opened");
        Ok(Self {
            storage,
            config,
            items,
        })
    }

    /// Re-read the cart from storage, replacing the in-memory copy.
    pub fn load(&mut self) -> &[CartItem] {
        self.items = load_cart(&self.storage, &self.config);
        &self.items
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity))
    }

    /// Add `quantity` of a product variant, merging with an existing line.
    pub fn add(
        &mut self,
        product_id: &str,
        variant: &str,
        quantity: u32,
    ) -> Result<CartUpdate, CartError> {
        if quantity < self.config.min_quantity {
            return Err(CartError::InvalidQuantity {
                quantity,
                min: self.config.min_quantity,
            });
        }

        let max = self.config.max_quantity;
        let capped = match self
            .items
            .iter_mut()
            .find(|i| i.matches(product_id, variant))
        {
            Some(existing) => {
                let wanted = existing.quantity.saturating_add(quantity);
                existing.quantity = wanted.min(max);
                wanted > max
            }
            None => {
                self.items
                    .push(CartItem::new(product_id, variant, quantity.min(max)));
                quantity > max
            }
        };

        debug!(product_id, variant, quantity, capped, "cart add");
        let mut update = self.persist();
        update.capped = capped;
        Ok(update)
    }

    /// [`add`](Self::add) with the default quantity of one.
    pub fn add_one(&mut self, product_id: &str, variant: &str) -> Result<CartUpdate, CartError> {
        self.add(product_id, variant, 1)
    }

    /// Apply `delta` to the line at `index`, rejecting results outside the
    /// configured quantity range.
    pub fn update_quantity(&mut self, index: usize, delta: i32) -> Result<CartUpdate, CartError> {
        let len = self.items.len();
        let (min, max) = (self.config.min_quantity, self.config.max_quantity);
        let item = self
            .items
            .get_mut(index)
            .ok_or(CartError::IndexOutOfRange { index, len })?;

        let requested = i64::from(item.quantity) + i64::from(delta);
        if requested < i64::from(min) || requested > i64::from(max) {
            return Err(CartError::QuantityOutOfRange {
                requested,
                min,
                max,
            });
        }
        item.quantity = requested as u32;

        debug!(index, delta, quantity = item.quantity, "cart quantity updated");
        Ok(self.persist())
    }

    /// Remove the line at `index`; later lines shift down by one.
    pub fn remove(&mut self, index: usize) -> Result<CartUpdate, CartError> {
        if index >= self.items.len() {
            return Err(CartError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        debug!(index, product_id = %removed.product_id, "cart line removed");
        Ok(self.persist())
    }

    pub fn clear(&mut self) -> CartUpdate {
        self.items.clear();
        debug!("cart cleared");
        self.persist()
    }

    /// Sum of unit price times quantity over lines whose product is known.
    pub fn compute_total<C: CatalogLookup + ?Sized>(&self, catalog: &C) -> Money {
        self.items
            .iter()
            .filter_map(|item| {
                catalog
                    .product(&item.product_id)
                    .map(|p| p.price.times(item.quantity))
            })
            .sum()
    }

    /// Rendered rows. Lines referencing unknown products are skipped but keep
    /// their original index so update/remove still address the right line.
    pub fn lines<C: CatalogLookup + ?Sized>(&self, catalog: &C) -> Vec<CartLine> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let product = catalog.product(&item.product_id)?;
                Some(CartLine {
                    index,
                    product_id: item.product_id.clone(),
                    title: product.title.clone(),
                    variant: item.variant.clone(),
                    quantity: item.quantity,
                    unit_price: product.price,
                    line_total: product.price.times(item.quantity),
                    can_increment: item.quantity < self.config.max_quantity,
                    can_decrement: item.quantity > self.config.min_quantity,
                })
            })
            .collect()
    }

    pub fn summary<C: CatalogLookup + ?Sized>(&self, catalog: &C) -> CartSummary {
        let total = self.compute_total(catalog);
        CartSummary {
            lines: self.lines(catalog),
            item_count: self.item_count(),
            total,
            total_label: total.to_string(),
        }
    }

    fn persist(&mut self) -> CartUpdate {
        let notice = match self.save() {
            Ok(()) => None,
            Err(e) => {
                warn!(key = %self.config.storage_key, error = %e, "failed to save cart");
                Some(StorageNotice {
                    message: format!("Your cart could not be saved ({e}); changes will be lost when you leave this page."),
                })
            }
        };
        CartUpdate {
            item_count: self.item_count(),
            capped: false,
            notice,
        }
    }

    fn save(&mut self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.items)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        self.storage.write(&self.config.storage_key, &payload)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use storefront_protocol::{Product, Tier};

    use super::*;
    use crate::cart::storage::MemoryStorage;

    const KEY: &str = "storefront.cart";

    fn product(id: &str, price: f64) -> Product {
        Product {
            id: id.to_string(),
            title: format!("{id} print"),
            category: "workspace".to_string(),
            tier: Tier::Signature,
            price: Money::from_decimal(price).unwrap(),
            specs: vec![],
            eng_comment: None,
            variants: vec!["#D4AF37".into(), "#C0C0C0".into()],
        }
    }

    fn catalog() -> HashMap<String, Product> {
        [product("k_turbine", 140.0), product("k_bridge", 180.0)]
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect()
    }

    fn store() -> CartStore<MemoryStorage> {
        CartStore::new(MemoryStorage::new(), CartConfig::default()).unwrap()
    }

    struct FailingStorage;

    impl CartStorage for FailingStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".into()))
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::QuotaExceeded)
        }
    }

    #[test]
    fn add_same_pair_merges() {
        let mut cart = store();
        cart.add("k_turbine", "#D4AF37", 1).unwrap();
        let update = cart.add("k_turbine", "#D4AF37", 2).unwrap();
        assert_eq!(cart.items(), &[CartItem::new("k_turbine", "#D4AF37", 3)]);
        assert_eq!(update.item_count, 3);
        assert!(update.notice.is_none());
    }

    #[test]
    fn different_variant_is_separate_line() {
        let mut cart = store();
        cart.add("k_turbine", "#D4AF37", 3).unwrap();
        cart.add("k_turbine", "#C0C0C0", 1).unwrap();
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[1].variant, "#C0C0C0");
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn add_zero_is_rejected() {
        let mut cart = store();
        assert_eq!(
            cart.add("k_turbine", "#D4AF37", 0),
            Err(CartError::InvalidQuantity {
                quantity: 0,
                min: 1
            })
        );
        assert!(cart.is_empty());
        assert!(cart.storage().get(KEY).is_none());
    }

    #[test]
    fn add_caps_at_max_quantity() {
        let mut cart = store();
        cart.add("k_turbine", "#D4AF37", 8).unwrap();
        let update = cart.add("k_turbine", "#D4AF37", 5).unwrap();
        assert!(update.capped);
        assert_eq!(cart.items()[0].quantity, 10);
    }

    #[test]
    fn add_persists_camel_case_records() {
        let mut cart = store();
        cart.add_one("k_turbine", "#D4AF37").unwrap();
        assert_eq!(
            cart.storage().get(KEY),
            Some(r##"[{"productId":"k_turbine","variant":"#D4AF37","quantity":1}]"##)
        );
    }

    #[test]
    fn update_quantity_within_range() {
        let mut cart = store();
        cart.add("k_turbine", "#D4AF37", 2).unwrap();
        let update = cart.update_quantity(0, 1).unwrap();
        assert_eq!(update.item_count, 3);
        let update = cart.update_quantity(0, -1).unwrap();
        assert_eq!(update.item_count, 2);
    }

    #[test]
    fn update_quantity_rejects_zero_and_eleven() {
        let mut cart = store();
        cart.add("k_turbine", "#D4AF37", 1).unwrap();
        cart.add("k_bridge", "Matte", 10).unwrap();
        let before = cart.storage().get(KEY).map(str::to_string);

        assert_eq!(
            cart.update_quantity(0, -1),
            Err(CartError::QuantityOutOfRange {
                requested: 0,
                min: 1,
                max: 10
            })
        );
        assert!(matches!(
            cart.update_quantity(1, 1),
            Err(CartError::QuantityOutOfRange { requested: 11, .. })
        ));

        assert_eq!(cart.storage().get(KEY).map(str::to_string), before);
        let reloaded = cart.load().to_vec();
        assert_eq!(reloaded[0].quantity, 1);
        assert_eq!(reloaded[1].quantity, 10);
    }

    #[test]
    fn update_quantity_bad_index() {
        let mut cart = store();
        assert_eq!(
            cart.update_quantity(2, 1),
            Err(CartError::IndexOutOfRange { index: 2, len: 0 })
        );
    }

    #[test]
    fn remove_shifts_following_lines() {
        let mut cart = store();
        cart.add("a", "x", 1).unwrap();
        cart.add("b", "x", 2).unwrap();
        cart.add("c", "x", 3).unwrap();

        let update = cart.remove(1).unwrap();
        assert_eq!(update.item_count, 4);
        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        assert!(matches!(
            cart.remove(2),
            Err(CartError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn total_skips_unknown_products() {
        let mut cart = store();
        cart.add("deleted-print", "#000000", 4).unwrap();
        cart.add("k_bridge", "#C0C0C0", 2).unwrap();
        let total = cart.compute_total(&catalog());
        assert_eq!(total, Money::from_cents(36_000));
        assert_eq!(total.to_string(), "$360.00");
    }

    #[test]
    fn lines_keep_original_index() {
        let mut cart = store();
        cart.add("deleted-print", "#000000", 1).unwrap();
        cart.add("k_turbine", "#D4AF37", 10).unwrap();
        let lines = cart.lines(&catalog());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].index, 1);
        assert_eq!(lines[0].line_total, Money::from_cents(140_000));
        assert!(!lines[0].can_increment);
        assert!(lines[0].can_decrement);
    }

    #[test]
    fn summary_counts_stale_items_in_badge() {
        let mut cart = store();
        cart.add("deleted-print", "#000000", 2).unwrap();
        cart.add("k_turbine", "#D4AF37", 1).unwrap();
        let summary = cart.summary(&catalog());
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.total_label, "$140.00");
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        let storage = MemoryStorage::new().with_slot(KEY, "{not json");
        let cart = CartStore::new(storage, CartConfig::default()).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn load_normalizes_records() {
        let payload = r#"[
            {"productId": "a", "variant": "x", "quantity": 4},
            {"productId": "b", "variant": "x", "quantity": 0},
            {"productId": "a", "variant": "x", "quantity": 9},
            {"productId": "c", "variant": "y", "quantity": 2}
        ]"#;
        let storage = MemoryStorage::new().with_slot(KEY, payload);
        let items = load_cart(&storage, &CartConfig::default());
        assert_eq!(
            items,
            vec![CartItem::new("a", "x", 10), CartItem::new("c", "y", 2)]
        );
    }

    #[test]
    fn write_failure_becomes_notice() {
        let mut cart = CartStore::new(FailingStorage, CartConfig::default()).unwrap();
        assert!(cart.is_empty());
        let update = cart.add("k_turbine", "#D4AF37", 2).unwrap();
        assert_eq!(update.item_count, 2);
        let notice = update.notice.unwrap();
        assert!(notice.message.contains("quota"));
        // The in-memory cart still reflects the change.
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn clear_empties_and_persists() {
        let mut cart = store();
        cart.add("a", "x", 2).unwrap();
        let update = cart.clear();
        assert_eq!(update.item_count, 0);
        assert_eq!(cart.storage().get(KEY), Some("[]"));
    }

    #[test]
    fn new_rejects_zero_max_quantity() {
        let config = CartConfig {
            max_quantity: 0,
            ..CartConfig::default()
        };
        assert!(matches!(
            CartStore::new(MemoryStorage::new(), config),
            Err(ConfigError::QuantityRange { min: 1, max: 0 })
        ));
    }

    #[test]
    fn new_rejects_empty_storage_key() {
        let config = CartConfig {
            storage_key: "  ".to_string(),
            ..CartConfig::default()
        };
        assert!(matches!(
            CartStore::new(MemoryStorage::new(), config),
            Err(ConfigError::StorageKey)
        ));
    }
}
