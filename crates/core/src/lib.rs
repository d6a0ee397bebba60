//! Presentation state for the storefront: the scroll-depth scene, the
//! shopping cart, and the product catalog views.
//!
//! Everything here is host-independent. Browser and terminal hosts feed in
//! scroll offsets and clicks and apply the view models this crate returns.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod depth;

pub use cart::{CartError, CartStorage, CartStore, CartUpdate, StorageError, StorageNotice};
pub use catalog::{Catalog, CatalogError, CatalogLookup, TierFilter};
pub use config::{CartConfig, ConfigError, DepthConfig, StorefrontConfig};
pub use depth::{DepthEngine, ScrollThrottle};
