pub mod cart;
pub mod catalog;
pub mod depth;
pub mod types;

pub use cart::{CartItem, CartLine, CartSummary};
pub use catalog::{Product, ProductCard, ProductDetail, Tier};
pub use depth::{DepthFrame, LayerStyle, WorldTransform};
pub use types::Money;
