pub mod engine;
pub mod throttle;

pub use engine::{DepthEngine, DepthLayer, layer_style};
pub use throttle::ScrollThrottle;
