use serde::{Deserialize, Serialize};

/// Visual parameters of one depth layer for a single scroll position.
///
/// Hosts apply these directly: `opacity` to the layer's opacity, `blur` as a
/// blur filter radius in pixels, and `interactive == false` as
/// `pointer-events: none`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub index: usize,
    /// Signed distance from the screen plane; positive means the layer has
    /// moved past the viewer.
    pub depth: f64,
    pub opacity: f64,
    pub blur: f64,
    pub interactive: bool,
}

/// Translation applied to the container holding every layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldTransform {
    pub translate_z: f64,
}

/// Everything a host needs to paint the depth scene for one scroll offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthFrame {
    pub world: WorldTransform,
    pub layers: Vec<LayerStyle>,
}

impl DepthFrame {
    /// Index of the front-most layer that still accepts pointer input.
    pub fn active_layer(&self) -> Option<usize> {
        self.layers
            .iter()
            .filter(|l| l.interactive)
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
            .map(|l| l.index)
    }
}
