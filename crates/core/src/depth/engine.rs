use storefront_protocol::{DepthFrame, LayerStyle, WorldTransform};
use tracing::debug;

use crate::config::{ConfigError, DepthConfig};

/// A stacked page section positioned along the scroll axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthLayer {
    pub index: usize,
    /// `-index * layer_spacing`; the first layer sits on the screen plane.
    pub initial_depth: f64,
}

/// Maps a scroll offset to per-layer opacity, blur and interactivity.
///
/// The layer set is fixed by [`DepthEngine::initialize`]; [`DepthEngine::on_scroll`]
/// is a pure function of the offset and may be called every frame.
#[derive(Debug, Clone)]
pub struct DepthEngine {
    config: DepthConfig,
    layers: Vec<DepthLayer>,
    track_length: f64,
}

impl DepthEngine {
    /// Build an engine with no layers. Rejects configs that fail
    /// [`DepthConfig::validate`].
    pub fn new(config: DepthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: DepthConfig) -> Self {
        Self {
            config,
            layers: Vec::new(),
            track_length: 0.0,
        }
    }

    pub fn config(&self) -> &DepthConfig {
        &self.config
    }

    pub fn layers(&self) -> &[DepthLayer] {
        &self.layers
    }

    /// Scrollable length needed for the last layer to reach the screen
    /// plane, as computed by the most recent `initialize`.
    pub fn track_length(&self) -> f64 {
        self.track_length
    }

    /// Position `layer_count` layers and return the scroll track length.
    ///
    /// Replaces any previous layer set, so calling it again with the same
    /// arguments leaves the engine unchanged.
    pub fn initialize(&mut self, layer_count: usize, viewport_height: f64) -> f64 {
        let spacing = self.config.layer_spacing;
        self.layers = (0..layer_count)
            .map(|index| DepthLayer {
                index,
                initial_depth: -(index as f64) * spacing,
            })
            .collect();

        let viewport_height = if viewport_height.is_finite() {
            viewport_height.max(0.0)
        } else {
            0.0
        };
        let travel = layer_count.saturating_sub(1) as f64 * spacing;
        self.track_length = travel + viewport_height;

        debug!(
            layer_count,
            viewport_height,
            track_length = self.track_length,
            "depth engine initialized"
        );
        self.track_length
    }

    /// Evaluate every layer for `scroll_offset`.
    ///
    /// NaN evaluates as `0`; infinities clamp to the largest finite offset so
    /// every frame serializes to plain numbers.
    pub fn on_scroll(&self, scroll_offset: f64) -> DepthFrame {
        let offset = if scroll_offset.is_nan() {
            0.0
        } else {
            scroll_offset.clamp(f64::MIN, f64::MAX)
        };

        DepthFrame {
            world: WorldTransform {
                translate_z: offset,
            },
            layers: self
                .layers
                .iter()
                .map(|layer| layer_style(&self.config, layer, offset))
                .collect(),
        }
    }
}

impl Default for DepthEngine {
    fn default() -> Self {
        Self::with_valid_config(DepthConfig::default())
    }
}

/// Style of a single layer at `offset`.
pub fn layer_style(config: &DepthConfig, layer: &DepthLayer, offset: f64) -> LayerStyle {
    let depth = layer.initial_depth + offset;

    let (opacity, blur) = if depth > config.fade_start {
        let progress =
            ((depth - config.fade_start) / (config.fade_end - config.fade_start)).clamp(0.0, 1.0);
        (1.0 - progress, progress * config.max_blur)
    } else {
        (1.0, 0.0)
    };

    LayerStyle {
        index: layer.index,
        depth,
        opacity,
        blur,
        interactive: opacity >= config.interactive_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(layers: usize) -> DepthEngine {
        let mut engine = DepthEngine::default();
        engine.initialize(layers, 800.0);
        engine
    }

    #[test]
    fn initial_depths_step_back_by_spacing() {
        let engine = engine(4);
        let depths: Vec<f64> = engine.layers().iter().map(|l| l.initial_depth).collect();
        assert_eq!(depths, vec![0.0, -1000.0, -2000.0, -3000.0]);
    }

    #[test]
    fn track_length_covers_last_layer_plus_viewport() {
        let mut engine = DepthEngine::default();
        assert_eq!(engine.initialize(5, 900.0), 4.0 * 1000.0 + 900.0);
        assert_eq!(engine.track_length(), 4900.0);
    }

    #[test]
    fn zero_layers_track_is_viewport_only() {
        let mut engine = DepthEngine::default();
        assert_eq!(engine.initialize(0, 720.0), 720.0);
        assert!(engine.on_scroll(300.0).layers.is_empty());
    }

    #[test]
    fn reinitialize_does_not_accumulate_layers() {
        let mut engine = engine(3);
        let first = engine.on_scroll(450.0);
        engine.initialize(3, 800.0);
        engine.initialize(3, 800.0);
        assert_eq!(engine.layers().len(), 3);
        assert_eq!(engine.on_scroll(450.0), first);
    }

    #[test]
    fn opening_state_is_fully_opaque() {
        let frame = engine(6).on_scroll(0.0);
        assert_eq!(frame.world.translate_z, 0.0);
        for layer in &frame.layers {
            assert_eq!(layer.opacity, 1.0);
            assert_eq!(layer.blur, 0.0);
            assert!(layer.interactive);
        }
    }

    #[test]
    fn halfway_through_fade() {
        // Layer 0 at depth 350: progress 0.5.
        let frame = engine(2).on_scroll(350.0);
        let front = frame.layers[0];
        assert_eq!(front.depth, 350.0);
        assert_eq!(front.opacity, 0.5);
        assert_eq!(front.blur, 10.0);
        assert!(front.interactive);

        let back = frame.layers[1];
        assert_eq!(back.depth, -650.0);
        assert_eq!(back.opacity, 1.0);
    }

    #[test]
    fn just_past_half_fade_stops_interaction() {
        let frame = engine(1).on_scroll(351.0);
        assert!(frame.layers[0].opacity < 0.5);
        assert!(!frame.layers[0].interactive);
    }

    #[test]
    fn huge_offsets_clamp() {
        let frame = engine(3).on_scroll(1.0e12);
        for layer in &frame.layers {
            assert_eq!(layer.opacity, 0.0);
            assert_eq!(layer.blur, 20.0);
            assert!(!layer.interactive);
        }

        let frame = engine(3).on_scroll(f64::INFINITY);
        assert!(frame.layers.iter().all(|l| l.opacity == 0.0 && l.blur == 20.0));
    }

    #[test]
    fn negative_offsets_keep_layers_opaque() {
        let frame = engine(3).on_scroll(-5000.0);
        assert!(frame.layers.iter().all(|l| l.opacity == 1.0 && l.blur == 0.0));
    }

    #[test]
    fn nan_offset_is_treated_as_zero() {
        let engine = engine(3);
        assert_eq!(engine.on_scroll(f64::NAN), engine.on_scroll(0.0));
    }

    #[test]
    fn custom_threshold_is_honoured() {
        let config = DepthConfig {
            interactive_threshold: 0.05,
            ..DepthConfig::default()
        };
        let mut engine = DepthEngine::new(config).unwrap();
        engine.initialize(1, 800.0);
        // progress 0.9 -> opacity ~0.1, still clickable with the lower threshold.
        let layer = engine.on_scroll(550.0).layers[0];
        assert!(layer.opacity > 0.05 && layer.opacity < 0.5);
        assert!(layer.interactive);
    }

    #[test]
    fn infinite_offsets_stay_finite() {
        let engine = engine(3);
        for offset in [f64::INFINITY, f64::NEG_INFINITY] {
            let frame = engine.on_scroll(offset);
            assert!(frame.world.translate_z.is_finite());
            assert!(frame.layers.iter().all(|l| l.depth.is_finite()));
            let json = serde_json::to_string(&frame).unwrap();
            assert!(!json.contains("null"), "{json}");
        }
        let far = engine.on_scroll(f64::INFINITY);
        assert!(far.layers.iter().all(|l| l.opacity == 0.0 && !l.interactive));
        let near = engine.on_scroll(f64::NEG_INFINITY);
        assert!(near.layers.iter().all(|l| l.opacity == 1.0 && l.interactive));
    }

    #[test]
    fn new_rejects_inverted_fade_range() {
        let config = DepthConfig {
            fade_start: 600.0,
            fade_end: 100.0,
            ..DepthConfig::default()
        };
        assert!(matches!(
            DepthEngine::new(config),
            Err(ConfigError::FadeRange { .. })
        ));
    }

    #[test]
    fn new_rejects_empty_fade_range() {
        let config = DepthConfig {
            fade_start: 300.0,
            fade_end: 300.0,
            ..DepthConfig::default()
        };
        assert!(matches!(
            DepthEngine::new(config),
            Err(ConfigError::FadeRange { .. })
        ));
    }
}
