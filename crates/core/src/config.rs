//! Tunables for the depth scene and the cart, loadable from JSON.
//!
//! Every field has a default, so an empty document (`{}`) yields the stock
//! storefront behaviour.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("depth.{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("depth.layer_spacing must be positive, got {0}")]
    LayerSpacing(f64),
    #[error("depth.fade_start ({start}) must be less than depth.fade_end ({end})")]
    FadeRange { start: f64, end: f64 },
    #[error("depth.max_blur must not be negative, got {0}")]
    MaxBlur(f64),
    #[error("depth.interactive_threshold must be within [0, 1], got {0}")]
    InteractiveThreshold(f64),
    #[error("cart quantity range {min}..={max} is empty or starts at zero")]
    QuantityRange { min: u32, max: u32 },
    #[error("cart.storage_key must not be empty")]
    StorageKey,
}

/// Parameters of the scroll-depth effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Distance between consecutive layers along the scroll axis.
    pub layer_spacing: f64,
    /// Depth past which a layer starts fading out.
    pub fade_start: f64,
    /// Depth at which a layer is fully transparent.
    pub fade_end: f64,
    /// Blur radius at full fade.
    pub max_blur: f64,
    /// Layers below this opacity stop intercepting pointer input.
    pub interactive_threshold: f64,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            layer_spacing: 1000.0,
            fade_start: 100.0,
            fade_end: 600.0,
            max_blur: 20.0,
            interactive_threshold: 0.5,
        }
    }
}

impl DepthConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("layer_spacing", self.layer_spacing),
            ("fade_start", self.fade_start),
            ("fade_end", self.fade_end),
            ("max_blur", self.max_blur),
            ("interactive_threshold", self.interactive_threshold),
        ];
        if let Some((field, _)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }
        if self.layer_spacing <= 0.0 {
            return Err(ConfigError::LayerSpacing(self.layer_spacing));
        }
        if self.fade_start >= self.fade_end {
            return Err(ConfigError::FadeRange {
                start: self.fade_start,
                end: self.fade_end,
            });
        }
        if self.max_blur < 0.0 {
            return Err(ConfigError::MaxBlur(self.max_blur));
        }
        if !(0.0..=1.0).contains(&self.interactive_threshold) {
            return Err(ConfigError::InteractiveThreshold(
                self.interactive_threshold,
            ));
        }
        Ok(())
    }
}

/// Cart persistence and quantity limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Name of the storage slot holding the serialized cart.
    pub storage_key: String,
    pub min_quantity: u32,
    pub max_quantity: u32,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: "storefront.cart".to_string(),
            min_quantity: 1,
            max_quantity: 10,
        }
    }
}

impl CartConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_quantity == 0 || self.min_quantity > self.max_quantity {
            return Err(ConfigError::QuantityRange {
                min: self.min_quantity,
                max: self.max_quantity,
            });
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::StorageKey);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    pub depth: DepthConfig,
    pub cart: CartConfig,
}

impl StorefrontConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: StorefrontConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.depth.validate()?;
        self.cart.validate()
    }
}
