//! Preview configuration and errors
//!
//! Both preview binaries read an optional TOML/RON config path from the
//! command line; everything has defaults so they also run bare.

use serde::{Deserialize, Serialize};
use shading_math::config::{Config, ConfigError};
use shading_math::parallax::ParallaxSettings;
use shading_math::sampling::TextureError;
use thiserror::Error;

/// Settings for the preview renders
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Dual-Kawase pyramid depth for the blur preview
    pub blur_passes: u32,
    /// Exposure applied before gamma correction
    pub exposure: f32,
    /// Display gamma
    pub gamma: f32,
    /// Parallax march settings for the scene floor
    pub parallax: ParallaxSettings,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 360,
            blur_passes: 3,
            exposure: 1.0,
            gamma: 2.2,
            parallax: ParallaxSettings::default(),
        }
    }
}

impl Config for PreviewConfig {}

impl PreviewConfig {
    /// Load from the first command-line argument, or fall back to defaults
    pub fn from_args() -> Result<Self, PreviewError> {
        match std::env::args().nth(1) {
            Some(path) => {
                log::info!("loading config from {}", path);
                Ok(Self::load_from_file(&path)?)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Preview-level errors
#[derive(Error, Debug)]
pub enum PreviewError {
    /// Config loading failed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Texture construction failed
    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    /// Image encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
