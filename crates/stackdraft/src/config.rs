//! Configuration types for stackdraft layout generation.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from an
//! external source (the CLI loads them from a TOML file). Fields that are
//! not set fall back to the documented defaults.

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout configuration.
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }
}

/// Geometric parameters of the banded layout.
///
/// All values are absolute drawing units (pixels for raster renderers).
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    /// Total drawing width.
    #[serde(default = "default_width")]
    width: f32,

    /// Total drawing height.
    #[serde(default = "default_height")]
    height: f32,

    /// Outer margin on all four sides.
    #[serde(default = "default_margin")]
    margin: f32,

    /// Horizontal spacing between adjacent layer bands.
    #[serde(default = "default_layer_spacing")]
    layer_spacing: f32,

    /// Vertical spacing between nodes within a band.
    #[serde(default = "default_node_spacing")]
    node_spacing: f32,
}

fn default_width() -> f32 {
    1200.0
}

fn default_height() -> f32 {
    800.0
}

fn default_margin() -> f32 {
    50.0
}

fn default_layer_spacing() -> f32 {
    40.0
}

fn default_node_spacing() -> f32 {
    90.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            margin: default_margin(),
            layer_spacing: default_layer_spacing(),
            node_spacing: default_node_spacing(),
        }
    }
}

impl LayoutConfig {
    /// Creates a new layout configuration.
    pub fn new(width: f32, height: f32, margin: f32, layer_spacing: f32, node_spacing: f32) -> Self {
        Self {
            width,
            height,
            margin,
            layer_spacing,
            node_spacing,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn layer_spacing(&self) -> f32 {
        self.layer_spacing
    }

    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }
}
