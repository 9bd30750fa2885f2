//! Editor configuration.

use fc_core::{BoxMetrics, Size};

/// Storage key the canvas has always saved under.
pub const DEFAULT_STORAGE_KEY: &str = "canvasData";

/// Configuration for a `CanvasSession`.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Key under which the JSON record form is stored.
    pub storage_key: String,

    /// Size given to images added without one (URL prompt, drops).
    /// Default: **100×100**.
    pub default_image_size: Size,

    /// Box estimates used for hit testing and link geometry.
    pub metrics: BoxMetrics,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_image_size: Size::new(100.0, 100.0),
            metrics: BoxMetrics::default(),
        }
    }
}
