use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_show_preview() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_show_preview")]
    pub show_preview: bool,
    /// Write each captured image here as PNG
    pub preview_path: Option<PathBuf>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_preview: default_show_preview(),
            preview_path: None,
        }
    }
}
