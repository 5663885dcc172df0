use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_source() -> PathBuf {
    PathBuf::from("captures")
}

fn default_extra_key() -> String {
    "data".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CameraConfig {
    /// Image file, or directory of images cycled one per shot
    #[serde(default = "default_source")]
    pub source: PathBuf,
    /// Extra the image payload is stored under
    #[serde(default = "default_extra_key")]
    pub extra_key: String,
}

impl CameraConfig {
    pub(crate) fn apply_vars(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        if let Some(source) = var("SNAPLABEL_SOURCE") {
            self.source = PathBuf::from(source);
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            extra_key: default_extra_key(),
        }
    }
}
