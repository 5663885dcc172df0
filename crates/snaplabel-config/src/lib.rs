use std::env;

use serde::{Deserialize, Serialize};

use self::camera::CameraConfig;
use self::labeler::LabelerConfig;
use self::permission::PermissionConfig;
use self::ui::UiConfig;

pub mod camera;
pub mod labeler;
pub mod permission;
pub mod ui;

pub use labeler::LabelerBackend;
pub use permission::PermissionPolicy;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub labeler: LabelerConfig,
    pub permission: PermissionConfig,
    pub ui: UiConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Overlay the `SNAPLABEL_*` environment variables on a loaded config
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| env::var(key).ok());
    }

    pub fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        self.camera.apply_vars(&var);
        self.labeler.apply_vars(&var);
        self.permission.apply_vars(&var);
    }
}
