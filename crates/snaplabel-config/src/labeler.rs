use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LabelerBackend {
    /// POST the image to a labeling endpoint
    Http,
    /// Answer every request from a JSON file of labels
    Fixture,
}

fn default_backend() -> LabelerBackend {
    LabelerBackend::Fixture
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8765/v1/label".to_string()
}

fn default_fixture_path() -> PathBuf {
    PathBuf::from("labels.json")
}

fn default_max_results() -> usize {
    10
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LabelerConfig {
    #[serde(default = "default_backend")]
    pub backend: LabelerBackend,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_fixture_path")]
    pub fixture_path: PathBuf,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

impl LabelerConfig {
    /// A fixture path wins over a labeler URL when both are set
    pub(crate) fn apply_vars(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        if let Some(url) = var("SNAPLABEL_LABELER_URL") {
            self.backend = LabelerBackend::Http;
            self.endpoint = url;
        }

        if let Some(path) = var("SNAPLABEL_FIXTURE") {
            self.backend = LabelerBackend::Fixture;
            self.fixture_path = PathBuf::from(path);
        }
    }
}

impl Default for LabelerConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            endpoint: default_endpoint(),
            fixture_path: default_fixture_path(),
            max_results: default_max_results(),
        }
    }
}
