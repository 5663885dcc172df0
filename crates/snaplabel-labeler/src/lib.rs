use std::fmt;

use snaplabel_types::{CapturedImage, Label};

mod fixture;
mod http;

pub use fixture::FixtureLabeler;
pub use http::HttpLabeler;

/// Image labeling service interface
#[async_trait::async_trait]
pub trait ImageLabeler: Send + Sync {
    /// Label the image. `rotation_degrees` is an orientation hint, not a correction.
    async fn process(
        &self,
        image: &CapturedImage,
        rotation_degrees: u32,
    ) -> Result<Vec<Label>, LabelError>;

    /// Provider metadata
    fn metadata(&self) -> LabelerMetadata;
}

#[derive(Debug, Clone)]
pub struct LabelerMetadata {
    pub name: String,
    pub on_device: bool,
}

impl fmt::Display for LabelerMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let place = if self.on_device { "on device" } else { "remote" };
        write!(f, "{} ({})", self.name, place)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    #[error("{0}")]
    ServiceError(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("fixture error: {0}")]
    Fixture(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_names_where_labeling_runs() {
        let http = HttpLabeler::new("http://127.0.0.1:8765/v1/label".into(), 5);
        let fixture = FixtureLabeler::new("labels.json");

        assert_eq!(
            http.metadata().to_string(),
            "http (http://127.0.0.1:8765/v1/label) (remote)"
        );
        assert_eq!(fixture.metadata().to_string(), "fixture (on device)");
    }
}
