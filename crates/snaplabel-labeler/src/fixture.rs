use std::path::{Path, PathBuf};

use async_trait::async_trait;
use snaplabel_types::{CapturedImage, Label};

use crate::{ImageLabeler, LabelError, LabelerMetadata};

/// Answers every request with the labels stored in a JSON file.
///
/// The file holds either a list of labels or `{ "error": "..." }`, which is
/// reported as a service failure. It is re-read per request so edits take
/// effect on the next capture.
pub struct FixtureLabeler {
    path: PathBuf,
}

impl FixtureLabeler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    Labels(Vec<Label>),
    Failure { error: String },
}

#[async_trait]
impl ImageLabeler for FixtureLabeler {
    async fn process(
        &self,
        image: &CapturedImage,
        rotation_degrees: u32,
    ) -> Result<Vec<Label>, LabelError> {
        tracing::debug!(
            "fixture labeler: {}x{} image, rotation {}",
            image.width,
            image.height,
            rotation_degrees
        );

        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LabelError::Fixture(format!("{}: {}", self.path.display(), e)))?;

        match serde_json::from_str::<FixtureFile>(&raw)
            .map_err(|e| LabelError::Fixture(format!("{}: {}", self.path.display(), e)))?
        {
            FixtureFile::Labels(labels) => Ok(labels),
            FixtureFile::Failure { error } => Err(LabelError::ServiceError(error)),
        }
    }

    fn metadata(&self) -> LabelerMetadata {
        LabelerMetadata {
            name: "fixture".to_string(),
            on_device: true,
        }
    }
}
