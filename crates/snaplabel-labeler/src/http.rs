use async_trait::async_trait;
use image::{ExtendedColorType, ImageEncoder, codecs::png::PngEncoder};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use snaplabel_types::{CapturedImage, Label};

use crate::{ImageLabeler, LabelError, LabelerMetadata};

/// Labeling service reached over HTTP.
///
/// The image is POSTed as a PNG body; the service answers with
/// `{ "labels": [{ "text": .., "confidence": .. }], "error": null }`.
#[derive(Clone)]
pub struct HttpLabeler {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl HttpLabeler {
    pub fn new(endpoint: String, max_results: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            max_results,
        }
    }
}

#[derive(Deserialize)]
struct LabelResponse {
    #[serde(default)]
    labels: Vec<Label>,
    error: Option<String>,
}

impl LabelResponse {
    fn into_result(self) -> Result<Vec<Label>, LabelError> {
        if let Some(error) = self.error {
            return Err(LabelError::ServiceError(error));
        }
        if let Some(label) = self
            .labels
            .iter()
            .find(|label| !(0.0..=1.0).contains(&label.confidence))
        {
            return Err(LabelError::InvalidResponse(format!(
                "confidence {} for '{}' is outside [0, 1]",
                label.confidence, label.text
            )));
        }
        Ok(self.labels)
    }
}

#[async_trait]
impl ImageLabeler for HttpLabeler {
    async fn process(
        &self,
        image: &CapturedImage,
        rotation_degrees: u32,
    ) -> Result<Vec<Label>, LabelError> {
        let body = encode_png(image)?;
        tracing::debug!("POST {} ({} bytes)", self.endpoint, body.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "image/png")
            .query(&[
                ("rotation", rotation_degrees.to_string()),
                ("max_results", self.max_results.to_string()),
            ])
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LabelError::ServiceError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let parsed: LabelResponse = response
            .json()
            .await
            .map_err(|e| LabelError::InvalidResponse(e.to_string()))?;

        parsed.into_result()
    }

    fn metadata(&self) -> LabelerMetadata {
        LabelerMetadata {
            name: format!("http ({})", self.endpoint),
            on_device: false,
        }
    }
}

fn encode_png(image: &CapturedImage) -> Result<Vec<u8>, LabelError> {
    // The encoder panics on a size mismatch
    let expected = image.width as usize * image.height as usize * 4;
    if image.data.len() != expected {
        return Err(LabelError::InvalidImage(format!(
            "expected {} bytes for {}x{} RGBA, got {}",
            expected,
            image.width,
            image.height,
            image.data.len()
        )));
    }

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(
            &image.data,
            image.width,
            image.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| LabelError::InvalidImage(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_error_wins_over_labels() {
        let response: LabelResponse = serde_json::from_str(
            r#"{"labels": [{"text": "cat", "confidence": 0.5}], "error": "quota exceeded"}"#,
        )
        .unwrap();

        let err = response.into_result().unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_response_without_labels_is_empty() {
        let response: LabelResponse = serde_json::from_str(r#"{"error": null}"#).unwrap();
        assert!(response.into_result().unwrap().is_empty());
    }

    #[test]
    fn test_out_of_range_confidence_is_invalid() {
        for confidence in ["7.3", "-0.1"] {
            let response: LabelResponse = serde_json::from_str(&format!(
                r#"{{"labels": [{{"text": "cat", "confidence": 0.5}}, {{"text": "dog", "confidence": {confidence}}}]}}"#
            ))
            .unwrap();
            assert!(matches!(
                response.into_result(),
                Err(LabelError::InvalidResponse(_))
            ));
        }

        let response: LabelResponse = serde_json::from_str(
            r#"{"labels": [{"text": "sky", "confidence": 0.0}, {"text": "sea", "confidence": 1.0}]}"#,
        )
        .unwrap();
        assert_eq!(response.into_result().unwrap().len(), 2);
    }

    #[test]
    fn test_encode_png_rejects_short_buffer() {
        let image = CapturedImage {
            width: 4,
            height: 4,
            data: vec![0; 3],
        };
        assert!(matches!(
            encode_png(&image),
            Err(LabelError::InvalidImage(_))
        ));
    }
}
