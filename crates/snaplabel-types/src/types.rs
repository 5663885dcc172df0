use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Request code used for the camera permission request
pub const CAMERA_REQUEST_CODE: RequestId = 1;

/// Extra under which the camera stores the encoded image
pub const IMAGE_EXTRA: &str = "data";

pub type RequestId = u32;

#[derive(Debug, Clone)]
pub enum AppEvent {
    UiEvent(UiEvent),
    /// The capture control was pressed
    CapturePressed,
    PermissionResult {
        request_id: RequestId,
        granted: bool,
    },
    /// Ask the user to answer a pending permission request
    PermissionPrompt {
        request_id: RequestId,
        capability: Capability,
    },
    PermissionAnswer(bool),
    ShowText(String),
    ShowImage(CapturedImage),
    BackendReady,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Camera,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Camera => write!(f, "camera"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureCode {
    Ok,
    Cancelled,
}

/// What the camera hands back once the capture flow returns
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub code: CaptureCode,
    pub extras: Option<HashMap<String, Vec<u8>>>,
}

impl CaptureOutcome {
    pub fn ok(image_bytes: Vec<u8>) -> Self {
        Self::ok_with_extra(IMAGE_EXTRA, image_bytes)
    }

    /// Successful capture with the image stored under `key`
    pub fn ok_with_extra(key: impl Into<String>, image_bytes: Vec<u8>) -> Self {
        let mut extras = HashMap::new();
        extras.insert(key.into(), image_bytes);
        Self {
            code: CaptureCode::Ok,
            extras: Some(extras),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            code: CaptureCode::Cancelled,
            extras: None,
        }
    }

    /// Raw bytes stored under `key`, if any
    pub fn extra(&self, key: &str) -> Option<&[u8]> {
        self.extras
            .as_ref()
            .and_then(|extras| extras.get(key))
            .map(Vec::as_slice)
    }
}

/// Decoded RGBA8 raster
#[derive(Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl fmt::Debug for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub confidence: f32,
}

impl Label {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}
