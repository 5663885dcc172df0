use std::sync::Arc;

use kanal::AsyncSender;
use snaplabel_labeler::ImageLabeler;
use snaplabel_types::{
    AppEvent, CAMERA_REQUEST_CODE, Capability, CaptureCode, CaptureOutcome, CapturedImage,
    IMAGE_EXTRA, RequestId,
};

use crate::camera::Camera;
use crate::decode::decode_image;
use crate::error::{ControllerError, CycleError};
use crate::permission::PermissionAuthority;
use crate::render::render_labels;
use crate::session::CaptureSession;

/// Orientation hint sent with every image. Sensor rotation is never corrected.
pub const ROTATION_DEGREES: u32 = 0;

/// Drives one capture-label cycle at a time and projects the outcome onto
/// the display surface behind `ui_tx`.
///
/// Every failure ends the cycle as a text update. The only error returned is
/// the display surface going away.
pub struct CaptureLabelController {
    permissions: Arc<dyn PermissionAuthority>,
    camera: Arc<dyn Camera>,
    labeler: Arc<dyn ImageLabeler>,
    ui_tx: AsyncSender<AppEvent>,
    extra_key: String,
    session: Option<CaptureSession>,
    cycles: u64,
}

impl CaptureLabelController {
    pub fn new(
        permissions: Arc<dyn PermissionAuthority>,
        camera: Arc<dyn Camera>,
        labeler: Arc<dyn ImageLabeler>,
        ui_tx: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            permissions,
            camera,
            labeler,
            ui_tx,
            extra_key: IMAGE_EXTRA.to_string(),
            session: None,
            cycles: 0,
        }
    }

    /// Read the image payload from a different extra
    pub fn with_extra_key(mut self, key: impl Into<String>) -> Self {
        self.extra_key = key.into();
        self
    }

    /// The most recent successful capture
    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub async fn ensure_permission(&self) {
        if self.permissions.check_granted(Capability::Camera) {
            tracing::debug!("Camera permission already granted");
            return;
        }

        tracing::info!("Requesting camera permission (request {})", CAMERA_REQUEST_CODE);
        self.permissions
            .request_grant(Capability::Camera, CAMERA_REQUEST_CODE)
            .await;
    }

    /// Granting has no visible effect; capture waits for the next press.
    pub async fn on_permission_result(
        &self,
        request_id: RequestId,
        granted: bool,
    ) -> Result<(), ControllerError> {
        if request_id != CAMERA_REQUEST_CODE {
            tracing::warn!("Ignoring result for unknown permission request {}", request_id);
            return Ok(());
        }

        if granted {
            tracing::info!("Camera permission granted");
            return Ok(());
        }

        self.fail(CycleError::PermissionDenied).await
    }

    /// Start a cycle from the capture control
    pub async fn request_capture(&mut self) -> Result<(), ControllerError> {
        if !self.permissions.check_granted(Capability::Camera) {
            self.fail(CycleError::PermissionDenied).await?;
            self.ensure_permission().await;
            return Ok(());
        }

        if !self.camera.is_available() {
            return self.fail(CycleError::NoCameraAvailable).await;
        }

        tracing::debug!("Launching capture");
        let outcome = self.camera.capture().await;
        self.on_capture_result(outcome).await
    }

    pub async fn on_capture_result(
        &mut self,
        outcome: CaptureOutcome,
    ) -> Result<(), ControllerError> {
        let image = match self.accept_capture(&outcome) {
            Ok(image) => image,
            Err(e) => return self.fail(e).await,
        };

        self.cycles += 1;
        tracing::info!(
            "Capture {}: {}x{} image",
            self.cycles,
            image.width,
            image.height
        );

        self.ui_tx.send(AppEvent::ShowImage(image.clone())).await?;
        self.session = Some(CaptureSession::new(self.cycles, image));

        match &self.session {
            Some(session) => self.label_image(&session.image).await,
            None => Ok(()),
        }
    }

    pub async fn label_image(&self, image: &CapturedImage) -> Result<(), ControllerError> {
        let text = match self.classify(image).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Labeling ended without a label: {}", e);
                e.to_string()
            }
        };

        self.show_text(text).await
    }

    fn accept_capture(&self, outcome: &CaptureOutcome) -> Result<CapturedImage, CycleError> {
        if outcome.code != CaptureCode::Ok {
            return Err(CycleError::CaptureCancelledOrFailed);
        }

        outcome
            .extra(&self.extra_key)
            .and_then(decode_image)
            .ok_or(CycleError::NoImageDecoded)
    }

    async fn classify(&self, image: &CapturedImage) -> Result<String, CycleError> {
        let labels = self.labeler.process(image, ROTATION_DEGREES).await?;
        tracing::debug!("Labeler returned {} labels", labels.len());
        render_labels(&labels)
    }

    async fn fail(&self, error: CycleError) -> Result<(), ControllerError> {
        tracing::warn!("Capture cycle failed: {:?}", error);
        self.show_text(error.to_string()).await
    }

    async fn show_text(&self, text: String) -> Result<(), ControllerError> {
        self.ui_tx.send(AppEvent::ShowText(text)).await?;
        Ok(())
    }
}
