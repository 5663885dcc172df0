use snaplabel_labeler::LabelError;

/// Everything that can end a capture cycle early.
///
/// The `Display` text is exactly what the user sees.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Camera permission is required to capture images.")]
    PermissionDenied,

    #[error("Failed to capture image")]
    CaptureCancelledOrFailed,

    #[error("No camera app found")]
    NoCameraAvailable,

    #[error("Unable to capture image")]
    NoImageDecoded,

    #[error("Labeling failed: {0}")]
    LabelingServiceError(#[from] LabelError),

    #[error("No labels found.")]
    NoLabelsFound,
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error("display surface closed: {0}")]
    SurfaceClosed(#[from] kanal::SendError),
}
