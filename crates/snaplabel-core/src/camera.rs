use snaplabel_types::CaptureOutcome;

/// External capture flow, the equivalent of launching a camera activity
#[async_trait::async_trait]
pub trait Camera: Send + Sync {
    /// Whether a capture handler can be resolved on this host
    fn is_available(&self) -> bool;

    /// Run one capture flow. Resolves exactly once, with `Cancelled` on any failure.
    async fn capture(&self) -> CaptureOutcome;
}
