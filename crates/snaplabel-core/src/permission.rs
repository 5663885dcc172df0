use snaplabel_types::{Capability, RequestId};

/// Grants runtime capabilities.
///
/// `request_grant` only issues the request. The answer comes back later as
/// `AppEvent::PermissionResult` carrying the same `request_id`.
#[async_trait::async_trait]
pub trait PermissionAuthority: Send + Sync {
    fn check_granted(&self, capability: Capability) -> bool;

    async fn request_grant(&self, capability: Capability, request_id: RequestId);
}
