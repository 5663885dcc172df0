use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use kanal::AsyncSender;
use snaplabel_config::PermissionPolicy;
use snaplabel_core::PermissionAuthority;
use snaplabel_types::{AppEvent, Capability, RequestId};

/// Permission authority for the terminal build.
///
/// `granted`/`denied` policies answer immediately on the results channel,
/// which must be unbounded: the event loop both issues requests and drains
/// their results. `prompt` asks on the display surface and waits for the
/// user's answer, which comes back through [`TerminalPermissions::answer`].
pub struct TerminalPermissions {
    policy: PermissionPolicy,
    granted: AtomicBool,
    pending: Mutex<Option<RequestId>>,
    results_tx: AsyncSender<AppEvent>,
    ui_tx: AsyncSender<AppEvent>,
}

impl TerminalPermissions {
    pub fn new(
        policy: PermissionPolicy,
        results_tx: AsyncSender<AppEvent>,
        ui_tx: AsyncSender<AppEvent>,
    ) -> Self {
        Self {
            policy,
            granted: AtomicBool::new(policy == PermissionPolicy::Granted),
            pending: Mutex::new(None),
            results_tx,
            ui_tx,
        }
    }

    /// Resolve the pending prompt. Returns the request it answered, if any.
    pub fn answer(&self, granted: bool) -> Option<RequestId> {
        let request_id = match self.pending.lock() {
            Ok(mut pending) => pending.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }?;

        self.granted.store(granted, Ordering::SeqCst);
        Some(request_id)
    }

    async fn deliver(&self, request_id: RequestId, granted: bool) {
        self.granted.store(granted, Ordering::SeqCst);
        if let Err(e) = self
            .results_tx
            .send(AppEvent::PermissionResult {
                request_id,
                granted,
            })
            .await
        {
            tracing::error!("Failed to deliver permission result: {}", e);
        }
    }
}

#[async_trait::async_trait]
impl PermissionAuthority for TerminalPermissions {
    fn check_granted(&self, _capability: Capability) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_grant(&self, capability: Capability, request_id: RequestId) {
        match self.policy {
            PermissionPolicy::Granted => self.deliver(request_id, true).await,
            PermissionPolicy::Denied => self.deliver(request_id, false).await,
            PermissionPolicy::Prompt => {
                match self.pending.lock() {
                    Ok(mut pending) => *pending = Some(request_id),
                    Err(poisoned) => *poisoned.into_inner() = Some(request_id),
                }

                tracing::debug!("Prompting for {} permission ({})", capability, request_id);
                if let Err(e) = self
                    .ui_tx
                    .send(AppEvent::PermissionPrompt {
                        request_id,
                        capability,
                    })
                    .await
                {
                    tracing::error!("Failed to show permission prompt: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_denied_policy_delivers_result() {
        let (results_tx, results_rx) = kanal::unbounded_async();
        let (ui_tx, ui_rx) = kanal::unbounded_async();
        let permissions = TerminalPermissions::new(PermissionPolicy::Denied, results_tx, ui_tx);

        assert!(!permissions.check_granted(Capability::Camera));
        permissions.request_grant(Capability::Camera, 1).await;

        match results_rx.try_recv() {
            Ok(Some(AppEvent::PermissionResult {
                request_id: 1,
                granted: false,
            })) => {}
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(ui_rx.try_recv(), Ok(None)));
    }

    #[tokio::test]
    async fn test_granted_policy_starts_granted() {
        let (results_tx, _results_rx) = kanal::unbounded_async();
        let (ui_tx, _ui_rx) = kanal::unbounded_async();
        let permissions = TerminalPermissions::new(PermissionPolicy::Granted, results_tx, ui_tx);

        assert!(permissions.check_granted(Capability::Camera));
    }

    #[tokio::test]
    async fn test_prompt_waits_for_answer() {
        let (results_tx, results_rx) = kanal::unbounded_async();
        let (ui_tx, ui_rx) = kanal::unbounded_async();
        let permissions = TerminalPermissions::new(PermissionPolicy::Prompt, results_tx, ui_tx);

        assert_eq!(permissions.answer(true), None);

        permissions.request_grant(Capability::Camera, 1).await;
        assert!(matches!(
            ui_rx.try_recv(),
            Ok(Some(AppEvent::PermissionPrompt { request_id: 1, .. }))
        ));
        assert!(matches!(results_rx.try_recv(), Ok(None)));
        assert!(!permissions.check_granted(Capability::Camera));

        assert_eq!(permissions.answer(true), Some(1));
        assert!(permissions.check_granted(Capability::Camera));
        assert_eq!(permissions.answer(false), None);
    }
}
