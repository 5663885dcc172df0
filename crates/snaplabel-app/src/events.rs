use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use snaplabel_capture::FileCamera;
use snaplabel_config::{Config, LabelerBackend};
use snaplabel_core::CaptureLabelController;
use snaplabel_labeler::{FixtureLabeler, HttpLabeler, ImageLabeler};
use snaplabel_types::{AppEvent, UiEvent};

use crate::permissions::TerminalPermissions;
use crate::state::AppState;

pub mod capture;
pub mod permission;

use capture::handle_capture_press;
use permission::{handle_permission_answer, handle_permission_result};

/// Collaborators owned by the event loop
pub struct CaptureContext {
    pub controller: CaptureLabelController,
    pub permissions: Arc<TerminalPermissions>,
}

impl CaptureContext {
    pub fn from_config(
        config: &Config,
        permission_tx: AsyncSender<AppEvent>,
        app_to_ui_tx: AsyncSender<AppEvent>,
    ) -> Self {
        let permissions = Arc::new(TerminalPermissions::new(
            config.permission.policy,
            permission_tx,
            app_to_ui_tx.clone(),
        ));
        let camera = Arc::new(
            FileCamera::new(config.camera.source.clone())
                .with_extra_key(config.camera.extra_key.clone()),
        );
        let labeler = build_labeler(config);
        tracing::info!("Labeler: {}", labeler.metadata());

        let controller =
            CaptureLabelController::new(permissions.clone(), camera, labeler, app_to_ui_tx)
                .with_extra_key(config.camera.extra_key.clone());

        Self {
            controller,
            permissions,
        }
    }
}

/// Created once and reused for every capture
pub fn build_labeler(config: &Config) -> Arc<dyn ImageLabeler> {
    match config.labeler.backend {
        LabelerBackend::Http => Arc::new(HttpLabeler::new(
            config.labeler.endpoint.clone(),
            config.labeler.max_results,
        )),
        LabelerBackend::Fixture => Arc::new(FixtureLabeler::new(
            config.labeler.fixture_path.clone(),
        )),
    }
}

/// App's main loop
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    // Permission results are raised from inside this loop, so they get their
    // own unbounded channel instead of queueing behind presses
    let (permission_tx, permission_rx) = kanal::unbounded_async();
    let mut ctx = CaptureContext::from_config(&state.config, permission_tx, app_to_ui_tx.clone());

    // Permission is checked once at startup, before the first press
    ctx.controller.ensure_permission().await;
    app_to_ui_tx.send(AppEvent::BackendReady).await?;

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            biased;
            Ok(event) = permission_rx.recv() => event,
            event = ui_to_app_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        tracing::debug!(
            "[EVENT_LOOP] Event received: {:?}",
            std::mem::discriminant(&event)
        );

        if !handle_events(&mut ctx, event).await? {
            let _ = app_to_ui_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;
            break;
        }
    }

    tracing::info!("[EVENT_LOOP] Stopped");
    Ok(())
}

/// Returns false once the app should stop
pub async fn handle_events(ctx: &mut CaptureContext, event: AppEvent) -> anyhow::Result<bool> {
    match event {
        AppEvent::CapturePressed => {
            handle_capture_press(ctx).await?;
        }
        AppEvent::PermissionResult {
            request_id,
            granted,
        } => {
            handle_permission_result(ctx, request_id, granted).await?;
        }
        AppEvent::PermissionAnswer(granted) => {
            handle_permission_answer(ctx, granted).await?;
        }
        AppEvent::UiEvent(UiEvent::Close) => {
            tracing::info!("Close requested");
            return Ok(false);
        }
        // UI-only events, ignore in backend
        AppEvent::PermissionPrompt { .. }
        | AppEvent::ShowText(_)
        | AppEvent::ShowImage(_)
        | AppEvent::BackendReady => {}
    }

    Ok(true)
}
