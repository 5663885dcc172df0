//! End-to-end capture cycles through the event loop

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};
use kanal::{AsyncReceiver, AsyncSender};
use snaplabel_config::{Config, LabelerBackend, PermissionPolicy};
use snaplabel_types::{AppEvent, UiEvent};
use tokio::time::timeout;

use crate::events::event_loop;
use crate::state::AppState;

pub(super) fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_pixel(width, height, Rgb([12, 34, 56]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    std::fs::write(path, bytes).unwrap();
}

pub(super) fn config(dir: &Path, policy: PermissionPolicy) -> Config {
    let mut config = Config::default();
    config.camera.source = dir.join("shots");
    config.labeler.backend = LabelerBackend::Fixture;
    config.labeler.fixture_path = dir.join("labels.json");
    config.permission.policy = policy;
    config
}

pub(super) struct Harness {
    pub backend_tx: AsyncSender<AppEvent>,
    pub ui_rx: AsyncReceiver<AppEvent>,
    pub handle: tokio::task::JoinHandle<anyhow::Result<()>>,
}

pub(super) fn start(config: Config) -> Harness {
    let (backend_tx, backend_rx) = kanal::bounded_async(64);
    let (ui_tx, ui_rx) = kanal::bounded_async(64);
    let state = Arc::new(AppState::new(config));

    let handle = tokio::spawn(event_loop(state, backend_rx, ui_tx));
    Harness {
        backend_tx,
        ui_rx,
        handle,
    }
}

/// Next event the backend sent to the display, skipping readiness
pub(super) async fn next_ui(ui_rx: &AsyncReceiver<AppEvent>) -> AppEvent {
    loop {
        let event = timeout(Duration::from_secs(2), ui_rx.recv())
            .await
            .expect("timed out waiting for the display")
            .expect("display channel closed");
        if !matches!(event, AppEvent::BackendReady) {
            return event;
        }
    }
}

pub(super) async fn next_text(ui_rx: &AsyncReceiver<AppEvent>) -> String {
    match next_ui(ui_rx).await {
        AppEvent::ShowText(text) => text,
        other => panic!("expected text, got {:?}", other),
    }
}

pub(super) async fn close(harness: Harness) {
    harness
        .backend_tx
        .send(AppEvent::UiEvent(UiEvent::Close))
        .await
        .unwrap();
    assert!(matches!(
        next_ui(&harness.ui_rx).await,
        AppEvent::UiEvent(UiEvent::Close)
    ));
    timeout(Duration::from_secs(2), harness.handle)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_press_shows_image_then_top_label() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("shots")).unwrap();
    write_png(&dir.path().join("shots/pet.png"), 8, 6);
    std::fs::write(
        dir.path().join("labels.json"),
        r#"[{"text": "cat", "confidence": 0.40}, {"text": "dog", "confidence": 0.95}]"#,
    )
    .unwrap();

    let harness = start(config(dir.path(), PermissionPolicy::Granted));
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();

    match next_ui(&harness.ui_rx).await {
        AppEvent::ShowImage(image) => assert_eq!((image.width, image.height), (8, 6)),
        other => panic!("expected preview, got {:?}", other),
    }
    assert_eq!(
        next_text(&harness.ui_rx).await,
        "Label: dog\nConfidence: 95.00%"
    );

    close(harness).await;
}

#[tokio::test]
async fn test_missing_source_reports_no_camera() {
    let dir = tempfile::tempdir().unwrap();

    let harness = start(config(dir.path(), PermissionPolicy::Granted));
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();

    assert_eq!(next_text(&harness.ui_rx).await, "No camera app found");
    close(harness).await;
}

#[tokio::test]
async fn test_corrupt_shot_is_unable_to_capture() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("shots")).unwrap();
    std::fs::write(dir.path().join("shots/broken.png"), b"truncated").unwrap();

    let harness = start(config(dir.path(), PermissionPolicy::Granted));
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();

    assert_eq!(next_text(&harness.ui_rx).await, "Unable to capture image");
    close(harness).await;
}

#[tokio::test]
async fn test_labeler_failure_and_empty_result() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("shots")).unwrap();
    write_png(&dir.path().join("shots/a.png"), 2, 2);
    let labels = dir.path().join("labels.json");
    std::fs::write(&labels, r#"{"error": "model not downloaded"}"#).unwrap();

    let harness = start(config(dir.path(), PermissionPolicy::Granted));

    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();
    assert!(matches!(next_ui(&harness.ui_rx).await, AppEvent::ShowImage(_)));
    assert_eq!(
        next_text(&harness.ui_rx).await,
        "Labeling failed: model not downloaded"
    );

    // Not retried; the next press starts a fresh cycle
    std::fs::write(&labels, "[]").unwrap();
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();
    assert!(matches!(next_ui(&harness.ui_rx).await, AppEvent::ShowImage(_)));
    assert_eq!(next_text(&harness.ui_rx).await, "No labels found.");

    close(harness).await;
}

#[tokio::test]
async fn test_double_press_runs_cycles_back_to_back() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("shots")).unwrap();
    write_png(&dir.path().join("shots/1.png"), 3, 3);
    write_png(&dir.path().join("shots/2.png"), 4, 4);
    std::fs::write(
        dir.path().join("labels.json"),
        r#"[{"text": "Wall", "confidence": 0.5}]"#,
    )
    .unwrap();

    let harness = start(config(dir.path(), PermissionPolicy::Granted));
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();

    let mut sizes = Vec::new();
    for _ in 0..2 {
        match next_ui(&harness.ui_rx).await {
            AppEvent::ShowImage(image) => sizes.push(image.width),
            other => panic!("expected preview, got {:?}", other),
        }
        assert_eq!(
            next_text(&harness.ui_rx).await,
            "Label: Wall\nConfidence: 50.00%"
        );
    }
    assert_eq!(sizes, vec![3, 4]);

    close(harness).await;
}

#[tokio::test]
async fn test_custom_extra_key_reaches_labeler() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("shots")).unwrap();
    write_png(&dir.path().join("shots/a.png"), 5, 2);
    std::fs::write(
        dir.path().join("labels.json"),
        r#"[{"text": "Cup", "confidence": 0.625}]"#,
    )
    .unwrap();

    let mut config = config(dir.path(), PermissionPolicy::Granted);
    config.camera.extra_key = "photo".to_string();
    let harness = start(config);
    harness.backend_tx.send(AppEvent::CapturePressed).await.unwrap();

    match next_ui(&harness.ui_rx).await {
        AppEvent::ShowImage(image) => assert_eq!((image.width, image.height), (5, 2)),
        other => panic!("expected preview, got {:?}", other),
    }
    assert_eq!(
        next_text(&harness.ui_rx).await,
        "Label: Cup\nConfidence: 62.50%"
    );

    close(harness).await;
}
