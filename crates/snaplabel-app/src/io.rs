use kanal::AsyncSender;
use snaplabel_types::{AppEvent, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Map one line of terminal input to the event it stands for
pub fn parse_command(line: &str) -> Option<AppEvent> {
    match line.trim().to_lowercase().as_str() {
        "" | "c" | "capture" => Some(AppEvent::CapturePressed),
        "y" | "yes" | "allow" => Some(AppEvent::PermissionAnswer(true)),
        "n" | "no" | "deny" => Some(AppEvent::PermissionAnswer(false)),
        "q" | "quit" | "exit" => Some(AppEvent::UiEvent(UiEvent::Close)),
        _ => None,
    }
}

/// Watcher for terminal input; stands in for the capture button
pub async fn input_io(
    cancel: CancellationToken,
    event_tx: AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tracing::info!("Listening for input on stdin");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = cancel.cancelled() => {
                tracing::info!("Input watcher stopping");
                break;
            }
        };

        let Some(line) = line else {
            tracing::info!("stdin closed");
            let _ = event_tx.send(AppEvent::UiEvent(UiEvent::Close)).await;
            break;
        };

        match parse_command(&line) {
            Some(event) => {
                let closing = matches!(event, AppEvent::UiEvent(UiEvent::Close));
                if let Err(e) = event_tx.send(event).await {
                    tracing::error!("Failed to send input to app: {}", e);
                    break;
                }
                if closing {
                    break;
                }
            }
            None => tracing::warn!("Unknown command '{}'", line.trim()),
        }
    }

    Ok(())
}
