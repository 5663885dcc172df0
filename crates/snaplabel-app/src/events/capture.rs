use std::time::Instant;

use super::CaptureContext;

pub async fn handle_capture_press(ctx: &mut CaptureContext) -> anyhow::Result<()> {
    tracing::debug!(">>> [CAPTURE] Triggered");
    let start = Instant::now();

    ctx.controller.request_capture().await?;

    tracing::debug!(">>> [CAPTURE] Cycle finished in {:?}", start.elapsed());
    Ok(())
}
