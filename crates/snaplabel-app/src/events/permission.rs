use snaplabel_types::RequestId;

use super::CaptureContext;

pub async fn handle_permission_result(
    ctx: &CaptureContext,
    request_id: RequestId,
    granted: bool,
) -> anyhow::Result<()> {
    tracing::debug!(">>> [PERMISSION] Request {} granted: {}", request_id, granted);
    ctx.controller
        .on_permission_result(request_id, granted)
        .await?;
    Ok(())
}

/// The user answered the prompt on the terminal
pub async fn handle_permission_answer(ctx: &CaptureContext, granted: bool) -> anyhow::Result<()> {
    match ctx.permissions.answer(granted) {
        Some(request_id) => handle_permission_result(ctx, request_id, granted).await,
        None => {
            tracing::debug!("Permission answer with no pending request, ignoring");
            Ok(())
        }
    }
}
