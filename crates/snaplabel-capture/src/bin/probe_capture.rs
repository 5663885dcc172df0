//! Capture smoke test - run with: cargo run -p snaplabel-capture --bin probe_capture -- <source>

use anyhow::{Context, Result};
use snaplabel_core::Camera;
use snaplabel_core::decode::decode_image;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    let source = std::env::args()
        .nth(1)
        .context("usage: probe_capture <image file or directory>")?;
    let camera = snaplabel_capture::FileCamera::new(&source);

    tracing::info!("Source: {}", camera.source().display());
    if !camera.is_available() {
        anyhow::bail!("No camera app found for {}", source);
    }

    let start = std::time::Instant::now();
    let outcome = camera.capture().await;
    tracing::info!("Capture returned {:?} in {:?}", outcome.code, start.elapsed());

    let bytes = outcome
        .extra(camera.extra_key())
        .context("Capture returned no image payload")?;
    let image = decode_image(bytes).context("Payload is not a decodable image")?;
    tracing::info!("{}", snaplabel_capture::describe(&image));

    Ok(())
}
