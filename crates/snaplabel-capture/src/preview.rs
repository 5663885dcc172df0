use std::path::Path;

use anyhow::{Context, Result};
use image::{ExtendedColorType, ImageFormat};
use snaplabel_types::CapturedImage;

/// Write the captured image to `path` as PNG, replacing any previous preview
pub fn save_preview(image: &CapturedImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let expected = image.width as usize * image.height as usize * 4;
    anyhow::ensure!(
        image.data.len() == expected,
        "Preview buffer is {} bytes, expected {}",
        image.data.len(),
        expected
    );

    image::save_buffer_with_format(
        path,
        &image.data,
        image.width,
        image.height,
        ExtendedColorType::Rgba8,
        ImageFormat::Png,
    )
    .with_context(|| format!("Failed to write preview to {}", path.display()))
}

/// One-line summary of an image for text surfaces
pub fn describe(image: &CapturedImage) -> String {
    let [r, g, b] = mean_color(image);
    format!(
        "{}x{} image, mean color #{:02x}{:02x}{:02x}",
        image.width, image.height, r, g, b
    )
}

fn mean_color(image: &CapturedImage) -> [u8; 3] {
    let pixels = image.data.chunks_exact(4);
    let count = pixels.len() as u64;
    if count == 0 {
        return [0, 0, 0];
    }

    let mut sums = [0u64; 3];
    for pixel in pixels {
        sums[0] += pixel[0] as u64;
        sums[1] += pixel[1] as u64;
        sums[2] += pixel[2] as u64;
    }
    sums.map(|sum| (sum / count) as u8)
}
