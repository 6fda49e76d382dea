use std::path::Path;

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgba};
use log::info;
use lumen_renderer::ColorBuffer;

/// Save the linear radiance buffer as a gamma-2 PNG.
pub fn save_png(buffer: &ColorBuffer, path: &Path) -> Result<()> {
    let image: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width(), buffer.height(), buffer.to_rgba8())
            .context("Pixel buffer does not match image dimensions")?;

    image
        .save(path)
        .with_context(|| format!("Failed to save image to {}", path.display()))?;
    info!("Image saved as {}", path.display());
    Ok(())
}
