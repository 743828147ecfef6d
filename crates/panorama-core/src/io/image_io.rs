use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use ndarray::Array3;

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{PanoramaError, Result};
use crate::frame::ColorFrame;

/// Load any supported image file into an RGB ColorFrame with values in [0, 1].
pub fn load_color_image(path: &Path) -> Result<ColorFrame> {
    let img = image::open(path)?;
    let rgb = img.to_rgb16();
    let (w, h) = rgb.dimensions();
    let mut data = Array3::<f32>::zeros((h as usize, w as usize, COLOR_CHANNEL_COUNT));

    for (col, row, pixel) in rgb.enumerate_pixels() {
        for k in 0..COLOR_CHANNEL_COUNT {
            data[[row as usize, col as usize, k]] = pixel.0[k] as f32 / 65535.0;
        }
    }

    Ok(ColorFrame::new(data))
}

/// Save a ColorFrame as 16-bit RGB TIFF.
pub fn save_color_tiff(color: &ColorFrame, path: &Path) -> Result<()> {
    let (h, w) = (color.height(), color.width());
    let pixels: Vec<u16> = color
        .data
        .iter()
        .map(|&v| (sanitize(v) * 65535.0).round() as u16)
        .collect();

    let img = ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or_else(|| buffer_mismatch(w, h))?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a ColorFrame as 8-bit RGB in the given format.
fn save_color_8bit(color: &ColorFrame, path: &Path, format: ImageFormat) -> Result<()> {
    let (h, w) = (color.height(), color.width());
    let pixels: Vec<u8> = color
        .data
        .iter()
        .map(|&v| (sanitize(v) * 255.0).round() as u8)
        .collect();

    let img = RgbImage::from_raw(w as u32, h as u32, pixels).ok_or_else(|| buffer_mismatch(w, h))?;
    img.save_with_format(path, format)?;
    Ok(())
}

/// Save a ColorFrame as 8-bit RGB PNG.
pub fn save_color_png(color: &ColorFrame, path: &Path) -> Result<()> {
    save_color_8bit(color, path, ImageFormat::Png)
}

/// Save a ColorFrame as 8-bit RGB JPEG.
pub fn save_color_jpeg(color: &ColorFrame, path: &Path) -> Result<()> {
    save_color_8bit(color, path, ImageFormat::Jpeg)
}

/// Save a ColorFrame, choosing format from file extension. Unknown
/// extensions get a 16-bit TIFF.
pub fn save_color_image(color: &ColorFrame, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => save_color_png(color, path),
        Some("jpg" | "jpeg") => save_color_jpeg(color, path),
        _ => save_color_tiff(color, path),
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() {
        v.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn buffer_mismatch(w: usize, h: usize) -> PanoramaError {
    PanoramaError::InvalidImage {
        index: 0,
        reason: format!("pixel buffer does not match {w}x{h}"),
    }
}
