//! Export of processed results to local files
//!
//! PNG keeps the service's bytes untouched; JPEG cannot carry alpha, so the
//! result is composited over an opaque white backing before re-encoding,
//! preserving the source dimensions.

use crate::data_url::DataUrl;
use crate::error::{ClientError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::fs;
use std::path::Path;

/// Write the processed bytes directly as a PNG file
///
/// # Errors
/// - Filesystem write failures
pub fn write_png(image: &DataUrl, path: &Path) -> Result<()> {
    fs::write(path, image.bytes())
        .map_err(|e| ClientError::file_io_error("write PNG output", path, e))
}

/// Re-encode the processed image as JPEG over a white matte and write it
///
/// # Errors
/// - Undecodable processed bytes
/// - Encode or filesystem write failures
pub fn write_jpeg_on_white(image: &DataUrl, path: &Path, quality: u8) -> Result<()> {
    let encoded = encode_jpeg_on_white(image, quality)?;
    fs::write(path, encoded)
        .map_err(|e| ClientError::file_io_error("write JPEG output", path, e))
}

/// Produce JPEG bytes of the image composited over white
///
/// # Errors
/// - Undecodable processed bytes
/// - JPEG encode failures
pub fn encode_jpeg_on_white(image: &DataUrl, quality: u8) -> Result<Vec<u8>> {
    let decoded = image::load_from_memory(image.bytes())
        .map_err(|e| ClientError::processing(format!("Failed to decode processed image: {}", e)))?;
    let flattened = flatten_on_white(&decoded.to_rgba8());

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.write_image(
        flattened.as_raw(),
        flattened.width(),
        flattened.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buffer)
}

/// Alpha-blend an RGBA image over an opaque white background
fn flatten_on_white(rgba: &image::RgbaImage) -> RgbImage {
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let alpha = u16::from(pixel[3]);
        let blend = |channel: u8| -> u8 {
            ((u16::from(channel) * alpha + 255 * (255 - alpha)) / 255) as u8
        };
        rgb.put_pixel(x, y, Rgb([blend(pixel[0]), blend(pixel[1]), blend(pixel[2])]));
    }
    rgb
}
