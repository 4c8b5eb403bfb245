use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::GenericImageView;

use crate::config::MediaConfig;
use crate::error::MediaError;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

/// Dimensions after fitting `width x height` into a `max x max` box.
///
/// The larger side becomes exactly `max` and the other side is scaled by the
/// same factor and rounded. Images already inside the box keep their size.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let scale = |side: u32, long: u32| -> u32 {
        let scaled = (f64::from(side) * f64::from(max) / f64::from(long)).round();
        (scaled as u32).max(1)
    };

    if width >= height && width > max {
        (max, scale(height, width))
    } else if height > width && height > max {
        (scale(width, height), max)
    } else {
        (width, height)
    }
}

/// Decodes an uploaded still image, downscales it to the configured bound and
/// re-encodes it as JPEG.
pub fn compress_image(name: &str, bytes: &[u8], config: &MediaConfig) -> Result<Vec<u8>, MediaError> {
    let _span = tracing::info_span!("media.compress", name = %name, input_bytes = bytes.len()).entered();

    let img = image::load_from_memory(bytes).map_err(|e| MediaError::DecodeImage {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let (width, height) = img.dimensions();
    let (target_width, target_height) = fit_within(width, height, config.max_dimension);
    let img = if (target_width, target_height) != (width, height) {
        tracing::debug!(
            "Resizing {} from {}x{} to {}x{}",
            name,
            width,
            height,
            target_width,
            target_height
        );
        img.resize_exact(target_width, target_height, FilterType::Triangle)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let rgb = img.to_rgb8();

    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality.clamp(1, 100));
    encoder
        .encode_image(&rgb)
        .map_err(|e| MediaError::EncodeImage {
            name: name.to_string(),
            reason: e.to_string(),
        })?;

    tracing::debug!("Compressed {} to {} bytes", name, buffer.len());
    Ok(buffer)
}
