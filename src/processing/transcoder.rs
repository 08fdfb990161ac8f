//! Single-image WebP transcoder.
//!
//! Decoding, drawing and encoding are CPU bound and run inside
//! `tokio::task::spawn_blocking` so the async runtime is never blocked. The
//! only suspension points are the file read and the blocking job itself.

use image::{DynamicImage, ImageError, RgbaImage};
use tracing::{debug, warn};

use crate::core::{ConversionResult, SourceFile};
use crate::utils::TranscodeError;

/// Largest width or height libwebp can encode.
pub const MAX_WEBP_DIMENSION: u32 = 16383;

/// WebP payload produced from one source image.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Converts one file, capturing any failure into the returned result.
///
/// Never fails as a whole: a read, decode, surface or encode failure becomes
/// a failed [`ConversionResult`] under the source file's name.
pub async fn transcode(file: SourceFile, quality: u8) -> ConversionResult {
    let name = file.name.clone();
    match try_transcode(file, quality).await {
        Ok(result) => result,
        Err(error) => {
            warn!("Conversion failed for {}: {}", name, error);
            ConversionResult::failed(&name, error)
        }
    }
}

/// Converts one file to WebP at `quality` (clamped to 1-100).
pub async fn try_transcode(file: SourceFile, quality: u8) -> Result<ConversionResult, TranscodeError> {
    let SourceFile { name, mime_type, data } = file;
    let quality = quality.clamp(1, 100);

    let original = data
        .into_bytes()
        .await
        .map_err(|e| {
            debug!("Read of {} failed: {}", name, e);
            TranscodeError::ReadFailed
        })?;

    let (original, encoded) = tokio::task::spawn_blocking(move || {
        encode_webp(&original, quality).map(|encoded| (original, encoded))
    })
    .await
    .map_err(|e| {
        warn!("Transcode job for {} panicked: {}", name, e);
        TranscodeError::ConversionFailed
    })??;

    debug!(
        "'{}' {}×{} → {} bytes WebP (from {} bytes, q{})",
        name,
        encoded.width,
        encoded.height,
        encoded.data.len(),
        original.len(),
        quality
    );

    Ok(ConversionResult::converted(
        &name,
        &mime_type,
        original,
        encoded.data,
        encoded.width,
        encoded.height,
    ))
}

/// Decodes `bytes`, draws them onto an RGBA surface of the same size and
/// encodes the surface as lossy WebP. Blocking.
pub fn encode_webp(bytes: &[u8], quality: u8) -> Result<EncodedImage, TranscodeError> {
    let image = image::load_from_memory(bytes).map_err(|e| match e {
        // The decoder refused to allocate pixel storage for the declared size
        ImageError::Limits(limit) => {
            debug!("No surface for decoded image: {}", limit);
            TranscodeError::EncodingUnsupported
        }
        e => {
            debug!("Decode failed: {}", e);
            TranscodeError::InvalidImage
        }
    })?;

    let surface = draw_surface(image)?;
    let (width, height) = surface.dimensions();

    let encoder = webp::Encoder::from_rgba(surface.as_raw(), width, height);
    let memory = encoder
        .encode_simple(false, quality as f32)
        .map_err(|e| {
            debug!("WebP encode failed: {:?}", e);
            TranscodeError::ConversionFailed
        })?;

    Ok(EncodedImage {
        data: memory.to_vec(),
        width,
        height,
    })
}

/// Pixel surface sized exactly to the decoded image. No resizing.
fn draw_surface(image: DynamicImage) -> Result<RgbaImage, TranscodeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 || width > MAX_WEBP_DIMENSION || height > MAX_WEBP_DIMENSION {
        debug!("No surface for a {}×{} image", width, height);
        return Err(TranscodeError::EncodingUnsupported);
    }
    Ok(image.into_rgba8())
}
