//! Core types for conversion results.

use serde::Serialize;
use crate::utils::{ImageFormat, TranscodeError, swap_extension};

/// Percentage saved going from `original_size` to `converted_size`.
///
/// Negative when the output grew; 0 for an empty original.
pub fn reduction_percent(original_size: u64, converted_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size as f64 - converted_size as f64) / original_size as f64 * 100.0
}

/// A successfully converted image and the bytes it came from.
///
/// Both buffers are owned here, so dropping the result releases them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedImage {
    /// Name of the file the image was converted from
    pub source_name: String,
    /// Declared mime type of the source file
    pub source_mime_type: String,
    /// Original file bytes, retained for reprocessing
    #[serde(skip)]
    pub original: Vec<u8>,
    /// Original file size in bytes
    pub original_size: u64,
    /// Encoded WebP bytes
    #[serde(skip)]
    pub converted: Vec<u8>,
    /// WebP size in bytes
    pub converted_size: u64,
    /// Size reduction as a percentage of the original
    pub reduction_percent: f64,
    pub width: u32,
    pub height: u32,
}

/// Outcome of one transcode: converted, or failed with a reason. Never both.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ConversionOutcome {
    Converted(ConvertedImage),
    Failed { error: TranscodeError },
}

/// Result of converting a single file, as kept in the batch result list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Output name on success, the source name on failure
    pub filename: String,
    #[serde(flatten)]
    pub outcome: ConversionOutcome,
}

impl ConversionResult {
    /// Builds a successful result; the filename gets the WebP extension.
    pub fn converted(
        source_name: &str,
        source_mime_type: &str,
        original: Vec<u8>,
        converted: Vec<u8>,
        width: u32,
        height: u32,
    ) -> Self {
        let original_size = original.len() as u64;
        let converted_size = converted.len() as u64;
        Self {
            filename: swap_extension(source_name, ImageFormat::WebP),
            outcome: ConversionOutcome::Converted(ConvertedImage {
                source_name: source_name.to_string(),
                source_mime_type: source_mime_type.to_string(),
                original,
                original_size,
                converted,
                converted_size,
                reduction_percent: reduction_percent(original_size, converted_size),
                width,
                height,
            }),
        }
    }

    /// Builds a failed result under the unchanged source name.
    pub fn failed(source_name: &str, error: TranscodeError) -> Self {
        Self {
            filename: source_name.to_string(),
            outcome: ConversionOutcome::Failed { error },
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self.outcome, ConversionOutcome::Converted(_))
    }

    pub fn image(&self) -> Option<&ConvertedImage> {
        match &self.outcome {
            ConversionOutcome::Converted(image) => Some(image),
            ConversionOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<TranscodeError> {
        match self.outcome {
            ConversionOutcome::Failed { error } => Some(error),
            ConversionOutcome::Converted(_) => None,
        }
    }

    /// Original size in bytes; 0 for failed items.
    pub fn original_size(&self) -> u64 {
        self.image().map_or(0, |i| i.original_size)
    }

    /// Converted size in bytes; 0 for failed items.
    pub fn converted_size(&self) -> u64 {
        self.image().map_or(0, |i| i.converted_size)
    }

    /// Defined only for converted items.
    pub fn reduction_percent(&self) -> Option<f64> {
        self.image().map(|i| i.reduction_percent)
    }

    /// Bytes saved by the conversion (negative if the file grew).
    pub fn saved_bytes(&self) -> Option<i64> {
        self.image().map(|i| i.original_size as i64 - i.converted_size as i64)
    }

    pub fn converted_bytes(&self) -> Option<&[u8]> {
        self.image().map(|i| i.converted.as_slice())
    }

    /// Original bytes when they can be fed back through the transcoder.
    pub fn recoverable_original(&self) -> Option<&ConvertedImage> {
        self.image().filter(|i| !i.original.is_empty())
    }
}

/// A [`ConversionResult`] without its byte buffers.
///
/// Sizes and dimensions are 0 for failed items, as on the full result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSnapshot {
    pub filename: String,
    pub original_size: u64,
    pub converted_size: u64,
    pub reduction_percent: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub error: Option<TranscodeError>,
}

impl ResultSnapshot {
    pub fn is_converted(&self) -> bool {
        self.error.is_none()
    }
}

impl From<&ConversionResult> for ResultSnapshot {
    fn from(result: &ConversionResult) -> Self {
        let (width, height) = result.image().map_or((0, 0), |i| (i.width, i.height));
        Self {
            filename: result.filename.clone(),
            original_size: result.original_size(),
            converted_size: result.converted_size(),
            reduction_percent: result.reduction_percent(),
            width,
            height,
            error: result.error(),
        }
    }
}
