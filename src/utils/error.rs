//! Error types for the WebP converter.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.
//! Per-image failures ([`TranscodeError`]) never escape a batch; they are captured
//! into the item's result. [`ConverterError`] covers misuse of the session API
//! and I/O outside a single item.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Why a single image could not be converted.
///
/// The display strings are what the result list shows next to the item.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranscodeError {
    /// Source bytes could not be decoded as an image
    #[error("Invalid image.")]
    InvalidImage,
    /// No pixel surface could be obtained for the decoded image
    #[error("Canvas not supported.")]
    EncodingUnsupported,
    /// The WebP encoder rejected the surface
    #[error("Conversion failed.")]
    ConversionFailed,
    /// The source file could not be read into memory
    #[error("Read failed.")]
    ReadFailed,
}

/// Validation errors for session input and settings.
#[derive(Error, Debug, Serialize)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
    /// Result index outside the current list
    #[error("No image at index {index} (have {len})")]
    Index { index: usize, len: usize },
    /// Operation needs a converted item but the item failed
    #[error("Image at index {0} has no converted output")]
    NotConverted(usize),
}

/// File path errors.
#[derive(Error, Debug, Serialize)]
pub enum PathError {
    /// File does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
    /// IO error accessing the path
    #[error("IO error: {0}")]
    IO(String),
}

/// Main error type for the converter.
///
/// Everything the session and command layer can fail with is converted to this
/// type before it reaches the caller.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Input or settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// ZIP packaging failed
    #[error("Archive error: {0}")]
    Archive(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

impl ConverterError {
    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }
}

impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFile(path.into()))
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

// Convert std::io::Error to ConverterError
impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<zip::result::ZipError> for ConverterError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Archive(err.to_string())
    }
}

// Convert io::Error to PathError
impl From<io::Error> for PathError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

// Convert PathError to ConverterError
impl From<PathError> for ConverterError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}
