use serde::{Deserialize, Serialize};
use std::str::FromStr;
use crate::utils::{ConverterError, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    JPEG,
    PNG,
    WebP,
}

impl ImageFormat {
    /// Formats a batch accepts as input.
    pub const SOURCES: [ImageFormat; 2] = [Self::JPEG, Self::PNG];

    /// Declared mime type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::JPEG => "image/jpeg",
            Self::PNG => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Parses a declared mime type. Parameters (`; charset=...`) and case are ignored.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" => Some(Self::JPEG),
            "image/png" => Some(Self::PNG),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// True for the raster types a batch will take as input.
    pub fn is_source(&self) -> bool {
        Self::SOURCES.contains(self)
    }

    /// Get file extensions associated with this format
    pub fn extensions(&self) -> &[&'static str] {
        match self {
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::WebP => &["webp"],
        }
    }

    /// Get the primary extension for this format
    pub fn primary_extension(&self) -> &'static str {
        self.extensions()[0]
    }
}

impl FromStr for ImageFormat {
    type Err = ConverterError;

    fn from_str(ext: &str) -> Result<Self, Self::Err> {
        let ext = ext.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "webp" => Ok(Self::WebP),
            _ => Err(ValidationError::settings(format!(
                "Unsupported image format: {}", ext
            )).into()),
        }
    }
}

/// Returns true when `mime` is one of the accepted source raster types.
pub fn is_accepted_mime_type(mime: &str) -> bool {
    ImageFormat::from_mime_type(mime).is_some_and(|f| f.is_source())
}

/// Mime type implied by a file name's extension, `application/octet-stream` if unknown.
pub fn mime_type_from_name(name: &str) -> &'static str {
    std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(|e| ImageFormat::from_str(e).ok())
        .map(|f| f.mime_type())
        .unwrap_or("application/octet-stream")
}

/// Replaces the last extension of `filename` with the primary extension of `format`.
///
/// A name without an extension gets one appended. Only the final component is
/// touched, so `photo.final.png` becomes `photo.final.webp`.
pub fn swap_extension(filename: &str, format: ImageFormat) -> String {
    let new_ext = format.primary_extension();
    match filename.rfind('.') {
        Some(dot) if dot + 1 < filename.len() && !filename[dot + 1..].contains('/') => {
            format!("{}.{}", &filename[..dot], new_ext)
        }
        _ => format!("{filename}.{new_ext}"),
    }
}
