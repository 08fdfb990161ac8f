//! Source file definition for a conversion batch.

use std::path::{Path, PathBuf};
use crate::utils::{ConverterResult, extract_filename, mime_type_from_name, read_bytes, validate_input_path};

/// Where a source file's bytes come from.
#[derive(Debug, Clone)]
pub enum SourceData {
    /// Bytes already in memory (an upload, or a retained original on reprocess)
    Memory(Vec<u8>),
    /// Bytes still on disk; read when the file's turn comes
    Path(PathBuf),
}

impl SourceData {
    /// Loads the bytes, reading from disk for path-backed data.
    pub async fn into_bytes(self) -> ConverterResult<Vec<u8>> {
        match self {
            Self::Memory(bytes) => Ok(bytes),
            Self::Path(path) => read_bytes(path).await,
        }
    }
}

/// One file handed to a batch: a name, its declared mime type and its bytes.
///
/// The declared mime type is trusted for filtering; the bytes are only
/// inspected when the file is decoded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub mime_type: String,
    pub data: SourceData,
}

impl SourceFile {
    pub fn from_bytes(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: SourceData::Memory(bytes),
        }
    }

    /// Creates a disk-backed source file, declaring the mime type its extension implies.
    pub async fn from_path(path: impl AsRef<Path>) -> ConverterResult<Self> {
        let path = path.as_ref();
        validate_input_path(path).await?;

        let path_str = path.to_string_lossy();
        let name = extract_filename(&path_str).to_string();
        let mime_type = mime_type_from_name(&name).to_string();

        Ok(Self {
            name,
            mime_type,
            data: SourceData::Path(path.to_path_buf()),
        })
    }
}
