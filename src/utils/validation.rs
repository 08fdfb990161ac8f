use std::path::Path;
use crate::utils::{ConverterResult, ValidationError};

/// Lowest quality the batch settings accept.
pub const MIN_QUALITY: u8 = 10;
/// Highest quality the batch settings accept.
pub const MAX_QUALITY: u8 = 100;

/// Validates a batch-wide quality setting
pub fn validate_quality(quality: u32) -> ConverterResult<u8> {
    if quality < MIN_QUALITY as u32 || quality > MAX_QUALITY as u32 {
        return Err(ValidationError::settings(format!(
            "Invalid quality value: {}. Must be between {} and {}",
            quality, MIN_QUALITY, MAX_QUALITY
        )).into());
    }
    Ok(quality as u8)
}

/// Validates that `path` names an existing regular file
pub async fn validate_input_path(path: impl AsRef<Path>) -> ConverterResult<()> {
    let path = path.as_ref();
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| ValidationError::path_not_found(path))?;

    if !metadata.is_file() {
        return Err(ValidationError::not_a_file(path).into());
    }
    Ok(())
}

/// Validates a result index against the current list length
pub fn validate_index(index: usize, len: usize) -> ConverterResult<()> {
    if index >= len {
        return Err(ValidationError::Index { index, len }.into());
    }
    Ok(())
}
