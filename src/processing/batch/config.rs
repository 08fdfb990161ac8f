use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::utils::{ConverterResult, ValidationError, read_bytes, validate_quality};

/// Default quality for a new session.
pub const DEFAULT_QUALITY: u8 = 80;
/// Most files a single run will take.
pub const MAX_FILES: usize = 20;
pub const DEFAULT_ARCHIVE_NAME: &str = "webp-images.zip";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    pub quality: u8,
    pub max_files: usize,
    pub archive_name: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_files: MAX_FILES,
            archive_name: DEFAULT_ARCHIVE_NAME.to_string(),
        }
    }
}

impl BatchConfig {
    /// Parses a JSON config; missing keys take their defaults.
    pub fn from_json(json: &str) -> ConverterResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ValidationError::settings(format!("Invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> ConverterResult<Self> {
        let bytes = read_bytes(path).await?;
        Self::from_json(&String::from_utf8_lossy(&bytes))
    }

    pub fn validate(&self) -> ConverterResult<()> {
        validate_quality(self.quality as u32)?;
        if self.max_files == 0 {
            return Err(ValidationError::settings("maxFiles cannot be 0").into());
        }
        if self.archive_name.trim().is_empty() {
            return Err(ValidationError::settings("archiveName cannot be empty").into());
        }
        Ok(())
    }
}
