use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use crate::utils::{ConverterError, ConverterResult};

/// Final path component as a string, or the input unchanged if it has none
pub fn extract_filename(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Reads a whole file into memory
pub async fn read_bytes(path: impl AsRef<Path>) -> ConverterResult<Vec<u8>> {
    fs::read(path.as_ref())
        .await
        .map_err(|e| ConverterError::io(format!(
            "Failed to read {}: {}", path.as_ref().display(), e
        )))
}

/// Writes `bytes` as `dir/filename`, creating `dir` first. Returns the written path.
pub async fn write_output(dir: impl AsRef<Path>, filename: &str, bytes: &[u8]) -> ConverterResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .await
        .map_err(|e| ConverterError::io(format!(
            "Cannot create output directory {}: {}", dir.display(), e
        )))?;

    let path = dir.join(extract_filename(filename));
    fs::write(&path, bytes).await?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_last_component() {
        assert_eq!(extract_filename("/tmp/in/cat.png"), "cat.png");
        assert_eq!(extract_filename("cat.png"), "cat.png");
    }

    #[tokio::test]
    async fn writes_into_fresh_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        let path = write_output(&out, "a.webp", b"RIFF").await.unwrap();
        assert_eq!(path, out.join("a.webp"));
        assert_eq!(read_bytes(&path).await.unwrap(), b"RIFF");
    }

    #[tokio::test]
    async fn read_of_missing_file_is_io_error() {
        let err = read_bytes("/definitely/missing/file.png").await.unwrap_err();
        assert!(matches!(err, ConverterError::IO(_)));
    }
}
