//! Command handlers for a conversion session.

use std::path::{Path, PathBuf};
use tracing::debug;
use crate::core::{AppState, ConversionResult, SourceFile, StateSnapshot};
use crate::processing::{BatchReport, BatchSummary, Download, output_entries};
use crate::utils::{ConverterResult, write_output};

/// Converts a batch of files and appends the results to the session.
///
/// # Arguments
/// * `state` - Session to convert into
/// * `files` - Files as selected or dropped by the user, in order
/// * `quality` - New batch quality (10-100); the current one when `None`
///
/// # Returns
/// What the run did, including any batch-level advisory.
///
/// # Events Emitted
/// One `Start`, one `Progress` per item and one `Complete` to the session's progress sink.
pub async fn convert_images(
    state: &AppState,
    files: Vec<SourceFile>,
    quality: Option<u32>,
) -> ConverterResult<BatchReport> {
    debug!("Received convert_images command for {} files", files.len());
    let mut processor = state.processor().await;
    if let Some(quality) = quality {
        processor.set_quality(quality)?;
    }
    Ok(processor.run_batch(files, state.progress_sink()).await)
}

/// Re-converts all recoverable results, replacing the result list.
///
/// # Arguments
/// * `state` - Session to reconvert
/// * `quality` - New batch quality (10-100); the current one when `None`
pub async fn reconvert_all(state: &AppState, quality: Option<u32>) -> ConverterResult<BatchReport> {
    let mut processor = state.processor().await;
    if let Some(quality) = quality {
        processor.set_quality(quality)?;
    }
    debug!("Received reconvert_all command for {} results", processor.results().len());
    Ok(processor.reconvert_all(state.progress_sink()).await)
}

pub async fn set_quality(state: &AppState, quality: u32) -> ConverterResult<()> {
    state.processor().await.set_quality(quality)
}

/// Removes the result at `index` and returns it.
pub async fn remove_image(state: &AppState, index: usize) -> ConverterResult<ConversionResult> {
    state.processor().await.remove_image(index)
}

pub async fn clear_all(state: &AppState) {
    state.processor().await.clear_all();
}

/// WebP bytes of one converted result under its output filename.
pub async fn download_single(state: &AppState, index: usize) -> ConverterResult<Download> {
    state.processor().await.download_single(index)
}

/// Every converted result packed into a ZIP, named by the session config.
pub async fn export_archive(state: &AppState) -> ConverterResult<Download> {
    let processor = state.processor().await;
    Ok(Download {
        filename: processor.config().archive_name.clone(),
        data: processor.export_archive()?,
    })
}

/// Writes every converted result into `dir`, one WebP file each.
///
/// Files get the same collision-free names as archive members, so `a.png`
/// and `a.jpg` land as `a.webp` and `a-2.webp`. Existing files with those
/// names are overwritten.
///
/// # Returns
/// The written paths, in result order.
pub async fn save_converted(state: &AppState, dir: &Path) -> ConverterResult<Vec<PathBuf>> {
    let processor = state.processor().await;
    let entries = output_entries(processor.results());
    debug!("Saving {} converted images to {}", entries.len(), dir.display());

    let mut paths = Vec::with_capacity(entries.len());
    for (name, data) in entries {
        paths.push(write_output(dir, &name, data).await?);
    }
    Ok(paths)
}

pub async fn get_summary(state: &AppState) -> BatchSummary {
    state.processor().await.summary()
}

/// Snapshot of the session state, without image buffers.
///
/// Waits for any in-flight run, so the phase is never `Processing`.
pub async fn get_state(state: &AppState) -> StateSnapshot {
    state.processor().await.state().snapshot()
}
