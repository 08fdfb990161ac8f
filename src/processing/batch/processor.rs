use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::{
    BatchAdvisory, BatchState, ConversionOutcome, ConversionResult, Progress, ProgressSink,
    ProgressType, SessionPhase, SourceFile,
};
use crate::processing::archive::export_zip;
use crate::processing::transcoder::transcode;
use crate::utils::{
    ConverterResult, MAX_QUALITY, MIN_QUALITY, ValidationError, is_accepted_mime_type,
    validate_index, validate_quality,
};

use super::config::BatchConfig;
use super::metrics::BatchSummary;

/// What a run did, returned alongside the updated state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Items this run produced
    pub processed: usize,
    /// How many of those failed
    pub failed: usize,
    /// Batch-level condition, if any
    pub advisory: Option<BatchAdvisory>,
}

/// A converted image ready to be saved under its output name.
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Owns a session's results and runs batches over them.
///
/// Items are transcoded one at a time in input order; each is fully finished
/// before the next starts, and progress is published between items.
pub struct BatchProcessor {
    config: BatchConfig,
    state: BatchState,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        let quality = config.quality.clamp(MIN_QUALITY, MAX_QUALITY);
        Self {
            state: BatchState::new(quality),
            config,
        }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    pub fn state(&self) -> &BatchState {
        &self.state
    }

    pub fn results(&self) -> &[ConversionResult] {
        self.state.results()
    }

    /// Sets the quality used by the next run or reprocess. Nothing is re-run.
    pub fn set_quality(&mut self, quality: u32) -> ConverterResult<()> {
        self.state.quality = validate_quality(quality)?;
        debug!("Quality set to {}", self.state.quality);
        Ok(())
    }

    /// Keeps files with an accepted mime type, at most `max_files` of them.
    pub fn select_files(&self, files: Vec<SourceFile>) -> (Vec<SourceFile>, Option<BatchAdvisory>) {
        let offered = files.len();
        let mut selected: Vec<SourceFile> = files
            .into_iter()
            .filter(|f| is_accepted_mime_type(&f.mime_type))
            .collect();

        if selected.len() < offered {
            debug!("Dropped {} files with unsupported types", offered - selected.len());
        }

        if selected.is_empty() {
            return (selected, Some(BatchAdvisory::NoValidInput));
        }

        let max = self.config.max_files;
        if selected.len() > max {
            warn!("{} images selected, only the first {} will be processed", selected.len(), max);
            selected.truncate(max);
            return (selected, Some(BatchAdvisory::LimitExceeded { max }));
        }

        (selected, None)
    }

    /// Converts `files` at the current quality and appends the results.
    ///
    /// Unsupported types are dropped silently. If nothing is left, the run
    /// reports [`BatchAdvisory::NoValidInput`] and does nothing else. Item
    /// failures are appended like any other result.
    pub async fn run_batch(&mut self, files: Vec<SourceFile>, sink: &dyn ProgressSink) -> BatchReport {
        let (selected, advisory) = self.select_files(files);
        self.state.advisory = advisory;

        if selected.is_empty() {
            info!("No valid images selected, nothing to convert");
            return BatchReport { processed: 0, failed: 0, advisory };
        }

        info!("Converting {} images at quality {}", selected.len(), self.state.quality);
        let before = self.state.results.len();
        self.process(selected, sink, |state, result| state.results.push(result)).await;

        let failed = self.state.results[before..].iter().filter(|r| !r.is_converted()).count();
        BatchReport {
            processed: self.state.results.len() - before,
            failed,
            advisory,
        }
    }

    /// Re-converts every recoverable result at the current quality and
    /// replaces the result list with the new outcomes.
    ///
    /// Failed items and items without original bytes are dropped. Progress
    /// counts recoverable items only.
    pub async fn reconvert_all(&mut self, sink: &dyn ProgressSink) -> BatchReport {
        if self.state.results.is_empty() {
            debug!("Nothing to reconvert");
            return BatchReport { processed: 0, failed: 0, advisory: None };
        }

        let previous = std::mem::take(&mut self.state.results);
        let total = previous.len();
        let files: Vec<SourceFile> = previous
            .into_iter()
            .filter_map(|result| match result.outcome {
                ConversionOutcome::Converted(image) if !image.original.is_empty() => {
                    Some(SourceFile::from_bytes(image.source_name, image.source_mime_type, image.original))
                }
                _ => None,
            })
            .collect();

        if files.len() < total {
            debug!("Dropping {} unrecoverable items from reconversion", total - files.len());
        }
        info!("Reconverting {} images at quality {}", files.len(), self.state.quality);

        let mut fresh = Vec::with_capacity(files.len());
        self.process(files, sink, |_, result| fresh.push(result)).await;

        let failed = fresh.iter().filter(|r| !r.is_converted()).count();
        let processed = fresh.len();
        self.state.results = fresh;
        self.state.phase = self.state.settled_phase();

        BatchReport { processed, failed, advisory: None }
    }

    /// Sequential transcode loop shared by runs and reprocessing.
    async fn process<F>(&mut self, files: Vec<SourceFile>, sink: &dyn ProgressSink, mut collect: F)
    where
        F: FnMut(&mut BatchState, ConversionResult),
    {
        let total = files.len();
        let quality = self.state.quality;

        self.state.phase = SessionPhase::Processing;
        self.state.progress = 0.0;
        sink.emit(&Progress::new(ProgressType::Start, 0, total, "processing"));

        for (idx, file) in files.into_iter().enumerate() {
            let completed = idx + 1;
            let result = transcode(file, quality).await;

            let progress = Progress::new(ProgressType::Progress, completed, total, "processing")
                .with_file(&result.filename, result.error().map(|e| e.to_string()));

            if let Some(image) = result.image() {
                debug!(
                    "{} converted ({} → {} bytes, {:.1}% smaller)",
                    result.filename, image.original_size, image.converted_size, image.reduction_percent
                );
            }

            collect(&mut self.state, result);
            self.state.progress = progress.fraction();
            sink.emit(&progress);
        }

        self.state.phase = self.state.settled_phase();
        sink.emit(&Progress::new(ProgressType::Complete, total, total, "complete"));
    }

    /// Removes one result, releasing its buffers.
    pub fn remove_image(&mut self, index: usize) -> ConverterResult<ConversionResult> {
        validate_index(index, self.state.results.len())?;
        let removed = self.state.results.remove(index);
        self.state.phase = self.state.settled_phase();
        debug!("Removed {}", removed.filename);
        Ok(removed)
    }

    /// Drops every result and resets progress and advisories.
    pub fn clear_all(&mut self) {
        debug!("Clearing {} results", self.state.results.len());
        self.state.results.clear();
        self.state.progress = 0.0;
        self.state.advisory = None;
        self.state.phase = SessionPhase::Empty;
    }

    /// Output name and WebP bytes of one converted item.
    pub fn download_single(&self, index: usize) -> ConverterResult<Download> {
        validate_index(index, self.state.results.len())?;
        let result = &self.state.results[index];
        let data = result
            .converted_bytes()
            .ok_or(ValidationError::NotConverted(index))?;

        Ok(Download {
            filename: result.filename.clone(),
            data: data.to_vec(),
        })
    }

    /// All converted items packed as a ZIP archive.
    pub fn export_archive(&self) -> ConverterResult<Vec<u8>> {
        export_zip(self.state.results())
    }

    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_results(self.state.results())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use crate::core::NoopProgressSink;
    use crate::processing::batch::metrics::{average_reduction, total_savings};
    use crate::test_fixtures::{corrupt_file, jpeg_file, png_file, text_file};
    use crate::utils::{ConverterError, TranscodeError};

    fn processor() -> BatchProcessor {
        BatchProcessor::new(BatchConfig::default())
    }

    fn pngs(n: usize) -> Vec<SourceFile> {
        (0..n).map(|i| png_file(&format!("img{i}.png"), 8, 8)).collect()
    }

    #[tokio::test]
    async fn results_follow_input_order() {
        let mut p = processor();
        let files = vec![
            png_file("first.png", 16, 16),
            jpeg_file("second.jpg", 16, 16),
            png_file("third.png", 16, 16),
        ];
        let report = p.run_batch(files, &NoopProgressSink).await;

        assert_eq!(report.processed, 3);
        assert_eq!(report.advisory, None);
        let names: Vec<_> = p.results().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["first.webp", "second.webp", "third.webp"]);
        assert_eq!(p.state().phase(), SessionPhase::Idle);
        assert_eq!(p.state().progress(), 1.0);
    }

    #[tokio::test]
    async fn batch_is_truncated_to_the_limit() {
        let mut p = processor();
        let report = p.run_batch(pngs(25), &NoopProgressSink).await;

        assert_eq!(p.results().len(), 20);
        assert_eq!(report.processed, 20);
        assert_eq!(report.advisory, Some(BatchAdvisory::LimitExceeded { max: 20 }));
        assert_eq!(p.state().advisory(), Some(BatchAdvisory::LimitExceeded { max: 20 }));
        assert_eq!(p.results()[19].filename, "img19.webp");
    }

    #[tokio::test]
    async fn unsupported_types_are_dropped_silently() {
        let mut p = processor();
        let mut files = pngs(5);
        files.insert(1, text_file("notes.txt"));
        files.insert(3, SourceFile::from_bytes("anim.gif", "image/gif", vec![1, 2, 3]));
        files.push(SourceFile::from_bytes("already.webp", "image/webp", vec![1, 2, 3]));

        let report = p.run_batch(files, &NoopProgressSink).await;
        assert_eq!(report.processed, 5);
        assert_eq!(report.failed, 0);
        assert_eq!(report.advisory, None);
        assert!(p.results().iter().all(|r| r.is_converted()));
    }

    #[tokio::test]
    async fn nothing_valid_means_no_work() {
        let mut p = processor();
        let report = p.run_batch(vec![text_file("a.txt")], &NoopProgressSink).await;

        assert_eq!(report.advisory, Some(BatchAdvisory::NoValidInput));
        assert_eq!(report.processed, 0);
        assert!(p.results().is_empty());
        assert_eq!(p.state().phase(), SessionPhase::Empty);
    }

    #[tokio::test]
    async fn item_failures_do_not_stop_the_batch() {
        let mut p = processor();
        let files = vec![png_file("ok1.png", 8, 8), corrupt_file("bad.png"), png_file("ok2.png", 8, 8)];
        let report = p.run_batch(files, &NoopProgressSink).await;

        assert_eq!(report.processed, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(p.results()[1].error(), Some(TranscodeError::InvalidImage));
        assert!(p.results()[2].is_converted());
        for result in p.results() {
            assert!(result.error().is_some() ^ (result.converted_size() > 0 && result.reduction_percent().is_some()));
        }
    }

    #[tokio::test]
    async fn runs_append_to_existing_results() {
        let mut p = processor();
        p.run_batch(pngs(2), &NoopProgressSink).await;
        p.run_batch(vec![png_file("later.png", 8, 8)], &NoopProgressSink).await;
        assert_eq!(p.results().len(), 3);
        assert_eq!(p.results()[2].filename, "later.webp");
    }

    #[tokio::test]
    async fn progress_is_published_after_each_item() {
        let mut p = processor();
        let seen = Mutex::new(Vec::new());
        let sink = |progress: &Progress| seen.lock().unwrap().push(progress.clone());

        let files = vec![png_file("small.png", 16, 16), png_file("large.png", 32, 32)];
        p.run_batch(files, &sink).await;

        let seen = seen.into_inner().unwrap();
        let kinds: Vec<_> = seen.iter().map(|p| p.progress_type).collect();
        assert_eq!(
            kinds,
            vec![ProgressType::Start, ProgressType::Progress, ProgressType::Progress, ProgressType::Complete]
        );
        let fractions: Vec<f64> = seen
            .iter()
            .filter(|p| p.progress_type == ProgressType::Progress)
            .map(Progress::fraction)
            .collect();
        assert_eq!(fractions, vec![0.5, 1.0]);
        assert_eq!(seen[1].file_name.as_deref(), Some("small.webp"));
        assert!(total_savings(p.results()) > 0);
        assert!(average_reduction(p.results()) > 0.0);
    }

    #[tokio::test]
    async fn reconvert_replaces_and_drops_failures() {
        let mut p = processor();
        let files = vec![png_file("a.png", 24, 24), corrupt_file("bad.png"), jpeg_file("b.jpg", 24, 24)];
        p.run_batch(files, &NoopProgressSink).await;
        assert_eq!(p.results().len(), 3);

        p.set_quality(30).unwrap();
        let seen = Mutex::new(Vec::new());
        let sink = |progress: &Progress| {
            if progress.progress_type == ProgressType::Progress {
                seen.lock().unwrap().push(progress.fraction());
            }
        };
        let report = p.reconvert_all(&sink).await;

        assert_eq!(report.processed, 2);
        let names: Vec<_> = p.results().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.webp", "b.webp"]);
        assert_eq!(seen.into_inner().unwrap(), vec![0.5, 1.0]);
        assert_eq!(p.results()[1].image().unwrap().source_mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn reconvert_at_same_quality_is_stable() {
        let mut p = processor();
        p.run_batch(vec![png_file("a.png", 32, 32), png_file("b.png", 20, 40)], &NoopProgressSink).await;
        let before: Vec<f64> = p.results().iter().filter_map(|r| r.reduction_percent()).collect();

        p.reconvert_all(&NoopProgressSink).await;
        let after: Vec<f64> = p.results().iter().filter_map(|r| r.reduction_percent()).collect();

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert!((b - a).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn reconvert_of_empty_session_is_a_no_op() {
        let mut p = processor();
        let report = p.reconvert_all(&NoopProgressSink).await;
        assert_eq!(report.processed, 0);
        assert_eq!(p.state().phase(), SessionPhase::Empty);
    }

    #[tokio::test]
    async fn remove_download_and_clear() {
        let mut p = processor();
        p.run_batch(vec![png_file("a.png", 8, 8), corrupt_file("bad.png")], &NoopProgressSink).await;

        let download = p.download_single(0).unwrap();
        assert_eq!(download.filename, "a.webp");
        assert_eq!(&download.data[..4], b"RIFF");
        assert!(matches!(
            p.download_single(1),
            Err(ConverterError::Validation(ValidationError::NotConverted(1)))
        ));
        assert!(p.download_single(2).is_err());

        let removed = p.remove_image(1).unwrap();
        assert_eq!(removed.filename, "bad.png");
        assert_eq!(p.results().len(), 1);
        assert!(p.remove_image(5).is_err());

        p.clear_all();
        assert!(p.results().is_empty());
        assert_eq!(p.state().progress(), 0.0);
        assert_eq!(p.state().advisory(), None);
        assert_eq!(p.state().phase(), SessionPhase::Empty);
    }

    #[tokio::test]
    async fn archive_holds_only_converted_items() {
        let mut p = processor();
        p.run_batch(vec![png_file("a.png", 8, 8), corrupt_file("b.png")], &NoopProgressSink).await;

        let archive = p.export_archive().unwrap();
        let zip = zip::ZipArchive::new(std::io::Cursor::new(archive)).unwrap();
        let names: Vec<_> = zip.file_names().collect();
        assert_eq!(names, vec!["a.webp"]);
    }

    #[test]
    fn quality_must_stay_in_range() {
        let mut p = processor();
        assert!(p.set_quality(9).is_err());
        assert!(p.set_quality(101).is_err());
        assert_eq!(p.state().quality(), 80);
        p.set_quality(10).unwrap();
        assert_eq!(p.state().quality(), 10);
    }
}
