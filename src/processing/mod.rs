//! The conversion pipeline.
//!
//! - [`transcoder`]: decodes one image and re-encodes it as WebP.
//! - [`batch`]: runs transcodes over a bounded file list and owns the results.
//! - [`archive`]: packs converted images into a ZIP archive.

pub mod archive;
pub mod batch;
pub mod transcoder;

pub use archive::{export_zip, output_entries};
pub use batch::{
    BatchConfig, BatchProcessor, BatchReport, BatchSummary, Download, average_reduction,
    total_savings,
};
pub use transcoder::{transcode, try_transcode};
