mod config;
mod metrics;
mod processor;

pub use config::{BatchConfig, DEFAULT_ARCHIVE_NAME, DEFAULT_QUALITY, MAX_FILES};
pub use metrics::{BatchSummary, average_reduction, total_savings};
pub use processor::{BatchProcessor, BatchReport, Download};
