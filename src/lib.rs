// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod processing;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Public exports for external consumers
pub use crate::core::{
    AppState, BatchAdvisory, BatchState, ConversionResult, Progress, ProgressSink, SourceFile,
    StateSnapshot,
};
pub use crate::processing::{BatchConfig, BatchProcessor, BatchReport, BatchSummary};
pub use crate::utils::{ConverterError, ConverterResult, TranscodeError};
pub use crate::commands::*;

// This library file is used as a public API for consuming this crate as a library.
// The command-line entry point is in main.rs.
