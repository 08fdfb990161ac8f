//! Core session types and state management.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`AppState`]: Shared handle to a conversion session
//! - [`BatchState`]: Results, quality and progress of a session
//! - [`SourceFile`]: One file handed to a batch
//! - [`ConversionResult`]: Outcome of converting a single file
//! - [`Progress`]: Progress updates emitted between items

mod state;
mod types;
mod task;
mod progress;

pub use state::{AppState, BatchAdvisory, BatchState, SessionPhase, StateSnapshot};
pub use types::{ConversionOutcome, ConversionResult, ConvertedImage, ResultSnapshot, reduction_percent};
pub use task::{SourceData, SourceFile};
pub use progress::{NoopProgressSink, Progress, ProgressSink, ProgressType};
