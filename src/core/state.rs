//! Batch state and the shared session handle.

use std::fmt;
use std::sync::Arc;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::core::{ConversionResult, NoopProgressSink, ProgressSink, ResultSnapshot};
use crate::processing::{BatchConfig, BatchProcessor};

/// Where a conversion session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    /// No results held
    Empty,
    /// A run is draining; no other run may start
    Processing,
    /// Results held, nothing running
    Idle,
}

/// Batch-level condition reported once per run, separate from item errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BatchAdvisory {
    /// Nothing survived the mime-type filter; the run did no work
    NoValidInput,
    /// The input was truncated to `max` items and the run went ahead
    LimitExceeded { max: usize },
}

impl BatchAdvisory {
    /// True when the advisory stopped the run.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::NoValidInput)
    }
}

impl fmt::Display for BatchAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoValidInput => write!(f, "No valid JPG/PNG images selected."),
            Self::LimitExceeded { max } => write!(
                f,
                "Exceeded limit: Only the first {max} images will be processed."
            ),
        }
    }
}

/// Everything a conversion session holds between runs.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchState {
    pub(crate) results: Vec<ConversionResult>,
    pub(crate) quality: u8,
    pub(crate) progress: f64,
    pub(crate) phase: SessionPhase,
    pub(crate) advisory: Option<BatchAdvisory>,
}

impl BatchState {
    pub fn new(quality: u8) -> Self {
        Self {
            results: Vec::new(),
            quality,
            progress: 0.0,
            phase: SessionPhase::Empty,
            advisory: None,
        }
    }

    pub fn results(&self) -> &[ConversionResult] {
        &self.results
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Completed share of the current or last run, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn advisory(&self) -> Option<BatchAdvisory> {
        self.advisory
    }

    /// Copies everything but the image buffers.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            results: self.results.iter().map(ResultSnapshot::from).collect(),
            quality: self.quality,
            progress: self.progress,
            phase: self.phase,
            advisory: self.advisory,
        }
    }

    /// Phase to settle in once nothing is running.
    pub(crate) fn settled_phase(&self) -> SessionPhase {
        if self.results.is_empty() {
            SessionPhase::Empty
        } else {
            SessionPhase::Idle
        }
    }
}

/// Buffer-free copy of a [`BatchState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub results: Vec<ResultSnapshot>,
    pub quality: u8,
    pub progress: f64,
    pub phase: SessionPhase,
    pub advisory: Option<BatchAdvisory>,
}

/// Shared handle to one conversion session.
///
/// Clones share the same processor; callers are serialized by an async mutex
/// so at most one run is in flight.
///
/// A run holds the lock from its first item to its last. Anything else that
/// goes through [`AppState::processor`] waits for the run to finish, so it
/// only ever sees a settled session: never [`SessionPhase::Processing`] and
/// never a partial `progress`. Mid-run progress reaches the outside only
/// through the [`ProgressSink`].
#[derive(Clone)]
pub struct AppState {
    processor: Arc<Mutex<BatchProcessor>>,
    sink: Arc<dyn ProgressSink>,
}

impl AppState {
    /// Creates a session with no progress observer.
    pub fn new(config: BatchConfig) -> Self {
        Self::with_progress_sink(config, Arc::new(NoopProgressSink))
    }

    pub fn with_progress_sink(config: BatchConfig, sink: Arc<dyn ProgressSink>) -> Self {
        debug!(
            "Session created (quality: {}, max files: {})",
            config.quality, config.max_files
        );
        Self {
            processor: Arc::new(Mutex::new(BatchProcessor::new(config))),
            sink,
        }
    }

    /// Waits for any in-flight run and takes exclusive access to the processor.
    pub async fn processor(&self) -> MutexGuard<'_, BatchProcessor> {
        self.processor.lock().await
    }

    pub fn progress_sink(&self) -> &dyn ProgressSink {
        self.sink.as_ref()
    }
}
