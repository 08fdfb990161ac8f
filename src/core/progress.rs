use serde::{Deserialize, Serialize};

/// Progress message type
#[derive(Debug, Deserialize, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ProgressType {
    Start,
    Progress,
    Complete,
}

/// Progress update emitted by the batch processor between items
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Progress type (start, progress, complete)
    pub progress_type: ProgressType,
    /// Number of completed items
    pub completed_tasks: usize,
    /// Total number of items in this run
    pub total_tasks: usize,
    /// Progress percentage (0-100)
    pub progress_percentage: usize,
    /// Current status message
    pub status: String,
    /// Name of the item that just finished, if any
    #[serde(default)]
    pub file_name: Option<String>,
    /// Error message for the item that just finished
    #[serde(default)]
    pub error: Option<String>,
}

impl Progress {
    /// Create a new Progress instance with basic information
    pub fn new(
        progress_type: ProgressType,
        completed_tasks: usize,
        total_tasks: usize,
        status: &str,
    ) -> Self {
        let progress_percentage = if total_tasks > 0 {
            (completed_tasks * 100) / total_tasks
        } else {
            0
        };

        Self {
            progress_type,
            completed_tasks,
            total_tasks,
            progress_percentage,
            status: status.to_string(),
            file_name: None,
            error: None,
        }
    }

    /// Completed share of the run in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        self.completed_tasks as f64 / self.total_tasks as f64
    }

    pub fn with_file(mut self, file_name: &str, error: Option<String>) -> Self {
        self.file_name = Some(file_name.to_string());
        self.error = error;
        self
    }
}

/// Observer for progress updates.
///
/// Called synchronously between items, so an implementation sees every
/// update in order.
pub trait ProgressSink: Send + Sync {
    fn emit(&self, progress: &Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(&Progress) + Send + Sync,
{
    fn emit(&self, progress: &Progress) {
        self(progress)
    }
}

/// Sink that drops every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _progress: &Progress) {}
}
