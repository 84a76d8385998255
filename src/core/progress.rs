//! Progress notification seam between executors and the user.

use serde::{Deserialize, Serialize};

/// Message strings bound to one executor invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSet {
    pub progress_msg: String,
    pub success_msg: String,
    pub error_msg: String,
}

impl MessageSet {
    pub fn new(
        progress: impl Into<String>,
        success: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            progress_msg: progress.into(),
            success_msg: success.into(),
            error_msg: error.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressEventKind {
    Progress,
    Success,
    Error,
}

/// Sink for progress notifications emitted while a recipe runs.
///
/// Implementations must not fail; notification is best-effort and never
/// affects sequencing.
pub trait ProgressSink {
    fn notify(&self, kind: ProgressEventKind, message: &str);
}

/// Writes notifications to stderr when it is a terminal.
pub struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn notify(&self, kind: ProgressEventKind, message: &str) {
        match kind {
            ProgressEventKind::Progress => crate::log_status!("run", "{}", message),
            ProgressEventKind::Success => crate::log_status!("ok", "{}", message),
            ProgressEventKind::Error => crate::log_status!("err", "{}", message),
        }
    }
}

/// Discards every notification. Used by tests and `--quiet`.
pub struct SilentProgress;

impl ProgressSink for SilentProgress {
    fn notify(&self, _kind: ProgressEventKind, _message: &str) {}
}

/// Sleep between notifications. Pacing only throttles the UI; it never
/// retries or reattempts work.
pub fn throttle(delay_secs: u64, enabled: bool) {
    if enabled && delay_secs > 0 {
        std::thread::sleep(std::time::Duration::from_secs(delay_secs));
    }
}
