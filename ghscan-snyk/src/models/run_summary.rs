//! Per-worker and per-run counters

use serde::{Deserialize, Serialize};

/// What one repository worker did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerReport {
    /// Candidate files returned by the scan-results query
    pub files_seen: usize,
    /// Files actually sent to Snyk (one outcome each)
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Stopped by the run's cancellation signal
    pub cancelled: bool,
    /// The scan-results query failed, so no file was processed
    pub query_failed: bool,
}

/// Totals for one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub repositories: usize,
    /// Workers that ended early through a query failure or a panic
    pub workers_failed: usize,
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub persisted: usize,
    pub persist_failures: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub fn add_worker(&mut self, report: &WorkerReport) {
        self.submitted += report.submitted;
        self.succeeded += report.succeeded;
        self.failed += report.failed;
        if report.query_failed {
            self.workers_failed += 1;
        }
        self.cancelled |= report.cancelled;
    }

    /// Every outcome produced reached the store
    pub fn fully_persisted(&self) -> bool {
        self.persist_failures == 0 && self.persisted == self.submitted
    }
}
