//! Per-repository import worker

use crate::db::ScanResultSource;
use crate::models::{ImportOutcome, Repository, WorkerReport};
use crate::services::{RateGate, SnykClient};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Imports every candidate file of one repository
///
/// Files are processed one after another, so a worker never has two
/// submissions for the same key in flight.
pub struct RepositoryWorker {
    repo: Repository,
    scan_results: Arc<dyn ScanResultSource>,
    client: Arc<SnykClient>,
    gate: Arc<RateGate>,
    handoff: mpsc::Sender<ImportOutcome>,
    cancel: CancellationToken,
}

impl RepositoryWorker {
    pub fn new(
        repo: Repository,
        scan_results: Arc<dyn ScanResultSource>,
        client: Arc<SnykClient>,
        gate: Arc<RateGate>,
        handoff: mpsc::Sender<ImportOutcome>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            repo,
            scan_results,
            client,
            gate,
            handoff,
            cancel,
        }
    }

    /// Run to completion, cancellation or a closed handoff
    pub async fn run(self) -> WorkerReport {
        let mut report = WorkerReport::default();

        let files = match self
            .scan_results
            .candidate_files(&self.repo.owner, &self.repo.name)
            .await
        {
            Ok(files) => files,
            Err(e) => {
                error!(
                    repo = %self.repo.full_name(),
                    error = %e,
                    "Scan results query failed, skipping repository"
                );
                report.query_failed = true;
                return report;
            }
        };

        report.files_seen = files.len();
        debug!(repo = %self.repo.full_name(), files = files.len(), "Worker started");

        for file in &files {
            if self.gate.acquire(&self.cancel).await.is_err() {
                info!(
                    repo = %self.repo.full_name(),
                    remaining = files.len() - report.submitted,
                    "Run cancelled, stopping worker"
                );
                report.cancelled = true;
                break;
            }

            let result = self.client.import_file(&self.repo, &file.path).await;
            let outcome = ImportOutcome::from_result(&self.repo, &file.path, &result);

            report.submitted += 1;
            match &result {
                Ok(()) => {
                    report.succeeded += 1;
                    debug!(repo = %self.repo.full_name(), file_path = %file.path, "Imported");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        repo = %self.repo.full_name(),
                        file_path = %file.path,
                        error = %e,
                        "Snyk import failed"
                    );
                }
            }

            if self.handoff.send(outcome).await.is_err() {
                warn!(
                    repo = %self.repo.full_name(),
                    "Result handoff closed, stopping worker"
                );
                break;
            }
        }

        report
    }
}
