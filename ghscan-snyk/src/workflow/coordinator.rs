//! Pipeline coordinator
//!
//! Fan-out: one task per repository. Fan-in: a bounded handoff drained by a
//! single writer task. The run ends only after every worker has finished and
//! the writer has persisted (or failed to persist) every outcome they sent.

use super::{RepositoryWorker, ResultWriter};
use crate::db::{ImportRecordStore, PgImportStore, RepositoryInventory, ScanResultSource};
use crate::error::{ImporterError, ImporterResult};
use crate::models::RunSummary;
use crate::services::{RateGate, SnykClient};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Outcomes buffered between workers and the writer
pub const DEFAULT_HANDOFF_CAPACITY: usize = 100;

/// Orchestrates one import run
pub struct Pipeline {
    inventory: Arc<dyn RepositoryInventory>,
    scan_results: Arc<dyn ScanResultSource>,
    store: Arc<dyn ImportRecordStore>,
    client: Arc<SnykClient>,
    gate: Arc<RateGate>,
    handoff_capacity: usize,
}

impl Pipeline {
    pub fn new(
        inventory: Arc<dyn RepositoryInventory>,
        scan_results: Arc<dyn ScanResultSource>,
        store: Arc<dyn ImportRecordStore>,
        client: SnykClient,
        gate: RateGate,
    ) -> Self {
        Self {
            inventory,
            scan_results,
            store,
            client: Arc::new(client),
            gate: Arc::new(gate),
            handoff_capacity: DEFAULT_HANDOFF_CAPACITY,
        }
    }

    /// Pipeline whose three store roles share one PostgreSQL pool
    pub fn with_pg_store(store: PgImportStore, client: SnykClient, gate: RateGate) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, client, gate)
    }

    /// Handoff capacity; values below 1 are raised to 1
    pub fn with_handoff_capacity(mut self, capacity: usize) -> Self {
        self.handoff_capacity = capacity.max(1);
        self
    }

    /// Execute a full run
    ///
    /// Fails only when the inventory cannot be loaded (before any worker
    /// starts) or when the writer task dies. Per-repository and per-file
    /// failures are reported through the summary and the result store.
    pub async fn run(&self, cancel: CancellationToken) -> ImporterResult<RunSummary> {
        let run_id = Uuid::new_v4();
        self.run_inner(cancel)
            .instrument(info_span!("import_run", %run_id))
            .await
    }

    async fn run_inner(&self, cancel: CancellationToken) -> ImporterResult<RunSummary> {
        let repos = self
            .inventory
            .active_repositories()
            .await
            .map_err(|e| ImporterError::Inventory(e.to_string()))?;

        info!(
            repositories = repos.len(),
            rate_interval = ?self.gate.interval(),
            rate_burst = self.gate.burst(),
            "Starting Snyk import run"
        );

        let mut summary = RunSummary {
            repositories: repos.len(),
            ..Default::default()
        };

        let (handoff_tx, handoff_rx) = mpsc::channel(self.handoff_capacity);

        let writer = tokio::spawn(
            ResultWriter::new(Arc::clone(&self.store), handoff_rx)
                .run()
                .instrument(info_span!("result_writer")),
        );

        let mut workers = JoinSet::new();
        for repo in repos {
            let span = info_span!("repo_worker", repo = %repo.full_name());
            let worker = RepositoryWorker::new(
                repo,
                Arc::clone(&self.scan_results),
                Arc::clone(&self.client),
                Arc::clone(&self.gate),
                handoff_tx.clone(),
                cancel.clone(),
            );
            workers.spawn(worker.run().instrument(span));
        }

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(report) => summary.add_worker(&report),
                Err(e) => {
                    error!(error = %e, "{}", join_failure(&e));
                    summary.workers_failed += 1;
                }
            }
        }

        // Last sender; closing it lets the writer drain and exit
        drop(handoff_tx);

        let written = writer
            .await
            .map_err(|e| ImporterError::Writer(e.to_string()))?;
        summary.persisted = written.persisted;
        summary.persist_failures = written.failed;
        summary.cancelled |= cancel.is_cancelled();

        info!(
            repositories = summary.repositories,
            submitted = summary.submitted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            persisted = summary.persisted,
            persist_failures = summary.persist_failures,
            workers_failed = summary.workers_failed,
            cancelled = summary.cancelled,
            "Snyk import run complete"
        );

        Ok(summary)
    }
}

fn join_failure(e: &JoinError) -> &'static str {
    if e.is_panic() {
        "Repository worker panicked"
    } else {
        "Repository worker was aborted"
    }
}
