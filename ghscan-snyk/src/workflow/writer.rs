//! Single consumer of the outcome handoff

use crate::db::ImportRecordStore;
use crate::models::ImportOutcome;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// What the writer did before the handoff closed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterReport {
    pub received: usize,
    pub persisted: usize,
    pub failed: usize,
}

/// Persists outcomes in arrival order until every sender is gone
pub struct ResultWriter {
    store: Arc<dyn ImportRecordStore>,
    handoff: mpsc::Receiver<ImportOutcome>,
}

impl ResultWriter {
    pub fn new(store: Arc<dyn ImportRecordStore>, handoff: mpsc::Receiver<ImportOutcome>) -> Self {
        Self { store, handoff }
    }

    /// Drain the handoff; returns once it is closed and empty
    pub async fn run(mut self) -> WriterReport {
        let mut report = WriterReport::default();

        while let Some(outcome) = self.handoff.recv().await {
            report.received += 1;

            match self.store.upsert_import(&outcome).await {
                Ok(()) => {
                    report.persisted += 1;
                    debug!(
                        owner = %outcome.owner,
                        name = %outcome.name,
                        file_path = %outcome.file_path,
                        success = outcome.success,
                        "Import result written"
                    );
                }
                Err(e) => {
                    // Not retried within this run
                    report.failed += 1;
                    error!(
                        owner = %outcome.owner,
                        name = %outcome.name,
                        file_path = %outcome.file_path,
                        error = %e,
                        "Failed to write import result"
                    );
                }
            }
        }

        report
    }
}
