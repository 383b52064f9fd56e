//! Shared test fixtures: in-memory scan store and Snyk mock helpers

#![allow(dead_code)]

use async_trait::async_trait;
use ghscan_snyk::db::{ImportRecordStore, RepositoryInventory, ScanResultSource};
use ghscan_snyk::models::{CandidateFile, ImportOutcome, ImportRecord, Repository};
use ghscan_snyk::services::{RateGate, SnykClient};
use ghscan_snyk::Pipeline;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

type Key = (String, String, String);

/// In-memory stand-in for the scan database
///
/// Mirrors the `snyk_imports` upsert contract: one row per
/// (owner, name, file_path), later writes overwrite status fields.
#[derive(Default)]
pub struct MemoryStore {
    repos: Vec<Repository>,
    files: HashMap<(String, String), Vec<CandidateFile>>,
    failing_queries: HashSet<(String, String)>,
    failing_writes: HashSet<String>,
    fail_inventory: bool,
    rows: Mutex<HashMap<Key, ImportRecord>>,
    arrivals: Mutex<Vec<Key>>,
    next_id: AtomicI32,
    upsert_attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repo(mut self, repo: Repository, paths: &[&str]) -> Self {
        let files = paths
            .iter()
            .map(|p| CandidateFile::new(*p, "manifest"))
            .collect();
        self.files
            .insert((repo.owner.clone(), repo.name.clone()), files);
        self.repos.push(repo);
        self
    }

    /// Scan-results query for `owner/name` fails
    pub fn fail_query_for(mut self, owner: &str, name: &str) -> Self {
        self.failing_queries
            .insert((owner.to_string(), name.to_string()));
        self
    }

    /// Upserts of `file_path` fail
    pub fn fail_write_for(mut self, file_path: &str) -> Self {
        self.failing_writes.insert(file_path.to_string());
        self
    }

    pub fn fail_inventory(mut self) -> Self {
        self.fail_inventory = true;
        self
    }

    pub fn record(&self, owner: &str, name: &str, file_path: &str) -> Option<ImportRecord> {
        self.rows
            .lock()
            .unwrap()
            .get(&(owner.to_string(), name.to_string(), file_path.to_string()))
            .cloned()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn upsert_attempts(&self) -> usize {
        self.upsert_attempts.load(Ordering::SeqCst)
    }

    /// File paths of `owner/name` in the order the writer delivered them
    pub fn arrival_order(&self, owner: &str, name: &str) -> Vec<String> {
        self.arrivals
            .lock()
            .unwrap()
            .iter()
            .filter(|(o, n, _)| o == owner && n == name)
            .map(|(_, _, p)| p.clone())
            .collect()
    }
}

fn injected(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("injected failure: {}", what))
}

#[async_trait]
impl RepositoryInventory for MemoryStore {
    async fn active_repositories(&self) -> sqlx::Result<Vec<Repository>> {
        if self.fail_inventory {
            return Err(injected("inventory"));
        }
        Ok(self.repos.clone())
    }
}

#[async_trait]
impl ScanResultSource for MemoryStore {
    async fn candidate_files(&self, owner: &str, name: &str) -> sqlx::Result<Vec<CandidateFile>> {
        let key = (owner.to_string(), name.to_string());
        if self.failing_queries.contains(&key) {
            return Err(injected("scan_results"));
        }
        Ok(self.files.get(&key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ImportRecordStore for MemoryStore {
    async fn upsert_import(&self, outcome: &ImportOutcome) -> sqlx::Result<()> {
        self.upsert_attempts.fetch_add(1, Ordering::SeqCst);
        let key = (
            outcome.owner.clone(),
            outcome.name.clone(),
            outcome.file_path.clone(),
        );
        self.arrivals.lock().unwrap().push(key.clone());

        if self.failing_writes.contains(&outcome.file_path) {
            return Err(injected("upsert"));
        }

        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&key) {
            Some(row) => {
                row.success = outcome.success;
                row.error_message = outcome.error_message.clone();
                row.imported_at = outcome.imported_at;
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                rows.insert(
                    key,
                    ImportRecord {
                        id,
                        repo_id: outcome.repo_id,
                        repo_owner: outcome.owner.clone(),
                        repo_name: outcome.name.clone(),
                        file_path: outcome.file_path.clone(),
                        success: outcome.success,
                        error_message: outcome.error_message.clone(),
                        imported_at: outcome.imported_at,
                    },
                );
            }
        }
        Ok(())
    }
}

/// Gate that never gets in the way of functional tests
pub fn fast_gate() -> RateGate {
    RateGate::new(Duration::from_millis(1), 1000).unwrap()
}

pub fn client_for(server: &MockServer) -> SnykClient {
    SnykClient::new(
        &format!("{}/api/v1", server.uri()),
        "snyk-test-token".to_string(),
        Duration::from_secs(5),
    )
    .unwrap()
}

pub fn pipeline(store: &Arc<MemoryStore>, server: &MockServer, gate: RateGate) -> Pipeline {
    Pipeline::new(
        store.clone(),
        store.clone(),
        store.clone(),
        client_for(server),
        gate,
    )
}

/// Answer imports of `file_path` with `status`
pub async fn respond_for_file(server: &MockServer, file_path: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/v1/import/git"))
        .and(body_partial_json(json!({ "files": [{ "path": file_path }] })))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answer every import with `status`
pub async fn respond_all(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path("/api/v1/import/git"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn import_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|r| r.len())
        .unwrap_or(0)
}

/// Responder that notes when each import request reached the server
///
/// Entries are `(arrival, "owner/name")`; every request gets `201` after
/// `delay`.
#[derive(Clone, Default)]
pub struct ArrivalLog {
    delay: Duration,
    arrivals: Arc<Mutex<Vec<(Instant, String)>>>,
}

impl ArrivalLog {
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    pub async fn mount(&self, server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/v1/import/git"))
            .respond_with(self.clone())
            .mount(server)
            .await;
    }

    pub fn arrivals(&self) -> Vec<(Instant, String)> {
        let mut arrivals = self.arrivals.lock().unwrap().clone();
        arrivals.sort_by_key(|(at, _)| *at);
        arrivals
    }
}

impl Respond for ArrivalLog {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = request.body_json().unwrap_or_default();
        let repo = format!(
            "{}/{}",
            body["target"]["owner"].as_str().unwrap_or_default(),
            body["target"]["name"].as_str().unwrap_or_default()
        );
        self.arrivals.lock().unwrap().push((Instant::now(), repo));
        ResponseTemplate::new(201).set_delay(self.delay)
    }
}
