//! Snyk import API client
//!
//! One `POST /import/git` per (repository, file). The client is stateless
//! apart from its HTTP connection pool and never retries; pacing belongs to
//! the shared [`RateGate`](super::RateGate) and retry policy to the caller.

use crate::error::{ImporterError, ImporterResult};
use crate::models::Repository;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://snyk.io/api/v1";
const USER_AGENT: &str = concat!("ghscan-snyk/", env!("CARGO_PKG_VERSION"));
/// Per-call bound, independent of rate gate pacing
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single submission
///
/// The `Display` text is what lands in `snyk_imports.error_message`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Snyk API returned status: {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Serialize)]
struct ImportPayload<'a> {
    target: ImportTarget<'a>,
    files: [ImportFile<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ImportTarget<'a> {
    owner: &'a str,
    name: &'a str,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct ImportFile<'a> {
    path: &'a str,
}

/// Snyk API client
pub struct SnykClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl fmt::Debug for SnykClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnykClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SnykClient {
    /// Create a client for `base_url` (e.g. `https://snyk.io/api/v1`)
    pub fn new(base_url: &str, token: String, timeout: Duration) -> ImporterResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ImporterError::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Submit one manifest of `repo` for import on its default branch
    ///
    /// Only HTTP 200 and 201 count as success.
    pub async fn import_file(&self, repo: &Repository, file_path: &str) -> Result<(), SubmitError> {
        let payload = ImportPayload {
            target: ImportTarget {
                owner: &repo.owner,
                name: &repo.name,
                branch: &repo.branch,
            },
            files: [ImportFile { path: file_path }],
        };
        let url = format!("{}/import/git", self.base_url);

        tracing::debug!(
            owner = %repo.owner,
            name = %repo.name,
            file_path = %file_path,
            "Submitting Snyk import"
        );

        let response = self
            .http_client
            .post(&url)
            .header(AUTHORIZATION, format!("token {}", self.token))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(
            status = status.as_u16(),
            body = %body,
            "Snyk import rejected"
        );

        Err(SubmitError::Status(status.as_u16()))
    }
}
