//! Run configuration for ghscan-snyk
//!
//! Built once at startup and passed into each component; nothing here is
//! global. Priority per setting: CLI flag → environment → TOML → default.
//! Credentials come from the environment only (the database user and
//! password may also come from TOML).

use crate::error::{ImporterError, ImporterResult};
use crate::services::{rate_gate, snyk_client, SnykClient};
use crate::workflow::DEFAULT_HANDOFF_CAPACITY;
use clap::Parser;
use ghscan_common::config::TomlConfig;
use ghscan_common::db::{DatabaseConfig, DEFAULT_DB_NAME, DEFAULT_HOST, DEFAULT_PORT};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const SNYK_TOKEN_VAR: &str = "SNYK_TOKEN";
pub const DB_USER_VAR: &str = "POSTGRES_USER";
pub const DB_PASSWORD_VAR: &str = "POSTGRES_PASSWORD";

/// Command-line arguments for ghscan-snyk
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "ghscan-snyk")]
#[command(about = "Import scanned dependency manifests into Snyk")]
#[command(version)]
pub struct Args {
    /// TOML config file (default: <config dir>/ghscan/config.toml)
    #[arg(short, long, env = "GHSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database host
    #[arg(long, env = "GHSCAN_DB_HOST")]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = "GHSCAN_DB_PORT")]
    pub db_port: Option<u16>,

    /// Database name
    #[arg(long, env = "GHSCAN_DB_NAME")]
    pub db_name: Option<String>,

    /// Snyk API base URL
    #[arg(long, env = "SNYK_API_URL")]
    pub snyk_url: Option<String>,

    /// Milliseconds between rate gate permits
    #[arg(long)]
    pub rate_interval_ms: Option<u64>,

    /// Maximum burst of Snyk submissions
    #[arg(long)]
    pub rate_burst: Option<u32>,
}

/// API tokens required before any work starts
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Validated for presence only; the import path does not use it
    pub github_token: String,
    pub snyk_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials { .. }")
    }
}

impl Credentials {
    /// Read both tokens from the process environment
    pub fn from_env() -> ImporterResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ImporterResult<Self> {
        Ok(Self {
            github_token: required(&lookup, GITHUB_TOKEN_VAR)?,
            snyk_token: required(&lookup, SNYK_TOKEN_VAR)?,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> ImporterResult<String> {
    lookup(key)
        .filter(|v| is_valid_value(v))
        .ok_or(ImporterError::MissingCredential(key))
}

/// Non-empty, non-whitespace
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Everything a run needs, resolved once
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    pub credentials: Credentials,
    pub database: DatabaseConfig,
    pub snyk_api_url: String,
    pub rate_interval: Duration,
    pub rate_burst: u32,
    pub handoff_capacity: usize,
}

impl ImporterConfig {
    /// Resolve against the process environment
    pub fn from_env(args: &Args, toml: &TomlConfig) -> ImporterResult<Self> {
        Self::resolve(args, toml, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup
    ///
    /// Credentials are checked first so a missing token fails before any
    /// other setting is looked at.
    pub fn resolve(
        args: &Args,
        toml: &TomlConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> ImporterResult<Self> {
        let credentials = Credentials::from_lookup(&env)?;

        let user = env(DB_USER_VAR)
            .filter(|v| is_valid_value(v))
            .or_else(|| toml.database.user.clone().filter(|v| is_valid_value(v)))
            .ok_or(ImporterError::MissingCredential(DB_USER_VAR))?;
        let password = env(DB_PASSWORD_VAR)
            .or_else(|| toml.database.password.clone())
            .unwrap_or_default();

        let database = DatabaseConfig {
            host: args
                .db_host
                .clone()
                .or_else(|| toml.database.host.clone())
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.db_port.or(toml.database.port).unwrap_or(DEFAULT_PORT),
            name: args
                .db_name
                .clone()
                .or_else(|| toml.database.name.clone())
                .unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            user,
            password,
        };

        let snyk_api_url = args
            .snyk_url
            .clone()
            .or_else(|| toml.snyk.api_url.clone())
            .unwrap_or_else(|| snyk_client::DEFAULT_BASE_URL.to_string());

        let rate_interval = args
            .rate_interval_ms
            .or(toml.snyk.rate_interval_ms)
            .map(Duration::from_millis)
            .unwrap_or(rate_gate::DEFAULT_INTERVAL);
        let rate_burst = args
            .rate_burst
            .or(toml.snyk.rate_burst)
            .unwrap_or(rate_gate::DEFAULT_BURST);
        let handoff_capacity = toml
            .pipeline
            .handoff_capacity
            .unwrap_or(DEFAULT_HANDOFF_CAPACITY);

        if rate_interval.is_zero() {
            return Err(ImporterError::Config("rate interval must be > 0".to_string()));
        }
        if rate_burst == 0 {
            return Err(ImporterError::Config("rate burst must be > 0".to_string()));
        }
        if handoff_capacity == 0 {
            return Err(ImporterError::Config("handoff capacity must be > 0".to_string()));
        }

        Ok(Self {
            credentials,
            database,
            snyk_api_url,
            rate_interval,
            rate_burst,
            handoff_capacity,
        })
    }

    /// Snyk client for this run, bounded by the fixed per-call timeout
    pub fn snyk_client(&self) -> ImporterResult<SnykClient> {
        SnykClient::new(
            &self.snyk_api_url,
            self.credentials.snyk_token.clone(),
            snyk_client::DEFAULT_TIMEOUT,
        )
    }
}
