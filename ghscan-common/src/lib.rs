//! # GitHub Scan Common Library
//!
//! Shared code for the github-scan tools including:
//! - Error and result types
//! - TOML bootstrap configuration and config file location
//! - PostgreSQL connection settings and pool initialization

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
