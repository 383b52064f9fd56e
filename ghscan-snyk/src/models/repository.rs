//! Repository inventory snapshot and per-repository candidate files

use serde::{Deserialize, Serialize};

/// Active repository as listed in the inventory
///
/// Read once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: i32,
    pub owner: String,
    pub name: String,
    /// Default branch imported into Snyk
    pub branch: String,
}

impl Repository {
    pub fn new(
        id: i32,
        owner: impl Into<String>,
        name: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            id,
            owner: owner.into(),
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// `owner/name` for log lines
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Dependency manifest discovered by an earlier scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateFile {
    pub path: String,
    /// Manifest kind recorded by the scanner (e.g. "go.mod", "npm")
    pub file_type: String,
}

impl CandidateFile {
    pub fn new(path: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_type: file_type.into(),
        }
    }
}
