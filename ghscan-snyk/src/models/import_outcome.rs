//! Import outcomes and their persisted form

use super::Repository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of one (repository, file) submission attempt
///
/// Built by a repository worker right after the attempt, success or failure,
/// and consumed exactly once by the result writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub repo_id: i32,
    pub owner: String,
    pub name: String,
    pub file_path: String,
    pub success: bool,
    /// Set only when `success` is false
    pub error_message: Option<String>,
    pub imported_at: DateTime<Utc>,
}

impl ImportOutcome {
    /// Outcome for a submission that returned `result`, stamped now (UTC)
    pub fn from_result<E: std::fmt::Display>(
        repo: &Repository,
        file_path: &str,
        result: &Result<(), E>,
    ) -> Self {
        Self {
            repo_id: repo.id,
            owner: repo.owner.clone(),
            name: repo.name.clone(),
            file_path: file_path.to_string(),
            success: result.is_ok(),
            error_message: result.as_ref().err().map(|e| e.to_string()),
            imported_at: Utc::now(),
        }
    }

    /// Natural key of the persisted record
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.owner, &self.name, &self.file_path)
    }
}

/// Row of `snyk_imports`: the latest status per (owner, name, file_path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    pub id: i32,
    pub repo_id: i32,
    pub repo_owner: String,
    pub repo_name: String,
    pub file_path: String,
    pub success: bool,
    pub error_message: Option<String>,
    pub imported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_error_message() {
        let repo = Repository::new(1, "acme", "api", "main");
        let outcome = ImportOutcome::from_result::<String>(&repo, "go.mod", &Ok(()));

        assert!(outcome.success);
        assert_eq!(outcome.error_message, None);
        assert_eq!(outcome.key(), ("acme", "api", "go.mod"));
        assert_eq!(outcome.repo_id, 1);
    }

    #[test]
    fn test_failure_keeps_error_text() {
        let repo = Repository::new(1, "acme", "api", "main");
        let result: Result<(), String> = Err("Snyk API returned status: 500".to_string());
        let outcome = ImportOutcome::from_result(&repo, "package.json", &result);

        assert!(!outcome.success);
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("Snyk API returned status: 500")
        );
    }
}
