//! Pull request context resolution.
//!
//! Reports are attached to one pull request, identified by owner, repository
//! and number. In GitHub Actions these come from `GITHUB_REPOSITORY` and the
//! event payload at `GITHUB_EVENT_PATH`.

use serde_json::Value;
use std::path::Path;
use tracing::debug;

use crate::error::{ConfigError, GitHubError, Result};

/// Environment variable holding `owner/repo`.
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";

/// Environment variable holding the path of the event payload.
pub const ENV_EVENT_PATH: &str = "GITHUB_EVENT_PATH";

/// The pull request reports are attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request (issue) number.
    pub number: u64,
}

impl PullRequestContext {
    /// Resolves the context from the environment.
    ///
    /// `number` takes precedence over the event payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or number cannot be determined.
    pub fn from_env(number: Option<u64>) -> Result<Self> {
        let repository = std::env::var(ENV_REPOSITORY).map_err(|_| ConfigError::MissingEnvVar {
            name: ENV_REPOSITORY.to_string(),
        })?;

        let number = match number {
            Some(n) => n,
            None => {
                let event_path = std::env::var(ENV_EVENT_PATH).map_err(|_| {
                    GitHubError::missing_context(format!(
                        "no pull request number given and {ENV_EVENT_PATH} is not set"
                    ))
                })?;
                Self::number_from_event_file(Path::new(&event_path))?
            }
        };

        Self::from_parts(&repository, number)
    }

    /// Builds the context from an `owner/repo` string and a number.
    ///
    /// # Errors
    ///
    /// Returns an error if `repository` is not of the form `owner/repo`.
    pub fn from_parts(repository: &str, number: u64) -> Result<Self> {
        let (owner, repo) = repository
            .split_once('/')
            .filter(|(owner, repo)| !owner.is_empty() && !repo.is_empty() && !repo.contains('/'))
            .ok_or_else(|| {
                GitHubError::missing_context(format!(
                    "repository '{repository}' is not of the form owner/repo"
                ))
            })?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        })
    }

    /// Reads the pull request number from an event payload file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or carries no number.
    pub fn number_from_event_file(path: &Path) -> Result<u64> {
        debug!("Reading event payload from: {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let event: Value = serde_json::from_str(&content).map_err(|e| {
            GitHubError::missing_context(format!("event payload is not valid JSON: {e}"))
        })?;

        Self::number_from_event(&event).ok_or_else(|| {
            GitHubError::missing_context("event payload has no pull request or issue number").into()
        })
    }

    /// Extracts the pull request number from an event payload.
    #[must_use]
    pub fn number_from_event(event: &Value) -> Option<u64> {
        event
            .pointer("/pull_request/number")
            .or_else(|| event.pointer("/issue/number"))
            .and_then(Value::as_u64)
    }
}

impl std::fmt::Display for PullRequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_from_parts() {
        let context = PullRequestContext::from_parts("acme/infra", 42).unwrap();
        assert_eq!(context.owner, "acme");
        assert_eq!(context.repo, "infra");
        assert_eq!(context.to_string(), "acme/infra#42");
    }

    #[test]
    fn test_from_parts_rejects_bad_repository() {
        for bad in ["acme", "/infra", "acme/", "acme/infra/extra"] {
            assert!(PullRequestContext::from_parts(bad, 1).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_number_from_pull_request_event() {
        let event = json!({"action": "synchronize", "pull_request": {"number": 7}});
        assert_eq!(PullRequestContext::number_from_event(&event), Some(7));
    }

    #[test]
    fn test_number_from_issue_comment_event() {
        let event = json!({"issue": {"number": 9}});
        assert_eq!(PullRequestContext::number_from_event(&event), Some(9));
    }

    #[test]
    fn test_number_missing_from_push_event() {
        let event = json!({"ref": "refs/heads/main"});
        assert_eq!(PullRequestContext::number_from_event(&event), None);
    }

    #[test]
    fn test_number_from_event_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("event.json");
        std::fs::write(&path, r#"{"pull_request": {"number": 12}}"#).unwrap();

        assert_eq!(PullRequestContext::number_from_event_file(&path).unwrap(), 12);
    }
}
