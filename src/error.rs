//! Error types for the plan comment tool.
//!
//! This module provides the error hierarchy for every stage of a run:
//! configuration, plan parsing and classification, report assembly, and
//! the GitHub comment transport.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the plan comment tool.
#[derive(Debug, Error)]
pub enum PlanCommentError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Plan parsing and classification errors.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// Report assembly errors.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// GitHub API errors.
    #[error("GitHub API error: {0}")]
    GitHub(#[from] GitHubError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The plan lookup directory does not exist.
    #[error("Plan directory not found: {path}")]
    DirectoryNotFound {
        /// Path to the missing directory.
        path: PathBuf,
    },

    /// No plan file matched the configured name.
    #[error("No plan file named '{file_name}' found under {dir} (max depth {max_depth})")]
    NoPlansFound {
        /// Directory that was searched.
        dir: PathBuf,
        /// File name that was looked up.
        file_name: String,
        /// Depth limit used for the search.
        max_depth: usize,
    },

    /// A .env file could not be loaded.
    #[error("Failed to load environment file {path}: {message}")]
    EnvFile {
        /// Path to the .env file.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Environment variable is missing.
    #[error("Missing environment variable: {name}")]
    MissingEnvVar {
        /// Name of the missing variable.
        name: String,
    },
}

/// Errors raised while reading, classifying or rendering one plan.
///
/// Every variant is fatal for the plan it occurred in.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The plan file could not be read.
    #[error("Failed to read plan {source_name}: {message}")]
    Read {
        /// Plan file the error refers to.
        source_name: String,
        /// Description of the read failure.
        message: String,
    },

    /// The plan document is not valid JSON or does not match the schema.
    #[error("Failed to parse plan {source_name}: {message}")]
    Parse {
        /// Plan file the error refers to.
        source_name: String,
        /// Description of the parse error.
        message: String,
    },

    /// The plan document has no `resource_changes` list.
    #[error("Plan {source_name} has no resource_changes list")]
    MissingResourceChanges {
        /// Plan file the error refers to.
        source_name: String,
    },

    /// A resource change carries an empty action list.
    #[error("Resource {address} has an empty action list")]
    EmptyActions {
        /// Address of the resource.
        address: String,
    },

    /// The first action verb of a resource change is not recognized.
    #[error("Resource {address} has unclassifiable action '{verb}'")]
    UnclassifiedAction {
        /// Address of the resource.
        address: String,
        /// The unrecognized verb.
        verb: String,
    },

    /// Attribute mappings could not be serialized for diffing.
    #[error("Failed to serialize attributes of {address}: {message}")]
    Serialization {
        /// Address of the resource.
        address: String,
        /// Description of the serialization error.
        message: String,
    },

    /// Wraps a per-resource error with the plan file it came from.
    #[error("{source_name}: {inner}")]
    InPlan {
        /// Plan file the error refers to.
        source_name: String,
        /// The underlying error.
        inner: Box<PlanError>,
    },
}

/// Report assembly errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The assembled report exceeds the maximum comment size.
    #[error("Report '{heading}' is {size} characters, exceeding the maximum of {max}")]
    TooLarge {
        /// Heading of the oversized report.
        heading: String,
        /// Actual size in characters.
        size: usize,
        /// Maximum allowed size in characters.
        max: usize,
    },
}

/// GitHub API errors.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Authentication failed.
    #[error("GitHub authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// API request failed.
    #[error("GitHub API request failed: {status} - {message}")]
    ApiRequestFailed {
        /// HTTP status code.
        status: u16,
        /// Error message from API.
        message: String,
    },

    /// Network error.
    #[error("Network error communicating with GitHub: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Invalid response from API.
    #[error("Invalid response from GitHub API: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// The pull request context could not be determined.
    #[error("Cannot determine pull request context: {message}")]
    MissingContext {
        /// What was missing.
        message: String,
    },

    /// Some reports could not be published.
    #[error("Failed to publish {failed} of {total} reports")]
    PublishFailed {
        /// Number of reports that failed.
        failed: usize,
        /// Number of reports attempted.
        total: usize,
    },
}

/// Result type alias for plan comment operations.
pub type Result<T> = std::result::Result<T, PlanCommentError>;

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl PlanError {
    /// Attaches the plan file name to a per-resource error.
    ///
    /// Errors that already name their plan are returned unchanged.
    #[must_use]
    pub fn in_plan(self, source_name: impl Into<String>) -> Self {
        match self {
            Self::Read { .. }
            | Self::Parse { .. }
            | Self::MissingResourceChanges { .. }
            | Self::InPlan { .. } => self,
            other => Self::InPlan {
                source_name: source_name.into(),
                inner: Box::new(other),
            },
        }
    }
}

impl GitHubError {
    /// Creates an API request error.
    #[must_use]
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiRequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates a missing-context error.
    #[must_use]
    pub fn missing_context(message: impl Into<String>) -> Self {
        Self::MissingContext {
            message: message.into(),
        }
    }
}
