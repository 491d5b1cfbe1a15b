//! Plan document parser.
//!
//! This module loads plan documents from disk or from strings and reports
//! malformed input as per-plan errors.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{PlanError, Result};

use super::types::{PlanDocument, PlanVariable, ResourceChange};

/// On-disk shape of a plan, before required fields are checked.
#[derive(Debug, Deserialize)]
struct RawPlanDocument {
    #[serde(default)]
    variables: Option<BTreeMap<String, PlanVariable>>,
    #[serde(default)]
    resource_changes: Option<Vec<ResourceChange>>,
}

/// Parser for plan documents.
#[derive(Debug, Default)]
pub struct PlanParser;

impl PlanParser {
    /// Creates a new plan parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a plan document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<PlanDocument> {
        let path = path.as_ref();
        info!("Loading plan from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| PlanError::Read {
            source_name: path.display().to_string(),
            message: e.to_string(),
        })?;

        self.parse_json(&content, &path.display().to_string())
    }

    /// Parses a plan document from a JSON string.
    ///
    /// `source_name` identifies the plan in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or `resource_changes` is missing.
    pub fn parse_json(&self, content: &str, source_name: &str) -> Result<PlanDocument> {
        debug!("Parsing plan JSON from {source_name}");

        let raw: RawPlanDocument =
            serde_json::from_str(content).map_err(|e| PlanError::Parse {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;

        let resource_changes =
            raw.resource_changes
                .ok_or_else(|| PlanError::MissingResourceChanges {
                    source_name: source_name.to_string(),
                })?;

        debug!(
            "Parsed {} resource changes from {source_name}",
            resource_changes.len()
        );

        Ok(PlanDocument {
            variables: raw.variables.unwrap_or_default(),
            resource_changes,
        })
    }
}
