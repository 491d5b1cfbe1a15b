//! Diff rendering for resource changes.
//!
//! This module turns sanitized before/after attribute mappings into a short
//! unified diff fragment, keeping only the lines that carry information.

use serde_json::Value;
use similar::TextDiff;
use std::collections::BTreeMap;

use crate::error::PlanError;
use crate::plan::Attributes;

use super::classify::ChangeAction;

/// Separator line printed under each resource heading.
pub const FRAGMENT_SEPARATOR: &str =
    "# ============================================================";

/// Renderer for per-resource diff fragments.
#[derive(Debug, Default)]
pub struct DiffRenderer;

impl DiffRenderer {
    /// Creates a new diff renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the diff fragment of one resource.
    ///
    /// The output is deterministic: identical inputs give identical bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if an attribute mapping cannot be serialized.
    pub fn render(
        &self,
        address: &str,
        before: &Attributes,
        after: &Attributes,
        action: ChangeAction,
    ) -> Result<String, PlanError> {
        let old = to_canonical_text(address, before)?;
        let new = to_canonical_text(address, after)?;

        let (old_label, new_label) = Self::labels(address, action);
        let raw = TextDiff::from_lines(&old, &new)
            .unified_diff()
            .header(&old_label, &new_label)
            .to_string();

        let mut fragment = format!("# {address}\n{FRAGMENT_SEPARATOR}\n");
        for line in raw.lines().filter(|line| Self::is_informative(line)) {
            fragment.push_str(line);
            fragment.push('\n');
        }

        Ok(fragment)
    }

    /// File labels for the diff header.
    ///
    /// Destroy puts the action name on the before side; every other action,
    /// replace included, puts it on the after side.
    fn labels(address: &str, action: ChangeAction) -> (String, String) {
        let labelled = format!("{address}\t{action}");
        match action {
            ChangeAction::Destroy => (labelled, address.to_string()),
            ChangeAction::Create
            | ChangeAction::Update
            | ChangeAction::Replace
            | ChangeAction::Import => (address.to_string(), labelled),
        }
    }

    /// Keeps added and removed lines, except bare empty-mapping markers.
    fn is_informative(line: &str) -> bool {
        (line.starts_with('+') || line.starts_with('-')) && line != "+{}" && line != "-{}"
    }
}

/// Serializes an attribute mapping as YAML with sorted keys.
fn to_canonical_text(address: &str, attributes: &Attributes) -> Result<String, PlanError> {
    let sorted: BTreeMap<&String, &Value> = attributes.iter().collect();
    serde_yaml::to_string(&sorted).map_err(|e| PlanError::Serialization {
        address: address.to_string(),
        message: e.to_string(),
    })
}
