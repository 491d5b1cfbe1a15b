//! Plan document types.
//!
//! These structs map to the JSON emitted by `terraform show -json`. Only the
//! fields the report needs are modeled; everything else is ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute mapping of a resource (attribute name to value).
pub type Attributes = serde_json::Map<String, Value>;

/// A parsed plan document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanDocument {
    /// Input variables of the plan, by name.
    pub variables: BTreeMap<String, PlanVariable>,
    /// Proposed resource changes, in document order.
    pub resource_changes: Vec<ResourceChange>,
}

/// A single input variable of the plan.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PlanVariable {
    /// The variable value.
    #[serde(default)]
    pub value: Value,
}

/// A proposed change for one resource.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ResourceChange {
    /// Unique resource address within the plan.
    pub address: String,
    /// The change itself.
    pub change: ResourceChangeDetail,
}

/// Before/after state and verbs of a resource change.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ResourceChangeDetail {
    /// Ordered raw action verbs.
    pub actions: Vec<RawAction>,
    /// Attributes before the change.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub before: Attributes,
    /// Attributes after the change.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub after: Attributes,
    /// Sensitivity markers for `before`.
    #[serde(default)]
    pub before_sensitive: Value,
    /// Sensitivity markers for `after`.
    #[serde(default)]
    pub after_sensitive: Value,
    /// Markers for attributes only known after apply.
    #[serde(default)]
    pub after_unknown: Value,
    /// Present when the resource is being imported.
    #[serde(default)]
    pub importing: Option<Value>,
}

/// A raw action verb as written in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum RawAction {
    /// `no-op`
    NoOp,
    /// `create`
    Create,
    /// `read`
    Read,
    /// `update`
    Update,
    /// `delete`
    Delete,
    /// Any verb this tool does not know.
    Unknown(String),
}

impl ResourceChangeDetail {
    /// Returns true if the record carries an import marker.
    #[must_use]
    pub const fn is_importing(&self) -> bool {
        self.importing.is_some()
    }
}

impl PlanVariable {
    /// Returns the value as heading text.
    ///
    /// Strings are used verbatim, `null` yields `None`, anything else is
    /// rendered as compact JSON.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl RawAction {
    /// Returns the verb as written in the plan.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoOp => "no-op",
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Unknown(verb) => verb,
        }
    }
}

impl From<String> for RawAction {
    fn from(verb: String) -> Self {
        match verb.as_str() {
            "no-op" => Self::NoOp,
            "create" => Self::Create,
            "read" => Self::Read,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Unknown(verb),
        }
    }
}

impl std::fmt::Display for RawAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deserializes an optional mapping, treating `null` as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Attributes, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Attributes>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_action_from_string() {
        assert_eq!(RawAction::from(String::from("no-op")), RawAction::NoOp);
        assert_eq!(RawAction::from(String::from("delete")), RawAction::Delete);
        assert_eq!(
            RawAction::from(String::from("forget")),
            RawAction::Unknown(String::from("forget"))
        );
        assert_eq!(RawAction::Unknown(String::from("forget")).as_str(), "forget");
    }

    #[test]
    fn test_null_before_is_empty() {
        let detail: ResourceChangeDetail = serde_json::from_value(json!({
            "actions": ["create"],
            "before": null,
            "after": {"name": "x"},
            "before_sensitive": false,
        }))
        .unwrap();

        assert!(detail.before.is_empty());
        assert_eq!(detail.after.get("name"), Some(&json!("x")));
        assert_eq!(detail.before_sensitive, json!(false));
        assert!(!detail.is_importing());
    }

    #[test]
    fn test_missing_mappings_default() {
        let detail: ResourceChangeDetail =
            serde_json::from_value(json!({"actions": ["no-op"], "importing": {}})).unwrap();

        assert!(detail.before.is_empty());
        assert!(detail.after.is_empty());
        assert_eq!(detail.after_sensitive, Value::Null);
        assert!(detail.is_importing());
    }

    #[test]
    fn test_null_importing_is_not_import() {
        let detail: ResourceChangeDetail =
            serde_json::from_value(json!({"actions": ["no-op"], "importing": null})).unwrap();
        assert!(!detail.is_importing());
    }

    #[test]
    fn test_variable_as_text() {
        let string = PlanVariable { value: json!("staging") };
        let number = PlanVariable { value: json!(3) };
        let null = PlanVariable { value: Value::Null };

        assert_eq!(string.as_text().as_deref(), Some("staging"));
        assert_eq!(number.as_text().as_deref(), Some("3"));
        assert_eq!(null.as_text(), None);
    }
}
