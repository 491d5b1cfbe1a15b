//! Sensitive value redaction.
//!
//! Unchanged secrets are removed from both sides so they never reach the
//! report. Changed secrets are replaced by fixed placeholders so the report
//! still shows that a rotation happened.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::plan::Attributes;

/// Placeholder for a changed sensitive value on the before side.
pub const OLD_SENSITIVE_VALUE: &str = "(OLD_SENSITIVE_VALUE)";

/// Placeholder for a changed sensitive value on the after side.
pub const NEW_SENSITIVE_VALUE: &str = "(NEW_SENSITIVE_VALUE)";

/// Placeholder for attributes whose value is only known after apply.
pub const KNOWN_AFTER_APPLY: &str = "(known after apply)";

/// Sanitized copies of a resource's attribute mappings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redacted {
    /// Sanitized before attributes.
    pub before: Attributes,
    /// Sanitized after attributes.
    pub after: Attributes,
}

/// Returns sanitized copies of `before` and `after`.
///
/// Every key marked in `before_sensitive` or `after_sensitive` is either
/// removed from both sides (value unchanged, a missing value counting as
/// equal to another missing value) or replaced by the placeholders (value
/// changed). The inputs are left untouched.
#[must_use]
pub fn redact(
    before: &Attributes,
    after: &Attributes,
    before_sensitive: &Value,
    after_sensitive: &Value,
) -> Redacted {
    let mut redacted = Redacted {
        before: before.clone(),
        after: after.clone(),
    };

    let sensitive: BTreeSet<&String> = sensitive_keys(before_sensitive)
        .chain(sensitive_keys(after_sensitive))
        .collect();

    for key in sensitive {
        if before.get(key) == after.get(key) {
            redacted.before.remove(key);
            redacted.after.remove(key);
            continue;
        }

        if let Some(value) = redacted.before.get_mut(key) {
            *value = Value::String(OLD_SENSITIVE_VALUE.to_string());
        }
        if let Some(value) = redacted.after.get_mut(key) {
            *value = Value::String(NEW_SENSITIVE_VALUE.to_string());
        }
    }

    redacted
}

/// Returns a copy of `after` with unknown attributes filled in.
///
/// Keys flagged `true` in `after_unknown` and absent from `after` get the
/// [`KNOWN_AFTER_APPLY`] placeholder.
#[must_use]
pub fn fill_unknown(after: &Attributes, after_unknown: &Value) -> Attributes {
    let mut filled = after.clone();
    if let Value::Object(markers) = after_unknown {
        for (key, marker) in markers {
            if marker == &Value::Bool(true) && !filled.contains_key(key) {
                filled.insert(key.clone(), Value::String(KNOWN_AFTER_APPLY.to_string()));
            }
        }
    }
    filled
}

/// Keys a marker document flags as sensitive.
fn sensitive_keys(markers: &Value) -> impl Iterator<Item = &String> {
    markers
        .as_object()
        .into_iter()
        .flat_map(serde_json::Map::iter)
        .filter(|(_, marker)| is_marked(marker))
        .map(|(key, _)| key)
}

/// A marker flags its attribute when it is `true` or holds a `true` leaf at
/// any depth. Containers of `false` describe structure only.
fn is_marked(marker: &Value) -> bool {
    match marker {
        Value::Bool(flag) => *flag,
        Value::Object(nested) => nested.values().any(is_marked),
        Value::Array(nested) => nested.iter().any(is_marked),
        Value::Null | Value::Number(_) | Value::String(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_unchanged_secret_is_removed() {
        let before = attrs(json!({"password": "hunter2", "name": "db"}));
        let after = attrs(json!({"password": "hunter2", "name": "db2"}));

        let redacted = redact(&before, &after, &json!({"password": true}), &json!({}));

        assert!(!redacted.before.contains_key("password"));
        assert!(!redacted.after.contains_key("password"));
        assert_eq!(redacted.after.get("name"), Some(&json!("db2")));
    }

    #[test]
    fn test_changed_secret_is_masked() {
        let before = attrs(json!({"password": "hunter2"}));
        let after = attrs(json!({"password": "correct-horse"}));

        let redacted = redact(&before, &after, &json!({}), &json!({"password": true}));

        assert_eq!(redacted.before.get("password"), Some(&json!(OLD_SENSITIVE_VALUE)));
        assert_eq!(redacted.after.get("password"), Some(&json!(NEW_SENSITIVE_VALUE)));
        let rendered = format!("{redacted:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("correct-horse"));
    }

    #[test]
    fn test_secret_added_on_one_side() {
        let before = attrs(json!({}));
        let after = attrs(json!({"token": "abc"}));

        let redacted = redact(&before, &after, &json!(false), &json!({"token": true}));

        assert!(!redacted.before.contains_key("token"));
        assert_eq!(redacted.after.get("token"), Some(&json!(NEW_SENSITIVE_VALUE)));
    }

    #[test]
    fn test_missing_on_both_sides_is_harmless() {
        let before = attrs(json!({"name": "a"}));
        let after = attrs(json!({"name": "a"}));

        let redacted = redact(&before, &after, &json!({"ghost": true}), &json!({"ghost": true}));

        assert_eq!(redacted.before, before);
        assert_eq!(redacted.after, after);
    }

    #[test]
    fn test_key_in_both_marker_sets() {
        let before = attrs(json!({"secret": "one"}));
        let after = attrs(json!({"secret": "two"}));

        let redacted = redact(
            &before,
            &after,
            &json!({"secret": true}),
            &json!({"secret": true}),
        );

        assert_eq!(redacted.before.get("secret"), Some(&json!(OLD_SENSITIVE_VALUE)));
        assert_eq!(redacted.after.get("secret"), Some(&json!(NEW_SENSITIVE_VALUE)));
    }

    #[test]
    fn test_nested_marker_masks_whole_attribute() {
        let before = attrs(json!({"env": {"API_KEY": "old"}, "tags": {"a": "b"}}));
        let after = attrs(json!({"env": {"API_KEY": "new"}, "tags": {"a": "c"}}));

        let redacted = redact(
            &before,
            &after,
            &json!({"env": {"API_KEY": true}, "tags": {}}),
            &json!({"env": {"API_KEY": true}, "tags": {}}),
        );

        assert_eq!(redacted.after.get("env"), Some(&json!(NEW_SENSITIVE_VALUE)));
        assert_eq!(redacted.after.get("tags"), Some(&json!({"a": "c"})));
    }

    #[test]
    fn test_structural_markers_mark_nothing() {
        let before = attrs(json!({"cidr_blocks": ["10.0.0.0/16"], "tags": {"a": "b"}}));
        let after = attrs(json!({"cidr_blocks": ["10.0.0.0/16", "10.1.0.0/16"], "tags": {"a": "c"}}));

        let redacted = redact(
            &before,
            &after,
            &json!({"cidr_blocks": [false], "tags": {"a": false}}),
            &json!({"cidr_blocks": [false, false], "tags": {"a": false}}),
        );

        assert_eq!(redacted.before, before);
        assert_eq!(redacted.after, after);
    }

    #[test]
    fn test_unchanged_list_with_false_markers_is_kept() {
        let ids = attrs(json!({"vpc_security_group_ids": ["sg-1"]}));

        let redacted = redact(&ids, &ids, &json!({"vpc_security_group_ids": [false]}), &json!({}));

        assert_eq!(redacted.before, ids);
        assert_eq!(redacted.after, ids);
    }

    #[test]
    fn test_deep_true_leaf_masks_attribute() {
        let before = attrs(json!({"params": [{"p": "old"}]}));
        let after = attrs(json!({"params": [{"p": "new"}]}));

        let redacted = redact(&before, &after, &json!({}), &json!({"params": [{"p": true}]}));

        assert_eq!(redacted.before.get("params"), Some(&json!(OLD_SENSITIVE_VALUE)));
        assert_eq!(redacted.after.get("params"), Some(&json!(NEW_SENSITIVE_VALUE)));
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let before = attrs(json!({"password": "x"}));
        let after = attrs(json!({"password": "y"}));

        let _ = redact(&before, &after, &json!({"password": true}), &json!({}));

        assert_eq!(before.get("password"), Some(&json!("x")));
        assert_eq!(after.get("password"), Some(&json!("y")));
    }

    #[test]
    fn test_fill_unknown() {
        let after = attrs(json!({"name": "web"}));
        let filled = fill_unknown(&after, &json!({"id": true, "name": true, "arn": false}));

        assert_eq!(filled.get("id"), Some(&json!(KNOWN_AFTER_APPLY)));
        assert_eq!(filled.get("name"), Some(&json!("web")));
        assert!(!filled.contains_key("arn"));
    }
}
