//! Settings validation.
//!
//! Field-level rules are declared on [`Settings`] with the `validator`
//! derive; the checks that need the filesystem or span several fields live
//! here.

use tracing::debug;
use validator::Validate;

use crate::error::{ConfigError, Result};

use super::settings::Settings;

/// Validator for run settings.
#[derive(Debug, Default)]
pub struct SettingsValidator;

/// Validation outcome with non-fatal findings.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

impl SettingsValidator {
    /// Creates a new settings validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates run settings.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self, settings: &Settings) -> Result<ValidationResult> {
        let mut result = ValidationResult::default();

        settings.validate().map_err(|e| ConfigError::ValidationError {
            message: e.to_string(),
            field: first_field(&e),
        })?;

        if settings.plan_file.contains(['/', '\\']) {
            return Err(ConfigError::validation(
                format!(
                    "plan file '{}' must be a file name, not a path",
                    settings.plan_file
                ),
                "plan_file",
            )
            .into());
        }

        if let Some(name) = &settings.heading_variable
            && name.trim().is_empty()
        {
            return Err(
                ConfigError::validation("heading variable name cannot be blank", "heading_variable")
                    .into(),
            );
        }

        if !settings.plan_dir.is_dir() {
            return Err(ConfigError::DirectoryNotFound {
                path: settings.plan_dir.clone(),
            }
            .into());
        }

        if settings.max_depth == 0 {
            result
                .warnings
                .push(String::from("max depth 0 only searches the plan directory itself"));
        }

        debug!("Settings validation passed");
        Ok(result)
    }
}

/// Name of the first failing field, in alphabetical order.
fn first_field(errors: &validator::ValidationErrors) -> Option<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(ToString::to_string)
        .collect();
    fields.sort();
    fields.into_iter().next()
}

impl ValidationResult {
    /// Returns the number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}
