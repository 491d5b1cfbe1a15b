//! Configuration module for the plan comment tool.
//!
//! This module handles all configuration-related functionality:
//! - The settings recognized by a run
//! - Validation of those settings
//! - Locating plan files on disk

mod settings;
mod validator;
mod discovery;

pub use settings::{ReportMode, Settings, DEFAULT_HEADING, DEFAULT_MAX_DEPTH, DEFAULT_PLAN_FILE};
pub use validator::{SettingsValidator, ValidationResult};
pub use discovery::find_plan_files;
