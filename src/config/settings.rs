//! Run settings.
//!
//! This module defines the configuration surface of a run. Values come from
//! the command line or the environment (see the `cli` module).

use serde::Serialize;
use std::path::PathBuf;
use validator::Validate;

/// Default plan file name to look for.
pub const DEFAULT_PLAN_FILE: &str = "tfplan.json";

/// Default heading of a report.
pub const DEFAULT_HEADING: &str = "Terraform Plan";

/// Default directory depth searched for plan files.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Settings for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct Settings {
    /// Directory searched for plan files.
    pub plan_dir: PathBuf,
    /// File name a plan must have.
    #[validate(length(min = 1, message = "plan file name cannot be empty"))]
    pub plan_file: String,
    /// Maximum directory depth below `plan_dir` to search.
    #[validate(range(max = 64, message = "search depth must be at most 64"))]
    pub max_depth: usize,
    /// Whether report containers are expanded by default.
    pub expand: bool,
    /// Plan variable whose value replaces the default heading.
    pub heading_variable: Option<String>,
    /// Heading used when no override applies.
    #[validate(length(min = 1, message = "heading cannot be empty"))]
    pub default_heading: String,
    /// Whether previous reports are removed before publishing.
    pub purge_previous: bool,
    /// One report per plan, or one for all plans.
    pub mode: ReportMode,
}

/// How reports are split across plans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ReportMode {
    /// One report for each plan with changes.
    #[default]
    PerPlan,
    /// A single report covering every plan.
    Aggregate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plan_dir: PathBuf::from("."),
            plan_file: DEFAULT_PLAN_FILE.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            expand: false,
            heading_variable: None,
            default_heading: DEFAULT_HEADING.to_string(),
            purge_previous: true,
            mode: ReportMode::PerPlan,
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::PerPlan => "per-plan",
            Self::Aggregate => "aggregate",
        };
        write!(f, "{s}")
    }
}
