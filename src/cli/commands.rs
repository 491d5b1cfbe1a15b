//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ReportMode, Settings, DEFAULT_HEADING, DEFAULT_MAX_DEPTH, DEFAULT_PLAN_FILE};

/// Plan comment - Terraform plan reports for pull requests.
#[derive(Parser, Debug)]
#[command(name = "plan-comment")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render plans and post the reports on the pull request.
    Comment {
        /// Plan lookup and rendering options.
        #[command(flatten)]
        plans: PlanArgs,

        /// Pull request options.
        #[command(flatten)]
        target: TargetArgs,

        /// Remove reports from previous runs before posting.
        #[arg(long, env = "PLAN_COMMENT_PURGE", default_value_t = true, action = ArgAction::Set)]
        purge: bool,
    },

    /// Render plans and print the reports to stdout.
    Render {
        /// Plan lookup and rendering options.
        #[command(flatten)]
        plans: PlanArgs,
    },

    /// Remove reports posted by previous runs.
    Cleanup {
        /// Pull request options.
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Options controlling plan lookup and report rendering.
#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Directory searched for plan files.
    #[arg(long, env = "PLAN_COMMENT_DIR", default_value = ".")]
    pub plan_dir: PathBuf,

    /// File name a plan must have.
    #[arg(long, env = "PLAN_COMMENT_FILE", default_value = DEFAULT_PLAN_FILE)]
    pub plan_file: String,

    /// Maximum directory depth to search.
    #[arg(long, env = "PLAN_COMMENT_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Expand report containers by default.
    #[arg(long, env = "PLAN_COMMENT_EXPAND")]
    pub expand: bool,

    /// Plan variable whose value becomes the report heading.
    #[arg(long, env = "PLAN_COMMENT_HEADING_VARIABLE")]
    pub heading_variable: Option<String>,

    /// Heading used when no plan variable overrides it.
    #[arg(long, env = "PLAN_COMMENT_HEADING", default_value = DEFAULT_HEADING)]
    pub heading: String,

    /// One report per plan, or a single report for all plans.
    #[arg(long, env = "PLAN_COMMENT_MODE", value_enum, default_value_t = ReportMode::PerPlan)]
    pub mode: ReportMode,
}

/// Options selecting the pull request.
#[derive(Args, Debug, Clone, Copy)]
pub struct TargetArgs {
    /// Pull request number (read from the event payload when omitted).
    #[arg(long, env = "PLAN_COMMENT_PR_NUMBER")]
    pub pr_number: Option<u64>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl PlanArgs {
    /// Builds run settings from the arguments.
    #[must_use]
    pub fn to_settings(&self, purge_previous: bool) -> Settings {
        Settings {
            plan_dir: self.plan_dir.clone(),
            plan_file: self.plan_file.clone(),
            max_depth: self.max_depth,
            expand: self.expand,
            heading_variable: self.heading_variable.clone(),
            default_heading: self.heading.clone(),
            purge_previous,
            mode: self.mode,
        }
    }
}
