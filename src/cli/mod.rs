//! CLI module for the plan comment tool.
//!
//! This module provides the command-line interface for rendering plan
//! reports and posting them on pull requests.

mod commands;
mod output;

pub use commands::{Cli, Commands, OutputFormat, PlanArgs, TargetArgs};
pub use output::OutputFormatter;
