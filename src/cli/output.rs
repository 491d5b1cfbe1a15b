//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::planner::{ChangeAction, ChangeCounts, PlanResult};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Plan summary row for table display.
#[derive(Tabled)]
struct PlanSummaryRow {
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Heading")]
    heading: String,
    #[tabled(rename = "Create")]
    create: String,
    #[tabled(rename = "Update")]
    update: String,
    #[tabled(rename = "Replace")]
    replace: String,
    #[tabled(rename = "Destroy")]
    destroy: String,
    #[tabled(rename = "Import")]
    import: String,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the per-plan change summary.
    #[must_use]
    pub fn format_summary(&self, results: &[PlanResult]) -> String {
        match self.format {
            OutputFormat::Json => {
                let plans: Vec<PlanJson<'_>> = results.iter().map(PlanJson::from).collect();
                serde_json::to_string_pretty(&plans).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_summary_text(results),
        }
    }

    fn format_summary_text(results: &[PlanResult]) -> String {
        let mut output = String::new();
        let mut total = ChangeCounts::default();

        let rows: Vec<PlanSummaryRow> = results
            .iter()
            .map(|r| {
                let counts = *r.changes.counts();
                total += counts;
                PlanSummaryRow {
                    plan: r.source.display().to_string(),
                    heading: Self::truncate(&r.heading, 40),
                    create: Self::format_count(ChangeAction::Create, &counts),
                    update: Self::format_count(ChangeAction::Update, &counts),
                    replace: Self::format_count(ChangeAction::Replace, &counts),
                    destroy: Self::format_count(ChangeAction::Destroy, &counts),
                    import: Self::format_count(ChangeAction::Import, &counts),
                }
            })
            .collect();

        output.push_str(&Table::new(rows).to_string());
        output.push('\n');

        if total.is_empty() {
            let _ = writeln!(output, "\n{} No changes in any plan.", "✓".green());
        } else {
            let _ = writeln!(output, "\nPlans: {total}");
        }

        output
    }

    /// Formats a one-line success message.
    #[must_use]
    pub fn format_success(&self, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": "success", "message": message });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{} {message}", "✓".green()),
        }
    }

    fn format_count(action: ChangeAction, counts: &ChangeCounts) -> String {
        let count = counts.get(action);
        if count == 0 {
            return count.to_string().dimmed().to_string();
        }
        let text = count.to_string();
        match action {
            ChangeAction::Create => text.green().to_string(),
            ChangeAction::Update => text.yellow().to_string(),
            ChangeAction::Replace => text.magenta().to_string(),
            ChangeAction::Destroy => text.red().to_string(),
            ChangeAction::Import => text.blue().to_string(),
        }
    }

    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len - 3).collect();
            format!("{kept}...")
        }
    }
}

// JSON serialization helpers

#[derive(Serialize)]
struct PlanJson<'a> {
    plan: String,
    heading: &'a str,
    counts: &'a ChangeCounts,
    resources: Vec<ResourceJson<'a>>,
}

#[derive(Serialize)]
struct ResourceJson<'a> {
    address: &'a str,
    action: ChangeAction,
}

impl<'a> From<&'a PlanResult> for PlanJson<'a> {
    fn from(result: &'a PlanResult) -> Self {
        Self {
            plan: result.source.display().to_string(),
            heading: &result.heading,
            counts: result.changes.counts(),
            resources: result
                .changes
                .changes()
                .iter()
                .map(|c| ResourceJson {
                    address: &c.address,
                    action: c.action,
                })
                .collect(),
        }
    }
}
