//! Report assembly.
//!
//! This module groups resolved changes by category and wraps them in the
//! Markdown body posted on the pull request: a badge summary, a collapsible
//! container per plan, and the trailing marker used to find old reports.

use std::fmt::Write;
use tracing::debug;

use crate::error::ReportError;

use super::classify::{ChangeAction, ChangeCounts, PlanChanges};

/// Marker appended to every report; later runs use it to find and remove
/// their previous reports.
pub const REPORT_MARKER: &str = "<!-- plan-comment:report -->";

/// Maximum report size in characters (GitHub comment body limit).
pub const MAX_REPORT_SIZE: usize = 65_536;

/// A plan's heading and resolved changes, ready for assembly.
#[derive(Debug, Clone, Copy)]
pub struct PlanSection<'a> {
    /// Heading shown on the plan's container.
    pub heading: &'a str,
    /// Resolved changes of the plan.
    pub changes: &'a PlanChanges,
}

/// Assembler for report bodies.
#[derive(Debug, Default)]
pub struct ReportAssembler {
    /// Whether containers are expanded by default.
    expanded: bool,
}

impl ReportAssembler {
    /// Creates a new report assembler.
    #[must_use]
    pub const fn new(expanded: bool) -> Self {
        Self { expanded }
    }

    /// Assembles the report of a single plan.
    ///
    /// Returns `Ok(None)` when the plan has no resolved changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the report exceeds [`MAX_REPORT_SIZE`].
    pub fn assemble(
        &self,
        heading: &str,
        changes: &PlanChanges,
    ) -> Result<Option<String>, ReportError> {
        if changes.is_empty() {
            debug!("Skipping report for '{heading}': no changes");
            return Ok(None);
        }

        let mut body = Self::badges(changes.counts());
        body.push('\n');
        body.push_str(&self.container(heading, changes));

        Self::finish(heading, body).map(Some)
    }

    /// Assembles one report covering several plans.
    ///
    /// Plans without changes are left out. Returns `Ok(None)` when no plan
    /// has changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the report exceeds [`MAX_REPORT_SIZE`].
    pub fn assemble_all(
        &self,
        heading: &str,
        plans: &[PlanSection<'_>],
    ) -> Result<Option<String>, ReportError> {
        let with_changes: Vec<&PlanSection<'_>> =
            plans.iter().filter(|p| !p.changes.is_empty()).collect();
        if with_changes.is_empty() {
            debug!("Skipping aggregate report: no changes in {} plans", plans.len());
            return Ok(None);
        }

        let mut total = ChangeCounts::default();
        for plan in &with_changes {
            total += *plan.changes.counts();
        }

        let mut body = format!("### {}\n\n", escape_html(heading));
        body.push_str(&Self::badges(&total));
        for plan in with_changes {
            body.push('\n');
            body.push_str(&self.container(plan.heading, plan.changes));
        }

        Self::finish(heading, body).map(Some)
    }

    /// Renders the badge summary line.
    fn badges(counts: &ChangeCounts) -> String {
        let badges: Vec<String> = ChangeAction::ALL
            .iter()
            .map(|&action| {
                let title = action.title();
                format!(
                    "![{title}](https://img.shields.io/badge/{title}-{}-{})",
                    counts.get(action),
                    Self::badge_color(action)
                )
            })
            .collect();
        format!("{}\n", badges.join(" "))
    }

    const fn badge_color(action: ChangeAction) -> &'static str {
        match action {
            ChangeAction::Create => "brightgreen",
            ChangeAction::Update => "yellow",
            ChangeAction::Replace => "orange",
            ChangeAction::Destroy => "red",
            ChangeAction::Import => "blue",
        }
    }

    /// Renders the collapsible container of one plan.
    fn container(&self, heading: &str, changes: &PlanChanges) -> String {
        let open = if self.expanded { " open" } else { "" };
        let summary = escape_html(heading);
        let mut out = format!("<details{open}>\n<summary>{summary}</summary>\n");

        for action in ChangeAction::ALL {
            if !Self::should_emit(action, changes.counts()) {
                continue;
            }
            let fragments: Vec<&str> = changes
                .of_action(action)
                .map(|c| c.diff.as_str())
                .collect();
            if fragments.is_empty() {
                continue;
            }

            let _ = write!(out, "\n#### {}\n\n```diff\n", action.title());
            out.push_str(&fragments.join("\n"));
            out.push_str("```\n");
        }

        out.push_str("</details>\n");
        out
    }

    /// Decides whether a category section is emitted, from the counters.
    ///
    /// Replacements also count as creates and destroys, so the Create and
    /// Destroy sections only appear when their count exceeds the replace
    /// count.
    const fn should_emit(action: ChangeAction, counts: &ChangeCounts) -> bool {
        match action {
            ChangeAction::Create => counts.create > counts.replace,
            ChangeAction::Destroy => counts.destroy > counts.replace,
            ChangeAction::Update => counts.update > 0,
            ChangeAction::Replace => counts.replace > 0,
            ChangeAction::Import => counts.import > 0,
        }
    }

    /// Appends the marker and enforces the size limit.
    fn finish(heading: &str, mut body: String) -> Result<String, ReportError> {
        body.push('\n');
        body.push_str(REPORT_MARKER);
        body.push('\n');

        let size = body.chars().count();
        if size > MAX_REPORT_SIZE {
            return Err(ReportError::TooLarge {
                heading: heading.to_string(),
                size,
                max: MAX_REPORT_SIZE,
            });
        }

        debug!("Assembled report '{heading}' ({size} characters)");
        Ok(body)
    }
}

/// Escapes the characters that would open or close HTML markup.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::ResolvedChange;

    fn change(address: &str, action: ChangeAction) -> ResolvedChange {
        ResolvedChange {
            address: address.to_string(),
            diff: format!("# {address}\n+marker-{address}\n"),
            action,
        }
    }

    fn plan(changes: &[(&str, ChangeAction)]) -> PlanChanges {
        let mut plan = PlanChanges::new();
        for (address, action) in changes {
            plan.push(change(address, *action));
        }
        plan
    }

    fn section<'a>(body: &'a str, title: &str) -> Option<&'a str> {
        let start = body.find(&format!("#### {title}\n"))?;
        let rest = &body[start..];
        let end = rest.find("```\n").map_or(rest.len(), |i| i + 4);
        Some(&rest[..end])
    }

    #[test]
    fn test_empty_plan_yields_no_report() {
        let assembler = ReportAssembler::new(false);
        assert_eq!(assembler.assemble("Plan", &PlanChanges::new()).unwrap(), None);
    }

    #[test]
    fn test_report_structure() {
        let assembler = ReportAssembler::new(true);
        let changes = plan(&[("aws_s3_bucket.x", ChangeAction::Update)]);
        let body = assembler.assemble("Terraform Plan", &changes).unwrap().unwrap();

        assert!(body.contains("https://img.shields.io/badge/Update-1-yellow"));
        assert!(body.contains("https://img.shields.io/badge/Create-0-brightgreen"));
        assert!(body.contains("https://img.shields.io/badge/Replace-0-orange"));
        assert!(body.contains("https://img.shields.io/badge/Destroy-0-red"));
        assert!(body.contains("https://img.shields.io/badge/Import-0-blue"));
        assert!(body.contains("<details open>\n<summary>Terraform Plan</summary>"));
        assert!(section(&body, "Update").is_some_and(|s| s.contains("+marker-aws_s3_bucket.x")));
        assert!(body.ends_with(&format!("{REPORT_MARKER}\n")));
    }

    #[test]
    fn test_heading_is_escaped() {
        let assembler = ReportAssembler::new(false);
        let changes = plan(&[("a.b", ChangeAction::Create)]);
        let body = assembler
            .assemble("prod </details> & <b>eu</b>", &changes)
            .unwrap()
            .unwrap();

        assert!(body.contains("<summary>prod &lt;/details&gt; &amp; &lt;b&gt;eu&lt;/b&gt;</summary>"));
        assert_eq!(body.matches("</details>").count(), 1);
    }

    #[test]
    fn test_collapsed_by_default() {
        let assembler = ReportAssembler::new(false);
        let changes = plan(&[("a.b", ChangeAction::Create)]);
        let body = assembler.assemble("Plan", &changes).unwrap().unwrap();

        assert!(body.contains("<details>\n"));
        assert!(!body.contains("<details open>"));
    }

    #[test]
    fn test_import_section() {
        let assembler = ReportAssembler::new(false);
        let changes = plan(&[("aws_instance.adopted", ChangeAction::Import)]);
        let body = assembler.assemble("Plan", &changes).unwrap().unwrap();

        assert!(section(&body, "Import").is_some_and(|s| s.contains("aws_instance.adopted")));
        assert!(body.contains("badge/Import-1-blue"));
    }

    #[test]
    fn test_replace_only_suppresses_create_and_destroy_sections() {
        let assembler = ReportAssembler::new(false);
        let changes = plan(&[("aws_instance.web", ChangeAction::Replace)]);
        let body = assembler.assemble("Plan", &changes).unwrap().unwrap();

        assert!(section(&body, "Replace").is_some());
        assert!(section(&body, "Create").is_none());
        assert!(section(&body, "Destroy").is_none());
        assert!(body.contains("badge/Create-1-"));
        assert!(body.contains("badge/Destroy-1-"));
        assert!(body.contains("badge/Replace-1-"));
    }

    #[test]
    fn test_replace_alongside_create_and_destroy() {
        let assembler = ReportAssembler::new(false);
        let changes = plan(&[
            ("aws_instance.new", ChangeAction::Create),
            ("aws_instance.swap", ChangeAction::Replace),
            ("aws_instance.gone", ChangeAction::Destroy),
        ]);
        let body = assembler.assemble("Plan", &changes).unwrap().unwrap();

        let create = section(&body, "Create").unwrap();
        let destroy = section(&body, "Destroy").unwrap();
        let replace = section(&body, "Replace").unwrap();

        assert!(create.contains("aws_instance.new"));
        assert!(!create.contains("aws_instance.swap"));
        assert!(destroy.contains("aws_instance.gone"));
        assert!(!destroy.contains("aws_instance.swap"));
        assert!(replace.contains("aws_instance.swap"));
        assert!(body.contains("badge/Create-2-"));
        assert!(body.contains("badge/Destroy-2-"));
    }

    #[test]
    fn test_sections_keep_plan_order() {
        let assembler = ReportAssembler::new(false);
        let changes = plan(&[
            ("b.second", ChangeAction::Update),
            ("a.created", ChangeAction::Create),
            ("c.third", ChangeAction::Update),
        ]);
        let body = assembler.assemble("Plan", &changes).unwrap().unwrap();

        let update = section(&body, "Update").unwrap();
        let second = update.find("b.second").unwrap();
        let third = update.find("c.third").unwrap();
        assert!(second < third);
        assert!(body.find("#### Create").unwrap() < body.find("#### Update").unwrap());
    }

    #[test]
    fn test_oversized_report_fails() {
        let assembler = ReportAssembler::new(false);
        let mut changes = PlanChanges::new();
        changes.push(ResolvedChange {
            address: String::from("aws_ssm_parameter.huge"),
            diff: format!("+value: {}\n", "x".repeat(MAX_REPORT_SIZE)),
            action: ChangeAction::Create,
        });

        let result = assembler.assemble("Big Plan", &changes);
        match result {
            Err(ReportError::TooLarge { heading, size, max }) => {
                assert_eq!(heading, "Big Plan");
                assert!(size > max);
                assert_eq!(max, MAX_REPORT_SIZE);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_skips_empty_plans() {
        let assembler = ReportAssembler::new(false);
        let first = plan(&[("a.one", ChangeAction::Create)]);
        let empty = PlanChanges::new();
        let second = plan(&[("b.two", ChangeAction::Destroy), ("b.three", ChangeAction::Update)]);

        let sections = [
            PlanSection { heading: "infra/a", changes: &first },
            PlanSection { heading: "infra/empty", changes: &empty },
            PlanSection { heading: "infra/b", changes: &second },
        ];
        let body = assembler.assemble_all("All Plans", &sections).unwrap().unwrap();

        assert!(body.starts_with("### All Plans\n"));
        assert!(body.contains("<summary>infra/a</summary>"));
        assert!(body.contains("<summary>infra/b</summary>"));
        assert!(!body.contains("infra/empty"));
        assert!(body.contains("badge/Create-1-"));
        assert!(body.contains("badge/Destroy-1-"));
        assert!(body.contains("badge/Update-1-"));
        assert_eq!(body.matches(REPORT_MARKER).count(), 1);
    }

    #[test]
    fn test_aggregate_without_changes_yields_none() {
        let assembler = ReportAssembler::new(false);
        let empty = PlanChanges::new();
        let sections = [PlanSection { heading: "x", changes: &empty }];

        assert_eq!(assembler.assemble_all("All", &sections).unwrap(), None);
    }
}
