//! Plan pipeline.
//!
//! This module drives a run: every plan is parsed, its resource changes are
//! classified, redacted and rendered, and the results are handed to the
//! report assembler.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::{ReportMode, Settings};
use crate::error::{PlanError, Result};
use crate::plan::{PlanDocument, PlanParser, ResourceChange};

use super::classify::{ChangeAction, PlanChanges, ResolvedChange};
use super::diff::DiffRenderer;
use super::redact::{fill_unknown, redact};
use super::report::{PlanSection, ReportAssembler};

/// Outcome of processing one plan.
#[derive(Debug, Clone)]
pub struct PlanResult {
    /// Plan file the result came from.
    pub source: PathBuf,
    /// Resolved heading of the plan.
    pub heading: String,
    /// Resolved changes of the plan.
    pub changes: PlanChanges,
}

/// Orchestrates parsing, classification, rendering and assembly.
#[derive(Debug)]
pub struct PlanPipeline {
    /// Plan parser.
    parser: PlanParser,
    /// Diff renderer.
    renderer: DiffRenderer,
    /// Report assembler.
    assembler: ReportAssembler,
    /// Plan variable overriding the heading, if configured.
    heading_variable: Option<String>,
    /// Heading used when no override applies.
    default_heading: String,
    /// One report per plan, or one for all plans.
    mode: ReportMode,
}

impl PlanPipeline {
    /// Creates a pipeline from validated settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            parser: PlanParser::new(),
            renderer: DiffRenderer::new(),
            assembler: ReportAssembler::new(settings.expand),
            heading_variable: settings.heading_variable.clone(),
            default_heading: settings.default_heading.clone(),
            mode: settings.mode,
        }
    }

    /// Processes every plan file, in order.
    ///
    /// Stops at the first plan that fails.
    ///
    /// # Errors
    ///
    /// Returns the error of the first plan that cannot be processed.
    pub fn process_all(&self, paths: &[PathBuf]) -> Result<Vec<PlanResult>> {
        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            results.push(self.process_file(path)?);
        }
        Ok(results)
    }

    /// Loads and processes one plan file.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan cannot be read, parsed or classified.
    pub fn process_file(&self, path: &Path) -> Result<PlanResult> {
        let plan = self.parser.load_file(path)?;
        Ok(self.process(path, &plan)?)
    }

    /// Processes a parsed plan.
    ///
    /// # Errors
    ///
    /// Returns an error if a resource change cannot be classified or rendered.
    pub fn process(
        &self,
        source: &Path,
        plan: &PlanDocument,
    ) -> std::result::Result<PlanResult, PlanError> {
        let source_name = source.display().to_string();
        let heading = self.resolve_heading(&source_name, plan);

        let mut changes = PlanChanges::new();
        for resource in &plan.resource_changes {
            if let Some(resolved) = self
                .resolve_change(resource)
                .map_err(|e| e.in_plan(source_name.as_str()))?
            {
                changes.push(resolved);
            }
        }

        info!("{source_name}: {}", changes.counts());

        Ok(PlanResult {
            source: source.to_path_buf(),
            heading,
            changes,
        })
    }

    /// Resolves the heading of a plan.
    ///
    /// The configured plan variable wins when the plan defines it; otherwise
    /// the default heading is used and a warning is logged.
    #[must_use]
    pub fn resolve_heading(&self, source_name: &str, plan: &PlanDocument) -> String {
        let Some(name) = &self.heading_variable else {
            return self.default_heading.clone();
        };

        if let Some(heading) = plan.variables.get(name).and_then(|v| v.as_text()) {
            debug!("{source_name}: heading taken from variable '{name}'");
            heading
        } else {
            warn!(
                "{source_name}: heading variable '{name}' not found, using '{}'",
                self.default_heading
            );
            self.default_heading.clone()
        }
    }

    /// Classifies, redacts and renders one resource change.
    ///
    /// Returns `Ok(None)` for records that produce no report entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be classified or rendered.
    pub fn resolve_change(
        &self,
        resource: &ResourceChange,
    ) -> std::result::Result<Option<ResolvedChange>, PlanError> {
        let detail = &resource.change;
        let Some(action) =
            ChangeAction::classify(&resource.address, &detail.actions, detail.is_importing())?
        else {
            debug!("Skipping {}: no change", resource.address);
            return Ok(None);
        };

        let after = fill_unknown(&detail.after, &detail.after_unknown);
        let sanitized = redact(
            &detail.before,
            &after,
            &detail.before_sensitive,
            &detail.after_sensitive,
        );
        let diff = self
            .renderer
            .render(&resource.address, &sanitized.before, &sanitized.after, action)?;

        debug!("Resolved {} as {action}", resource.address);
        Ok(Some(ResolvedChange {
            address: resource.address.clone(),
            diff,
            action,
        }))
    }

    /// Assembles the reports for processed plans according to the mode.
    ///
    /// Plans without changes produce no report.
    ///
    /// # Errors
    ///
    /// Returns an error if a report exceeds the maximum size.
    pub fn build_reports(&self, results: &[PlanResult]) -> Result<Vec<String>> {
        let reports = match self.mode {
            ReportMode::PerPlan => {
                let mut reports = Vec::new();
                for result in results {
                    if let Some(report) = self.assembler.assemble(&result.heading, &result.changes)? {
                        reports.push(report);
                    }
                }
                reports
            }
            ReportMode::Aggregate => {
                let sections: Vec<PlanSection<'_>> = results
                    .iter()
                    .map(|r| PlanSection {
                        heading: &r.heading,
                        changes: &r.changes,
                    })
                    .collect();
                self.assembler
                    .assemble_all(&self.default_heading, &sections)?
                    .into_iter()
                    .collect()
            }
        };

        info!("Built {} report(s) from {} plan(s)", reports.len(), results.len());
        Ok(reports)
    }
}
