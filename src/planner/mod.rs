//! Planning module for plan change reports.
//!
//! This module classifies the resource changes of a plan, redacts sensitive
//! values, renders per-resource diffs and assembles the final reports.

mod classify;
mod redact;
mod diff;
mod report;
mod pipeline;

pub use classify::{ChangeAction, ChangeCounts, PlanChanges, ResolvedChange};
pub use redact::{fill_unknown, redact, Redacted, KNOWN_AFTER_APPLY, NEW_SENSITIVE_VALUE, OLD_SENSITIVE_VALUE};
pub use diff::{DiffRenderer, FRAGMENT_SEPARATOR};
pub use report::{PlanSection, ReportAssembler, MAX_REPORT_SIZE, REPORT_MARKER};
pub use pipeline::{PlanPipeline, PlanResult};
