// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Plan Comment
//!
//! Turns Terraform JSON plans into readable change reports on pull requests.
//!
//! ## Overview
//!
//! For every plan found under a directory, the tool:
//!
//! - Classifies each resource change as create, update, replace, destroy or import
//! - Masks sensitive values so secrets never reach the report
//! - Renders a unified diff of the attributes of each resource
//! - Assembles Markdown reports with a badge summary and a collapsible body
//! - Replaces the reports of previous runs on the pull request
//!
//! ## Architecture
//!
//! A run is a straight pipeline:
//!
//! 1. **Discovery**: plan files are located under the plan directory
//! 2. **Planning**: each plan is parsed, classified, redacted and rendered
//! 3. **Reporting**: results are assembled into size-bounded reports
//! 4. **Publishing**: previous reports are purged and new ones posted
//!
//! Any plan that cannot be processed stops the run before anything is posted.
//!
//! ## Modules
//!
//! - [`config`]: Run settings, validation and plan discovery
//! - [`plan`]: Plan document types and parsing
//! - [`planner`]: Classification, redaction, diff rendering and report assembly
//! - [`github`]: Pull request context, comment client and publisher
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```sh
//! terraform show -json tfplan > tfplan.json
//! plan-comment comment --plan-dir . --heading-variable stack
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod plan;
pub mod planner;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{find_plan_files, ReportMode, Settings, SettingsValidator};
pub use error::{PlanCommentError, Result};
pub use github::{CommentPublisher, CommentSink, GitHubClient, PullRequestContext};
pub use plan::{PlanDocument, PlanParser};
pub use planner::{ChangeAction, DiffRenderer, PlanChanges, PlanPipeline, ReportAssembler};
