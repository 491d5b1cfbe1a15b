//! Plan document module.
//!
//! This module handles the input side of a run:
//! - The serde types mirroring `terraform show -json` output
//! - Reading and parsing plan files into those types

mod types;
mod parser;

pub use types::{Attributes, PlanDocument, PlanVariable, RawAction, ResourceChange, ResourceChangeDetail};
pub use parser::PlanParser;
