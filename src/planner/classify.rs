//! Action classification for resource changes.
//!
//! This module resolves the raw verb list of a resource change into a single
//! report category and keeps the per-plan counters.

use serde::Serialize;
use std::ops::AddAssign;

use crate::error::PlanError;
use crate::plan::RawAction;

/// Report category of a resource change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    /// Resource will be created.
    Create,
    /// Resource will be updated in place.
    Update,
    /// Resource will be destroyed.
    Destroy,
    /// Resource will be destroyed and created again.
    Replace,
    /// Existing resource will be imported.
    Import,
}

/// Counters for each category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    /// Resources counted as created (including replacements).
    pub create: usize,
    /// Resources updated in place.
    pub update: usize,
    /// Resources counted as destroyed (including replacements).
    pub destroy: usize,
    /// Resources replaced.
    pub replace: usize,
    /// Resources imported.
    pub import: usize,
}

/// A classified and rendered resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedChange {
    /// Resource address.
    pub address: String,
    /// Rendered diff fragment.
    pub diff: String,
    /// Resolved category.
    pub action: ChangeAction,
}

/// Per-plan accumulator of resolved changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanChanges {
    counts: ChangeCounts,
    changes: Vec<ResolvedChange>,
}

impl ChangeAction {
    /// All categories, in report order.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Update,
        Self::Replace,
        Self::Destroy,
        Self::Import,
    ];

    /// Resolves the category of a resource change.
    ///
    /// Returns `Ok(None)` for records that produce no report entry: true
    /// no-ops and data source reads.
    ///
    /// # Errors
    ///
    /// Returns an error if `actions` is empty or starts with an unknown verb.
    pub fn classify(
        address: &str,
        actions: &[RawAction],
        importing: bool,
    ) -> Result<Option<Self>, PlanError> {
        let Some(first) = actions.first() else {
            return Err(PlanError::EmptyActions {
                address: address.to_string(),
            });
        };

        let action = match first {
            RawAction::NoOp if importing => Some(Self::Import),
            RawAction::NoOp | RawAction::Read => None,
            RawAction::Create if actions.contains(&RawAction::Delete) => Some(Self::Replace),
            RawAction::Create => Some(Self::Create),
            RawAction::Delete if actions.contains(&RawAction::Create) => Some(Self::Replace),
            RawAction::Delete => Some(Self::Destroy),
            RawAction::Update => Some(Self::Update),
            RawAction::Unknown(verb) => {
                return Err(PlanError::UnclassifiedAction {
                    address: address.to_string(),
                    verb: verb.clone(),
                });
            }
        };

        Ok(action)
    }

    /// Returns the lowercase action name used in diff labels.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
            Self::Replace => "replace",
            Self::Import => "import",
        }
    }

    /// Returns the capitalized category title used in reports.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Destroy => "Destroy",
            Self::Replace => "Replace",
            Self::Import => "Import",
        }
    }
}

impl ChangeCounts {
    /// Increments the counters for one resolved change.
    ///
    /// A replacement counts as a create, a destroy and a replace.
    pub const fn record(&mut self, action: ChangeAction) {
        match action {
            ChangeAction::Create => self.create += 1,
            ChangeAction::Update => self.update += 1,
            ChangeAction::Destroy => self.destroy += 1,
            ChangeAction::Replace => {
                self.create += 1;
                self.destroy += 1;
                self.replace += 1;
            }
            ChangeAction::Import => self.import += 1,
        }
    }

    /// Returns the counter for a category.
    #[must_use]
    pub const fn get(&self, action: ChangeAction) -> usize {
        match action {
            ChangeAction::Create => self.create,
            ChangeAction::Update => self.update,
            ChangeAction::Destroy => self.destroy,
            ChangeAction::Replace => self.replace,
            ChangeAction::Import => self.import,
        }
    }

    /// Returns true if no counter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.create == 0
            && self.update == 0
            && self.destroy == 0
            && self.replace == 0
            && self.import == 0
    }
}

impl AddAssign for ChangeCounts {
    fn add_assign(&mut self, other: Self) {
        self.create += other.create;
        self.update += other.update;
        self.destroy += other.destroy;
        self.replace += other.replace;
        self.import += other.import;
    }
}

impl PlanChanges {
    /// Creates an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: ChangeCounts {
                create: 0,
                update: 0,
                destroy: 0,
                replace: 0,
                import: 0,
            },
            changes: Vec::new(),
        }
    }

    /// Appends a resolved change and updates the counters.
    pub fn push(&mut self, change: ResolvedChange) {
        self.counts.record(change.action);
        self.changes.push(change);
    }

    /// Returns the counters.
    #[must_use]
    pub const fn counts(&self) -> &ChangeCounts {
        &self.counts
    }

    /// Returns all resolved changes in plan order.
    #[must_use]
    pub fn changes(&self) -> &[ResolvedChange] {
        &self.changes
    }

    /// Returns the resolved changes of one category, in plan order.
    pub fn of_action(&self, action: ChangeAction) -> impl Iterator<Item = &ResolvedChange> {
        self.changes.iter().filter(move |c| c.action == action)
    }

    /// Returns true if no change was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of resolved changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::fmt::Display for ChangeCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to replace, {} to destroy, {} to import",
            self.create, self.update, self.replace, self.destroy, self.import
        )
    }
}
