//! Core types for entity reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the engine decided to do with one declared item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// No remote record with this code exists
    Create,
    /// A remote record exists but differs from the declared one
    Update,
    /// Remote record already matches the declaration
    Unchanged,
}

impl Action {
    /// Check if the action requires a remote write
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }

    /// Short symbol used when rendering plans
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update => "~",
            Self::Unchanged => "=",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// A per-item failure recorded during a sync phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemError {
    /// Code of the declared item that failed
    pub code: String,
    /// Human-readable failure message
    pub message: String,
}

/// Result of applying a single declared item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemResult {
    /// Remote record was created
    Created,
    /// Remote record was overwritten with the declared attributes
    Updated,
    /// Nothing was written
    Unchanged,
    /// The create or update call failed
    Failed { error: String },
}

impl ItemResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// Outcome of reconciling one entity kind
///
/// Counters always satisfy `total == created + updated + unchanged + failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub success: bool,
    pub total: usize,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub errors: Vec<ItemError>,
    /// Set when the phase was aborted before any item was attempted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<String>,
}

impl Default for SyncOutcome {
    fn default() -> Self {
        Self {
            success: true,
            total: 0,
            created: 0,
            updated: 0,
            unchanged: 0,
            failed: 0,
            errors: Vec::new(),
            fatal_error: None,
        }
    }
}

impl SyncOutcome {
    /// Outcome for a phase that could not start (e.g. the remote fetch failed)
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            success: false,
            fatal_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Record the result of one processed item
    pub fn record(&mut self, code: &str, result: &ItemResult) {
        self.total += 1;
        match result {
            ItemResult::Created => self.created += 1,
            ItemResult::Updated => self.updated += 1,
            ItemResult::Unchanged => self.unchanged += 1,
            ItemResult::Failed { error } => {
                self.failed += 1;
                self.errors.push(ItemError {
                    code: code.to_string(),
                    message: error.clone(),
                });
            }
        }
        self.success = self.failed == 0 && self.fatal_error.is_none();
    }

    /// Total number of remote writes that succeeded
    pub fn total_changes(&self) -> usize {
        self.created + self.updated
    }

    /// Check if the phase was aborted by a fatal error
    pub fn is_aborted(&self) -> bool {
        self.fatal_error.is_some()
    }

    /// Check that the counters add up
    pub fn is_consistent(&self) -> bool {
        self.total == self.created + self.updated + self.unchanged + self.failed
            && self.failed == self.errors.len()
    }
}

/// Classification counts for a plan that has not been applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total: usize,
    pub create: usize,
    pub update: usize,
    pub unchanged: usize,
}

impl PlanSummary {
    /// Count one classified item
    pub fn add(&mut self, action: Action) {
        self.total += 1;
        match action {
            Action::Create => self.create += 1,
            Action::Update => self.update += 1,
            Action::Unchanged => self.unchanged += 1,
        }
    }

    /// Number of items that would be written
    pub fn writes(&self) -> usize {
        self.create + self.update
    }

    /// Check if applying the plan would change anything
    pub fn has_changes(&self) -> bool {
        self.writes() > 0
    }
}
