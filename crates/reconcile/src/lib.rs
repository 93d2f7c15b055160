//! # Reconcile
//!
//! One-directional reconciliation of declared entities against a remote
//! authority.
//!
//! For each entity kind the engine takes the declared list, fetches the
//! remote records once, classifies every declared item as create, update
//! or unchanged, and applies the minimal set of writes.
//!
//! ## Core Concepts
//!
//! - **Entity**: a declared item with a unique code (product, tier, ...)
//! - **RemoteStore**: the backend's records for one entity kind
//! - **SyncPlan**: classification of every declared item
//! - **SyncOutcome**: counters and per-item errors for one kind
//!
//! ## Failure model
//!
//! A failed remote fetch aborts the phase with a [`SyncError`]. A failed
//! create or update is recorded in the [`SyncOutcome`] and every remaining
//! item is still attempted.
//!
//! ## Provider Traits
//!
//! - [`RemoteStore`]: talks to the backend for one kind
//! - [`ProgressCallback`]: receives progress updates
//!
//! Both are plain traits so the engine can run against an HTTP client, an
//! in-memory fake, or anything else.

pub mod context;
pub mod diff;
pub mod entity;
pub mod error;
pub mod executor;
pub mod planner;
pub mod types;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use context::{NoProgress, ProgressCallback};
pub use diff::{RemoteIndex, classify, dedupe_last_wins, duplicate_codes};
pub use entity::{Entity, RemoteStore};
pub use error::{Result, SyncError};
pub use executor::{apply_plan, plan_entities, sync_entities};
pub use planner::{PlannedItem, SyncPlan};
pub use types::{Action, ItemError, ItemResult, PlanSummary, SyncOutcome};
