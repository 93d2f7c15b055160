//! Progress reporting hooks
//!
//! The engine stays free of any terminal UI; callers plug in a
//! [`ProgressCallback`] to render progress however they like.

use crate::types::{Action, ItemResult, SyncOutcome};

/// Progress callback for sync phases
pub trait ProgressCallback {
    /// Called before the first item of a phase is applied
    fn on_phase_start(&mut self, kind: &str, count: usize);

    /// Called after each declared item has been handled
    fn on_item_complete(&mut self, code: &str, action: Action, result: &ItemResult);

    /// Called once every item of the phase has been handled
    fn on_phase_complete(&mut self, kind: &str, outcome: &SyncOutcome);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_phase_start(&mut self, _kind: &str, _count: usize) {}
    fn on_item_complete(&mut self, _code: &str, _action: Action, _result: &ItemResult) {}
    fn on_phase_complete(&mut self, _kind: &str, _outcome: &SyncOutcome) {}
}
