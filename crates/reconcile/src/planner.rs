//! Sync planner - classifies declared items against remote state

use crate::diff::{RemoteIndex, classify};
use crate::entity::Entity;
use crate::types::{Action, PlanSummary};

/// One declared item with its classification
#[derive(Debug)]
pub struct PlannedItem<E: Entity> {
    pub item: E,
    pub action: Action,
    /// Matching remote record, present for `Update` and `Unchanged`
    pub existing: Option<E::Remote>,
}

/// Ordered classification of every declared item of one kind
#[derive(Debug)]
pub struct SyncPlan<E: Entity> {
    items: Vec<PlannedItem<E>>,
}

impl<E: Entity> SyncPlan<E> {
    /// Classify declared items against fetched remote records
    ///
    /// `declared` must already be de-duplicated; declaration order is kept.
    pub fn build(declared: Vec<E>, remote: Vec<E::Remote>) -> Self {
        let mut index = RemoteIndex::<E>::new(remote);

        let items = declared
            .into_iter()
            .map(|item| {
                let action = classify(&item, index.get(item.key()));
                let existing = index.take(item.key());
                PlannedItem {
                    item,
                    action,
                    existing,
                }
            })
            .collect();

        Self { items }
    }

    /// Planned items in declaration order
    pub fn items(&self) -> &[PlannedItem<E>] {
        &self.items
    }

    /// Consume the plan
    pub fn into_items(self) -> Vec<PlannedItem<E>> {
        self.items
    }

    /// Items that need a remote write
    pub fn changes(&self) -> impl Iterator<Item = &PlannedItem<E>> {
        self.items.iter().filter(|p| p.action.is_write())
    }

    /// Count items per action
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary::default();
        for planned in &self.items {
            summary.add(planned.action);
        }
        summary
    }

    /// Number of planned items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
