//! Sync executor - fetches remote state once, then applies the plan
//! item by item in declaration order

use crate::context::ProgressCallback;
use crate::diff::dedupe_last_wins;
use crate::entity::{Entity, RemoteStore};
use crate::error::{Result, SyncError};
use crate::planner::{PlannedItem, SyncPlan};
use crate::types::{Action, ItemResult, SyncOutcome};

/// Reconcile one declared list against the remote backend
///
/// Makes exactly one [`RemoteStore::fetch_all`] call, then one create or
/// update call per item that differs. Items that already match are never
/// written, so re-running with unchanged declarations is a no-op.
///
/// # Errors
///
/// Returns [`SyncError::Fetch`] if the remote state cannot be fetched.
/// Failures of individual create/update calls are recorded in the
/// returned [`SyncOutcome`] and never abort the batch.
pub fn sync_entities<E, S, P>(store: &S, declared: Vec<E>, progress: &mut P) -> Result<SyncOutcome>
where
    E: Entity,
    S: RemoteStore<E> + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let plan = plan_entities(store, declared)?;
    Ok(apply_plan(store, plan, progress))
}

/// De-duplicate, fetch remote state and classify, without writing anything
pub fn plan_entities<E, S>(store: &S, declared: Vec<E>) -> Result<SyncPlan<E>>
where
    E: Entity,
    S: RemoteStore<E> + ?Sized,
{
    let declared = dedupe_last_wins(declared);

    let remote = store
        .fetch_all()
        .map_err(|e| SyncError::fetch(E::KIND, &e))?;

    log::debug!(
        "fetched {} remote {} record(s) for {} declared",
        remote.len(),
        E::KIND,
        declared.len()
    );

    Ok(SyncPlan::build(declared, remote))
}

/// Apply a plan sequentially, recording every item's result
pub fn apply_plan<E, S, P>(store: &S, plan: SyncPlan<E>, progress: &mut P) -> SyncOutcome
where
    E: Entity,
    S: RemoteStore<E> + ?Sized,
    P: ProgressCallback + ?Sized,
{
    let mut outcome = SyncOutcome::default();
    progress.on_phase_start(E::KIND, plan.len());

    for planned in plan.into_items() {
        let result = apply_item(store, &planned);
        if let ItemResult::Failed { error } = &result {
            log::warn!("{} failed to {}: {error}", planned.item.describe(), planned.action);
        }
        progress.on_item_complete(planned.item.key(), planned.action, &result);
        outcome.record(planned.item.key(), &result);
    }

    progress.on_phase_complete(E::KIND, &outcome);
    outcome
}

/// Apply a single planned item
fn apply_item<E, S>(store: &S, planned: &PlannedItem<E>) -> ItemResult
where
    E: Entity,
    S: RemoteStore<E> + ?Sized,
{
    let (call, done) = match (planned.action, planned.existing.as_ref()) {
        (Action::Unchanged, _) => return ItemResult::Unchanged,
        (Action::Update, Some(existing)) => {
            (store.update(&planned.item, existing), ItemResult::Updated)
        }
        _ => (store.create(&planned.item), ItemResult::Created),
    };

    match call {
        Ok(()) => done,
        Err(e) => ItemResult::Failed {
            error: format!("{e:#}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::NoProgress;
    use crate::testing::{Item, MemoryStore, Record};

    #[test]
    fn test_create_and_unchanged() {
        let store = MemoryStore::with_records(vec![Record::new("A", "Course A", 100)]);
        let declared = vec![Item::new("A", "Course A", 100), Item::new("B", "Course B", 200)];

        let outcome = sync_entities(&store, declared, &mut NoProgress).unwrap();

        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.created, 1);
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.unchanged, 1);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.success);
        assert_eq!(store.fetch_calls(), 1);
        assert_eq!(store.write_calls(), 1);
    }

    #[test]
    fn test_update_sends_full_record() {
        let store = MemoryStore::with_records(vec![Record::new("A", "Old", 100)]);

        let outcome = sync_entities(&store, vec![Item::new("A", "New", 150)], &mut NoProgress)
            .unwrap();

        assert_eq!(outcome.updated, 1);
        let record = store.record("A").unwrap();
        assert_eq!(record.name, "New");
        assert_eq!(record.price, 150);
    }

    #[test]
    fn test_empty_declared_list() {
        let store = MemoryStore::default();

        let outcome = sync_entities(&store, Vec::<Item>::new(), &mut NoProgress).unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.total, 0);
        assert!(outcome.is_consistent());
        assert_eq!(store.write_calls(), 0);
    }

    #[test]
    fn test_duplicates_processed_once_with_last_attributes() {
        let store = MemoryStore::default();
        let declared = vec![Item::new("A", "First", 100), Item::new("A", "Second", 100)];

        let outcome = sync_entities(&store, declared, &mut NoProgress).unwrap();

        assert_eq!(outcome.total, 1);
        assert_eq!(outcome.created, 1);
        assert_eq!(store.record("A").unwrap().name, "Second");
    }

    #[test]
    fn test_partial_failure_does_not_abort_batch() {
        let store = MemoryStore::default();
        store.fail_writes_for("B");
        let declared = vec![
            Item::new("A", "a", 1),
            Item::new("B", "b", 2),
            Item::new("C", "c", 3),
        ];

        let outcome = sync_entities(&store, declared, &mut NoProgress).unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].code, "B");
        assert!(outcome.errors[0].message.contains("rejected"));
        assert!(store.record("A").is_some());
        assert!(store.record("C").is_some());
        assert!(outcome.is_consistent());
    }

    #[test]
    fn test_fetch_failure_is_fatal() {
        let store = MemoryStore::default();
        store.fail_fetch();

        let err = sync_entities(&store, vec![Item::new("A", "a", 1)], &mut NoProgress)
            .unwrap_err();

        assert!(matches!(err, SyncError::Fetch { kind: "item", .. }));
        assert_eq!(store.write_calls(), 0);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let store = MemoryStore::with_records(vec![Record::new("A", "stale", 1)]);
        let declared = || vec![Item::new("A", "a", 1), Item::new("B", "b", 2)];

        let first = sync_entities(&store, declared(), &mut NoProgress).unwrap();
        assert_eq!(first.total_changes(), 2);

        let writes_after_first = store.write_calls();
        let second = sync_entities(&store, declared(), &mut NoProgress).unwrap();

        assert_eq!(second.created, 0);
        assert_eq!(second.updated, 0);
        assert_eq!(second.failed, 0);
        assert_eq!(second.unchanged, second.total);
        assert_eq!(store.write_calls(), writes_after_first);
    }

    #[test]
    fn test_plan_entities_does_not_write() {
        let store = MemoryStore::with_records(vec![Record::new("A", "old", 1)]);

        let plan = plan_entities(&store, vec![Item::new("A", "a", 1), Item::new("B", "b", 2)])
            .unwrap();

        let summary = plan.summary();
        assert_eq!(summary.update, 1);
        assert_eq!(summary.create, 1);
        assert_eq!(store.write_calls(), 0);
    }
}
