//! Diff computation between declared items and remote records

use crate::entity::Entity;
use crate::types::Action;
use std::collections::HashMap;

/// Collapse items sharing a code, last declaration wins
///
/// The surviving item keeps the position of the first declaration of its
/// code, so the overall declaration order stays stable.
pub fn dedupe_last_wins<E: Entity>(items: Vec<E>) -> Vec<E> {
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(items.len());
    let mut out: Vec<E> = Vec::with_capacity(items.len());

    for item in items {
        match positions.get(item.key()).copied() {
            Some(idx) => {
                log::debug!("duplicate {} code '{}', later declaration wins", E::KIND, item.key());
                out[idx] = item;
            }
            None => {
                positions.insert(item.key().to_string(), out.len());
                out.push(item);
            }
        }
    }

    out
}

/// Codes declared more than once, in order of first repetition
pub fn duplicate_codes<E: Entity>(items: &[E]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut dupes = Vec::new();
    for item in items {
        let count = seen.entry(item.key()).or_insert(0);
        *count += 1;
        if *count == 2 {
            dupes.push(item.key().to_string());
        }
    }
    dupes
}

/// Remote records of one kind, indexed by code
#[derive(Debug)]
pub struct RemoteIndex<E: Entity> {
    records: HashMap<String, E::Remote>,
}

impl<E: Entity> RemoteIndex<E> {
    /// Index fetched records by code
    pub fn new(records: Vec<E::Remote>) -> Self {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            let code = E::remote_key(&record).to_string();
            if map.insert(code.clone(), record).is_some() {
                log::warn!("remote returned more than one {} with code '{code}'", E::KIND);
            }
        }
        Self { records: map }
    }

    /// Look up a remote record
    pub fn get(&self, code: &str) -> Option<&E::Remote> {
        self.records.get(code)
    }

    /// Take a remote record out of the index
    pub fn take(&mut self, code: &str) -> Option<E::Remote> {
        self.records.remove(code)
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no records were fetched
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Decide what to do with one declared item
pub fn classify<E: Entity>(item: &E, existing: Option<&E::Remote>) -> Action {
    match existing {
        None => Action::Create,
        Some(remote) if item.matches(remote) => Action::Unchanged,
        Some(_) => Action::Update,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Item, Record};

    #[test]
    fn test_dedupe_last_wins_keeps_first_position() {
        let items = vec![
            Item::new("A", "first", 1),
            Item::new("B", "b", 2),
            Item::new("A", "second", 3),
        ];

        let deduped = dedupe_last_wins(items);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].code, "A");
        assert_eq!(deduped[0].name, "second");
        assert_eq!(deduped[1].code, "B");
    }

    #[test]
    fn test_duplicate_codes() {
        let items = vec![
            Item::new("A", "a", 1),
            Item::new("A", "a", 1),
            Item::new("A", "a", 1),
            Item::new("B", "b", 2),
        ];
        assert_eq!(duplicate_codes(&items), vec!["A".to_string()]);
    }

    #[test]
    fn test_classify() {
        let item = Item::new("A", "a", 100);

        assert_eq!(classify(&item, None), Action::Create);
        assert_eq!(
            classify(&item, Some(&Record::new("A", "a", 100))),
            Action::Unchanged
        );
        assert_eq!(
            classify(&item, Some(&Record::new("A", "a", 200))),
            Action::Update
        );
    }

    #[test]
    fn test_remote_index_lookup() {
        let mut index: RemoteIndex<Item> =
            RemoteIndex::new(vec![Record::new("A", "a", 1), Record::new("B", "b", 2)]);

        assert_eq!(index.len(), 2);
        assert!(index.get("A").is_some());
        assert!(index.get("Z").is_none());
        assert!(index.take("B").is_some());
        assert!(index.get("B").is_none());
    }
}
