//! In-memory entity kind and store used by the unit tests

use crate::entity::{Entity, RemoteStore};
use anyhow::{Result, bail};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub code: String,
    pub name: String,
    pub price: u64,
}

impl Item {
    pub fn new(code: &str, name: &str, price: u64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub code: String,
    pub name: String,
    pub price: u64,
}

impl Record {
    pub fn new(code: &str, name: &str, price: u64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            price,
        }
    }
}

impl Entity for Item {
    const KIND: &'static str = "item";
    type Remote = Record;

    fn key(&self) -> &str {
        &self.code
    }

    fn remote_key(remote: &Record) -> &str {
        &remote.code
    }

    fn matches(&self, remote: &Record) -> bool {
        self.name == remote.name && self.price == remote.price
    }

    fn to_body(&self) -> serde_json::Value {
        serde_json::json!({ "code": self.code, "name": self.name, "price": self.price })
    }
}

/// Store that keeps records in memory and counts calls
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<String, Record>>,
    failing: RefCell<HashSet<String>>,
    fetch_fails: Cell<bool>,
    fetches: Cell<usize>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<Record>) -> Self {
        let store = Self::default();
        for record in records {
            store.records.borrow_mut().insert(record.code.clone(), record);
        }
        store
    }

    pub fn fail_writes_for(&self, code: &str) {
        self.failing.borrow_mut().insert(code.to_string());
    }

    pub fn fail_fetch(&self) {
        self.fetch_fails.set(true);
    }

    pub fn record(&self, code: &str) -> Option<Record> {
        self.records.borrow().get(code).cloned()
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetches.get()
    }

    pub fn write_calls(&self) -> usize {
        self.writes.get()
    }

    fn write(&self, item: &Item) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        if self.failing.borrow().contains(&item.code) {
            bail!("rejected by backend: {}", item.code);
        }
        self.records.borrow_mut().insert(
            item.code.clone(),
            Record::new(&item.code, &item.name, item.price),
        );
        Ok(())
    }
}

impl RemoteStore<Item> for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<Record>> {
        self.fetches.set(self.fetches.get() + 1);
        if self.fetch_fails.get() {
            bail!("connection refused");
        }
        Ok(self.records.borrow().values().cloned().collect())
    }

    fn create(&self, item: &Item) -> Result<()> {
        self.write(item)
    }

    fn update(&self, item: &Item, _existing: &Record) -> Result<()> {
        self.write(item)
    }
}
