//! Sync engine for wordgate
//!
//! The engine wires the generic reconcile flow to the Wordgate API:
//! 1. Entities - Product and MembershipTier comparison and request bodies
//! 2. Store - list and upsert endpoints per entity kind
//! 3. Orchestrator - app config, then tiers, then products
//! 4. Preview - dry-run classification without writes

#![allow(dead_code)]

pub mod entities;
pub mod orchestrator;
pub mod preview;
pub mod store;

pub use orchestrator::{OverallResult, Syncer};
pub use preview::{DryRunOptions, PreviewResult};
