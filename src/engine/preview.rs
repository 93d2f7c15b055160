//! Read-only preview of what a sync would do

use crate::schema::{AppInfo, MembershipTier, Product};
use reconcile::{Action, Entity, PlanSummary, RemoteStore};
use serde::Serialize;

/// Options for [`super::Syncer::dry_run`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DryRunOptions {
    /// Read each kind's remote list once to classify declared items
    pub compare_remote: bool,
}

/// One declared item and what a sync would do with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedAction {
    pub code: String,
    pub action: Action,
}

/// Dry-run view of one entity kind
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanPreview {
    /// Items a real run would classify
    pub declared: usize,

    /// Classification counts, when remote state was compared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PlanSummary>,

    /// Per-item classification, in declaration order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<PlannedAction>,

    /// Why the remote comparison could not be made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PlanPreview {
    /// Preview without contacting the backend
    pub fn declared_only(declared: usize) -> Self {
        Self {
            declared,
            ..Self::default()
        }
    }

    /// Classify declared items against one read of the remote list
    pub fn compare<E, S>(store: &S, declared: &[E]) -> Self
    where
        E: Entity + Clone,
        S: RemoteStore<E>,
    {
        match reconcile::plan_entities(store, declared.to_vec()) {
            Ok(plan) => Self {
                declared: plan.len(),
                summary: Some(plan.summary()),
                actions: plan
                    .items()
                    .iter()
                    .map(|p| PlannedAction {
                        code: p.item.key().to_string(),
                        action: p.action,
                    })
                    .collect(),
                error: None,
            },
            Err(e) => {
                log::warn!("Dry run could not compare {}: {e}", E::KIND);
                Self {
                    declared: declared.len(),
                    error: Some(e.to_string()),
                    ..Self::default()
                }
            }
        }
    }
}

/// Everything a real sync would push, plus optional classifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewResult {
    pub app: AppInfo,
    pub memberships: Vec<MembershipTier>,
    pub products: Vec<Product>,
    pub membership_plan: PlanPreview,
    pub product_plan: PlanPreview,
}

impl PreviewResult {
    /// Total number of writes a sync would issue, if known
    pub fn pending_writes(&self) -> Option<usize> {
        let tiers = self.membership_plan.summary?;
        let products = self.product_plan.summary?;
        Some(tiers.writes() + products.writes())
    }
}
