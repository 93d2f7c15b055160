//! Runs the app config, membership tier and product phases in order

use super::preview::{DryRunOptions, PlanPreview, PreviewResult};
use super::store::{APP_CONFIG_PATH, ApiStore, PRODUCTS_PATH, TIERS_PATH, check_ack};
use crate::config::Project;
use crate::schema::{MembershipTier, Product};
use anyhow::{Context, Result};
use gatekit::{Client, Transport};
use reconcile::{Entity, NoProgress, ProgressCallback, SyncOutcome};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

// ============================================================================
// Phases
// ============================================================================

/// Where a `sync_all` run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    SyncingAppConfig,
    SyncingTiers,
    SyncingProducts,
    Done,
    Aborted,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::SyncingAppConfig => "syncing app config",
            Self::SyncingTiers => "syncing membership tiers",
            Self::SyncingProducts => "syncing products",
            Self::Done => "done",
            Self::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Results
// ============================================================================

/// Response of the app config upsert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfigResult {
    pub success: bool,
    pub name: String,
    pub message: String,
}

/// Result of a whole `sync_all` run
///
/// `memberships` and `products` are `None` when the run aborted before
/// reaching them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallResult {
    pub success: bool,
    pub app_config: AppConfigResult,
    pub memberships: Option<SyncOutcome>,
    pub products: Option<SyncOutcome>,
    pub error_message: String,
}

impl OverallResult {
    fn aborted(message: String) -> Self {
        Self {
            success: false,
            app_config: AppConfigResult {
                success: false,
                name: String::new(),
                message: message.clone(),
            },
            memberships: None,
            products: None,
            error_message: message,
        }
    }

    /// Outcomes of the phases that ran
    pub fn outcomes(&self) -> impl Iterator<Item = &SyncOutcome> {
        self.memberships.iter().chain(self.products.iter())
    }

    /// Whether any item failed inside an otherwise successful run
    pub fn is_degraded(&self) -> bool {
        self.success && self.outcomes().any(|o| o.failed > 0)
    }
}

// ============================================================================
// Syncer
// ============================================================================

/// Pushes one loaded project to one backend
pub struct Syncer<'a> {
    project: &'a Project,
    client: Client,
    phase: Phase,
}

impl<'a> Syncer<'a> {
    /// Create a syncer over an explicit transport
    pub fn new(project: &'a Project, transport: Box<dyn Transport>) -> Self {
        Self {
            project,
            client: Client::with_transport(transport),
            phase: Phase::Idle,
        }
    }

    /// Create a syncer talking HTTP to the project's backend
    pub fn connect(project: &'a Project) -> Result<Self> {
        let client = Client::new(project.config.client_config())
            .context("Could not create API client")?;
        Ok(Self {
            project,
            client,
            phase: Phase::Idle,
        })
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("Phase: {} -> {phase}", self.phase);
        self.phase = phase;
    }

    /// Run every phase without progress reporting
    pub fn sync_all(&mut self) -> OverallResult {
        self.sync_all_with(&mut NoProgress)
    }

    /// Run app config, then tiers, then products
    ///
    /// An app config failure aborts the run before any entity is fetched.
    /// A failed fetch in a later phase aborts only that phase; the run
    /// continues and reports `success = false`.
    pub fn sync_all_with(&mut self, progress: &mut dyn ProgressCallback) -> OverallResult {
        self.enter(Phase::SyncingAppConfig);
        let app_config = match self.sync_app_config() {
            Ok(result) => result,
            Err(e) => {
                let message = format!("App config sync failed: {e:#}");
                log::error!("{message}");
                self.enter(Phase::Aborted);
                return OverallResult::aborted(message);
            }
        };

        self.enter(Phase::SyncingTiers);
        let memberships = self.sync_memberships_with(progress);

        self.enter(Phase::SyncingProducts);
        let products = self.sync_products_with(progress);

        let fatal: Vec<&str> = [&memberships, &products]
            .into_iter()
            .filter_map(|o| o.fatal_error.as_deref())
            .collect();
        let success = fatal.is_empty();
        let error_message = fatal.join("; ");

        self.enter(Phase::Done);
        OverallResult {
            success,
            app_config,
            memberships: Some(memberships),
            products: Some(products),
            error_message,
        }
    }

    /// Push app-level settings
    ///
    /// Transport errors and an explicit `"success": false` are both fatal.
    pub fn sync_app_config(&self) -> Result<AppConfigResult> {
        let config = &self.project.config;
        let body = json!({
            "name": config.app.name,
            "description": config.app.description,
            "currency": config.app.currency,
            "config": config.config,
        });

        let response: Value = self
            .client
            .post(APP_CONFIG_PATH, &body)
            .with_context(|| format!("POST {APP_CONFIG_PATH}"))?;
        check_ack(&response).context("Backend rejected the app config")?;

        let field = |name: &str| {
            response
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let name = field("name");

        Ok(AppConfigResult {
            success: true,
            name: if name.is_empty() { config.app.name.clone() } else { name },
            message: field("message"),
        })
    }

    /// Reconcile membership tiers
    pub fn sync_memberships(&self) -> SyncOutcome {
        self.sync_memberships_with(&mut NoProgress)
    }

    /// Reconcile membership tiers, reporting progress
    pub fn sync_memberships_with(&self, progress: &mut dyn ProgressCallback) -> SyncOutcome {
        let store = ApiStore::<MembershipTier>::new(&self.client, TIERS_PATH);
        run_phase(&store, self.project.tiers.clone(), progress)
    }

    /// Reconcile products
    pub fn sync_products(&self) -> SyncOutcome {
        self.sync_products_with(&mut NoProgress)
    }

    /// Reconcile products, reporting progress
    pub fn sync_products_with(&self, progress: &mut dyn ProgressCallback) -> SyncOutcome {
        let store = ApiStore::<Product>::new(&self.client, PRODUCTS_PATH);
        run_phase(&store, self.project.products.clone(), progress)
    }

    /// Show what a sync would do, without any create or update call
    ///
    /// With `compare_remote`, each kind's list endpoint is read once. A
    /// failed read is recorded in the preview.
    pub fn dry_run(&self, options: DryRunOptions) -> PreviewResult {
        let (membership_plan, product_plan) = if options.compare_remote {
            let tiers = ApiStore::<MembershipTier>::new(&self.client, TIERS_PATH);
            let products = ApiStore::<Product>::new(&self.client, PRODUCTS_PATH);
            (
                PlanPreview::compare(&tiers, &self.project.tiers),
                PlanPreview::compare(&products, &self.project.products),
            )
        } else {
            (
                PlanPreview::declared_only(self.project.tiers.len()),
                PlanPreview::declared_only(self.project.products.len()),
            )
        };

        PreviewResult {
            app: self.project.config.app.clone(),
            memberships: self.project.tiers.clone(),
            products: self.project.products.clone(),
            membership_plan,
            product_plan,
        }
    }
}

fn run_phase<E, S>(store: &S, declared: Vec<E>, progress: &mut dyn ProgressCallback) -> SyncOutcome
where
    E: Entity,
    S: reconcile::RemoteStore<E>,
{
    match reconcile::sync_entities(store, declared, progress) {
        Ok(outcome) => {
            log::info!(
                "{}: {} created, {} updated, {} unchanged, {} failed",
                E::KIND,
                outcome.created,
                outcome.updated,
                outcome.unchanged,
                outcome.failed
            );
            outcome
        }
        Err(e) => {
            log::error!("{e}");
            SyncOutcome::aborted(e.to_string())
        }
    }
}
