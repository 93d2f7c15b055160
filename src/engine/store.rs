//! Remote store backed by the Wordgate API

use anyhow::{Context, Result, bail};
use crate::engine::entities::null_as_default;
use gatekit::Client;
use reconcile::{Entity, RemoteStore};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

pub const APP_CONFIG_PATH: &str = "/app/config";
pub const TIERS_PATH: &str = "/app/membership/tiers";
pub const PRODUCTS_PATH: &str = "/app/products";

/// List endpoints answer with either a bare array or `{ "items": [...] }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListResponse<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(deserialize_with = "null_as_default")]
        items: Vec<T>,
    },
}

impl<T> ListResponse<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { items } => items,
        }
    }
}

/// Check a write response for an explicit `"success": false`
///
/// Responses without a `success` field (including empty bodies) count as
/// accepted.
pub fn check_ack(response: &Value) -> Result<()> {
    if response.get("success").and_then(Value::as_bool) == Some(false) {
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or("rejected by backend");
        bail!("{message}");
    }
    Ok(())
}

/// One entity kind's list and upsert endpoints
pub struct ApiStore<'a, E> {
    client: &'a Client,
    path: &'static str,
    kind: PhantomData<fn() -> E>,
}

impl<'a, E> ApiStore<'a, E> {
    pub fn new(client: &'a Client, path: &'static str) -> Self {
        Self {
            client,
            path,
            kind: PhantomData,
        }
    }

    fn upsert(&self, body: &Value, code: &str) -> Result<()>
    where
        E: Entity,
    {
        let response: Value = self
            .client
            .post(self.path, body)
            .with_context(|| format!("POST {} for {} '{code}'", self.path, E::KIND))?;
        check_ack(&response)
    }
}

impl<E> RemoteStore<E> for ApiStore<'_, E>
where
    E: Entity,
    E::Remote: DeserializeOwned,
{
    fn fetch_all(&self) -> Result<Vec<E::Remote>> {
        let response: ListResponse<E::Remote> = self
            .client
            .get(self.path)
            .with_context(|| format!("GET {}", self.path))?;
        let items = response.into_items();
        log::debug!("Fetched {} remote {} record(s)", items.len(), E::KIND);
        Ok(items)
    }

    fn create(&self, item: &E) -> Result<()> {
        log::debug!("Creating {}", item.describe());
        self.upsert(&item.to_body(), item.key())
    }

    fn update(&self, item: &E, existing: &E::Remote) -> Result<()> {
        log::debug!("Updating {} (remote: {existing:?})", item.describe());
        self.upsert(&item.to_body(), item.key())
    }
}
