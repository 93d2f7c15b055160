//! Entity and remote store traits
//!
//! An [`Entity`] is one declared item of a given kind (product, tier, ...).
//! A [`RemoteStore`] is the backend's view of all records of that kind.
//! The engine only ever talks to these two traits, so the same
//! diff/create/update control flow serves every kind.

use anyhow::Result;
use std::fmt;

/// Capability interface for a kind of declared entity
///
/// # Example
///
/// ```
/// use reconcile::Entity;
///
/// #[derive(Debug, Clone)]
/// struct Page { slug: String, title: String }
///
/// #[derive(Debug)]
/// struct RemotePage { slug: String, title: String }
///
/// impl Entity for Page {
///     const KIND: &'static str = "page";
///     type Remote = RemotePage;
///
///     fn key(&self) -> &str { &self.slug }
///     fn remote_key(remote: &RemotePage) -> &str { &remote.slug }
///     fn matches(&self, remote: &RemotePage) -> bool { self.title == remote.title }
///     fn to_body(&self) -> serde_json::Value {
///         serde_json::json!({ "slug": self.slug, "title": self.title })
///     }
/// }
///
/// let page = Page { slug: "home".into(), title: "Home".into() };
/// assert_eq!(page.key(), "home");
/// ```
pub trait Entity: fmt::Debug {
    /// Entity kind name, used in logs and error messages
    const KIND: &'static str;

    /// The backend's representation of this entity
    type Remote: fmt::Debug;

    /// Unique code identifying this entity within its kind
    fn key(&self) -> &str;

    /// Code of a remote record
    fn remote_key(remote: &Self::Remote) -> &str;

    /// Whether the remote record already matches every declared field
    ///
    /// Fields that only exist remotely are ignored.
    fn matches(&self, remote: &Self::Remote) -> bool;

    /// Full request body for a create or update
    fn to_body(&self) -> serde_json::Value;

    /// Human-readable one-line description
    fn describe(&self) -> String {
        format!("{} {}", Self::KIND, self.key())
    }
}

/// Remote backend for one entity kind
///
/// Errors from [`RemoteStore::fetch_all`] abort the whole phase.
/// Errors from [`RemoteStore::create`] and [`RemoteStore::update`] are
/// recorded against the item and the batch continues.
pub trait RemoteStore<E: Entity> {
    /// Fetch every remote record of this kind
    fn fetch_all(&self) -> Result<Vec<E::Remote>>;

    /// Create a remote record from the declared item
    fn create(&self, item: &E) -> Result<()>;

    /// Overwrite an existing remote record with the full declared item
    fn update(&self, item: &E, existing: &E::Remote) -> Result<()>;
}
