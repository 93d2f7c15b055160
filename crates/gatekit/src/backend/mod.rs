//! Transport trait and implementations.
//!
//! [`Transport`] is the single request/response seam between the sync
//! engine and the Wordgate backend. [`http::HttpTransport`] talks to the
//! real API; [`MockTransport`] answers from memory.
//!
//! # Testing
//!
//! Use [`MockTransport`] for testing without network access:
//!
//! ```
//! use gatekit::{Method, MockTransport, Transport};
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.respond(Method::Get, "/app/products", json!({ "items": [] }));
//!
//! let response = mock.request(Method::Get, "/app/products", None).unwrap();
//! assert_eq!(response, json!({ "items": [] }));
//! assert_eq!(mock.calls_to(Method::Get, "/app/products"), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{Method, RecordedCall, normalize_path};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Request/response exchange with the Wordgate backend.
pub trait Transport {
    /// Send one request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a network, auth, API or protocol error; see [`Error`].
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        (**self).request(method, path, body)
    }
}

type Route = (Method, String);

/// Transport that answers from scripted responses and records every call.
///
/// Responses for a route are consumed in order; the last one is repeated
/// for any further calls. Clones share state, so a clone can be handed to
/// the code under test while the original is used for assertions.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<Route, VecDeque<Result<Value>>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockTransport {
    /// Create a new mock with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response for a route.
    pub fn respond(&self, method: Method, path: &str, response: Value) {
        self.push(method, path, Ok(response));
    }

    /// Queue a failure for a route.
    pub fn fail(&self, method: Method, path: &str, error: Error) {
        self.push(method, path, Err(error));
    }

    /// All calls made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls made to a route.
    #[must_use]
    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        let path = normalize_path(path);
        lock(&self.calls)
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    /// Number of mutating calls made so far.
    #[must_use]
    pub fn write_calls(&self) -> usize {
        lock(&self.calls).iter().filter(|c| c.method.is_write()).count()
    }

    fn push(&self, method: Method, path: &str, response: Result<Value>) {
        lock(&self.routes)
            .entry((method, normalize_path(path)))
            .or_default()
            .push_back(response);
    }
}

impl Transport for MockTransport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let path = normalize_path(path);
        lock(&self.calls).push(RecordedCall {
            method,
            path: path.clone(),
            body: body.cloned(),
        });

        let mut routes = lock(&self.routes);
        let queue = routes
            .get_mut(&(method, path.clone()))
            .filter(|q| !q.is_empty())
            .ok_or_else(|| Error::api(404, format!("no mock response for {method} {path}")))?;

        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| Err(Error::api(404, "mock queue drained")))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(Error::api(404, "mock queue drained")))
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mock_unknown_route_is_404() {
        let mock = MockTransport::new();
        let err = mock.request(Method::Get, "/nope", None).unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn test_mock_queue_then_sticky_last() {
        let mock = MockTransport::new();
        mock.respond(Method::Post, "/app/products", json!({ "n": 1 }));
        mock.respond(Method::Post, "/app/products", json!({ "n": 2 }));

        let first = mock.request(Method::Post, "/app/products", None).unwrap();
        let second = mock.request(Method::Post, "/app/products", None).unwrap();
        let third = mock.request(Method::Post, "app/products", None).unwrap();

        assert_eq!(first["n"], 1);
        assert_eq!(second["n"], 2);
        assert_eq!(third["n"], 2);
        assert_eq!(mock.calls_to(Method::Post, "/app/products"), 3);
    }

    #[test]
    fn test_mock_records_bodies_and_writes() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/a", json!([]));
        mock.respond(Method::Post, "/b", json!({}));

        mock.request(Method::Get, "/a", None).unwrap();
        mock.request(Method::Post, "/b", Some(&json!({ "code": "X" }))).unwrap();

        assert_eq!(mock.write_calls(), 1);
        let calls = mock.calls();
        assert_eq!(calls[1].body, Some(json!({ "code": "X" })));
    }

    #[test]
    fn test_mock_scripted_failure() {
        let mock = MockTransport::new();
        mock.fail(
            Method::Get,
            "/app/products",
            Error::Network {
                message: "connection refused".into(),
            },
        );

        let err = mock.request(Method::Get, "/app/products", None).unwrap_err();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_clones_share_state() {
        let mock = MockTransport::new();
        let handle = mock.clone();
        mock.respond(Method::Get, "/x", json!(null));

        handle.request(Method::Get, "/x", None).unwrap();
        assert_eq!(mock.calls_to(Method::Get, "/x"), 1);
    }
}
