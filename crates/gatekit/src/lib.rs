//! # gatekit
//!
//! Blocking client for the Wordgate commerce API.
//!
//! This crate provides:
//! - An immutable [`ClientConfig`] (base URL, credentials, timeout)
//! - The [`Transport`] seam with a signed HTTP implementation
//! - A [`MockTransport`] for tests
//! - A typed [`Client`] on top of any transport
//!
//! ## Example
//!
//! ```no_run
//! use gatekit::{Client, ClientConfig};
//! use serde_json::{Value, json};
//!
//! let client = Client::new(ClientConfig::new(
//!     "https://api.wordgate.example.com",
//!     "my-app",
//!     "s3cret",
//! ))
//! .expect("invalid config");
//!
//! let products: Value = client.get("/app/products").expect("request failed");
//! let saved: Value = client
//!     .post("/app/products", &json!({ "code": "COURSE001", "name": "Course", "price": 9900 }))
//!     .expect("request failed");
//! println!("{products} {saved}");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod signature;
pub mod types;

pub use backend::http::HttpTransport;
pub use backend::{MockTransport, Transport};
pub use error::{Error, ErrorCategory, Result};
pub use types::{ClientConfig, DEFAULT_TIMEOUT, Method, RecordedCall};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Typed client over a [`Transport`].
///
/// # Example
///
/// ```
/// use gatekit::{Client, Method, MockTransport};
/// use serde_json::json;
///
/// let mock = MockTransport::new();
/// mock.respond(Method::Get, "/app/products", json!([{ "code": "A" }]));
///
/// let client = Client::with_transport(Box::new(mock.clone()));
/// let items: Vec<serde_json::Value> = client.get("/app/products").unwrap();
/// assert_eq!(items.len(), 1);
/// ```
pub struct Client {
    transport: Box<dyn Transport>,
}

impl Client {
    /// Create a client with the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config is incomplete.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Box::new(HttpTransport::new(config)?),
        })
    }

    /// Create a client with a custom transport (useful for testing).
    #[must_use]
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Send a GET request and decode the response.
    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let value = self.transport.request(Method::Get, path, None)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a POST request with a JSON body and decode the response.
    pub fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body)?;
        let value = self.transport.request(Method::Post, path, Some(&body))?;
        Ok(serde_json::from_value(value)?)
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Ack {
        success: bool,
        #[serde(default)]
        message: String,
    }

    #[test]
    fn test_client_new_rejects_bad_config() {
        assert!(Client::new(ClientConfig::new("not a url", "app", "secret")).is_err());
    }

    #[test]
    fn test_client_post_decodes_typed_response() {
        let mock = MockTransport::new();
        mock.respond(
            Method::Post,
            "/app/config",
            json!({ "success": true, "message": "saved" }),
        );
        let client = Client::with_transport(Box::new(mock.clone()));

        let ack: Ack = client.post("/app/config", &json!({ "name": "demo" })).unwrap();

        assert!(ack.success);
        assert_eq!(ack.message, "saved");
        assert_eq!(mock.calls()[0].body, Some(json!({ "name": "demo" })));
    }

    #[test]
    fn test_client_get_type_mismatch_is_protocol_error() {
        let mock = MockTransport::new();
        mock.respond(Method::Get, "/app/config", json!("just a string"));
        let client = Client::with_transport(Box::new(mock));

        let err = client.get::<Ack>("/app/config").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }
}
