//! HTTP transport for the Wordgate API.
//!
//! Blocking `ureq` agent with a global per-request timeout. Non-success
//! statuses are read as data (not transport errors) so the backend's
//! error message can be surfaced.

use crate::backend::Transport;
use crate::error::{Error, Result};
use crate::signature::{HEADER_APP_CODE, HEADER_SIGNATURE, HEADER_TIMESTAMP, sign};
use crate::types::{ClientConfig, Method, normalize_path};
use serde_json::Value;

const USER_AGENT: &str = concat!("wordgate/", env!("CARGO_PKG_VERSION"));

/// Signed HTTP transport.
///
/// # Example
///
/// ```no_run
/// use gatekit::{ClientConfig, HttpTransport, Method, Transport};
///
/// let transport = HttpTransport::new(
///     ClientConfig::new("https://api.wordgate.example.com", "my-app", "s3cret"),
/// ).unwrap();
/// let products = transport.request(Method::Get, "/app/products", None).unwrap();
/// println!("{products}");
/// ```
pub struct HttpTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport for the given backend.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the config is incomplete.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();

        Ok(Self {
            agent: ureq::Agent::new_with_config(agent_config),
            config,
        })
    }

    /// Connection settings this transport was built with.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Attach the authentication headers.
    fn signed<B>(
        &self,
        request: ureq::RequestBuilder<B>,
        timestamp: &str,
        signature: &str,
    ) -> ureq::RequestBuilder<B> {
        request
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .header(HEADER_APP_CODE, self.config.app_code.as_str())
            .header(HEADER_TIMESTAMP, timestamp)
            .header(HEADER_SIGNATURE, signature)
    }
}

impl Transport for HttpTransport {
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let path = normalize_path(path);
        let url = self.config.url(&path);
        let payload = match body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };

        let timestamp = chrono::Utc::now().timestamp();
        let signature = sign(&self.config.app_secret, method, &path, timestamp, &payload);
        let timestamp = timestamp.to_string();

        log::debug!("{method} {url}");

        let mut response = match method {
            Method::Get => self
                .signed(self.agent.get(&url), &timestamp, &signature)
                .call()?,
            Method::Post => self
                .signed(self.agent.post(&url), &timestamp, &signature)
                .header("Content-Type", "application/json")
                .send(payload.as_bytes())?,
        };

        let status = response.status().as_u16();
        let text = response.body_mut().read_to_string()?;
        log::trace!("{method} {url} -> {status}: {text}");

        decode_response(status, &text)
    }
}

/// Turn a status and body into a JSON value or a categorized error.
fn decode_response(status: u16, text: &str) -> Result<Value> {
    if (200..300).contains(&status) {
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        return serde_json::from_str(text)
            .map_err(|e| Error::InvalidResponse(format!("{e} (HTTP {status})")));
    }

    let message = error_message(text);
    match status {
        401 | 403 => Err(Error::Unauthorized { status, message }),
        _ => Err(Error::Api { status, message }),
    }
}

/// Best-effort error message from an error body.
fn error_message(text: &str) -> String {
    serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| match text.trim() {
            "" => "empty response body".to_string(),
            other => other.to_string(),
        })
}
