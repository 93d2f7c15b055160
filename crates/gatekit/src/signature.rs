//! Request signing.
//!
//! Every request carries `X-App-Code`, `X-Timestamp` and `X-Signature`.
//! The signature is a keyed BLAKE3 hash over the method, path, timestamp
//! and exact body bytes, keyed with a key derived from the app secret.
//! The secret itself never leaves the client.

use crate::types::Method;

/// Key-derivation context; changing it invalidates every signature.
const SIGNING_CONTEXT: &str = "wordgate 2024-06-01 request signing v1";

/// Header carrying the application code.
pub const HEADER_APP_CODE: &str = "X-App-Code";
/// Header carrying the unix timestamp the signature was computed for.
pub const HEADER_TIMESTAMP: &str = "X-Timestamp";
/// Header carrying the hex signature.
pub const HEADER_SIGNATURE: &str = "X-Signature";

/// Canonical string that gets signed.
#[must_use]
pub fn canonical_request(method: Method, path: &str, timestamp: i64, body: &str) -> String {
    format!("{method}\n{path}\n{timestamp}\n{body}")
}

/// Compute the lowercase hex signature for a request.
///
/// # Example
///
/// ```
/// use gatekit::{Method, signature::sign};
///
/// let a = sign("secret", Method::Get, "/app/products", 1_700_000_000, "");
/// let b = sign("secret", Method::Get, "/app/products", 1_700_000_000, "");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
#[must_use]
pub fn sign(secret: &str, method: Method, path: &str, timestamp: i64, body: &str) -> String {
    let key = blake3::derive_key(SIGNING_CONTEXT, secret.as_bytes());
    let canonical = canonical_request(method, path, timestamp, body);
    blake3::keyed_hash(&key, canonical.as_bytes())
        .to_hex()
        .to_string()
}
