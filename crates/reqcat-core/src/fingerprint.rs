//! Content-addressable request/response fingerprints.
//!
//! All four hashes are lowercase hex SHA-256 (64 chars) over plain text
//! signatures. Pure functions: same inputs, same hashes, on any machine.

use sha2::{Digest, Sha256};

use crate::headers::HeaderSet;

/// Length of every fingerprint string (hex-encoded SHA-256).
pub const FINGERPRINT_LEN: usize = 64;

/// SHA-256 of a string as lowercase hex.
pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// The parts of a captured exchange that feed the fingerprints.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeParts<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub request_headers: &'a HeaderSet,
    pub request_body: &'a str,
    pub status: u16,
    pub response_size: usize,
    pub response_headers: &'a HeaderSet,
    pub response_body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprints {
    /// Method, URL, body and every request header. Exact-replay detection.
    pub raw_request: String,
    /// URL, method, body and request headers minus the ignored ones.
    pub filtered_request: String,
    /// Status, size, body and response headers minus the ignored ones.
    pub filtered_response: String,
    /// Response body alone.
    pub response_body: String,
}

impl Fingerprints {
    pub fn compute<S: AsRef<str>>(parts: &ExchangeParts<'_>, ignored_headers: &[S]) -> Self {
        Self {
            raw_request: sha256_hex(&raw_request_text(parts)),
            filtered_request: sha256_hex(&filtered_request_text(parts, ignored_headers)),
            filtered_response: sha256_hex(&filtered_response_text(parts, ignored_headers)),
            response_body: sha256_hex(parts.response_body),
        }
    }
}

fn raw_request_text(p: &ExchangeParts<'_>) -> String {
    format!(
        "{} {} {} {}",
        p.method,
        p.url,
        p.request_body,
        p.request_headers.project_all()
    )
}

// Field order differs from the raw signature (url first); stored hashes depend on it.
fn filtered_request_text<S: AsRef<str>>(p: &ExchangeParts<'_>, ignored: &[S]) -> String {
    format!(
        "{} {} {} {}",
        p.url,
        p.method,
        p.request_body,
        p.request_headers.project_excluding(ignored)
    )
}

fn filtered_response_text<S: AsRef<str>>(p: &ExchangeParts<'_>, ignored: &[S]) -> String {
    format!(
        "{} {} {} {}",
        p.status,
        p.response_size,
        p.response_body,
        p.response_headers.project_excluding(ignored)
    )
}
