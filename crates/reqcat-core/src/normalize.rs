//! Turn decoded HAR entries into normalized, fingerprinted request records.
//!
//! Single sequential pass in document order; the sequence numbers assigned by
//! the decoder are carried through unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::fingerprint::{ExchangeParts, Fingerprints};
use crate::har::Entry;
use crate::headers::HeaderSet;

/// How response bodies are treated before hashing and storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Decode `encoding = "base64"` bodies when they decode to UTF-8 text.
    /// Off by default: bodies are hashed and stored exactly as captured.
    pub decode_base64_bodies: bool,
}

/// One captured request, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub sequence: u32,
    pub url: String,
    pub method: String,
    pub domain: String,
    pub request_headers: HeaderSet,
    pub request_body: String,
    pub response_status: u16,
    pub response_headers: HeaderSet,
    pub response_body: String,
    /// Byte length of `response_body`.
    pub response_size: usize,
    pub latency_ms: i64,
    /// `startedDateTime` from the capture.
    pub captured_at: String,
    pub fingerprints: Fingerprints,
}

/// Normalize and fingerprint every entry, preserving order.
pub fn normalize_entries<S: AsRef<str>>(
    entries: Vec<Entry>,
    ignored_headers: &[S],
    opts: NormalizeOptions,
) -> Vec<NormalizedRequest> {
    entries
        .into_iter()
        .map(|e| normalize_entry(e, ignored_headers, opts))
        .collect()
}

pub fn normalize_entry<S: AsRef<str>>(
    entry: Entry,
    ignored_headers: &[S],
    opts: NormalizeOptions,
) -> NormalizedRequest {
    let response_body = response_body_text(&entry, opts);
    let response_size = response_body.len();

    let fingerprints = Fingerprints::compute(
        &ExchangeParts {
            method: &entry.request.method,
            url: &entry.request.url,
            request_headers: &entry.request.headers,
            request_body: &entry.request.body,
            status: entry.response.status,
            response_size,
            response_headers: &entry.response.headers,
            response_body: &response_body,
        },
        ignored_headers,
    );

    NormalizedRequest {
        sequence: entry.sequence,
        url: entry.request.url,
        method: entry.request.method,
        domain: entry.domain,
        request_headers: entry.request.headers,
        request_body: entry.request.body,
        response_status: entry.response.status,
        response_headers: entry.response.headers,
        response_body,
        response_size,
        // HAR time is fractional milliseconds; truncate toward zero.
        latency_ms: entry.elapsed_ms as i64,
        captured_at: entry.started_at,
        fingerprints,
    }
}

fn response_body_text(entry: &Entry, opts: NormalizeOptions) -> String {
    let body = &entry.response.body;
    let is_base64 = entry
        .response
        .encoding
        .as_deref()
        .is_some_and(|enc| enc.eq_ignore_ascii_case("base64"));
    if !opts.decode_base64_bodies || !is_base64 {
        return body.clone();
    }

    match STANDARD.decode(body.trim()) {
        Ok(bytes) => match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!(
                    sequence = entry.sequence,
                    "base64 body is binary; keeping encoded text"
                );
                body.clone()
            }
        },
        Err(e) => {
            tracing::warn!(
                sequence = entry.sequence,
                "response body marked base64 does not decode: {}",
                e
            );
            body.clone()
        }
    }
}
