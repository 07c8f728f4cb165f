//! HAR (HTTP Archive) decoder: raw capture bytes to an ordered list of entries.
//!
//! Entries keep document order and get 1-based sequence numbers. Missing
//! optional fields (post data, content text, encoding) decode as empty/absent.
//! An unparsable request URL only costs that entry its domain.

mod parse;

use std::path::Path;

use thiserror::Error;
use url::{Host, Url};

use crate::headers::{Header, HeaderSet};

use parse::{HarHeader, HarLog};

/// The capture is not JSON, or not shaped like `log.entries[].request/response`.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid HAR document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("read HAR file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// One decoded request/response exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// 1-based position in the source document.
    pub sequence: u32,
    /// `startedDateTime` as captured.
    pub started_at: String,
    pub elapsed_ms: f64,
    /// Host of the request URL; empty when the URL does not parse.
    pub domain: String,
    pub request: EntryRequest,
    pub response: EntryResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryRequest {
    pub method: String,
    pub url: String,
    pub headers: HeaderSet,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryResponse {
    pub status: u16,
    pub headers: HeaderSet,
    pub body: String,
    /// `content.encoding`, e.g. `base64`. Not applied here.
    pub encoding: Option<String>,
}

/// Decode raw capture bytes into entries, in document order.
pub fn decode(bytes: &[u8]) -> Result<Vec<Entry>, DecodeError> {
    let har: HarLog = serde_json::from_slice(bytes)?;

    let entries = har
        .log
        .entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            let domain = url_host(&e.request.url);
            Entry {
                sequence: (i + 1) as u32,
                started_at: e.started_date_time,
                elapsed_ms: e.time,
                domain,
                request: EntryRequest {
                    method: e.request.method,
                    url: e.request.url,
                    headers: to_header_set(e.request.headers),
                    body: e.request.post_data.and_then(|p| p.text).unwrap_or_default(),
                },
                response: {
                    let (body, encoding) = e
                        .response
                        .content
                        .map(|c| (c.text.unwrap_or_default(), c.encoding))
                        .unwrap_or_default();
                    EntryResponse {
                        status: e.response.status,
                        headers: to_header_set(e.response.headers),
                        body,
                        encoding: encoding.filter(|s| !s.is_empty()),
                    }
                },
            }
        })
        .collect();

    Ok(entries)
}

/// Read and decode a HAR file from disk.
pub fn decode_file(path: &Path) -> Result<Vec<Entry>, DecodeError> {
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    decode(&bytes)
}

fn to_header_set(headers: Vec<HarHeader>) -> HeaderSet {
    headers
        .into_iter()
        .map(|h| Header::new(h.name, h.value))
        .collect()
}

/// Host part of `url`, or empty string when it does not parse or has no host.
/// IPv6 literals come back without brackets.
pub fn url_host(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host() {
            Some(Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => String::new(),
        },
        Err(e) => {
            tracing::warn!("unparsable request URL {:?}: {}", url, e);
            String::new()
        }
    }
}
