//! Endpoint identity: `(method, domain, path-only uri)`.
//!
//! Requests are grouped under endpoints. The URI drops scheme, host and query
//! string; classification is a pluggable strategy run once, when the endpoint
//! is first seen.

mod classify;
mod resolve;
mod uri;

pub use classify::{EndpointClassifier, EndpointType, ShapeClassifier};
pub use resolve::EndpointResolver;
pub use uri::path_only_uri;

/// Exact identity tuple of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointKey {
    pub method: String,
    pub domain: String,
    pub uri: String,
}

impl EndpointKey {
    pub fn new(method: impl Into<String>, domain: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            domain: domain.into(),
            uri: uri.into(),
        }
    }

    /// Key for a request URL: the URL is reduced to its path.
    pub fn from_request(method: &str, domain: &str, url: &str) -> Self {
        Self::new(method, domain, path_only_uri(url))
    }
}

impl std::fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.method, self.domain, self.uri)
    }
}
