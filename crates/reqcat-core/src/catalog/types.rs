//! Record types stored in the catalogue database.

use crate::endpoint::{EndpointKey, EndpointType};
use crate::headers::HeaderSet;
use crate::normalize::NormalizedRequest;

pub type ImportJobId = i64;
pub type EndpointId = i64;
pub type RequestId = i64;

/// One import operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    pub id: ImportJobId,
    pub title: String,
    /// Header names excluded from filtered fingerprints for this import.
    pub ignored_headers: Vec<String>,
    pub created_at: i64,
}

/// Import job as listed, with its request count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJobSummary {
    pub id: ImportJobId,
    pub title: String,
    pub request_count: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewImportJob {
    pub title: String,
    pub ignored_headers: Vec<String>,
}

/// Deduplicated `(method, domain, uri)` identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub id: EndpointId,
    pub key: EndpointKey,
    pub endpoint_type: EndpointType,
    pub notes: String,
    pub created_at: i64,
}

#[derive(Debug, Clone)]
pub struct NewEndpoint {
    pub key: EndpointKey,
    pub endpoint_type: EndpointType,
}

/// Aggregates over the requests of one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointStats {
    pub total_requests: i64,
    pub avg_latency_ms: f64,
    /// `(status, count)` ordered by status.
    pub status_counts: Vec<(u16, i64)>,
}

/// Which requests a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestScope {
    ImportJob(ImportJobId),
    Endpoint(EndpointId),
}

/// Persisted shape of a normalized request, minus the owning import job id.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestRecord {
    pub endpoint_id: EndpointId,
    pub sequence: i64,
    pub url: String,
    pub method: String,
    pub domain: String,
    pub request_headers_json: String,
    pub request_body: String,
    pub response_status: i64,
    pub response_headers_json: String,
    pub response_body: String,
    pub response_size: i64,
    pub latency_ms: i64,
    pub captured_at: String,
    pub raw_request_hash: String,
    pub filtered_request_hash: String,
    pub filtered_response_hash: String,
    pub response_body_hash: String,
}

impl RequestRecord {
    /// Fails only if a header set cannot be encoded as JSON.
    pub fn from_normalized(
        req: &NormalizedRequest,
        endpoint_id: EndpointId,
    ) -> serde_json::Result<Self> {
        Ok(Self {
            endpoint_id,
            sequence: i64::from(req.sequence),
            url: req.url.clone(),
            method: req.method.clone(),
            domain: req.domain.clone(),
            request_headers_json: req.request_headers.to_json()?,
            request_body: req.request_body.clone(),
            response_status: i64::from(req.response_status),
            response_headers_json: req.response_headers.to_json()?,
            response_body: req.response_body.clone(),
            response_size: req.response_size as i64,
            latency_ms: req.latency_ms,
            captured_at: req.captured_at.clone(),
            raw_request_hash: req.fingerprints.raw_request.clone(),
            filtered_request_hash: req.fingerprints.filtered_request.clone(),
            filtered_response_hash: req.fingerprints.filtered_response.clone(),
            response_body_hash: req.fingerprints.response_body.clone(),
        })
    }
}

/// A request row as read back from the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRequest {
    pub id: RequestId,
    pub import_job_id: ImportJobId,
    pub record: RequestRecord,
    pub created_at: i64,
}

impl StoredRequest {
    pub fn request_headers(&self) -> serde_json::Result<HeaderSet> {
        HeaderSet::from_json(&self.record.request_headers_json)
    }

    pub fn response_headers(&self) -> serde_json::Result<HeaderSet> {
        HeaderSet::from_json(&self.record.response_headers_json)
    }
}
