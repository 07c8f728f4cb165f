//! Storage seam used by the import pipeline and endpoint resolver.
//!
//! The core only talks to this trait; `SqliteCatalog` is the shipped implementation.

use std::future::Future;

use thiserror::Error;

use crate::endpoint::EndpointKey;
use crate::query_spec::FilterSpec;

use super::types::{
    Endpoint, EndpointId, ImportJob, ImportJobId, NewEndpoint, NewImportJob, RequestId,
    RequestRecord, RequestScope, StoredRequest,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. endpoint tuple already exists).
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
    #[error("stored JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.message().to_string())
            }
            _ => StoreError::Database(e),
        }
    }
}

/// Catalogue operations the core depends on.
pub trait CatalogStore: Send + Sync {
    /// Exact `(method, domain, uri)` lookup.
    fn find_endpoint(
        &self,
        key: &EndpointKey,
    ) -> impl Future<Output = Result<Option<Endpoint>, StoreError>> + Send;

    /// Insert a new endpoint. Returns `StoreError::Conflict` if the tuple exists.
    fn create_endpoint(
        &self,
        endpoint: &NewEndpoint,
    ) -> impl Future<Output = Result<Endpoint, StoreError>> + Send;

    fn get_endpoint(
        &self,
        id: EndpointId,
    ) -> impl Future<Output = Result<Option<Endpoint>, StoreError>> + Send;

    /// Write the import job and all of its requests as one unit: all or nothing.
    fn create_import(
        &self,
        job: &NewImportJob,
        requests: &[RequestRecord],
    ) -> impl Future<Output = Result<ImportJobId, StoreError>> + Send;

    fn get_import_job(
        &self,
        id: ImportJobId,
    ) -> impl Future<Output = Result<Option<ImportJob>, StoreError>> + Send;

    fn get_request(
        &self,
        id: RequestId,
    ) -> impl Future<Output = Result<Option<StoredRequest>, StoreError>> + Send;

    /// Requests in `scope`, ordered and filtered by `filter`.
    fn list_requests(
        &self,
        scope: RequestScope,
        filter: &FilterSpec,
    ) -> impl Future<Output = Result<Vec<StoredRequest>, StoreError>> + Send;
}
