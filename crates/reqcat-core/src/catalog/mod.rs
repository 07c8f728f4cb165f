//! Persistent request catalogue (SQLite via sqlx).
//!
//! Stores import jobs, deduplicated endpoints and the normalized requests of
//! each import. Header sets are stored as JSON text; fingerprints as 64-char
//! hex columns, each indexed.

mod db;
mod endpoints;
mod imports;
mod requests;
mod store;
mod types;

pub use db::SqliteCatalog;
pub use store::{CatalogStore, StoreError};
pub use types::*;

#[cfg(test)]
pub(crate) use db::open_memory;

use crate::endpoint::EndpointKey;
use crate::query_spec::FilterSpec;

impl CatalogStore for SqliteCatalog {
    async fn find_endpoint(&self, key: &EndpointKey) -> Result<Option<Endpoint>, StoreError> {
        SqliteCatalog::find_endpoint(self, key).await
    }

    async fn create_endpoint(&self, endpoint: &NewEndpoint) -> Result<Endpoint, StoreError> {
        SqliteCatalog::create_endpoint(self, endpoint).await
    }

    async fn get_endpoint(&self, id: EndpointId) -> Result<Option<Endpoint>, StoreError> {
        SqliteCatalog::get_endpoint(self, id).await
    }

    async fn create_import(
        &self,
        job: &NewImportJob,
        requests: &[RequestRecord],
    ) -> Result<ImportJobId, StoreError> {
        SqliteCatalog::create_import(self, job, requests).await
    }

    async fn get_import_job(&self, id: ImportJobId) -> Result<Option<ImportJob>, StoreError> {
        SqliteCatalog::get_import_job(self, id).await
    }

    async fn get_request(&self, id: RequestId) -> Result<Option<StoredRequest>, StoreError> {
        SqliteCatalog::get_request(self, id).await
    }

    async fn list_requests(
        &self,
        scope: RequestScope,
        filter: &FilterSpec,
    ) -> Result<Vec<StoredRequest>, StoreError> {
        SqliteCatalog::list_requests(self, scope, filter).await
    }
}

#[cfg(test)]
mod tests;
