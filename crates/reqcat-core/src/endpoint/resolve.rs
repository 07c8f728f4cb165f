//! Find-or-create of endpoints with fetch-after-conflict.
//!
//! The store enforces uniqueness of `(method, domain, uri)`. When two imports
//! race to create the same tuple, the loser's insert fails with a conflict and
//! the resolver looks the tuple up once more, returning the winner's row.

use crate::catalog::{CatalogStore, Endpoint, NewEndpoint, StoreError};

use super::classify::{EndpointClassifier, ShapeClassifier};
use super::EndpointKey;

pub struct EndpointResolver<'a, S, C = ShapeClassifier> {
    store: &'a S,
    classifier: C,
}

impl<'a, S: CatalogStore> EndpointResolver<'a, S, ShapeClassifier> {
    pub fn new(store: &'a S) -> Self {
        Self::with_classifier(store, ShapeClassifier)
    }
}

impl<'a, S: CatalogStore, C: EndpointClassifier> EndpointResolver<'a, S, C> {
    pub fn with_classifier(store: &'a S, classifier: C) -> Self {
        Self { store, classifier }
    }

    /// Resolve the endpoint for a request, creating it on first sighting.
    pub async fn resolve(
        &self,
        method: &str,
        domain: &str,
        url: &str,
    ) -> Result<Endpoint, StoreError> {
        self.resolve_key(EndpointKey::from_request(method, domain, url))
            .await
    }

    pub async fn resolve_key(&self, key: EndpointKey) -> Result<Endpoint, StoreError> {
        if let Some(existing) = self.store.find_endpoint(&key).await? {
            return Ok(existing);
        }

        let endpoint_type = self.classifier.classify(&key.uri, &key.method);
        let new = NewEndpoint { key, endpoint_type };
        match self.store.create_endpoint(&new).await {
            Ok(created) => {
                tracing::debug!(
                    id = created.id,
                    classifier = self.classifier.name(),
                    "created endpoint {} ({})",
                    created.key,
                    created.endpoint_type.as_str()
                );
                Ok(created)
            }
            Err(create_err) => {
                // Another writer may have created the tuple between lookup and insert.
                match self.store.find_endpoint(&new.key).await {
                    Ok(Some(existing)) => {
                        tracing::debug!(
                            id = existing.id,
                            "endpoint {} created concurrently; using existing row",
                            existing.key
                        );
                        Ok(existing)
                    }
                    Ok(None) | Err(_) => Err(create_err),
                }
            }
        }
    }
}
