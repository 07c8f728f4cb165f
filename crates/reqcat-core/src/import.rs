//! HAR import pipeline: validate, decode, fingerprint, resolve endpoints, persist.
//!
//! One import is a single sequential pass over the capture. Endpoints are
//! resolved (and created on first sighting) before the write; the import job
//! and its requests are then written in one transaction, so a failure at any
//! step leaves no import job and no requests behind. Endpoints created along
//! the way are shared identities and are kept.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write as _;

use crate::catalog::{CatalogStore, EndpointId, ImportJobId, NewImportJob, RequestRecord};
use crate::config::ReqcatConfig;
use crate::endpoint::{EndpointClassifier, EndpointKey, EndpointResolver, ShapeClassifier};
use crate::error::{ImportError, Result};
use crate::har;
use crate::headers::parse_header_names;
use crate::normalize::{normalize_entries, NormalizeOptions, NormalizedRequest};

/// What the transport layer hands over for one import.
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub title: String,
    /// Header names excluded from the filtered fingerprints.
    pub ignored_headers: Vec<String>,
    pub file_name: String,
    pub content: Vec<u8>,
}

impl ImportRequest {
    /// Build from raw upload fields; `ignored_text` is a newline/whitespace separated list.
    pub fn from_upload(
        title: impl Into<String>,
        ignored_text: &str,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            title: title.into(),
            ignored_headers: parse_header_names(ignored_text),
            file_name: file_name.into(),
            content,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub normalize: NormalizeOptions,
    pub require_har_extension: bool,
    /// Ignored on every import, before the per-import names.
    pub default_ignored_headers: Vec<String>,
}

impl ImportOptions {
    pub fn from_config(cfg: &ReqcatConfig) -> Self {
        Self {
            normalize: NormalizeOptions {
                decode_base64_bodies: cfg.decode_base64_bodies,
            },
            require_har_extension: cfg.require_har_extension,
            default_ignored_headers: cfg.default_ignored_headers.clone(),
        }
    }
}

/// Counts over one import, with sorted breakdowns for stable output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub title: String,
    pub request_count: usize,
    pub unique_domains: usize,
    pub unique_endpoints: usize,
    pub methods: BTreeMap<String, usize>,
    pub statuses: BTreeMap<u16, usize>,
    pub domains: BTreeMap<String, usize>,
}

impl ImportSummary {
    pub fn from_requests(
        title: &str,
        requests: &[NormalizedRequest],
        endpoint_ids: &[EndpointId],
    ) -> Self {
        let mut methods = BTreeMap::new();
        let mut statuses = BTreeMap::new();
        let mut domains = BTreeMap::new();
        for r in requests {
            *methods.entry(r.method.clone()).or_insert(0) += 1;
            *statuses.entry(r.response_status).or_insert(0) += 1;
            *domains.entry(r.domain.clone()).or_insert(0) += 1;
        }
        let unique_endpoints = endpoint_ids.iter().collect::<BTreeSet<_>>().len();
        Self {
            title: title.to_string(),
            request_count: requests.len(),
            unique_domains: domains.len(),
            unique_endpoints,
            methods,
            statuses,
            domains,
        }
    }

    /// Human-readable multi-line report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "HAR Import Summary for: {}", self.title);
        let _ = writeln!(out, "Total Requests: {}", self.request_count);
        let _ = writeln!(out, "Unique Domains: {}", self.unique_domains);
        let _ = writeln!(out, "Unique Endpoints: {}", self.unique_endpoints);
        let _ = writeln!(out, "\nDomain Breakdown:");
        for (domain, n) in &self.domains {
            let shown = if domain.is_empty() { "(none)" } else { domain };
            let _ = writeln!(out, "  {shown}: {n} requests");
        }
        let _ = writeln!(out, "\nMethod Breakdown:");
        for (method, n) in &self.methods {
            let _ = writeln!(out, "  {method}: {n} requests");
        }
        let _ = writeln!(out, "\nStatus Code Breakdown:");
        for (status, n) in &self.statuses {
            let _ = writeln!(out, "  {status}: {n} responses");
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ImportResult {
    pub import_job_id: ImportJobId,
    pub summary: ImportSummary,
}

/// Runs imports against a catalogue store.
pub struct Importer<'a, S, C = ShapeClassifier> {
    store: &'a S,
    resolver: EndpointResolver<'a, S, C>,
    opts: ImportOptions,
}

impl<'a, S: CatalogStore> Importer<'a, S, ShapeClassifier> {
    pub fn new(store: &'a S, opts: ImportOptions) -> Self {
        Self::with_classifier(store, ShapeClassifier, opts)
    }
}

impl<'a, S: CatalogStore, C: EndpointClassifier> Importer<'a, S, C> {
    pub fn with_classifier(store: &'a S, classifier: C, opts: ImportOptions) -> Self {
        Self {
            store,
            resolver: EndpointResolver::with_classifier(store, classifier),
            opts,
        }
    }

    pub async fn import(&self, req: ImportRequest) -> Result<ImportResult> {
        self.validate(&req)?;
        let ignored = self.effective_ignored_headers(&req.ignored_headers);

        let entries = har::decode(&req.content)?;
        tracing::info!(
            "importing {:?} from {}: {} entries",
            req.title,
            req.file_name,
            entries.len()
        );
        let requests = normalize_entries(entries, &ignored, self.opts.normalize);

        let endpoint_ids = self.resolve_endpoints(&requests).await?;

        let records = requests
            .iter()
            .zip(&endpoint_ids)
            .map(|(r, &endpoint_id)| {
                RequestRecord::from_normalized(r, endpoint_id).map_err(|source| {
                    ImportError::Fingerprint {
                        sequence: r.sequence,
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let job = NewImportJob {
            title: req.title.trim().to_string(),
            ignored_headers: ignored,
        };
        let import_job_id = self
            .store
            .create_import(&job, &records)
            .await
            .map_err(ImportError::Persistence)?;

        let summary = ImportSummary::from_requests(&job.title, &requests, &endpoint_ids);
        tracing::info!(
            import_job_id,
            requests = summary.request_count,
            endpoints = summary.unique_endpoints,
            "import complete"
        );
        Ok(ImportResult {
            import_job_id,
            summary,
        })
    }

    fn validate(&self, req: &ImportRequest) -> Result<()> {
        if req.title.trim().is_empty() {
            return Err(ImportError::invalid_upload("title is required"));
        }
        if self.opts.require_har_extension && !req.file_name.to_lowercase().ends_with(".har") {
            return Err(ImportError::invalid_upload(format!(
                "file must be a .har file: {}",
                req.file_name
            )));
        }
        Ok(())
    }

    /// Config defaults then per-import names, first spelling wins, case-insensitive dedup.
    fn effective_ignored_headers(&self, per_import: &[String]) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.opts
            .default_ignored_headers
            .iter()
            .chain(per_import)
            .filter(|name| seen.insert(name.to_ascii_lowercase()))
            .cloned()
            .collect()
    }

    /// Endpoint id per request, in request order.
    async fn resolve_endpoints(&self, requests: &[NormalizedRequest]) -> Result<Vec<EndpointId>> {
        let mut cache: HashMap<EndpointKey, EndpointId> = HashMap::new();
        let mut ids = Vec::with_capacity(requests.len());
        for r in requests {
            let key = EndpointKey::from_request(&r.method, &r.domain, &r.url);
            if let Some(&id) = cache.get(&key) {
                ids.push(id);
                continue;
            }
            let endpoint = self
                .resolver
                .resolve_key(key.clone())
                .await
                .map_err(|source| ImportError::EndpointResolution {
                    endpoint: key.to_string(),
                    source,
                })?;
            cache.insert(key, endpoint.id);
            ids.push(endpoint.id);
        }
        Ok(ids)
    }
}
