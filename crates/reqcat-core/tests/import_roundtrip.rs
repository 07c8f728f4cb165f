//! Integration test: import a capture into a file-backed catalogue, list and
//! re-import it, then remove one import.

mod common;

use common::har_fixture::{har_bytes, FixtureEntry};
use reqcat_core::catalog::{RequestScope, SqliteCatalog};
use reqcat_core::config::ReqcatConfig;
use reqcat_core::endpoint::EndpointType;
use reqcat_core::import::{ImportOptions, ImportRequest, Importer};
use reqcat_core::query_spec::{build_spec, RawOrderParam};
use tempfile::tempdir;

fn capture(token: &str) -> Vec<u8> {
    let rows = [
        FixtureEntry::new("GET", "https://api.example.com/v1/users?page=1", 200),
        FixtureEntry::new("GET", "https://api.example.com/v1/users/42", 200),
        FixtureEntry::new("POST", "https://api.example.com/v1/users", 201),
        FixtureEntry::new("GET", "https://cdn.example.com/app.js", 304),
        FixtureEntry::new("GET", "https://api.example.com/v1/users?page=2", 500),
    ];
    let rows: Vec<FixtureEntry> = rows
        .into_iter()
        .map(|mut e| {
            e.authorization = token;
            e
        })
        .collect();
    har_bytes(&rows)
}

#[tokio::test]
async fn import_list_reimport_and_remove() {
    let state_dir = tempdir().unwrap();
    let db_path = state_dir.path().join("catalog.db");
    let cfg = ReqcatConfig {
        database_path: Some(db_path.clone()),
        ..ReqcatConfig::default()
    };
    let db = SqliteCatalog::open_with_config(&cfg).await.unwrap();
    let importer = Importer::new(&db, ImportOptions::from_config(&cfg));

    let first = importer
        .import(ImportRequest::from_upload(
            "Session A",
            "Authorization",
            "session-a.har",
            capture("Bearer aaa"),
        ))
        .await
        .expect("first import");
    assert_eq!(first.summary.request_count, 5);
    assert_eq!(first.summary.unique_domains, 2);
    // /v1/users GET, /v1/users/42 GET, /v1/users POST, /app.js GET
    assert_eq!(first.summary.unique_endpoints, 4);

    let endpoints = db.list_endpoints().await.unwrap();
    assert_eq!(endpoints.len(), 4);
    let kind = |uri: &str| {
        endpoints
            .iter()
            .find(|e| e.key.uri == uri)
            .map(|e| e.endpoint_type)
    };
    assert_eq!(kind("/v1/users/42"), Some(EndpointType::Parameterized));
    assert_eq!(kind("/app.js"), Some(EndpointType::Asset));

    // Status DESC puts the 500 first; search narrows to the api host.
    let filter = build_spec(&[RawOrderParam::new("status", "DESC")], "API.example");
    let listed = db
        .list_requests(RequestScope::ImportJob(first.import_job_id), &filter)
        .await
        .unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0].record.response_status, 500);

    let second = importer
        .import(ImportRequest::from_upload(
            "Session B",
            "Authorization",
            "session-b.har",
            capture("Bearer bbb"),
        ))
        .await
        .expect("second import");
    assert_eq!(db.list_endpoints().await.unwrap().len(), 4);

    let scope_a = RequestScope::ImportJob(first.import_job_id);
    let scope_b = RequestScope::ImportJob(second.import_job_id);
    let a = db.list_requests(scope_a, &Default::default()).await.unwrap();
    let b = db.list_requests(scope_b, &Default::default()).await.unwrap();
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.record.filtered_request_hash, y.record.filtered_request_hash);
        assert_eq!(x.record.filtered_response_hash, y.record.filtered_response_hash);
        assert_ne!(x.record.raw_request_hash, y.record.raw_request_hash);
        assert_eq!(x.record.endpoint_id, y.record.endpoint_id);
    }

    let jobs = db.list_import_jobs().await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].title, "Session B");

    assert_eq!(db.remove_import(first.import_job_id).await.unwrap(), 5);
    let jobs = db.list_import_jobs().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, second.import_job_id);
    db.close().await;

    // Data survives reopen.
    let reopened = SqliteCatalog::open_at(&db_path).await.unwrap();
    assert_eq!(reopened.list_import_jobs().await.unwrap()[0].request_count, 5);
}
