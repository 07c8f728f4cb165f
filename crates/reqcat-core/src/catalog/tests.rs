//! Tests for the SQLite catalogue (in-memory DB helper from db).

use std::collections::BTreeSet;

use super::db::open_memory;
use super::*;
use crate::endpoint::{EndpointKey, EndpointResolver, EndpointType};
use crate::query_spec::{build_spec, RawOrderParam};

fn new_endpoint(method: &str, uri: &str) -> NewEndpoint {
    NewEndpoint {
        key: EndpointKey::new(method, "api.example.com", uri),
        endpoint_type: EndpointType::Static,
    }
}

fn record(endpoint_id: EndpointId, sequence: i64, method: &str, url: &str) -> RequestRecord {
    RequestRecord {
        endpoint_id,
        sequence,
        url: url.to_string(),
        method: method.to_string(),
        domain: "api.example.com".to_string(),
        request_headers_json: r#"[{"name":"Accept","value":"*/*"}]"#.to_string(),
        request_body: String::new(),
        response_status: 200 + sequence,
        response_headers_json: "[]".to_string(),
        response_body: "ok".to_string(),
        response_size: 10 * sequence,
        latency_ms: 100 - sequence,
        captured_at: "2024-05-01T10:00:00.000Z".to_string(),
        raw_request_hash: "a".repeat(64),
        filtered_request_hash: "b".repeat(64),
        filtered_response_hash: "c".repeat(64),
        response_body_hash: "d".repeat(64),
    }
}

fn job(title: &str) -> NewImportJob {
    NewImportJob {
        title: title.to_string(),
        ignored_headers: vec!["Authorization".to_string()],
    }
}

#[tokio::test]
async fn endpoint_unique_tuple_conflicts() {
    let db = open_memory().await.unwrap();
    let created = db
        .create_endpoint(&new_endpoint("GET", "/v1/users"))
        .await
        .unwrap();
    let err = db
        .create_endpoint(&new_endpoint("GET", "/v1/users"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Conflict(_)), "got {err:?}");

    let found = db
        .find_endpoint(&EndpointKey::new("GET", "api.example.com", "/v1/users"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, created);
    assert_eq!(db.get_endpoint(created.id).await.unwrap(), Some(created));

    // Different method is a different identity.
    db.create_endpoint(&new_endpoint("POST", "/v1/users"))
        .await
        .unwrap();
    assert_eq!(db.list_endpoints().await.unwrap().len(), 2);
}

#[tokio::test]
async fn endpoint_notes_and_missing_endpoint() {
    let db = open_memory().await.unwrap();
    let e = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    db.set_endpoint_notes(e.id, "login flow").await.unwrap();
    assert_eq!(db.get_endpoint(e.id).await.unwrap().unwrap().notes, "login flow");
    assert!(matches!(
        db.set_endpoint_notes(999, "x").await,
        Err(StoreError::NotFound(_))
    ));
    assert!(db.get_endpoint(999).await.unwrap().is_none());
}

#[tokio::test]
async fn create_import_persists_job_and_requests() {
    let db = open_memory().await.unwrap().with_insert_batch_size(2);
    let e = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    let records: Vec<RequestRecord> = (1..=5)
        .map(|i| record(e.id, i, "GET", "https://api.example.com/a"))
        .collect();
    let job_id = db.create_import(&job("first"), &records).await.unwrap();

    let stored_job = db.get_import_job(job_id).await.unwrap().unwrap();
    assert_eq!(stored_job.title, "first");
    assert_eq!(stored_job.ignored_headers, vec!["Authorization"]);

    let listed = db
        .list_requests(RequestScope::ImportJob(job_id), &FilterSpec::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 5);
    assert_eq!(
        listed.iter().map(|r| r.record.sequence).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert_eq!(listed[0].record, records[0]);
    assert_eq!(listed[0].import_job_id, job_id);
    assert_eq!(listed[0].request_headers().unwrap().get("accept"), Some("*/*"));

    let one = db.get_request(listed[2].id).await.unwrap().unwrap();
    assert_eq!(one, listed[2]);

    let jobs = db.list_import_jobs().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].request_count, 5);
}

#[tokio::test]
async fn failed_import_leaves_nothing_behind() {
    let db = open_memory().await.unwrap().with_insert_batch_size(1);
    let e = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    let mut records = vec![
        record(e.id, 1, "GET", "https://api.example.com/a"),
        record(e.id, 2, "GET", "https://api.example.com/a"),
    ];
    // Dangling endpoint id: the foreign key rejects the second batch.
    records[1].endpoint_id = 4242;

    assert!(db.create_import(&job("broken"), &records).await.is_err());
    assert!(db.list_import_jobs().await.unwrap().is_empty());
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn list_requests_orders_by_spec() {
    let db = open_memory().await.unwrap();
    let get = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    let post = db.create_endpoint(&new_endpoint("POST", "/b")).await.unwrap();
    let records = vec![
        record(get.id, 1, "GET", "https://api.example.com/a"),
        record(post.id, 2, "POST", "https://api.example.com/b"),
        record(get.id, 3, "GET", "https://api.example.com/a?page=2"),
    ];
    let job_id = db.create_import(&job("orders"), &records).await.unwrap();
    let scope = RequestScope::ImportJob(job_id);

    let filter = build_spec(&[RawOrderParam::new("sequence_number", "desc")], "");
    let seqs: Vec<i64> = db
        .list_requests(scope, &filter)
        .await
        .unwrap()
        .iter()
        .map(|r| r.record.sequence)
        .collect();
    assert_eq!(seqs, vec![3, 2, 1]);

    // method ASC first, then latency ASC (latency = 100 - sequence).
    let filter = build_spec(
        &[
            RawOrderParam::new("method", "ASC"),
            RawOrderParam::new("latency", "ASC"),
        ],
        "",
    );
    let seqs: Vec<i64> = db
        .list_requests(scope, &filter)
        .await
        .unwrap()
        .iter()
        .map(|r| r.record.sequence)
        .collect();
    assert_eq!(seqs, vec![3, 1, 2]);

    let by_endpoint = db
        .list_requests(RequestScope::Endpoint(get.id), &FilterSpec::default())
        .await
        .unwrap();
    assert_eq!(by_endpoint.len(), 2);
}

#[tokio::test]
async fn list_requests_search_is_case_insensitive_substring() {
    let db = open_memory().await.unwrap();
    let e = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    let records = vec![
        record(e.id, 1, "GET", "https://api.example.com/Users/1"),
        record(e.id, 2, "POST", "https://api.example.com/orders"),
        record(e.id, 3, "GET", "https://api.example.com/50%_off"),
    ];
    let job_id = db.create_import(&job("search"), &records).await.unwrap();
    let scope = RequestScope::ImportJob(job_id);

    let hits = db.list_requests(scope, &build_spec(&[], "users")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.sequence, 1);

    let hits = db.list_requests(scope, &build_spec(&[], "post")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.method, "POST");

    // Matches domain on every row.
    let hits = db.list_requests(scope, &build_spec(&[], "EXAMPLE.COM")).await.unwrap();
    assert_eq!(hits.len(), 3);

    // Wildcards are literal.
    let hits = db.list_requests(scope, &build_spec(&[], "%_")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.sequence, 3);
}

#[tokio::test]
async fn endpoint_stats_aggregate_requests() {
    let db = open_memory().await.unwrap();
    let e = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    let empty = db.endpoint_stats(e.id).await.unwrap();
    assert_eq!(empty.total_requests, 0);
    assert_eq!(empty.avg_latency_ms, 0.0);
    assert!(empty.status_counts.is_empty());

    let mut records = vec![
        record(e.id, 1, "GET", "https://api.example.com/a"),
        record(e.id, 2, "GET", "https://api.example.com/a"),
        record(e.id, 3, "GET", "https://api.example.com/a"),
    ];
    records[2].response_status = 201;
    db.create_import(&job("stats"), &records).await.unwrap();

    let stats = db.endpoint_stats(e.id).await.unwrap();
    assert_eq!(stats.total_requests, 3);
    assert!((stats.avg_latency_ms - 98.0).abs() < 1e-9);
    assert_eq!(stats.status_counts, vec![(201, 2), (202, 1)]);
}

#[tokio::test]
async fn remove_import_cascades_to_requests_only() {
    let db = open_memory().await.unwrap();
    let e = db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    let records = vec![record(e.id, 1, "GET", "https://api.example.com/a")];
    let keep = db.create_import(&job("keep"), &records).await.unwrap();
    let gone = db.create_import(&job("drop"), &records).await.unwrap();

    assert_eq!(db.remove_import(gone).await.unwrap(), 1);
    assert!(db.get_import_job(gone).await.unwrap().is_none());
    assert!(db.get_import_job(keep).await.unwrap().is_some());
    assert!(db.get_endpoint(e.id).await.unwrap().is_some());
    assert_eq!(
        db.list_requests(RequestScope::Endpoint(e.id), &FilterSpec::default())
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(matches!(
        db.remove_import(gone).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn open_at_creates_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested dir").join("catalog.db");
    let db = SqliteCatalog::open_at(&path).await.unwrap();
    db.create_endpoint(&new_endpoint("GET", "/a")).await.unwrap();
    db.close().await;

    let reopened = SqliteCatalog::open_at(&path).await.unwrap();
    assert_eq!(reopened.list_endpoints().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resolves_create_one_endpoint_row() {
    let dir = tempfile::tempdir().unwrap();
    let db = SqliteCatalog::open_at(dir.path().join("catalog.db"))
        .await
        .unwrap();
    let key = EndpointKey::new("POST", "api.example.com", "/v1/users");

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let db = db.clone();
            let key = key.clone();
            tokio::spawn(async move { EndpointResolver::new(&db).resolve_key(key).await })
        })
        .collect();

    let mut ids = BTreeSet::new();
    for h in handles {
        let endpoint = h.await.unwrap().expect("resolve under contention");
        ids.insert(endpoint.id);
    }
    assert_eq!(ids.len(), 1, "ids: {ids:?}");

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM endpoints")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
    db.close().await;
}
