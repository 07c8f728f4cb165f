//! `reqcat show <id>` – one request in full.

use anyhow::{Context, Result};
use reqcat_core::catalog::SqliteCatalog;
use reqcat_core::headers::HeaderSet;

fn print_headers(label: &str, headers: &HeaderSet) {
    println!("{label}:");
    if headers.is_empty() {
        println!("  (none)");
    }
    for h in headers.iter() {
        println!("  {}: {}", h.name, h.value);
    }
}

fn print_body(label: &str, body: &str) {
    if body.is_empty() {
        println!("{label}: (empty)");
    } else {
        println!("{label}:\n{body}");
    }
}

pub async fn run_show(db: &SqliteCatalog, id: i64) -> Result<()> {
    let r = db
        .get_request(id)
        .await?
        .with_context(|| format!("request {id} not found"))?;
    let rec = &r.record;

    println!("Request {} (import {}, endpoint {})", r.id, r.import_job_id, rec.endpoint_id);
    println!("  #{} {} {}", rec.sequence, rec.method, rec.url);
    println!("  domain:   {}", rec.domain);
    println!("  captured: {}", rec.captured_at);
    println!(
        "  status:   {}  size: {}  latency: {} ms",
        rec.response_status, rec.response_size, rec.latency_ms
    );
    println!("Fingerprints:");
    println!("  raw request:       {}", rec.raw_request_hash);
    println!("  filtered request:  {}", rec.filtered_request_hash);
    println!("  filtered response: {}", rec.filtered_response_hash);
    println!("  response body:     {}", rec.response_body_hash);

    print_headers("Request headers", &r.request_headers()?);
    print_body("Request body", &rec.request_body);
    print_headers("Response headers", &r.response_headers()?);
    print_body("Response body", &rec.response_body);
    Ok(())
}
