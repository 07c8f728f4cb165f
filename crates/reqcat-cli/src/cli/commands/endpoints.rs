//! `reqcat endpoints` – list deduplicated endpoints.

use anyhow::Result;
use reqcat_core::catalog::SqliteCatalog;

use super::truncate;

pub async fn run_endpoints(db: &SqliteCatalog) -> Result<()> {
    let endpoints = db.list_endpoints().await?;
    if endpoints.is_empty() {
        println!("No endpoints in catalogue.");
        return Ok(());
    }
    println!("{:<6} {:<7} {:<14} {:<30} {}", "ID", "METHOD", "TYPE", "DOMAIN", "URI");
    for e in endpoints {
        println!(
            "{:<6} {:<7} {:<14} {:<30} {}",
            e.id,
            e.key.method,
            e.endpoint_type.as_str(),
            truncate(&e.key.domain, 30),
            e.key.uri
        );
    }
    Ok(())
}
