//! `reqcat imports` – list import jobs.

use anyhow::Result;
use reqcat_core::catalog::SqliteCatalog;

use super::truncate;

pub async fn run_imports(db: &SqliteCatalog) -> Result<()> {
    let jobs = db.list_import_jobs().await?;
    if jobs.is_empty() {
        println!("No imports in catalogue.");
        return Ok(());
    }
    println!("{:<6} {:<10} {:<12} {}", "ID", "REQUESTS", "CREATED", "TITLE");
    for j in jobs {
        println!(
            "{:<6} {:<10} {:<12} {}",
            j.id,
            j.request_count,
            j.created_at,
            truncate(&j.title, 60)
        );
    }
    Ok(())
}
