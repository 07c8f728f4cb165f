//! `reqcat endpoint <id>` – one endpoint with stats.

use anyhow::{Context, Result};
use reqcat_core::catalog::SqliteCatalog;

pub async fn run_endpoint(db: &SqliteCatalog, id: i64) -> Result<()> {
    let e = db
        .get_endpoint(id)
        .await?
        .with_context(|| format!("endpoint {id} not found"))?;
    let stats = db.endpoint_stats(id).await?;

    println!("Endpoint {}: {}", e.id, e.key);
    println!("  type:     {}", e.endpoint_type.as_str());
    println!("  requests: {}", stats.total_requests);
    println!("  avg latency: {:.1} ms", stats.avg_latency_ms);
    if !stats.status_counts.is_empty() {
        println!("  status codes:");
        for (status, count) in &stats.status_counts {
            println!("    {status}: {count}");
        }
    }
    if !e.notes.is_empty() {
        println!("Notes:\n{}", e.notes);
    }
    Ok(())
}
