//! `reqcat note <id> <text>` – replace endpoint notes.

use anyhow::Result;
use reqcat_core::catalog::SqliteCatalog;

pub async fn run_note(db: &SqliteCatalog, id: i64, text: &str) -> Result<()> {
    db.set_endpoint_notes(id, text).await?;
    println!("Updated notes for endpoint {id}");
    Ok(())
}
