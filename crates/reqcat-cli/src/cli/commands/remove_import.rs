//! `reqcat remove-import <id>` – delete an import job and its requests.

use anyhow::Result;
use reqcat_core::catalog::SqliteCatalog;

pub async fn run_remove_import(db: &SqliteCatalog, id: i64) -> Result<()> {
    let removed = db.remove_import(id).await?;
    println!("Removed import {id} ({removed} requests)");
    Ok(())
}
