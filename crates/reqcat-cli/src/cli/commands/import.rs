//! `reqcat import <path> --title <t>` – import a HAR capture.

use anyhow::{Context, Result};
use reqcat_core::catalog::SqliteCatalog;
use reqcat_core::config::ReqcatConfig;
use reqcat_core::headers::parse_header_names;
use reqcat_core::import::{ImportOptions, ImportRequest, Importer};
use std::path::PathBuf;

#[derive(Debug)]
pub struct ImportArgs {
    pub path: PathBuf,
    pub title: String,
    pub ignore: Vec<String>,
    pub ignore_file: Option<PathBuf>,
}

pub async fn run_import(db: &SqliteCatalog, cfg: &ReqcatConfig, args: ImportArgs) -> Result<()> {
    let content = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("read {}", args.path.display()))?;

    let mut ignored = args.ignore;
    if let Some(ref file) = args.ignore_file {
        let text = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("read {}", file.display()))?;
        ignored.extend(parse_header_names(&text));
    }

    let file_name = args
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let request = ImportRequest {
        title: args.title,
        ignored_headers: ignored,
        file_name,
        content,
    };

    let importer = Importer::new(db, ImportOptions::from_config(cfg));
    let result = importer.import(request).await?;
    println!("Created import {}", result.import_job_id);
    print!("{}", result.summary.render());
    Ok(())
}
