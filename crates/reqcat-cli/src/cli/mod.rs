//! CLI for the reqcat HAR request catalogue.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use reqcat_core::catalog::SqliteCatalog;
use reqcat_core::config;
use std::path::PathBuf;

use commands::{
    run_endpoint, run_endpoints, run_import, run_imports, run_note, run_remove_import,
    run_requests, run_show, ImportArgs, RequestsArgs,
};

/// Top-level CLI for reqcat.
#[derive(Debug, Parser)]
#[command(name = "reqcat")]
#[command(about = "reqcat: catalogue and fingerprint HTTP traffic from HAR captures", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Import a HAR capture as a new import job.
    Import {
        /// Path to the .har file.
        path: PathBuf,

        /// Title for this import.
        #[arg(long)]
        title: String,

        /// Header name to leave out of filtered fingerprints (repeatable).
        #[arg(long = "ignore", value_name = "HEADER")]
        ignore: Vec<String>,

        /// File with header names to ignore, whitespace or newline separated.
        #[arg(long, value_name = "PATH")]
        ignore_file: Option<PathBuf>,
    },

    /// List import jobs, newest first.
    Imports,

    /// List requests of one import job or one endpoint.
    Requests {
        /// Import job identifier.
        #[arg(long = "import", conflicts_with = "endpoint", required_unless_present = "endpoint")]
        import: Option<i64>,

        /// Endpoint identifier.
        #[arg(long)]
        endpoint: Option<i64>,

        /// Sort clause `column[:asc|desc]`; repeat for tie-breaks (first has priority).
        #[arg(long = "order", value_name = "COLUMN[:DIR]")]
        order: Vec<String>,

        /// Case-insensitive substring matched against URL, method and domain.
        #[arg(long)]
        search: Option<String>,

        /// Ordering and search as a web query string, e.g. `order_0=status&direction_0=desc`.
        #[arg(long, value_name = "QUERY", conflicts_with_all = ["order", "search"])]
        query: Option<String>,
    },

    /// Show one request with headers, bodies and fingerprints.
    Show {
        /// Request identifier.
        id: i64,
    },

    /// List all endpoints.
    Endpoints,

    /// Show one endpoint with its request statistics.
    Endpoint {
        /// Endpoint identifier.
        id: i64,
    },

    /// Set the free-text notes of an endpoint.
    Note {
        /// Endpoint identifier.
        id: i64,
        /// New notes (replaces existing notes).
        text: String,
    },

    /// Remove an import job and its requests. Endpoints are kept.
    RemoveImport {
        /// Import job identifier.
        id: i64,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let db = SqliteCatalog::open_with_config(&cfg).await?;

        match cli.command {
            CliCommand::Import {
                path,
                title,
                ignore,
                ignore_file,
            } => {
                let args = ImportArgs {
                    path,
                    title,
                    ignore,
                    ignore_file,
                };
                run_import(&db, &cfg, args).await?;
            }
            CliCommand::Imports => run_imports(&db).await?,
            CliCommand::Requests {
                import,
                endpoint,
                order,
                search,
                query,
            } => {
                let args = RequestsArgs {
                    import,
                    endpoint,
                    order,
                    search,
                    query,
                };
                run_requests(&db, args).await?;
            }
            CliCommand::Show { id } => run_show(&db, id).await?,
            CliCommand::Endpoints => run_endpoints(&db).await?,
            CliCommand::Endpoint { id } => run_endpoint(&db, id).await?,
            CliCommand::Note { id, text } => run_note(&db, id, &text).await?,
            CliCommand::RemoveImport { id } => run_remove_import(&db, id).await?,
        }

        db.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
