//! SQLite-backed catalogue implementation.
//!
//! Handles connection and migrations. Endpoint, import and request access live
//! in their own files.

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ReqcatConfig;

use super::store::StoreError;

/// Percent-encode a path for use in a sqlite:// URI so spaces and special chars don't break parsing.
fn path_to_sqlite_uri(path: &Path) -> String {
    let s = path.to_string_lossy();
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '%' => out.push_str("%25"),
            ' ' => out.push_str("%20"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            '&' => out.push_str("%26"),
            c => out.push(c),
        }
    }
    format!("sqlite://{}", out)
}

const DEFAULT_INSERT_BATCH_SIZE: usize = 100;

// SQLite caps bound parameters per statement; 32766 since 3.32.
const SQLITE_MAX_BIND_PARAMS: usize = 32766;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS import_jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        ignored_headers TEXT NOT NULL DEFAULT '[]',
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS endpoints (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        method TEXT NOT NULL,
        domain TEXT NOT NULL,
        uri TEXT NOT NULL,
        endpoint_type TEXT NOT NULL,
        notes TEXT NOT NULL DEFAULT '',
        created_at INTEGER NOT NULL,
        UNIQUE (method, domain, uri)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS requests (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        import_job_id INTEGER NOT NULL REFERENCES import_jobs(id) ON DELETE CASCADE,
        endpoint_id INTEGER NOT NULL REFERENCES endpoints(id),
        sequence INTEGER NOT NULL,
        url TEXT NOT NULL,
        method TEXT NOT NULL,
        domain TEXT NOT NULL,
        request_headers TEXT NOT NULL,
        request_body TEXT NOT NULL,
        response_status INTEGER NOT NULL,
        response_headers TEXT NOT NULL,
        response_body TEXT NOT NULL,
        response_size INTEGER NOT NULL,
        latency_ms INTEGER NOT NULL,
        captured_at TEXT NOT NULL,
        raw_request_hash CHAR(64) NOT NULL,
        filtered_request_hash CHAR(64) NOT NULL,
        filtered_response_hash CHAR(64) NOT NULL,
        response_body_hash CHAR(64) NOT NULL,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_requests_import_job ON requests(import_job_id)",
    "CREATE INDEX IF NOT EXISTS idx_requests_endpoint ON requests(endpoint_id)",
    "CREATE INDEX IF NOT EXISTS idx_requests_raw_hash ON requests(raw_request_hash)",
    "CREATE INDEX IF NOT EXISTS idx_requests_req_hash ON requests(filtered_request_hash)",
    "CREATE INDEX IF NOT EXISTS idx_requests_res_hash ON requests(filtered_response_hash)",
    "CREATE INDEX IF NOT EXISTS idx_requests_body_hash ON requests(response_body_hash)",
];

/// Handle to the SQLite catalogue.
///
/// The default database file lives under the XDG state directory:
/// `~/.local/state/reqcat/catalog.db`.
#[derive(Clone)]
pub struct SqliteCatalog {
    pub(crate) pool: Pool<Sqlite>,
    pub(crate) insert_batch_size: usize,
}

impl SqliteCatalog {
    /// Open (or create) the database named by the config and run migrations.
    pub async fn open_with_config(cfg: &ReqcatConfig) -> anyhow::Result<Self> {
        let path = cfg.database_path()?;
        let db = Self::open_at(&path).await?;
        Ok(db.with_insert_batch_size(cfg.insert_batch_size))
    }

    /// Open (or create) the database at a specific path. Creates parent dirs if needed.
    pub async fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Database(sqlx::Error::Io(e)))?;
        }
        let uri = path_to_sqlite_uri(path) + "?mode=rwc";
        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect(&uri)
            .await?;
        let db = SqliteCatalog {
            pool,
            insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
        };
        db.migrate().await?;
        tracing::debug!("catalogue open at {}", path.display());
        Ok(db)
    }

    /// Rows per multi-row INSERT; clamped to what one statement can bind.
    pub fn with_insert_batch_size(mut self, rows: usize) -> Self {
        self.insert_batch_size = rows.clamp(1, SQLITE_MAX_BIND_PARAMS / REQUEST_INSERT_COLUMNS);
        self
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Bound columns per row in the `requests` INSERT.
pub(crate) const REQUEST_INSERT_COLUMNS: usize = 19;

/// Current time as Unix seconds (for DB timestamps).
pub(crate) fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

#[cfg(test)]
/// Open an in-memory database for tests (no disk I/O).
pub(crate) async fn open_memory() -> Result<SqliteCatalog, StoreError> {
    // Single connection to avoid the pool handing back a different empty DB.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    let db = SqliteCatalog {
        pool,
        insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
    };
    db.migrate().await?;
    Ok(db)
}
