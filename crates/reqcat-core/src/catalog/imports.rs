//! Import job rows: atomic create with requests, lookup, listing, removal.

use sqlx::{QueryBuilder, Row, Sqlite};

use super::db::{unix_timestamp, SqliteCatalog};
use super::store::StoreError;
use super::types::{ImportJob, ImportJobId, ImportJobSummary, NewImportJob, RequestRecord};

impl SqliteCatalog {
    /// Insert the import job and all of its requests in one transaction.
    ///
    /// Requests go in as multi-row INSERTs of `insert_batch_size` rows. Any
    /// failure rolls the whole import back (the transaction is dropped uncommitted).
    pub async fn create_import(
        &self,
        job: &NewImportJob,
        requests: &[RequestRecord],
    ) -> Result<ImportJobId, StoreError> {
        let now = unix_timestamp();
        let ignored_json = serde_json::to_string(&job.ignored_headers)?;

        let mut tx = self.pool.begin().await?;
        let job_id = sqlx::query(
            r#"
            INSERT INTO import_jobs (title, ignored_headers, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&job.title)
        .bind(ignored_json)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for chunk in requests.chunks(self.insert_batch_size.max(1)) {
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO requests (
                    import_job_id, endpoint_id, sequence, url, method, domain,
                    request_headers, request_body, response_status, response_headers,
                    response_body, response_size, latency_ms, captured_at,
                    raw_request_hash, filtered_request_hash, filtered_response_hash,
                    response_body_hash, created_at
                ) ",
            );
            qb.push_values(chunk, |mut b, r| {
                b.push_bind(job_id)
                    .push_bind(r.endpoint_id)
                    .push_bind(r.sequence)
                    .push_bind(&r.url)
                    .push_bind(&r.method)
                    .push_bind(&r.domain)
                    .push_bind(&r.request_headers_json)
                    .push_bind(&r.request_body)
                    .push_bind(r.response_status)
                    .push_bind(&r.response_headers_json)
                    .push_bind(&r.response_body)
                    .push_bind(r.response_size)
                    .push_bind(r.latency_ms)
                    .push_bind(&r.captured_at)
                    .push_bind(&r.raw_request_hash)
                    .push_bind(&r.filtered_request_hash)
                    .push_bind(&r.filtered_response_hash)
                    .push_bind(&r.response_body_hash)
                    .push_bind(now);
            });
            qb.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        tracing::info!(
            job_id,
            requests = requests.len(),
            "import job {:?} committed",
            job.title
        );
        Ok(job_id)
    }

    pub async fn get_import_job(&self, id: ImportJobId) -> Result<Option<ImportJob>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, ignored_headers, created_at
            FROM import_jobs
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ignored_json: String = row.get("ignored_headers");
        let ignored_headers = if ignored_json.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&ignored_json)?
        };

        Ok(Some(ImportJob {
            id: row.get("id"),
            title: row.get("title"),
            ignored_headers,
            created_at: row.get("created_at"),
        }))
    }

    /// All import jobs, newest first, with request counts.
    pub async fn list_import_jobs(&self) -> Result<Vec<ImportJobSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT j.id, j.title, j.created_at, COUNT(r.id) AS request_count
            FROM import_jobs j
            LEFT JOIN requests r ON r.import_job_id = j.id
            GROUP BY j.id
            ORDER BY j.created_at DESC, j.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(ImportJobSummary {
                id: row.get("id"),
                title: row.get("title"),
                request_count: row.get("request_count"),
                created_at: row.get("created_at"),
            });
        }
        Ok(out)
    }

    /// Delete an import job and its requests. Endpoints are shared and kept.
    /// Returns the number of requests removed.
    pub async fn remove_import(&self, id: ImportJobId) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM requests WHERE import_job_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let jobs = sqlx::query("DELETE FROM import_jobs WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if jobs == 0 {
            // Dropping the transaction rolls back.
            return Err(StoreError::NotFound(format!("import job {id}")));
        }
        tx.commit().await?;
        Ok(removed)
    }
}
