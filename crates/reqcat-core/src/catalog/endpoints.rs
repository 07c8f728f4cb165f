//! Endpoint rows: unique lookup, create, listing, notes and stats.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::endpoint::{EndpointKey, EndpointType};

use super::db::{unix_timestamp, SqliteCatalog};
use super::store::StoreError;
use super::types::{Endpoint, EndpointId, EndpointStats, NewEndpoint};

const ENDPOINT_COLUMNS: &str = "id, method, domain, uri, endpoint_type, notes, created_at";

fn endpoint_from_row(row: &SqliteRow) -> Endpoint {
    let endpoint_type: String = row.get("endpoint_type");
    Endpoint {
        id: row.get("id"),
        key: EndpointKey {
            method: row.get("method"),
            domain: row.get("domain"),
            uri: row.get("uri"),
        },
        endpoint_type: EndpointType::parse(&endpoint_type),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
    }
}

impl SqliteCatalog {
    /// Exact `(method, domain, uri)` lookup.
    pub async fn find_endpoint(&self, key: &EndpointKey) -> Result<Option<Endpoint>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ENDPOINT_COLUMNS} FROM endpoints WHERE method = ?1 AND domain = ?2 AND uri = ?3"
        ))
        .bind(&key.method)
        .bind(&key.domain)
        .bind(&key.uri)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(endpoint_from_row))
    }

    /// Insert a new endpoint. The UNIQUE constraint turns a duplicate into `StoreError::Conflict`.
    pub async fn create_endpoint(&self, new: &NewEndpoint) -> Result<Endpoint, StoreError> {
        let now = unix_timestamp();
        let id = sqlx::query(
            r#"
            INSERT INTO endpoints (method, domain, uri, endpoint_type, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, '', ?5)
            "#,
        )
        .bind(&new.key.method)
        .bind(&new.key.domain)
        .bind(&new.key.uri)
        .bind(new.endpoint_type.as_str())
        .bind(now)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();

        Ok(Endpoint {
            id,
            key: new.key.clone(),
            endpoint_type: new.endpoint_type,
            notes: String::new(),
            created_at: now,
        })
    }

    pub async fn get_endpoint(&self, id: EndpointId) -> Result<Option<Endpoint>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ENDPOINT_COLUMNS} FROM endpoints WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(endpoint_from_row))
    }

    /// All endpoints ordered by domain, method, uri.
    pub async fn list_endpoints(&self) -> Result<Vec<Endpoint>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ENDPOINT_COLUMNS} FROM endpoints ORDER BY domain ASC, method ASC, uri ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(endpoint_from_row).collect())
    }

    /// Replace the free-text notes of an endpoint.
    pub async fn set_endpoint_notes(&self, id: EndpointId, notes: &str) -> Result<(), StoreError> {
        let r = sqlx::query("UPDATE endpoints SET notes = ?1 WHERE id = ?2")
            .bind(notes)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if r.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("endpoint {id}")));
        }
        Ok(())
    }

    /// Request count, mean latency and status distribution for one endpoint.
    pub async fn endpoint_stats(&self, id: EndpointId) -> Result<EndpointStats, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total, COALESCE(AVG(latency_ms), 0.0) AS avg_latency
            FROM requests
            WHERE endpoint_id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        let total_requests: i64 = row.get("total");
        let avg_latency_ms: f64 = row.get("avg_latency");

        let rows = sqlx::query(
            r#"
            SELECT response_status, COUNT(*) AS n
            FROM requests
            WHERE endpoint_id = ?1
            GROUP BY response_status
            ORDER BY response_status ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        let status_counts = rows
            .iter()
            .map(|r| {
                let status: i64 = r.get("response_status");
                let n: i64 = r.get("n");
                (status as u16, n)
            })
            .collect();

        Ok(EndpointStats {
            total_requests,
            avg_latency_ms,
            status_counts,
        })
    }
}
