//! Request rows: lookup by id and scoped, ordered, searchable listing.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::query_spec::FilterSpec;

use super::db::SqliteCatalog;
use super::store::StoreError;
use super::types::{RequestId, RequestRecord, RequestScope, StoredRequest};

const REQUEST_COLUMNS: &str = "id, import_job_id, endpoint_id, sequence, url, method, domain, \
     request_headers, request_body, response_status, response_headers, response_body, \
     response_size, latency_ms, captured_at, raw_request_hash, filtered_request_hash, \
     filtered_response_hash, response_body_hash, created_at";

/// Text columns searched by the free-text term.
const SEARCH_COLUMNS: [&str; 3] = ["url", "method", "domain"];

fn request_from_row(row: &SqliteRow) -> StoredRequest {
    StoredRequest {
        id: row.get("id"),
        import_job_id: row.get("import_job_id"),
        record: RequestRecord {
            endpoint_id: row.get("endpoint_id"),
            sequence: row.get("sequence"),
            url: row.get("url"),
            method: row.get("method"),
            domain: row.get("domain"),
            request_headers_json: row.get("request_headers"),
            request_body: row.get("request_body"),
            response_status: row.get("response_status"),
            response_headers_json: row.get("response_headers"),
            response_body: row.get("response_body"),
            response_size: row.get("response_size"),
            latency_ms: row.get("latency_ms"),
            captured_at: row.get("captured_at"),
            raw_request_hash: row.get("raw_request_hash"),
            filtered_request_hash: row.get("filtered_request_hash"),
            filtered_response_hash: row.get("filtered_response_hash"),
            response_body_hash: row.get("response_body_hash"),
        },
        created_at: row.get("created_at"),
    }
}

/// `LIKE` pattern for a case-insensitive substring match, with wildcards escaped.
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.to_ascii_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

impl SqliteCatalog {
    pub async fn get_request(&self, id: RequestId) -> Result<Option<StoredRequest>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(request_from_row))
    }

    /// Requests in `scope`, matching the filter's search term, sorted by its clauses.
    ///
    /// Only allow-listed column identifiers are spliced into SQL;
    /// the search term is always a bound parameter.
    pub async fn list_requests(
        &self,
        scope: RequestScope,
        filter: &FilterSpec,
    ) -> Result<Vec<StoredRequest>, StoreError> {
        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {REQUEST_COLUMNS} FROM requests WHERE "));
        match scope {
            RequestScope::ImportJob(id) => qb.push("import_job_id = ").push_bind(id),
            RequestScope::Endpoint(id) => qb.push("endpoint_id = ").push_bind(id),
        };

        if let Some(term) = filter.search() {
            let pattern = like_pattern(term);
            qb.push(" AND (");
            for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(format!("LOWER({column}) LIKE "))
                    .push_bind(pattern.clone())
                    .push(" ESCAPE '\\'");
            }
            qb.push(")");
        }

        qb.push(" ORDER BY ")
            .push(filter.order_by_sql())
            .push(", id ASC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(request_from_row).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("API"), "%api%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
