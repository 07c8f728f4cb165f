//! `reqcat requests (--import <id> | --endpoint <id>)` – ordered, searchable listing.

use anyhow::{bail, Result};
use reqcat_core::catalog::{RequestScope, SqliteCatalog};
use reqcat_core::query_spec::{build_spec, filter_from_query_string, FilterSpec, RawOrderParam};

use super::truncate;

#[derive(Debug)]
pub struct RequestsArgs {
    pub import: Option<i64>,
    pub endpoint: Option<i64>,
    pub order: Vec<String>,
    pub search: Option<String>,
    pub query: Option<String>,
}

fn scope(args: &RequestsArgs) -> Result<RequestScope> {
    match (args.import, args.endpoint) {
        (Some(id), None) => Ok(RequestScope::ImportJob(id)),
        (None, Some(id)) => Ok(RequestScope::Endpoint(id)),
        _ => bail!("pass exactly one of --import or --endpoint"),
    }
}

fn filter(args: &RequestsArgs) -> FilterSpec {
    if let Some(ref qs) = args.query {
        return filter_from_query_string(qs);
    }
    let raw: Vec<RawOrderParam> = args
        .order
        .iter()
        .map(|s| RawOrderParam::parse_shorthand(s))
        .collect();
    build_spec(&raw, args.search.as_deref().unwrap_or(""))
}

pub async fn run_requests(db: &SqliteCatalog, args: RequestsArgs) -> Result<()> {
    let scope = scope(&args)?;
    let filter = filter(&args);
    tracing::debug!("listing {:?} by {}", scope, filter.order_by_sql());

    let requests = db.list_requests(scope, &filter).await?;
    if requests.is_empty() {
        println!("No matching requests.");
        return Ok(());
    }
    println!(
        "{:<6} {:<5} {:<7} {:<6} {:<9} {:<8} {:<12} {}",
        "ID", "SEQ", "METHOD", "STATUS", "SIZE", "MS", "REQ-HASH", "URL"
    );
    for r in requests {
        let rec = &r.record;
        println!(
            "{:<6} {:<5} {:<7} {:<6} {:<9} {:<8} {:<12} {}",
            r.id,
            rec.sequence,
            rec.method,
            rec.response_status,
            rec.response_size,
            rec.latency_ms,
            &rec.filtered_request_hash[..rec.filtered_request_hash.len().min(12)],
            truncate(&rec.url, 80)
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(import: Option<i64>, endpoint: Option<i64>) -> RequestsArgs {
        RequestsArgs {
            import,
            endpoint,
            order: Vec::new(),
            search: None,
            query: None,
        }
    }

    #[test]
    fn scope_requires_exactly_one_owner() {
        assert_eq!(scope(&args(Some(3), None)).unwrap(), RequestScope::ImportJob(3));
        assert_eq!(scope(&args(None, Some(4))).unwrap(), RequestScope::Endpoint(4));
        assert!(scope(&args(None, None)).is_err());
        assert!(scope(&args(Some(1), Some(2))).is_err());
    }

    #[test]
    fn filter_from_shorthand_or_query_string() {
        let mut a = args(Some(1), None);
        a.order = vec!["status:desc".to_string(), "latency".to_string()];
        a.search = Some("users".to_string());
        let f = filter(&a);
        assert_eq!(f.order_by_sql(), "response_status DESC, latency_ms ASC");
        assert_eq!(f.search(), Some("users"));

        let mut a = args(Some(1), None);
        a.query = Some("orderBy=size&direction=desc&search=cdn".to_string());
        let f = filter(&a);
        assert_eq!(f.order_by_sql(), "response_size DESC");
        assert_eq!(f.search(), Some("cdn"));
    }
}
