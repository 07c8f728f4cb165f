//! Whitelisted multi-column ordering and search for request listings.
//!
//! Client-supplied column names never reach SQL: each is looked up in a fixed
//! allow-list of [`OrderColumn`]s and dropped if unknown. Up to
//! [`MAX_ORDER_CLAUSES`] clauses are kept, in the priority order the client gave.

/// Maximum number of order clauses in a [`FilterSpec`].
pub const MAX_ORDER_CLAUSES: usize = 4;

/// Sortable request columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderColumn {
    Sequence,
    Method,
    Status,
    Size,
    Latency,
    Domain,
    Url,
    Created,
}

impl OrderColumn {
    pub const ALL: [OrderColumn; 8] = [
        OrderColumn::Sequence,
        OrderColumn::Method,
        OrderColumn::Status,
        OrderColumn::Size,
        OrderColumn::Latency,
        OrderColumn::Domain,
        OrderColumn::Url,
        OrderColumn::Created,
    ];

    /// Allow-list lookup by public name (case-insensitive, surrounding whitespace ignored).
    pub fn from_public_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.public_name().eq_ignore_ascii_case(name))
    }

    pub fn public_name(self) -> &'static str {
        match self {
            OrderColumn::Sequence => "sequence_number",
            OrderColumn::Method => "method",
            OrderColumn::Status => "status",
            OrderColumn::Size => "size",
            OrderColumn::Latency => "latency",
            OrderColumn::Domain => "domain",
            OrderColumn::Url => "url",
            OrderColumn::Created => "created",
        }
    }

    /// Column name in the `requests` table.
    pub fn field(self) -> &'static str {
        match self {
            OrderColumn::Sequence => "sequence",
            OrderColumn::Method => "method",
            OrderColumn::Status => "response_status",
            OrderColumn::Size => "response_size",
            OrderColumn::Latency => "latency_ms",
            OrderColumn::Domain => "domain",
            OrderColumn::Url => "url",
            OrderColumn::Created => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// `desc` in any case is descending; anything else is ascending.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("DESC") {
            Direction::Desc
        } else {
            Direction::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderClause {
    pub column: OrderColumn,
    pub direction: Direction,
}

impl OrderClause {
    pub fn new(column: OrderColumn, direction: Direction) -> Self {
        Self { column, direction }
    }
}

/// Untrusted `(column, direction)` pair as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOrderParam {
    pub column: String,
    pub direction: String,
}

impl RawOrderParam {
    pub fn new(column: impl Into<String>, direction: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: direction.into(),
        }
    }

    /// Parse the `column[:direction]` shorthand, e.g. `status:desc`.
    pub fn parse_shorthand(s: &str) -> Self {
        match s.split_once(':') {
            Some((column, direction)) => Self::new(column, direction),
            None => Self::new(s, ""),
        }
    }
}

/// Validated ordering plus optional search term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    orders: Vec<OrderClause>,
    search: Option<String>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            orders: vec![OrderClause::new(OrderColumn::Sequence, Direction::Asc)],
            search: None,
        }
    }
}

impl FilterSpec {
    /// Never empty; the first clause is the primary sort key.
    pub fn orders(&self) -> &[OrderClause] {
        &self.orders
    }

    /// Case-insensitive substring matched against URL, method and domain.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// `ORDER BY` body built only from allow-listed identifiers.
    pub fn order_by_sql(&self) -> String {
        self.orders
            .iter()
            .map(|c| format!("{} {}", c.column.field(), c.direction.as_sql()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Build a [`FilterSpec`] from client-supplied ordering and search.
///
/// Position in `raw` is priority. Only the first [`MAX_ORDER_CLAUSES`] entries
/// are considered; unknown columns are dropped and a repeated column keeps its
/// first position. With nothing left the order is `sequence ASC`.
pub fn build_spec(raw: &[RawOrderParam], search: &str) -> FilterSpec {
    let mut orders: Vec<OrderClause> = Vec::with_capacity(MAX_ORDER_CLAUSES);
    for param in raw.iter().take(MAX_ORDER_CLAUSES) {
        let Some(column) = OrderColumn::from_public_name(&param.column) else {
            tracing::debug!("dropping order column not on allow-list: {:?}", param.column);
            continue;
        };
        if orders.iter().any(|o| o.column == column) {
            continue;
        }
        orders.push(OrderClause::new(column, Direction::parse(&param.direction)));
    }

    let mut filter = FilterSpec::default();
    if !orders.is_empty() {
        filter.orders = orders;
    }
    let search = search.trim();
    if !search.is_empty() {
        filter.search = Some(search.to_string());
    }
    filter
}

/// Extract raw order params from query-string pairs.
///
/// Reads positional `order_0..order_3` with `direction_0..direction_3`. When none
/// are present, falls back to a single `orderBy` (or `order_by`) with `direction`,
/// or `asc=false` for descending.
pub fn order_params_from_query(pairs: &[(String, String)]) -> Vec<RawOrderParam> {
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    };

    let mut out = Vec::new();
    for i in 0..MAX_ORDER_CLAUSES {
        if let Some(column) = get(&format!("order_{i}")) {
            let direction = get(&format!("direction_{i}")).unwrap_or_default();
            out.push(RawOrderParam::new(column, direction));
        }
    }
    if !out.is_empty() {
        return out;
    }

    if let Some(column) = get("orderBy").or_else(|| get("order_by")) {
        let direction = match get("direction") {
            Some(d) => d,
            None if get("asc") == Some("false") => "DESC",
            None => "ASC",
        };
        out.push(RawOrderParam::new(column, direction));
    }
    out
}

/// Build a [`FilterSpec`] from a URL query string such as
/// `order_0=status&direction_0=desc&search=users`. A leading `?` is ignored.
pub fn filter_from_query_string(qs: &str) -> FilterSpec {
    let query = qs.trim_start_matches('?');
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    let search = pairs
        .iter()
        .find(|(k, _)| k == "search")
        .map(|(_, v)| v.as_str())
        .unwrap_or_default();
    build_spec(&order_params_from_query(&pairs), search)
}
