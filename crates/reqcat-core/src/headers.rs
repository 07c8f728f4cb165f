//! Ordered header sets and their canonical text projections.
//!
//! A projection renders headers as `"Name: Value\n"` lines in original order.
//! Name matching is ASCII case-insensitive; names and values are emitted as captured.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single captured header. Serialized as `{"name": ..., "value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    fn write_line(&self, out: &mut String) {
        out.push_str(&self.name);
        out.push_str(": ");
        out.push_str(&self.value);
        out.push('\n');
    }
}

/// Ordered sequence of headers. Order is significant for projections and hashing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderSet(Vec<Header>);

impl HeaderSet {
    pub fn new(headers: Vec<Header>) -> Self {
        Self(headers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First value for `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Every header, in order.
    pub fn project_all(&self) -> String {
        self.project_where(|_| true)
    }

    /// Only headers whose name is in `names`.
    pub fn project_matching<S: AsRef<str>>(&self, names: &[S]) -> String {
        let set = NameSet::new(names);
        self.project_where(|h| set.contains(&h.name))
    }

    /// Only headers whose name is not in `names`.
    pub fn project_excluding<S: AsRef<str>>(&self, names: &[S]) -> String {
        let set = NameSet::new(names);
        self.project_where(|h| !set.contains(&h.name))
    }

    fn project_where(&self, keep: impl Fn(&Header) -> bool) -> String {
        let mut out = String::new();
        for h in self.0.iter().filter(|h| keep(h)) {
            h.write_line(&mut out);
        }
        out
    }

    /// JSON text used for persistence.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse persisted JSON text. An empty string is an empty set.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(s)
    }
}

impl FromIterator<Header> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<Header>> for HeaderSet {
    fn from(headers: Vec<Header>) -> Self {
        Self(headers)
    }
}

/// Case-folded lookup set of header names.
struct NameSet(HashSet<String>);

impl NameSet {
    fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self(
            names
                .iter()
                .map(|n| n.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }

    fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_ascii_lowercase())
    }
}

/// Split free text (newlines and/or whitespace) into header names; empty tokens are dropped.
pub fn parse_header_names(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
