//! Small HAR documents built from `(method, url, status)` rows.

use serde_json::{json, Value};

pub struct FixtureEntry<'a> {
    pub method: &'a str,
    pub url: &'a str,
    pub status: u16,
    pub authorization: &'a str,
    pub response_body: &'a str,
}

impl<'a> FixtureEntry<'a> {
    pub fn new(method: &'a str, url: &'a str, status: u16) -> Self {
        Self {
            method,
            url,
            status,
            authorization: "Bearer fixture",
            response_body: "{}",
        }
    }
}

pub fn har_bytes(entries: &[FixtureEntry<'_>]) -> Vec<u8> {
    let entries: Vec<Value> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            json!({
                "startedDateTime": format!("2024-05-01T10:00:{:02}.000Z", i % 60),
                "time": 10.5 + i as f64,
                "request": {
                    "method": e.method,
                    "url": e.url,
                    "headers": [
                        { "name": "Accept", "value": "application/json" },
                        { "name": "Authorization", "value": e.authorization }
                    ]
                },
                "response": {
                    "status": e.status,
                    "headers": [{ "name": "Content-Type", "value": "application/json" }],
                    "content": { "text": e.response_body }
                }
            })
        })
        .collect();
    serde_json::to_vec(&json!({ "log": { "version": "1.2", "entries": entries } }))
        .expect("fixture serializes")
}
