pub mod config;
pub mod error;
pub mod logging;

pub mod catalog;
pub mod endpoint;
pub mod fingerprint;
pub mod har;
pub mod headers;
pub mod import;
pub mod normalize;
pub mod query_spec;
