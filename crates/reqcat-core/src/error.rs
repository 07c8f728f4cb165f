//! Import error taxonomy.
//!
//! Every variant aborts the whole import; nothing is half-committed. Entry-local
//! problems (unparsable URL, missing optional fields) are not errors and never
//! reach this type.

use thiserror::Error;

use crate::catalog::StoreError;
use crate::har::DecodeError;

pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, Error)]
pub enum ImportError {
    /// Upload rejected before decoding (bad file name, empty title).
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    /// The capture is not valid HAR JSON.
    #[error("decode capture: {0}")]
    Decode(#[from] DecodeError),

    /// A header set could not be encoded for storage.
    #[error("encode headers of request #{sequence}: {source}")]
    Fingerprint {
        sequence: u32,
        #[source]
        source: serde_json::Error,
    },

    /// Endpoint lookup/creation failed after the single retry.
    #[error("resolve endpoint {endpoint}: {source}")]
    EndpointResolution {
        endpoint: String,
        #[source]
        source: StoreError,
    },

    /// Writing the import failed; the transaction was rolled back.
    #[error("persist import: {0}")]
    Persistence(#[source] StoreError),
}

impl ImportError {
    pub fn invalid_upload<S: Into<String>>(msg: S) -> Self {
        Self::InvalidUpload(msg.into())
    }

    /// Short category name for display and logs.
    pub fn category(&self) -> &'static str {
        match self {
            ImportError::InvalidUpload(_) => "invalid-upload",
            ImportError::Decode(_) => "decode",
            ImportError::Fingerprint { .. } => "fingerprint",
            ImportError::EndpointResolution { .. } => "endpoint-resolution",
            ImportError::Persistence(_) => "persistence",
        }
    }
}
