//! Endpoint classification strategies.

/// Category assigned to an endpoint when it is first created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointType {
    /// Fixed path with no identifier-like segments.
    Static,
    /// At least one segment looks like an identifier (number, UUID, long hex).
    Parameterized,
    /// Static asset (script, stylesheet, image, font, source map).
    Asset,
    /// URI is not a path (e.g. the URL did not parse).
    Unknown,
}

impl EndpointType {
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointType::Static => "static",
            EndpointType::Parameterized => "parameterized",
            EndpointType::Asset => "asset",
            EndpointType::Unknown => "unknown",
        }
    }

    /// Inverse of [`EndpointType::as_str`]; unrecognised names map to `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "static" => EndpointType::Static,
            "parameterized" => EndpointType::Parameterized,
            "asset" => EndpointType::Asset,
            _ => EndpointType::Unknown,
        }
    }
}

/// Replaceable classification strategy.
pub trait EndpointClassifier: Send + Sync {
    /// Short name, logged when endpoints are created.
    fn name(&self) -> &'static str;

    fn classify(&self, uri: &str, method: &str) -> EndpointType;
}

const ASSET_EXTENSIONS: &[&str] = &[
    "js", "mjs", "css", "map", "png", "jpg", "jpeg", "gif", "svg", "webp", "avif", "ico", "woff",
    "woff2", "ttf", "otf", "eot",
];

/// Minimum length for an all-hex segment to count as an identifier.
const MIN_HEX_ID_LEN: usize = 16;

/// Classifies by path shape only; the method is not considered.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapeClassifier;

impl EndpointClassifier for ShapeClassifier {
    fn name(&self) -> &'static str {
        "shape"
    }

    fn classify(&self, uri: &str, _method: &str) -> EndpointType {
        if !uri.starts_with('/') {
            return EndpointType::Unknown;
        }
        let segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();

        if let Some(last) = segments.last() {
            if is_asset_name(last) {
                return EndpointType::Asset;
            }
        }
        if segments.iter().any(|s| is_identifier_segment(s)) {
            return EndpointType::Parameterized;
        }
        EndpointType::Static
    }
}

fn is_asset_name(segment: &str) -> bool {
    segment
        .rsplit_once('.')
        .map(|(stem, ext)| {
            !stem.is_empty() && ASSET_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn is_identifier_segment(segment: &str) -> bool {
    is_numeric(segment) || is_uuid(segment) || is_long_hex(segment)
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// 8-4-4-4-12 hex groups.
fn is_uuid(s: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = s.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(p, len)| p.len() == len && p.bytes().all(|b| b.is_ascii_hexdigit()))
}

fn is_long_hex(s: &str) -> bool {
    s.len() >= MIN_HEX_ID_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}
