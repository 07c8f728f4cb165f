use url::Url;

/// Path component of `url`, without scheme, host or query string.
///
/// The path is returned in its percent-encoded form. A URL that does not parse
/// is returned unchanged.
pub fn path_only_uri(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_host_and_query() {
        assert_eq!(
            path_only_uri("https://api.example.com/v1/users/123?x=1"),
            "/v1/users/123"
        );
        assert_eq!(
            path_only_uri("https://api.example.com/v1/users/123?x=2#frag"),
            "/v1/users/123"
        );
        assert_eq!(path_only_uri("http://example.com:8080/a/b/"), "/a/b/");
    }

    #[test]
    fn bare_origin_is_root() {
        assert_eq!(path_only_uri("https://example.com"), "/");
    }

    #[test]
    fn unparsable_url_is_kept_verbatim() {
        assert_eq!(path_only_uri("not a url"), "not a url");
        assert_eq!(path_only_uri("/relative/path?q=1"), "/relative/path?q=1");
    }

    #[test]
    fn path_stays_percent_encoded() {
        assert_eq!(
            path_only_uri("https://example.com/files/a%20b.txt"),
            "/files/a%20b.txt"
        );
    }
}
