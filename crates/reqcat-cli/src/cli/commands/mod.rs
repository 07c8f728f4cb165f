//! CLI command handlers, one file per command.

mod endpoint;
mod endpoints;
mod import;
mod imports;
mod note;
mod remove_import;
mod requests;
mod show;

pub use endpoint::run_endpoint;
pub use endpoints::run_endpoints;
pub use import::{run_import, ImportArgs};
pub use imports::run_imports;
pub use note::run_note;
pub use remove_import::run_remove_import;
pub use requests::{run_requests, RequestsArgs};
pub use show::run_show;

/// Truncate to `max` chars, marking the cut with `...`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{keep}...")
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_keeps_short_and_marks_long() {
        assert_eq!(truncate("abc", 10), "abc");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("éééééé", 5), "éé...");
    }
}
