//! Tests for `import`.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_import_minimal() {
    match parse(&["reqcat", "import", "capture.har", "--title", "Login"]) {
        CliCommand::Import {
            path,
            title,
            ignore,
            ignore_file,
        } => {
            assert_eq!(path, Path::new("capture.har"));
            assert_eq!(title, "Login");
            assert!(ignore.is_empty());
            assert!(ignore_file.is_none());
        }
        _ => panic!("expected Import"),
    }
}

#[test]
fn cli_parse_import_ignore_repeatable() {
    match parse(&[
        "reqcat",
        "import",
        "a.har",
        "--title",
        "t",
        "--ignore",
        "Authorization",
        "--ignore",
        "Cookie",
        "--ignore-file",
        "ignored.txt",
    ]) {
        CliCommand::Import {
            ignore, ignore_file, ..
        } => {
            assert_eq!(ignore, vec!["Authorization", "Cookie"]);
            assert_eq!(ignore_file.as_deref(), Some(Path::new("ignored.txt")));
        }
        _ => panic!("expected Import with ignores"),
    }
}

#[test]
fn cli_import_requires_title() {
    assert!(Cli::try_parse_from(["reqcat", "import", "a.har"]).is_err());
}
