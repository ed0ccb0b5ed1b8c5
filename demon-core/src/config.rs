//! Plain-text rule file: one `<source> <destination> <extension>` per line.
//!
//! Loading is all-or-nothing. A missing file is an empty [`RuleSet`], but once
//! the file opens a single malformed line fails the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{RuleSet, SyncRule};

/// Load the rule file at `path`.
///
/// Returns an empty rule set when the file does not exist or cannot be
/// opened.
///
/// # Errors
/// [`ConfigError::Read`] when the opened file cannot be read as UTF-8 text,
/// [`ConfigError::Malformed`] when any non-blank line has a token count other
/// than three.
pub fn load(path: &Path) -> Result<RuleSet, ConfigError> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "config not readable, using no rules");
            return Ok(RuleSet::new());
        }
    };

    let mut text = String::new();
    file.read_to_string(&mut text)
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    parse(path, &text)
}

/// Parse rule-file text. `path` only labels errors.
pub fn parse(path: &Path, text: &str) -> Result<RuleSet, ConfigError> {
    let mut rules = RuleSet::new();

    for (index, line) in text.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let [source, destination, extension] = tokens.as_slice() else {
            return Err(ConfigError::Malformed {
                path: path.to_path_buf(),
                line: index + 1,
                found: tokens.len(),
            });
        };

        let rule = SyncRule::new(*source, *destination, *extension);
        tracing::debug!(
            source = %rule.source.display(),
            destination = %rule.destination.display(),
            extension = %rule.extension,
            "read config line",
        );
        rules.push(rule);
    }

    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_str(text: &str) -> Result<RuleSet, ConfigError> {
        parse(Path::new("test.cfg"), text)
    }

    #[test]
    fn parses_rules_in_file_order() {
        let rules = parse_str("/a /b .log\n/c /d .txt\n").unwrap();
        assert_eq!(
            rules.as_slice(),
            &[
                SyncRule::new("/a", "/b", ".log"),
                SyncRule::new("/c", "/d", ".txt"),
            ]
        );
    }

    #[test]
    fn blank_and_whitespace_lines_are_skipped() {
        let rules = parse_str("\n   \n/a /b .log\n\t\n").unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn tabs_and_repeated_spaces_separate_tokens() {
        let rules = parse_str("/a\t\t/b    .log").unwrap();
        assert_eq!(rules.as_slice(), &[SyncRule::new("/a", "/b", ".log")]);
    }

    #[test]
    fn malformed_line_reports_line_number_and_count() {
        let err = parse_str("/a /b .log\n/c /d\n").unwrap_err();
        match err {
            ConfigError::Malformed { line, found, .. } => {
                assert_eq!(line, 2);
                assert_eq!(found, 2);
            }
            other => panic!("expected malformed, got {other:?}"),
        }
    }

    #[test]
    fn empty_text_yields_no_rules() {
        assert!(parse_str("").unwrap().is_empty());
    }
}
