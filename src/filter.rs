//! Filters applied to pull requests before they reach the resolver.
//!
//! Skip markers in titles or commit messages, and glob patterns over the
//! changed files of a pull request.

use std::sync::LazyLock;

use glob::{MatchOptions, Pattern};
use regex::Regex;

use crate::error::{CheckError, Result};

static SKIP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(ci skip|skip ci)\]").expect("skip marker regex is valid")
});

/// `*` and `?` never cross a `/`, as in shell globbing.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Whether `text` contains `[ci skip]` or `[skip ci]`, in any case.
pub fn contains_skip_marker(text: &str) -> bool {
    SKIP_MARKER.is_match(text)
}

/// The files matching `pattern`, in their original order.
pub fn include_by_pattern(files: &[String], pattern: &str) -> Result<Vec<String>> {
    let pattern = compile(pattern)?;
    Ok(files
        .iter()
        .filter(|f| pattern.matches_with(f, MATCH_OPTIONS))
        .cloned()
        .collect())
}

/// The files not matching `pattern`, in their original order.
pub fn exclude_by_pattern(files: &[String], pattern: &str) -> Result<Vec<String>> {
    let pattern = compile(pattern)?;
    Ok(files
        .iter()
        .filter(|f| !pattern.matches_with(f, MATCH_OPTIONS))
        .cloned()
        .collect())
}

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|source| CheckError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
