//! Source configuration.
//!
//! Arrives as the `source` object of every request. Nothing is read from disk;
//! the only ambient setting is the log filter in `PRCHECK_LOG`.

use std::fmt;

use serde::Deserialize;

use crate::error::{CheckError, Result};

/// Environment variable holding the `tracing` filter directive.
pub const LOG_ENV: &str = "PRCHECK_LOG";

/// Filter used when `PRCHECK_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "prcheck=info";

/// Where to look for pull requests and which of them to report.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Source {
    /// `owner/name` of the repository to watch.
    pub repository: String,

    pub access_token: String,

    /// REST endpoint of a GitHub Enterprise instance. Must be paired with `v4_endpoint`.
    pub v3_endpoint: String,

    /// GraphQL endpoint of a GitHub Enterprise instance. Must be paired with `v3_endpoint`.
    pub v4_endpoint: String,

    /// Only report pull requests touching a file that matches one of these globs.
    #[serde(rename = "path")]
    pub paths: Vec<String>,

    /// Don't report pull requests whose changed files all match these globs.
    #[serde(rename = "ignore_path")]
    pub ignore_paths: Vec<String>,

    /// Boolean-like string. When true, `[ci skip]` markers are not honored.
    pub disable_ci_skip: String,
}

impl Source {
    /// Check required fields and endpoint pairing.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.is_empty() {
            return Err(CheckError::Config("access_token must be set".into()));
        }
        if self.repository.is_empty() {
            return Err(CheckError::Config("repository must be set".into()));
        }
        let owner_and_name = self.repository.split_once('/');
        if !owner_and_name.is_some_and(|(owner, name)| !owner.is_empty() && !name.is_empty()) {
            return Err(CheckError::Config(
                "repository must be in owner/name form".into(),
            ));
        }
        if !self.v3_endpoint.is_empty() && self.v4_endpoint.is_empty() {
            return Err(CheckError::Config(
                "v4_endpoint must be set together with v3_endpoint".into(),
            ));
        }
        if !self.v4_endpoint.is_empty() && self.v3_endpoint.is_empty() {
            return Err(CheckError::Config(
                "v3_endpoint must be set together with v4_endpoint".into(),
            ));
        }
        Ok(())
    }

    /// Parse `disable_ci_skip`. Empty means false.
    pub fn disable_ci_skip(&self) -> Result<bool> {
        match self.disable_ci_skip.as_str() {
            "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
            "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
            other => Err(CheckError::Config(format!(
                "failed to parse disable_ci_skip: '{other}' is not a boolean"
            ))),
        }
    }

    /// Whether changed files are needed to decide what to report.
    pub fn has_path_filters(&self) -> bool {
        !self.paths.is_empty() || !self.ignore_paths.is_empty()
    }
}

// Hand-written so the token never reaches logs.
impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("repository", &self.repository)
            .field("access_token", &"<redacted>")
            .field("v3_endpoint", &self.v3_endpoint)
            .field("v4_endpoint", &self.v4_endpoint)
            .field("paths", &self.paths)
            .field("ignore_paths", &self.ignore_paths)
            .field("disable_ci_skip", &self.disable_ci_skip)
            .finish()
    }
}
