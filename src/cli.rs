//! CLI interface for prcheck.
//!
//! Built to be driven by a CI engine: a JSON request in, a JSON array of
//! versions out. Diagnostics go to stderr so stdout carries only the response.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::check;
use crate::github::GitHub;
use crate::model::{CheckRequest, Version};

/// prcheck: report pull requests whose heads moved since the last check.
#[derive(Debug, Parser)]
#[command(name = "prcheck", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report new pull request versions.
    ///
    /// Reads `{"source": {...}, "version": {...}}` from `--request` (or stdin)
    /// and writes the JSON array of versions to `--out` (or stdout).
    /// The caller stores the last version and passes it back next time.
    Check {
        /// Read the request from this file instead of stdin.
        #[arg(long)]
        request: Option<PathBuf>,

        /// Write the versions to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check { request, out } => cmd_check(request.as_deref(), out.as_deref()),
    }
}

fn cmd_check(request: Option<&Path>, out: Option<&Path>) -> Result<(), String> {
    let request = read_request(request)?;
    let github = GitHub::new(&request.source);

    let versions = check::check(&request, &github).map_err(|e| format!("check failed: {e}"))?;

    write_versions(&versions, out)
}

/// Parse a request from a file, or from stdin when no path is given.
fn read_request(path: Option<&Path>) -> Result<CheckRequest, String> {
    let json = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?,
        None => {
            let mut json = String::new();
            io::stdin()
                .read_to_string(&mut json)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            json
        }
    };

    serde_json::from_str(&json).map_err(|e| format!("invalid request: {e}"))
}

/// Write versions as JSON to a file, or to stdout when no path is given.
fn write_versions(versions: &[Version], out: Option<&Path>) -> Result<(), String> {
    let json = serde_json::to_string(versions)
        .map_err(|e| format!("failed to serialize versions: {e}"))?;

    match out {
        Some(path) => {
            fs::write(path, &json)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!("Reported {} version(s) → {}", versions.len(), path.display());
        }
        None => {
            println!("{json}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;
    use tempfile::TempDir;

    #[test]
    fn parses_check_with_files() {
        let cli = Cli::try_parse_from([
            "prcheck",
            "check",
            "--request",
            "in.json",
            "--out",
            "out.json",
        ])
        .unwrap();

        match cli.command {
            Command::Check { request, out } => {
                assert_eq!(request, Some(PathBuf::from("in.json")));
                assert_eq!(out, Some(PathBuf::from("out.json")));
            }
        }
    }

    #[test]
    fn reads_request_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        fs::write(
            &path,
            r#"{"source":{"repository":"octo/repo","access_token":"t"},"version":{"alreadyseen":"1:5"}}"#,
        )
        .unwrap();

        let request = read_request(Some(&path)).unwrap();

        assert_eq!(request.source.repository, "octo/repo");
        assert_eq!(request.previous_version().already_seen, "1:5");
    }

    #[test]
    fn rejects_invalid_request() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("request.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_request(Some(&path)).unwrap_err();
        assert!(err.starts_with("invalid request"));
    }

    #[test]
    fn missing_request_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = read_request(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(err.starts_with("failed to read"));
    }

    #[test]
    fn writes_versions_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let versions = vec![Version {
            pr: "PR_1".into(),
            commit: "abc".into(),
            committed: Some(Timestamp::from_second(0).unwrap()),
            already_seen: "1:0".into(),
        }];

        write_versions(&versions, Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            r#"[{"pr":"PR_1","commit":"abc","committed":"1970-01-01T00:00:00Z","alreadyseen":"1:0"}]"#
        );
    }
}
