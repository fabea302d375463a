//! GitHub access through the `gh` CLI.
//!
//! Lists open pull requests with their head commits, and the files a pull
//! request changes. Authentication is passed to `gh` through the environment:
//! `GH_TOKEN` for github.com, plus `GH_HOST` and `GH_ENTERPRISE_TOKEN` when an
//! enterprise endpoint is configured.

use std::process::Command;

use jiff::Timestamp;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::check::PullRequestSource;
use crate::config::Source;
use crate::error::{CheckError, Result};
use crate::model::{Commit, PullRequest};

/// Open pull requests with only their head commit, one page at a time.
///
/// `gh api graphql --paginate` feeds `endCursor` back in until `hasNextPage` is false.
const OPEN_PULL_REQUESTS_QUERY: &str = r"
query($owner: String!, $name: String!, $endCursor: String) {
  repository(owner: $owner, name: $name) {
    pullRequests(states: OPEN, first: 100, after: $endCursor, orderBy: {field: CREATED_AT, direction: ASC}) {
      nodes {
        id
        number
        title
        url
        baseRefName
        headRefName
        commits(last: 1) {
          nodes {
            commit {
              oid
              committedDate
              message
              author { user { login } }
            }
          }
        }
      }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

/// A repository on GitHub, queried with `gh`.
pub struct GitHub {
    repository: String,
    token: String,
    host: Option<String>,
}

impl GitHub {
    /// Build a client from a validated source.
    pub fn new(source: &Source) -> Self {
        let host = if source.v4_endpoint.is_empty() {
            None
        } else {
            Some(host_from_endpoint(&source.v4_endpoint).to_string())
        };

        Self {
            repository: source.repository.clone(),
            token: source.access_token.clone(),
            host,
        }
    }

    /// Run `gh` with the given args and return stdout.
    fn gh(&self, args: &[&str]) -> Result<String> {
        debug!(args = %args.join(" "), "running gh");

        let mut command = Command::new("gh");
        command.args(args).env("GH_TOKEN", &self.token);
        if let Some(host) = &self.host {
            command
                .env("GH_HOST", host)
                .env("GH_ENTERPRISE_TOKEN", &self.token);
        }

        let output = command
            .output()
            .map_err(|e| CheckError::Retrieval(format!("failed to run gh: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, stderr = %stderr.trim(), "gh failed");
            return Err(CheckError::Retrieval(format!(
                "gh {} failed: {}",
                args.first().copied().unwrap_or_default(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PullRequestSource for GitHub {
    fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        let (owner, name) = self.repository.split_once('/').ok_or_else(|| {
            CheckError::Config(format!(
                "repository '{}' is not in owner/name form",
                self.repository
            ))
        })?;
        let query = format!("query={OPEN_PULL_REQUESTS_QUERY}");
        let owner = format!("owner={owner}");
        let name = format!("name={name}");

        // `--slurp` wraps every page in one JSON array.
        let json = self.gh(&[
            "api", "graphql", "--paginate", "--slurp", "-f", &query, "-f", &owner, "-f", &name,
        ])?;
        parse_pull_requests(&json)
    }

    fn list_changed_files(&self, number: u64) -> Result<Vec<String>> {
        let num = number.to_string();
        let json = self.gh(&[
            "pr",
            "view",
            &num,
            "--repo",
            &self.repository,
            "--json",
            "files",
        ])?;
        parse_changed_files(&json)
    }
}

/// The host part of an endpoint URL.
///
/// Example: `https://ghe.example.com/api/graphql` → `ghe.example.com`.
fn host_from_endpoint(endpoint: &str) -> &str {
    let rest = endpoint
        .split_once("://")
        .map_or(endpoint, |(_, rest)| rest);
    rest.split('/').next().unwrap_or(rest)
}

// ── Pull request listing ──

/// One page of the GraphQL response, as emitted by `gh api graphql --paginate --slurp`.
#[derive(Deserialize)]
struct GhPage {
    data: GhData,
}

#[derive(Deserialize)]
struct GhData {
    repository: GhRepository,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhRepository {
    pull_requests: GhConnection<GhPullRequest>,
}

#[derive(Deserialize)]
struct GhConnection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhPullRequest {
    id: String,
    number: u64,
    title: String,
    url: String,
    base_ref_name: String,
    head_ref_name: String,
    commits: GhConnection<GhCommitNode>,
}

#[derive(Deserialize)]
struct GhCommitNode {
    commit: GhCommit,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhCommit {
    oid: String,
    committed_date: Timestamp,
    message: String,
    author: Option<GhGitActor>,
}

#[derive(Deserialize)]
struct GhGitActor {
    user: Option<GhUser>,
}

#[derive(Deserialize)]
struct GhUser {
    login: String,
}

fn parse_pull_requests(json: &str) -> Result<Vec<PullRequest>> {
    let pages: Vec<GhPage> = serde_json::from_str(json)
        .map_err(|e| CheckError::Retrieval(format!("unexpected gh api graphql output: {e}")))?;

    Ok(pages
        .into_iter()
        .flat_map(|page| page.data.repository.pull_requests.nodes)
        .filter_map(|mut pr| {
            // `commits(last: 1)` holds only the head commit.
            let Some(head) = pr.commits.nodes.pop() else {
                debug!(number = pr.number, "pull request has no commits");
                return None;
            };
            Some(PullRequest {
                id: pr.id,
                number: pr.number,
                title: pr.title,
                url: pr.url,
                base_branch: pr.base_ref_name,
                head_branch: pr.head_ref_name,
                tip: head.commit.into_commit(),
            })
        })
        .collect())
}

impl GhCommit {
    fn into_commit(self) -> Commit {
        Commit {
            oid: self.oid,
            committed_at: self.committed_date,
            message: self.message,
            author: self
                .author
                .and_then(|a| a.user)
                .map(|u| u.login)
                .unwrap_or_default(),
        }
    }
}

// ── Changed files ──

/// JSON shape for `gh pr view --json files`.
#[derive(Deserialize)]
struct GhPrFiles {
    files: Vec<GhChangedFile>,
}

#[derive(Deserialize)]
struct GhChangedFile {
    path: String,
}

fn parse_changed_files(json: &str) -> Result<Vec<String>> {
    let files: GhPrFiles = serde_json::from_str(json)
        .map_err(|e| CheckError::Retrieval(format!("unexpected gh pr view output: {e}")))?;
    Ok(files.files.into_iter().map(|f| f.path).collect())
}
