//! Pull request types: the records a check tracks.

use jiff::Timestamp;

/// An open pull request and the commit at the tip of its head branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Global opaque id assigned by GitHub. Used as the version key.
    pub id: String,

    /// Repository-scoped sequence number. Used as the ledger key.
    pub number: u64,

    pub title: String,
    pub url: String,
    pub base_branch: String,
    pub head_branch: String,

    /// The head commit.
    pub tip: Commit,
}

/// A commit as reported by GitHub. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub oid: String,

    /// Remote-assigned commit time. The ordering and freshness key.
    pub committed_at: Timestamp,

    /// Full commit message: headline, blank line, body.
    pub message: String,

    /// Login of the first author, empty when GitHub has no linked user.
    pub author: String,
}
