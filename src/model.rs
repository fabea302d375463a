//! Core data model for prcheck.
//!
//! These types are what a check consumes and produces:
//! pull requests with their tip commits, the versions handed back
//! to the caller, and the request envelope that carries both.

mod pull_request;
mod request;
mod version;

pub use pull_request::{Commit, PullRequest};
pub use request::CheckRequest;
pub use version::Version;
