//! The check: report pull requests whose heads advanced since the previous version.
//!
//! A check is a pure function of the open pull requests and the previous
//! version. The previous version's ledger says what was already seen; every
//! returned version carries a ledger rebuilt from the current snapshot, so the
//! caller only ever has to store the last version it was given.
//!
//! Flow:
//!
//! 1. List open pull requests and drop the filtered ones ([`select`]).
//! 2. Classify each against the previous ledger ([`fold::is_above_the_fold`]).
//! 3. Rebuild the ledger and assemble the response ([`resolve`]).

use tracing::{debug, info};

use crate::config::Source;
use crate::error::Result;
use crate::filter;
use crate::fold;
use crate::ledger::{self, MalformedLedgerEntry};
use crate::model::{CheckRequest, PullRequest, Version};

/// Where pull requests come from.
pub trait PullRequestSource {
    /// All currently open pull requests with their tip commits.
    fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>>;

    /// Paths changed by a pull request.
    fn list_changed_files(&self, number: u64) -> Result<Vec<String>>;
}

/// Run a check: validate the request, select pull requests, resolve versions.
pub fn check(request: &CheckRequest, github: &impl PullRequestSource) -> Result<Vec<Version>> {
    request.source.validate()?;
    let disable_ci_skip = request.source.disable_ci_skip()?;

    let open = github.list_open_pull_requests()?;
    let open_count = open.len();
    let selected = select(open, &request.source, disable_ci_skip, github)?;

    let previous = request.previous_version();
    let versions = resolve(&selected, &previous)?;

    info!(
        open = open_count,
        selected = selected.len(),
        reported = versions.len(),
        "check complete"
    );
    Ok(versions)
}

/// Drop pull requests that should never be reported.
///
/// Skip markers in the title or tip message exclude a pull request unless
/// `disable_ci_skip` is set. With path filters configured, changed files are
/// fetched once per pull request: `path` keeps it if any file matches any
/// pattern, `ignore_path` drops it if no file survives all patterns.
pub fn select(
    pull_requests: Vec<PullRequest>,
    source: &Source,
    disable_ci_skip: bool,
    github: &impl PullRequestSource,
) -> Result<Vec<PullRequest>> {
    let mut selected = Vec::with_capacity(pull_requests.len());

    for pr in pull_requests {
        if !disable_ci_skip
            && (filter::contains_skip_marker(&pr.title)
                || filter::contains_skip_marker(&pr.tip.message))
        {
            debug!(number = pr.number, "skip marker present");
            continue;
        }

        if source.has_path_filters() {
            let files = github.list_changed_files(pr.number)?;

            if !source.paths.is_empty() {
                let mut wanted = Vec::new();
                for pattern in &source.paths {
                    wanted.extend(filter::include_by_pattern(&files, pattern)?);
                }
                if wanted.is_empty() {
                    debug!(number = pr.number, "no changed file matches path");
                    continue;
                }
            }

            if !source.ignore_paths.is_empty() {
                let mut wanted = files;
                for pattern in &source.ignore_paths {
                    wanted = filter::exclude_by_pattern(&wanted, pattern)?;
                }
                if wanted.is_empty() {
                    debug!(number = pr.number, "every changed file matches ignore_path");
                    continue;
                }
            }
        }

        selected.push(pr);
    }

    Ok(selected)
}

/// Resolve the versions to report for a filtered snapshot.
///
/// - Pull requests above the fold become versions, oldest commit first.
/// - Every version carries the ledger of the whole snapshot, ordered by number.
/// - Nothing new after an earlier check: the previous version is repeated.
/// - First check ever: only the newest version is returned.
pub fn resolve(
    pull_requests: &[PullRequest],
    previous: &Version,
) -> core::result::Result<Vec<Version>, MalformedLedgerEntry> {
    let mut new = Vec::new();
    let mut seen = Vec::new();

    for pr in pull_requests {
        let above = fold::is_above_the_fold(&ledger::entry(pr), &previous.already_seen)?;
        debug!(
            number = pr.number,
            url = %pr.url,
            base = %pr.base_branch,
            head = %pr.head_branch,
            author = %pr.tip.author,
            above,
            "classified"
        );
        if above {
            new.push(pr);
        } else {
            seen.push(pr);
        }
    }

    let mut combined: Vec<&PullRequest> = new.iter().chain(&seen).copied().collect();
    combined.sort_by_key(|pr| pr.number);
    let already_seen = ledger::encode(combined);

    let mut versions: Vec<Version> = new
        .iter()
        .map(|pr| Version::new(pr, already_seen.clone()))
        .collect();
    versions.sort_by_key(|v| v.committed);

    if versions.is_empty() && !previous.already_seen.is_empty() {
        return Ok(vec![previous.clone()]);
    }
    if previous.already_seen.is_empty()
        && let Some(latest) = versions.pop()
    {
        return Ok(vec![latest]);
    }
    Ok(versions)
}
