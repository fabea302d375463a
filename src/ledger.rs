//! The ledger: a compact record of what has already been seen.
//!
//! A ledger is a comma-separated list of `<number>:<unix seconds>` pairs,
//! one per open pull request, giving the tip commit time each pull request
//! had when the ledger was built. It is the only state that survives between
//! checks, and it survives only because the caller hands it back inside the
//! previous version.
//!
//! ```text
//! 12:1700000000,15:1700000450,31:1700003600
//! ```

use crate::model::PullRequest;

/// A ledger entry that could not be decoded.
///
/// Fatal for a check: the previous version is corrupt or from an incompatible
/// encoding, and treating everything as new would re-trigger downstream work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed ledger entry '{entry}': {reason}")]
pub struct MalformedLedgerEntry {
    pub entry: String,
    pub reason: &'static str,
}

/// One decoded `<number>:<unix seconds>` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    /// The pull request number, kept as written.
    pub id: String,

    /// Tip commit time in unix seconds.
    pub committed: i64,
}

/// The ledger entry for a single pull request's current tip.
pub fn entry(pull_request: &PullRequest) -> String {
    format!(
        "{}:{}",
        pull_request.number,
        pull_request.tip.committed_at.as_second()
    )
}

/// Encode pull requests into a ledger, preserving their order.
pub fn encode<'a>(pull_requests: impl IntoIterator<Item = &'a PullRequest>) -> String {
    pull_requests
        .into_iter()
        .map(entry)
        .collect::<Vec<_>>()
        .join(",")
}

/// Split a ledger into its raw entries. An empty ledger has none.
pub fn split(ledger: &str) -> Vec<&str> {
    if ledger.is_empty() {
        return Vec::new();
    }
    ledger.split(',').collect()
}

/// Decode a single `<number>:<unix seconds>` entry.
pub fn decode(entry: &str) -> Result<LedgerEntry, MalformedLedgerEntry> {
    let malformed = |reason| MalformedLedgerEntry {
        entry: entry.to_string(),
        reason,
    };

    let mut fields = entry.split(':');
    let (Some(id), Some(committed), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(malformed("expected exactly two ':'-separated fields"));
    };

    let committed = committed
        .parse()
        .map_err(|_| malformed("timestamp is not an integer"))?;

    Ok(LedgerEntry {
        id: id.to_string(),
        committed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::Commit;

    fn pull_request(number: u64, committed: i64) -> PullRequest {
        PullRequest {
            id: format!("PR_{number}"),
            number,
            title: format!("Pull request {number}"),
            url: format!("https://github.com/octo/repo/pull/{number}"),
            base_branch: "main".into(),
            head_branch: format!("feature-{number}"),
            tip: Commit {
                oid: format!("oid{number}"),
                committed_at: Timestamp::from_second(committed).unwrap(),
                message: "Change things".into(),
                author: "octocat".into(),
            },
        }
    }

    #[test]
    fn encodes_in_input_order() {
        let prs = [pull_request(7, 300), pull_request(2, 100)];
        assert_eq!(encode(&prs), "7:300,2:100");
    }

    #[test]
    fn encodes_nothing_as_empty() {
        assert_eq!(encode(&[] as &[PullRequest]), "");
    }

    #[test]
    fn entry_uses_unix_seconds() {
        assert_eq!(entry(&pull_request(42, 1_700_000_000)), "42:1700000000");
    }

    #[test]
    fn split_empty_ledger() {
        assert!(split("").is_empty());
    }

    #[test]
    fn split_keeps_every_field() {
        assert_eq!(split("1:10,2:20"), vec!["1:10", "2:20"]);
        assert_eq!(split("1:10,"), vec!["1:10", ""]);
    }

    #[test]
    fn decodes_entry() {
        assert_eq!(
            decode("12:1700000000").unwrap(),
            LedgerEntry {
                id: "12".into(),
                committed: 1_700_000_000,
            }
        );
    }

    #[test]
    fn decodes_negative_timestamp() {
        assert_eq!(decode("3:-5").unwrap().committed, -5);
    }

    #[test]
    fn rejects_non_integer_timestamp() {
        let err = decode("1:notanumber").unwrap_err();
        assert_eq!(err.entry, "1:notanumber");
        assert_eq!(err.reason, "timestamp is not an integer");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(decode("garbage").is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn rejects_extra_fields() {
        assert!(decode("1:2:3").is_err());
    }

    #[test]
    fn decodes_what_it_encodes() {
        let prs = [pull_request(1, 10), pull_request(2, 20)];
        let ledger = encode(&prs);
        let entries: Vec<LedgerEntry> = split(&ledger)
            .into_iter()
            .map(|e| decode(e).unwrap())
            .collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].id, "2");
        assert_eq!(entries[1].committed, 20);
    }
}
