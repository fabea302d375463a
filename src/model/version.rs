//! Version: the unit of state communicated to the caller.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::PullRequest;

/// One reported pull request head, plus the ledger as of the check that produced it.
///
/// The caller stores a single version and replays it on the next check,
/// so every version is self-contained: it names the pull request and commit,
/// and carries the complete ledger in `already_seen`.
///
/// Every field defaults when missing so the empty first-run version parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Version {
    /// Global id of the pull request.
    pub pr: String,

    /// Commit oid of the tip.
    pub commit: String,

    /// When the tip was committed, as RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub committed: Option<Timestamp>,

    /// The ledger: `<number>:<unix seconds>` pairs joined with `,`.
    #[serde(rename = "alreadyseen")]
    pub already_seen: String,
}

impl Version {
    /// Build the version for a pull request's tip, embedding the given ledger.
    pub fn new(pull_request: &PullRequest, already_seen: String) -> Self {
        Self {
            pr: pull_request.id.clone(),
            commit: pull_request.tip.oid.clone(),
            committed: Some(pull_request.tip.committed_at),
            already_seen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Commit;

    #[test]
    fn serializes_with_wire_field_names() {
        let version = Version {
            pr: "PR_kwDOA".into(),
            commit: "abc123".into(),
            committed: Some(Timestamp::from_second(1_700_000_000).unwrap()),
            already_seen: "1:1700000000".into(),
        };

        let json: serde_json::Value = serde_json::to_value(&version).unwrap();

        assert_eq!(json["pr"], "PR_kwDOA");
        assert_eq!(json["commit"], "abc123");
        assert_eq!(json["committed"], "2023-11-14T22:13:20Z");
        assert_eq!(json["alreadyseen"], "1:1700000000");
    }

    #[test]
    fn new_records_the_tip_oid() {
        let pull_request = PullRequest {
            id: "PR_kwDOA".into(),
            number: 7,
            title: "Fix".into(),
            url: "https://github.com/octo/repo/pull/7".into(),
            base_branch: "main".into(),
            head_branch: "fix".into(),
            tip: Commit {
                oid: "0f1e2d3c".into(),
                committed_at: Timestamp::from_second(1_700_000_000).unwrap(),
                message: "fix".into(),
                author: "octocat".into(),
            },
        };

        let version = Version::new(&pull_request, "7:1700000000".into());

        assert_eq!(version.pr, "PR_kwDOA");
        assert_eq!(version.commit, "0f1e2d3c");
        assert_eq!(version.committed, Some(pull_request.tip.committed_at));
    }

    #[test]
    fn empty_object_is_the_first_run_version() {
        let version: Version = serde_json::from_str("{}").unwrap();

        assert_eq!(version, Version::default());
        assert!(version.already_seen.is_empty());
    }

    #[test]
    fn accepts_offset_timestamps() {
        let version: Version = serde_json::from_str(
            r#"{"pr":"a","commit":"b","committed":"2019-01-01T02:00:00+02:00","alreadyseen":""}"#,
        )
        .unwrap();

        assert_eq!(
            version.committed,
            Some(Timestamp::from_second(1_546_300_800).unwrap())
        );
    }
}
