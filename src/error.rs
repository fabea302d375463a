//! Errors that abort a check.
//!
//! There is no partial success: any of these fails the whole check,
//! and the caller is expected to poll again later.

use crate::ledger::MalformedLedgerEntry;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// A collaborator could not produce data (network, auth, rate limit, bad output).
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    /// A configured path pattern is not a valid glob.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    /// The previous version's ledger does not decode.
    #[error(transparent)]
    MalformedLedgerEntry(#[from] MalformedLedgerEntry),

    /// The source configuration is unusable.
    #[error("invalid source configuration: {0}")]
    Config(String),
}

pub type Result<T> = core::result::Result<T, CheckError>;
