//! Fold classification: has a pull request advanced since the ledger was built?
//!
//! Pull requests "above the fold" are reported by the check.
//! Those "below the fold" were reported before and have not moved.

use crate::ledger::{self, MalformedLedgerEntry};

/// Whether `current` (a `<number>:<unix seconds>` entry) is newer than the ledger.
///
/// A ledger without any `:` carries no usable entries, so everything is new.
/// Otherwise the entry is new if the ledger does not track its number, or if
/// its timestamp is strictly after the tracked one. Equal timestamps are not new.
///
/// Every ledger entry is decoded, so a single malformed entry fails the call.
pub fn is_above_the_fold(current: &str, ledger: &str) -> Result<bool, MalformedLedgerEntry> {
    if !ledger.contains(':') {
        return Ok(true);
    }

    let current = ledger::decode(current)?;
    let seen = ledger::split(ledger)
        .into_iter()
        .map(ledger::decode)
        .collect::<Result<Vec<_>, _>>()?;

    // Entries are unique per number, so the first match decides.
    Ok(seen
        .iter()
        .find(|entry| entry.id == current.id)
        .is_none_or(|entry| current.committed > entry.committed))
}
