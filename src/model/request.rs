//! The request envelope read at the start of a check.

use serde::Deserialize;

use super::Version;
use crate::config::Source;

/// What the caller sends: configuration plus the last version it stored.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    pub source: Source,

    /// `null` or absent on the very first check.
    #[serde(default)]
    pub version: Option<Version>,
}

impl CheckRequest {
    /// The previous version, or the empty version when there is none.
    pub fn previous_version(&self) -> Version {
        self.version.clone().unwrap_or_default()
    }
}
