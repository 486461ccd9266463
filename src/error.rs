//! Error taxonomy for discovery, resolution and read-with-retry.
//!
//! - `NotFound`: tag absent from the manifest after all attempts (terminal, user-facing).
//! - `Integrity`: manifest hit, but the data file is missing/unreadable/undecodable
//!   or has no summary record. Never retried.
//! - `Decode`: index file is non-empty but is not a tag -> entry mapping.
//! - `Io`: open/lock failure other than "file absent" (absent index = empty manifest).

use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, DebugError>;

#[derive(Debug, thiserror::Error)]
pub enum DebugError {
    #[error("unable to find debug data tagged with '{tag}' in {} after {attempts} attempt(s)", dir.display())]
    NotFound {
        tag: String,
        dir: PathBuf,
        attempts: u32,
    },

    #[error("no debug data recorded in {}", dir.display())]
    NoSnapshots { dir: PathBuf },

    #[error("debug data for '{tag}' at {} is corrupt: {reason}", path.display())]
    Integrity {
        tag: String,
        path: PathBuf,
        reason: String,
    },

    #[error("malformed index file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("partitioned storage requires a partition selector")]
    MissingPartition,

    #[error("invalid {what} '{value}'")]
    InvalidName { what: &'static str, value: String },

    #[error("session store {}: {reason}", path.display())]
    Session { path: PathBuf, reason: String },
}

impl DebugError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        DebugError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn integrity(
        tag: &str,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        DebugError::Integrity {
            tag: tag.to_string(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// "No such snapshot" conditions a user can recover from (pick another tag/date).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DebugError::NotFound { .. } | DebugError::NoSnapshots { .. }
        )
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, DebugError::Integrity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_carries_context() {
        let e = DebugError::NotFound {
            tag: "5f1a".into(),
            dir: PathBuf::from("/tmp/debug"),
            attempts: 6,
        };
        let msg = e.to_string();
        assert!(msg.contains("5f1a"));
        assert!(msg.contains("/tmp/debug"));
        assert!(msg.contains("6 attempt"));
        assert!(e.is_not_found());
        assert!(!e.is_integrity());
    }

    #[test]
    fn integrity_is_not_not_found() {
        let e = DebugError::integrity("t1", "/x/t1.data", "missing summary");
        assert!(e.is_integrity());
        assert!(!e.is_not_found());
        assert!(e.to_string().contains("missing summary"));
    }
}
