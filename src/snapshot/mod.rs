//! snapshot — decoded `<tag>.data` payload.
//!
//! Формат файла (JSON-объект):
//!   { "<panel id>": <blob>, ..., "summary": RequestRecord }
//! `summary` is required; every other key is an opaque panel blob. A manifest
//! hit whose data file cannot be decoded this way is an integrity failure.

use std::path::Path;

use serde_json::{Map, Value};

use crate::consts::SUMMARY_KEY;
use crate::error::{DebugError, Result};
use crate::manifest::RequestRecord;

pub mod loader;

pub use loader::SnapshotLoader;

/// Request-level facts stored alongside the panel blobs.
pub type Summary = RequestRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    tag: String,
    summary: Summary,
    panels: Map<String, Value>,
}

impl Snapshot {
    pub fn new<S: Into<String>>(tag: S, summary: Summary, panels: Map<String, Value>) -> Self {
        Self {
            tag: tag.into(),
            summary,
            panels,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn panel(&self, id: &str) -> Option<&Value> {
        self.panels.get(id)
    }

    /// Panel blobs in file order.
    pub fn panels(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.panels.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn panel_ids(&self) -> impl Iterator<Item = &str> {
        self.panels.keys().map(|k| k.as_str())
    }

    pub fn into_parts(self) -> (String, Summary, Map<String, Value>) {
        (self.tag, self.summary, self.panels)
    }
}

/// Decode a data file. Every failure is reported as `Integrity`.
pub fn decode_snapshot(tag: &str, bytes: &[u8], path: &Path) -> Result<Snapshot> {
    let mut panels: Map<String, Value> = serde_json::from_slice(bytes)
        .map_err(|e| DebugError::integrity(tag, path, format!("undecodable payload: {e}")))?;
    let summary = panels
        .remove(SUMMARY_KEY)
        .ok_or_else(|| DebugError::integrity(tag, path, "payload has no summary record"))?;
    let summary: Summary = serde_json::from_value(summary)
        .map_err(|e| DebugError::integrity(tag, path, format!("bad summary record: {e}")))?;
    Ok(Snapshot::new(tag, summary, panels))
}

/// Encode a snapshot in the data file format (panels first, then summary).
/// For fixtures and tooling; the reader never writes data files.
pub fn encode_snapshot(s: &Snapshot) -> serde_json::Result<Vec<u8>> {
    let mut out = s.panels.clone();
    out.insert(SUMMARY_KEY.to_string(), serde_json::to_value(&s.summary)?);
    serde_json::to_vec(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn summary_is_split_from_panels() {
        let bytes = br#"{"log":{"messages":[]},"db":{"queries":2},"summary":{"tag":"t","url":"/"}}"#;
        let s = decode_snapshot("t", bytes, Path::new("t.data")).unwrap();
        assert_eq!(s.summary().url, "/");
        assert_eq!(s.panel_ids().collect::<Vec<_>>(), vec!["log", "db"]);
        assert_eq!(s.panel("db"), Some(&json!({"queries": 2})));
        assert!(s.panel("summary").is_none());
    }

    #[test]
    fn missing_summary_is_integrity() {
        let err = decode_snapshot("t", br#"{"log":[]}"#, Path::new("t.data")).unwrap_err();
        assert!(err.is_integrity());
        let err = decode_snapshot("t", b"not json", Path::new("t.data")).unwrap_err();
        assert!(err.is_integrity());
        let err = decode_snapshot("t", br#"{"summary":"oops"}"#, Path::new("t.data")).unwrap_err();
        assert!(err.is_integrity());
    }
}
