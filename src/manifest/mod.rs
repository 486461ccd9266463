//! manifest — the tag → metadata index of recorded requests.
//!
//! index.data holds one JSON object whose keys are tags in write
//! (chronological) order. Callers always see it most-recent-first.
//!
//! Состав:
//! - entry: RequestRecord (= ManifestEntry, = snapshot summary).
//! - index: ManifestIndex, the request-scoped cache with forced reload.
//! - filter: ManifestFilter for listings.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{DebugError, Result};

pub mod entry;
pub mod filter;
pub mod index;

pub use entry::{ManifestEntry, RequestRecord};
pub use filter::ManifestFilter;
pub use index::ManifestIndex;

/// Ordered tag → entry mapping, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    entries: Vec<(String, ManifestEntry)>,
    positions: HashMap<String, usize>,
}

impl Manifest {
    /// Build from entries in write order (oldest first); the result is reversed.
    pub fn from_write_order(entries: Vec<(String, ManifestEntry)>) -> Self {
        let mut entries = entries;
        entries.reverse();
        let positions = entries
            .iter()
            .enumerate()
            .map(|(i, (tag, _))| (tag.clone(), i))
            .collect();
        Self { entries, positions }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.positions.contains_key(tag)
    }

    pub fn get(&self, tag: &str) -> Option<&ManifestEntry> {
        self.positions.get(tag).map(|&i| &self.entries[i].1)
    }

    /// Most recently written entry.
    pub fn latest(&self) -> Option<(&str, &ManifestEntry)> {
        self.entries.first().map(|(t, e)| (t.as_str(), e))
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(t, e)| (t.as_str(), e))
    }
}

/// Decode index.data content. Empty (or blank) content is an empty manifest;
/// anything else must be a JSON object of tag → entry.
pub fn decode_manifest(bytes: &[u8], path: &Path) -> Result<Manifest> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(Manifest::default());
    }
    let decode_err = |source| DebugError::Decode {
        path: path.to_path_buf(),
        source,
    };
    // preserve_order: Map итерируется в порядке записи
    let raw: Map<String, Value> = serde_json::from_slice(bytes).map_err(decode_err)?;
    let mut entries = Vec::with_capacity(raw.len());
    for (tag, v) in raw {
        let mut e: ManifestEntry = serde_json::from_value(v).map_err(decode_err)?;
        if e.tag.is_empty() {
            e.tag = tag.clone();
        }
        entries.push((tag, e));
    }
    Ok(Manifest::from_write_order(entries))
}

/// Encode entries (oldest first) in the index.data format. The reader never
/// writes the live index; this exists for fixtures and tooling.
pub fn encode_manifest<'a, I>(entries: I) -> serde_json::Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a ManifestEntry>,
{
    let mut map = Map::new();
    for e in entries {
        map.insert(e.tag.clone(), serde_json::to_value(e)?);
    }
    serde_json::to_vec(&map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(tag: &str, url: &str) -> ManifestEntry {
        ManifestEntry {
            url: url.to_string(),
            method: "GET".into(),
            ..ManifestEntry::new(tag)
        }
    }

    #[test]
    fn decode_reverses_write_order() {
        let bytes = encode_manifest(&[entry("a", "/1"), entry("b", "/2"), entry("c", "/3")]).unwrap();
        let m = decode_manifest(&bytes, Path::new("index.data")).unwrap();
        assert_eq!(m.tags().collect::<Vec<_>>(), vec!["c", "b", "a"]);
        assert_eq!(m.get("a").unwrap().url, "/1");
        assert_eq!(m.latest().unwrap().0, "c");
    }

    #[test]
    fn blank_is_empty_and_garbage_is_decode_error() {
        assert!(decode_manifest(b"", Path::new("i")).unwrap().is_empty());
        assert!(decode_manifest(b" \n", Path::new("i")).unwrap().is_empty());
        assert!(matches!(
            decode_manifest(b"a:1:{s:1:", Path::new("i")),
            Err(DebugError::Decode { .. })
        ));
        // JSON, но не объект
        assert!(matches!(
            decode_manifest(b"[1,2,3]", Path::new("i")),
            Err(DebugError::Decode { .. })
        ));
    }

    #[test]
    fn tag_filled_from_key() {
        let m = decode_manifest(br#"{"k1":{"url":"/x"}}"#, Path::new("i")).unwrap();
        assert_eq!(m.get("k1").unwrap().tag, "k1");
    }
}
