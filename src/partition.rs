//! partition — dated subdirectories and the sticky per-session choice.
//!
//! In partitioned mode the caller asks for a date (default: today). If
//! `<data_path>/<date>` does not exist the choice falls back to the partition
//! remembered in the session (or today when nothing is remembered), and the
//! result is handed back for the caller to persist under
//! `SESSION_PARTITION_KEY`. The session itself is never reached from here.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::consts::{PARTITION_DATE_FORMAT, SESSION_PARTITION_KEY};
use crate::error::{DebugError, Result};
use crate::session::SessionStore;
use crate::storage::{validate_name, StorageResolver};

/// Validated partition selector: non-empty, a single path component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Partition(String);

impl Partition {
    pub fn new<S: Into<String>>(s: S) -> Result<Self> {
        let s = s.into();
        validate_name("partition", &s)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed date when the selector is date-shaped (`YYYY-MM-DD`).
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, PARTITION_DATE_FORMAT).ok()
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a partition selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionChoice {
    /// What the caller asked for (shown back to the user even if it has no data).
    pub requested: String,
    /// Partition actually used for the index/data lookups.
    pub effective: Partition,
    /// False when the requested partition has no directory and we fell back.
    pub has_data: bool,
}

impl PartitionChoice {
    /// Pick the partition to read from.
    ///
    /// `requested`: explicit date from the caller, `None` = `today`.
    /// `remembered`: last partition stored in the session.
    pub fn choose(
        resolver: &StorageResolver,
        requested: Option<&str>,
        remembered: Option<&str>,
        today: &str,
    ) -> Result<Self> {
        let requested = requested
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(today)
            .to_string();

        if let Ok(p) = Partition::new(requested.as_str()) {
            if resolver.partition_dir(&p).is_dir() {
                debug!("partition {} selected", p);
                return Ok(Self {
                    requested,
                    effective: p,
                    has_data: true,
                });
            }
        } else {
            warn!("ignoring malformed partition selector {:?}", requested);
        }

        let fallback = match remembered.and_then(|s| Partition::new(s).ok()) {
            Some(p) => p,
            None => Partition::new(today)?,
        };
        info!(
            "partition {:?} has no data, falling back to {}",
            requested, fallback
        );
        Ok(Self {
            requested,
            effective: fallback,
            has_data: false,
        })
    }

    /// Same as `choose`, reading the remembered partition from `session`.
    pub fn choose_with_session(
        resolver: &StorageResolver,
        requested: Option<&str>,
        session: &dyn SessionStore,
        today: &str,
    ) -> Result<Self> {
        let remembered = session.get(SESSION_PARTITION_KEY);
        Self::choose(resolver, requested, remembered.as_deref(), today)
    }

    /// Persist the effective partition so later operations of the session reuse it.
    pub fn remember(&self, session: &mut dyn SessionStore) -> Result<()> {
        session.set(SESSION_PARTITION_KEY, self.effective.as_str().to_string())
    }
}

/// Existing dated partitions under `base`, most recent first.
/// A missing base directory means "nothing recorded yet".
pub fn list_partitions(base: &Path) -> Result<Vec<Partition>> {
    let rd = match fs::read_dir(base) {
        Ok(rd) => rd,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DebugError::io("read_dir", base, e)),
    };
    let mut out = Vec::new();
    for e in rd {
        let e = e.map_err(|e| DebugError::io("read_dir", base, e))?;
        let is_dir = e.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Some(name) = e.file_name().to_str() {
            if let Ok(p) = Partition::new(name) {
                if p.date().is_some() {
                    out.push(p);
                }
            }
        }
    }
    // YYYY-MM-DD сортируется лексикографически
    out.sort_by(|a, b| b.cmp(a));
    Ok(out)
}
