//! snapshot/loader — find a tag in the manifest with bounded retries, then
//! read and decode its data file.
//!
//! The instrumented process commits the snapshot after the response has been
//! sent, so a caller arriving right after the response may not see the tag
//! yet. Per call:
//!
//!   attempt 0..=max_retries:
//!     manifest = index.entries(force_reload = attempt > 0)
//!     tag present → read <dir>/<tag>.data, decode (failure = Integrity, no retry)
//!     attempt == max_retries → NotFound
//!     sleep(backoff)   (fixed interval, no growth)
//!
//! Only manifest absence is retried. A manifest hit with a missing data file
//! is reported at once.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use super::{decode_snapshot, Snapshot};
use crate::consts::DEFAULT_RETRY_BACKOFF_MS;
use crate::error::{DebugError, Result};
use crate::manifest::{Manifest, ManifestIndex};
use crate::metrics::{
    record_integrity_failure, record_not_found, record_retry_sleep, record_snapshot_loaded,
};
use crate::panel::PanelRegistry;
use crate::partition::Partition;
use crate::storage::{data_path, StorageResolver};
use crate::util::touch_file;

pub struct SnapshotLoader {
    resolver: StorageResolver,
    partition: Option<Partition>,
    dir: PathBuf,
    index: ManifestIndex,
    backoff: Duration,
}

impl SnapshotLoader {
    /// Bind a loader (and a fresh manifest cache) to one storage directory.
    pub fn new(resolver: StorageResolver, partition: Option<Partition>) -> Result<Self> {
        let dir = resolver.resolve(partition.as_ref())?;
        let index = ManifestIndex::new(&dir);
        Ok(Self {
            resolver,
            partition,
            dir,
            index,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        })
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    pub fn index_mut(&mut self) -> &mut ManifestIndex {
        &mut self.index
    }

    /// Manifest of the bound directory (cached unless `force_reload`).
    pub fn manifest(&mut self, force_reload: bool) -> Result<&Manifest> {
        self.index.entries(force_reload)
    }

    /// Wait for `tag` to show up in the manifest.
    /// Returns the number of attempts it took (1 = found on the first read).
    pub fn await_tag(&mut self, tag: &str, max_retries: u32) -> Result<u32> {
        let mut attempt: u32 = 0;
        loop {
            if self.index.entries(attempt > 0)?.contains(tag) {
                return Ok(attempt + 1);
            }
            if attempt >= max_retries {
                record_not_found();
                return Err(DebugError::NotFound {
                    tag: tag.to_string(),
                    dir: self.dir.clone(),
                    attempts: attempt + 1,
                });
            }
            debug!(
                "tag '{}' not in {} yet (attempt {}/{}), retrying in {:?}",
                tag,
                self.dir.display(),
                attempt + 1,
                max_retries + 1,
                self.backoff
            );
            record_retry_sleep();
            thread::sleep(self.backoff);
            attempt += 1;
        }
    }

    /// Load the snapshot for `tag`, or the most recent one when `tag` is None.
    pub fn fetch(&mut self, tag: Option<&str>, max_retries: u32) -> Result<Snapshot> {
        let tag = match tag {
            Some(t) => {
                self.await_tag(t, max_retries)?;
                t.to_string()
            }
            None => match self.index.entries(false)?.latest() {
                Some((t, _)) => t.to_string(),
                None => {
                    record_not_found();
                    return Err(DebugError::NoSnapshots {
                        dir: self.dir.clone(),
                    });
                }
            },
        };
        self.read_snapshot(&tag).map_err(|e| {
            if e.is_integrity() {
                record_integrity_failure();
                warn!("{}", e);
            }
            e
        })
    }

    /// `fetch` + hand every panel blob present to the registered panels.
    pub fn load(
        &mut self,
        tag: Option<&str>,
        max_retries: u32,
        panels: &mut PanelRegistry,
    ) -> Result<Snapshot> {
        let snapshot = self.fetch(tag, max_retries)?;
        let called = panels.dispatch(&snapshot);
        debug!(
            "snapshot {} dispatched to {} panel(s)",
            snapshot.tag(),
            called
        );
        Ok(snapshot)
    }

    fn read_snapshot(&self, tag: &str) -> Result<Snapshot> {
        let path = match data_path(&self.dir, tag) {
            Ok(p) => p,
            Err(e) => return Err(DebugError::integrity(tag, &self.dir, e.to_string())),
        };
        if self.resolver.is_partitioned() {
            // liveness mark for external cleanup of old partitions
            match touch_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!("touch {}: {}", path.display(), e),
            }
        }
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(DebugError::integrity(
                    tag,
                    &path,
                    "indexed in manifest but data file is missing",
                ))
            }
            Err(e) => {
                return Err(DebugError::integrity(
                    tag,
                    &path,
                    format!("data file unreadable: {e}"),
                ))
            }
        };
        let snapshot = decode_snapshot(tag, &bytes, &path)?;
        record_snapshot_loaded(bytes.len());
        Ok(snapshot)
    }
}
