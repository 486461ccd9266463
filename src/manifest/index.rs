//! manifest/index — request-scoped cache over index.data.
//!
//! One ManifestIndex per logical operation: the first `entries(false)` reads
//! the file, later ones are served from the cache; `entries(true)` drops the
//! cache and re-reads. Nothing is shared between operations.
//!
//! Read protocol:
//! 1) open index.data read-only; NotFound ⇒ empty manifest (nothing recorded yet);
//! 2) shared fs2 lock for the duration of the read, released on drop;
//! 3) decode; blank ⇒ empty, malformed ⇒ DebugError::Decode.

use std::path::{Path, PathBuf};

use log::debug;

use super::{decode_manifest, Manifest};
use crate::error::Result;
use crate::lock::acquire_shared_lock;
use crate::metrics::{record_manifest_absent, record_manifest_cache_hit, record_manifest_load};
use crate::storage::index_path;

#[derive(Debug)]
pub struct ManifestIndex {
    dir: PathBuf,
    cache: Option<Manifest>,
}

impl ManifestIndex {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            cache: None,
        }
    }

    /// Directory the manifest is (or will be) loaded from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index_path(&self) -> PathBuf {
        index_path(&self.dir)
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    /// Drop the cached manifest; the next `entries` call re-reads the file.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Current manifest, most recent first.
    pub fn entries(&mut self, force_reload: bool) -> Result<&Manifest> {
        let manifest = match self.cache.take() {
            Some(m) if !force_reload => {
                record_manifest_cache_hit();
                m
            }
            _ => {
                // No stat cache to flush here: the file is re-opened on every load.
                let m = self.read_manifest()?;
                record_manifest_load(force_reload);
                debug!(
                    "manifest {} loaded ({} entries, forced={})",
                    self.index_path().display(),
                    m.len(),
                    force_reload
                );
                m
            }
        };
        Ok(&*self.cache.insert(manifest))
    }

    fn read_manifest(&self) -> Result<Manifest> {
        let path = self.index_path();
        let bytes = match acquire_shared_lock(&path)? {
            Some(mut guard) => guard.read_all()?,
            None => {
                record_manifest_absent();
                debug!("index file {} absent, manifest is empty", path.display());
                return Ok(Manifest::default());
            }
        };
        decode_manifest(&bytes, &path)
    }
}
