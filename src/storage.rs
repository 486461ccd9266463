//! storage — where index.data and <tag>.data live.
//!
//! Layout:
//!   local        → <data_path>/index.data, <data_path>/<tag>.data
//!   partitioned  → <data_path>/<partition>/index.data, <data_path>/<partition>/<tag>.data
//!
//! The resolver is pure: no existence checks, no I/O. Callers decide what a
//! missing directory means (see `partition::PartitionChoice`).

use std::path::{Path, PathBuf};

use crate::consts::{DATA_EXT, INDEX_FILE};
use crate::error::{DebugError, Result};
use crate::partition::Partition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Single fixed directory.
    Local,
    /// One subdirectory per partition (date) under the base directory.
    Partitioned,
}

#[derive(Debug, Clone)]
pub struct StorageResolver {
    base: PathBuf,
    mode: StorageMode,
}

impl StorageResolver {
    pub fn new<P: Into<PathBuf>>(base: P, mode: StorageMode) -> Self {
        Self {
            base: base.into(),
            mode,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    pub fn is_partitioned(&self) -> bool {
        self.mode == StorageMode::Partitioned
    }

    /// Directory holding the index and data files for `partition`.
    /// The selector is ignored in local mode and required in partitioned mode.
    pub fn resolve(&self, partition: Option<&Partition>) -> Result<PathBuf> {
        match self.mode {
            StorageMode::Local => Ok(self.base.clone()),
            StorageMode::Partitioned => {
                let p = partition.ok_or(DebugError::MissingPartition)?;
                Ok(self.base.join(p.as_str()))
            }
        }
    }

    /// Directory a partition would occupy, regardless of mode.
    pub fn partition_dir(&self, partition: &Partition) -> PathBuf {
        self.base.join(partition.as_str())
    }
}

/// `<dir>/index.data`
pub fn index_path(dir: &Path) -> PathBuf {
    dir.join(INDEX_FILE)
}

/// `<dir>/<tag>.data`; the tag must be a plain file stem.
pub fn data_path(dir: &Path, tag: &str) -> Result<PathBuf> {
    validate_name("tag", tag)?;
    Ok(dir.join(format!("{tag}.{DATA_EXT}")))
}

/// Names that end up as a path component must not escape their directory.
pub(crate) fn validate_name(what: &'static str, value: &str) -> Result<()> {
    let bad = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0');
    if bad {
        return Err(DebugError::InvalidName {
            what,
            value: value.to_string(),
        });
    }
    Ok(())
}
