//! session — the external key-value store the viewer keeps per user.
//!
//! The core only ever touches one key (`SESSION_PARTITION_KEY`), and only
//! through `PartitionChoice`. Two stores are provided:
//! - MemorySession: plain map, for embedding and tests;
//! - FileSession: JSON object on disk (tmp+rename on every set), used by the CLI
//!   so the sticky partition survives between invocations.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{DebugError, Result};

pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySession {
    values: BTreeMap<String, String>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

#[derive(Debug)]
pub struct FileSession {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSession {
    /// Open a session file; a missing file is an empty session.
    pub fn open<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(s) if s.trim().is_empty() => BTreeMap::new(),
            Ok(s) => serde_json::from_str(&s).map_err(|e| DebugError::Session {
                path: path.clone(),
                reason: format!("parse session json: {e}"),
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(DebugError::io("read session", &path, e)),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| DebugError::io("create session dir", parent, e))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.values).map_err(|e| DebugError::Session {
            path: self.path.clone(),
            reason: format!("serialize session: {e}"),
        })?;
        let tmp = self.path.with_extension("tmp");
        {
            let mut f = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)
                .map_err(|e| DebugError::io("open tmp session", &tmp, e))?;
            f.write_all(json.as_bytes())
                .map_err(|e| DebugError::io("write tmp session", &tmp, e))?;
            f.flush()
                .map_err(|e| DebugError::io("flush tmp session", &tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| DebugError::io("rename session", &self.path, e))?;
        debug!("session saved to {}", self.path.display());
        Ok(())
    }
}

impl SessionStore for FileSession {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.save()
    }
}
