//! File-based advisory locks on the index file.
//!
//! Cross-platform (fs2) advisory locks taken directly on the file being read:
//! - Shared: readers of index.data; many at once, excluded only by a writer.
//! - Exclusive: what a well-behaved writer holds while rewriting index.data
//!   (the reader side never takes it; kept for tooling and tests).
//!
//! "File absent" is a modeled outcome (`Ok(None)`), every other open/lock
//! failure is an error. Lock is released on Drop.

// std::fs::File has inherent lock methods since 1.89; fs2 is called explicitly.
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{DebugError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

pub struct LockGuard {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl LockGuard {
    fn new(file: File, path: PathBuf, mode: LockMode) -> Self {
        Self { file, path, mode }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    /// Writer-side access to the locked file (fixtures and tooling only).
    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }

    /// Read the whole file while the lock is held.
    /// Reads until EOF rather than trusting a stat() size taken before the lock.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.file
            .read_to_end(&mut buf)
            .map_err(|e| DebugError::io("read", &self.path, e))?;
        Ok(buf)
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored deliberately.
        let _ = FileExt::unlock(&self.file);
    }
}

fn open_for(path: &Path, mode: LockMode) -> io::Result<File> {
    match mode {
        LockMode::Shared => OpenOptions::new().read(true).open(path),
        LockMode::Exclusive => OpenOptions::new().read(true).write(true).open(path),
    }
}

/// Open `path` and lock it in the requested mode. Blocks until acquired.
/// Returns `Ok(None)` when the file does not exist.
pub fn acquire_lock(path: &Path, mode: LockMode) -> Result<Option<LockGuard>> {
    let file = match open_for(path, mode) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DebugError::io("open", path, e)),
    };
    let locked = match mode {
        LockMode::Shared => FileExt::lock_shared(&file),
        LockMode::Exclusive => FileExt::lock_exclusive(&file),
    };
    locked.map_err(|e| {
        DebugError::io(
            match mode {
                LockMode::Shared => "lock_shared",
                LockMode::Exclusive => "lock_exclusive",
            },
            path,
            e,
        )
    })?;
    Ok(Some(LockGuard::new(file, path.to_path_buf(), mode)))
}

/// Try to lock without blocking. Returns Err if the lock is held in a conflicting mode.
pub fn try_acquire_lock(path: &Path, mode: LockMode) -> Result<Option<LockGuard>> {
    let file = match open_for(path, mode) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DebugError::io("open", path, e)),
    };
    let locked = match mode {
        LockMode::Shared => FileExt::try_lock_shared(&file),
        LockMode::Exclusive => FileExt::try_lock_exclusive(&file),
    };
    locked.map_err(|e| DebugError::io("try_lock", path, e))?;
    Ok(Some(LockGuard::new(file, path.to_path_buf(), mode)))
}

/// Convenience wrappers.
pub fn acquire_shared_lock(path: &Path) -> Result<Option<LockGuard>> {
    acquire_lock(path, LockMode::Shared)
}

/// Writer-side lock: the reader never takes it, fixtures and tooling do.
pub fn acquire_exclusive_lock(path: &Path) -> Result<Option<LockGuard>> {
    acquire_lock(path, LockMode::Exclusive)
}

/// Non-blocking writer-side lock: fails while any reader holds the shared lock.
pub fn try_acquire_exclusive_lock(path: &Path) -> Result<Option<LockGuard>> {
    try_acquire_lock(path, LockMode::Exclusive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tmp_file(name: &str, body: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "dbgtest-lock-{}-{}-{}",
            name,
            std::process::id(),
            crate::util::now_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join("index.data");
        fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn absent_file_is_none() {
        let p = std::env::temp_dir().join("dbgtest-lock-definitely-missing/index.data");
        assert!(acquire_shared_lock(&p).unwrap().is_none());
    }

    #[test]
    fn shared_read_returns_all_bytes() {
        let p = tmp_file("read", b"{\"a\":1}");
        let mut g = acquire_shared_lock(&p).unwrap().expect("file exists");
        assert_eq!(g.mode(), LockMode::Shared);
        assert_eq!(g.read_all().unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn shared_blocks_exclusive_try() {
        let p = tmp_file("excl", b"{}");
        let _reader = acquire_shared_lock(&p).unwrap().expect("file exists");
        assert!(try_acquire_exclusive_lock(&p).is_err());
    }

    #[test]
    fn try_shared_coexists_and_drop_releases() {
        let p = tmp_file("try-shared", b"{}");
        let a = try_acquire_lock(&p, LockMode::Shared).unwrap().expect("file exists");
        let b = try_acquire_lock(&p, LockMode::Shared).unwrap().expect("file exists");
        assert!(try_acquire_exclusive_lock(&p).is_err());
        drop(a);
        drop(b);
        // после drop обоих читателей writer берёт lock
        let w = try_acquire_exclusive_lock(&p).unwrap().expect("file exists");
        assert_eq!(w.mode(), LockMode::Exclusive);
        assert!(try_acquire_lock(&p, LockMode::Shared).is_err());
    }
}
