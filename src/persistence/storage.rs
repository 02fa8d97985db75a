//! Durable record storage
//!
//! Writes never touch the live record in place: bytes go to a temp file in
//! the same directory, get synced, then replace the record with a rename.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Where the single save record lives
pub trait RecordStorage {
    fn exists(&self) -> bool;

    /// Full record contents
    fn read(&self) -> io::Result<Vec<u8>>;

    /// Replace the record with `bytes`, all or nothing
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Move an unreadable record aside so it isn't overwritten.
    /// Returns where it went.
    fn quarantine(&self) -> io::Result<Option<PathBuf>>;

    /// Delete the record (no-op if absent)
    fn remove(&self) -> io::Result<()>;
}

/// Record stored as a single file on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Sidecar name for a quarantined record
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".corrupt");
        PathBuf::from(name)
    }

    /// First of `<path>.corrupt`, `<path>.corrupt.1`, ... not already taken
    fn free_corrupt_path(&self) -> PathBuf {
        let first = self.corrupt_path();
        if !first.exists() {
            return first;
        }
        (1u32..)
            .map(|n| {
                let mut name = first.as_os_str().to_owned();
                name.push(format!(".{n}"));
                PathBuf::from(name)
            })
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

impl RecordStorage for FileStorage {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn read(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn quarantine(&self) -> io::Result<Option<PathBuf>> {
        if !self.exists() {
            return Ok(None);
        }
        let target = self.free_corrupt_path();
        fs::rename(&self.path, &target)?;
        log::warn!("Moved unreadable save to {}", target.display());
        Ok(Some(target))
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
