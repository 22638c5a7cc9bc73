//! In-memory filesystem for exercising hot reload without touching disk.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime};

use super::traits::FileSystem;

#[derive(Debug, Clone)]
struct MemoryFile {
    content: String,
    modified: SystemTime,
}

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<PathBuf, MemoryFile>,
    /// Seconds since the fake epoch; bumped on every write or touch.
    clock: u64,
}

impl Inner {
    fn tick(&mut self) -> SystemTime {
        self.clock += 1;
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + self.clock)
    }
}

/// Shared in-memory filesystem.
///
/// Clones share the same files, so a test can keep one handle and mutate
/// files while the engine owns another. Modification times only move forward.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a file with a fresh modification time.
    pub fn write(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let mut inner = self.lock();
        let modified = inner.tick();
        inner.files.insert(
            path.as_ref().to_path_buf(),
            MemoryFile {
                content: content.into(),
                modified,
            },
        );
    }

    /// Advances the modification time without changing the content.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut inner = self.lock();
        let modified = inner.tick();
        if let Some(file) = inner.files.get_mut(path.as_ref()) {
            file.modified = modified;
        }
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.lock().files.remove(path.as_ref());
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not poison the other handles.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn not_found() -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, "no such file")
    }
}

impl FileSystem for MemoryFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.lock()
            .files
            .get(path)
            .map(|f| f.content.clone())
            .ok_or_else(Self::not_found)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        self.lock()
            .files
            .get(path)
            .map(|f| f.modified)
            .ok_or_else(Self::not_found)
    }
}
