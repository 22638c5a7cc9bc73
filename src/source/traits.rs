//! Filesystem abstraction for the host list.
//!
//! The `FileSystem` trait lets `HostSetSource` read the real host file in
//! production and an in-memory file in tests.

use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Minimal filesystem operations needed to load and watch a host file.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Returns the modification time of a file.
    ///
    /// Used as the cheap change indicator polled every cycle.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        std::fs::metadata(path)?.modified()
    }
}
