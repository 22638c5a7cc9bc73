//! Host set sources.
//!
//! A `HostSetSource` owns the authoritative host list. It is either built
//! from an explicit list (never changes) or backed by a file that is polled
//! for changes every probe cycle.

pub mod mock;
mod parser;
mod traits;

pub use parser::parse_host_list;
pub use traits::{FileSystem, RealFs};

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::model::{HostRecord, HostSet};

/// Fatal configuration problems detected at startup.
#[derive(Debug)]
pub enum ConfigError {
    /// The host file could not be read.
    Unreadable { path: PathBuf, source: std::io::Error },
    /// The host file contained no hosts.
    EmptyFile(PathBuf),
    /// No hosts were supplied at all.
    NoHosts,
    /// `--names` was given with a different length than `--hosts`.
    NameCountMismatch { hosts: usize, names: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Unreadable { path, source } => {
                write!(f, "cannot read hosts file {}: {}", path.display(), source)
            }
            ConfigError::EmptyFile(path) => {
                write!(f, "no valid hosts found in {}", path.display())
            }
            ConfigError::NoHosts => write!(f, "no hosts to monitor"),
            ConfigError::NameCountMismatch { hosts, names } => write!(
                f,
                "the number of names ({}) must match the number of hosts ({})",
                names, hosts
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Transient reload failures. Never fatal: the active host set stays.
#[derive(Debug)]
pub enum ReloadError {
    /// The file is momentarily missing or unreadable.
    Unavailable(std::io::Error),
    /// The file parsed to zero hosts.
    Empty,
}

impl std::fmt::Display for ReloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReloadError::Unavailable(e) => write!(f, "hosts file unavailable: {}", e),
            ReloadError::Empty => write!(f, "hosts file has no hosts, keeping current list"),
        }
    }
}

impl std::error::Error for ReloadError {}

enum Backing {
    Inline,
    File {
        path: PathBuf,
        fs: Box<dyn FileSystem>,
        last_modified: Option<SystemTime>,
    },
}

/// Authoritative host list with optional file-backed hot reload.
pub struct HostSetSource {
    backing: Backing,
    active: HostSet,
}

impl HostSetSource {
    /// Source for hosts given directly (e.g. on the command line).
    ///
    /// `names`, when non-empty, must pair one-to-one with `hosts`.
    pub fn from_list(hosts: &[String], names: &[String]) -> Result<Self, ConfigError> {
        if !names.is_empty() && names.len() != hosts.len() {
            return Err(ConfigError::NameCountMismatch {
                hosts: hosts.len(),
                names: names.len(),
            });
        }

        let active: HostSet = hosts
            .iter()
            .enumerate()
            .map(|(i, host)| match names.get(i) {
                Some(name) => HostRecord::named(host.trim(), name.as_str()),
                None => HostRecord::new(host.trim()),
            })
            .filter(|r| !r.host.is_empty())
            .collect();

        if active.is_empty() {
            return Err(ConfigError::NoHosts);
        }

        Ok(Self {
            backing: Backing::Inline,
            active,
        })
    }

    /// Source backed by a host file on the real filesystem.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::from_file_with_fs(path, RealFs::new())
    }

    /// Source backed by a host file read through `fs`.
    ///
    /// Nothing is read until [`load`](Self::load) is called.
    pub fn from_file_with_fs(path: impl Into<PathBuf>, fs: impl FileSystem + 'static) -> Self {
        Self {
            backing: Backing::File {
                path: path.into(),
                fs: Box::new(fs),
                last_modified: None,
            },
            active: HostSet::new(),
        }
    }

    /// Loads the initial host set.
    pub fn load(&mut self) -> Result<HostSet, ConfigError> {
        match &mut self.backing {
            Backing::Inline => {
                if self.active.is_empty() {
                    return Err(ConfigError::NoHosts);
                }
            }
            Backing::File {
                path,
                fs,
                last_modified,
            } => {
                let modified = fs.modified(path).ok();
                let content = fs.read_to_string(path).map_err(|e| ConfigError::Unreadable {
                    path: path.clone(),
                    source: e,
                })?;
                let set = parse_host_list(&content);
                if set.is_empty() {
                    return Err(ConfigError::EmptyFile(path.clone()));
                }
                *last_modified = modified;
                self.active = set;
            }
        }
        Ok(self.active.clone())
    }

    /// Returns a new host set if the backing file changed since the last look.
    ///
    /// Transient failures are logged and reported as "no change".
    pub fn poll_for_change(&mut self) -> Option<HostSet> {
        match self.try_poll() {
            Ok(next) => next,
            Err(ReloadError::Unavailable(e)) => {
                debug!("Host file reload skipped: {}", e);
                None
            }
            Err(e) => {
                warn!("Host file reload skipped: {}", e);
                None
            }
        }
    }

    fn try_poll(&mut self) -> Result<Option<HostSet>, ReloadError> {
        let Backing::File {
            path,
            fs,
            last_modified,
        } = &mut self.backing
        else {
            return Ok(None);
        };

        let modified = fs.modified(path).map_err(ReloadError::Unavailable)?;
        if last_modified.is_some_and(|seen| modified <= seen) {
            return Ok(None);
        }

        let content = fs.read_to_string(path).map_err(ReloadError::Unavailable)?;
        *last_modified = Some(modified);

        let set = parse_host_list(&content);
        if set.is_empty() {
            return Err(ReloadError::Empty);
        }
        if set == self.active {
            debug!("Host file touched but unchanged");
            return Ok(None);
        }

        self.active = set.clone();
        Ok(Some(set))
    }

    /// The host set currently in effect.
    pub fn active(&self) -> &HostSet {
        &self.active
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::Inline => None,
            Backing::File { path, .. } => Some(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::MemoryFs;
    use std::io::Write;

    const PATH: &str = "/etc/pingwatch/hosts";

    fn file_source(fs: &MemoryFs) -> HostSetSource {
        HostSetSource::from_file_with_fs(PATH, fs.clone())
    }

    /// Rewrites the file right after the first read has returned.
    struct EditDuringRead {
        fs: MemoryFs,
        edit: std::sync::Mutex<Option<&'static str>>,
    }

    impl FileSystem for EditDuringRead {
        fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
            let content = self.fs.read_to_string(path)?;
            if let Some(next) = self.edit.lock().unwrap().take() {
                self.fs.write(path, next);
            }
            Ok(content)
        }

        fn modified(&self, path: &Path) -> std::io::Result<SystemTime> {
            self.fs.modified(path)
        }
    }

    #[test]
    fn inline_list_pairs_names() {
        let hosts = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];
        let names = vec!["gw".to_string(), "nas".to_string()];
        let mut source = HostSetSource::from_list(&hosts, &names).unwrap();

        let set = source.load().unwrap();
        assert_eq!(set.get("10.0.0.2").unwrap().display_name(), "nas");
        assert!(source.poll_for_change().is_none());
        assert!(source.path().is_none());
    }

    #[test]
    fn inline_list_deduplicates() {
        let hosts = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let source = HostSetSource::from_list(&hosts, &[]).unwrap();
        assert_eq!(source.active().hosts().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn inline_name_count_mismatch() {
        let hosts = vec!["a".to_string(), "b".to_string()];
        let names = vec!["only one".to_string()];
        assert!(matches!(
            HostSetSource::from_list(&hosts, &names),
            Err(ConfigError::NameCountMismatch { hosts: 2, names: 1 })
        ));
    }

    #[test]
    fn inline_empty_list_is_fatal() {
        assert!(matches!(
            HostSetSource::from_list(&[], &[]),
            Err(ConfigError::NoHosts)
        ));
    }

    #[test]
    fn load_missing_file_is_fatal() {
        let fs = MemoryFs::new();
        let err = file_source(&fs).load().unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
        assert!(err.to_string().contains(PATH));
    }

    #[test]
    fn load_empty_file_is_fatal() {
        let fs = MemoryFs::new();
        fs.write(PATH, "# only comments\n");
        assert!(matches!(
            file_source(&fs).load(),
            Err(ConfigError::EmptyFile(_))
        ));
    }

    #[test]
    fn unchanged_mtime_reports_nothing() {
        let fs = MemoryFs::new();
        fs.write(PATH, "10.0.0.1\n");
        let mut source = file_source(&fs);
        source.load().unwrap();

        assert!(source.poll_for_change().is_none());
    }

    #[test]
    fn touched_but_identical_reports_nothing() {
        let fs = MemoryFs::new();
        fs.write(PATH, "10.0.0.1\n");
        let mut source = file_source(&fs);
        source.load().unwrap();

        fs.touch(PATH);
        assert!(source.poll_for_change().is_none());
    }

    #[test]
    fn edit_racing_initial_load_is_picked_up() {
        let fs = MemoryFs::new();
        fs.write(PATH, "A\n");
        let racing = EditDuringRead {
            fs: fs.clone(),
            edit: std::sync::Mutex::new(Some("A\nB\n")),
        };
        let mut source = HostSetSource::from_file_with_fs(PATH, racing);

        let initial = source.load().unwrap();
        assert_eq!(initial.hosts().collect::<Vec<_>>(), vec!["A"]);

        let next = source.poll_for_change().unwrap();
        assert_eq!(next.hosts().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn changed_content_is_returned_once() {
        let fs = MemoryFs::new();
        fs.write(PATH, "A\nB\n");
        let mut source = file_source(&fs);
        source.load().unwrap();

        fs.write(PATH, "B\nC\n");
        let next = source.poll_for_change().unwrap();
        assert_eq!(next.hosts().collect::<Vec<_>>(), vec!["B", "C"]);
        assert_eq!(source.active(), &next);
        assert!(source.poll_for_change().is_none());
    }

    #[test]
    fn renamed_host_counts_as_change() {
        let fs = MemoryFs::new();
        fs.write(PATH, "old:10.0.0.1\n");
        let mut source = file_source(&fs);
        source.load().unwrap();

        fs.write(PATH, "new:10.0.0.1\n");
        let next = source.poll_for_change().unwrap();
        assert_eq!(next.get("10.0.0.1").unwrap().display_name(), "new");
    }

    #[test]
    fn missing_file_during_reload_is_tolerated() {
        let fs = MemoryFs::new();
        fs.write(PATH, "10.0.0.1\n");
        let mut source = file_source(&fs);
        source.load().unwrap();

        fs.remove(PATH);
        assert!(source.poll_for_change().is_none());
        assert_eq!(source.active().len(), 1);

        fs.write(PATH, "10.0.0.2\n");
        let next = source.poll_for_change().unwrap();
        assert_eq!(next.hosts().collect::<Vec<_>>(), vec!["10.0.0.2"]);
    }

    #[test]
    fn emptied_file_keeps_active_set() {
        let fs = MemoryFs::new();
        fs.write(PATH, "10.0.0.1\n");
        let mut source = file_source(&fs);
        source.load().unwrap();

        fs.write(PATH, "\n# all gone\n");
        assert!(source.poll_for_change().is_none());
        assert_eq!(source.active().hosts().collect::<Vec<_>>(), vec!["10.0.0.1"]);
    }

    #[test]
    fn real_file_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha:10.0.0.1").unwrap();
        writeln!(file, "10.0.0.2").unwrap();
        writeln!(file, "# comment").unwrap();
        writeln!(file).unwrap();

        let mut source = HostSetSource::from_file(file.path());
        let set = source.load().unwrap();
        assert_eq!(
            set.records(),
            &[
                HostRecord::named("10.0.0.1", "alpha"),
                HostRecord::new("10.0.0.2"),
            ]
        );
        assert_eq!(source.path(), Some(file.path()));
    }
}
