//! Monitored hosts and their display names.

use std::collections::HashSet;

/// A monitored endpoint with an optional display-name override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    /// Address or resolvable name. Unique key, compared case-sensitively.
    pub host: String,
    /// Display-name override. `None` falls back to `host`; `Some("")` renders blank.
    pub name: Option<String>,
}

impl HostRecord {
    /// Creates a record without a display-name override.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: None,
        }
    }

    /// Creates a record with an explicit display name.
    pub fn named(host: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: Some(name.into()),
        }
    }

    /// Returns the label shown in the dashboard.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }
}

/// Ordered, de-duplicated collection of hosts.
///
/// The first occurrence of a host wins; later duplicates (even with a
/// different name) are dropped. Insertion order is preserved and defines
/// the probe order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSet {
    records: Vec<HostRecord>,
}

impl HostSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record unless its host is already present.
    ///
    /// Returns `true` when the record was added.
    pub fn insert(&mut self, record: HostRecord) -> bool {
        if self.contains(&record.host) {
            return false;
        }
        self.records.push(record);
        true
    }

    pub fn contains(&self, host: &str) -> bool {
        self.records.iter().any(|r| r.host == host)
    }

    pub fn get(&self, host: &str) -> Option<&HostRecord> {
        self.records.iter().find(|r| r.host == host)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HostRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    /// Host keys in insertion order.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.host.as_str())
    }

    /// Returns `(removed, added)` host keys going from `self` to `next`.
    pub fn diff(&self, next: &HostSet) -> (Vec<String>, Vec<String>) {
        let current: HashSet<&str> = self.hosts().collect();
        let upcoming: HashSet<&str> = next.hosts().collect();

        let removed = self
            .hosts()
            .filter(|h| !upcoming.contains(h))
            .map(str::to_string)
            .collect();
        let added = next
            .hosts()
            .filter(|h| !current.contains(h))
            .map(str::to_string)
            .collect();

        (removed, added)
    }
}

impl FromIterator<HostRecord> for HostSet {
    fn from_iter<I: IntoIterator<Item = HostRecord>>(iter: I) -> Self {
        let mut set = HostSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

impl<'a> IntoIterator for &'a HostSet {
    type Item = &'a HostRecord;
    type IntoIter = std::slice::Iter<'a, HostRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
