//! Shared status table.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::model::{StatusRecord, sort_for_display};

/// Latest status record per host.
///
/// Written by the polling engine only, read by any number of renderers.
/// Records are replaced whole, so a reader sees either the old or the new
/// record for a host, never a mix.
#[derive(Debug, Default)]
pub struct StatusTable {
    entries: RwLock<HashMap<String, StatusRecord>>,
}

impl StatusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, host: &str, record: StatusRecord) {
        self.write().insert(host.to_string(), record);
    }

    pub fn get(&self, host: &str) -> Option<StatusRecord> {
        self.read().get(host).cloned()
    }

    pub fn remove(&self, host: &str) -> Option<StatusRecord> {
        self.write().remove(host)
    }

    /// Drops every entry whose host fails `keep`. Returns how many were dropped.
    pub fn retain(&self, mut keep: impl FnMut(&str) -> bool) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|host, _| keep(host));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// All entries in display order.
    pub fn snapshot(&self) -> Vec<(String, StatusRecord)> {
        let mut rows: Vec<(String, StatusRecord)> = self
            .read()
            .iter()
            .map(|(host, record)| (host.clone(), record.clone()))
            .collect();
        // HashMap order is arbitrary; settle ties between names alphabetically first.
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        sort_for_display(&mut rows, |row| row.0.as_str());
        rows
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, StatusRecord>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, StatusRecord>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
