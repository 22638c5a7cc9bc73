//! Monitor context shared between the polling thread and the render loop.

use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Local};

use super::stop::StopFlag;
use super::table::StatusTable;
use crate::model::{HostRecord, HostSet, HostState, StatusRecord, sort_for_display};

/// Everything the two tasks share: the status table, the host directory used
/// for display names, and the stop flag.
#[derive(Debug)]
pub struct MonitorContext {
    table: StatusTable,
    directory: RwLock<HostSet>,
    stop: StopFlag,
}

/// Hosts removed and added by a host-set swap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSetChange {
    pub removed: Vec<String>,
    pub added: Vec<String>,
}

impl MonitorContext {
    pub fn new(hosts: HostSet, stop: StopFlag) -> Self {
        Self {
            table: StatusTable::new(),
            directory: RwLock::new(hosts),
            stop,
        }
    }

    pub fn table(&self) -> &StatusTable {
        &self.table
    }

    pub fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }

    pub fn is_running(&self) -> bool {
        self.stop.is_running()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Copy of the host set currently displayed.
    pub fn hosts(&self) -> HostSet {
        self.directory
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the host set and evicts records of hosts that left it.
    ///
    /// Records of hosts present in both sets are left untouched; newly added
    /// hosts have no record until they are probed.
    pub fn apply_host_set(&self, next: HostSet) -> HostSetChange {
        let mut directory = self
            .directory
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let (removed, added) = directory.diff(&next);
        self.table.retain(|host| next.contains(host));
        *directory = next;
        HostSetChange { removed, added }
    }

    /// Builds the render input: every host in display order with its record.
    pub fn snapshot(&self) -> Snapshot {
        let hosts = self.hosts();
        let rows = hosts
            .iter()
            .map(|host| SnapshotRow {
                status: self.table.get(&host.host),
                host: host.clone(),
            })
            .collect();
        Snapshot::new(rows, Local::now())
    }
}

/// One dashboard row.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub host: HostRecord,
    /// `None` until the host has been probed once ("waiting").
    pub status: Option<StatusRecord>,
}

impl SnapshotRow {
    pub fn state(&self) -> Option<HostState> {
        self.status.as_ref().map(|s| s.state)
    }
}

/// Per-state tallies over probed hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub up: usize,
    pub down: usize,
    pub error: usize,
}

/// Point-in-time view of the dashboard handed to renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub rows: Vec<SnapshotRow>,
    pub taken_at: DateTime<Local>,
}

impl Snapshot {
    /// Creates a snapshot, sorting rows into display order.
    pub fn new(mut rows: Vec<SnapshotRow>, taken_at: DateTime<Local>) -> Self {
        sort_for_display(&mut rows, |row| row.host.host.as_str());
        Self { rows, taken_at }
    }

    /// Convenience constructor pairing a host set with known records.
    pub fn from_parts(hosts: &HostSet, records: &[StatusRecord], taken_at: DateTime<Local>) -> Self {
        let rows = hosts
            .iter()
            .map(|host| SnapshotRow {
                host: host.clone(),
                status: records.iter().find(|r| r.host == host.host).cloned(),
            })
            .collect();
        Self::new(rows, taken_at)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any host has been probed yet.
    pub fn has_results(&self) -> bool {
        self.rows.iter().any(|r| r.status.is_some())
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for state in self.rows.iter().filter_map(SnapshotRow::state) {
            match state {
                HostState::Up => counts.up += 1,
                HostState::Down => counts.down += 1,
                HostState::Error => counts.error += 1,
                HostState::Unknown => {}
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(hosts: &[&str]) -> HostSet {
        hosts.iter().map(|h| HostRecord::new(*h)).collect()
    }

    #[test]
    fn apply_host_set_evicts_removed_only() {
        let ctx = MonitorContext::new(set(&["A", "B"]), StopFlag::new());
        let b_record = StatusRecord::up("B", Some(2.0), Some(0.0));
        ctx.table().set("A", StatusRecord::up("A", Some(1.0), Some(0.0)));
        ctx.table().set("B", b_record.clone());

        let change = ctx.apply_host_set(set(&["B", "C"]));

        assert_eq!(change.removed, vec!["A".to_string()]);
        assert_eq!(change.added, vec!["C".to_string()]);
        assert!(ctx.table().get("A").is_none());
        assert_eq!(ctx.table().get("B"), Some(b_record));
        assert!(ctx.table().get("C").is_none());
        assert_eq!(ctx.hosts(), set(&["B", "C"]));
    }

    #[test]
    fn snapshot_marks_unprobed_hosts_waiting() {
        let ctx = MonitorContext::new(set(&["10.0.0.2", "10.0.0.1"]), StopFlag::new());
        ctx.table()
            .set("10.0.0.2", StatusRecord::up("10.0.0.2", Some(3.0), Some(0.0)));

        let snapshot = ctx.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rows[0].host.host, "10.0.0.1");
        assert!(snapshot.rows[0].status.is_none());
        assert_eq!(snapshot.rows[1].state(), Some(HostState::Up));
        assert!(snapshot.has_results());
    }

    #[test]
    fn counts_ignore_waiting_and_unknown() {
        let hosts = set(&["a", "b", "c", "d", "e"]);
        let mut unknown = StatusRecord::down("e", "", None);
        unknown.state = HostState::Unknown;
        let records = vec![
            StatusRecord::up("a", Some(1.0), Some(0.0)),
            StatusRecord::down("b", "", None),
            StatusRecord::unresolved("c"),
            unknown,
        ];
        let snapshot = Snapshot::from_parts(&hosts, &records, Local::now());

        assert_eq!(
            snapshot.counts(),
            StatusCounts {
                up: 1,
                down: 1,
                error: 1
            }
        );
    }

    #[test]
    fn stop_is_shared_with_flag() {
        let flag = StopFlag::new();
        let ctx = MonitorContext::new(HostSet::new(), flag.clone());
        assert!(ctx.is_running());
        ctx.stop();
        assert!(flag.is_stopped());
    }
}
