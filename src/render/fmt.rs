//! Text formatting shared by the renderers.

use crossterm::style::Stylize;

use crate::engine::{Snapshot, SnapshotRow, StatusCounts};
use crate::model::{HostRecord, HostState};

/// Column widths of the tabular layouts.
pub const NAME_WIDTH: usize = 15;
pub const HOST_WIDTH: usize = 18;
pub const STATUS_WIDTH: usize = 8;
pub const LATENCY_WIDTH: usize = 10;
pub const LOSS_WIDTH: usize = 12;

/// Width of the horizontal rules in the line modes.
pub const RULE_WIDTH: usize = 80;

/// Longest display name shown untruncated in tabular modes.
pub const MAX_NAME_CHARS: usize = 14;

pub const WAITING: &str = "WAITING";
pub const NOT_AVAILABLE: &str = "N/A";

/// Title shown by the live and full-screen modes.
pub const TITLE: &str = "pingwatch - Live Network Monitor";

/// Formats a latency for display.
///
/// Missing or zero latency shows as `N/A`; sub-millisecond values as `<1 ms`.
pub fn format_latency(latency_ms: Option<f64>) -> String {
    match latency_ms {
        Some(ms) if ms > 0.0 => {
            if ms < 1.0 {
                "<1 ms".to_string()
            } else {
                format!("{:.1} ms", ms)
            }
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_loss(packet_loss: f64) -> String {
    format!("{:.1}%", packet_loss)
}

/// Shortens names longer than 14 characters to 11 characters plus `...`.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > MAX_NAME_CHARS {
        let head: String = name.chars().take(MAX_NAME_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

/// First `max` characters of `name`.
pub fn clip(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

/// Compact status mark for the one-line modes.
pub fn glyph(state: HostState) -> char {
    match state {
        HostState::Up => '✓',
        HostState::Down => '✗',
        HostState::Error | HostState::Unknown => '?',
    }
}

/// `[HH:MM:SS] ` prefix when timestamps are enabled, empty otherwise.
pub fn timestamp_prefix(snapshot: &Snapshot, show: bool) -> String {
    if show {
        format!("[{}] ", snapshot.taken_at.format("%H:%M:%S"))
    } else {
        String::new()
    }
}

/// Wraps `text` in the ANSI colour of `state` when colouring is enabled.
pub fn paint(text: &str, state: Option<HostState>, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match state {
        Some(HostState::Up) => text.green().to_string(),
        Some(HostState::Down) => text.red().to_string(),
        Some(HostState::Error) => text.yellow().to_string(),
        Some(HostState::Unknown) | None => text.to_string(),
    }
}

/// `UP:n DOWN:n ERROR:n`, coloured per state.
pub fn count_line(counts: StatusCounts, color: bool) -> String {
    format!(
        "{} {} {}",
        paint(&format!("UP:{}", counts.up), Some(HostState::Up), color),
        paint(&format!("DOWN:{}", counts.down), Some(HostState::Down), color),
        paint(&format!("ERROR:{}", counts.error), Some(HostState::Error), color),
    )
}

/// Column texts of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowText {
    pub name: String,
    pub host: String,
    pub status: String,
    pub latency: String,
    pub loss: String,
}

impl RowText {
    pub fn from_row(row: &SnapshotRow) -> Self {
        let Some(record) = &row.status else {
            return Self::waiting(&row.host);
        };
        Self {
            name: truncate_name(row.host.display_name()),
            host: row.host.host.clone(),
            status: record.state.label().to_string(),
            latency: format_latency(record.latency_ms),
            loss: format_loss(record.packet_loss),
        }
    }

    /// Placeholder row for a host without a result.
    pub fn waiting(host: &HostRecord) -> Self {
        Self {
            name: truncate_name(host.display_name()),
            host: host.host.clone(),
            status: WAITING.to_string(),
            latency: NOT_AVAILABLE.to_string(),
            loss: NOT_AVAILABLE.to_string(),
        }
    }

    /// Fixed-width line with the status column optionally coloured.
    pub fn to_line(&self, state: Option<HostState>, color: bool) -> String {
        let status = format!("{:<width$}", self.status, width = STATUS_WIDTH);
        format!(
            "{:<nw$} {:<hw$} {} {:<lw$} {:<sw$}",
            self.name,
            self.host,
            paint(&status, state, color),
            self.latency,
            self.loss,
            nw = NAME_WIDTH,
            hw = HOST_WIDTH,
            lw = LATENCY_WIDTH,
            sw = LOSS_WIDTH,
        )
    }
}

/// Column header matching [`RowText::to_line`].
pub fn header_line() -> String {
    format!(
        "{:<nw$} {:<hw$} {:<stw$} {:<lw$} {:<sw$}",
        "NAME",
        "HOST",
        "STATUS",
        "LATENCY",
        "PACKET LOSS",
        nw = NAME_WIDTH,
        hw = HOST_WIDTH,
        stw = STATUS_WIDTH,
        lw = LATENCY_WIDTH,
        sw = LOSS_WIDTH,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusRecord;
    use chrono::{Local, TimeZone};

    #[test]
    fn latency_formats() {
        assert_eq!(format_latency(None), "N/A");
        assert_eq!(format_latency(Some(0.0)), "N/A");
        assert_eq!(format_latency(Some(0.4)), "<1 ms");
        assert_eq!(format_latency(Some(12.34)), "12.3 ms");
        assert_eq!(format_latency(Some(1.0)), "1.0 ms");
    }

    #[test]
    fn loss_has_one_decimal() {
        assert_eq!(format_loss(0.0), "0.0%");
        assert_eq!(format_loss(33.333), "33.3%");
        assert_eq!(format_loss(100.0), "100.0%");
    }

    #[test]
    fn long_names_are_shortened() {
        assert_eq!(truncate_name("short"), "short");
        assert_eq!(truncate_name("exactly14chars"), "exactly14chars");
        assert_eq!(truncate_name("fifteen-chars-x"), "fifteen-cha...");
        assert_eq!(truncate_name("ünïcödé-nämes-here"), "ünïcödé-näm...");
    }

    #[test]
    fn timestamp_comes_from_snapshot() {
        let taken_at = Local.with_ymd_and_hms(2024, 5, 1, 9, 5, 7).unwrap();
        let snapshot = Snapshot::new(Vec::new(), taken_at);
        assert_eq!(timestamp_prefix(&snapshot, true), "[09:05:07] ");
        assert_eq!(timestamp_prefix(&snapshot, false), "");
    }

    #[test]
    fn colour_is_optional() {
        assert_eq!(paint("UP", Some(HostState::Up), false), "UP");
        let coloured = paint("UP", Some(HostState::Up), true);
        assert!(coloured.contains("UP"));
    }

    #[test]
    fn row_text_for_waiting_and_probed_hosts() {
        let waiting = SnapshotRow {
            host: HostRecord::named("10.0.0.1", "router"),
            status: None,
        };
        let text = RowText::from_row(&waiting);
        assert_eq!(text.name, "router");
        assert_eq!(text.status, "WAITING");
        assert_eq!(text.latency, "N/A");
        assert_eq!(text.loss, "N/A");

        let probed = SnapshotRow {
            host: HostRecord::new("h1"),
            status: Some(StatusRecord::up("h1", Some(12.3), Some(0.0))),
        };
        let line = RowText::from_row(&probed).to_line(Some(HostState::Up), false);
        assert!(line.starts_with("h1 "));
        assert!(line.contains("UP      "));
        assert!(line.contains("12.3 ms"));
        assert!(line.contains("0.0%"));
    }

    #[test]
    fn blank_name_stays_blank() {
        let row = SnapshotRow {
            host: HostRecord::named("10.0.0.9", ""),
            status: None,
        };
        let line = RowText::from_row(&row).to_line(None, false);
        assert!(line.starts_with(&" ".repeat(NAME_WIDTH + 1)));
        assert!(line.contains("10.0.0.9"));
    }
}
