//! Host file format.
//!
//! One entry per line. Blank lines and `#` comments are skipped. `name:host`
//! assigns a display name (split on the first colon), a bare line is a host
//! without an override.

use crate::model::{HostRecord, HostSet};

/// Parses host file content into a `HostSet`.
pub fn parse_host_list(content: &str) -> HostSet {
    content.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<HostRecord> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    match line.split_once(':') {
        Some((name, host)) => {
            let host = host.trim();
            if host.is_empty() {
                return None;
            }
            Some(HostRecord::named(host, name.trim()))
        }
        None => Some(HostRecord::new(line)),
    }
}
