//! Display order for hosts.
//!
//! Dotted-quad addresses come first in numeric order; everything else
//! follows in its original relative order.

/// Numeric key for a dotted-quad IPv4 string, `None` for anything else.
///
/// Only four dot-separated runs of ASCII digits, each at most 255, qualify.
pub fn ipv4_sort_key(host: &str) -> Option<u32> {
    let mut parts = host.split('.');
    let mut key: u32 = 0;
    for _ in 0..4 {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let octet: u32 = part.parse().ok()?;
        if octet > 255 {
            return None;
        }
        key = (key << 8) | octet;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(key)
}

/// Stable sort of `items` into display order.
pub fn sort_for_display<T>(items: &mut [T], host_of: impl Fn(&T) -> &str) {
    items.sort_by_key(|item| match ipv4_sort_key(host_of(item)) {
        Some(key) => (false, key),
        None => (true, 0),
    });
}
