//! Parsing of the platform `ping` output.
//!
//! Only two figures are extracted: the round-trip time of the last reply
//! and the packet-loss percentage from the statistics footer.

use std::sync::LazyLock;

use regex::Regex;

static LATENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time[=<]([0-9]+(?:\.[0-9]+)?)").expect("failed to compile latency regex"));

/// `3 packets transmitted, 3 received, 0% packet loss` (Linux, macOS, BSD).
static UNIX_LOSS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:\.\d+)?)% packet loss").expect("failed to compile loss regex"));

/// `Lost = 0 (0% loss)` (Windows).
static WINDOWS_LOSS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+(?:\.\d+)?)% loss\)").expect("failed to compile loss regex"));

/// Figures extracted from one `ping` run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PingOutput {
    /// Round-trip time of the last reply, in milliseconds.
    pub latency_ms: Option<f64>,
    /// Packet loss percentage from the summary, if printed.
    pub packet_loss: Option<f64>,
}

/// Extracts latency and packet loss from `ping` stdout.
pub fn parse_ping_output(stdout: &str) -> PingOutput {
    let latency_ms = LATENCY_RE
        .captures_iter(stdout)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .last();

    let packet_loss = UNIX_LOSS_RE
        .captures(stdout)
        .or_else(|| WINDOWS_LOSS_RE.captures(stdout))
        .and_then(|c| c[1].parse::<f64>().ok());

    PingOutput {
        latency_ms,
        packet_loss,
    }
}

/// Captured `ping` output shared by the collector tests.
#[cfg(test)]
pub(crate) mod samples {
    pub(crate) const LINUX_OK: &str = "\
PING 10.0.0.1 (10.0.0.1) 56(84) bytes of data.
64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=0.412 ms
64 bytes from 10.0.0.1: icmp_seq=2 ttl=64 time=12.3 ms

--- 10.0.0.1 ping statistics ---
2 packets transmitted, 2 received, 0% packet loss, time 1001ms
rtt min/avg/max/mdev = 0.412/6.356/12.300/5.944 ms
";

    pub(crate) const LINUX_PARTIAL: &str = "\
64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=4.02 ms

--- 10.0.0.1 ping statistics ---
4 packets transmitted, 3 received, 25% packet loss, time 3004ms
";

    pub(crate) const LINUX_DEAD: &str = "\
PING 10.9.9.9 (10.9.9.9) 56(84) bytes of data.

--- 10.9.9.9 ping statistics ---
1 packets transmitted, 0 received, 100% packet loss, time 0ms
";

    pub(crate) const MACOS_OK: &str = "\
PING 1.1.1.1 (1.1.1.1): 56 data bytes
64 bytes from 1.1.1.1: icmp_seq=0 ttl=57 time=9.871 ms

--- 1.1.1.1 ping statistics ---
1 packets transmitted, 1 packets received, 0.0% packet loss
round-trip min/avg/max/stddev = 9.871/9.871/9.871/0.000 ms
";

    pub(crate) const WINDOWS_OK: &str = "\
Pinging 8.8.8.8 with 32 bytes of data:
Reply from 8.8.8.8: bytes=32 time=15ms TTL=117
Reply from 8.8.8.8: bytes=32 time<1ms TTL=117

Ping statistics for 8.8.8.8:
    Packets: Sent = 2, Received = 2, Lost = 0 (0% loss),
";
}

#[cfg(test)]
mod tests {
    use super::samples::*;
    use super::*;

    #[test]
    fn linux_uses_last_reply_time() {
        let out = parse_ping_output(LINUX_OK);
        assert_eq!(out.latency_ms, Some(12.3));
        assert_eq!(out.packet_loss, Some(0.0));
    }

    #[test]
    fn linux_partial_loss() {
        let out = parse_ping_output(LINUX_PARTIAL);
        assert_eq!(out.latency_ms, Some(4.02));
        assert_eq!(out.packet_loss, Some(25.0));
    }

    #[test]
    fn linux_total_loss_has_no_latency() {
        let out = parse_ping_output(LINUX_DEAD);
        assert_eq!(out.latency_ms, None);
        assert_eq!(out.packet_loss, Some(100.0));
    }

    #[test]
    fn macos_decimal_loss() {
        let out = parse_ping_output(MACOS_OK);
        assert_eq!(out.latency_ms, Some(9.871));
        assert_eq!(out.packet_loss, Some(0.0));
    }

    #[test]
    fn windows_time_below_one_ms() {
        let out = parse_ping_output(WINDOWS_OK);
        assert_eq!(out.latency_ms, Some(1.0));
        assert_eq!(out.packet_loss, Some(0.0));
    }

    #[test]
    fn garbage_yields_nothing() {
        assert_eq!(parse_ping_output("ping: unknown host"), PingOutput::default());
    }
}
