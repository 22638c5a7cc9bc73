//! Reachability probing.
//!
//! The `Prober` trait is the seam between the polling engine and the
//! platform check. `PingProber` shells out to the system `ping`; `MockProber`
//! returns scripted results for tests.

pub mod mock;
mod parser;
mod ping;

pub use parser::{PingOutput, parse_ping_output};
pub use ping::{PingProber, Platform, ping_command_args};

use std::time::Duration;

use crate::model::StatusRecord;

/// Slack added on top of the expected ping run time before a probe is
/// considered hung.
pub const PROBE_GRACE: Duration = Duration::from_millis(500);

/// Performs one reachability check of a host.
///
/// Implementations never fail: every problem is folded into the returned
/// record as a `Down` or `Error` state.
pub trait Prober: Send + Sync {
    fn probe(&self, host: &str, timeout: Duration, count: u32) -> StatusRecord;
}

/// Upper bound on how long a probe of `count` packets may take.
///
/// `ping` sends one packet per second and waits up to `timeout` for the
/// last reply.
pub fn probe_budget(timeout: Duration, count: u32) -> Duration {
    let spacing = Duration::from_secs(u64::from(count.saturating_sub(1)));
    timeout + spacing + PROBE_GRACE
}

/// Per-host probe failures, recorded instead of propagated.
#[derive(Debug)]
pub enum ProbeError {
    /// Host name did not resolve.
    Resolve,
    /// The check binary could not be started.
    Launch(std::io::Error),
    /// Waiting for the check failed.
    Wait(std::io::Error),
    /// The check outlived its budget and was killed.
    TimedOut(Duration),
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Resolve => write!(f, "Cannot resolve hostname"),
            ProbeError::Launch(e) => write!(f, "Failed to run ping: {}", e),
            ProbeError::Wait(e) => write!(f, "Failed to wait for ping: {}", e),
            ProbeError::TimedOut(_) => write!(f, "Probe timed out"),
        }
    }
}

impl std::error::Error for ProbeError {}

impl ProbeError {
    /// Converts the failure into the record shown for the host.
    pub fn into_record(self, host: &str) -> StatusRecord {
        match self {
            ProbeError::Resolve => StatusRecord::unresolved(host),
            ProbeError::TimedOut(_) => StatusRecord::down(host, self.to_string(), None),
            ProbeError::Launch(_) | ProbeError::Wait(_) => {
                StatusRecord::error(host, self.to_string())
            }
        }
    }
}
