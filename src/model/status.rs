//! Reachability results.

use chrono::{DateTime, Local};

/// Loss reported when no probe reply was seen (or no figure was parsed).
pub const FULL_LOSS: f64 = 100.0;

/// Reachability state of a host after a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostState {
    #[default]
    Unknown,
    Up,
    Down,
    Error,
}

impl HostState {
    /// Upper-case label used by every renderer.
    pub fn label(self) -> &'static str {
        match self {
            HostState::Unknown => "UNKNOWN",
            HostState::Up => "UP",
            HostState::Down => "DOWN",
            HostState::Error => "ERROR",
        }
    }
}

/// Latest probe result for one host.
///
/// Build records through the constructors; they keep the loss/state
/// invariants (100% loss is never `Up`, latency only exists for `Up`).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    pub host: String,
    pub state: HostState,
    pub latency_ms: Option<f64>,
    pub packet_loss: f64,
    pub message: String,
    pub observed_at: DateTime<Local>,
}

impl StatusRecord {
    /// Record for a check that exited successfully.
    ///
    /// A reported loss of 100% demotes the result to `Down`.
    pub fn up(host: impl Into<String>, latency_ms: Option<f64>, packet_loss: Option<f64>) -> Self {
        let loss = packet_loss.map(clamp_loss).unwrap_or(0.0);
        if loss >= FULL_LOSS {
            return Self::down(host, "", Some(FULL_LOSS));
        }
        Self {
            host: host.into(),
            state: HostState::Up,
            latency_ms: latency_ms.filter(|v| v.is_finite() && *v >= 0.0),
            packet_loss: loss,
            message: String::new(),
            observed_at: Local::now(),
        }
    }

    /// Record for an unreachable host.
    pub fn down(host: impl Into<String>, message: impl Into<String>, packet_loss: Option<f64>) -> Self {
        Self {
            host: host.into(),
            state: HostState::Down,
            latency_ms: None,
            packet_loss: packet_loss.map(clamp_loss).unwrap_or(FULL_LOSS),
            message: message.into(),
            observed_at: Local::now(),
        }
    }

    /// Record for a probe that could not be carried out.
    pub fn error(host: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            state: HostState::Error,
            latency_ms: None,
            packet_loss: FULL_LOSS,
            message: message.into(),
            observed_at: Local::now(),
        }
    }

    /// Record for a host name that did not resolve.
    pub fn unresolved(host: impl Into<String>) -> Self {
        Self::error(host, "Cannot resolve hostname")
    }

    pub fn is_up(&self) -> bool {
        self.state == HostState::Up
    }
}

fn clamp_loss(loss: f64) -> f64 {
    if loss.is_nan() {
        FULL_LOSS
    } else {
        loss.clamp(0.0, FULL_LOSS)
    }
}
