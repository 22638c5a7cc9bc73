//! Scripted prober for tests and demos.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use super::Prober;
use crate::model::StatusRecord;

/// Canned answer for one host.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    Up { latency_ms: f64, packet_loss: f64 },
    Down,
    Unresolved,
    Fail(String),
    /// Blocks for the given time, then answers `Up` with 1 ms.
    Stall(Duration),
}

#[derive(Debug, Default)]
struct Inner {
    replies: HashMap<String, MockReply>,
    calls: Vec<String>,
}

/// Prober that answers from a reply table and records every call.
///
/// Hosts without a scripted reply are reported `Down`.
#[derive(Debug, Default)]
pub struct MockProber {
    inner: Mutex<Inner>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, host: &str, reply: MockReply) -> Self {
        self.set_reply(host, reply);
        self
    }

    pub fn set_reply(&self, host: &str, reply: MockReply) {
        self.lock().replies.insert(host.to_string(), reply);
    }

    /// Hosts probed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Prober for MockProber {
    fn probe(&self, host: &str, _timeout: Duration, _count: u32) -> StatusRecord {
        let reply = {
            let mut inner = self.lock();
            inner.calls.push(host.to_string());
            inner.replies.get(host).cloned()
        };

        match reply {
            Some(MockReply::Up {
                latency_ms,
                packet_loss,
            }) => StatusRecord::up(host, Some(latency_ms), Some(packet_loss)),
            Some(MockReply::Unresolved) => StatusRecord::unresolved(host),
            Some(MockReply::Fail(message)) => StatusRecord::error(host, message),
            Some(MockReply::Stall(delay)) => {
                thread::sleep(delay);
                StatusRecord::up(host, Some(1.0), Some(0.0))
            }
            Some(MockReply::Down) | None => StatusRecord::down(host, "Host is unreachable", None),
        }
    }
}
