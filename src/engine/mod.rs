//! Background polling engine.
//!
//! One engine per process. Each cycle it checks the host source for a new
//! host set, then probes every host sequentially and stores the results in
//! the shared `StatusTable`. The render loop never talks to the engine
//! directly; the table is the only channel between them.

mod context;
mod stop;
mod table;

pub use context::{HostSetChange, MonitorContext, Snapshot, SnapshotRow, StatusCounts};
pub use stop::{STOP_CHECK_INTERVAL, StopFlag};
pub use table::StatusTable;

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::collector::{ProbeError, Prober, probe_budget};
use crate::model::{HostSet, StatusRecord};
use crate::source::HostSetSource;

/// Pause between cycles, independent of the refresh interval.
pub const CYCLE_PAUSE: Duration = Duration::from_millis(100);

/// Extra wait beyond the probe budget before the engine gives up on a prober.
const GUARD_SLACK: Duration = Duration::from_millis(250);

/// Drives continuous probe cycles against the shared context.
pub struct PollingEngine {
    ctx: Arc<MonitorContext>,
    source: HostSetSource,
    prober: Arc<dyn Prober>,
    active: HostSet,
    timeout: Duration,
    count: u32,
    cycles: u64,
}

impl PollingEngine {
    /// Creates an engine probing the source's active host set.
    ///
    /// The source should already be loaded.
    pub fn new(
        ctx: Arc<MonitorContext>,
        source: HostSetSource,
        prober: Arc<dyn Prober>,
        timeout: Duration,
        count: u32,
    ) -> Self {
        let active = source.active().clone();
        Self {
            ctx,
            source,
            prober,
            active,
            timeout,
            count: count.max(1),
            cycles: 0,
        }
    }

    /// Number of cycles that ran to completion.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Host set the engine is currently probing.
    pub fn active(&self) -> &HostSet {
        &self.active
    }

    /// Swaps in a new host set if the source reports one.
    pub fn reload(&mut self) -> Option<HostSetChange> {
        let next = self.source.poll_for_change()?;
        self.active = next.clone();
        let change = self.ctx.apply_host_set(next);
        info!(
            "Host list updated: {} hosts (-{} removed, +{} added)",
            self.active.len(),
            change.removed.len(),
            change.added.len()
        );
        if !change.removed.is_empty() {
            debug!("Removed hosts: {}", change.removed.join(", "));
        }
        if !change.added.is_empty() {
            debug!("Added hosts: {}", change.added.join(", "));
        }
        Some(change)
    }

    /// Runs one cycle: reload, then probe every host in order.
    ///
    /// Returns `false` if a stop request cut the cycle short.
    pub fn run_cycle(&mut self) -> bool {
        if !self.ctx.is_running() {
            return false;
        }
        self.reload();

        let started = Instant::now();
        for record in self.active.iter() {
            if !self.ctx.is_running() {
                debug!("Stop requested, abandoning cycle {}", self.cycles + 1);
                return false;
            }
            let host = record.host.as_str();
            let status = probe_with_deadline(&self.prober, host, self.timeout, self.count);
            trace!(host, state = ?status.state, latency = ?status.latency_ms, "probed");
            self.ctx.table().set(host, status);
        }

        self.cycles += 1;
        debug!(
            "Cycle {} finished: {} hosts in {:.2?}",
            self.cycles,
            self.active.len(),
            started.elapsed()
        );
        true
    }

    /// Loops until the stop flag is set.
    pub fn run(mut self) {
        info!(
            "Polling {} hosts (timeout {:.1?}, {} probe(s) per cycle)",
            self.active.len(),
            self.timeout,
            self.count
        );
        while self.ctx.is_running() {
            self.run_cycle();
            if !self.ctx.stop_flag().sleep(CYCLE_PAUSE) {
                break;
            }
        }
        info!("Polling stopped after {} cycles", self.cycles);
    }

    /// Starts the engine on a dedicated thread.
    pub fn spawn(self) -> io::Result<PollerHandle> {
        let handle = thread::Builder::new()
            .name("pingwatch-poller".to_string())
            .spawn(move || self.run())?;
        Ok(PollerHandle { handle })
    }
}

/// Handle to the polling thread.
pub struct PollerHandle {
    handle: JoinHandle<()>,
}

impl PollerHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits up to `limit` for the thread to exit.
    ///
    /// Returns `false` and detaches the thread if it is still running.
    pub fn join_timeout(self, limit: Duration) -> bool {
        let deadline = Instant::now() + limit;
        while !self.handle.is_finished() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
        if self.handle.join().is_err() {
            warn!("Polling thread panicked");
        }
        true
    }
}

/// Runs one probe on a helper thread so a misbehaving prober cannot stall
/// the cycle past its budget.
fn probe_with_deadline(
    prober: &Arc<dyn Prober>,
    host: &str,
    timeout: Duration,
    count: u32,
) -> StatusRecord {
    let (tx, rx) = mpsc::channel();
    let worker = {
        let prober = Arc::clone(prober);
        let host = host.to_string();
        thread::Builder::new()
            .name("pingwatch-probe".to_string())
            .spawn(move || {
                let _ = tx.send(prober.probe(&host, timeout, count));
            })
    };
    if let Err(e) = worker {
        return ProbeError::Launch(e).into_record(host);
    }

    let budget = probe_budget(timeout, count);
    match rx.recv_timeout(budget + GUARD_SLACK) {
        Ok(record) => record,
        Err(RecvTimeoutError::Timeout) => {
            warn!("Probe of {} exceeded {:.1?}, marking down", host, budget);
            ProbeError::TimedOut(budget).into_record(host)
        }
        Err(RecvTimeoutError::Disconnected) => StatusRecord::error(host, "Probe failed"),
    }
}
