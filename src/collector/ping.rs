//! Prober backed by the system `ping` binary.

use std::io::Read;
use std::net::ToSocketAddrs;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

use super::parser::parse_ping_output;
use super::{ProbeError, Prober, probe_budget};
use crate::model::StatusRecord;

const WAIT_POLL: Duration = Duration::from_millis(10);

/// Platform flavour of the `ping` command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Linux,
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// Builds the program and arguments for one `ping` run.
///
/// Linux `-W` takes whole seconds, so the timeout is rounded up to at least 1.
pub fn ping_command_args(
    platform: Platform,
    host: &str,
    timeout: Duration,
    count: u32,
) -> (&'static str, Vec<String>) {
    let count = count.max(1).to_string();
    let millis = timeout.as_millis().max(1).to_string();
    match platform {
        Platform::MacOs => (
            "/sbin/ping",
            vec!["-c".into(), count, "-W".into(), millis, host.to_string()],
        ),
        Platform::Windows => (
            "ping",
            vec!["-n".into(), count, "-w".into(), millis, host.to_string()],
        ),
        Platform::Linux => {
            let secs = timeout.as_secs_f64().ceil().max(1.0) as u64;
            (
                "ping",
                vec![
                    "-c".into(),
                    count,
                    "-W".into(),
                    secs.to_string(),
                    host.to_string(),
                ],
            )
        }
    }
}

/// Runs the platform `ping` and converts its output into a status record.
#[derive(Debug, Clone, Copy)]
pub struct PingProber {
    platform: Platform,
}

impl Default for PingProber {
    fn default() -> Self {
        Self::new()
    }
}

impl PingProber {
    pub fn new() -> Self {
        Self {
            platform: Platform::current(),
        }
    }

    fn try_probe(&self, host: &str, timeout: Duration, count: u32) -> Result<StatusRecord, ProbeError> {
        resolve(host)?;

        let (program, args) = ping_command_args(self.platform, host, timeout, count);
        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(ProbeError::Launch)?;

        // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let budget = probe_budget(timeout, count);
        let status = wait_with_deadline(&mut child, budget)?;

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        let status = status.ok_or(ProbeError::TimedOut(budget))?;
        trace!(host, success = status.success(), "ping finished");
        Ok(classify(host, status.success(), &stdout, &stderr))
    }
}

/// Maps a finished `ping` run to a status record.
///
/// A clean exit is Up unless every packet was lost. A failed exit is Down,
/// carrying stderr as the message when there is any.
fn classify(host: &str, success: bool, stdout: &str, stderr: &str) -> StatusRecord {
    let parsed = parse_ping_output(stdout);
    if success {
        return StatusRecord::up(host, parsed.latency_ms, parsed.packet_loss);
    }
    let stderr = stderr.trim();
    let message = if stderr.is_empty() {
        "Host is unreachable"
    } else {
        stderr
    };
    StatusRecord::down(host, message, parsed.packet_loss)
}

impl Prober for PingProber {
    fn probe(&self, host: &str, timeout: Duration, count: u32) -> StatusRecord {
        self.try_probe(host, timeout, count)
            .unwrap_or_else(|e| e.into_record(host))
    }
}

fn resolve(host: &str) -> Result<(), ProbeError> {
    match (host, 0u16).to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(_) => Ok(()),
            None => Err(ProbeError::Resolve),
        },
        Err(_) => Err(ProbeError::Resolve),
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

/// Waits for the child up to `budget`; kills it and returns `None` on overrun.
fn wait_with_deadline(child: &mut Child, budget: Duration) -> Result<Option<ExitStatus>, ProbeError> {
    let deadline = Instant::now() + budget;
    loop {
        if let Some(status) = child.try_wait().map_err(ProbeError::Wait)? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(WAIT_POLL);
    }
}
