//! Wires the polling engine to a renderer and drives the render cadence.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::collector::Prober;
use crate::engine::{MonitorContext, PollingEngine, StopFlag};
use crate::render::{DisplayMode, RenderOptions, Renderer, UserCommand};
use crate::source::HostSetSource;

/// Redraw cadence of the interactive mode.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How long shutdown waits for the polling thread.
pub const JOIN_TIMEOUT: Duration = Duration::from_secs(1);

/// Runtime settings of a monitoring session.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    /// Delay between frames in the non-interactive modes.
    pub interval: Duration,
    /// Per-probe timeout handed to the prober.
    pub timeout: Duration,
    /// Probes per host per cycle.
    pub count: u32,
    pub mode: DisplayMode,
    pub render: RenderOptions,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(1),
            count: 1,
            mode: DisplayMode::default(),
            render: RenderOptions::default(),
        }
    }
}

/// Outcome of [`Supervisor::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Render iterations performed.
    pub frames: u64,
    /// Whether the polling thread exited within [`JOIN_TIMEOUT`].
    pub poller_joined: bool,
}

/// Owns the stop flag and runs one monitoring session.
pub struct Supervisor {
    config: MonitorConfig,
    stop: StopFlag,
}

impl Supervisor {
    pub fn new(config: MonitorConfig, stop: StopFlag) -> Self {
        Self { config, stop }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Flag to hand to signal handlers.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Runs until the stop flag is set.
    ///
    /// `source` must already be loaded. On exit the renderer is shut down
    /// and the polling thread gets [`JOIN_TIMEOUT`] to finish before it is
    /// abandoned.
    pub fn run(
        &self,
        source: HostSetSource,
        prober: Arc<dyn Prober>,
        renderer: &mut dyn Renderer,
    ) -> io::Result<RunSummary> {
        let ctx = Arc::new(MonitorContext::new(
            source.active().clone(),
            self.stop.clone(),
        ));
        info!(
            "Monitoring {} hosts ({:?} mode, refresh {:.1?})",
            source.active().len(),
            self.config.mode,
            self.config.interval
        );
        debug!(capability = ?renderer.capability(), "Renderer ready");
        let poller = PollingEngine::new(
            Arc::clone(&ctx),
            source,
            prober,
            self.config.timeout,
            self.config.count,
        )
        .spawn()?;

        let frames = self.render_loop(&ctx, renderer);

        self.stop.stop();
        if let Err(e) = renderer.shutdown() {
            warn!("Failed to restore terminal: {}", e);
        }
        let poller_joined = poller.join_timeout(JOIN_TIMEOUT);
        if !poller_joined {
            warn!(
                "Polling thread still busy after {:?}, abandoning it",
                JOIN_TIMEOUT
            );
        }
        info!("Stopped after {} frames", frames);

        Ok(RunSummary {
            frames,
            poller_joined,
        })
    }

    fn render_loop(&self, ctx: &MonitorContext, renderer: &mut dyn Renderer) -> u64 {
        let mut frames: u64 = 0;
        while self.stop.is_running() {
            let snapshot = ctx.snapshot();
            if let Err(e) = renderer.render(&snapshot, frames == 0) {
                debug!("Skipped frame: {}", e);
            }
            frames += 1;

            if renderer.is_interactive() {
                self.handle_input(renderer);
            } else if !self.stop.sleep(self.config.interval) {
                break;
            }
        }
        frames
    }

    /// Waits for a keystroke for at most one redraw period.
    fn handle_input(&self, renderer: &mut dyn Renderer) {
        match renderer.poll_input(INPUT_POLL_INTERVAL) {
            Ok(Some(UserCommand::Quit)) => {
                info!("Quit requested");
                self.stop.stop();
            }
            Ok(Some(UserCommand::Refresh)) => debug!("Manual refresh"),
            Ok(Some(UserCommand::Resize)) | Ok(None) => {}
            Err(e) => {
                debug!("Input polling failed: {}", e);
                self.stop.sleep(INPUT_POLL_INTERVAL);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::{MockProber, MockReply};
    use crate::engine::Snapshot;
    use crate::render::RenderError;
    use std::collections::VecDeque;
    use std::time::Instant;

    /// Records snapshots and stops the session after `limit` frames.
    struct Recorder {
        stop: StopFlag,
        limit: usize,
        interactive: bool,
        inputs: VecDeque<UserCommand>,
        /// Frame numbers (1-based) that fail with an I/O error.
        failing: Vec<usize>,
        attempts: usize,
        frames: Vec<(Snapshot, bool)>,
        shut_down: bool,
    }

    impl Recorder {
        fn new(stop: StopFlag, limit: usize) -> Self {
            Self {
                stop,
                limit,
                interactive: false,
                inputs: VecDeque::new(),
                failing: Vec::new(),
                attempts: 0,
                frames: Vec::new(),
                shut_down: false,
            }
        }
    }

    impl Renderer for Recorder {
        fn render(&mut self, snapshot: &Snapshot, first_call: bool) -> Result<(), RenderError> {
            self.attempts += 1;
            if self.failing.contains(&self.attempts) {
                return Err(RenderError::Io(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "terminal gone",
                )));
            }
            self.frames.push((snapshot.clone(), first_call));
            if self.frames.len() >= self.limit {
                self.stop.stop();
            }
            Ok(())
        }

        fn is_interactive(&self) -> bool {
            self.interactive
        }

        fn poll_input(&mut self, _timeout: Duration) -> Result<Option<UserCommand>, RenderError> {
            Ok(self.inputs.pop_front())
        }

        fn shutdown(&mut self) -> Result<(), RenderError> {
            self.shut_down = true;
            Ok(())
        }
    }

    fn config(interval_ms: u64) -> MonitorConfig {
        MonitorConfig {
            interval: Duration::from_millis(interval_ms),
            timeout: Duration::from_millis(100),
            ..MonitorConfig::default()
        }
    }

    fn inline_source(hosts: &[&str]) -> HostSetSource {
        let hosts: Vec<String> = hosts.iter().map(|h| h.to_string()).collect();
        HostSetSource::from_list(&hosts, &[]).unwrap()
    }

    #[test]
    fn renders_until_stopped_and_joins_poller() {
        let prober = Arc::new(
            MockProber::new().with_reply("h1", MockReply::Up { latency_ms: 12.3, packet_loss: 0.0 }),
        );
        let supervisor = Supervisor::new(config(50), StopFlag::new());
        let mut recorder = Recorder::new(supervisor.stop_flag(), 5);

        let summary = supervisor
            .run(inline_source(&["h1"]), prober, &mut recorder)
            .unwrap();

        assert_eq!(summary.frames, 5);
        assert!(summary.poller_joined);
        assert!(recorder.shut_down);
        assert!(recorder.frames[0].1);
        assert!(recorder.frames[1..].iter().all(|(_, first)| !first));
        assert!(recorder.frames.iter().all(|(s, _)| s.len() == 1));
        let last = &recorder.frames[4].0;
        assert_eq!(last.counts().up, 1);
    }

    #[test]
    fn quit_key_ends_interactive_session() {
        let supervisor = Supervisor::new(config(5_000), StopFlag::new());
        let mut recorder = Recorder::new(supervisor.stop_flag(), usize::MAX);
        recorder.interactive = true;
        recorder.inputs = VecDeque::from([UserCommand::Refresh, UserCommand::Resize, UserCommand::Quit]);

        let started = Instant::now();
        let summary = supervisor
            .run(inline_source(&["h1"]), Arc::new(MockProber::new()), &mut recorder)
            .unwrap();

        assert_eq!(summary.frames, 3);
        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(supervisor.stop_flag().is_stopped());
    }

    #[test]
    fn external_stop_interrupts_long_interval() {
        let supervisor = Supervisor::new(config(60_000), StopFlag::new());
        let stop = supervisor.stop_flag();
        let mut recorder = Recorder::new(supervisor.stop_flag(), usize::MAX);

        let remote = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            stop.stop();
        });
        let started = Instant::now();
        let summary = supervisor
            .run(inline_source(&["h1"]), Arc::new(MockProber::new()), &mut recorder)
            .unwrap();
        remote.join().unwrap();

        assert_eq!(summary.frames, 1);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn stuck_poller_is_abandoned() {
        let prober = Arc::new(
            MockProber::new().with_reply("slow", MockReply::Stall(Duration::from_secs(30))),
        );
        let mut config = config(10);
        config.timeout = Duration::from_secs(10);
        let supervisor = Supervisor::new(config, StopFlag::new());
        let mut recorder = Recorder::new(supervisor.stop_flag(), 1);

        let started = Instant::now();
        let summary = supervisor
            .run(inline_source(&["slow"]), prober, &mut recorder)
            .unwrap();

        assert!(!summary.poller_joined);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn failed_frame_does_not_end_session() {
        let supervisor = Supervisor::new(config(10), StopFlag::new());
        let mut recorder = Recorder::new(supervisor.stop_flag(), 3);
        recorder.failing = vec![1, 2];

        let summary = supervisor
            .run(inline_source(&["h1"]), Arc::new(MockProber::new()), &mut recorder)
            .unwrap();

        assert_eq!(summary.frames, 5);
        assert_eq!(recorder.attempts, 5);
        assert_eq!(recorder.frames.len(), 3);
        assert!(recorder.frames.iter().all(|(_, first)| !first));
        assert!(recorder.shut_down);
    }
}
