//! Renderers turning a status snapshot into terminal output.
//!
//! Every display mode implements [`Renderer`]. The one-shot modes
//! (summary, detailed, compact) append fresh output on every call; the
//! incremental modes (live, interactive) keep per-instance state and update
//! what they drew before.

pub mod fmt;

mod compact;
mod detailed;
mod live;
mod summary;

pub use compact::CompactRenderer;
pub use detailed::DetailedRenderer;
pub use live::{LiveRenderer, MIN_UPDATE_INTERVAL};
pub use summary::SummaryRenderer;

use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use clap::ValueEnum;
use tracing::warn;

use crate::engine::Snapshot;
use crate::tui::FullScreenRenderer;

/// Errors raised while producing a frame.
#[derive(Debug)]
pub enum RenderError {
    /// Writing to the terminal failed.
    Io(io::Error),
    /// The terminal lacks a capability the mode needs.
    Unsupported(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Io(e) => write!(f, "terminal I/O error: {}", e),
            RenderError::Unsupported(what) => write!(f, "terminal not supported: {}", what),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Io(e) => Some(e),
            RenderError::Unsupported(_) => None,
        }
    }
}

impl From<io::Error> for RenderError {
    fn from(e: io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// Display mode selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayMode {
    /// One status line per refresh.
    #[value(alias = "simple")]
    Summary,
    /// Full table per refresh.
    Detailed,
    /// Counts and the first three hosts.
    Compact,
    /// Table updated in place.
    #[value(alias = "incremental-live")]
    Live,
    /// Full-screen dashboard.
    #[default]
    #[value(alias = "curses")]
    Interactive,
}

impl DisplayMode {
    /// Whether output is rewritten in place, so log lines on stderr would
    /// corrupt it.
    pub fn redraws_in_place(self) -> bool {
        matches!(self, DisplayMode::Live | DisplayMode::Interactive)
    }
}

/// Presentation toggles shared by all renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix line output with `[HH:MM:SS]`.
    pub show_timestamp: bool,
    /// Colour status labels with ANSI escapes.
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_timestamp: false,
            color: true,
        }
    }
}

/// How a renderer relates successive frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Every call prints a self-contained frame.
    RenderOnce,
    /// Calls update a previously drawn frame.
    Incremental,
}

/// Lifecycle of an incremental renderer. Never goes back to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderPhase {
    #[default]
    Uninitialized,
    HeaderPrinted,
    Steady,
}

impl RenderPhase {
    pub fn advance(self) -> Self {
        match self {
            RenderPhase::Uninitialized => RenderPhase::HeaderPrinted,
            RenderPhase::HeaderPrinted | RenderPhase::Steady => RenderPhase::Steady,
        }
    }
}

/// Request coming from the keyboard in interactive mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    Quit,
    Refresh,
    Resize,
}

/// Converts snapshots into terminal output.
pub trait Renderer {
    /// Draws `snapshot`. `first_call` is true for the first frame of the run.
    fn render(&mut self, snapshot: &Snapshot, first_call: bool) -> Result<(), RenderError>;

    fn capability(&self) -> Capability {
        Capability::RenderOnce
    }

    /// Whether the renderer reads keystrokes (drives the render cadence).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Waits up to `timeout` for a keystroke.
    fn poll_input(&mut self, _timeout: Duration) -> Result<Option<UserCommand>, RenderError> {
        Ok(None)
    }

    /// Releases the terminal.
    fn shutdown(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Creates the renderer for `mode` writing to stdout.
///
/// Interactive mode falls back to live mode when stdout is not a terminal
/// or the full-screen setup fails.
pub fn build_renderer(mode: DisplayMode, options: RenderOptions) -> Box<dyn Renderer> {
    match mode {
        DisplayMode::Summary => Box::new(SummaryRenderer::new(io::stdout(), options)),
        DisplayMode::Detailed => Box::new(DetailedRenderer::new(io::stdout(), options)),
        DisplayMode::Compact => Box::new(CompactRenderer::new(io::stdout(), options)),
        DisplayMode::Live => Box::new(LiveRenderer::new(io::stdout(), options)),
        DisplayMode::Interactive => {
            let attempt = if io::stdout().is_terminal() {
                FullScreenRenderer::stdout()
            } else {
                Err(RenderError::Unsupported("stdout is not a terminal".to_string()))
            };
            match attempt {
                Ok(renderer) => Box::new(renderer),
                Err(e) => Box::new(live_fallback(io::stdout(), &mut io::stderr(), &e, options)),
            }
        }
    }
}

/// Live renderer used when the full-screen dashboard cannot start.
///
/// The notice goes to `notice` directly since logging is usually off in
/// the in-place modes.
fn live_fallback<W: Write>(
    out: W,
    notice: &mut dyn Write,
    cause: &RenderError,
    options: RenderOptions,
) -> LiveRenderer<W> {
    warn!("Interactive mode unavailable ({}), falling back to live mode", cause);
    let _ = writeln!(
        notice,
        "pingwatch: interactive mode unavailable ({}), using live mode",
        cause
    );
    LiveRenderer::new(out, options)
}
