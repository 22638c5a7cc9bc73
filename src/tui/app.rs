//! Full-screen renderer.

use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use tracing::debug;

use crate::engine::Snapshot;
use crate::render::{Capability, RenderError, RenderPhase, Renderer, UserCommand};

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;

/// Dashboard drawn with ratatui on the alternate screen.
///
/// Owns the terminal while alive: raw mode and the alternate screen are
/// entered by [`FullScreenRenderer::stdout`] and left on shutdown or drop.
pub struct FullScreenRenderer<B: Backend> {
    terminal: Terminal<B>,
    events: EventHandler,
    phase: RenderPhase,
    /// Raw mode and the alternate screen are active and must be undone.
    owns_terminal: bool,
}

impl FullScreenRenderer<CrosstermBackend<Stdout>> {
    /// Takes over the process terminal.
    pub fn stdout() -> Result<Self, RenderError> {
        enable_raw_mode().map_err(|e| RenderError::Unsupported(format!("raw mode: {}", e)))?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(RenderError::Unsupported(format!("alternate screen: {}", e)));
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self {
                terminal,
                events: EventHandler::new(),
                phase: RenderPhase::default(),
                owns_terminal: true,
            }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
                Err(RenderError::Io(e))
            }
        }
    }
}

impl<B: Backend> FullScreenRenderer<B> {
    /// Draws into `backend` without touching the process terminal.
    pub fn with_backend(backend: B) -> Result<Self, RenderError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
            events: EventHandler::new(),
            phase: RenderPhase::default(),
            owns_terminal: false,
        })
    }

    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.owns_terminal {
            return Ok(());
        }
        self.owns_terminal = false;
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen, Show)?;
        Ok(())
    }
}

impl<B: Backend> Renderer for FullScreenRenderer<B> {
    fn render(&mut self, snapshot: &Snapshot, _first_call: bool) -> Result<(), RenderError> {
        let live = self.phase != RenderPhase::Uninitialized;
        if !live && let Err(e) = self.terminal.clear() {
            debug!("Failed to clear terminal: {}", e);
        }
        match self.terminal.draw(|frame| render(frame, snapshot, live)) {
            Ok(_) => self.phase = self.phase.advance(),
            Err(e) => debug!("Skipped frame: {}", e),
        }
        Ok(())
    }

    fn capability(&self) -> Capability {
        Capability::Incremental
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn poll_input(&mut self, timeout: Duration) -> Result<Option<UserCommand>, RenderError> {
        Ok(match self.events.next(timeout)? {
            Event::Key(key) => match handle_key(key) {
                KeyAction::Quit => Some(UserCommand::Quit),
                KeyAction::Refresh => Some(UserCommand::Refresh),
                KeyAction::None => None,
            },
            Event::Resize(width, height) => {
                debug!("Terminal resized to {}x{}", width, height);
                Some(UserCommand::Resize)
            }
            Event::Tick => None,
        })
    }

    fn shutdown(&mut self) -> Result<(), RenderError> {
        self.restore()?;
        Ok(())
    }
}

impl<B: Backend> Drop for FullScreenRenderer<B> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
