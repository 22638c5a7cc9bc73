//! Table rewritten in place.
//!
//! The first call prints a header and one placeholder row per host. Later
//! calls move the cursor back to the first data row and rewrite every row
//! plus the status line, clearing each line first.

use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use super::fmt::{RULE_WIDTH, RowText, TITLE, header_line, paint};
use super::{Capability, RenderError, RenderOptions, RenderPhase, Renderer};
use crate::engine::Snapshot;
use crate::model::HostState;

/// Minimum spacing between two screen updates.
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

pub struct LiveRenderer<W: Write> {
    out: W,
    options: RenderOptions,
    phase: RenderPhase,
    min_interval: Duration,
    last_update: Option<Instant>,
    /// Lines between the first data row and the cursor.
    span: usize,
}

impl<W: Write> LiveRenderer<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self {
            out,
            options,
            phase: RenderPhase::default(),
            min_interval: MIN_UPDATE_INTERVAL,
            last_update: None,
            span: 0,
        }
    }

    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn phase(&self) -> RenderPhase {
        self.phase
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn print_header(&mut self, snapshot: &Snapshot) -> Result<(), RenderError> {
        let banner = "=".repeat(RULE_WIDTH);
        writeln!(self.out)?;
        writeln!(self.out, "{}", banner)?;
        writeln!(self.out, "{}", TITLE)?;
        writeln!(self.out, "{}", banner)?;
        writeln!(self.out, "{}", header_line())?;
        writeln!(self.out, "{}", banner)?;
        for row in &snapshot.rows {
            let line = RowText::waiting(&row.host).to_line(None, false);
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        writeln!(self.out, "Last Update: Initializing...")?;
        self.out.flush()?;

        self.span = snapshot.len() + 2;
        Ok(())
    }

    fn rewrite(&mut self, snapshot: &Snapshot) -> Result<(), RenderError> {
        if self.span > 0 {
            let up = u16::try_from(self.span).unwrap_or(u16::MAX);
            queue!(self.out, MoveUp(up))?;
        }

        let color = self.options.color;
        for row in &snapshot.rows {
            let line = RowText::from_row(row).to_line(row.state(), color);
            self.write_line(line.trim_end())?;
        }
        self.write_line(&"-".repeat(RULE_WIDTH))?;
        let counts = snapshot.counts();
        let status = format!(
            "Last Update: {} | {} {} {}",
            snapshot.taken_at.format("%H:%M:%S"),
            paint(&format!("UP:{}", counts.up), Some(HostState::Up), color),
            paint(&format!("DOWN:{}", counts.down), Some(HostState::Down), color),
            paint(&format!("ERR:{}", counts.error), Some(HostState::Error), color),
        );
        self.write_line(&status)?;

        // Blank out rows left over from a longer table.
        let written = snapshot.len() + 2;
        for _ in written..self.span {
            self.write_line("")?;
        }
        self.span = self.span.max(written);
        self.out.flush()?;
        Ok(())
    }

    fn write_line(&mut self, line: &str) -> Result<(), RenderError> {
        queue!(self.out, Clear(ClearType::CurrentLine))?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn due(&self, now: Instant) -> bool {
        match self.last_update {
            Some(last) => now.duration_since(last) >= self.min_interval,
            None => true,
        }
    }
}

impl<W: Write> Renderer for LiveRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot, _first_call: bool) -> Result<(), RenderError> {
        let now = Instant::now();
        if self.phase == RenderPhase::Uninitialized {
            self.print_header(snapshot)?;
        } else if self.due(now) {
            self.rewrite(snapshot)?;
        } else {
            return Ok(());
        }
        self.phase = self.phase.advance();
        self.last_update = Some(now);
        Ok(())
    }

    fn capability(&self) -> Capability {
        Capability::Incremental
    }
}
