//! Shortest line mode: counts plus the first three hosts.

use std::io::Write;

use super::fmt::{clip, glyph, paint, timestamp_prefix};
use super::{RenderError, RenderOptions, Renderer};
use crate::engine::Snapshot;
use crate::model::HostState;

const SHOWN_HOSTS: usize = 3;
const NAME_CHARS: usize = 8;

pub struct CompactRenderer<W: Write> {
    out: W,
    options: RenderOptions,
}

impl<W: Write> CompactRenderer<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&self, snapshot: &Snapshot) -> String {
        let color = self.options.color;
        let counts = snapshot.counts();
        let tally = |n: usize, state: HostState| {
            paint(&format!("{}{}", n, glyph(state)), Some(state), color)
        };

        let mut line = timestamp_prefix(snapshot, self.options.show_timestamp);
        line.push_str(&format!(
            "{} {} {}",
            tally(counts.up, HostState::Up),
            tally(counts.down, HostState::Down),
            tally(counts.error, HostState::Error),
        ));

        for row in snapshot.rows.iter().take(SHOWN_HOSTS) {
            if let Some(state) = row.state() {
                let mark = paint(&glyph(state).to_string(), Some(state), color);
                line.push_str(&format!(" {}:{}", clip(row.host.display_name(), NAME_CHARS), mark));
            }
        }
        line
    }
}

impl<W: Write> Renderer for CompactRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot, _first_call: bool) -> Result<(), RenderError> {
        let line = self.line(snapshot);
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}
