//! Full table per refresh, append-only.

use std::io::Write;

use super::fmt::{RULE_WIDTH, RowText, count_line, header_line, timestamp_prefix};
use super::{RenderError, RenderOptions, Renderer};
use crate::engine::Snapshot;

/// Prints the whole table followed by the counts on every call.
///
/// Output depends only on the snapshot, so an unchanged snapshot renders
/// identically.
pub struct DetailedRenderer<W: Write> {
    out: W,
    options: RenderOptions,
}

impl<W: Write> DetailedRenderer<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for DetailedRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot, _first_call: bool) -> Result<(), RenderError> {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(self.out, "{}", header_line())?;
        writeln!(self.out, "{}", rule)?;
        for row in &snapshot.rows {
            let line = RowText::from_row(row).to_line(row.state(), self.options.color);
            writeln!(self.out, "{}", line.trim_end())?;
        }
        writeln!(self.out, "{}", rule)?;
        writeln!(
            self.out,
            "{}{}",
            timestamp_prefix(snapshot, self.options.show_timestamp),
            count_line(snapshot.counts(), self.options.color)
        )?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
