//! One status line per refresh.

use std::io::Write;

use super::fmt::{count_line, glyph, paint, timestamp_prefix};
use super::{RenderError, RenderOptions, Renderer};
use crate::engine::Snapshot;

/// Hosts listed after the counts.
const SHOWN_HOSTS: usize = 5;

/// Appends `[time] UP:n DOWN:n ERROR:n | name:✓ ...` on every call.
pub struct SummaryRenderer<W: Write> {
    out: W,
    options: RenderOptions,
}

impl<W: Write> SummaryRenderer<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self { out, options }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&self, snapshot: &Snapshot) -> String {
        let mut line = timestamp_prefix(snapshot, self.options.show_timestamp);
        line.push_str(&count_line(snapshot.counts(), self.options.color));

        let marks: Vec<String> = snapshot
            .rows
            .iter()
            .take(SHOWN_HOSTS)
            .filter_map(|row| {
                let state = row.state()?;
                let mark = paint(&glyph(state).to_string(), Some(state), self.options.color);
                Some(format!("{}:{}", row.host.display_name(), mark))
            })
            .collect();
        if !marks.is_empty() {
            line.push_str(" | ");
            line.push_str(&marks.join(" "));
        }
        line
    }
}

impl<W: Write> Renderer for SummaryRenderer<W> {
    fn render(&mut self, snapshot: &Snapshot, _first_call: bool) -> Result<(), RenderError> {
        let line = self.line(snapshot);
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HostRecord, HostSet, StatusRecord};
    use chrono::{Local, TimeZone};

    fn plain() -> RenderOptions {
        RenderOptions {
            show_timestamp: false,
            color: false,
        }
    }

    fn render_to_string(snapshot: &Snapshot, options: RenderOptions) -> String {
        let mut renderer = SummaryRenderer::new(Vec::new(), options);
        renderer.render(snapshot, true).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn single_up_host() {
        let hosts: HostSet = [HostRecord::new("h1")].into_iter().collect();
        let records = [StatusRecord::up("h1", Some(12.3), Some(0.0))];
        let snapshot = Snapshot::from_parts(&hosts, &records, Local::now());

        assert_eq!(render_to_string(&snapshot, plain()), "UP:1 DOWN:0 ERROR:0 | h1:✓\n");
    }

    #[test]
    fn renders_self_contained_frames() {
        let renderer = SummaryRenderer::new(Vec::new(), plain());
        assert_eq!(renderer.capability(), crate::render::Capability::RenderOnce);
        assert!(!renderer.is_interactive());
    }

    #[test]
    fn marks_first_five_probed_hosts() {
        let hosts: HostSet = (1..=7)
            .map(|i| HostRecord::named(format!("10.0.0.{i}"), format!("n{i}")))
            .collect();
        let records = vec![
            StatusRecord::up("10.0.0.1", Some(1.0), Some(0.0)),
            StatusRecord::down("10.0.0.2", "", None),
            StatusRecord::unresolved("10.0.0.4"),
            StatusRecord::up("10.0.0.6", Some(1.0), Some(0.0)),
            StatusRecord::up("10.0.0.7", Some(1.0), Some(0.0)),
        ];
        let snapshot = Snapshot::from_parts(&hosts, &records, Local::now());

        assert_eq!(
            render_to_string(&snapshot, plain()),
            "UP:3 DOWN:1 ERROR:1 | n1:✓ n2:✗ n4:?\n"
        );
    }

    #[test]
    fn timestamp_prefix_and_fresh_line_per_call() {
        let hosts: HostSet = [HostRecord::new("h1")].into_iter().collect();
        let taken_at = Local.with_ymd_and_hms(2024, 1, 2, 13, 4, 5).unwrap();
        let snapshot = Snapshot::from_parts(&hosts, &[], taken_at);
        let options = RenderOptions {
            show_timestamp: true,
            color: false,
        };

        let mut renderer = SummaryRenderer::new(Vec::new(), options);
        renderer.render(&snapshot, true).unwrap();
        renderer.render(&snapshot, false).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();

        assert_eq!(out, "[13:04:05] UP:0 DOWN:0 ERROR:0\n".repeat(2));
    }
}
