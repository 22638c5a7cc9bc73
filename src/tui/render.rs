//! Dashboard layout.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table};

use crate::engine::Snapshot;
use crate::render::fmt::{
    HOST_WIDTH, LATENCY_WIDTH, LOSS_WIDTH, NAME_WIDTH, RowText, STATUS_WIDTH, TITLE,
};

use super::style::Styles;

/// Draws one dashboard frame.
///
/// With `live == false` only the static layout is drawn: every host shows
/// as waiting and the summary reads "Initializing...".
pub fn render(frame: &mut Frame, snapshot: &Snapshot, live: bool) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Length(1), // Summary
        Constraint::Length(1), // Rule
        Constraint::Min(0),    // Hosts
        Constraint::Length(1), // Footer
    ])
    .split(frame.area());

    frame.render_widget(Paragraph::new(TITLE).style(Styles::title()), chunks[0]);
    render_summary(frame, chunks[1], snapshot, live);
    frame.render_widget(
        Paragraph::new("─".repeat(usize::from(chunks[2].width))).style(Styles::dim()),
        chunks[2],
    );
    render_hosts(frame, chunks[3], snapshot, live);
    render_footer(frame, chunks[4]);
}

fn render_summary(frame: &mut Frame, area: Rect, snapshot: &Snapshot, live: bool) {
    if !live || !snapshot.has_results() {
        frame.render_widget(Paragraph::new("Initializing...").style(Styles::dim()), area);
        return;
    }

    let counts = snapshot.counts();
    let left = format!(
        "UP: {}  DOWN: {}  ERROR: {}  |  Monitoring {} hosts",
        counts.up,
        counts.down,
        counts.error,
        snapshot.len()
    );
    let right = format!(
        "Last Update: {}",
        snapshot.taken_at.format("%Y-%m-%d %H:%M:%S")
    );
    let [left_area, right_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(right.len() as u16 + 1),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(left).style(Styles::default()), left_area);
    frame.render_widget(Paragraph::new(right).style(Styles::default()), right_area);
}

fn render_hosts(frame: &mut Frame, area: Rect, snapshot: &Snapshot, live: bool) {
    let header = Row::new(["NAME", "HOST", "STATUS", "LATENCY", "PACKET LOSS"])
        .style(Styles::table_header())
        .height(1);

    // One line goes to the header; hosts past the bottom are dropped.
    let visible = usize::from(area.height.saturating_sub(1));
    let rows: Vec<Row> = snapshot
        .rows
        .iter()
        .take(visible)
        .map(|row| {
            let (text, state) = if live {
                (RowText::from_row(row), row.state())
            } else {
                (RowText::waiting(&row.host), None)
            };
            Row::new([
                Span::raw(text.name),
                Span::raw(text.host),
                Span::styled(text.status, Styles::status(state)),
                Span::raw(text.latency),
                Span::raw(text.loss),
            ])
            .height(1)
        })
        .collect();

    let widths = [
        Constraint::Length(NAME_WIDTH as u16),
        Constraint::Length(HOST_WIDTH as u16),
        Constraint::Length(STATUS_WIDTH as u16),
        Constraint::Length(LATENCY_WIDTH as u16),
        Constraint::Length(LOSS_WIDTH as u16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .style(Styles::default());
    frame.render_widget(table, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("q", Styles::help_key()),
        Span::styled(" quit  ", Styles::help()),
        Span::styled("r", Styles::help_key()),
        Span::styled(" refresh  ", Styles::help()),
        Span::styled("Ctrl-C", Styles::help_key()),
        Span::styled(" quit", Styles::help()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
