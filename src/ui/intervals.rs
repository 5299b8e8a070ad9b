//! ECG intervals view rendering.
//!
//! Shows the derived PR/QT/QRS/ST figures next to their textbook adult
//! reference ranges. The figures come from the placeholder estimator, so
//! the view labels them as estimates.

use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::App;

/// Render the Intervals view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from("Measure"),
        Cell::from("Value"),
        Cell::from("Reference"),
    ])
    .height(1)
    .style(app.theme.header);

    let m = &app.intervals;
    let rows = vec![
        interval_row("PR interval", m.pr_interval_ms, "ms", "120-200 ms"),
        interval_row("QT interval", m.qt_interval_ms, "ms", "350-440 ms"),
        interval_row("QRS duration", m.qrs_duration_ms, "ms", "80-100 ms"),
        interval_row("ST segment", m.st_segment_mv, "mV", "-0.5-1.0 mV"),
    ];

    let widths = [
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Fill(1),
    ];

    let title = if app.samples_seen == 0 {
        " ECG Intervals (estimated) - waiting for samples ".to_string()
    } else {
        " ECG Intervals (estimated) ".to_string()
    };

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(ratatui::style::Style::default().fg(app.theme.border)),
    );

    frame.render_widget(table, area);
}

fn interval_row(name: &str, value: f64, unit: &str, reference: &str) -> Row<'static> {
    Row::new(vec![
        Cell::from(name.to_string()),
        Cell::from(format!("{:.0} {}", value, unit)),
        Cell::from(reference.to_string()),
    ])
}
