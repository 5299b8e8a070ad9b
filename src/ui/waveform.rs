//! ECG waveform view rendering.
//!
//! Plots the rolling buffer as a line chart. The X axis is the sample
//! index within the window (oldest at 0); the Y axis auto-fits the
//! current window with a little headroom so the trace never clips.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::app::App;

/// Minimum Y half-range so a flat or idle trace still renders with a
/// visible baseline instead of a degenerate axis.
const MIN_Y_RANGE: f64 = 0.5;

/// Render the Waveform view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let points = app.ecg.points();
    let (y_min, y_max) = y_bounds(app);

    let dataset = Dataset::default()
        .name("ECG")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(app.theme.trace))
        .data(&points);

    let x_max = (app.ecg.capacity().saturating_sub(1)).max(1) as f64;

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!(" ECG ({} samples) ", app.ecg.capacity()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw("old"), Span::raw("new")]),
        )
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.2}", y_min)),
                    Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.2}", y_max)),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Fit the Y axis to the window with 10% headroom, never collapsing
/// below the minimum range.
fn y_bounds(app: &App) -> (f64, f64) {
    let (min, max) = app.ecg.bounds();
    let mid = (min + max) / 2.0;
    let half = ((max - min) / 2.0 * 1.1).max(MIN_Y_RANGE);
    (mid - half, mid + half)
}
