//! Vitals view rendering.
//!
//! Two large tiles - heart rate and SpO2 - each with the latest reading
//! and a sparkline trend, plus a freshness line for the stream.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the Vitals view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Min(7), Constraint::Length(1)]).split(area);
    let tiles = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(rows[0]);

    render_tile(
        frame,
        app,
        tiles[0],
        "Heart Rate",
        &format!("{}", app.heart_rate),
        "bpm",
        &app.history.heart_rate_sparkline(),
    );
    render_tile(
        frame,
        app,
        tiles[1],
        "SpO2",
        &format!("{:.1}", app.spo2),
        "%",
        &app.history.spo2_sparkline(),
    );

    render_freshness(frame, app, rows[1]);
}

fn render_tile(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    value: &str,
    unit: &str,
    sparkline: &[u8],
) {
    let waiting = app.samples_seen == 0;

    let value_line = if waiting {
        Line::from(Span::styled(
            "--",
            Style::default().add_modifier(Modifier::DIM),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                value.to_string(),
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", unit)),
        ])
    };

    let text = vec![
        Line::from(""),
        value_line,
        Line::from(""),
        Line::from(render_sparkline(sparkline, area.width.saturating_sub(4) as usize)),
    ];

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_freshness(frame: &mut Frame, app: &App, area: Rect) {
    let text = match app.last_sample_at {
        Some(at) => format!(" Last sample {:.1}s ago", at.elapsed().as_secs_f64()),
        None => " Waiting for samples...".to_string(),
    };
    let paragraph = Paragraph::new(text).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

fn render_sparkline(data: &[u8], max_width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    // Take the most recent values that fit the tile width.
    data.iter()
        .rev()
        .take(max_width.max(1))
        .rev()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}
