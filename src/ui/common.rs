//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};

/// Render the header bar with connection state and live scalars.
///
/// Displays: status indicator, heart rate, SpO2, sample rate.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let link = app.link();

    let rate = app
        .history
        .sample_rate()
        .map(|r| format!("{:.1}/s", r))
        .unwrap_or_else(|| "-".to_string());

    let line = Line::from(vec![
        Span::styled(" ● ", app.theme.status_style(link.status)),
        Span::styled("VITALWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(link.status.label(), app.theme.status_style(link.status)),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", app.heart_rate),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" bpm │ "),
        Span::styled(
            format!("{:.0}", app.spo2),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("% SpO2 │ "),
        Span::raw(format!("{} samples @ {}", app.samples_seen, rate)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Vitals "),
        Line::from(" 2:Waveform "),
        Line::from(" 3:Intervals "),
    ];

    let selected = match app.current_view {
        View::Vitals => 0,
        View::Waveform => 1,
        View::Intervals => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows the data source, available controls, and either a temporary
/// status message or the last transport error.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let link = app.link();
    let error = if link.is_connected() { None } else { link.error };
    let status = if let Some(err) = error {
        format!(" {} | {} | q:quit", app.source_description(), err)
    } else {
        format!(
            " {} | Tab:switch e:export c:clear ?:help q:quit",
            app.source_description()
        )
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  Tab         Next view"),
        Line::from("  1/2/3       Jump to view"),
        Line::from("  Esc         Close overlay"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Actions",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  e         Export report to JSON"),
        Line::from("  c         Clear waveform and trends"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 18u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
