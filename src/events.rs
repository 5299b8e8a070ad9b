use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use tracing::error;

use crate::app::{App, View};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => app.next_view(),
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Vitals),
        KeyCode::Char('2') => app.set_view(View::Waveform),
        KeyCode::Char('3') => app.set_view(View::Intervals),

        // Clear the waveform window and trends
        KeyCode::Char('c') => {
            app.clear_trace();
            app.set_status_message("Trace cleared".to_string());
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from("vitalwatch_report.json");
            match app.export_report(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    error!(error = %e, "export failed");
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ChannelSource;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::new(Box::new(source), 10)
    }

    #[tokio::test]
    async fn test_quit_key() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.running);
    }

    #[tokio::test]
    async fn test_view_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_view, View::Waveform);
        handle_key_event(&mut app, key(KeyCode::Char('3')));
        assert_eq!(app.current_view, View::Intervals);
        handle_key_event(&mut app, key(KeyCode::Left));
        assert_eq!(app.current_view, View::Waveform);
    }

    #[tokio::test]
    async fn test_any_key_closes_help() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.show_help);
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.show_help);
        // The keypress only closed the overlay; the app is still running.
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_clear_key_sets_status() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('c')));
        assert!(app.get_status_message().unwrap().contains("cleared"));
    }
}
