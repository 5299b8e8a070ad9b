//! Application state and navigation logic.

use std::time::Instant;

use anyhow::Result;

use crate::data::{DerivedMetrics, EcgBuffer, History, IntervalEstimator, TelemetrySample};
use crate::source::{DataSource, LinkState};
use crate::ui::Theme;

/// Upper bound on samples ingested per pump call so a burst cannot stall
/// the draw loop.
const MAX_SAMPLES_PER_PUMP: usize = 256;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Large heart-rate and SpO2 readouts with trends.
    Vitals,
    /// Scrolling ECG chart.
    Waveform,
    /// Derived ECG interval figures.
    Intervals,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Vitals => View::Waveform,
            View::Waveform => View::Intervals,
            View::Intervals => View::Vitals,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Vitals => View::Intervals,
            View::Waveform => View::Vitals,
            View::Intervals => View::Waveform,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Vitals => "Vitals",
            View::Waveform => "Waveform",
            View::Intervals => "Intervals",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    // Data source
    source: Box<dyn DataSource>,

    // Live state fed by the stream
    pub heart_rate: u16,
    pub spo2: f64,
    pub ecg: EcgBuffer,
    pub intervals: DerivedMetrics,
    pub history: History,
    pub samples_seen: u64,
    pub last_sample_at: Option<Instant>,

    estimator: IntervalEstimator,

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from the given source, with an ECG window
    /// of `ecg_window` samples.
    pub fn new(source: Box<dyn DataSource>, ecg_window: usize) -> Self {
        Self {
            running: true,
            current_view: View::Vitals,
            show_help: false,
            source,
            heart_rate: 0,
            spo2: 0.0,
            ecg: EcgBuffer::new(ecg_window),
            intervals: DerivedMetrics::default(),
            history: History::new(),
            samples_seen: 0,
            last_sample_at: None,
            estimator: IntervalEstimator::new(),
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Snapshot of the transport connection state.
    pub fn link(&self) -> LinkState {
        self.source.link()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Drain pending samples from the source and fold them into the live
    /// state. Returns the number of samples ingested.
    pub fn pump(&mut self) -> usize {
        let mut ingested = 0;
        while ingested < MAX_SAMPLES_PER_PUMP {
            match self.source.poll() {
                Some(sample) => {
                    self.ingest(sample);
                    ingested += 1;
                }
                None => break,
            }
        }
        ingested
    }

    /// Fold one accepted sample into the live state.
    pub fn ingest(&mut self, sample: TelemetrySample) {
        self.heart_rate = sample.heart_rate;
        self.spo2 = sample.spo2;
        self.ecg.push(sample.ecg);
        self.intervals = self.estimator.estimate(sample.ecg);
        self.history.record(sample.heart_rate, sample.spo2);
        self.samples_seen += 1;
        self.last_sample_at = Some(Instant::now());
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Reset the waveform window and trend history.
    pub fn clear_trace(&mut self) {
        self.ecg.clear();
        self.history.clear();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current dashboard state to a JSON document.
    ///
    /// The report embeds the full ECG series so the chart can be rebuilt
    /// from the artifact alone.
    pub fn export_report(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let link = self.link();
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let report = serde_json::json!({
            "generated_at_ms": timestamp_ms,
            "source": self.source_description(),
            "connection": {
                "status": link.status.label(),
                "error": link.error,
            },
            "vitals": {
                "heart_rate_bpm": self.heart_rate,
                "spo2_percent": self.spo2,
                "samples_seen": self.samples_seen,
            },
            "intervals": self.intervals,
            "ecg": {
                "window": self.ecg.capacity(),
                "samples": self.ecg.iter().collect::<Vec<f64>>(),
            },
        });

        let json = serde_json::to_string_pretty(&report)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, ConnectionStatus};

    fn sample(hr: u16, spo2: f64, ecg: f64) -> TelemetrySample {
        TelemetrySample {
            heart_rate: hr,
            spo2,
            ecg,
        }
    }

    #[tokio::test]
    async fn test_ingest_updates_live_state() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), 10);

        app.ingest(sample(72, 98.0, 0.5));

        assert_eq!(app.heart_rate, 72);
        assert_eq!(app.spo2, 98.0);
        assert_eq!(app.ecg.last(), 0.5);
        assert_eq!(app.samples_seen, 1);
        assert_eq!(app.history.len(), 1);
        assert!(app.last_sample_at.is_some());
    }

    #[tokio::test]
    async fn test_pump_drains_in_order() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), 10);

        for i in 0..3 {
            assert!(tx.send(sample(70 + i, 97.0, i as f64)).await);
        }

        assert_eq!(app.pump(), 3);
        assert_eq!(app.heart_rate, 72);
        assert_eq!(app.ecg.last(), 2.0);
        // Window length never changes.
        assert_eq!(app.ecg.len(), 10);
    }

    #[tokio::test]
    async fn test_pump_is_bounded_per_call() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), 10);

        // ChannelSource's queue is shorter than two pump limits, so just
        // check the bound holds for what fits.
        for i in 0..200 {
            assert!(tx.send(sample(70, 97.0, i as f64)).await);
        }
        assert!(app.pump() <= super::MAX_SAMPLES_PER_PUMP);
    }

    #[tokio::test]
    async fn test_close_event_reaches_status() {
        let (tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), 10);

        tx.set_link(LinkState::disconnected("broker closed the connection"));

        let link = app.link();
        assert_eq!(link.status, ConnectionStatus::Disconnected);
        assert!(link.error.is_some());
    }

    #[tokio::test]
    async fn test_no_mutation_after_teardown() {
        let (tx, mut source) = ChannelSource::create("test");
        source.close();
        let mut app = App::new(Box::new(source), 10);

        let _ = tx.send(sample(99, 99.0, 9.9)).await;

        assert_eq!(app.pump(), 0);
        assert_eq!(app.heart_rate, 0);
        assert_eq!(app.samples_seen, 0);
        assert!(app.ecg.iter().all(|v| v == 0.0));
    }

    #[tokio::test]
    async fn test_clear_trace() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), 5);
        app.ingest(sample(80, 96.0, 1.0));

        app.clear_trace();

        assert!(app.ecg.iter().all(|v| v == 0.0));
        assert!(app.history.is_empty());
        // Scalars keep showing the last reading.
        assert_eq!(app.heart_rate, 80);
    }

    #[tokio::test]
    async fn test_view_cycle() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), 5);
        assert_eq!(app.current_view, View::Vitals);
        app.next_view();
        assert_eq!(app.current_view, View::Waveform);
        app.prev_view();
        app.prev_view();
        assert_eq!(app.current_view, View::Intervals);
    }

    #[tokio::test]
    async fn test_export_report() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source), 4);
        app.ingest(sample(72, 98.0, 0.5));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        app.export_report(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let report: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(report["vitals"]["heart_rate_bpm"], 72);
        assert_eq!(report["ecg"]["window"], 4);
        assert_eq!(report["ecg"]["samples"].as_array().unwrap().len(), 4);
        assert_eq!(report["source"], "test");
    }

    #[tokio::test]
    async fn test_export_to_bad_path_fails() {
        let (_tx, source) = ChannelSource::create("test");
        let app = App::new(Box::new(source), 4);
        assert!(app
            .export_report(std::path::Path::new("/nonexistent/dir/report.json"))
            .is_err());
    }
}
