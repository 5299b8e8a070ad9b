//! Recorded-file replay source.
//!
//! Replays a newline-delimited JSON recording of telemetry samples, one
//! sample per poll. Useful for demos and for regenerating an export
//! report from a captured session.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use super::{ConnectionStatus, DataSource, LinkState};
use crate::data::TelemetrySample;

/// A data source that replays samples from a recording file.
///
/// Each line of the file is one JSON payload in the same format the
/// device publishes. Malformed lines are logged and skipped, exactly as
/// they would be on the live link.
#[derive(Debug)]
pub struct FileSource {
    lines: VecDeque<String>,
    description: String,
    state: LinkState,
}

impl FileSource {
    /// Load a recording. Fails if the file cannot be read; individual
    /// malformed lines do not fail the load.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading recording {}", path.display()))?;

        let lines: VecDeque<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            lines,
            description: format!("replay: {}", path.display()),
            state: LinkState::connected(),
        })
    }

    /// Samples (including not-yet-validated lines) remaining to replay.
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<TelemetrySample> {
        while let Some(line) = self.lines.pop_front() {
            match TelemetrySample::decode(line.as_bytes()) {
                Ok(sample) => return Some(sample),
                Err(e) => {
                    warn!(error = %e, "skipping malformed recording line");
                }
            }
        }

        if self.state.status == ConnectionStatus::Connected {
            self.state = LinkState::disconnected("end of recording");
        }
        None
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn link(&self) -> LinkState {
        self.state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn recording(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_replays_in_order() {
        let file = recording(&[
            r#"{"heart_rate":70,"spo2":97,"ecg":0.1}"#,
            r#"{"heart_rate":71,"spo2":97,"ecg":0.2}"#,
            r#"{"heart_rate":72,"spo2":98,"ecg":0.3}"#,
        ]);
        let mut source = FileSource::open(file.path()).unwrap();
        assert_eq!(source.remaining(), 3);
        assert!(source.link().is_connected());

        assert_eq!(source.poll().unwrap().heart_rate, 70);
        assert_eq!(source.poll().unwrap().heart_rate, 71);
        assert_eq!(source.poll().unwrap().ecg, 0.3);
    }

    #[test]
    fn test_skips_malformed_lines() {
        let file = recording(&[
            "not json",
            r#"{"heart_rate":70,"spo2":97,"ecg":0.1}"#,
            "[]",
            r#"{"heart_rate":71}"#,
        ]);
        let mut source = FileSource::open(file.path()).unwrap();

        assert_eq!(source.poll().unwrap().heart_rate, 70);
        assert_eq!(source.poll().unwrap().heart_rate, 71);
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_end_of_recording_disconnects() {
        let file = recording(&[r#"{"heart_rate":70}"#]);
        let mut source = FileSource::open(file.path()).unwrap();

        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        let state = source.link();
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert_eq!(state.error.as_deref(), Some("end of recording"));
    }

    #[test]
    fn test_missing_file_fails_open() {
        assert!(FileSource::open("/nonexistent/recording.jsonl").is_err());
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let file = recording(&["", r#"{"heart_rate":70}"#, "   ", ""]);
        let mut source = FileSource::open(file.path()).unwrap();
        assert_eq!(source.remaining(), 1);
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
    }
}
