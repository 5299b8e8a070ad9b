//! Historical scalar tracking for sparklines and rate readouts.

use std::collections::VecDeque;
use std::time::Instant;

/// Maximum number of readings retained per scalar.
const MAX_HISTORY_SIZE: usize = 120;

/// Tracks recent heart-rate and SpO2 readings plus arrival times.
///
/// Feeds the sparkline trends in the vitals view and the samples/second
/// figure in the header.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Recent heart-rate readings, oldest first.
    heart_rate: VecDeque<u16>,
    /// Recent SpO2 readings, oldest first.
    spo2: VecDeque<f64>,
    /// Arrival timestamps of recent samples.
    timestamps: VecDeque<Instant>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one accepted sample's scalars.
    pub fn record(&mut self, heart_rate: u16, spo2: f64) {
        push_capped(&mut self.heart_rate, heart_rate);
        push_capped(&mut self.spo2, spo2);
        push_capped(&mut self.timestamps, Instant::now());
    }

    /// Number of readings currently retained.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Heart-rate trend normalized to 0-7 for 8-level sparkline bars.
    pub fn heart_rate_sparkline(&self) -> Vec<u8> {
        normalize_sparkline(self.heart_rate.iter().map(|&v| v as f64))
    }

    /// SpO2 trend normalized to 0-7 for 8-level sparkline bars.
    pub fn spo2_sparkline(&self) -> Vec<u8> {
        normalize_sparkline(self.spo2.iter().copied())
    }

    /// Sample arrival rate in samples per second over the retained window.
    ///
    /// Returns None until at least two samples have arrived.
    pub fn sample_rate(&self) -> Option<f64> {
        if self.timestamps.len() < 2 {
            return None;
        }
        let first = self.timestamps.front()?;
        let last = self.timestamps.back()?;
        let elapsed = last.duration_since(*first).as_secs_f64();
        if elapsed > 0.0 {
            Some((self.timestamps.len() - 1) as f64 / elapsed)
        } else {
            None
        }
    }

    /// Drop all retained readings.
    pub fn clear(&mut self) {
        self.heart_rate.clear();
        self.spo2.clear();
        self.timestamps.clear();
    }
}

fn push_capped<T>(queue: &mut VecDeque<T>, value: T) {
    queue.push_back(value);
    if queue.len() > MAX_HISTORY_SIZE {
        queue.pop_front();
    }
}

/// Normalize values to the 0-7 range used by the sparkline glyphs.
///
/// Returns an empty Vec when there is not enough history to show a trend.
fn normalize_sparkline(values: impl Iterator<Item = f64>) -> Vec<u8> {
    let values: Vec<f64> = values.collect();
    if values.len() < 2 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = (max - min).max(f64::EPSILON);

    values
        .iter()
        .map(|&v| {
            let normalized = ((v - min) / range * 7.0) as u8;
            normalized.min(7)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_caps_history() {
        let mut history = History::new();
        for i in 0..(MAX_HISTORY_SIZE + 50) {
            history.record(60 + (i % 30) as u16, 95.0);
        }
        assert_eq!(history.len(), MAX_HISTORY_SIZE);
    }

    #[test]
    fn test_sparkline_needs_two_readings() {
        let mut history = History::new();
        assert!(history.heart_rate_sparkline().is_empty());
        history.record(70, 97.0);
        assert!(history.heart_rate_sparkline().is_empty());
        history.record(80, 98.0);
        assert_eq!(history.heart_rate_sparkline().len(), 2);
    }

    #[test]
    fn test_sparkline_bounds() {
        let mut history = History::new();
        for hr in [60u16, 75, 90, 120, 65] {
            history.record(hr, 96.0);
        }
        let spark = history.heart_rate_sparkline();
        assert!(spark.iter().all(|&v| v <= 7));
        // Lowest reading maps to 0, highest to 7.
        assert_eq!(spark[0], 0);
        assert_eq!(spark[3], 7);
    }

    #[test]
    fn test_flat_series_does_not_divide_by_zero() {
        let mut history = History::new();
        history.record(70, 97.0);
        history.record(70, 97.0);
        let spark = history.heart_rate_sparkline();
        assert!(spark.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_sample_rate() {
        let mut history = History::new();
        assert!(history.sample_rate().is_none());
        history.record(70, 97.0);
        assert!(history.sample_rate().is_none());
        std::thread::sleep(std::time::Duration::from_millis(20));
        history.record(71, 97.0);
        let rate = history.sample_rate().unwrap();
        assert!(rate > 0.0);
        assert!(rate < 1000.0);
    }

    #[test]
    fn test_clear() {
        let mut history = History::new();
        history.record(70, 97.0);
        history.clear();
        assert!(history.is_empty());
    }
}
