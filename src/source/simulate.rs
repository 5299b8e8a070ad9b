//! Synthetic telemetry generator.
//!
//! Produces a plausible ECG-like trace with wandering heart-rate and SpO2
//! scalars so the dashboard can run without a device or broker.

use std::thread;
use std::time::Duration;

use rand::Rng;

use super::{ChannelSource, LinkState};

/// Samples emitted per second.
const SAMPLE_HZ: u64 = 25;

/// Spawn the generator thread and return the source it feeds.
///
/// The thread stops on its own once the source is dropped or closed.
pub fn spawn() -> ChannelSource {
    let (sender, source) = ChannelSource::create("simulator");
    sender.set_link(LinkState::connected());

    thread::spawn(move || {
        let mut rng = rand::thread_rng();
        let mut phase = 0.0f64;
        let mut heart_rate = 72.0f64;
        let mut spo2 = 97.5f64;
        let tick = Duration::from_millis(1000 / SAMPLE_HZ);

        loop {
            // One simulated beat per cycle: a sharp QRS-like spike over a
            // low-amplitude baseline wave.
            let beat_hz = heart_rate / 60.0;
            phase += beat_hz / SAMPLE_HZ as f64;
            if phase >= 1.0 {
                phase -= 1.0;
            }

            let baseline = 0.08 * (phase * std::f64::consts::TAU).sin();
            let spike = if (0.48..0.52).contains(&phase) { 1.0 } else { 0.0 };
            let noise = rng.gen_range(-0.02..0.02);
            let ecg = baseline + spike + noise;

            heart_rate = (heart_rate + rng.gen_range(-0.5..0.5)).clamp(55.0, 110.0);
            spo2 = (spo2 + rng.gen_range(-0.05..0.05)).clamp(93.0, 100.0);

            let sample = crate::data::TelemetrySample {
                heart_rate: heart_rate.round() as u16,
                spo2: (spo2 * 10.0).round() / 10.0,
                ecg,
            };

            if !sender.blocking_send(sample) {
                return;
            }
            thread::sleep(tick);
        }
    });

    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DataSource;

    #[test]
    fn test_simulator_produces_samples() {
        let mut source = spawn();
        assert!(source.link().is_connected());

        // Wait for at least one sample to arrive.
        let mut sample = None;
        for _ in 0..50 {
            if let Some(s) = source.poll() {
                sample = Some(s);
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }

        let sample = sample.expect("simulator produced no samples");
        assert!(sample.heart_rate >= 55 && sample.heart_rate <= 110);
        assert!((93.0..=100.0).contains(&sample.spo2));
        assert!(sample.ecg.is_finite());
    }

    #[test]
    fn test_simulator_stops_after_close() {
        let mut source = spawn();
        source.close();
        assert!(source.poll().is_none());
    }
}
