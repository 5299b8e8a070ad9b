//! Example: Feeding the dashboard through a channel
//!
//! This example demonstrates how to integrate vitalwatch into your own
//! application by pushing samples through a channel.
//!
//! This is useful when you want to:
//! - Bridge from a transport other than MQTT
//! - Generate synthetic data for testing
//! - Replay samples from your own storage
//!
//! # Usage
//!
//! ```bash
//! cargo run --example channel_source
//! ```

use std::thread;
use std::time::Duration;

use vitalwatch::{ChannelSource, DataSource, LinkState, TelemetrySample};

fn main() {
    println!("Channel source example");
    println!("Generating synthetic samples...\n");

    // Create a channel source - this returns both a sender and the source
    let (tx, mut source) = ChannelSource::create("synthetic-feed");
    tx.set_link(LinkState::connected());

    // Spawn a thread to generate synthetic samples
    thread::spawn(move || {
        let mut beat = 0u64;

        loop {
            beat += 1;

            let sample = TelemetrySample {
                heart_rate: 65 + (beat % 20) as u16,
                spo2: 96.0 + (beat % 4) as f64,
                // A crude spike train: every tenth sample is a beat.
                ecg: if beat % 10 == 0 { 1.0 } else { 0.05 },
            };

            if !tx.blocking_send(sample) {
                break; // Receiver dropped
            }

            thread::sleep(Duration::from_millis(100));
        }
    });

    // Poll the source in the main thread
    println!("Receiving samples (press Ctrl+C to stop):\n");

    loop {
        if let Some(sample) = source.poll() {
            println!(
                "hr={:3} bpm  spo2={:5.1}%  ecg={:+.2}",
                sample.heart_rate, sample.spo2, sample.ecg
            );
        }

        thread::sleep(Duration::from_millis(50));
    }
}
