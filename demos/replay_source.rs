//! Example: Replaying a recorded session
//!
//! Writes a small recording to a temp file, replays it through
//! [`FileSource`], and prints each sample - the same path the
//! `--replay` CLI mode uses.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example replay_source
//! ```

use std::io::Write;

use vitalwatch::{DataSource, FileSource};

fn main() -> anyhow::Result<()> {
    // Build a short recording: one JSON payload per line, exactly as the
    // device would publish them. One line is deliberately malformed to
    // show that replay skips it.
    let path = std::env::temp_dir().join("vitalwatch_demo_recording.jsonl");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, r#"{{"heart_rate":71,"spo2":97,"ecg":0.05}}"#)?;
    writeln!(file, r#"{{"heart_rate":72,"spo2":97,"ecg":0.9}}"#)?;
    writeln!(file, "not json")?;
    writeln!(file, r#"{{"heart_rate":73,"spo2":98,"ecg":0.1}}"#)?;
    writeln!(file, r#"{{"heart_rate":72}}"#)?;
    drop(file);

    let mut source = FileSource::open(&path)?;
    println!("Replaying {}\n", source.description());

    while let Some(sample) = source.poll() {
        println!(
            "hr={:3} bpm  spo2={:5.1}%  ecg={:+.2}",
            sample.heart_rate, sample.spo2, sample.ecg
        );
    }

    let link = source.link();
    println!("\nLink: {}", link.status.label());
    if let Some(err) = link.error {
        println!("Note: {}", err);
    }

    std::fs::remove_file(&path)?;
    Ok(())
}
