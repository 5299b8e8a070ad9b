//! # vitalwatch
//!
//! A terminal dashboard and library for live vital-sign telemetry.
//!
//! vitalwatch subscribes to a device's MQTT telemetry feed and renders
//! heart rate, SpO2, a scrolling ECG waveform and derived ECG interval
//! figures in an interactive terminal UI, with a one-key export of the
//! current state to a JSON report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(decoding)│    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── MqttSource | FileSource | ChannelSource    │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, export
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) with the
//!   live MQTT link, recorded-file replay, channel input and a simulator
//! - **[`data`]**: Wire decoding, the rolling ECG buffer, derived interval
//!   figures and scalar history
//! - **[`ui`]**: Terminal rendering using ratatui - vitals tiles, the ECG
//!   chart, the intervals table and theme support
//! - **[`config`]**: Connection parameters from file + environment
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live dashboard (broker settings from vitalwatch.toml / VITALWATCH_* env)
//! vitalwatch
//!
//! # No hardware? Run against the built-in simulator
//! vitalwatch --simulate
//!
//! # Replay a captured session and write a report without the TUI
//! vitalwatch --replay session.jsonl --export report.json
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use vitalwatch::{App, ChannelSource};
//!
//! let (tx, source) = ChannelSource::create("my-feed");
//! let app = App::new(Box::new(source), 100);
//! ```
//!
//! ### Decoding payloads directly
//!
//! ```
//! use vitalwatch::TelemetrySample;
//!
//! let sample = TelemetrySample::decode(br#"{"heart_rate":72,"spo2":98,"ecg":0.5}"#).unwrap();
//! assert_eq!(sample.heart_rate, 72);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use config::TelemetryConfig;
pub use data::{DecodeError, DerivedMetrics, EcgBuffer, History, TelemetrySample};
pub use source::{
    ChannelSource, ConnectionStatus, DataSource, FileSource, LinkState, MqttHandle, MqttSource,
    SampleSender,
};
