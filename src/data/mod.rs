//! Data models and processing for the telemetry stream.
//!
//! ## Submodules
//!
//! - [`sample`]: Wire format decoding ([`TelemetrySample`], [`DecodeError`])
//! - [`buffer`]: Fixed-length rolling ECG window ([`EcgBuffer`])
//! - [`metrics`]: Derived ECG interval figures ([`DerivedMetrics`])
//! - [`history`]: Scalar history for sparklines and rate readouts
//!
//! ## Data Flow
//!
//! ```text
//! raw payload (JSON bytes)
//!        │
//!        ▼
//! TelemetrySample::decode()
//!        │
//!        ├──▶ heart_rate / spo2 scalars (latest value wins)
//!        ├──▶ EcgBuffer::push() (chart window)
//!        ├──▶ IntervalEstimator::estimate() (derived figures)
//!        └──▶ History::record() (sparklines, sample rate)
//! ```

pub mod buffer;
pub mod history;
pub mod metrics;
pub mod sample;

pub use buffer::EcgBuffer;
pub use history::History;
pub use metrics::{DerivedMetrics, IntervalEstimator};
pub use sample::{DecodeError, TelemetrySample};
