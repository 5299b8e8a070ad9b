//! Data source abstraction for receiving telemetry samples.
//!
//! This module provides a trait-based abstraction for receiving samples
//! from various backends - the live MQTT link, recorded-file replay, or
//! in-memory channels (tests, simulator).

mod channel;
mod file;
mod mqtt;
pub mod simulate;

pub use channel::{ChannelSource, SampleSender};
pub use file::FileSource;
pub use mqtt::{MqttHandle, MqttSource};

use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use crate::data::TelemetrySample;

/// Connection state of the telemetry transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    /// No connection, either not yet started or cleanly closed.
    #[default]
    Disconnected,
    /// Connection in progress, no broker acknowledgment yet.
    Connecting,
    /// Connected and subscribed.
    Connected,
    /// The transport reported an error; the client may retry on its own.
    Error,
}

impl ConnectionStatus {
    /// Returns the display label for this status.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Error",
        }
    }
}

/// Connection status plus the last transport error, if any.
#[derive(Debug, Clone, Default)]
pub struct LinkState {
    pub status: ConnectionStatus,
    pub error: Option<String>,
}

impl LinkState {
    pub fn connecting() -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            error: None,
        }
    }

    pub fn connected() -> Self {
        Self {
            status: ConnectionStatus::Connected,
            error: None,
        }
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            error: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ConnectionStatus::Error,
            error: Some(message.into()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Shared, cheaply clonable view of the transport state.
///
/// The producer side (MQTT task, replay reader) writes transitions; the
/// consuming source hands out snapshots to the UI.
#[derive(Debug, Clone, Default)]
pub struct LinkMonitor {
    state: Arc<Mutex<LinkState>>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current state.
    pub fn set(&self, state: LinkState) {
        *self.state.lock().expect("link state poisoned") = state;
    }

    /// Snapshot the current state.
    pub fn snapshot(&self) -> LinkState {
        self.state.lock().expect("link state poisoned").clone()
    }
}

/// Trait for receiving telemetry samples from various sources.
///
/// # Example
///
/// ```
/// use vitalwatch::{ChannelSource, DataSource};
///
/// let (_tx, mut source) = ChannelSource::create("demo");
/// assert!(source.poll().is_none());
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the next sample, in delivery order.
    ///
    /// Returns `Some(sample)` if one is available, `None` otherwise.
    /// This method must be non-blocking.
    fn poll(&mut self) -> Option<TelemetrySample>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the status bar and in export reports.
    fn description(&self) -> &str;

    /// Snapshot of the transport connection state.
    fn link(&self) -> LinkState;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(ConnectionStatus::Disconnected.label(), "Disconnected");
        assert_eq!(ConnectionStatus::Connected.label(), "Connected");
    }

    #[test]
    fn test_link_monitor_roundtrip() {
        let monitor = LinkMonitor::new();
        assert_eq!(monitor.snapshot().status, ConnectionStatus::Disconnected);

        monitor.set(LinkState::connected());
        assert!(monitor.snapshot().is_connected());
        assert!(monitor.snapshot().error.is_none());

        monitor.set(LinkState::error("connection refused"));
        let state = monitor.snapshot();
        assert_eq!(state.status, ConnectionStatus::Error);
        assert_eq!(state.error.as_deref(), Some("connection refused"));
    }
}
