//! Channel-based data source.
//!
//! Receives samples via a bounded tokio mpsc channel. This is the bridge
//! between async producers (the MQTT task, the simulator) and the
//! synchronous TUI loop, and it is what tests push through.

use tokio::sync::mpsc;

use super::{DataSource, LinkMonitor, LinkState};
use crate::data::TelemetrySample;

/// How many samples may queue between producer and TUI before the
/// producer has to wait. The TUI drains every tick, so this only needs to
/// absorb short bursts.
const CHANNEL_CAPACITY: usize = 256;

/// A data source that receives samples through a channel.
///
/// Samples are delivered strictly in send order. After
/// [`close`](Self::close) the source never yields another sample, even
/// if the producer is still sending.
///
/// # Example
///
/// ```
/// use vitalwatch::{ChannelSource, DataSource, TelemetrySample};
///
/// # tokio_test::block_on(async {
/// let (tx, mut source) = ChannelSource::create("bridge");
/// tx.send(TelemetrySample { heart_rate: 70, spo2: 97.0, ecg: 0.1 }).await;
/// assert_eq!(source.poll().unwrap().heart_rate, 70);
/// # });
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<TelemetrySample>,
    description: String,
    link: LinkMonitor,
    closed: bool,
}

/// Producer half paired with a [`ChannelSource`].
///
/// Cloneable; also carries the shared [`LinkMonitor`] so the producer can
/// publish connection-state transitions.
#[derive(Debug, Clone)]
pub struct SampleSender {
    sender: mpsc::Sender<TelemetrySample>,
    link: LinkMonitor,
}

impl SampleSender {
    /// Send a sample from async context. Returns false once the source
    /// has been dropped or closed.
    pub async fn send(&self, sample: TelemetrySample) -> bool {
        self.sender.send(sample).await.is_ok()
    }

    /// Send a sample from a plain thread. Returns false once the source
    /// has been dropped or closed.
    pub fn blocking_send(&self, sample: TelemetrySample) -> bool {
        self.sender.blocking_send(sample).is_ok()
    }

    /// Publish a connection-state transition.
    pub fn set_link(&self, state: LinkState) {
        self.link.set(state);
    }
}

impl ChannelSource {
    /// Create a sender/source pair.
    ///
    /// `description` names where the samples come from, e.g.
    /// `"mqtt://broker/devices/health"` or `"simulator"`.
    pub fn create(description: &str) -> (SampleSender, Self) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let link = LinkMonitor::new();
        let sender = SampleSender {
            sender: tx,
            link: link.clone(),
        };
        let source = Self {
            receiver: rx,
            description: description.to_string(),
            link,
            closed: false,
        };
        (sender, source)
    }

    /// Stop observing the producer.
    ///
    /// Any samples already queued or sent later are discarded; `poll`
    /// returns `None` from here on.
    pub fn close(&mut self) {
        self.closed = true;
        self.receiver.close();
        self.link.set(LinkState::disconnected("closed by viewer"));
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<TelemetrySample> {
        if self.closed {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(sample) => Some(sample),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn link(&self) -> LinkState {
        self.link.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ConnectionStatus;

    fn sample(ecg: f64) -> TelemetrySample {
        TelemetrySample {
            heart_rate: 72,
            spo2: 98.0,
            ecg,
        }
    }

    #[tokio::test]
    async fn test_samples_arrive_in_order() {
        let (tx, mut source) = ChannelSource::create("test");
        assert!(source.poll().is_none());

        for i in 0..5 {
            assert!(tx.send(sample(i as f64)).await);
        }

        for i in 0..5 {
            assert_eq!(source.poll().unwrap().ecg, i as f64);
        }
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_link_transitions_are_visible() {
        let (tx, source) = ChannelSource::create("test");
        assert_eq!(source.link().status, ConnectionStatus::Disconnected);

        tx.set_link(LinkState::connected());
        assert!(source.link().is_connected());

        tx.set_link(LinkState::disconnected("broker closed the connection"));
        let state = source.link();
        assert_eq!(state.status, ConnectionStatus::Disconnected);
        assert!(state.error.is_some());
    }

    #[tokio::test]
    async fn test_close_discards_queued_and_late_samples() {
        let (tx, mut source) = ChannelSource::create("test");
        assert!(tx.send(sample(1.0)).await);

        source.close();

        // Queued sample is not observed, and late sends are ignored.
        assert!(source.poll().is_none());
        let _ = tx.send(sample(2.0)).await;
        assert!(source.poll().is_none());
    }

    #[tokio::test]
    async fn test_poll_after_sender_drop() {
        let (tx, mut source) = ChannelSource::create("test");
        assert!(tx.send(sample(1.0)).await);
        drop(tx);

        // Already queued samples still drain, then the source goes quiet.
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_description() {
        let (_tx, source) = ChannelSource::create("simulator");
        assert_eq!(source.description(), "simulator");
    }
}
