//! Live MQTT telemetry link.
//!
//! Owns one rumqttc client and its event loop on a background tokio task.
//! The task drives the connection state machine
//! (Disconnected → Connecting → Connected, with Error on transport
//! failures), decodes every publish on the subscribed topic, and forwards
//! samples to a [`ChannelSource`] consumed by the TUI loop.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   background tokio task                     │
//! │  ┌───────────┐   ConnAck/Publish/Err   ┌─────────────────┐  │
//! │  │ rumqttc   │────────────────────────▶│ decode + link   │  │
//! │  │ EventLoop │                         │ state machine   │  │
//! │  └───────────┘                         └───────┬─────────┘  │
//! └────────────────────────────────────────────────┼────────────┘
//!                               samples (mpsc) +   │  LinkMonitor
//!                                                  ▼
//!                                         ┌─────────────────┐
//!                                         │ ChannelSource   │ (TUI)
//!                                         └─────────────────┘
//! ```
//!
//! Teardown is scoped: dropping the [`MqttHandle`] aborts the task, and
//! [`MqttHandle::shutdown`] performs a graceful broker disconnect. The
//! handle is consumed by `shutdown`, so the close signal can only be
//! issued once no matter how many reconnects happened in between.

use std::time::Duration;

use anyhow::{bail, Result};
use rumqttc::{AsyncClient, ConnectReturnCode, Event, MqttOptions, Packet, QoS, Transport};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ChannelSource, LinkMonitor, LinkState, SampleSender};
use crate::config::TelemetryConfig;
use crate::data::TelemetrySample;

/// Wait before letting the event loop re-dial after a transport error.
const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Grace period for the final broker disconnect during shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// The live MQTT data source.
///
/// There is no struct to hold: [`MqttSource::connect`] returns the
/// [`ChannelSource`] the TUI polls plus the [`MqttHandle`] guarding the
/// background task.
pub struct MqttSource;

/// Scoped guard over the background link task.
///
/// While the guard lives, the subscription is active. `shutdown` closes
/// the link gracefully; dropping the guard aborts the task outright.
#[derive(Debug)]
pub struct MqttHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl MqttHandle {
    /// Close the link: signal the task, let it send the MQTT DISCONNECT,
    /// and wait briefly for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await.is_err() {
                warn!("link task did not stop in time");
            }
        }
    }
}

impl Drop for MqttHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl MqttSource {
    /// Open the link described by `config` and subscribe to its topic.
    ///
    /// Must be called from within a tokio runtime; the connection itself
    /// is established asynchronously by the spawned task, so this returns
    /// immediately with the source reporting `Connecting`.
    pub async fn connect(config: &TelemetryConfig) -> Result<(ChannelSource, MqttHandle)> {
        let options = mqtt_options(config)?;
        let topic = config.topic.clone();

        let description = format!("mqtt: {} [{}]", config.broker_url, topic);
        let (sender, source) = ChannelSource::create(&description);
        sender.set_link(LinkState::connecting());

        let (client, eventloop) = AsyncClient::new(options, 32);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        info!(broker = %config.broker_url, topic = %topic, "opening telemetry link");

        let task = tokio::spawn(run_link(client, eventloop, topic, sender, shutdown_rx));

        Ok((
            source,
            MqttHandle {
                shutdown: Some(shutdown_tx),
                task: Some(task),
            },
        ))
    }
}

/// Build client options from the connection parameters.
///
/// The transport follows the URL scheme: `wss://` and `ws://` use the
/// websocket transports (the full URL is the broker address), anything
/// else is treated as a plain TCP host.
pub(crate) fn mqtt_options(config: &TelemetryConfig) -> Result<MqttOptions> {
    if config.protocol_version != 4 {
        bail!(
            "unsupported MQTT protocol version {} (only 4 is supported)",
            config.protocol_version
        );
    }

    let client_id = if config.client_id.is_empty() {
        format!("vitalwatch-{}", std::process::id())
    } else {
        config.client_id.clone()
    };

    let url = config.broker_url.trim();
    let mut options = if url.starts_with("wss://") {
        let mut o = MqttOptions::new(client_id, url, config.port);
        o.set_transport(Transport::wss_with_default_config());
        o
    } else if url.starts_with("ws://") {
        let mut o = MqttOptions::new(client_id, url, config.port);
        o.set_transport(Transport::ws());
        o
    } else {
        let host = url
            .trim_start_matches("mqtt://")
            .trim_start_matches("tcp://");
        MqttOptions::new(client_id, host, config.port)
    };

    if !config.username.is_empty() {
        options.set_credentials(&config.username, &config.password);
    }
    options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

    Ok(options)
}

/// Drive the event loop until shutdown or until the TUI drops the source.
async fn run_link(
    client: AsyncClient,
    mut eventloop: rumqttc::EventLoop,
    topic: String,
    sender: SampleSender,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                // Graceful close; ignore failures since we are leaving anyway.
                let _ = client.disconnect().await;
                sender.set_link(LinkState::disconnected("link closed"));
                info!("telemetry link closed");
                return;
            }
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    if ack.code == ConnectReturnCode::Success {
                        sender.set_link(LinkState::connected());
                        // The broker forgets subscriptions across
                        // reconnects, so re-issue on every ConnAck.
                        if let Err(e) = client.subscribe(&topic, QoS::AtMostOnce).await {
                            sender.set_link(LinkState::error(format!("subscribe failed: {e}")));
                        } else {
                            info!(topic = %topic, "subscribed");
                        }
                    } else {
                        sender.set_link(LinkState::error(format!(
                            "broker refused connection: {:?}",
                            ack.code
                        )));
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match TelemetrySample::decode(&publish.payload) {
                        Ok(sample) => {
                            debug!(topic = %publish.topic, "sample received");
                            if !sender.send(sample).await {
                                // Viewer is gone; stop the loop.
                                return;
                            }
                        }
                        Err(e) => {
                            warn!(topic = %publish.topic, error = %e, "discarding malformed payload");
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    sender.set_link(LinkState::disconnected("broker closed the connection"));
                }
                Ok(_) => {}
                Err(e) => {
                    sender.set_link(LinkState::error(e.to_string()));
                    // The event loop re-dials on the next poll; pace it, but
                    // stay responsive to shutdown.
                    tokio::select! {
                        _ = &mut shutdown => {
                            sender.set_link(LinkState::disconnected("link closed"));
                            return;
                        }
                        _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                    }
                }
            }
        }
    }
}
