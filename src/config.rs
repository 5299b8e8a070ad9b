//! Connection and display configuration.
//!
//! Everything the link needs - broker address, credentials, topic - lives
//! in an explicit [`TelemetryConfig`] constructed at startup, layered from
//! an optional TOML file under `VITALWATCH_*` environment variables.
//! Credentials therefore come from the environment or a secrets file, not
//! from source literals.
//!
//! ```bash
//! export VITALWATCH_BROKER_URL="wss://broker.example:8884/mqtt"
//! export VITALWATCH_USERNAME="viewer"
//! export VITALWATCH_PASSWORD="..."
//! vitalwatch
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Connection parameters for the telemetry feed plus display settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Broker address. `wss://` / `ws://` URLs use websocket transport;
    /// a bare host (optionally `mqtt://` / `tcp://`) uses plain TCP.
    pub broker_url: String,
    /// Broker port; ignored by websocket transports, which take the port
    /// from the URL.
    pub port: u16,
    /// Username for broker authentication; empty for anonymous.
    pub username: String,
    /// Password for broker authentication.
    pub password: String,
    /// Topic the device publishes samples on.
    pub topic: String,
    /// MQTT client identifier; empty picks a per-process default.
    pub client_id: String,
    /// MQTT protocol version selector. Only 4 (3.1.1) is supported.
    pub protocol_version: u8,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u64,
    /// Width of the ECG chart window, in samples.
    pub ecg_window: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            broker_url: "wss://localhost:8884/mqtt".to_string(),
            port: 8884,
            username: String::new(),
            password: String::new(),
            topic: "devices/health".to_string(),
            client_id: String::new(),
            protocol_version: 4,
            keep_alive_secs: 30,
            ecg_window: 100,
        }
    }
}

impl TelemetryConfig {
    /// Load configuration: defaults, then the file (if it exists), then
    /// `VITALWATCH_*` environment variables on top.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("VITALWATCH"))
            .build()
            .with_context(|| format!("loading configuration from {}", path.display()))?;

        let cfg: TelemetryConfig = settings
            .try_deserialize()
            .context("invalid configuration values")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the link cannot work with before any terminal setup.
    pub fn validate(&self) -> Result<()> {
        if self.broker_url.trim().is_empty() {
            bail!("broker_url must not be empty");
        }
        if self.topic.trim().is_empty() {
            bail!("topic must not be empty");
        }
        if self.ecg_window == 0 {
            bail!("ecg_window must be at least 1");
        }
        if self.protocol_version != 4 {
            bail!(
                "unsupported MQTT protocol version {} (only 4 is supported)",
                self.protocol_version
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = TelemetryConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.ecg_window, 100);
        assert_eq!(cfg.protocol_version, 4);
        assert_eq!(cfg.topic, "devices/health");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
broker_url = "wss://broker.example:8884/mqtt"
username = "viewer"
topic = "ward7/bed3/vitals"
ecg_window = 250
"#
        )
        .unwrap();
        file.flush().unwrap();

        let cfg = TelemetryConfig::load(file.path()).unwrap();
        assert_eq!(cfg.broker_url, "wss://broker.example:8884/mqtt");
        assert_eq!(cfg.username, "viewer");
        assert_eq!(cfg.topic, "ward7/bed3/vitals");
        assert_eq!(cfg.ecg_window, 250);
        // Unset fields keep their defaults.
        assert_eq!(cfg.keep_alive_secs, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = TelemetryConfig::load(Path::new("/nonexistent/vitalwatch.toml")).unwrap();
        assert_eq!(cfg.broker_url, TelemetryConfig::default().broker_url);
    }

    #[test]
    fn test_rejects_zero_window() {
        let cfg = TelemetryConfig {
            ecg_window: 0,
            ..TelemetryConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_unknown_protocol_version() {
        let cfg = TelemetryConfig {
            protocol_version: 5,
            ..TelemetryConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("protocol version"));
    }

    #[test]
    fn test_rejects_empty_topic() {
        let cfg = TelemetryConfig {
            topic: "  ".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
