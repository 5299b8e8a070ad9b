//! Wire format decoding for telemetry samples.
//!
//! Each inbound message carries one JSON object with optional numeric
//! fields `heart_rate`, `spo2` and `ecg`. Missing fields read as zero so
//! a sensor that only reports heart rate still produces a usable sample.
//! Anything that is not a JSON object is malformed and gets discarded by
//! the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when decoding an inbound payload.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload was not a JSON object with the expected field types.
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One decoded telemetry message: the current scalar vitals plus a single
/// ECG trace sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSample")]
pub struct TelemetrySample {
    /// Heart rate in beats per minute.
    pub heart_rate: u16,
    /// Peripheral oxygen saturation, percent in [0, 100].
    pub spo2: f64,
    /// One signed ECG sample.
    pub ecg: f64,
}

/// Wire-shape intermediate. Everything is an optional float on the wire;
/// clamping to the domain types happens in the conversion.
#[derive(Debug, Default, Deserialize)]
struct RawSample {
    #[serde(default)]
    heart_rate: f64,
    #[serde(default)]
    spo2: f64,
    #[serde(default)]
    ecg: f64,
}

impl From<RawSample> for TelemetrySample {
    fn from(raw: RawSample) -> Self {
        // Devices occasionally emit junk during power-up; clamp rather
        // than reject so the stream keeps flowing.
        let heart_rate = if raw.heart_rate.is_finite() {
            raw.heart_rate.round().clamp(0.0, u16::MAX as f64) as u16
        } else {
            0
        };
        let spo2 = if raw.spo2.is_finite() {
            raw.spo2.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let ecg = if raw.ecg.is_finite() { raw.ecg } else { 0.0 };

        Self {
            heart_rate,
            spo2,
            ecg,
        }
    }
}

impl TelemetrySample {
    /// Decode one raw payload.
    ///
    /// Returns [`DecodeError::Malformed`] if the bytes are not a JSON
    /// object; missing numeric fields are substituted with zero and never
    /// cause an error.
    pub fn decode(payload: &[u8]) -> Result<Self, DecodeError> {
        Ok(serde_json::from_slice(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let sample =
            TelemetrySample::decode(br#"{"heart_rate":72,"spo2":98,"ecg":0.5}"#).unwrap();
        assert_eq!(sample.heart_rate, 72);
        assert_eq!(sample.spo2, 98.0);
        assert_eq!(sample.ecg, 0.5);
    }

    #[test]
    fn test_decode_missing_fields_default_to_zero() {
        let sample = TelemetrySample::decode(br#"{"heart_rate":72}"#).unwrap();
        assert_eq!(sample.heart_rate, 72);
        assert_eq!(sample.spo2, 0.0);
        assert_eq!(sample.ecg, 0.0);

        let empty = TelemetrySample::decode(b"{}").unwrap();
        assert_eq!(empty.heart_rate, 0);
        assert_eq!(empty.spo2, 0.0);
        assert_eq!(empty.ecg, 0.0);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(TelemetrySample::decode(b"not json").is_err());
        assert!(TelemetrySample::decode(b"").is_err());
        // Parseable JSON that is not an object is still malformed.
        assert!(TelemetrySample::decode(b"42").is_err());
        assert!(TelemetrySample::decode(b"[1,2,3]").is_err());
        assert!(TelemetrySample::decode(br#""heart_rate""#).is_err());
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let sample =
            TelemetrySample::decode(br#"{"heart_rate":60,"spo2":95,"ecg":-0.2,"battery":87}"#)
                .unwrap();
        assert_eq!(sample.heart_rate, 60);
        assert_eq!(sample.spo2, 95.0);
        assert_eq!(sample.ecg, -0.2);
    }

    #[test]
    fn test_decode_clamps_out_of_range_values() {
        let sample =
            TelemetrySample::decode(br#"{"heart_rate":-10,"spo2":130.5,"ecg":-1.5}"#).unwrap();
        assert_eq!(sample.heart_rate, 0);
        assert_eq!(sample.spo2, 100.0);
        assert_eq!(sample.ecg, -1.5);
    }

    #[test]
    fn test_roundtrip_preserves_values() {
        let original = br#"{"heart_rate":72,"spo2":98.5,"ecg":0.25}"#;
        let sample = TelemetrySample::decode(original).unwrap();

        let encoded = serde_json::to_vec(&sample).unwrap();
        let again = TelemetrySample::decode(&encoded).unwrap();
        assert_eq!(sample, again);
    }
}
