//! The envelope written to the queue for each mirrored exchange.
//!
//! ```json
//! {"request_direction":"outbound","request":"AgcACi...","response":"AwcACgA...","timestamp":1609459200.25}
//! ```
//!
//! Frames are base64 (standard alphabet, padded); `response` is `null`
//! for notifications; `timestamp` is float seconds since the epoch.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use paifu_capture::Direction;
use paifu_protocol::Exchange;
use serde::{Deserialize, Serialize};

use crate::MirrorError;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Wire {
    request_direction: Direction,
    request: String,
    response: Option<String>,
    timestamp: f64,
}

/// A captured exchange as it travels through the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirroredMessage {
    pub request_direction: Direction,
    pub request: Vec<u8>,
    pub response: Option<Vec<u8>>,
    pub timestamp: DateTime<Utc>,
}

impl MirroredMessage {
    pub fn from_exchange(exchange: &Exchange, timestamp: DateTime<Utc>) -> Self {
        Self {
            request_direction: exchange.request_direction,
            request: exchange.request.clone(),
            response: exchange.response.clone(),
            timestamp,
        }
    }

    /// Serializes to compact JSON.
    pub fn encode(&self) -> Result<Vec<u8>, MirrorError> {
        let wire = Wire {
            request_direction: self.request_direction,
            request: STANDARD.encode(&self.request),
            response: self.response.as_ref().map(|r| STANDARD.encode(r)),
            timestamp: timestamp_to_seconds(self.timestamp),
        };
        Ok(serde_json::to_vec(&wire)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MirrorError> {
        let wire: Wire = serde_json::from_slice(bytes)?;
        Ok(Self {
            request_direction: wire.request_direction,
            request: STANDARD.decode(&wire.request)?,
            response: wire.response.map(|r| STANDARD.decode(r)).transpose()?,
            timestamp: seconds_to_timestamp(wire.timestamp)?,
        })
    }
}

/// Microsecond precision, which an f64 holds exactly for present-day
/// timestamps.
pub(crate) fn timestamp_to_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp_micros() as f64 / 1e6
}

pub(crate) fn seconds_to_timestamp(seconds: f64) -> Result<DateTime<Utc>, MirrorError> {
    let invalid = || MirrorError::Timestamp(seconds.to_string());
    if !seconds.is_finite() {
        return Err(invalid());
    }
    DateTime::from_timestamp_micros((seconds * 1e6).round() as i64).ok_or_else(invalid)
}
