//! Name-keyed registry of schemas.
//!
//! The bank maps a fully-qualified message name to a strict decoder. A
//! decoded [`Validated`] value is then checked against the validator for
//! its kind. The bank is built once and never changes.

use std::collections::HashMap;
use std::sync::LazyLock;

use paifu_protocol::lq::ResGameRecord;
use paifu_protocol::{DecodeError, ProtocolError, Record, RecordKind, decode_strict};
use serde_json::Value;
use tracing::trace;

use crate::round::validate_record;
use crate::summary::validate_summary;
use crate::{SchemaViolation, ValidationCause};

/// Message name of the `fetchGameRecord` response body.
pub const RES_GAME_RECORD: &str = ".lq.ResGameRecord";

/// A payload decoded through the bank.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated {
    Summary(ResGameRecord),
    Record(Record),
}

impl Validated {
    /// Runs the validator for this kind of message.
    pub fn check(&self) -> Result<(), SchemaViolation> {
        match self {
            Self::Summary(response) => validate_summary(response),
            Self::Record(record) => validate_record(record),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Summary(response) => serde_json::to_value(response),
            Self::Record(record) => serde_json::to_value(record),
        }
        .unwrap_or_default()
    }
}

type Decoder = fn(&[u8]) -> Result<Validated, DecodeError>;

/// The closed set of message schemas.
pub struct ValidatorBank {
    decoders: HashMap<&'static str, Decoder>,
}

static BANK: LazyLock<ValidatorBank> = LazyLock::new(ValidatorBank::build);

impl ValidatorBank {
    pub fn global() -> &'static Self {
        &BANK
    }

    fn build() -> Self {
        let mut decoders: HashMap<&'static str, Decoder> = HashMap::new();
        decoders.insert(RES_GAME_RECORD, summary);
        for kind in RecordKind::ALL {
            decoders.insert(kind.record_name(), record_decoder(kind));
        }
        Self { decoders }
    }

    /// Strictly decodes `data` as the message `name`.
    pub fn decode(&self, name: &str, data: &[u8]) -> Result<Validated, ValidationCause> {
        let decoder = self
            .decoders
            .get(name)
            .ok_or_else(|| SchemaViolation::new(name, "no schema for this message"))?;
        trace!(name, len = data.len(), "decoding");
        decoder(data).map_err(|e| ProtocolError::from(e).into())
    }

    /// Decodes `data` as the message `name` and validates it.
    pub fn validate(&self, name: &str, data: &[u8]) -> Result<Validated, ValidationCause> {
        let validated = self.decode(name, data)?;
        validated.check()?;
        Ok(validated)
    }

    /// Whether a schema is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    /// Registered names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.decoders.keys().copied()
    }
}

fn summary(data: &[u8]) -> Result<Validated, DecodeError> {
    decode_strict(data).map(Validated::Summary)
}

// Function pointers cannot capture, so each kind gets its own shim.
fn record_decoder(kind: RecordKind) -> Decoder {
    fn decode(kind: RecordKind, data: &[u8]) -> Result<Validated, DecodeError> {
        kind.decode(data).map(Validated::Record)
    }
    match kind {
        RecordKind::NewRound => |d| decode(RecordKind::NewRound, d),
        RecordKind::DealTile => |d| decode(RecordKind::DealTile, d),
        RecordKind::DiscardTile => |d| decode(RecordKind::DiscardTile, d),
        RecordKind::ChiPengGang => |d| decode(RecordKind::ChiPengGang, d),
        RecordKind::AnGangAddGang => |d| decode(RecordKind::AnGangAddGang, d),
        RecordKind::Hule => |d| decode(RecordKind::Hule, d),
        RecordKind::NoTile => |d| decode(RecordKind::NoTile, d),
        RecordKind::LiuJu => |d| decode(RecordKind::LiuJu, d),
    }
}

#[cfg(test)]
mod tests {
    use paifu_protocol::lq::RecordLiuJu;
    use prost::Message;

    use super::*;

    #[test]
    fn test_bank_registers_summary_and_every_record() {
        let bank = ValidatorBank::global();
        assert!(bank.contains(RES_GAME_RECORD));
        for kind in RecordKind::ALL {
            assert!(bank.contains(kind.record_name()), "{kind}");
        }
        assert_eq!(bank.names().count(), 9);
    }

    #[test]
    fn test_validate_unknown_name_is_violation() {
        let err = ValidatorBank::global()
            .validate(".lq.RecordBaBei", &[])
            .unwrap_err();
        assert!(matches!(err, ValidationCause::Violation(ref v) if v.path == ".lq.RecordBaBei"));
    }

    #[test]
    fn test_validate_record_returns_decoded_value() {
        let record = RecordLiuJu {
            r#type: 2,
            ..Default::default()
        };
        let validated = ValidatorBank::global()
            .validate(".lq.RecordLiuJu", &record.encode_to_vec())
            .unwrap();
        assert_eq!(validated, Validated::Record(Record::LiuJu(record)));
    }

    #[test]
    fn test_decode_skips_check() {
        let record = RecordLiuJu {
            r#type: 5,
            ..Default::default()
        };
        let bank = ValidatorBank::global();
        let decoded = bank.decode(".lq.RecordLiuJu", &record.encode_to_vec()).unwrap();
        assert_eq!(decoded.check().unwrap_err().path, "type");
        let err = bank
            .validate(".lq.RecordLiuJu", &record.encode_to_vec())
            .unwrap_err();
        assert!(matches!(err, ValidationCause::Violation(ref v) if v.path == "type"));
    }

    #[test]
    fn test_validate_unknown_field_is_protocol_error() {
        // Field 15 is not part of RecordLiuJu.
        let err = ValidatorBank::global()
            .validate(".lq.RecordLiuJu", &[0x78, 0x01])
            .unwrap_err();
        assert!(matches!(err, ValidationCause::Protocol(_)));
    }
}
