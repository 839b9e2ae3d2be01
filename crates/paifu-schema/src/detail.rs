//! Whole-detail validation of a `fetchGameRecord` response.
//!
//! ```text
//! [03][seq][Envelope "" ─ ResGameRecord { head, data }]
//!                                              │
//!                   Envelope ".lq.GameDetailRecords" ─ records[]
//!                                                       │
//!                                   Envelope ".lq.Record*" ─ payload
//! ```
//!
//! Each record is identified by the prefix of its envelope, decoded
//! strictly and, unless validation is off, checked against its schema.
//! Failures carry the round the record belongs to.

use chrono::{DateTime, Utc};
use paifu_capture::Direction;
use paifu_protocol::frame::{Frame, FrameKind, check_response_body};
use paifu_protocol::inspect::inspect;
use paifu_protocol::lq::{GameDetailRecords, RecordGame, ResGameRecord};
use paifu_protocol::{Envelope, MalformedReason, ProtocolError, Record, RecordKind, decode_strict};
use serde_json::Value;
use tracing::debug;

use crate::check::present;
use crate::{
    Location, RES_GAME_RECORD, SchemaViolation, Validated, ValidationCause, ValidationError,
    ValidatorBank,
};

/// Envelope name of the record list inside `ResGameRecord.data`.
pub const GAME_DETAIL_RECORDS: &str = ".lq.GameDetailRecords";

/// A decoded game detail.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDetail {
    pub head: RecordGame,
    /// Records in play order.
    pub records: Vec<Record>,
}

/// What identifies a game before its detail is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameAbstract {
    pub uuid: String,
    pub start_time: DateTime<Utc>,
}

/// Validates a raw `fetchGameRecord` response frame.
pub fn validate_game_detail(message: &[u8]) -> Result<(), ValidationError> {
    read_game_detail(message, true).map(|_| ())
}

/// Decodes a raw `fetchGameRecord` response frame, checking every
/// message against its schema when `validate` is set. Decoding is strict
/// either way.
pub fn read_game_detail(message: &[u8], validate: bool) -> Result<GameDetail, ValidationError> {
    let (response, head) = read_summary(message, validate)?;
    let uuid = head.uuid.as_str();

    let records = decode_record_list(&response.data).map_err(|cause| ValidationError {
        uuid: uuid.to_owned(),
        location: None,
        raw: response.data.clone(),
        json: inspect(&response.data).unwrap_or_default(),
        cause,
    })?;

    let mut walk = Walk {
        uuid,
        coordinates: None,
    };
    let mut decoded = Vec::with_capacity(records.len());
    for (index, raw) in records.iter().enumerate() {
        decoded.push(walk.record(index, raw, validate)?);
    }
    debug!(uuid, records = decoded.len(), validate, "read game detail");

    Ok(GameDetail {
        head,
        records: decoded,
    })
}

/// Reads only the uuid and start time of a `fetchGameRecord` response.
pub fn game_abstract(message: &[u8]) -> Result<GameAbstract, ValidationError> {
    let (_, head) = read_summary(message, false)?;
    let start_time = DateTime::from_timestamp(i64::from(head.start_time), 0).unwrap_or_default();
    Ok(GameAbstract {
        uuid: head.uuid,
        start_time,
    })
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

fn read_summary(
    message: &[u8],
    validate: bool,
) -> Result<(ResGameRecord, RecordGame), ValidationError> {
    let failure = |raw: &[u8], json: Value, cause: ValidationCause| ValidationError {
        uuid: String::new(),
        location: None,
        raw: raw.to_vec(),
        json,
        cause,
    };

    let data = response_payload(message).map_err(|e| failure(message, Value::Null, e.into()))?;
    let validated = ValidatorBank::global()
        .decode(RES_GAME_RECORD, &data)
        .map_err(|cause| failure(&data, inspect(&data).unwrap_or_default(), cause))?;
    if validate {
        validated
            .check()
            .map_err(|e| failure(&data, validated.to_json(), e.into()))?;
    }
    let json = validated.to_json();
    let Validated::Summary(response) = validated else {
        let cause = SchemaViolation::new(RES_GAME_RECORD, "not a game record response");
        return Err(failure(&data, json, cause.into()));
    };
    let head = present(&response.head, "head")
        .map_err(|e| failure(&data, json, e.into()))?
        .clone();
    Ok((response, head))
}

/// Strips the frame header and the nameless response envelope.
fn response_payload(message: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let malformed = |reason| ProtocolError::MalformedFrame {
        direction: Direction::Inbound,
        reason,
        content: message.to_vec(),
    };
    let frame = Frame::parse(message).map_err(malformed)?;
    if frame.kind != FrameKind::Response {
        return Err(malformed(MalformedReason::ResponsePattern));
    }
    check_response_body(frame.body).map_err(malformed)?;
    frame.envelope()?.expect_name("")
}

fn decode_record_list(data: &[u8]) -> Result<Vec<Vec<u8>>, ValidationCause> {
    let payload = Envelope::decode(data)
        .map_err(ProtocolError::from)?
        .expect_name(GAME_DETAIL_RECORDS)?;
    let list: GameDetailRecords = decode_strict(&payload).map_err(ProtocolError::from)?;
    Ok(list.records)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Round coordinates from the most recent `NewRound`.
#[derive(Debug, Clone, Copy)]
struct Coordinates {
    chang: u32,
    ju: u32,
    ben: u32,
}

struct Walk<'a> {
    uuid: &'a str,
    coordinates: Option<Coordinates>,
}

impl Walk<'_> {
    fn record(&mut self, index: usize, raw: &[u8], validate: bool) -> Result<Record, ValidationError> {
        let Some(kind) = RecordKind::detect(raw) else {
            let header = Envelope::decode(raw).map(|e| e.name).unwrap_or_default();
            return Err(self.failure(
                index,
                header,
                raw,
                Value::Null,
                ValidationCause::UnknownRecord(raw.to_vec()),
            ));
        };
        let header = kind.record_name();

        let data = Envelope::decode(raw)
            .map_err(ProtocolError::from)
            .and_then(|e| e.expect_name(header))
            .map_err(|e| self.failure(index, header, raw, Value::Null, e.into()))?;

        let validated = ValidatorBank::global()
            .decode(header, &data)
            .map_err(|cause| {
                let json = inspect(&data).unwrap_or_default();
                self.failure(index, header, raw, json, cause)
            })?;

        if let Validated::Record(Record::NewRound(round)) = &validated {
            self.coordinates = Some(Coordinates {
                chang: round.chang,
                ju: round.ju,
                ben: round.ben,
            });
        }

        if validate {
            validated
                .check()
                .map_err(|e| self.failure(index, header, raw, validated.to_json(), e.into()))?;
        }
        match validated {
            Validated::Record(record) => Ok(record),
            Validated::Summary(_) => Err(self.failure(
                index,
                header,
                raw,
                Value::Null,
                ValidationCause::UnknownRecord(raw.to_vec()),
            )),
        }
    }

    fn failure(
        &self,
        index: usize,
        header: impl Into<String>,
        raw: &[u8],
        json: Value,
        cause: ValidationCause,
    ) -> ValidationError {
        let header = header.into();
        ValidationError {
            uuid: self.uuid.to_owned(),
            location: self.coordinates.map(|c| Location {
                chang: c.chang,
                ju: c.ju,
                ben: c.ben,
                header,
                index,
            }),
            raw: raw.to_vec(),
            json,
            cause,
        }
    }
}
