//! The eight per-round record types of a game detail.
//!
//! A game detail is a list of envelopes, each wrapping one
//! `.lq.Record*` message. The same eight messages also travel live as
//! the payload of `.lq.Action*` notifications, which is how the action
//! registry reuses them.

use std::fmt;

use serde::Serialize;

use crate::lq::{
    RecordAnGangAddGang, RecordChiPengGang, RecordDealTile, RecordDiscardTile, RecordHule,
    RecordLiuJu, RecordNewRound, RecordNoTile,
};
use crate::shape::decode_strict;
use crate::DecodeError;

/// Which record a payload holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    NewRound,
    DealTile,
    DiscardTile,
    ChiPengGang,
    AnGangAddGang,
    Hule,
    NoTile,
    LiuJu,
}

impl RecordKind {
    pub const ALL: [Self; 8] = [
        Self::NewRound,
        Self::DealTile,
        Self::DiscardTile,
        Self::ChiPengGang,
        Self::AnGangAddGang,
        Self::Hule,
        Self::NoTile,
        Self::LiuJu,
    ];

    /// The fully-qualified name used in game-detail envelopes.
    pub fn record_name(self) -> &'static str {
        match self {
            Self::NewRound => ".lq.RecordNewRound",
            Self::DealTile => ".lq.RecordDealTile",
            Self::DiscardTile => ".lq.RecordDiscardTile",
            Self::ChiPengGang => ".lq.RecordChiPengGang",
            Self::AnGangAddGang => ".lq.RecordAnGangAddGang",
            Self::Hule => ".lq.RecordHule",
            Self::NoTile => ".lq.RecordNoTile",
            Self::LiuJu => ".lq.RecordLiuJu",
        }
    }

    /// The fully-qualified name of the live action with the same layout.
    pub fn action_name(self) -> &'static str {
        match self {
            Self::NewRound => ".lq.ActionNewRound",
            Self::DealTile => ".lq.ActionDealTile",
            Self::DiscardTile => ".lq.ActionDiscardTile",
            Self::ChiPengGang => ".lq.ActionChiPengGang",
            Self::AnGangAddGang => ".lq.ActionAnGangAddGang",
            Self::Hule => ".lq.ActionHule",
            Self::NoTile => ".lq.ActionNoTile",
            Self::LiuJu => ".lq.ActionLiuJu",
        }
    }

    pub fn from_record_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.record_name() == name)
    }

    /// Whether `envelope` starts with the serialized name field of this
    /// record followed by the data tag: `0a LEN NAME 12`.
    pub fn matches_prefix(self, envelope: &[u8]) -> bool {
        let name = self.record_name().as_bytes();
        let Some(rest) = envelope.strip_prefix(&[0x0a, name.len() as u8][..]) else {
            return false;
        };
        rest.strip_prefix(name)
            .is_some_and(|rest| rest.first() == Some(&0x12))
    }

    /// Identifies a record envelope by its prefix bytes alone.
    pub fn detect(envelope: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.matches_prefix(envelope))
    }

    /// Strictly decodes a payload of this kind.
    pub fn decode(self, data: &[u8]) -> Result<Record, DecodeError> {
        Ok(match self {
            Self::NewRound => Record::NewRound(decode_strict(data)?),
            Self::DealTile => Record::DealTile(decode_strict(data)?),
            Self::DiscardTile => Record::DiscardTile(decode_strict(data)?),
            Self::ChiPengGang => Record::ChiPengGang(decode_strict(data)?),
            Self::AnGangAddGang => Record::AnGangAddGang(decode_strict(data)?),
            Self::Hule => Record::Hule(decode_strict(data)?),
            Self::NoTile => Record::NoTile(decode_strict(data)?),
            Self::LiuJu => Record::LiuJu(decode_strict(data)?),
        })
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.record_name())
    }
}

/// A decoded record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    NewRound(RecordNewRound),
    DealTile(RecordDealTile),
    DiscardTile(RecordDiscardTile),
    ChiPengGang(RecordChiPengGang),
    AnGangAddGang(RecordAnGangAddGang),
    Hule(RecordHule),
    NoTile(RecordNoTile),
    LiuJu(RecordLiuJu),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::NewRound(_) => RecordKind::NewRound,
            Self::DealTile(_) => RecordKind::DealTile,
            Self::DiscardTile(_) => RecordKind::DiscardTile,
            Self::ChiPengGang(_) => RecordKind::ChiPengGang,
            Self::AnGangAddGang(_) => RecordKind::AnGangAddGang,
            Self::Hule(_) => RecordKind::Hule,
            Self::NoTile(_) => RecordKind::NoTile,
            Self::LiuJu(_) => RecordKind::LiuJu,
        }
    }
}
