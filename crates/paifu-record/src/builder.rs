//! The record replay state machine.
//!
//! ```text
//!            NewRound                     Hule / NoTile / LiuJu
//! Awaiting ───────────► InRound(round) ───────────────────────► Awaiting
//!    │                    │   ▲
//!    │ finish()           └───┘ DealTile, DiscardTile, calls, quads
//!    ▼
//! [GameRound]
//! ```
//!
//! [`GameBuilder::finish`] consumes the builder, so a finished builder
//! cannot be fed again.

use paifu_protocol::lq::RecordNewRound;
use paifu_protocol::{Envelope, ProtocolError, Record, RecordKind, hex};
use paifu_schema::{SchemaViolation, read_game_detail, validate_record};
use tracing::{debug, trace, warn};

use crate::error::BuildError;
use crate::game::GameRecord;
use crate::hule::RoundEndByHule;
use crate::round::{GameRound, RoundCoordinates};
use crate::turn::{self, Dapai, NoTile, Turn, Zimo};

/// Where the builder stands between two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Before the first round, or after a round ended.
    AwaitingNewRound,
    /// A round is open and takes turns.
    InRound,
}

#[derive(Debug, Default)]
pub struct GameBuilder {
    current: Option<GameRound>,
    rounds: Vec<GameRound>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BuilderState {
        match self.current {
            Some(_) => BuilderState::InRound,
            None => BuilderState::AwaitingNewRound,
        }
    }

    /// Rounds completed so far.
    pub fn rounds(&self) -> &[GameRound] {
        &self.rounds
    }

    /// Applies one decoded record.
    pub fn push(&mut self, record: &Record) -> Result<(), BuildError> {
        trace!(kind = %record.kind(), "record");
        if let Record::NewRound(deal) = record {
            return self.open(deal);
        }

        let Some(round) = self.current.as_mut() else {
            return Err(BuildError::UnexpectedRecord(record.kind()));
        };
        let coordinates = round.coordinates();
        let turn = to_turn(record).map_err(|e| e.in_round(coordinates))?;
        round
            .push_turn(turn)
            .map_err(|e| BuildError::from(e).in_round(coordinates))?;

        if round.is_over() {
            if let Some(round) = self.current.take() {
                debug!(round = %coordinates, turns = round.turns().len(), "round finished");
                self.rounds.push(round);
            }
        }
        Ok(())
    }

    /// Identifies, decodes and validates one raw record envelope, then
    /// applies it.
    pub fn push_envelope(&mut self, envelope: &[u8]) -> Result<(), BuildError> {
        let kind = RecordKind::detect(envelope).ok_or_else(|| {
            SchemaViolation::new("record", format!("an unknown record: {}", hex(envelope)))
        })?;
        let data = Envelope::decode(envelope)
            .map_err(ProtocolError::from)?
            .expect_name(kind.record_name())?;
        let record = kind.decode(&data).map_err(ProtocolError::from)?;
        validate_record(&record)?;
        self.push(&record)
    }

    /// Ends the game and returns its rounds.
    ///
    /// A round that is still open is kept as it stands.
    pub fn finish(mut self) -> Result<Vec<GameRound>, BuildError> {
        if let Some(round) = self.current.take() {
            warn!(round = %round.coordinates(), "game ended inside a round");
            self.rounds.push(round);
        }
        if self.rounds.is_empty() {
            return Err(BuildError::NoRound);
        }
        Ok(self.rounds)
    }

    fn open(&mut self, deal: &RecordNewRound) -> Result<(), BuildError> {
        let coordinates = RoundCoordinates::of(deal)?;
        let round =
            GameRound::try_from(deal).map_err(|e| BuildError::from(e).in_round(coordinates))?;
        if let Some(previous) = self.current.replace(round) {
            warn!(round = %previous.coordinates(), "round replaced before it ended");
            self.rounds.push(previous);
        }
        debug!(round = %coordinates, "round started");
        Ok(())
    }
}

fn to_turn(record: &Record) -> Result<Turn, BuildError> {
    Ok(match record {
        Record::DealTile(r) => Turn::Zimo(Zimo::try_from(r)?),
        Record::DiscardTile(r) => Turn::Dapai(Dapai::try_from(r)?),
        Record::ChiPengGang(r) => turn::claim(r)?,
        Record::AnGangAddGang(r) => turn::kan(r)?,
        Record::Hule(r) => Turn::Hule(RoundEndByHule::try_from(r)?),
        Record::NoTile(r) => Turn::NoTile(NoTile::try_from(r)?),
        Record::LiuJu(r) => turn::liuju(r)?,
        Record::NewRound(_) => return Err(BuildError::UnexpectedRecord(RecordKind::NewRound)),
    })
}

/// Reconstructs a game from a raw `fetchGameRecord` response frame.
///
/// # Errors
/// Fails with [`BuildError::Validation`] when the detail does not decode
/// or does not match its schemas, and with the other variants when the
/// records do not make a consistent game.
pub fn build_game_record(message: &[u8], validate: bool) -> Result<GameRecord, BuildError> {
    let detail = read_game_detail(message, validate)?;
    let mut game = GameRecord::from_summary(&detail.head)?;

    let mut builder = GameBuilder::new();
    for record in &detail.records {
        builder.push(record)?;
    }
    game.set_rounds(builder.finish()?);
    debug!(uuid = game.uuid(), rounds = game.round_list().len(), "built game record");
    Ok(game)
}
