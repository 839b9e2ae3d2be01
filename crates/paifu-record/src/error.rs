//! Error types for the record builder.

use paifu_protocol::{ProtocolError, RecordKind};
use paifu_schema::{SchemaViolation, ValidationError};
use paifu_tile::InvalidValue;

use crate::RoundCoordinates;

/// Errors that can occur while reconstructing a game record.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A decoded value broke a domain invariant (hand length, fu range,
    /// payment fields, ...).
    #[error(transparent)]
    InvalidValue(#[from] InvalidValue),

    /// A single record failed its schema.
    #[error(transparent)]
    Violation(#[from] SchemaViolation),

    /// The whole-detail walk failed before any turn was built.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("No game round is found.")]
    NoRound,

    /// A round record arrived while no round was open, either before the
    /// first round or after the previous one ended.
    #[error("{0} arrived outside of a round")]
    UnexpectedRecord(RecordKind),

    /// A failure inside a round, tagged with where it happened.
    #[error("{coordinates}: {source}")]
    InRound {
        coordinates: RoundCoordinates,
        #[source]
        source: Box<BuildError>,
    },
}

impl BuildError {
    /// Wraps `self` with the coordinates of the round it happened in.
    pub fn in_round(self, coordinates: RoundCoordinates) -> Self {
        Self::InRound {
            coordinates,
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through [`BuildError::InRound`].
    pub fn root(&self) -> &BuildError {
        match self {
            Self::InRound { source, .. } => source.root(),
            other => other,
        }
    }
}
