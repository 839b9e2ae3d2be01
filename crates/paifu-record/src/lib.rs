//! Turn-by-turn reconstruction of Mahjong Soul game records.
//!
//! `paifu-schema` hands over a decoded game detail: a summary plus a
//! flat list of round records. This crate replays that list through a
//! small state machine and produces a [`GameRecord`], the typed and
//! JSON-serializable form of the game:
//!
//! ```text
//! RecordGame ──► GameRecord { mode, accounts, ... }
//!                     │
//! Record* ──► GameBuilder ──► GameRound { deal, turns: [Turn] } ×N
//! ```
//!
//! Every value is checked on the way in. A hand that ends up with the
//! wrong number of tiles, a win whose fan does not fit its title or a
//! draw that pays the wrong seats fails with a [`BuildError`] naming the
//! round it happened in.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod builder;
mod error;
mod game;
pub mod hule;
pub mod meld;
pub mod option;
mod round;
pub mod turn;
pub mod wait;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use builder::{BuilderState, GameBuilder, build_game_record};
pub use error::BuildError;
pub use game::{Account, AccountLevel, GameRecord, mode_label};
pub use round::{GameRound, InitialTingpai, RoundCoordinates};
pub use turn::Turn;

use paifu_tile::{InvalidValue, Tile};

// ---------------------------------------------------------------------------
// Shared conversions
// ---------------------------------------------------------------------------

pub(crate) fn tiles(codes: &[String]) -> Result<Vec<Tile>, InvalidValue> {
    codes.iter().map(|code| Tile::new(code)).collect()
}

pub(crate) fn four<T: Copy>(values: &[T], name: &str) -> Result<[T; 4], InvalidValue> {
    values
        .try_into()
        .map_err(|_| InvalidValue::new(format!("The length of `{name}` must be equal to 4.")))
}
