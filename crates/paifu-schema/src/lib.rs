//! Schemas for the messages of a game detail.
//!
//! Decoding in `paifu-protocol` already rejects unknown fields; this
//! crate checks what the known fields say:
//!
//! - **Summary** ([`validate_summary`]): rule set, accounts and ladder
//!   levels of the `fetchGameRecord` response.
//! - **Records** ([`validate_record`]): one validator per round record,
//!   covering tile codes, seats, meld tables and numeric ranges.
//! - **Bank** ([`ValidatorBank`]): the registry from message name to
//!   strict decoder; the detail walk dispatches through it.
//! - **Detail** ([`read_game_detail`]): the walk over a whole response,
//!   attaching round coordinates to failures.
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), paifu_schema::ValidationError> {
//! let frame = std::fs::read("game.bin").unwrap_or_default();
//! let detail = paifu_schema::read_game_detail(&frame, true)?;
//! println!("{} records", detail.records.len());
//! # Ok(())
//! # }
//! ```
//!
//! Validation is structural. Whether a hand actually scores what it
//! claims is left to the record builder.

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod bank;
mod check;
mod detail;
mod error;
pub mod option;
mod round;
mod summary;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use bank::{RES_GAME_RECORD, Validated, ValidatorBank};
pub use detail::{
    GAME_DETAIL_RECORDS, GameAbstract, GameDetail, game_abstract, read_game_detail,
    validate_game_detail,
};
pub use error::{Location, SchemaViolation, ValidationCause, ValidationError};
pub use round::{LEFT_TILE_COUNT_AFTER_DEAL, validate_record};
pub use summary::{
    AVATAR_FRAMES, CATEGORIES, LEVEL3_IDS, LEVEL4_IDS, MODE_IDS, MODES, TITLES, validate_summary,
};
