//! Closed-set value types for paifu.
//!
//! Everything in a game record eventually bottoms out in a handful of
//! tiny vocabularies: the 37 tile codes, the 4 seats, the 3 winds a
//! ranked game can reach, and the fixed tables of tile combinations a
//! meld is allowed to take. This crate owns those vocabularies and
//! nothing else. It has no I/O and no async, so every other crate can
//! depend on it.
//!
//! Construction is the validation: a [`Tile`] that exists is one of the
//! 37 codes, a [`Seat`] that exists is in `0..=3`. Anything else fails
//! with [`InvalidValue`].

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod chang;
mod combination;
mod error;
mod seat;
mod tile;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use chang::Chang;
pub use combination::{Froms, Table, format_combination, parse_combination};
pub use error::InvalidValue;
pub use seat::Seat;
pub use tile::{Suit, Tile};
