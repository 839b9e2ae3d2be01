//! The 37-code tile vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::InvalidValue;

/// Every valid tile code, indexed by [`Tile`]'s inner byte.
///
/// Numbered suits occupy `suit * 10 + rank` where rank 0 is the red
/// five. Honors follow at 30..=36.
const CODES: [&str; 37] = [
    "0m", "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", //
    "0p", "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", //
    "0s", "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", //
    "1z", "2z", "3z", "4z", "5z", "6z", "7z",
];

/// One of the four tile families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suit {
    /// Characters, `m`.
    Manzu,
    /// Circles, `p`.
    Pinzu,
    /// Bamboo, `s`.
    Souzu,
    /// Winds and dragons, `z`.
    Zihai,
}

impl Suit {
    /// The three numbered suits, in code order.
    pub const NUMBERED: [Suit; 3] = [Suit::Manzu, Suit::Pinzu, Suit::Souzu];

    /// The suffix letter used in tile codes.
    pub fn letter(self) -> char {
        match self {
            Self::Manzu => 'm',
            Self::Pinzu => 'p',
            Self::Souzu => 's',
            Self::Zihai => 'z',
        }
    }
}

/// A single tile, e.g. `5m`, `0p` (red five of circles), or `7z`.
///
/// `Tile` is a one-byte `Copy` value. The only way to build one from
/// outside this crate is [`Tile::new`] (or `FromStr` / serde), which
/// rejects anything outside the 37-code vocabulary.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tile(u8);

impl Tile {
    /// Parses a tile code.
    ///
    /// # Errors
    /// Returns [`InvalidValue`] if `code` is not one of the 37 codes.
    pub fn new(code: &str) -> Result<Self, InvalidValue> {
        CODES
            .iter()
            .position(|c| *c == code)
            .map(|i| Self(i as u8))
            .ok_or_else(|| InvalidValue::new(format!("{code}: an invalid tile.")))
    }

    /// Builds a tile from a suit and a rank known to be valid.
    ///
    /// Used by the combination tables, which only ever pass ranks
    /// `0..=9` for numbered suits and `1..=7` for honors.
    pub(crate) const fn from_parts(suit: Suit, rank: u8) -> Self {
        match suit {
            Suit::Manzu => Self(rank),
            Suit::Pinzu => Self(10 + rank),
            Suit::Souzu => Self(20 + rank),
            Suit::Zihai => Self(29 + rank),
        }
    }

    /// Iterates over all 37 tiles in code order.
    pub fn all() -> impl Iterator<Item = Tile> {
        (0..CODES.len() as u8).map(Self)
    }

    /// Returns the two-character code.
    pub fn code(self) -> &'static str {
        CODES[self.0 as usize]
    }

    /// Returns the tile family.
    pub fn suit(self) -> Suit {
        match self.0 {
            0..=9 => Suit::Manzu,
            10..=19 => Suit::Pinzu,
            20..=29 => Suit::Souzu,
            _ => Suit::Zihai,
        }
    }

    /// Returns the rank as written in the code (`0` for a red five).
    pub fn rank(self) -> u8 {
        match self.suit() {
            Suit::Zihai => self.0 - 29,
            _ => self.0 % 10,
        }
    }

    /// Returns the rank a red five stands for.
    pub fn number(self) -> u8 {
        match self.rank() {
            0 => 5,
            r => r,
        }
    }

    /// Returns `true` for `0m`, `0p` and `0s`.
    pub fn is_red(self) -> bool {
        self.suit() != Suit::Zihai && self.rank() == 0
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({})", self.code())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Tile {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Tile {
    type Error = InvalidValue;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Tile> for String {
    fn from(tile: Tile) -> Self {
        tile.code().to_owned()
    }
}
