//! Table positions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InvalidValue;

/// One of the four table positions, `0..=3`.
///
/// Seats are fixed for the whole game; the dealer rotates over them
/// (the dealer of a round is the seat whose index equals `ju`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u8")]
pub struct Seat(u8);

impl Seat {
    /// All four seats in order.
    pub const ALL: [Seat; 4] = [Seat(0), Seat(1), Seat(2), Seat(3)];

    /// Creates a seat from a wire integer.
    ///
    /// # Errors
    /// Returns [`InvalidValue`] unless `index` is in `0..=3`.
    pub fn new(index: u32) -> Result<Self, InvalidValue> {
        if index < 4 {
            Ok(Self(index as u8))
        } else {
            Err(InvalidValue::new(format!("{index}: an invalid seat.")))
        }
    }

    /// Returns the seat as a `usize`, for indexing per-seat arrays.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Seat {
    type Error = InvalidValue;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> Self {
        seat.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_new_accepts_zero_to_three() {
        for i in 0..4 {
            assert_eq!(Seat::new(i).unwrap().index(), i as usize);
        }
    }

    #[test]
    fn test_seat_new_rejects_four() {
        let err = Seat::new(4).unwrap_err();
        assert!(err.message().contains('4'));
    }

    #[test]
    fn test_seat_serde_as_integer() {
        assert_eq!(serde_json::to_string(&Seat::ALL[2]).unwrap(), "2");
        assert!(serde_json::from_str::<Seat>("5").is_err());
    }
}
