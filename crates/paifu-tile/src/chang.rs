//! Round winds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::InvalidValue;

/// The prevailing wind of a round.
///
/// Ranked games never go past West, so the vocabulary stops there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chang {
    #[serde(rename = "東")]
    East,
    #[serde(rename = "南")]
    South,
    #[serde(rename = "西")]
    West,
}

impl Chang {
    /// Maps the wire index `0..=2` to a wind.
    ///
    /// # Errors
    /// Returns [`InvalidValue`] for any other index.
    pub fn from_index(index: u32) -> Result<Self, InvalidValue> {
        match index {
            0 => Ok(Self::East),
            1 => Ok(Self::South),
            2 => Ok(Self::West),
            _ => Err(InvalidValue::new(format!("{index}: an invalid chang."))),
        }
    }

    /// The single-character label used in output documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::East => "東",
            Self::South => "南",
            Self::West => "西",
        }
    }
}

impl fmt::Display for Chang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chang_from_index_and_label() {
        assert_eq!(Chang::from_index(0).unwrap().label(), "東");
        assert_eq!(Chang::from_index(1).unwrap().to_string(), "南");
        assert_eq!(Chang::from_index(2).unwrap(), Chang::West);
        assert!(Chang::from_index(3).is_err());
    }

    #[test]
    fn test_chang_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Chang::East).unwrap(), "\"東\"");
    }
}
