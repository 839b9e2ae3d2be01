//! The single error type of the value layer.

/// A value fell outside its closed vocabulary or violated a domain
/// invariant.
///
/// Raised by every constructor in the value and domain layers (tiles,
/// melds, scores, hand lengths). The payload is a readable message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct InvalidValue(String);

impl InvalidValue {
    /// Creates a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.0
    }
}
