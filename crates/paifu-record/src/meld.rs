//! Exposed sets in a winning hand.

use std::fmt;

use paifu_tile::{InvalidValue, Table, Tile};
use serde::Serialize;

/// The four kinds of meld a winning hand can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MingKind {
    /// A run, `shunzi(..)` on the wire.
    #[serde(rename = "順子")]
    Shunzi,
    /// A triplet, `kezi(..)`.
    #[serde(rename = "刻子")]
    Kezi,
    /// An open or added quad, `minggang(..)`.
    #[serde(rename = "明槓子")]
    Minggangzi,
    /// A concealed quad, `angang(..)`.
    #[serde(rename = "暗槓子")]
    Angangzi,
}

impl MingKind {
    fn wire_name(self) -> &'static str {
        match self {
            Self::Shunzi => "shunzi",
            Self::Kezi => "kezi",
            Self::Minggangzi => "minggang",
            Self::Angangzi => "angang",
        }
    }

    fn table(self) -> Table {
        match self {
            Self::Shunzi => Table::Chi,
            Self::Kezi => Table::Peng,
            Self::Minggangzi | Self::Angangzi => Table::QuadMeld,
        }
    }

    fn arity(self) -> usize {
        match self {
            Self::Shunzi | Self::Kezi => 3,
            Self::Minggangzi | Self::Angangzi => 4,
        }
    }
}

impl fmt::Display for MingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A meld: its kind plus 3 or 4 tiles from the kind's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ming {
    #[serde(rename = "type")]
    kind: MingKind,
    tiles: Vec<Tile>,
}

impl Ming {
    pub fn new(kind: MingKind, tiles: Vec<Tile>) -> Result<Self, InvalidValue> {
        if tiles.len() != kind.arity() {
            return Err(InvalidValue::new(format!(
                "The length of `tiles` must be equal to {}.",
                kind.arity()
            )));
        }
        if !kind.table().contains(&tiles) {
            let codes: Vec<&str> = tiles.iter().map(|t| t.code()).collect();
            return Err(InvalidValue::new(format!(
                "{codes:?}: An invalid combination for {kind}."
            )));
        }
        Ok(Self { kind, tiles })
    }

    /// Parses the wire form, e.g. `kezi(5z,5z,5z)`.
    pub fn parse(text: &str) -> Result<Self, InvalidValue> {
        let unknown = || InvalidValue::new(format!("ming == {text}: An unknown meld."));
        let (name, rest) = text.split_once('(').ok_or_else(unknown)?;
        let body = rest.strip_suffix(')').ok_or_else(unknown)?;
        let kind = [
            MingKind::Shunzi,
            MingKind::Kezi,
            MingKind::Minggangzi,
            MingKind::Angangzi,
        ]
        .into_iter()
        .find(|k| k.wire_name() == name)
        .ok_or_else(unknown)?;
        let tiles = body
            .split(',')
            .map(Tile::new)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(kind, tiles)
    }

    pub fn kind(&self) -> MingKind {
        self.kind
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}
