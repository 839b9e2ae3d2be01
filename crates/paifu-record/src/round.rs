//! One round: the deal and the turns that follow it.

use std::fmt;

use paifu_protocol::lq::RecordNewRound;
use paifu_tile::{Chang, InvalidValue, Seat, Tile};
use serde::Serialize;

use crate::option::ZimoOptionPresence;
use crate::turn::Turn;
use crate::wait::TingpaiInfo;
use crate::{four, tiles};

/// Where a round sits in the game: `東1局0本場` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundCoordinates {
    pub chang: Chang,
    /// Dealer index, `0..=3`.
    pub ju: u32,
    /// Repeat counter.
    pub ben: u32,
}

impl RoundCoordinates {
    /// Reads the coordinates of a deal, if its wind is one a ranked
    /// game can reach.
    pub fn of(record: &RecordNewRound) -> Result<Self, InvalidValue> {
        Ok(Self {
            chang: Chang::from_index(record.chang)?,
            ju: record.ju,
            ben: record.ben,
        })
    }
}

impl fmt::Display for RoundCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}局{}本場", self.chang, self.ju + 1, self.ben)
    }
}

// ---------------------------------------------------------------------------
// Hand counting
// ---------------------------------------------------------------------------

/// Tiles in hand per seat, concealed and melded.
///
/// After every turn the acting seat must hold 14 tiles (counting a meld
/// as 3) if it still has to discard, and 13 otherwise.
#[derive(Debug, Clone)]
struct HandCounter {
    concealed: [i32; 4],
    melds: [i32; 4],
}

impl HandCounter {
    fn new(dealer: Seat) -> Self {
        let mut concealed = [13; 4];
        concealed[dealer.index()] = 14;
        Self {
            concealed,
            melds: [0; 4],
        }
    }

    fn apply(&mut self, turn: &Turn) -> Result<(), InvalidValue> {
        let (seat, concealed, melds, expected) = match turn {
            Turn::Zimo(zimo) => (zimo.seat, 1, 0, 14),
            Turn::Chi(claim) | Turn::Peng(claim) => (claim.seat, -2, 1, 14),
            Turn::Daminggang(gang) => (gang.seat, -3, 1, 13),
            Turn::Angang(kan) => (kan.seat, -4, 1, 13),
            Turn::Jiagang(kan) => (kan.seat, -1, 0, 13),
            Turn::Dapai(dapai) => (dapai.seat, -1, 0, 13),
            _ => return Ok(()),
        };
        let i = seat.index();
        self.concealed[i] += concealed;
        self.melds[i] += melds;
        let total = self.concealed[i] + 3 * self.melds[i];
        if self.concealed[i] < 0 || total != expected {
            return Err(InvalidValue::new(format!(
                "seat {seat} holds {total} tiles after {}, expected {expected}.",
                turn.label()
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// A seat in tenpai straight from the deal, with one of its waits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitialTingpai {
    pub seat: Seat,
    pub tingpai: TingpaiInfo,
}

/// A round as dealt and as played.
#[derive(Debug, Clone, Serialize)]
pub struct GameRound {
    chang: Chang,
    ju: u32,
    ben: u32,
    lizhibang: u32,
    initial_scores: [i32; 4],
    qipai_list: Vec<Vec<Tile>>,
    /// The whole wall in draw order.
    paishan: Vec<Tile>,
    /// MD5 of the wall, published before the round starts.
    paishan_code: String,
    dora: Tile,
    tingpai_list: Vec<InitialTingpai>,
    /// What the dealer may do with the first discard.
    option_presence: ZimoOptionPresence,
    left_tile_count: u32,
    turns: Vec<Turn>,
    #[serde(skip)]
    counter: HandCounter,
}

fn paishan(text: &str) -> Result<Vec<Tile>, InvalidValue> {
    if !text.is_ascii() || text.len() % 2 != 0 {
        return Err(InvalidValue::new(format!("{text}: An invalid wall.")));
    }
    (0..text.len())
        .step_by(2)
        .map(|i| Tile::new(&text[i..i + 2]))
        .collect()
}

impl TryFrom<&RecordNewRound> for GameRound {
    type Error = InvalidValue;

    fn try_from(record: &RecordNewRound) -> Result<Self, Self::Error> {
        let coordinates = RoundCoordinates::of(record)?;
        let dealer = Seat::new(record.ju)?;

        let initial_scores = four(&record.scores, "initial_scores")?;
        if initial_scores.iter().any(|&s| s < 0) {
            return Err(InvalidValue::new(
                "All the elements in `initial_scores` must be a non-negative integer.",
            ));
        }

        let qipai_list = record
            .hands()
            .iter()
            .map(|hand| tiles(hand))
            .collect::<Result<Vec<_>, _>>()?;
        for (seat, hand) in Seat::ALL.into_iter().zip(&qipai_list) {
            let expected = if seat == dealer { 14 } else { 13 };
            if hand.len() != expected {
                return Err(InvalidValue::new(format!(
                    "The length of `qipai_list` for seat {seat} must be equal to {expected}."
                )));
            }
        }

        let dora = record
            .doras
            .first()
            .ok_or_else(|| InvalidValue::new("A deal without a dora indicator."))
            .and_then(|code| Tile::new(code))?;

        let mut tingpai_list = Vec::new();
        for entry in &record.tingpai {
            if let Some(first) = entry.tingpais1.first() {
                tingpai_list.push(InitialTingpai {
                    seat: Seat::new(entry.seat)?,
                    tingpai: TingpaiInfo::try_from(first)?,
                });
            }
        }

        let option_presence = record
            .operation
            .as_ref()
            .ok_or_else(|| InvalidValue::new("A deal without options for the dealer."))
            .and_then(ZimoOptionPresence::try_from)?;

        Ok(Self {
            chang: coordinates.chang,
            ju: coordinates.ju,
            ben: coordinates.ben,
            lizhibang: record.liqibang,
            initial_scores,
            qipai_list,
            paishan: paishan(&record.paishan)?,
            paishan_code: record.md5.clone(),
            dora,
            tingpai_list,
            option_presence,
            left_tile_count: record.left_tile_count,
            turns: Vec::new(),
            counter: HandCounter::new(dealer),
        })
    }
}

impl GameRound {
    pub fn coordinates(&self) -> RoundCoordinates {
        RoundCoordinates {
            chang: self.chang,
            ju: self.ju,
            ben: self.ben,
        }
    }

    pub fn initial_scores(&self) -> [i32; 4] {
        self.initial_scores
    }

    pub fn qipai_list(&self) -> &[Vec<Tile>] {
        &self.qipai_list
    }

    pub fn paishan(&self) -> &[Tile] {
        &self.paishan
    }

    pub fn dora(&self) -> Tile {
        self.dora
    }

    pub fn tingpai_list(&self) -> &[InitialTingpai] {
        &self.tingpai_list
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Whether the last turn ended the round.
    pub fn is_over(&self) -> bool {
        self.turns.last().is_some_and(Turn::ends_round)
    }

    /// Appends a turn after checking it against the hands at the table.
    pub fn push_turn(&mut self, turn: Turn) -> Result<(), InvalidValue> {
        self.counter.apply(&turn)?;
        self.turns.push(turn);
        Ok(())
    }
}
