//! What a player may do when the game waits on them.
//!
//! After a draw (or a call that leaves a tile to discard) the acting
//! seat is offered [`ZimoOption`]s. After a discard every other seat
//! that can react is offered [`DapaiOption`]s. Both arrive as an
//! `OptionalOperationList` with a thinking-time budget.

use paifu_protocol::lq::{OptionalOperation, OptionalOperationList};
use paifu_schema::option::op;
use paifu_tile::{InvalidValue, Seat, Table, Tile, parse_combination};
use serde::Serialize;

use crate::tiles;

/// An option offered to the seat whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ZimoOption {
    /// Tiles that may not be discarded right after a call.
    #[serde(rename = "打牌")]
    Dapai { tiles: Vec<Tile> },
    #[serde(rename = "暗槓")]
    Angang { tiles: Vec<Tile> },
    #[serde(rename = "加槓")]
    Jiagang { tiles: Vec<Tile> },
    /// Discards that would leave the hand in tenpai.
    #[serde(rename = "立直")]
    Lizhi { tiles: Vec<Tile> },
    #[serde(rename = "自摸和")]
    Hu,
    #[serde(rename = "九種九牌")]
    Kyushukyuhai,
}

/// An option offered in reaction to another seat's discard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DapaiOption {
    /// The pairs from hand that complete a run with the discard.
    #[serde(rename = "チー")]
    Chi { tiles_list: Vec<Vec<Tile>> },
    #[serde(rename = "ポン")]
    Peng { tiles: Vec<Vec<Tile>> },
    #[serde(rename = "大明槓")]
    Daminggang { tiles: Vec<Tile> },
    #[serde(rename = "栄和")]
    Rong,
}

/// Decoding of one wire option into the options it stands for.
pub trait PlayerOption: Sized {
    fn decode(option: &OptionalOperation) -> Result<Vec<Self>, InvalidValue>;
}

fn combination(entry: &str, table: Table) -> Result<Vec<Tile>, InvalidValue> {
    let tiles = parse_combination(entry)?;
    if !table.contains(&tiles) {
        return Err(InvalidValue::new(format!(
            "{entry}: An invalid combination for {table:?}."
        )));
    }
    Ok(tiles)
}

fn no_combination(option: &OptionalOperation) -> Result<(), InvalidValue> {
    if option.combination.is_empty() {
        Ok(())
    } else {
        Err(InvalidValue::new(format!(
            "type == {}, combination == {:?}: An unexpected combination.",
            option.r#type, option.combination
        )))
    }
}

impl PlayerOption for ZimoOption {
    fn decode(option: &OptionalOperation) -> Result<Vec<Self>, InvalidValue> {
        let entries = &option.combination;
        Ok(match option.r#type {
            op::DAPAI => vec![Self::Dapai {
                tiles: tiles(entries)?,
            }],
            // Each combination is a separate quad the player could declare.
            op::ANGANG => entries
                .iter()
                .map(|e| combination(e, Table::AngangOption).map(|tiles| Self::Angang { tiles }))
                .collect::<Result<_, _>>()?,
            op::JIAGANG => entries
                .iter()
                .map(|e| combination(e, Table::JiagangOption).map(|tiles| Self::Jiagang { tiles }))
                .collect::<Result<_, _>>()?,
            op::LIZHI => vec![Self::Lizhi {
                tiles: tiles(entries)?,
            }],
            op::ZIMOHU => {
                no_combination(option)?;
                vec![Self::Hu]
            }
            op::KYUSHUKYUHAI => {
                no_combination(option)?;
                vec![Self::Kyushukyuhai]
            }
            other => {
                return Err(InvalidValue::new(format!(
                    "type == {other}: Not a self-draw option."
                )));
            }
        })
    }
}

impl PlayerOption for DapaiOption {
    fn decode(option: &OptionalOperation) -> Result<Vec<Self>, InvalidValue> {
        let entries = &option.combination;
        let pairs = |table| {
            entries
                .iter()
                .map(|e| combination(e, table))
                .collect::<Result<Vec<_>, _>>()
        };
        let option = match option.r#type {
            op::CHI => Self::Chi {
                tiles_list: pairs(Table::ChiPair)?,
            },
            op::PENG => Self::Peng {
                tiles: pairs(Table::PengPair)?,
            },
            op::DAMINGGANG => match entries.as_slice() {
                [entry] => Self::Daminggang {
                    tiles: combination(entry, Table::DaminggangOption)?,
                },
                _ => {
                    return Err(InvalidValue::new(format!(
                        "{entries:?}: An open quad offers exactly one combination."
                    )));
                }
            },
            op::RONG => {
                no_combination(option)?;
                Self::Rong
            }
            other => {
                return Err(InvalidValue::new(format!(
                    "type == {other}: Not a reaction to a discard."
                )));
            }
        };
        Ok(vec![option])
    }
}

/// The options offered to one seat, with its thinking time in
/// milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionPresence<O> {
    seat: Seat,
    options: Vec<O>,
    main_time: u32,
    overtime: u32,
}

pub type ZimoOptionPresence = OptionPresence<ZimoOption>;
pub type DapaiOptionPresence = OptionPresence<DapaiOption>;

impl<O> OptionPresence<O> {
    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn options(&self) -> &[O] {
        &self.options
    }

    pub fn main_time(&self) -> u32 {
        self.main_time
    }

    pub fn overtime(&self) -> u32 {
        self.overtime
    }
}

impl<O: PlayerOption> TryFrom<&OptionalOperationList> for OptionPresence<O> {
    type Error = InvalidValue;

    fn try_from(list: &OptionalOperationList) -> Result<Self, Self::Error> {
        if list.time_fixed == 0 {
            return Err(InvalidValue::new("`main_time` must be a positive integer."));
        }
        let mut options = Vec::with_capacity(list.operation_list.len());
        for option in &list.operation_list {
            options.extend(O::decode(option)?);
        }
        Ok(Self {
            seat: Seat::new(list.seat)?,
            options,
            main_time: list.time_fixed,
            overtime: list.time_add,
        })
    }
}
