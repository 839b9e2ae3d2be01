//! The turns of a round.
//!
//! Every record after `RecordNewRound` becomes exactly one [`Turn`]. The
//! conversions below only read what the record carries; whether the turn
//! fits the hands at the table is checked when it is appended to a
//! [`GameRound`](crate::GameRound).

use paifu_protocol::lq::{
    NoTilePlayerInfo, RecordAnGangAddGang, RecordChiPengGang, RecordDealTile, RecordDiscardTile,
    RecordLiuJu, RecordNoTile,
};
use paifu_tile::{Froms, InvalidValue, Seat, Table, Tile};
use serde::Serialize;

use crate::hule::RoundEndByHule;
use crate::option::{DapaiOptionPresence, ZimoOptionPresence};
use crate::tiles;
use crate::wait::{TingpaiInfo, ZhentingInfo, tingpai_list};

/// One step of play. Serialized with its Japanese name under `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Turn {
    #[serde(rename = "自摸")]
    Zimo(Zimo),
    #[serde(rename = "チー")]
    Chi(Claim),
    #[serde(rename = "ポン")]
    Peng(Claim),
    #[serde(rename = "大明槓")]
    Daminggang(Daminggang),
    #[serde(rename = "暗槓")]
    Angang(Kan),
    #[serde(rename = "加槓")]
    Jiagang(Kan),
    #[serde(rename = "打牌")]
    Dapai(Dapai),
    #[serde(rename = "和了")]
    Hule(RoundEndByHule),
    #[serde(rename = "荒牌平局")]
    NoTile(NoTile),
    #[serde(rename = "九種九牌")]
    Kyushukyuhai(Kyushukyuhai),
    #[serde(rename = "四風子連打")]
    Sifengzilianda,
    #[serde(rename = "四槓散了")]
    Sigangsanle,
    #[serde(rename = "四家立直")]
    Sijializhi,
}

impl Turn {
    /// Whether this turn ends the round.
    pub fn ends_round(&self) -> bool {
        matches!(
            self,
            Self::Hule(_)
                | Self::NoTile(_)
                | Self::Kyushukyuhai(_)
                | Self::Sifengzilianda
                | Self::Sigangsanle
                | Self::Sijializhi
        )
    }

    /// The Japanese name used as the `type` of the turn.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zimo(_) => "自摸",
            Self::Chi(_) => "チー",
            Self::Peng(_) => "ポン",
            Self::Daminggang(_) => "大明槓",
            Self::Angang(_) => "暗槓",
            Self::Jiagang(_) => "加槓",
            Self::Dapai(_) => "打牌",
            Self::Hule(_) => "和了",
            Self::NoTile(_) => "荒牌平局",
            Self::Kyushukyuhai(_) => "九種九牌",
            Self::Sifengzilianda => "四風子連打",
            Self::Sigangsanle => "四槓散了",
            Self::Sijializhi => "四家立直",
        }
    }
}

fn zhenting(flags: &[bool]) -> Result<ZhentingInfo, InvalidValue> {
    ZhentingInfo::try_from(flags)
}

// ---------------------------------------------------------------------------
// Draw
// ---------------------------------------------------------------------------

/// A draw, from the wall or the dead wall.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zimo {
    pub seat: Seat,
    pub tile: Tile,
    pub left_tile_count: u32,
    /// Absent when the draw offers nothing, e.g. a draw in riichi with
    /// no win or quad possible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_presence: Option<ZimoOptionPresence>,
    pub zhenting: ZhentingInfo,
    /// New dora indicators revealed by a preceding quad.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub doras: Vec<Tile>,
}

impl TryFrom<&RecordDealTile> for Zimo {
    type Error = InvalidValue;

    fn try_from(record: &RecordDealTile) -> Result<Self, Self::Error> {
        Ok(Self {
            seat: Seat::new(record.seat)?,
            tile: Tile::new(&record.tile)?,
            left_tile_count: record.left_tile_count,
            option_presence: record
                .operation
                .as_ref()
                .map(ZimoOptionPresence::try_from)
                .transpose()?,
            zhenting: zhenting(&record.zhenting)?,
            doras: tiles(&record.doras)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// `RecordChiPengGang.type` codes.
const CHI: u32 = 0;
const PENG: u32 = 1;
const DAMINGGANG: u32 = 2;

/// A chi or a pon. The claimed tile is the last of `tiles`, and
/// `froms[i]` is the seat tile `i` came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub seat: Seat,
    pub tiles: Vec<Tile>,
    pub froms: Vec<Seat>,
    pub zhenting: ZhentingInfo,
    pub option_presence: ZimoOptionPresence,
}

/// An open quad on a discard. The replacement draw that follows carries
/// the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Daminggang {
    pub seat: Seat,
    pub tiles: Vec<Tile>,
    pub froms: Vec<Seat>,
    pub zhenting: ZhentingInfo,
}

fn meld(record: &RecordChiPengGang, table: Table, froms: Froms) -> Result<(Vec<Tile>, Vec<Seat>), InvalidValue> {
    let tiles = tiles(&record.tiles)?;
    if !table.contains(&tiles) {
        return Err(InvalidValue::new(format!(
            "{:?}: An invalid tile combination for {table:?}.",
            record.tiles
        )));
    }
    if !froms.contains(&record.froms) {
        return Err(InvalidValue::new(format!(
            "{:?}: An invalid seat combination for {froms:?}.",
            record.froms
        )));
    }
    let froms = record
        .froms
        .iter()
        .map(|&s| Seat::new(s))
        .collect::<Result<_, _>>()?;
    Ok((tiles, froms))
}

/// Converts a call record into a chi, pon or open quad turn.
pub fn claim(record: &RecordChiPengGang) -> Result<Turn, InvalidValue> {
    let seat = Seat::new(record.seat)?;
    let zhenting = zhenting(&record.zhenting)?;
    let presence = || {
        record
            .operation
            .as_ref()
            .ok_or_else(|| InvalidValue::new("A chi or a pon must offer a discard."))
            .and_then(ZimoOptionPresence::try_from)
    };
    Ok(match record.r#type {
        CHI => {
            let (tiles, froms) = meld(record, Table::Chi, Froms::Chi)?;
            Turn::Chi(Claim {
                seat,
                tiles,
                froms,
                zhenting,
                option_presence: presence()?,
            })
        }
        PENG => {
            let (tiles, froms) = meld(record, Table::Peng, Froms::Peng)?;
            Turn::Peng(Claim {
                seat,
                tiles,
                froms,
                zhenting,
                option_presence: presence()?,
            })
        }
        DAMINGGANG => {
            let (tiles, froms) = meld(record, Table::Daminggang, Froms::Daminggang)?;
            Turn::Daminggang(Daminggang {
                seat,
                tiles,
                froms,
                zhenting,
            })
        }
        other => {
            return Err(InvalidValue::new(format!("type == {other}: An unknown call.")));
        }
    })
}

/// A concealed or added quad, named by one of its tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kan {
    pub seat: Seat,
    pub tile: Tile,
}

/// `RecordAnGangAddGang.type` codes.
const JIAGANG: u32 = 2;
const ANGANG: u32 = 3;

/// Converts a quad declaration into a concealed or added quad turn.
pub fn kan(record: &RecordAnGangAddGang) -> Result<Turn, InvalidValue> {
    let kan = Kan {
        seat: Seat::new(record.seat)?,
        tile: Tile::new(&record.tiles)?,
    };
    match record.r#type {
        ANGANG => Ok(Turn::Angang(kan)),
        JIAGANG => Ok(Turn::Jiagang(kan)),
        other => Err(InvalidValue::new(format!("type == {other}: An unknown quad."))),
    }
}

// ---------------------------------------------------------------------------
// Discard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dapai {
    pub seat: Seat,
    pub tile: Tile,
    /// Discarded straight after drawing it.
    pub moqie: bool,
    pub lizhi: bool,
    pub double_lizhi: bool,
    /// Waits of the discarder after this discard.
    pub tingpai_list: Vec<TingpaiInfo>,
    pub zhenting: ZhentingInfo,
    /// Reactions offered to the other seats.
    pub option_presence_list: Vec<DapaiOptionPresence>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub doras: Vec<Tile>,
}

impl TryFrom<&RecordDiscardTile> for Dapai {
    type Error = InvalidValue;

    fn try_from(record: &RecordDiscardTile) -> Result<Self, Self::Error> {
        Ok(Self {
            seat: Seat::new(record.seat)?,
            tile: Tile::new(&record.tile)?,
            moqie: record.moqie,
            lizhi: record.is_liqi,
            double_lizhi: record.is_wliqi,
            tingpai_list: tingpai_list(&record.tingpais)?,
            zhenting: zhenting(&record.zhenting)?,
            option_presence_list: record
                .operations
                .iter()
                .map(DapaiOptionPresence::try_from)
                .collect::<Result<_, _>>()?,
            doras: tiles(&record.doras)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Exhaustive draw
// ---------------------------------------------------------------------------

/// How one seat stood when the wall ran out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerResultOnNoTile {
    pub tingpai: bool,
    pub tingpai_list: Vec<TingpaiInfo>,
    pub old_score: i32,
    pub delta_score: i32,
    /// The revealed hand of a seat in tenpai.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<Tile>>,
}

impl PlayerResultOnNoTile {
    fn new(player: &NoTilePlayerInfo, old_score: i32, delta_score: i32) -> Result<Self, InvalidValue> {
        if player.tingpai == player.hand.is_empty() {
            return Err(InvalidValue::new(format!(
                "tingpai == {}, hand == {:?}: Inconsistency between `tingpai` and `hand`.",
                player.tingpai, player.hand
            )));
        }
        if player.tingpai == player.tings.is_empty() {
            return Err(InvalidValue::new(format!(
                "tingpai == {}: Inconsistency between `tingpai` and `tingpai_list`.",
                player.tingpai
            )));
        }
        Ok(Self {
            tingpai: player.tingpai,
            tingpai_list: tingpai_list(&player.tings)?,
            old_score,
            delta_score,
            hand: if player.tingpai {
                Some(tiles(&player.hand)?)
            } else {
                None
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoTile {
    pub liujumanguan: bool,
    pub player_results: Vec<PlayerResultOnNoTile>,
}

impl TryFrom<&RecordNoTile> for NoTile {
    type Error = InvalidValue;

    fn try_from(record: &RecordNoTile) -> Result<Self, Self::Error> {
        if record.players.len() != 4 {
            return Err(InvalidValue::new(
                "The length of `player_results` must be equal to 4.",
            ));
        }
        let scores = record
            .scores
            .first()
            .ok_or_else(|| InvalidValue::new("An exhaustive draw without scores."))?;
        let deltas = match scores.delta_scores.len() {
            0 => [0; 4],
            4 => crate::four(&scores.delta_scores, "delta_scores")?,
            n => {
                return Err(InvalidValue::new(format!(
                    "{n}: An invalid length for `delta_scores`."
                )));
            }
        };
        let old_scores = crate::four(&scores.old_scores, "old_scores")?;

        let player_results = record
            .players
            .iter()
            .zip(old_scores.into_iter().zip(deltas))
            .map(|(player, (old, delta))| PlayerResultOnNoTile::new(player, old, delta))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            liujumanguan: record.liujumanguan,
            player_results,
        })
    }
}

// ---------------------------------------------------------------------------
// Abortive draws
// ---------------------------------------------------------------------------

/// Nine different terminals and honors in the first draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kyushukyuhai {
    pub seat: Seat,
    pub hand: Vec<Tile>,
}

/// `RecordLiuJu.type` codes.
const JIUZHONGJIUPAI: u32 = 1;
const SIFENGLIANDA: u32 = 2;
const SIGANGSANLE: u32 = 3;
const SIJIALIZHI: u32 = 4;

/// Converts an abortive draw into its turn.
pub fn liuju(record: &RecordLiuJu) -> Result<Turn, InvalidValue> {
    match record.r#type {
        JIUZHONGJIUPAI => {
            let hand = tiles(&record.tiles)?;
            if hand.len() != 14 {
                return Err(InvalidValue::new("The length of `hand` must be equal to 14."));
            }
            Ok(Turn::Kyushukyuhai(Kyushukyuhai {
                seat: Seat::new(record.seat)?,
                hand,
            }))
        }
        SIFENGLIANDA => Ok(Turn::Sifengzilianda),
        SIGANGSANLE => Ok(Turn::Sigangsanle),
        SIJIALIZHI => Ok(Turn::Sijializhi),
        other => Err(InvalidValue::new(format!(
            "type == {other}: An unknown abortive draw."
        ))),
    }
}
