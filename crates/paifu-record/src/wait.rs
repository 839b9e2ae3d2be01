//! Waits and furiten flags.

use paifu_protocol::lq::TingPaiInfo;
use paifu_tile::{InvalidValue, Tile};
use serde::Serialize;

/// One tile a tenpai hand waits on, with what a win on it would score
/// before dora.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TingpaiInfo {
    tile: Tile,
    has_yifan: bool,
    fu_zimo: u32,
    fan_zimo: u32,
    damanguan_zimo: bool,
    fu_rong: u32,
    fan_rong: u32,
    damanguan_rong: bool,
    biao_dora_count: u32,
}

impl TingpaiInfo {
    /// The lowest fu a self-drawn win can carry.
    pub const MIN_FU_ZIMO: u32 = 20;
    /// The lowest fu a win on a discard can carry.
    pub const MIN_FU_RONG: u32 = 25;

    pub fn tile(&self) -> Tile {
        self.tile
    }

    pub fn has_yifan(&self) -> bool {
        self.has_yifan
    }

    pub fn fu_zimo(&self) -> u32 {
        self.fu_zimo
    }

    pub fn fu_rong(&self) -> u32 {
        self.fu_rong
    }

    pub fn biao_dora_count(&self) -> u32 {
        self.biao_dora_count
    }
}

impl TryFrom<&TingPaiInfo> for TingpaiInfo {
    type Error = InvalidValue;

    fn try_from(info: &TingPaiInfo) -> Result<Self, Self::Error> {
        if info.fu_zimo < Self::MIN_FU_ZIMO {
            return Err(InvalidValue::new(format!(
                "{}: An invalid value for `fu_zimo`.",
                info.fu_zimo
            )));
        }
        if info.fu < Self::MIN_FU_RONG {
            return Err(InvalidValue::new(format!(
                "{}: An invalid value for `fu_rong`.",
                info.fu
            )));
        }
        Ok(Self {
            tile: Tile::new(&info.tile)?,
            has_yifan: info.haveyi,
            fu_zimo: info.fu_zimo,
            fan_zimo: info.count_zimo,
            damanguan_zimo: info.yiman_zimo,
            fu_rong: info.fu,
            fan_rong: info.count,
            damanguan_rong: info.yiman,
            biao_dora_count: info.biao_dora_count,
        })
    }
}

pub(crate) fn tingpai_list(infos: &[TingPaiInfo]) -> Result<Vec<TingpaiInfo>, InvalidValue> {
    infos.iter().map(TingpaiInfo::try_from).collect()
}

/// Temporary furiten, one flag per seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZhentingInfo([bool; 4]);

impl ZhentingInfo {
    pub fn flags(self) -> [bool; 4] {
        self.0
    }
}

impl TryFrom<&[bool]> for ZhentingInfo {
    type Error = InvalidValue;

    fn try_from(flags: &[bool]) -> Result<Self, Self::Error> {
        flags
            .try_into()
            .map(Self)
            .map_err(|_| InvalidValue::new("The length of `flags` must be equal to 4."))
    }
}
