//! Shapes shared between records: waits, riichi notices and the option
//! lists presented to players.

use paifu_protocol::lq::{LiQiSuccess, OptionalOperation, OptionalOperationList, TingPaiInfo};
use paifu_tile::Table;

use crate::check::{
    Check, at_least, child, combinations, empty, equals, fail, item, len_in, seat, tile, tiles,
};

/// Option type codes on the wire.
pub mod op {
    pub const DAPAI: u32 = 1;
    pub const CHI: u32 = 2;
    pub const PENG: u32 = 3;
    pub const ANGANG: u32 = 4;
    pub const DAMINGGANG: u32 = 5;
    pub const JIAGANG: u32 = 6;
    pub const LIZHI: u32 = 7;
    pub const ZIMOHU: u32 = 8;
    pub const RONG: u32 = 9;
    pub const KYUSHUKYUHAI: u32 = 10;
}

/// A waiting tile. Winning by discard always carries at least 25 fu,
/// by self-draw at least 20.
pub fn validate_tingpai(info: &TingPaiInfo, path: &str) -> Check {
    tile(&info.tile, &child(path, "tile"))?;
    at_least(info.fu, 25, &child(path, "fu"))?;
    at_least(info.fu_zimo, 20, &child(path, "fu_zimo"))
}

pub fn validate_tingpais(infos: &[TingPaiInfo], path: &str) -> Check {
    for (i, info) in infos.iter().enumerate() {
        validate_tingpai(info, &item(path, i))?;
    }
    Ok(())
}

/// The riichi that became effective with the previous discard.
pub fn validate_liqi(liqi: &LiQiSuccess, path: &str) -> Check {
    seat(liqi.seat, &child(path, "seat"))?;
    at_least(liqi.score, 0, &child(path, "score"))?;
    equals(&liqi.failed, &false, &child(path, "failed"))
}

fn validate_unused_change_fields(option: &OptionalOperation, path: &str) -> Check {
    empty(&option.change_tiles, &child(path, "change_tiles"))?;
    empty(&option.change_tile_states, &child(path, "change_tile_states"))
}

/// One option offered to the player whose turn it is.
pub fn validate_zimo_option(option: &OptionalOperation, path: &str) -> Check {
    validate_unused_change_fields(option, path)?;
    let combination = child(path, "combination");
    let entries = &option.combination;
    match option.r#type {
        // Tiles the player may not discard after a call; usually empty.
        op::DAPAI => tiles(entries, &combination),
        op::ANGANG => {
            len_in(entries.len(), 1, 3, &combination)?;
            combinations(entries, Table::AngangOption, &combination)
        }
        op::JIAGANG => {
            len_in(entries.len(), 1, 3, &combination)?;
            combinations(entries, Table::JiagangOption, &combination)
        }
        op::LIZHI => {
            len_in(entries.len(), 1, usize::MAX, &combination)?;
            tiles(entries, &combination)
        }
        op::ZIMOHU | op::KYUSHUKYUHAI => empty(entries, &combination),
        other => Err(fail(
            &child(path, "type"),
            format!("{other} is not a self-draw option"),
        )),
    }
}

/// The options offered after a draw or a call. The list may be empty
/// for a player in riichi, whose discard is automatic.
pub fn validate_zimo_presence(presence: &OptionalOperationList, path: &str) -> Check {
    seat(presence.seat, &child(path, "seat"))?;
    let list = child(path, "operation_list");
    for (i, option) in presence.operation_list.iter().enumerate() {
        validate_zimo_option(option, &item(&list, i))?;
    }
    Ok(())
}

/// One option offered in reaction to a discard.
pub fn validate_dapai_option(option: &OptionalOperation, path: &str) -> Check {
    validate_unused_change_fields(option, path)?;
    let combination = child(path, "combination");
    let entries = &option.combination;
    match option.r#type {
        op::CHI => {
            len_in(entries.len(), 1, usize::MAX, &combination)?;
            combinations(entries, Table::ChiPair, &combination)
        }
        op::PENG => {
            len_in(entries.len(), 1, usize::MAX, &combination)?;
            combinations(entries, Table::PengPair, &combination)
        }
        op::DAMINGGANG => {
            len_in(entries.len(), 1, 1, &combination)?;
            combinations(entries, Table::DaminggangOption, &combination)
        }
        op::RONG => empty(entries, &combination),
        other => Err(fail(
            &child(path, "type"),
            format!("{other} is not a reaction to a discard"),
        )),
    }
}

/// Options offered to one opponent in reaction to a discard or a quad.
pub fn validate_dapai_presence(presence: &OptionalOperationList, path: &str) -> Check {
    seat(presence.seat, &child(path, "seat"))?;
    let list = child(path, "operation_list");
    len_in(presence.operation_list.len(), 1, usize::MAX, &list)?;
    for (i, option) in presence.operation_list.iter().enumerate() {
        validate_dapai_option(option, &item(&list, i))?;
    }
    Ok(())
}

pub fn validate_dapai_presences(presences: &[OptionalOperationList], path: &str) -> Check {
    for (i, presence) in presences.iter().enumerate() {
        validate_dapai_presence(presence, &item(path, i))?;
    }
    Ok(())
}
