//! Per-record validators for the eight round records.

use paifu_protocol::Record;
use paifu_protocol::lq::{
    HuleInfo, NoTilePlayerInfo, NoTileScoreInfo, RecordAnGangAddGang, RecordChiPengGang,
    RecordDealTile, RecordDiscardTile, RecordHule, RecordLiuJu, RecordNewRound, RecordNoTile,
};
use paifu_tile::{Froms, Table};

use crate::check::{
    Check, absent, at_least, child, combination, empty, ensure, equals, fail, in_range, item,
    len_in, melds, one_of, present, seat, tile, tiles, zhenting,
};
use crate::option::{
    validate_dapai_presence, validate_dapai_presences, validate_liqi, validate_tingpais,
    validate_zimo_presence,
};

/// The live wall after the deal: 136 tiles minus 14 in the dead wall
/// minus 53 dealt.
pub const LEFT_TILE_COUNT_AFTER_DEAL: u32 = 69;

/// Yaku ids that never appear in a ranked game: 34 and 46 are rules
/// the ranked rooms do not play.
const UNUSED_FAN_IDS: &[u32] = &[34, 46];

/// Hand titles: 0 none, 1..=7 from mangan up, 11 counted yakuman.
const HULE_TITLE_IDS: &[u32] = &[0, 1, 2, 3, 4, 5, 6, 7, 11];

/// Point payments in a nagashi mangan settlement.
const NO_TILE_SCORES: &[u32] = &[0, 8000, 12000];

/// Validates a decoded round record.
pub fn validate_record(record: &Record) -> Check {
    match record {
        Record::NewRound(r) => validate_new_round(r),
        Record::DealTile(r) => validate_deal_tile(r),
        Record::DiscardTile(r) => validate_discard_tile(r),
        Record::ChiPengGang(r) => validate_chi_peng_gang(r),
        Record::AnGangAddGang(r) => validate_an_gang_add_gang(r),
        Record::Hule(r) => validate_hule(r),
        Record::NoTile(r) => validate_no_tile(r),
        Record::LiuJu(r) => validate_liu_ju(r),
    }
}

// ---------------------------------------------------------------------------
// Round start and draws
// ---------------------------------------------------------------------------

pub fn validate_new_round(record: &RecordNewRound) -> Check {
    in_range(record.chang, 0, 2, "chang")?;
    in_range(record.ju, 0, 3, "ju")?;
    equals(&record.dora.as_str(), &"", "dora")?;
    len_in(record.scores.len(), 3, 4, "scores")?;

    for (i, hand) in record.hands().iter().enumerate() {
        let path = format!("tiles{i}");
        len_in(hand.len(), 13, 14, &path)?;
        tiles(hand, &path)?;
    }

    len_in(record.tingpai.len(), 0, 4, "tingpai")?;
    for (i, ting) in record.tingpai.iter().enumerate() {
        let path = item("tingpai", i);
        seat(ting.seat, &child(&path, "seat"))?;
        let waits = child(&path, "tingpais1");
        len_in(ting.tingpais1.len(), 1, usize::MAX, &waits)?;
        validate_tingpais(&ting.tingpais1, &waits)?;
    }

    let operation = present(&record.operation, "operation")?;
    validate_zimo_presence(operation, "operation")?;

    equals(
        &record.left_tile_count,
        &LEFT_TILE_COUNT_AFTER_DEAL,
        "left_tile_count",
    )?;
    len_in(record.doras.len(), 1, 1, "doras")?;
    tiles(&record.doras, "doras")?;

    len_in(record.opens.len(), 3, 4, "opens")?;
    for (i, open) in record.opens.iter().enumerate() {
        let path = item("opens", i);
        seat(open.seat, &child(&path, "seat"))?;
        empty(&open.tiles, &child(&path, "tiles"))?;
        empty(&open.count, &child(&path, "count"))?;
    }

    empty(&record.operations, "operations")
}

pub fn validate_deal_tile(record: &RecordDealTile) -> Check {
    seat(record.seat, "seat")?;
    tile(&record.tile, "tile")?;
    if let Some(liqi) = &record.liqi {
        validate_liqi(liqi, "liqi")?;
    }
    tiles(&record.doras, "doras")?;
    zhenting(&record.zhenting, "zhenting")?;
    if let Some(operation) = &record.operation {
        validate_zimo_presence(operation, "operation")?;
    }
    equals(&record.tile_state, &0, "tile_state")
}

pub fn validate_discard_tile(record: &RecordDiscardTile) -> Check {
    seat(record.seat, "seat")?;
    tile(&record.tile, "tile")?;
    zhenting(&record.zhenting, "zhenting")?;
    validate_tingpais(&record.tingpais, "tingpais")?;
    tiles(&record.doras, "doras")?;
    validate_dapai_presences(&record.operations, "operations")?;
    equals(&record.tile_state, &0, "tile_state")
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// `RecordChiPengGang.type` codes.
mod meld {
    pub const CHI: u32 = 0;
    pub const PENG: u32 = 1;
    pub const DAMINGGANG: u32 = 2;
}

pub fn validate_chi_peng_gang(record: &RecordChiPengGang) -> Check {
    seat(record.seat, "seat")?;
    let (table, froms, states) = match record.r#type {
        meld::CHI => (Table::Chi, Froms::Chi, 2),
        meld::PENG => (Table::Peng, Froms::Peng, 2),
        meld::DAMINGGANG => (Table::Daminggang, Froms::Daminggang, 3),
        other => return Err(fail("type", format!("{other} is not a meld type"))),
    };
    combination(&record.tiles, table, "tiles")?;
    ensure(froms.contains(&record.froms), "froms", || {
        format!("{:?} is not a valid {froms:?} arrangement", record.froms)
    })?;
    if let Some(liqi) = &record.liqi {
        validate_liqi(liqi, "liqi")?;
    }
    zhenting(&record.zhenting, "zhenting")?;
    equals(&record.tile_states, &vec![0; states], "tile_states")?;

    // An open quad is always followed by a replacement draw, which
    // carries the options instead.
    if record.r#type == meld::DAMINGGANG {
        absent(&record.operation, "operation")
    } else {
        let operation = present(&record.operation, "operation")?;
        validate_zimo_presence(operation, "operation")
    }
}

/// `RecordAnGangAddGang.type`: 2 added quad, 3 concealed quad.
const AN_GANG_ADD_GANG_TYPES: &[u32] = &[2, 3];

pub fn validate_an_gang_add_gang(record: &RecordAnGangAddGang) -> Check {
    seat(record.seat, "seat")?;
    one_of(record.r#type, AN_GANG_ADD_GANG_TYPES, "type")?;
    tile(&record.tiles, "tiles")?;
    tiles(&record.doras, "doras")?;
    len_in(record.operations.len(), 0, 3, "operations")?;
    for (i, presence) in record.operations.iter().enumerate() {
        validate_dapai_presence(presence, &item("operations", i))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Round end
// ---------------------------------------------------------------------------

pub fn validate_hule(record: &RecordHule) -> Check {
    len_in(record.hules.len(), 1, 3, "hules")?;
    for (i, hule) in record.hules.iter().enumerate() {
        validate_hule_info(hule, &item("hules", i))?;
    }
    len_in(record.old_scores.len(), 3, 4, "old_scores")?;
    len_in(record.delta_scores.len(), 3, 4, "delta_scores")?;
    equals(&record.wait_timeout, &0, "wait_timeout")?;
    len_in(record.scores.len(), 3, 4, "scores")?;
    let gameend = present(&record.gameend, "gameend")?;
    empty(&gameend.scores, "gameend.scores")?;
    empty(&record.doras, "doras")
}

fn validate_hule_info(hule: &HuleInfo, path: &str) -> Check {
    let hand = child(path, "hand");
    len_in(hule.hand.len(), 1, 13, &hand)?;
    tiles(&hule.hand, &hand)?;
    let ming = child(path, "ming");
    len_in(hule.ming.len(), 0, 4, &ming)?;
    melds(&hule.ming, &ming)?;
    tile(&hule.hu_tile, &child(path, "hu_tile"))?;
    seat(hule.seat, &child(path, "seat"))?;

    let doras = child(path, "doras");
    len_in(hule.doras.len(), 1, 5, &doras)?;
    tiles(&hule.doras, &doras)?;
    let li_doras = child(path, "li_doras");
    len_in(hule.li_doras.len(), 0, 5, &li_doras)?;
    tiles(&hule.li_doras, &li_doras)?;

    at_least(hule.count, 1, &child(path, "count"))?;
    let fans = child(path, "fans");
    len_in(hule.fans.len(), 1, usize::MAX, &fans)?;
    for (i, fan) in hule.fans.iter().enumerate() {
        let fan_path = item(&fans, i);
        equals(&fan.name.as_str(), &"", &child(&fan_path, "name"))?;
        let id = child(&fan_path, "id");
        in_range(fan.id, 1, 50, &id)?;
        ensure(!UNUSED_FAN_IDS.contains(&fan.id), &id, || {
            format!("{} is not played in ranked games", fan.id)
        })?;
    }

    at_least(hule.fu, 20, &child(path, "fu"))?;
    equals(&hule.title.as_str(), &"", &child(path, "title"))?;
    one_of(hule.title_id, HULE_TITLE_IDS, &child(path, "title_id"))?;
    at_least(hule.point_sum, 1000, &child(path, "point_sum"))?;
    equals(&hule.dadian, &0, &child(path, "dadian"))
}

pub fn validate_no_tile(record: &RecordNoTile) -> Check {
    len_in(record.players.len(), 3, 4, "players")?;
    for (i, player) in record.players.iter().enumerate() {
        validate_no_tile_player(player, &item("players", i))?;
    }
    len_in(record.scores.len(), 1, 2, "scores")?;
    for (i, score) in record.scores.iter().enumerate() {
        validate_no_tile_score(score, &item("scores", i))?;
    }
    equals(&record.gameend, &false, "gameend")?;
    empty(&record.hules_history, "hules_history")
}

fn validate_no_tile_player(player: &NoTilePlayerInfo, path: &str) -> Check {
    let hand = child(path, "hand");
    len_in(player.hand.len(), 0, 13, &hand)?;
    tiles(&player.hand, &hand)?;
    validate_tingpais(&player.tings, &child(path, "tings"))?;
    equals(&player.already_hule, &false, &child(path, "already_hule"))
}

fn validate_no_tile_score(score: &NoTileScoreInfo, path: &str) -> Check {
    seat(score.seat, &child(path, "seat"))?;
    len_in(score.old_scores.len(), 3, 4, &child(path, "old_scores"))?;
    len_in(score.delta_scores.len(), 0, 4, &child(path, "delta_scores"))?;
    let hand = child(path, "hand");
    len_in(score.hand.len(), 0, 13, &hand)?;
    tiles(&score.hand, &hand)?;
    let ming = child(path, "ming");
    len_in(score.ming.len(), 0, 4, &ming)?;
    melds(&score.ming, &ming)?;
    let doras = child(path, "doras");
    len_in(score.doras.len(), 0, 5, &doras)?;
    tiles(&score.doras, &doras)?;
    one_of(score.score, NO_TILE_SCORES, &child(path, "score"))
}

/// `RecordLiuJu.type` codes.
mod liuju {
    /// Nine different terminals and honors.
    pub const JIUZHONGJIUPAI: u32 = 1;
    /// Four identical winds discarded on the first turn.
    pub const SIFENGLIANDA: u32 = 2;
    /// Four quads by more than one player.
    pub const SIGANGSANLE: u32 = 3;
    /// All four players in riichi.
    pub const SIJIALIZHI: u32 = 4;
}

pub fn validate_liu_ju(record: &RecordLiuJu) -> Check {
    match record.r#type {
        liuju::JIUZHONGJIUPAI => {
            seat(record.seat, "seat")?;
            len_in(record.tiles.len(), 14, 14, "tiles")?;
            tiles(&record.tiles, "tiles")?;
            empty(&record.allplayertiles, "allplayertiles")?;
        }
        liuju::SIFENGLIANDA | liuju::SIGANGSANLE => {
            equals(&record.seat, &0, "seat")?;
            empty(&record.tiles, "tiles")?;
            empty(&record.allplayertiles, "allplayertiles")?;
        }
        liuju::SIJIALIZHI => {
            equals(&record.seat, &0, "seat")?;
            empty(&record.tiles, "tiles")?;
            len_in(record.allplayertiles.len(), 3, 4, "allplayertiles")?;
        }
        other => return Err(fail("type", format!("{other} is not an abortive draw type"))),
    }
    empty(&record.hules_history, "hules_history")
}

#[cfg(test)]
mod tests {
    use paifu_protocol::lq::{
        FanInfo, GameEnd, LiQiSuccess, NewRoundOpenedTiles, OptionalOperation,
        OptionalOperationList,
    };

    use super::*;
    use crate::option::op;

    fn strings(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    fn new_round() -> RecordNewRound {
        let hand = strings(&[
            "1m", "2m", "3m", "4p", "5p", "6p", "7s", "8s", "9s", "1z", "1z", "2z", "2z",
        ]);
        let mut dealer = hand.clone();
        dealer.push("3z".into());
        RecordNewRound {
            scores: vec![25000; 4],
            tiles0: dealer,
            tiles1: hand.clone(),
            tiles2: hand.clone(),
            tiles3: hand,
            operation: Some(OptionalOperationList {
                seat: 0,
                operation_list: vec![OptionalOperation {
                    r#type: op::DAPAI,
                    ..Default::default()
                }],
                ..Default::default()
            }),
            left_tile_count: 69,
            doras: strings(&["7p"]),
            opens: (0..4)
                .map(|seat| NewRoundOpenedTiles {
                    seat,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_new_round_accepts_fresh_deal() {
        assert_eq!(validate_record(&Record::NewRound(new_round())), Ok(()));
    }

    #[test]
    fn test_validate_new_round_rejects_wrong_wall_count() {
        let mut record = new_round();
        record.left_tile_count = 70;
        assert_eq!(validate_new_round(&record).unwrap_err().path, "left_tile_count");
    }

    #[test]
    fn test_validate_new_round_requires_operation() {
        let mut record = new_round();
        record.operation = None;
        assert_eq!(validate_new_round(&record).unwrap_err().path, "operation");
    }

    #[test]
    fn test_validate_deal_tile_rejects_failed_riichi() {
        let record = RecordDealTile {
            seat: 1,
            tile: "5z".into(),
            liqi: Some(LiQiSuccess {
                seat: 0,
                score: 24000,
                liqibang: 1,
                failed: true,
            }),
            zhenting: vec![false; 4],
            ..Default::default()
        };
        assert_eq!(validate_deal_tile(&record).unwrap_err().path, "liqi.failed");
    }

    #[test]
    fn test_validate_discard_tile_rejects_tile_state() {
        let record = RecordDiscardTile {
            seat: 2,
            tile: "9s".into(),
            zhenting: vec![false; 4],
            tile_state: 1,
            ..Default::default()
        };
        assert_eq!(validate_discard_tile(&record).unwrap_err().path, "tile_state");
    }

    fn chi() -> RecordChiPengGang {
        RecordChiPengGang {
            seat: 1,
            r#type: meld::CHI,
            tiles: strings(&["2m", "3m", "1m"]),
            froms: vec![1, 1, 0],
            zhenting: vec![false; 4],
            operation: Some(OptionalOperationList {
                seat: 1,
                ..Default::default()
            }),
            tile_states: vec![0, 0],
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_chi_peng_gang_accepts_chi_from_left() {
        assert_eq!(validate_chi_peng_gang(&chi()), Ok(()));
    }

    #[test]
    fn test_validate_chi_peng_gang_rejects_chi_from_across() {
        let mut record = chi();
        record.froms = vec![1, 1, 3];
        assert_eq!(validate_chi_peng_gang(&record).unwrap_err().path, "froms");
    }

    #[test]
    fn test_validate_chi_peng_gang_open_quad_forbids_operation() {
        let record = RecordChiPengGang {
            seat: 0,
            r#type: meld::DAMINGGANG,
            tiles: strings(&["1z", "1z", "1z", "1z"]),
            froms: vec![0, 0, 0, 2],
            zhenting: vec![false; 4],
            operation: Some(OptionalOperationList::default()),
            tile_states: vec![0, 0, 0],
            ..Default::default()
        };
        assert_eq!(validate_chi_peng_gang(&record).unwrap_err().path, "operation");
    }

    #[test]
    fn test_validate_an_gang_add_gang_rejects_open_quad_type() {
        let record = RecordAnGangAddGang {
            seat: 0,
            r#type: 1,
            tiles: "1z".into(),
            ..Default::default()
        };
        assert_eq!(validate_an_gang_add_gang(&record).unwrap_err().path, "type");
    }

    fn hule() -> RecordHule {
        RecordHule {
            hules: vec![HuleInfo {
                hand: strings(&["1m", "1m", "2p", "3p", "4p"]),
                ming: strings(&["shunzi(2s,3s,4s)", "kezi(5z,5z,5z)"]),
                hu_tile: "1m".into(),
                seat: 3,
                doras: strings(&["3s"]),
                count: 2,
                fans: vec![FanInfo {
                    name: String::new(),
                    val: 1,
                    id: 7,
                }],
                fu: 30,
                title_id: 0,
                point_sum: 2000,
                ..Default::default()
            }],
            old_scores: vec![25000; 4],
            delta_scores: vec![-2000, 0, 0, 2000],
            scores: vec![23000, 25000, 25000, 27000],
            gameend: Some(GameEnd::default()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_hule_accepts_single_winner() {
        assert_eq!(validate_hule(&hule()), Ok(()));
    }

    #[test]
    fn test_validate_hule_rejects_unplayed_fan() {
        let mut record = hule();
        record.hules[0].fans[0].id = 34;
        assert_eq!(
            validate_hule(&record).unwrap_err().path,
            "hules[0].fans[0].id"
        );
    }

    #[test]
    fn test_validate_hule_rejects_invalid_meld() {
        let mut record = hule();
        record.hules[0].ming[1] = "kezi(5z,5z,6z)".into();
        assert_eq!(
            validate_hule(&record).unwrap_err().path,
            "hules[0].ming[1]"
        );
        record.hules[0].ming[1] = "pon(5z,5z,5z)".into();
        assert_eq!(
            validate_hule(&record).unwrap_err().path,
            "hules[0].ming[1]"
        );
    }

    #[test]
    fn test_validate_hule_requires_gameend() {
        let mut record = hule();
        record.gameend = None;
        assert_eq!(validate_hule(&record).unwrap_err().path, "gameend");
    }

    #[test]
    fn test_validate_liu_ju_kyushu_requires_fourteen_tiles() {
        let mut record = RecordLiuJu {
            r#type: liuju::JIUZHONGJIUPAI,
            seat: 2,
            tiles: strings(&[
                "1m", "9m", "1p", "9p", "1s", "9s", "1z", "2z", "3z", "4z", "5z", "2m", "3m", "4m",
            ]),
            ..Default::default()
        };
        assert_eq!(validate_liu_ju(&record), Ok(()));
        record.tiles.pop();
        assert_eq!(validate_liu_ju(&record).unwrap_err().path, "tiles");
    }

    #[test]
    fn test_validate_liu_ju_rejects_unknown_type() {
        let record = RecordLiuJu {
            r#type: 5,
            ..Default::default()
        };
        assert_eq!(validate_liu_ju(&record).unwrap_err().path, "type");
    }

    #[test]
    fn test_validate_no_tile_rejects_odd_payment() {
        let record = RecordNoTile {
            players: (0..4).map(|_| NoTilePlayerInfo::default()).collect(),
            scores: vec![NoTileScoreInfo {
                seat: 0,
                old_scores: vec![25000; 4],
                delta_scores: vec![3000, -1000, -1000, -1000],
                score: 3000,
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(validate_no_tile(&record).unwrap_err().path, "scores[0].score");
    }
}
