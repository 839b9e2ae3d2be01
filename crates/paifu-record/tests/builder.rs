//! Whole-game reconstruction over hand-built `fetchGameRecord` responses.

use paifu_protocol::frame::response_frame;
use paifu_protocol::lq::{
    AccountInfo, AccountLevel, Character, FanInfo, GameConfig, GameDetailRecords, GameEnd,
    GameEndResult, GameMetaData, GameMode, HuleInfo, NewRoundOpenedTiles, NoTilePlayerInfo,
    NoTileScoreInfo, OptionalOperation, OptionalOperationList, PlayerItem, RecordDealTile,
    RecordDiscardTile, RecordGame, RecordHule, RecordNewRound, RecordNoTile, ResGameRecord,
};
use paifu_protocol::{Envelope, Record};
use paifu_record::{BuildError, BuilderState, GameBuilder, Turn, build_game_record};
use paifu_schema::GAME_DETAIL_RECORDS;
use prost::Message;
use serde_json::json;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

const UUID: &str = "210314-9f8e7d6c-5b4a-3210-fedc-ba9876543210";
const START: u32 = 1_615_680_000;

fn head() -> RecordGame {
    RecordGame {
        uuid: UUID.into(),
        start_time: START,
        end_time: START + 1200,
        config: Some(GameConfig {
            category: 2,
            mode: Some(GameMode {
                mode: 1,
                ai: false,
                extendinfo: String::new(),
                detail_rule: Some(Vec::new()),
            }),
            meta: Some(GameMetaData {
                room_id: 0,
                mode_id: 8,
                contest_uid: 0,
            }),
        }),
        accounts: (0..4)
            .map(|seat| AccountInfo {
                account_id: 500 + seat,
                seat,
                nickname: format!("p{seat}"),
                character: Some(Character::default()),
                level: Some(AccountLevel {
                    id: 10301,
                    score: 800,
                }),
                level3: Some(AccountLevel { id: 20101, score: 0 }),
                ..Default::default()
            })
            .collect(),
        result: Some(GameEndResult {
            players: (0..4)
                .map(|seat| PlayerItem {
                    seat,
                    total_point: 25000,
                    part_point_1: 25000,
                    grading_score: 10,
                    ..Default::default()
                })
                .collect(),
        }),
    }
}

fn strings(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|s| s.to_string()).collect()
}

const HAND: [&str; 13] = [
    "1m", "2m", "3m", "4p", "5p", "6p", "7s", "8s", "9s", "2z", "2z", "5z", "5z",
];

fn new_round() -> RecordNewRound {
    let mut dealer = strings(&HAND);
    dealer.push("7z".into());
    RecordNewRound {
        chang: 0,
        ju: 0,
        ben: 0,
        scores: vec![25000; 4],
        tiles0: dealer,
        tiles1: strings(&HAND),
        tiles2: strings(&HAND),
        tiles3: strings(&HAND),
        operation: Some(OptionalOperationList {
            seat: 0,
            operation_list: vec![OptionalOperation {
                r#type: 1,
                ..Default::default()
            }],
            time_add: 20000,
            time_fixed: 5000,
        }),
        md5: "d41d8cd98f00b204e9800998ecf8427e".into(),
        paishan: "1m9m7z".into(),
        left_tile_count: 69,
        doras: strings(&["9m"]),
        opens: (0..4)
            .map(|seat| NewRoundOpenedTiles {
                seat,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

fn discard(seat: u32, tile: &str, moqie: bool) -> RecordDiscardTile {
    RecordDiscardTile {
        seat,
        tile: tile.into(),
        moqie,
        zhenting: vec![false; 4],
        ..Default::default()
    }
}

fn deal(seat: u32, tile: &str, left: u32) -> RecordDealTile {
    RecordDealTile {
        seat,
        tile: tile.into(),
        left_tile_count: left,
        zhenting: vec![false; 4],
        ..Default::default()
    }
}

fn no_tile() -> RecordNoTile {
    RecordNoTile {
        players: (0..4).map(|_| NoTilePlayerInfo::default()).collect(),
        scores: vec![NoTileScoreInfo {
            seat: 0,
            old_scores: vec![25000; 4],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn tsumo(seat: u32) -> RecordHule {
    RecordHule {
        hules: vec![HuleInfo {
            hand: strings(&HAND),
            hu_tile: "5z".into(),
            seat,
            zimo: true,
            doras: strings(&["9m"]),
            count: 2,
            fans: vec![
                FanInfo {
                    name: String::new(),
                    val: 1,
                    id: 1,
                },
                FanInfo {
                    name: String::new(),
                    val: 1,
                    id: 7,
                },
                FanInfo {
                    name: String::new(),
                    val: 0,
                    id: 31,
                },
            ],
            fu: 40,
            title_id: 0,
            point_zimo_qin: 1300,
            point_zimo_xian: 700,
            point_sum: 2700,
            ..Default::default()
        }],
        old_scores: vec![25000; 4],
        delta_scores: vec![-1300, 2700, -700, -700],
        scores: vec![23700, 27700, 24300, 24300],
        gameend: Some(GameEnd::default()),
        ..Default::default()
    }
}

fn record(name: &str, payload: impl Message) -> Vec<u8> {
    Envelope::new(name, payload.encode_to_vec()).encode()
}

fn frame_with(records: Vec<Vec<u8>>) -> Vec<u8> {
    let list = GameDetailRecords { records };
    let response = ResGameRecord {
        head: Some(head()),
        data: Envelope::new(GAME_DETAIL_RECORDS, list.encode_to_vec()).encode(),
        data_url: String::new(),
    };
    response_frame(11, &response.encode_to_vec())
}

fn exhaustive_draw_game() -> Vec<u8> {
    frame_with(vec![
        record(".lq.RecordNewRound", new_round()),
        record(".lq.RecordDiscardTile", discard(0, "7z", false)),
        record(".lq.RecordDealTile", deal(1, "4s", 68)),
        record(".lq.RecordDiscardTile", discard(1, "4s", true)),
        record(".lq.RecordNoTile", no_tile()),
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_build_game_record_exhaustive_draw_round() {
    let game = build_game_record(&exhaustive_draw_game(), true).unwrap();
    assert_eq!(game.uuid(), UUID);
    assert_eq!(game.mode(), "段位戦・金の間・四人東風戦");
    assert_eq!(game.round_list().len(), 1);

    let round = &game.round_list()[0];
    assert_eq!(round.coordinates().to_string(), "東1局0本場");
    let labels: Vec<&str> = round.turns().iter().map(Turn::label).collect();
    assert_eq!(labels, ["打牌", "自摸", "打牌", "荒牌平局"]);

    let json = game.to_json().unwrap();
    assert_eq!(json["start_time"], START);
    assert_eq!(json["end_time"], START + 1200);
    assert_eq!(json["account_list"][2]["id"], 502);
    assert_eq!(json["account_list"][2]["level4"]["title"], "雀傑");

    let round = &json["round_list"][0];
    assert_eq!(round["chang"], "東");
    assert_eq!(round["dora"], "9m");
    assert_eq!(round["paishan"], json!(["1m", "9m", "7z"]));
    assert_eq!(round["option_presence"]["options"][0], json!({"type": "打牌", "tiles": []}));
    assert_eq!(round["turns"][2]["moqie"], true);
    assert_eq!(round["turns"][3]["liujumanguan"], false);
    for player in round["turns"][3]["player_results"].as_array().unwrap() {
        assert_eq!(player["tingpai"], false);
        assert_eq!(player["delta_score"], 0);
    }
}

#[test]
fn test_build_game_record_draw_discard_no_tile_three_turns() {
    let message = frame_with(vec![
        record(".lq.RecordNewRound", new_round()),
        record(".lq.RecordDealTile", deal(1, "4s", 68)),
        record(".lq.RecordDiscardTile", discard(1, "4s", true)),
        record(".lq.RecordNoTile", no_tile()),
    ]);
    let game = build_game_record(&message, true).unwrap();
    assert_eq!(game.round_list().len(), 1);

    let turns = game.round_list()[0].turns();
    let labels: Vec<&str> = turns.iter().map(Turn::label).collect();
    assert_eq!(labels, ["自摸", "打牌", "荒牌平局"]);

    let json = game.to_json().unwrap();
    let turns = &json["round_list"][0]["turns"];
    assert_eq!(turns[0]["seat"], 1);
    assert_eq!(turns[1]["moqie"], true);
    assert_eq!(turns.as_array().unwrap().len(), 3);
}

#[test]
fn test_build_game_record_self_drawn_win() {
    let message = frame_with(vec![
        record(".lq.RecordNewRound", new_round()),
        record(".lq.RecordDiscardTile", discard(0, "7z", false)),
        record(".lq.RecordDealTile", deal(1, "5z", 68)),
        record(".lq.RecordHule", tsumo(1)),
    ]);
    let json = build_game_record(&message, true).unwrap().to_json().unwrap();
    let end = &json["round_list"][0]["turns"][2];
    assert_eq!(end["type"], "和了");
    let hule = &end["hule_list"][0];
    assert_eq!(hule["point_zimo_zhuangjia"], 1300);
    assert_eq!(hule["point_zimo_sanjia"], 700);
    assert!(hule.get("point_rong").is_none());
    // The zero-valued dora entry is dropped.
    assert_eq!(
        hule["hupai_list"],
        json!([{"title": "門前清自摸和", "fan": 1}, {"title": "役牌白", "fan": 1}])
    );
    assert_eq!(end["new_scores"], json!([23700, 27700, 24300, 24300]));
}

#[test]
fn test_build_game_record_hand_size_violation_names_round() {
    // Seat 1 discards without drawing first.
    let message = frame_with(vec![
        record(".lq.RecordNewRound", new_round()),
        record(".lq.RecordDiscardTile", discard(0, "7z", false)),
        record(".lq.RecordDiscardTile", discard(1, "5z", false)),
        record(".lq.RecordNoTile", no_tile()),
    ]);
    let err = build_game_record(&message, true).unwrap_err();
    assert!(err.to_string().starts_with("東1局0本場: "));
    assert!(matches!(err.root(), BuildError::InvalidValue(_)));
}

#[test]
fn test_build_game_record_without_rounds_fails() {
    let err = build_game_record(&frame_with(Vec::new()), true).unwrap_err();
    assert!(matches!(err, BuildError::NoRound));
}

#[test]
fn test_build_game_record_schema_failure_is_validation_error() {
    let mut round = new_round();
    round.left_tile_count = 70;
    let message = frame_with(vec![record(".lq.RecordNewRound", round)]);
    assert!(matches!(
        build_game_record(&message, true).unwrap_err(),
        BuildError::Validation(_)
    ));
}

#[test]
fn test_game_builder_rejects_turn_after_round_end() {
    let mut builder = GameBuilder::new();
    builder.push(&Record::NewRound(new_round())).unwrap();
    assert_eq!(builder.state(), BuilderState::InRound);
    builder.push(&Record::DiscardTile(discard(0, "7z", false))).unwrap();
    builder.push(&Record::NoTile(no_tile())).unwrap();
    assert_eq!(builder.state(), BuilderState::AwaitingNewRound);

    let err = builder
        .push(&Record::DealTile(deal(1, "1m", 68)))
        .unwrap_err();
    assert!(matches!(err, BuildError::UnexpectedRecord(_)));
    assert_eq!(builder.finish().unwrap().len(), 1);
}

#[test]
fn test_game_builder_push_envelope_validates_records() {
    let mut builder = GameBuilder::new();
    builder
        .push_envelope(&record(".lq.RecordNewRound", new_round()))
        .unwrap();

    let mut bad = discard(0, "7z", false);
    bad.tile_state = 1;
    let err = builder
        .push_envelope(&record(".lq.RecordDiscardTile", bad))
        .unwrap_err();
    assert!(matches!(err, BuildError::Violation(ref v) if v.path == "tile_state"));
    assert_eq!(builder.state(), BuilderState::InRound);
}
