//! A minimal but schema-valid `fetchGameRecord` exchange.

use paifu_capture::CapturedFrame;
use paifu_protocol::frame::{request_frame, response_frame};
use paifu_protocol::lq::{
    AccountInfo, AccountLevel, Character, GameConfig, GameDetailRecords, GameEndResult,
    GameMetaData, GameMode, NewRoundOpenedTiles, NoTilePlayerInfo, NoTileScoreInfo,
    OptionalOperation, OptionalOperationList, PlayerItem, RecordDealTile, RecordDiscardTile,
    RecordGame, RecordNewRound, RecordNoTile, ResGameRecord,
};
use paifu_protocol::Envelope;
use paifu_schema::GAME_DETAIL_RECORDS;
use prost::Message;

pub const UUID: &str = "210314-9f8e7d6c-5b4a-3210-fedc-ba9876543210";
/// 2021-03-14T00:00:00Z
pub const START: u32 = 1_615_680_000;
pub const FETCH_GAME_RECORD: &str = ".lq.Lobby.fetchGameRecord";

const HAND: [&str; 13] = [
    "1m", "2m", "3m", "4p", "5p", "6p", "7s", "8s", "9s", "2z", "2z", "5z", "5z",
];

pub const RULES: &str = r#"{
    "mirror": {
        ".lq.Lobby.fetchGameRecord": {
            "request_direction": "outbound",
            "action": {"command": "RPUSH", "key": "game-detail-list"}
        },
        ".lq.Lobby.heatbeat": {"request_direction": "outbound", "action": "NOP"}
    },
    "archive": {
        "detail_prefix": "game-detail/%Y/%m/%d/",
        "record_prefix": "game-record/%Y/%m"
    }
}"#;

fn strings(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|s| s.to_string()).collect()
}

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

fn new_round() -> RecordNewRound {
    let mut dealer = strings(&HAND);
    dealer.push("7z".into());
    RecordNewRound {
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

fn record(name: &str, payload: impl Message) -> Vec<u8> {
    Envelope::new(name, payload.encode_to_vec()).encode()
}

/// The `ResGameRecord` payload of an exhaustive-draw game.
pub fn game_record(records_valid: bool) -> Vec<u8> {
    let mut discard = RecordDiscardTile {
        seat: 0,
        tile: "7z".into(),
        zhenting: vec![false; 4],
        ..Default::default()
    };
    if !records_valid {
        discard.tile_state = 1;
    }
    let records = vec![
        record(".lq.RecordNewRound", new_round()),
        record(".lq.RecordDiscardTile", discard),
        record(
            ".lq.RecordDealTile",
            RecordDealTile {
                seat: 1,
                tile: "4s".into(),
                left_tile_count: 68,
                zhenting: vec![false; 4],
                ..Default::default()
            },
        ),
        record(
            ".lq.RecordDiscardTile",
            RecordDiscardTile {
                seat: 1,
                tile: "4s".into(),
                moqie: true,
                zhenting: vec![false; 4],
                ..Default::default()
            },
        ),
        record(
            ".lq.RecordNoTile",
            RecordNoTile {
                players: (0..4).map(|_| NoTilePlayerInfo::default()).collect(),
                scores: vec![NoTileScoreInfo {
                    seat: 0,
                    old_scores: vec![25000; 4],
                    ..Default::default()
                }],
                ..Default::default()
            },
        ),
    ];
    let list = GameDetailRecords { records };
    ResGameRecord {
        head: Some(head()),
        data: Envelope::new(GAME_DETAIL_RECORDS, list.encode_to_vec()).encode(),
        data_url: String::new(),
    }
    .encode_to_vec()
}

/// The captured request/response pair for one `fetchGameRecord` call.
pub fn fetch_game_record_frames(seq: u16, records_valid: bool) -> [CapturedFrame; 2] {
    [
        CapturedFrame::binary(true, request_frame(seq, FETCH_GAME_RECORD, UUID.as_bytes())),
        CapturedFrame::binary(false, response_frame(seq, &game_record(records_valid))),
    ]
}
