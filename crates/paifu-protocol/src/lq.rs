//! The `.lq` protobuf messages paifu decodes.
//!
//! Each struct is a hand-written `prost` message mirroring one message
//! of the game's `liqi` schema, restricted to the fields the pipeline
//! reads. Next to every struct sits a static [`Shape`] listing the
//! field numbers the message may carry on the wire; [`decode_strict`]
//! uses it to reject unknown fields, which plain `prost` decoding
//! silently skips.
//!
//! The structs also derive `serde::Serialize`, so a decoded message can
//! be dumped as JSON into diagnostics.

use serde::Serialize;

use crate::shape::{Shape, Strict, nested, opaque, scalar};

// ---------------------------------------------------------------------------
// Envelope-level messages
// ---------------------------------------------------------------------------

/// A game-level action, sent as the payload of a `.lq.ActionPrototype`
/// notification. `data` may be XOR-masked.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct ActionPrototype {
    #[prost(uint32, tag = "1")]
    pub step: u32,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(bytes = "vec", tag = "3")]
    pub data: Vec<u8>,
}

pub static ACTION_PROTOTYPE: Shape = Shape::new(
    "ActionPrototype",
    &[scalar(1, "step"), scalar(2, "name"), scalar(3, "data")],
);

/// Response to `.lq.Lobby.fetchGameRecord`.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct ResGameRecord {
    #[prost(message, optional, tag = "3")]
    pub head: Option<RecordGame>,
    /// An envelope named `.lq.GameDetailRecords`.
    #[prost(bytes = "vec", tag = "4")]
    pub data: Vec<u8>,
    #[prost(string, tag = "5")]
    pub data_url: String,
}

pub static RES_GAME_RECORD: Shape = Shape::new(
    "ResGameRecord",
    &[
        nested(3, "head", &RECORD_GAME),
        scalar(4, "data"),
        scalar(5, "data_url"),
    ],
);

/// The ordered records of a game, each an envelope around one
/// `.lq.Record*` message.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct GameDetailRecords {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub records: Vec<Vec<u8>>,
}

pub static GAME_DETAIL_RECORDS: Shape =
    Shape::new("GameDetailRecords", &[scalar(1, "records")]);

// ---------------------------------------------------------------------------
// Game summary
// ---------------------------------------------------------------------------

/// The summary ("head") of a finished game.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordGame {
    #[prost(string, tag = "1")]
    pub uuid: String,
    #[prost(uint32, tag = "2")]
    pub start_time: u32,
    #[prost(uint32, tag = "3")]
    pub end_time: u32,
    #[prost(message, optional, tag = "5")]
    pub config: Option<GameConfig>,
    #[prost(message, repeated, tag = "11")]
    pub accounts: Vec<AccountInfo>,
    #[prost(message, optional, tag = "12")]
    pub result: Option<GameEndResult>,
}

pub static RECORD_GAME: Shape = Shape::new(
    "RecordGame",
    &[
        scalar(1, "uuid"),
        scalar(2, "start_time"),
        scalar(3, "end_time"),
        nested(5, "config", &GAME_CONFIG),
        nested(11, "accounts", &ACCOUNT_INFO),
        nested(12, "result", &GAME_END_RESULT),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct GameConfig {
    #[prost(uint32, tag = "1")]
    pub category: u32,
    #[prost(message, optional, tag = "2")]
    pub mode: Option<GameMode>,
    #[prost(message, optional, tag = "3")]
    pub meta: Option<GameMetaData>,
}

pub static GAME_CONFIG: Shape = Shape::new(
    "GameConfig",
    &[
        scalar(1, "category"),
        nested(2, "mode", &GAME_MODE),
        nested(3, "meta", &GAME_META_DATA),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct GameMode {
    #[prost(uint32, tag = "1")]
    pub mode: u32,
    #[prost(bool, tag = "4")]
    pub ai: bool,
    #[prost(string, tag = "5")]
    pub extendinfo: String,
    /// Kept as raw bytes; ranked presets leave the detailed rules to
    /// `meta.mode_id`. Always present on the wire, possibly empty.
    #[prost(bytes = "vec", optional, tag = "6")]
    pub detail_rule: Option<Vec<u8>>,
}

pub static GAME_MODE: Shape = Shape::new(
    "GameMode",
    &[
        scalar(1, "mode"),
        scalar(4, "ai"),
        scalar(5, "extendinfo"),
        opaque(6, "detail_rule"),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct GameMetaData {
    #[prost(uint32, tag = "1")]
    pub room_id: u32,
    #[prost(uint32, tag = "2")]
    pub mode_id: u32,
    #[prost(uint32, tag = "3")]
    pub contest_uid: u32,
}

pub static GAME_META_DATA: Shape = Shape::new(
    "GameMetaData",
    &[scalar(1, "room_id"), scalar(2, "mode_id"), scalar(3, "contest_uid")],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct AccountInfo {
    #[prost(uint32, tag = "1")]
    pub account_id: u32,
    #[prost(uint32, tag = "2")]
    pub seat: u32,
    #[prost(string, tag = "3")]
    pub nickname: String,
    #[prost(uint32, tag = "4")]
    pub avatar_id: u32,
    #[prost(message, optional, tag = "5")]
    pub character: Option<Character>,
    #[prost(uint32, tag = "6")]
    pub title: u32,
    #[prost(message, optional, tag = "7")]
    pub level: Option<AccountLevel>,
    #[prost(message, optional, tag = "8")]
    pub level3: Option<AccountLevel>,
    #[prost(uint32, tag = "9")]
    pub avatar_frame: u32,
    #[prost(uint32, tag = "10")]
    pub verified: u32,
    #[prost(message, repeated, tag = "11")]
    pub views: Vec<ViewSlot>,
}

pub static ACCOUNT_INFO: Shape = Shape::new(
    "AccountInfo",
    &[
        scalar(1, "account_id"),
        scalar(2, "seat"),
        scalar(3, "nickname"),
        scalar(4, "avatar_id"),
        nested(5, "character", &CHARACTER),
        scalar(6, "title"),
        nested(7, "level", &ACCOUNT_LEVEL),
        nested(8, "level3", &ACCOUNT_LEVEL),
        scalar(9, "avatar_frame"),
        scalar(10, "verified"),
        nested(11, "views", &VIEW_SLOT),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct Character {
    #[prost(uint32, tag = "1")]
    pub charid: u32,
    #[prost(uint32, tag = "2")]
    pub level: u32,
    #[prost(uint32, tag = "3")]
    pub exp: u32,
    #[prost(message, repeated, tag = "4")]
    pub views: Vec<ViewSlot>,
    #[prost(uint32, tag = "5")]
    pub skin: u32,
    #[prost(bool, tag = "6")]
    pub is_upgraded: bool,
    #[prost(uint32, repeated, tag = "7")]
    pub extra_emoji: Vec<u32>,
    #[prost(uint32, repeated, tag = "8")]
    pub rewarded_level: Vec<u32>,
}

pub static CHARACTER: Shape = Shape::new(
    "Character",
    &[
        scalar(1, "charid"),
        scalar(2, "level"),
        scalar(3, "exp"),
        nested(4, "views", &VIEW_SLOT),
        scalar(5, "skin"),
        scalar(6, "is_upgraded"),
        scalar(7, "extra_emoji"),
        scalar(8, "rewarded_level"),
    ],
);

/// A ranking-ladder position, e.g. `10302` (雀傑2).
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct AccountLevel {
    #[prost(uint32, tag = "1")]
    pub id: u32,
    #[prost(uint32, tag = "2")]
    pub score: u32,
}

pub static ACCOUNT_LEVEL: Shape =
    Shape::new("AccountLevel", &[scalar(1, "id"), scalar(2, "score")]);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct ViewSlot {
    #[prost(uint32, tag = "1")]
    pub slot: u32,
    #[prost(uint32, tag = "2")]
    pub item_id: u32,
    #[prost(uint32, tag = "3")]
    pub r#type: u32,
    #[prost(uint32, repeated, tag = "4")]
    pub item_id_list: Vec<u32>,
}

pub static VIEW_SLOT: Shape = Shape::new(
    "ViewSlot",
    &[
        scalar(1, "slot"),
        scalar(2, "item_id"),
        scalar(3, "type"),
        scalar(4, "item_id_list"),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct GameEndResult {
    #[prost(message, repeated, tag = "1")]
    pub players: Vec<PlayerItem>,
}

pub static GAME_END_RESULT: Shape =
    Shape::new("GameEndResult", &[nested(1, "players", &PLAYER_ITEM)]);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct PlayerItem {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(int32, tag = "2")]
    pub total_point: i32,
    #[prost(int32, tag = "3")]
    pub part_point_1: i32,
    #[prost(int32, tag = "4")]
    pub part_point_2: i32,
    #[prost(int32, tag = "5")]
    pub grading_score: i32,
    #[prost(int32, tag = "6")]
    pub gold: i32,
}

pub static PLAYER_ITEM: Shape = Shape::new(
    "PlayerItem",
    &[
        scalar(1, "seat"),
        scalar(2, "total_point"),
        scalar(3, "part_point_1"),
        scalar(4, "part_point_2"),
        scalar(5, "grading_score"),
        scalar(6, "gold"),
    ],
);

// ---------------------------------------------------------------------------
// Shared round sub-messages
// ---------------------------------------------------------------------------

/// A waiting tile and what winning on it would be worth.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct TingPaiInfo {
    #[prost(string, tag = "1")]
    pub tile: String,
    #[prost(bool, tag = "2")]
    pub haveyi: bool,
    #[prost(bool, tag = "3")]
    pub yiman: bool,
    #[prost(uint32, tag = "4")]
    pub count: u32,
    #[prost(uint32, tag = "5")]
    pub fu: u32,
    #[prost(uint32, tag = "6")]
    pub biao_dora_count: u32,
    #[prost(bool, tag = "7")]
    pub yiman_zimo: bool,
    #[prost(uint32, tag = "8")]
    pub count_zimo: u32,
    #[prost(uint32, tag = "9")]
    pub fu_zimo: u32,
}

pub static TING_PAI_INFO: Shape = Shape::new(
    "TingPaiInfo",
    &[
        scalar(1, "tile"),
        scalar(2, "haveyi"),
        scalar(3, "yiman"),
        scalar(4, "count"),
        scalar(5, "fu"),
        scalar(6, "biao_dora_count"),
        scalar(7, "yiman_zimo"),
        scalar(8, "count_zimo"),
        scalar(9, "fu_zimo"),
    ],
);

/// The options presented to one seat, with its thinking time.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct OptionalOperationList {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(message, repeated, tag = "2")]
    pub operation_list: Vec<OptionalOperation>,
    #[prost(uint32, tag = "4")]
    pub time_add: u32,
    #[prost(uint32, tag = "5")]
    pub time_fixed: u32,
}

pub static OPTIONAL_OPERATION_LIST: Shape = Shape::new(
    "OptionalOperationList",
    &[
        scalar(1, "seat"),
        nested(2, "operation_list", &OPTIONAL_OPERATION),
        scalar(4, "time_add"),
        scalar(5, "time_fixed"),
    ],
);

/// One option. `type` selects the action; `combination` holds tiles
/// or `"a|b|c"` strings depending on it.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct OptionalOperation {
    #[prost(uint32, tag = "1")]
    pub r#type: u32,
    #[prost(string, repeated, tag = "2")]
    pub combination: Vec<String>,
    #[prost(string, repeated, tag = "3")]
    pub change_tiles: Vec<String>,
    #[prost(int32, repeated, tag = "4")]
    pub change_tile_states: Vec<i32>,
}

pub static OPTIONAL_OPERATION: Shape = Shape::new(
    "OptionalOperation",
    &[
        scalar(1, "type"),
        scalar(2, "combination"),
        scalar(3, "change_tiles"),
        scalar(4, "change_tile_states"),
    ],
);

/// A riichi declaration that became effective with this record.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct LiQiSuccess {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(int32, tag = "2")]
    pub score: i32,
    #[prost(uint32, tag = "3")]
    pub liqibang: u32,
    #[prost(bool, tag = "4")]
    pub failed: bool,
}

pub static LI_QI_SUCCESS: Shape = Shape::new(
    "LiQiSuccess",
    &[
        scalar(1, "seat"),
        scalar(2, "score"),
        scalar(3, "liqibang"),
        scalar(4, "failed"),
    ],
);

// ---------------------------------------------------------------------------
// Round records
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordNewRound {
    #[prost(uint32, tag = "1")]
    pub chang: u32,
    #[prost(uint32, tag = "2")]
    pub ju: u32,
    #[prost(uint32, tag = "3")]
    pub ben: u32,
    #[prost(string, tag = "4")]
    pub dora: String,
    #[prost(int32, repeated, tag = "5")]
    pub scores: Vec<i32>,
    #[prost(uint32, tag = "6")]
    pub liqibang: u32,
    #[prost(string, repeated, tag = "7")]
    pub tiles0: Vec<String>,
    #[prost(string, repeated, tag = "8")]
    pub tiles1: Vec<String>,
    #[prost(string, repeated, tag = "9")]
    pub tiles2: Vec<String>,
    #[prost(string, repeated, tag = "10")]
    pub tiles3: Vec<String>,
    #[prost(message, repeated, tag = "11")]
    pub tingpai: Vec<NewRoundTingPai>,
    #[prost(message, optional, tag = "12")]
    pub operation: Option<OptionalOperationList>,
    #[prost(string, tag = "13")]
    pub md5: String,
    #[prost(string, tag = "14")]
    pub paishan: String,
    #[prost(uint32, tag = "15")]
    pub left_tile_count: u32,
    #[prost(string, repeated, tag = "16")]
    pub doras: Vec<String>,
    #[prost(message, repeated, tag = "17")]
    pub opens: Vec<NewRoundOpenedTiles>,
    #[prost(message, repeated, tag = "19")]
    pub operations: Vec<OptionalOperationList>,
}

impl RecordNewRound {
    /// The four starting hands, indexed by seat.
    pub fn hands(&self) -> [&[String]; 4] {
        [&self.tiles0, &self.tiles1, &self.tiles2, &self.tiles3]
    }
}

pub static RECORD_NEW_ROUND: Shape = Shape::new(
    "RecordNewRound",
    &[
        scalar(1, "chang"),
        scalar(2, "ju"),
        scalar(3, "ben"),
        scalar(4, "dora"),
        scalar(5, "scores"),
        scalar(6, "liqibang"),
        scalar(7, "tiles0"),
        scalar(8, "tiles1"),
        scalar(9, "tiles2"),
        scalar(10, "tiles3"),
        nested(11, "tingpai", &NEW_ROUND_TING_PAI),
        nested(12, "operation", &OPTIONAL_OPERATION_LIST),
        scalar(13, "md5"),
        scalar(14, "paishan"),
        scalar(15, "left_tile_count"),
        scalar(16, "doras"),
        nested(17, "opens", &NEW_ROUND_OPENED_TILES),
        nested(19, "operations", &OPTIONAL_OPERATION_LIST),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct NewRoundTingPai {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(message, repeated, tag = "2")]
    pub tingpais1: Vec<TingPaiInfo>,
}

pub static NEW_ROUND_TING_PAI: Shape = Shape::new(
    "NewRoundTingPai",
    &[scalar(1, "seat"), nested(2, "tingpais1", &TING_PAI_INFO)],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct NewRoundOpenedTiles {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(string, repeated, tag = "2")]
    pub tiles: Vec<String>,
    #[prost(uint32, repeated, tag = "3")]
    pub count: Vec<u32>,
}

pub static NEW_ROUND_OPENED_TILES: Shape = Shape::new(
    "NewRoundOpenedTiles",
    &[scalar(1, "seat"), scalar(2, "tiles"), scalar(3, "count")],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordDealTile {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(string, tag = "2")]
    pub tile: String,
    #[prost(uint32, tag = "3")]
    pub left_tile_count: u32,
    #[prost(message, optional, tag = "5")]
    pub liqi: Option<LiQiSuccess>,
    #[prost(string, repeated, tag = "6")]
    pub doras: Vec<String>,
    #[prost(bool, repeated, tag = "7")]
    pub zhenting: Vec<bool>,
    #[prost(message, optional, tag = "8")]
    pub operation: Option<OptionalOperationList>,
    #[prost(uint32, tag = "9")]
    pub tile_state: u32,
}

pub static RECORD_DEAL_TILE: Shape = Shape::new(
    "RecordDealTile",
    &[
        scalar(1, "seat"),
        scalar(2, "tile"),
        scalar(3, "left_tile_count"),
        nested(5, "liqi", &LI_QI_SUCCESS),
        scalar(6, "doras"),
        scalar(7, "zhenting"),
        nested(8, "operation", &OPTIONAL_OPERATION_LIST),
        scalar(9, "tile_state"),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordDiscardTile {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(string, tag = "2")]
    pub tile: String,
    #[prost(bool, tag = "3")]
    pub is_liqi: bool,
    #[prost(bool, tag = "5")]
    pub moqie: bool,
    #[prost(bool, repeated, tag = "6")]
    pub zhenting: Vec<bool>,
    #[prost(message, repeated, tag = "7")]
    pub tingpais: Vec<TingPaiInfo>,
    #[prost(string, repeated, tag = "8")]
    pub doras: Vec<String>,
    #[prost(bool, tag = "9")]
    pub is_wliqi: bool,
    #[prost(message, repeated, tag = "10")]
    pub operations: Vec<OptionalOperationList>,
    #[prost(uint32, tag = "11")]
    pub tile_state: u32,
}

pub static RECORD_DISCARD_TILE: Shape = Shape::new(
    "RecordDiscardTile",
    &[
        scalar(1, "seat"),
        scalar(2, "tile"),
        scalar(3, "is_liqi"),
        scalar(5, "moqie"),
        scalar(6, "zhenting"),
        nested(7, "tingpais", &TING_PAI_INFO),
        scalar(8, "doras"),
        scalar(9, "is_wliqi"),
        nested(10, "operations", &OPTIONAL_OPERATION_LIST),
        scalar(11, "tile_state"),
    ],
);

/// Chi (`type` 0), pon (1) or open quad (2).
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordChiPengGang {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(uint32, tag = "2")]
    pub r#type: u32,
    #[prost(string, repeated, tag = "3")]
    pub tiles: Vec<String>,
    #[prost(uint32, repeated, tag = "4")]
    pub froms: Vec<u32>,
    #[prost(message, optional, tag = "5")]
    pub liqi: Option<LiQiSuccess>,
    #[prost(bool, repeated, tag = "6")]
    pub zhenting: Vec<bool>,
    #[prost(message, optional, tag = "7")]
    pub operation: Option<OptionalOperationList>,
    #[prost(uint32, repeated, tag = "8")]
    pub tile_states: Vec<u32>,
}

pub static RECORD_CHI_PENG_GANG: Shape = Shape::new(
    "RecordChiPengGang",
    &[
        scalar(1, "seat"),
        scalar(2, "type"),
        scalar(3, "tiles"),
        scalar(4, "froms"),
        nested(5, "liqi", &LI_QI_SUCCESS),
        scalar(6, "zhenting"),
        nested(7, "operation", &OPTIONAL_OPERATION_LIST),
        scalar(8, "tile_states"),
    ],
);

/// Added quad (`type` 2) or concealed quad (3).
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordAnGangAddGang {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(uint32, tag = "2")]
    pub r#type: u32,
    #[prost(string, tag = "3")]
    pub tiles: String,
    #[prost(string, repeated, tag = "6")]
    pub doras: Vec<String>,
    #[prost(message, repeated, tag = "7")]
    pub operations: Vec<OptionalOperationList>,
}

pub static RECORD_AN_GANG_ADD_GANG: Shape = Shape::new(
    "RecordAnGangAddGang",
    &[
        scalar(1, "seat"),
        scalar(2, "type"),
        scalar(3, "tiles"),
        scalar(6, "doras"),
        nested(7, "operations", &OPTIONAL_OPERATION_LIST),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordHule {
    #[prost(message, repeated, tag = "1")]
    pub hules: Vec<HuleInfo>,
    #[prost(int32, repeated, tag = "2")]
    pub old_scores: Vec<i32>,
    #[prost(int32, repeated, tag = "3")]
    pub delta_scores: Vec<i32>,
    #[prost(uint32, tag = "4")]
    pub wait_timeout: u32,
    #[prost(int32, repeated, tag = "5")]
    pub scores: Vec<i32>,
    #[prost(message, optional, tag = "6")]
    pub gameend: Option<GameEnd>,
    #[prost(string, repeated, tag = "7")]
    pub doras: Vec<String>,
}

pub static RECORD_HULE: Shape = Shape::new(
    "RecordHule",
    &[
        nested(1, "hules", &HULE_INFO),
        scalar(2, "old_scores"),
        scalar(3, "delta_scores"),
        scalar(4, "wait_timeout"),
        scalar(5, "scores"),
        nested(6, "gameend", &GAME_END),
        scalar(7, "doras"),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct GameEnd {
    #[prost(int32, repeated, tag = "1")]
    pub scores: Vec<i32>,
}

pub static GAME_END: Shape = Shape::new("GameEnd", &[scalar(1, "scores")]);

/// One winning hand.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct HuleInfo {
    #[prost(string, repeated, tag = "1")]
    pub hand: Vec<String>,
    /// Melds as `"shunzi(1m,2m,3m)"`-style strings.
    #[prost(string, repeated, tag = "2")]
    pub ming: Vec<String>,
    #[prost(string, tag = "3")]
    pub hu_tile: String,
    #[prost(uint32, tag = "4")]
    pub seat: u32,
    #[prost(bool, tag = "5")]
    pub zimo: bool,
    #[prost(bool, tag = "6")]
    pub qinjia: bool,
    #[prost(bool, tag = "7")]
    pub liqi: bool,
    #[prost(string, repeated, tag = "8")]
    pub doras: Vec<String>,
    #[prost(string, repeated, tag = "9")]
    pub li_doras: Vec<String>,
    #[prost(bool, tag = "10")]
    pub yiman: bool,
    #[prost(uint32, tag = "11")]
    pub count: u32,
    #[prost(message, repeated, tag = "12")]
    pub fans: Vec<FanInfo>,
    #[prost(uint32, tag = "13")]
    pub fu: u32,
    #[prost(string, tag = "14")]
    pub title: String,
    #[prost(uint32, tag = "15")]
    pub point_rong: u32,
    #[prost(uint32, tag = "16")]
    pub point_zimo_qin: u32,
    #[prost(uint32, tag = "17")]
    pub point_zimo_xian: u32,
    #[prost(uint32, tag = "18")]
    pub title_id: u32,
    #[prost(uint32, tag = "19")]
    pub point_sum: u32,
    #[prost(uint32, tag = "20")]
    pub dadian: u32,
}

pub static HULE_INFO: Shape = Shape::new(
    "HuleInfo",
    &[
        scalar(1, "hand"),
        scalar(2, "ming"),
        scalar(3, "hu_tile"),
        scalar(4, "seat"),
        scalar(5, "zimo"),
        scalar(6, "qinjia"),
        scalar(7, "liqi"),
        scalar(8, "doras"),
        scalar(9, "li_doras"),
        scalar(10, "yiman"),
        scalar(11, "count"),
        nested(12, "fans", &FAN_INFO),
        scalar(13, "fu"),
        scalar(14, "title"),
        scalar(15, "point_rong"),
        scalar(16, "point_zimo_qin"),
        scalar(17, "point_zimo_xian"),
        scalar(18, "title_id"),
        scalar(19, "point_sum"),
        scalar(20, "dadian"),
    ],
);

/// One scoring role of a winning hand.
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct FanInfo {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(uint32, tag = "2")]
    pub val: u32,
    #[prost(uint32, tag = "3")]
    pub id: u32,
}

pub static FAN_INFO: Shape =
    Shape::new("FanInfo", &[scalar(1, "name"), scalar(2, "val"), scalar(3, "id")]);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordNoTile {
    #[prost(bool, tag = "1")]
    pub liujumanguan: bool,
    #[prost(message, repeated, tag = "2")]
    pub players: Vec<NoTilePlayerInfo>,
    #[prost(message, repeated, tag = "3")]
    pub scores: Vec<NoTileScoreInfo>,
    #[prost(bool, tag = "4")]
    pub gameend: bool,
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub hules_history: Vec<Vec<u8>>,
}

pub static RECORD_NO_TILE: Shape = Shape::new(
    "RecordNoTile",
    &[
        scalar(1, "liujumanguan"),
        nested(2, "players", &NO_TILE_PLAYER_INFO),
        nested(3, "scores", &NO_TILE_SCORE_INFO),
        scalar(4, "gameend"),
        opaque(5, "hules_history"),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct NoTilePlayerInfo {
    #[prost(bool, tag = "3")]
    pub tingpai: bool,
    #[prost(string, repeated, tag = "4")]
    pub hand: Vec<String>,
    #[prost(message, repeated, tag = "5")]
    pub tings: Vec<TingPaiInfo>,
    #[prost(bool, tag = "6")]
    pub already_hule: bool,
}

pub static NO_TILE_PLAYER_INFO: Shape = Shape::new(
    "NoTilePlayerInfo",
    &[
        scalar(3, "tingpai"),
        scalar(4, "hand"),
        nested(5, "tings", &TING_PAI_INFO),
        scalar(6, "already_hule"),
    ],
);

#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct NoTileScoreInfo {
    #[prost(uint32, tag = "1")]
    pub seat: u32,
    #[prost(int32, repeated, tag = "2")]
    pub old_scores: Vec<i32>,
    #[prost(int32, repeated, tag = "3")]
    pub delta_scores: Vec<i32>,
    #[prost(string, repeated, tag = "4")]
    pub hand: Vec<String>,
    #[prost(string, repeated, tag = "5")]
    pub ming: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub doras: Vec<String>,
    #[prost(uint32, tag = "7")]
    pub score: u32,
}

pub static NO_TILE_SCORE_INFO: Shape = Shape::new(
    "NoTileScoreInfo",
    &[
        scalar(1, "seat"),
        scalar(2, "old_scores"),
        scalar(3, "delta_scores"),
        scalar(4, "hand"),
        scalar(5, "ming"),
        scalar(6, "doras"),
        scalar(7, "score"),
    ],
);

/// An aborted round: nine terminals (`type` 1), four winds (2), four
/// quads (3), four riichi (4).
#[derive(Clone, PartialEq, prost::Message, Serialize)]
pub struct RecordLiuJu {
    #[prost(uint32, tag = "1")]
    pub r#type: u32,
    #[prost(uint32, tag = "3")]
    pub seat: u32,
    #[prost(string, repeated, tag = "4")]
    pub tiles: Vec<String>,
    #[prost(string, repeated, tag = "6")]
    pub allplayertiles: Vec<String>,
    #[prost(bytes = "vec", repeated, tag = "9")]
    pub hules_history: Vec<Vec<u8>>,
}

pub static RECORD_LIU_JU: Shape = Shape::new(
    "RecordLiuJu",
    &[
        scalar(1, "type"),
        scalar(3, "seat"),
        scalar(4, "tiles"),
        scalar(6, "allplayertiles"),
        opaque(9, "hules_history"),
    ],
);

// ---------------------------------------------------------------------------
// Strict impls
// ---------------------------------------------------------------------------

macro_rules! impl_strict {
    ($($ty:ty => $shape:ident),* $(,)?) => {
        $(
            impl Strict for $ty {
                fn shape() -> &'static Shape {
                    &$shape
                }
            }
        )*
    };
}

impl_strict! {
    ActionPrototype => ACTION_PROTOTYPE,
    ResGameRecord => RES_GAME_RECORD,
    GameDetailRecords => GAME_DETAIL_RECORDS,
    RecordGame => RECORD_GAME,
    RecordNewRound => RECORD_NEW_ROUND,
    RecordDealTile => RECORD_DEAL_TILE,
    RecordDiscardTile => RECORD_DISCARD_TILE,
    RecordChiPengGang => RECORD_CHI_PENG_GANG,
    RecordAnGangAddGang => RECORD_AN_GANG_ADD_GANG,
    RecordHule => RECORD_HULE,
    RecordNoTile => RECORD_NO_TILE,
    RecordLiuJu => RECORD_LIU_JU,
}

#[cfg(test)]
pub(crate) static ALL_SHAPES: &[&Shape] = &[
    &ACTION_PROTOTYPE,
    &RES_GAME_RECORD,
    &GAME_DETAIL_RECORDS,
    &RECORD_GAME,
    &GAME_CONFIG,
    &GAME_MODE,
    &GAME_META_DATA,
    &ACCOUNT_INFO,
    &CHARACTER,
    &ACCOUNT_LEVEL,
    &VIEW_SLOT,
    &GAME_END_RESULT,
    &PLAYER_ITEM,
    &TING_PAI_INFO,
    &OPTIONAL_OPERATION_LIST,
    &OPTIONAL_OPERATION,
    &LI_QI_SUCCESS,
    &RECORD_NEW_ROUND,
    &NEW_ROUND_TING_PAI,
    &NEW_ROUND_OPENED_TILES,
    &RECORD_DEAL_TILE,
    &RECORD_DISCARD_TILE,
    &RECORD_CHI_PENG_GANG,
    &RECORD_AN_GANG_ADD_GANG,
    &RECORD_HULE,
    &GAME_END,
    &HULE_INFO,
    &FAN_INFO,
    &RECORD_NO_TILE,
    &NO_TILE_PLAYER_INFO,
    &NO_TILE_SCORE_INFO,
    &RECORD_LIU_JU,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_have_unique_ascending_field_numbers() {
        for shape in ALL_SHAPES {
            let numbers: Vec<u32> = shape.fields().iter().map(|f| f.number()).collect();
            let mut sorted = numbers.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(numbers, sorted, "{} has unsorted or duplicate fields", shape.name());
        }
    }
}
