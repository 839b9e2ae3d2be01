//! The whole game: who played, under which preset, and its rounds.

use chrono::{DateTime, Utc};
use paifu_protocol::lq::{self, AccountInfo, PlayerItem, RecordGame};
use paifu_tile::{InvalidValue, Seat};
use serde::Serialize;

use crate::round::GameRound;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The human-readable name of a ranked preset, e.g.
/// `段位戦・金の間・四人半荘戦`.
pub fn mode_label(mode_id: u32) -> Result<String, InvalidValue> {
    let (room, players, length) = match mode_id {
        2 => ("銅", "四人", "東風"),
        3 => ("銅", "四人", "半荘"),
        5 => ("銀", "四人", "東風"),
        6 => ("銀", "四人", "半荘"),
        8 => ("金", "四人", "東風"),
        9 => ("金", "四人", "半荘"),
        11 => ("玉", "四人", "東風"),
        12 => ("玉", "四人", "半荘"),
        15 => ("王座", "四人", "東風"),
        16 => ("王座", "四人", "半荘"),
        17 => ("銅", "三人", "東風"),
        18 => ("銅", "三人", "半荘"),
        19 => ("銀", "三人", "東風"),
        20 => ("銀", "三人", "半荘"),
        21 => ("金", "三人", "東風"),
        22 => ("金", "三人", "半荘"),
        23 => ("玉", "三人", "東風"),
        24 => ("玉", "三人", "半荘"),
        25 => ("王座", "三人", "東風"),
        26 => ("王座", "三人", "半荘"),
        other => {
            return Err(InvalidValue::new(format!(
                "{other}: An invalid value for `mode_id`."
            )));
        }
    };
    Ok(format!("段位戦・{room}の間・{players}{length}戦"))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Which ladder a level id belongs to; the ten-thousands digit of the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ladder {
    Four = 1,
    Three = 2,
}

const LEVEL_TITLES: [&str; 8] = ["", "初心", "雀士", "雀傑", "雀豪", "雀聖", "魂天", "魂天"];

/// A ladder standing: rank title, step within the rank, and points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountLevel {
    title: &'static str,
    level: u32,
    grading_point: u32,
}

impl AccountLevel {
    fn new(level: &lq::AccountLevel, ladder: Ladder) -> Result<Self, InvalidValue> {
        let invalid = || InvalidValue::new(format!("{}: An invalid level id.", level.id));
        if level.id / 10000 != ladder as u32 {
            return Err(invalid());
        }
        let rank = (level.id % 10000 / 100) as usize;
        let step = level.id % 100;
        let title = LEVEL_TITLES
            .get(rank)
            .copied()
            .filter(|t| !t.is_empty())
            .ok_or_else(invalid)?;
        // 魂天 counts stars instead of three steps.
        let valid_step = match rank {
            1..=5 => (1..=3).contains(&step),
            _ => step >= 1,
        };
        if !valid_step {
            return Err(invalid());
        }
        Ok(Self {
            title,
            level: step,
            grading_point: level.score,
        })
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn grading_point(&self) -> u32 {
        self.grading_point
    }
}

/// One player and how the game went for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: u32,
    nickname: String,
    level4: AccountLevel,
    level3: AccountLevel,
    final_base_score: i32,
    final_total_score: i32,
    delta_grading_point: i32,
    delta_coin: i32,
}

impl Account {
    fn new(info: &AccountInfo, result: &PlayerItem) -> Result<Self, InvalidValue> {
        let level = |level: &Option<lq::AccountLevel>, name: &str, ladder| {
            level
                .as_ref()
                .ok_or_else(|| InvalidValue::new(format!("`{name}` is missing.")))
                .and_then(|level| AccountLevel::new(level, ladder))
        };
        Ok(Self {
            id: info.account_id,
            nickname: info.nickname.clone(),
            level4: level(&info.level, "level", Ladder::Four)?,
            level3: level(&info.level3, "level3", Ladder::Three)?,
            final_base_score: result.part_point_1,
            final_total_score: result.total_point,
            delta_grading_point: result.grading_score,
            delta_coin: result.gold,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn level4(&self) -> &AccountLevel {
        &self.level4
    }

    pub fn final_total_score(&self) -> i32 {
        self.final_total_score
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// A reconstructed game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    uuid: String,
    mode: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    start_time: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    end_time: DateTime<Utc>,
    /// Indexed by seat.
    account_list: Vec<Account>,
    round_list: Vec<GameRound>,
}

fn timestamp(seconds: u32) -> Result<DateTime<Utc>, InvalidValue> {
    DateTime::from_timestamp(i64::from(seconds), 0)
        .ok_or_else(|| InvalidValue::new(format!("{seconds}: An invalid timestamp.")))
}

impl GameRecord {
    /// Reads everything but the rounds from the game summary. Accounts
    /// and final results are joined by seat, and every seat must have
    /// both.
    pub fn from_summary(head: &RecordGame) -> Result<Self, InvalidValue> {
        let mode_id = head
            .config
            .as_ref()
            .and_then(|config| config.meta.as_ref())
            .map(|meta| meta.mode_id)
            .ok_or_else(|| InvalidValue::new("`config.meta.mode_id` is missing."))?;
        let players = head
            .result
            .as_ref()
            .map(|result| result.players.as_slice())
            .unwrap_or_default();

        let mut account_list = Vec::with_capacity(4);
        for seat in Seat::ALL {
            let wire_seat = seat.index() as u32;
            let missing = |what: &str| InvalidValue::new(format!("seat {seat} has no {what}."));
            let info = head
                .accounts
                .iter()
                .find(|a| a.seat == wire_seat)
                .ok_or_else(|| missing("account"))?;
            let result = players
                .iter()
                .find(|p| p.seat == wire_seat)
                .ok_or_else(|| missing("result"))?;
            account_list.push(Account::new(info, result)?);
        }

        Ok(Self {
            uuid: head.uuid.clone(),
            mode: mode_label(mode_id)?,
            start_time: timestamp(head.start_time)?,
            end_time: timestamp(head.end_time)?,
            account_list,
            round_list: Vec::new(),
        })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn account_list(&self) -> &[Account] {
        &self.account_list
    }

    pub fn round_list(&self) -> &[GameRound] {
        &self.round_list
    }

    pub(crate) fn set_rounds(&mut self, rounds: Vec<GameRound>) {
        self.round_list = rounds;
    }

    /// The JSON document written to the archive.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use paifu_protocol::lq::{GameConfig, GameEndResult, GameMetaData};

    use super::*;

    fn head() -> RecordGame {
        RecordGame {
            uuid: "230101-abc".into(),
            start_time: 1_672_531_200,
            end_time: 1_672_533_000,
            config: Some(GameConfig {
                meta: Some(GameMetaData {
                    mode_id: 12,
                    ..Default::default()
                }),
                ..Default::default()
            }),
            // Out of seat order on purpose.
            accounts: [2, 0, 3, 1]
                .into_iter()
                .map(|seat| AccountInfo {
                    account_id: 100 + seat,
                    seat,
                    nickname: format!("p{seat}"),
                    level: Some(lq::AccountLevel { id: 10402, score: 1200 }),
                    level3: Some(lq::AccountLevel { id: 20101, score: 0 }),
                    ..Default::default()
                })
                .collect(),
            result: Some(GameEndResult {
                players: (0..4)
                    .map(|seat| PlayerItem {
                        seat,
                        total_point: 25000 + seat as i32,
                        part_point_1: 25000,
                        grading_score: -15,
                        gold: 1000,
                        ..Default::default()
                    })
                    .collect(),
            }),
        }
    }

    #[test]
    fn test_mode_label_every_room() {
        assert_eq!(mode_label(2).unwrap(), "段位戦・銅の間・四人東風戦");
        assert_eq!(mode_label(12).unwrap(), "段位戦・玉の間・四人半荘戦");
        assert_eq!(mode_label(26).unwrap(), "段位戦・王座の間・三人半荘戦");
        assert!(mode_label(1).is_err());
    }

    #[test]
    fn test_account_level_titles() {
        let level = |id| AccountLevel::new(&lq::AccountLevel { id, score: 0 }, Ladder::Four);
        assert_eq!(level(10101).unwrap().title(), "初心");
        assert_eq!(level(10503).unwrap().title(), "雀聖");
        assert_eq!(level(10601).unwrap().title(), "魂天");
        assert_eq!(level(10706).unwrap().level(), 6);
        assert!(level(10504).is_err());
        assert!(level(10800).is_err());
        assert!(level(20101).is_err());
    }

    #[test]
    fn test_from_summary_joins_by_seat() {
        let record = GameRecord::from_summary(&head()).unwrap();
        assert_eq!(record.mode(), "段位戦・玉の間・四人半荘戦");
        let ids: Vec<u32> = record.account_list().iter().map(Account::id).collect();
        assert_eq!(ids, [100, 101, 102, 103]);
        assert_eq!(record.account_list()[3].final_total_score(), 25003);

        let json = record.to_json().unwrap();
        assert_eq!(json["start_time"], 1_672_531_200);
        assert_eq!(json["account_list"][0]["level4"]["title"], "雀豪");
        assert_eq!(json["account_list"][0]["level4"]["grading_point"], 1200);
        assert_eq!(json["account_list"][0]["delta_grading_point"], -15);
        assert_eq!(json["round_list"], serde_json::json!([]));
    }

    #[test]
    fn test_from_summary_requires_every_seat() {
        let mut head = head();
        head.accounts.retain(|a| a.seat != 1);
        let err = GameRecord::from_summary(&head).unwrap_err();
        assert_eq!(err.message(), "seat 1 has no account.");
    }
}
