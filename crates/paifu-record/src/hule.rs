//! Winning hands.
//!
//! A `RecordHule` carries one [`Hule`] per winner (up to three on a
//! single discard). Each one is checked on construction: the hand and
//! meld counts add up, every yaku carries a fan value it can actually
//! have, and exactly the payment fields for the way of winning are set.

use std::ops::RangeInclusive;

use paifu_protocol::lq::{HuleInfo, RecordHule};
use paifu_tile::{InvalidValue, Seat, Tile};
use serde::Serialize;

use crate::meld::Ming;
use crate::{four, tiles};

// ---------------------------------------------------------------------------
// Yaku
// ---------------------------------------------------------------------------

/// Yaku titles indexed by fan id.
pub const HUPAI_TITLES: [&str; 50] = [
    "",
    "門前清自摸和",
    "立直",
    "槍槓",
    "嶺上開花",
    "海底摸月",
    "河底撈魚",
    "役牌白",
    "役牌發",
    "役牌中",
    "役牌:自風牌",
    "役牌:場風牌",
    "断幺九",
    "一盃口",
    "平和",
    "混全帯幺九",
    "一気通貫",
    "三色同順",
    "ダブル立直",
    "三色同刻",
    "三槓子",
    "対々和",
    "三暗刻",
    "小三元",
    "混老頭",
    "七対子",
    "純全帯幺九",
    "混一色",
    "二盃口",
    "清一色",
    "一発",
    "ドラ",
    "赤ドラ",
    "裏ドラ",
    "流し満貫",
    "天和",
    "地和",
    "大三元",
    "四暗刻",
    "字一色",
    "緑一色",
    "清老頭",
    "国士無双",
    "小四喜",
    "四槓子",
    "九蓮宝燈",
    "純正九蓮宝燈",
    "四暗刻単騎",
    "国士無双十三面待ち",
    "大四喜",
];

/// Dora, red dora and ura dora. Listed with a value of 0 when the hand
/// has none.
const DORA_IDS: RangeInclusive<u32> = 31..=33;

/// The fan values a yaku can carry. Yakuman count multiples of a
/// yakuman rather than fan.
fn fan_range(id: u32) -> RangeInclusive<u32> {
    match id {
        // Closed and open hands score the same.
        1..=14 | 30 => 1..=1,
        // One fan less once the hand is open.
        15..=17 => 1..=2,
        18..=25 => 2..=2,
        26 | 27 => 2..=3,
        28 => 3..=3,
        29 => 5..=6,
        // Single yakuman that never count double.
        38 | 43 => 1..=1,
        _ => 1..=u32::MAX,
    }
}

/// One scoring element of a winning hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hupai {
    title: &'static str,
    fan: u32,
}

impl Hupai {
    /// Builds a yaku from its title.
    ///
    /// # Errors
    /// Returns [`InvalidValue`] for an unknown title, or a fan value the
    /// title cannot carry.
    pub fn new(title: &str, fan: u32) -> Result<Self, InvalidValue> {
        let id = HUPAI_TITLES
            .iter()
            .skip(1)
            .position(|t| *t == title)
            .ok_or_else(|| InvalidValue::new(format!("{title}: An unknown title.")))?;
        Self::from_id(id as u32 + 1, fan)
    }

    /// Builds a yaku from its wire id.
    pub fn from_id(id: u32, fan: u32) -> Result<Self, InvalidValue> {
        let title = HUPAI_TITLES
            .get(id as usize)
            .copied()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| InvalidValue::new(format!("{id}: An unknown fan id.")))?;
        if !fan_range(id).contains(&fan) {
            return Err(InvalidValue::new(format!(
                "title == {title}, fan == {fan}: An invalid combination."
            )));
        }
        Ok(Self { title, fan })
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn fan(&self) -> u32 {
        self.fan
    }
}

// ---------------------------------------------------------------------------
// Limit titles
// ---------------------------------------------------------------------------

/// Limit-hand titles indexed by `title_id`. 0 is a hand below mangan.
const FAN_TITLES: [&str; 10] = [
    "",
    "満貫",
    "跳満",
    "倍満",
    "三倍満",
    "役満",
    "二倍役満",
    "三倍役満",
    "四倍役満",
    "五倍役満",
];

/// `title_id` of a hand that reaches yakuman by counting 13 fan.
const KAZOE_YAKUMAN: u32 = 11;

fn fan_title(id: u32) -> Result<Option<&'static str>, InvalidValue> {
    match id {
        0 => Ok(None),
        KAZOE_YAKUMAN => Ok(Some("数え役満")),
        _ => FAN_TITLES
            .get(id as usize)
            .map(|t| Some(*t))
            .ok_or_else(|| InvalidValue::new(format!("{id}: An invalid value for `fan_title`."))),
    }
}

// ---------------------------------------------------------------------------
// Hule
// ---------------------------------------------------------------------------

/// Who pays a winner, and how much.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payment {
    /// The discarder pays everything.
    Rong { point_rong: u32 },
    /// Self-draw by the dealer: every other seat pays the same.
    DealerZimo { point_zimo_sanjia: u32 },
    /// Self-draw by a non-dealer: the dealer pays more.
    Zimo {
        point_zimo_zhuangjia: u32,
        point_zimo_sanjia: u32,
    },
}

impl Payment {
    fn from_info(info: &HuleInfo) -> Result<Self, InvalidValue> {
        let required = |name: &str, value: u32| {
            if value == 0 {
                Err(InvalidValue::new(format!(
                    "zimo == {}, zhuangjia == {}: `{name}` must be set.",
                    info.zimo, info.qinjia
                )))
            } else {
                Ok(value)
            }
        };
        Ok(match (info.zimo, info.qinjia) {
            (false, _) => Self::Rong {
                point_rong: required("point_rong", info.point_rong)?,
            },
            (true, true) => Self::DealerZimo {
                point_zimo_sanjia: required("point_zimo_sanjia", info.point_zimo_xian)?,
            },
            (true, false) => Self::Zimo {
                point_zimo_zhuangjia: required("point_zimo_zhuangjia", info.point_zimo_qin)?,
                point_zimo_sanjia: required("point_zimo_sanjia", info.point_zimo_xian)?,
            },
        })
    }
}

/// One winner's hand and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hule {
    seat: Seat,
    zhuangjia: bool,
    hand: Vec<Tile>,
    ming_list: Vec<Ming>,
    hupai: Tile,
    lizhi: bool,
    zimo: bool,
    doras: Vec<Tile>,
    li_doras: Vec<Tile>,
    fu: u32,
    hupai_list: Vec<Hupai>,
    fan: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    fan_title: Option<&'static str>,
    damanguan: bool,
    #[serde(flatten)]
    payment: Payment,
}

impl Hule {
    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn hand(&self) -> &[Tile] {
        &self.hand
    }

    pub fn ming_list(&self) -> &[Ming] {
        &self.ming_list
    }

    pub fn hupai_list(&self) -> &[Hupai] {
        &self.hupai_list
    }

    pub fn fan(&self) -> u32 {
        self.fan
    }

    pub fn fan_title(&self) -> Option<&'static str> {
        self.fan_title
    }

    pub fn payment(&self) -> Payment {
        self.payment
    }
}

impl TryFrom<&HuleInfo> for Hule {
    type Error = InvalidValue;

    fn try_from(info: &HuleInfo) -> Result<Self, Self::Error> {
        let hand = tiles(&info.hand)?;
        if ![1, 4, 7, 10, 13].contains(&hand.len()) {
            return Err(InvalidValue::new(format!(
                "An invalid value for `hand`: {:?}",
                info.hand
            )));
        }
        let ming_list = info
            .ming
            .iter()
            .map(|m| Ming::parse(m))
            .collect::<Result<Vec<_>, _>>()?;
        if hand.len() + 3 * ming_list.len() != 13 {
            return Err(InvalidValue::new(format!(
                "An invalid combination of `hand` and `ming_list`: hand == {:?}, ming_list == {:?}",
                info.hand, info.ming
            )));
        }
        if info.fu < 20 {
            return Err(InvalidValue::new(format!(
                "{}: An invalid value for `fu`.",
                info.fu
            )));
        }
        if info.count < 1 {
            return Err(InvalidValue::new(format!(
                "{}: An invalid value for `fan`.",
                info.count
            )));
        }

        let hupai_list = info
            .fans
            .iter()
            .filter(|f| !(DORA_IDS.contains(&f.id) && f.val == 0))
            .map(|f| Hupai::from_id(f.id, f.val))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            seat: Seat::new(info.seat)?,
            zhuangjia: info.qinjia,
            hand,
            ming_list,
            hupai: Tile::new(&info.hu_tile)?,
            lizhi: info.liqi,
            zimo: info.zimo,
            doras: tiles(&info.doras)?,
            li_doras: tiles(&info.li_doras)?,
            fu: info.fu,
            hupai_list,
            fan: info.count,
            fan_title: fan_title(info.title_id)?,
            damanguan: info.yiman,
            payment: Payment::from_info(info)?,
        })
    }
}

/// The end of a round by one or more wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundEndByHule {
    hule_list: Vec<Hule>,
    old_scores: [i32; 4],
    delta_scores: [i32; 4],
    new_scores: [i32; 4],
}

impl RoundEndByHule {
    pub fn hule_list(&self) -> &[Hule] {
        &self.hule_list
    }

    pub fn new_scores(&self) -> [i32; 4] {
        self.new_scores
    }
}

impl TryFrom<&RecordHule> for RoundEndByHule {
    type Error = InvalidValue;

    fn try_from(record: &RecordHule) -> Result<Self, Self::Error> {
        if !(1..=3).contains(&record.hules.len()) {
            return Err(InvalidValue::new(format!(
                "{}: An invalid number of winners.",
                record.hules.len()
            )));
        }
        Ok(Self {
            hule_list: record
                .hules
                .iter()
                .map(Hule::try_from)
                .collect::<Result<_, _>>()?,
            old_scores: four(&record.old_scores, "old_scores")?,
            delta_scores: four(&record.delta_scores, "delta_scores")?,
            new_scores: four(&record.scores, "new_scores")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use paifu_protocol::lq::FanInfo;

    use super::*;

    fn strings(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    fn fan(id: u32, val: u32) -> FanInfo {
        FanInfo {
            name: String::new(),
            val,
            id,
        }
    }

    /// Riichi, menzen tsumo and pinfu by a non-dealer.
    fn info() -> HuleInfo {
        HuleInfo {
            hand: strings(&[
                "2m", "3m", "4m", "6p", "7p", "8p", "3s", "4s", "5s", "6s", "7s", "9m", "9m",
            ]),
            hu_tile: "8s".into(),
            seat: 2,
            zimo: true,
            liqi: true,
            doras: strings(&["1z"]),
            li_doras: strings(&["4p"]),
            count: 3,
            fans: vec![fan(2, 1), fan(1, 1), fan(14, 1), fan(31, 0), fan(33, 0)],
            fu: 20,
            point_zimo_qin: 1300,
            point_zimo_xian: 700,
            point_sum: 2700,
            ..Default::default()
        }
    }

    #[test]
    fn test_hupai_menzen_tsumo_requires_one_fan() {
        assert_eq!(Hupai::new("門前清自摸和", 1).unwrap().fan(), 1);
        let err = Hupai::new("門前清自摸和", 2).unwrap_err();
        assert_eq!(
            err.message(),
            "title == 門前清自摸和, fan == 2: An invalid combination."
        );
    }

    #[test]
    fn test_hupai_fan_ranges() {
        assert!(Hupai::new("一気通貫", 1).is_ok());
        assert!(Hupai::new("一気通貫", 2).is_ok());
        assert!(Hupai::new("一気通貫", 3).is_err());
        assert!(Hupai::new("清一色", 4).is_err());
        assert!(Hupai::new("清一色", 6).is_ok());
        assert!(Hupai::new("ドラ", 4).is_ok());
        assert!(Hupai::new("ドラ", 0).is_err());
        assert!(Hupai::new("大四喜", 2).is_ok());
        assert!(Hupai::new("四暗刻", 2).is_err());
        assert!(Hupai::new("", 1).is_err());
        assert!(Hupai::from_id(50, 1).is_err());
    }

    #[test]
    fn test_hule_skips_empty_dora_and_sets_non_dealer_shares() {
        let hule = Hule::try_from(&info()).unwrap();
        let titles: Vec<&str> = hule.hupai_list().iter().map(Hupai::title).collect();
        assert_eq!(titles, ["立直", "門前清自摸和", "平和"]);
        assert_eq!(
            hule.payment(),
            Payment::Zimo {
                point_zimo_zhuangjia: 1300,
                point_zimo_sanjia: 700
            }
        );
        let json = serde_json::to_value(&hule).unwrap();
        assert_eq!(json["point_zimo_zhuangjia"], 1300);
        assert_eq!(json["point_zimo_sanjia"], 700);
        assert!(json.get("point_rong").is_none());
        assert!(json.get("fan_title").is_none());
        assert_eq!(json["hupai"], "8s");
    }

    #[test]
    fn test_hule_dealer_zimo_has_only_sanjia_share() {
        let mut wire = info();
        wire.qinjia = true;
        wire.point_zimo_qin = 0;
        wire.point_zimo_xian = 1300;
        let json = serde_json::to_value(Hule::try_from(&wire).unwrap()).unwrap();
        assert_eq!(json["point_zimo_sanjia"], 1300);
        assert!(json.get("point_zimo_zhuangjia").is_none());
    }

    #[test]
    fn test_hule_rong_without_point_is_invalid() {
        let mut wire = info();
        wire.zimo = false;
        assert!(Hule::try_from(&wire).is_err());
        wire.point_rong = 3900;
        wire.fans = vec![fan(2, 1), fan(14, 1)];
        assert_eq!(
            Hule::try_from(&wire).unwrap().payment(),
            Payment::Rong { point_rong: 3900 }
        );
    }

    #[test]
    fn test_hule_hand_and_melds_must_make_thirteen() {
        let mut wire = info();
        wire.ming = strings(&["kezi(5z,5z,5z)"]);
        let err = Hule::try_from(&wire).unwrap_err();
        assert!(err.message().starts_with("An invalid combination of `hand`"));

        wire.hand.truncate(10);
        assert_eq!(Hule::try_from(&wire).unwrap().ming_list().len(), 1);
    }

    #[test]
    fn test_hule_fan_title_table() {
        let mut wire = info();
        wire.title_id = 3;
        assert_eq!(Hule::try_from(&wire).unwrap().fan_title(), Some("倍満"));
        wire.title_id = 11;
        assert_eq!(Hule::try_from(&wire).unwrap().fan_title(), Some("数え役満"));
        wire.title_id = 10;
        assert!(Hule::try_from(&wire).is_err());
    }

    #[test]
    fn test_round_end_requires_four_scores() {
        let mut record = RecordHule {
            hules: vec![info()],
            old_scores: vec![25000; 4],
            delta_scores: vec![-1300, -700, 2700, -700],
            scores: vec![23700, 24300, 27700, 24300],
            ..Default::default()
        };
        assert_eq!(
            RoundEndByHule::try_from(&record).unwrap().new_scores(),
            [23700, 24300, 27700, 24300]
        );
        record.scores.pop();
        assert!(RoundEndByHule::try_from(&record).is_err());
    }
}
