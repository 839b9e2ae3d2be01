//! The game summary: who played, under which rules, and how it ended.

use paifu_protocol::lq::{AccountInfo, AccountLevel, GameConfig, ResGameRecord};

use crate::check::{
    Check, child, empty, equals, in_range, item, len_in, one_of, present, seat,
};

/// `config.category`: 1 friendly, 2 ranked.
pub const CATEGORIES: &[u32] = &[1, 2];

/// `config.mode.mode`: 1 east-only, 2 half game, 4 single round.
pub const MODES: &[u32] = &[1, 2, 4];

/// Ranked presets (`config.meta.mode_id`) by room and length.
pub const MODE_IDS: &[u32] = &[2, 6, 8, 9, 11, 12, 15, 16, 21, 22, 23, 24, 26];

/// Account titles seen in ranked games; 0 is "no title".
pub const TITLES: &[u32] = &[
    0, 600002, 600003, 600004, 600005, 600006, 600007, 600008, 600009, 600010, 600011, 600012,
    600013, 600014, 600015, 600016, 600017, 600018, 600019, 600020, 600021, 600022, 600026,
    600027, 600028, 600029, 600031, 600032, 600035, 600036, 600037, 600038, 600042, 600044,
    600045, 600046, 600047, 600048,
];

/// Avatar frames seen in ranked games; 0 is "none".
pub const AVATAR_FRAMES: &[u32] = &[
    0, 305500, 305510, 305511, 305512, 305514, 305515, 305516, 305517, 305518, 305519, 305520,
    305521, 305522, 305523, 305524, 305525, 305526, 305527, 305528, 305529, 305531, 305533,
    305534,
];

/// Four-player ladder ids. `107xx` is the 魂天 ladder with stars.
pub const LEVEL4_IDS: &[u32] = &[
    10101, 10102, 10103, 10201, 10202, 10203, 10301, 10302, 10303, 10401, 10402, 10403, 10501,
    10502, 10503, 10601, 10701, 10702, 10703, 10704, 10705, 10706,
];

/// Three-player ladder ids.
pub const LEVEL3_IDS: &[u32] = &[
    20101, 20102, 20103, 20201, 20202, 20203, 20301, 20302, 20303, 20401, 20402, 20403, 20501,
    20502, 20503, 20601, 20701, 20702, 20703, 20704, 20705,
];

/// Validates a `fetchGameRecord` response body.
pub fn validate_summary(response: &ResGameRecord) -> Check {
    equals(&response.data_url.as_str(), &"", "data_url")?;

    let head = present(&response.head, "head")?;
    let config = present(&head.config, "head.config")?;
    validate_config(config, "head.config")?;

    let accounts = "head.accounts";
    len_in(head.accounts.len(), 1, 4, accounts)?;
    for (i, account) in head.accounts.iter().enumerate() {
        validate_account(account, &item(accounts, i))?;
    }

    let result = present(&head.result, "head.result")?;
    let players = "head.result.players";
    len_in(result.players.len(), 3, 4, players)?;
    for (i, player) in result.players.iter().enumerate() {
        let path = item(players, i);
        seat(player.seat, &child(&path, "seat"))?;
        equals(&player.part_point_2, &0, &child(&path, "part_point_2"))?;
    }
    Ok(())
}

fn validate_config(config: &GameConfig, path: &str) -> Check {
    one_of(config.category, CATEGORIES, &child(path, "category"))?;

    let mode_path = child(path, "mode");
    let mode = present(&config.mode, &mode_path)?;
    one_of(mode.mode, MODES, &child(&mode_path, "mode"))?;
    equals(&mode.extendinfo.as_str(), &"", &child(&mode_path, "extendinfo"))?;
    present(&mode.detail_rule, &child(&mode_path, "detail_rule"))?;

    let meta_path = child(path, "meta");
    let meta = present(&config.meta, &meta_path)?;
    one_of(meta.mode_id, MODE_IDS, &child(&meta_path, "mode_id"))?;
    equals(&meta.contest_uid, &0, &child(&meta_path, "contest_uid"))
}

fn validate_account(account: &AccountInfo, path: &str) -> Check {
    seat(account.seat, &child(path, "seat"))?;

    let character_path = child(path, "character");
    let character = present(&account.character, &character_path)?;
    empty(&character.views, &child(&character_path, "views"))?;

    one_of(account.title, TITLES, &child(path, "title"))?;
    validate_level(&account.level, LEVEL4_IDS, &child(path, "level"))?;
    validate_level(&account.level3, LEVEL3_IDS, &child(path, "level3"))?;
    one_of(account.avatar_frame, AVATAR_FRAMES, &child(path, "avatar_frame"))?;
    in_range(account.verified, 0, 2, &child(path, "verified"))
}

fn validate_level(level: &Option<AccountLevel>, ids: &[u32], path: &str) -> Check {
    let level = present(level, path)?;
    one_of(level.id, ids, &child(path, "id"))
}
