//! Precomputed tables of valid tile and seat combinations.
//!
//! Melds and meld options on the wire are lists of tiles (or
//! `"a|b|c"` strings) whose shape is fixed by the rules: a chi is a
//! run inside one suit with the claimed tile last, a pon is three of a
//! kind, and so on. The red five makes every table a little irregular
//! (`0m` may stand in for one `5m`, and only in certain positions), so
//! rather than encode the rule we enumerate every allowed list once and
//! check membership.
//!
//! The tables are built lazily on first use with [`LazyLock`] and are
//! immutable afterwards.

use std::sync::LazyLock;

use crate::{InvalidValue, Suit, Tile};

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A closed table of tile combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// A completed chi: the two tiles from hand (ascending) followed by
    /// the claimed tile. Also the table for run melds (`shunzi`).
    Chi,
    /// The two hand tiles offered for a chi.
    ChiPair,
    /// A completed pon: `NNN`, plus `550`, `055`, `555` for fives.
    /// Also the table for triplet melds (`kezi`).
    Peng,
    /// The two hand tiles offered for a pon.
    PengPair,
    /// A completed open quad on the wire: `NNNN`, plus `5550` and
    /// `0555` for fives (four plain fives cannot be claimed).
    Daminggang,
    /// The three hand tiles offered for an open quad.
    DaminggangOption,
    /// A concealed quad option: `NNNN`, plus `0555` and `5550`.
    AngangOption,
    /// An added quad option: `NNNN`, plus `0555`.
    JiagangOption,
    /// A quad inside a winning hand's meld list: `NNNN`, plus `5555`
    /// and `0555`.
    QuadMeld,
}

static CHI: LazyLock<Vec<Vec<Tile>>> = LazyLock::new(chi_table);
static CHI_PAIR: LazyLock<Vec<Vec<Tile>>> = LazyLock::new(|| {
    let mut pairs: Vec<Vec<Tile>> = Vec::new();
    for chi in CHI.iter() {
        let pair = chi[..2].to_vec();
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
});
static PENG: LazyLock<Vec<Vec<Tile>>> =
    LazyLock::new(|| same_rank(&[&[5, 5, 0], &[0, 5, 5], &[5, 5, 5]]));
static PENG_PAIR: LazyLock<Vec<Vec<Tile>>> = LazyLock::new(|| same_rank(&[&[0, 5], &[5, 5]]));
static DAMINGGANG: LazyLock<Vec<Vec<Tile>>> =
    LazyLock::new(|| same_rank(&[&[5, 5, 5, 0], &[0, 5, 5, 5]]));
static DAMINGGANG_OPTION: LazyLock<Vec<Vec<Tile>>> =
    LazyLock::new(|| same_rank(&[&[0, 5, 5], &[5, 5, 5]]));
static ANGANG_OPTION: LazyLock<Vec<Vec<Tile>>> =
    LazyLock::new(|| same_rank(&[&[0, 5, 5, 5], &[5, 5, 5, 0]]));
static JIAGANG_OPTION: LazyLock<Vec<Vec<Tile>>> = LazyLock::new(|| same_rank(&[&[0, 5, 5, 5]]));
static QUAD_MELD: LazyLock<Vec<Vec<Tile>>> =
    LazyLock::new(|| same_rank(&[&[5, 5, 5, 5], &[0, 5, 5, 5]]));

impl Table {
    /// Returns every combination in the table.
    pub fn entries(self) -> &'static [Vec<Tile>] {
        match self {
            Self::Chi => &CHI,
            Self::ChiPair => &CHI_PAIR,
            Self::Peng => &PENG,
            Self::PengPair => &PENG_PAIR,
            Self::Daminggang => &DAMINGGANG,
            Self::DaminggangOption => &DAMINGGANG_OPTION,
            Self::AngangOption => &ANGANG_OPTION,
            Self::JiagangOption => &JIAGANG_OPTION,
            Self::QuadMeld => &QUAD_MELD,
        }
    }

    /// Returns `true` if `tiles` is exactly one of the table's entries.
    pub fn contains(self, tiles: &[Tile]) -> bool {
        self.entries().iter().any(|entry| entry == tiles)
    }

    /// Returns `true` if the `"a|b|c"` string parses to an entry.
    pub fn contains_str(self, combination: &str) -> bool {
        parse_combination(combination).is_ok_and(|tiles| self.contains(&tiles))
    }
}

/// Runs `r, r+1, r+2` for `r` in `1..=7` of each numbered suit, once per
/// claimed position. A run containing a five appears twice, once with
/// `5` and once with `0` in the five's slot.
fn chi_table() -> Vec<Vec<Tile>> {
    let mut table = Vec::new();
    for suit in Suit::NUMBERED {
        for start in 1..=7u8 {
            let run = [start, start + 1, start + 2];
            for claimed in 0..3 {
                let mut order: Vec<u8> = run
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != claimed)
                    .map(|(_, r)| *r)
                    .collect();
                order.push(run[claimed]);

                let variants: &[u8] = if run.contains(&5) { &[5, 0] } else { &[5] };
                for &five in variants {
                    table.push(
                        order
                            .iter()
                            .map(|&r| Tile::from_parts(suit, if r == 5 { five } else { r }))
                            .collect(),
                    );
                }
            }
        }
    }
    table
}

/// `N` copies of every non-five tile, plus the given rank patterns for
/// the five of each numbered suit.
fn same_rank(fives: &[&[u8]]) -> Vec<Vec<Tile>> {
    let width = fives.first().map_or(0, |p| p.len());
    let mut table = Vec::new();
    for suit in Suit::NUMBERED {
        for rank in 1..=9u8 {
            if rank == 5 {
                for pattern in fives {
                    table.push(pattern.iter().map(|&r| Tile::from_parts(suit, r)).collect());
                }
            } else {
                table.push(vec![Tile::from_parts(suit, rank); width]);
            }
        }
    }
    for rank in 1..=7u8 {
        table.push(vec![Tile::from_parts(Suit::Zihai, rank); width]);
    }
    table
}

// ---------------------------------------------------------------------------
// Combination strings
// ---------------------------------------------------------------------------

/// Parses a `"|"`-separated combination string such as `"0m|5m|5m"`.
///
/// # Errors
/// Returns [`InvalidValue`] if any component is not a tile code.
pub fn parse_combination(combination: &str) -> Result<Vec<Tile>, InvalidValue> {
    combination.split('|').map(Tile::new).collect()
}

/// Joins tiles back into the `"a|b|c"` form.
pub fn format_combination(tiles: &[Tile]) -> String {
    tiles.iter().map(|t| t.code()).collect::<Vec<_>>().join("|")
}

// ---------------------------------------------------------------------------
// Froms
// ---------------------------------------------------------------------------

/// Seat arrangements recorded with a claimed meld.
///
/// `froms[i]` is the seat each tile of the meld came from. The claiming
/// seat supplies every tile but the last, which comes from the
/// discarder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Froms {
    /// `[s, s, s-1]`: a chi can only be claimed from the left.
    Chi,
    /// `[s, s, o]` with `o != s`.
    Peng,
    /// `[s, s, s, o]` with `o != s`.
    Daminggang,
}

impl Froms {
    /// Returns `true` if `froms` is a valid arrangement of this kind.
    pub fn contains(self, froms: &[u32]) -> bool {
        let arity = match self {
            Self::Chi | Self::Peng => 3,
            Self::Daminggang => 4,
        };
        if froms.len() != arity || froms.iter().any(|&s| s > 3) {
            return false;
        }
        let (own, source) = froms.split_at(arity - 1);
        let seat = own[0];
        if own.iter().any(|&s| s != seat) || source[0] == seat {
            return false;
        }
        match self {
            Self::Chi => source[0] == (seat + 3) % 4,
            Self::Peng | Self::Daminggang => true,
        }
    }
}
