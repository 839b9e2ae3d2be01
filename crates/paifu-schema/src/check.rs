//! Small assertion helpers shared by the validators.
//!
//! Every helper takes the JSON-style path of the value it checks
//! (`hules[0].fans[2].id`) so a violation points at the exact field.

use std::fmt::{Debug, Display};

use paifu_tile::{Table, Tile};

use crate::SchemaViolation;

pub(crate) type Check = Result<(), SchemaViolation>;

pub(crate) fn child(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_owned()
    } else {
        format!("{path}.{field}")
    }
}

pub(crate) fn item(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

pub(crate) fn fail(path: &str, reason: impl Into<String>) -> SchemaViolation {
    SchemaViolation::new(path, reason)
}

pub(crate) fn ensure(ok: bool, path: &str, reason: impl FnOnce() -> String) -> Check {
    if ok { Ok(()) } else { Err(fail(path, reason())) }
}

pub(crate) fn present<'a, T>(value: &'a Option<T>, path: &str) -> Result<&'a T, SchemaViolation> {
    value.as_ref().ok_or_else(|| fail(path, "required field is missing"))
}

pub(crate) fn absent<T>(value: &Option<T>, path: &str) -> Check {
    ensure(value.is_none(), path, || "field must not be present".into())
}

pub(crate) fn equals<T: PartialEq + Debug>(value: &T, expected: &T, path: &str) -> Check {
    ensure(value == expected, path, || {
        format!("{value:?} is not the constant {expected:?}")
    })
}

pub(crate) fn one_of<T: PartialEq + Display>(value: T, allowed: &[T], path: &str) -> Check {
    ensure(allowed.contains(&value), path, || {
        format!("{value} is not one of the allowed values")
    })
}

pub(crate) fn at_least<T: PartialOrd + Display>(value: T, min: T, path: &str) -> Check {
    ensure(value >= min, path, || format!("{value} is less than the minimum of {min}"))
}

pub(crate) fn in_range<T: PartialOrd + Display>(value: T, min: T, max: T, path: &str) -> Check {
    ensure(value >= min && value <= max, path, || {
        format!("{value} is outside [{min}, {max}]")
    })
}

pub(crate) fn len_in(len: usize, min: usize, max: usize, path: &str) -> Check {
    ensure(len >= min && len <= max, path, || {
        if min == max {
            format!("expected exactly {min} items, found {len}")
        } else {
            format!("expected {min} to {max} items, found {len}")
        }
    })
}

pub(crate) fn empty<T>(items: &[T], path: &str) -> Check {
    len_in(items.len(), 0, 0, path)
}

pub(crate) fn seat(value: u32, path: &str) -> Check {
    in_range(value, 0, 3, path)
}

pub(crate) fn tile(code: &str, path: &str) -> Result<Tile, SchemaViolation> {
    Tile::new(code).map_err(|e| fail(path, e.message()))
}

pub(crate) fn tiles(codes: &[String], path: &str) -> Check {
    for (i, code) in codes.iter().enumerate() {
        tile(code, &item(path, i))?;
    }
    Ok(())
}

/// Each entry must be a `"a|b|c"` string from `table`.
pub(crate) fn combinations(entries: &[String], table: Table, path: &str) -> Check {
    for (i, entry) in entries.iter().enumerate() {
        ensure(table.contains_str(entry), &item(path, i), || {
            format!("{entry:?} is not a valid {table:?} combination")
        })?;
    }
    Ok(())
}

/// The whole tile list must be one entry of `table`.
pub(crate) fn combination(codes: &[String], table: Table, path: &str) -> Check {
    let parsed: Result<Vec<Tile>, _> = codes.iter().map(|c| Tile::new(c)).collect();
    ensure(parsed.is_ok_and(|t| table.contains(&t)), path, || {
        format!("{codes:?} is not a valid {table:?} combination")
    })
}

/// Meld strings of a finished hand: `kind(t1,t2,..)` with the tiles
/// drawn from the kind's table.
pub(crate) fn melds(entries: &[String], path: &str) -> Check {
    for (i, entry) in entries.iter().enumerate() {
        ensure(is_meld(entry), &item(path, i), || {
            format!("{entry:?} is not a valid meld")
        })?;
    }
    Ok(())
}

fn is_meld(entry: &str) -> bool {
    let Some((kind, body)) = entry
        .strip_suffix(')')
        .and_then(|rest| rest.split_once('('))
    else {
        return false;
    };
    let table = match kind {
        "shunzi" => Table::Chi,
        "kezi" => Table::Peng,
        "minggang" | "angang" => Table::QuadMeld,
        _ => return false,
    };
    let parsed: Result<Vec<Tile>, _> = body.split(',').map(Tile::new).collect();
    parsed.is_ok_and(|t| table.contains(&t))
}

/// 3 or 4 booleans, one per seat.
pub(crate) fn zhenting(flags: &[bool], path: &str) -> Check {
    len_in(flags.len(), 3, 4, path)
}
