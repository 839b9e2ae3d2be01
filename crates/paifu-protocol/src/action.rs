//! Live game actions and the XOR fallback.
//!
//! During a game the server pushes `.lq.ActionPrototype` notifications
//! whose `data` may be obfuscated with a position-dependent XOR mask.
//! Nothing in the message says whether it is, so decoding tries the
//! payload as sent first and only on failure retries with the mask
//! removed. If both attempts fail, both errors are reported.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::lq::ActionPrototype;
use crate::{DecodeFailure, ProtocolError, Record, RecordKind};

/// Key table of the action mask.
const XOR_KEYS: [u8; 9] = [0x84, 0x5e, 0x4e, 0x42, 0x39, 0xa2, 0x1f, 0x60, 0x1c];

/// Applies the action XOR mask in place. The mask is its own inverse.
///
/// Byte `i` of an `n`-byte payload is XORed with
/// `((23 ^ n) + 5 * i + key[i % 9]) & 0xff`.
pub fn mask(data: &mut [u8]) {
    let len = data.len();
    for (i, byte) in data.iter_mut().enumerate() {
        let k = ((23 ^ len) + 5 * i + usize::from(XOR_KEYS[i % XOR_KEYS.len()])) & 0xff;
        *byte ^= k as u8;
    }
}

/// Maps live action names to the record layout they share.
///
/// The registry is closed: it is built once from [`RecordKind::ALL`]
/// and never modified.
#[derive(Debug)]
pub struct ActionRegistry {
    by_name: HashMap<&'static str, RecordKind>,
}

static REGISTRY: LazyLock<ActionRegistry> = LazyLock::new(|| ActionRegistry {
    by_name: RecordKind::ALL
        .into_iter()
        .map(|kind| (kind.action_name(), kind))
        .collect(),
});

impl ActionRegistry {
    pub fn global() -> &'static Self {
        &REGISTRY
    }

    pub fn lookup(&self, name: &str) -> Option<RecordKind> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// An action taken out of its prototype.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAction {
    pub step: u32,
    pub name: String,
    /// `None` for actions outside the registry; their payload is kept
    /// raw in [`data`](Self::data).
    pub record: Option<Record>,
    /// The payload as decoded (unmasked if `demasked`).
    pub data: Vec<u8>,
    /// Whether the payload had to be unmasked.
    pub demasked: bool,
}

/// Decodes the payload of an action prototype, falling back to the
/// unmasked payload if the direct parse fails.
pub fn decode_action(prototype: &ActionPrototype) -> Result<DecodedAction, ProtocolError> {
    let Some(kind) = ActionRegistry::global().lookup(&prototype.name) else {
        tracing::debug!(name = %prototype.name, "action outside the registry kept raw");
        return Ok(DecodedAction {
            step: prototype.step,
            name: prototype.name.clone(),
            record: None,
            data: prototype.data.clone(),
            demasked: false,
        });
    };

    let direct = match kind.decode(&prototype.data) {
        Ok(record) => {
            return Ok(DecodedAction {
                step: prototype.step,
                name: prototype.name.clone(),
                record: Some(record),
                data: prototype.data.clone(),
                demasked: false,
            });
        }
        Err(e) => e,
    };

    let mut data = prototype.data.clone();
    mask(&mut data);
    match kind.decode(&data) {
        Ok(record) => {
            tracing::trace!(name = %prototype.name, "action payload was masked");
            Ok(DecodedAction {
                step: prototype.step,
                name: prototype.name.clone(),
                record: Some(record),
                data,
                demasked: true,
            })
        }
        Err(demasked) => Err(ProtocolError::Obfuscated(DecodeFailure {
            name: prototype.name.clone(),
            direct,
            demasked,
        })),
    }
}
