//! Field layouts for strict decoding.
//!
//! A [`Shape`] names the field numbers a message may carry and, for
//! message-typed fields, the shape of the nested message. Shapes are
//! plain statics that reference each other, so checking a payload is a
//! recursive walk with no allocation beyond the scan.

use prost::Message;

use crate::DecodeError;
use crate::wire::{FieldScanner, WireValue};

/// The permitted fields of one message type.
#[derive(Debug)]
pub struct Shape {
    name: &'static str,
    fields: &'static [FieldDef],
}

impl Shape {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        self.fields
    }

    pub fn field(&self, number: u32) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Walks `bytes` and fails on the first field this shape does not
    /// permit, recursing into nested messages.
    pub fn check(&self, bytes: &[u8]) -> Result<(), DecodeError> {
        for field in FieldScanner::new(bytes) {
            let field = field?;
            let def = self.field(field.number).ok_or(DecodeError::UnknownField {
                message: self.name,
                field: field.number,
            })?;
            let FieldKind::Message(nested) = def.kind else {
                continue;
            };
            let WireValue::Bytes(inner) = field.value else {
                return Err(DecodeError::WrongWireType {
                    message: self.name,
                    field: def.number,
                    name: def.name,
                });
            };
            nested.check(inner)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A scalar, string or bytes field, or a packed repeated scalar.
    Scalar,
    /// A message field checked against its own shape.
    Message(&'static Shape),
    /// A length-delimited field whose content is not inspected.
    Opaque,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    number: u32,
    name: &'static str,
    kind: FieldKind,
}

impl FieldDef {
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

pub const fn scalar(number: u32, name: &'static str) -> FieldDef {
    FieldDef {
        number,
        name,
        kind: FieldKind::Scalar,
    }
}

pub const fn nested(number: u32, name: &'static str, shape: &'static Shape) -> FieldDef {
    FieldDef {
        number,
        name,
        kind: FieldKind::Message(shape),
    }
}

pub const fn opaque(number: u32, name: &'static str) -> FieldDef {
    FieldDef {
        number,
        name,
        kind: FieldKind::Opaque,
    }
}

/// A `prost` message with a known [`Shape`].
pub trait Strict: Message + Default + Sized {
    fn shape() -> &'static Shape;
}

/// Decodes `bytes` as `T`, rejecting fields outside `T`'s shape.
///
/// Plain `prost` decoding would skip unknown fields; a payload that is
/// not really a `T` would then decode "successfully" into garbage.
pub fn decode_strict<T: Strict>(bytes: &[u8]) -> Result<T, DecodeError> {
    let shape = T::shape();
    shape.check(bytes)?;
    T::decode(bytes).map_err(|source| DecodeError::Prost {
        message: shape.name(),
        source,
    })
}
