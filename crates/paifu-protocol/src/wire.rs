//! Protobuf wire-format primitives.
//!
//! `prost` handles typed messages, but several steps of the pipeline
//! need to look at the raw field stream first: the strict decoder checks
//! field numbers against a [`Shape`](crate::Shape), the inspector dumps
//! messages nobody has a type for, and the frame parser peeks at the
//! first field of a body. [`FieldScanner`] walks that stream.
//!
//! The scanner is deliberately narrow. Groups (wire types 3 and 4) and
//! the reserved wire types 6 and 7 are errors, which is what lets a
//! masked action payload fail its first decode attempt.

use crate::DecodeError;

/// Largest field number protobuf allows.
pub const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

/// The wire types the scanner accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

/// The value of one field occurrence, borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireValue<'a> {
    Varint(u64),
    Fixed64(u64),
    Bytes(&'a [u8]),
    Fixed32(u32),
}

impl WireValue<'_> {
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Varint(_) => WireType::Varint,
            Self::Fixed64(_) => WireType::Fixed64,
            Self::Bytes(_) => WireType::LengthDelimited,
            Self::Fixed32(_) => WireType::Fixed32,
        }
    }
}

/// One field occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireField<'a> {
    pub number: u32,
    pub value: WireValue<'a>,
    /// Byte offset of the field's tag.
    pub offset: usize,
}

/// Reads a base-128 varint starting at `*pos`, advancing `pos`.
pub fn read_varint(buf: &[u8], pos: &mut usize) -> Result<u64, DecodeError> {
    let start = *pos;
    let mut value: u64 = 0;
    for i in 0..10 {
        let byte = *buf.get(*pos).ok_or(DecodeError::Truncated { offset: start })?;
        *pos += 1;
        if i == 9 && byte > 1 {
            return Err(DecodeError::VarintOverflow { offset: start });
        }
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(DecodeError::VarintOverflow { offset: start })
}

/// Appends `value` as a varint.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Appends a field tag.
pub fn write_tag(out: &mut Vec<u8>, number: u32, wire_type: WireType) {
    write_varint(out, (u64::from(number) << 3) | wire_type as u64);
}

/// Appends a length-delimited field.
pub fn write_bytes_field(out: &mut Vec<u8>, number: u32, bytes: &[u8]) {
    write_tag(out, number, WireType::LengthDelimited);
    write_varint(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

/// Appends a varint field.
pub fn write_varint_field(out: &mut Vec<u8>, number: u32, value: u64) {
    write_tag(out, number, WireType::Varint);
    write_varint(out, value);
}

/// Iterates over the fields of a serialized message.
///
/// After the first error the iterator is fused and yields `None`.
#[derive(Debug, Clone)]
pub struct FieldScanner<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> FieldScanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    fn read_field(&mut self) -> Result<WireField<'a>, DecodeError> {
        let offset = self.pos;
        let tag = read_varint(self.buf, &mut self.pos)?;
        let number = tag >> 3;
        if number == 0 {
            return Err(DecodeError::ZeroFieldNumber { offset });
        }
        if number > MAX_FIELD_NUMBER {
            return Err(DecodeError::VarintOverflow { offset });
        }
        let number = number as u32;

        let value = match (tag & 7) as u8 {
            0 => WireValue::Varint(read_varint(self.buf, &mut self.pos)?),
            1 => WireValue::Fixed64(u64::from_le_bytes(self.take_array(offset)?)),
            2 => {
                let len = read_varint(self.buf, &mut self.pos)?;
                let len = usize::try_from(len).map_err(|_| DecodeError::Truncated { offset })?;
                WireValue::Bytes(self.take(len, offset)?)
            }
            5 => WireValue::Fixed32(u32::from_le_bytes(self.take_array(offset)?)),
            wire_type => {
                return Err(DecodeError::UnsupportedWireType {
                    field: number,
                    wire_type,
                    offset,
                });
            }
        };
        Ok(WireField {
            number,
            value,
            offset,
        })
    }

    fn take(&mut self, len: usize, offset: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(DecodeError::Truncated { offset })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self, offset: usize) -> Result<[u8; N], DecodeError> {
        let bytes = self.take(N, offset)?;
        let mut array = [0; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }
}

impl<'a> Iterator for FieldScanner<'a> {
    type Item = Result<WireField<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let field = self.read_field();
        self.failed = field.is_err();
        Some(field)
    }
}

/// Scans a whole message, failing on the first malformed field.
pub fn scan(buf: &[u8]) -> Result<Vec<WireField<'_>>, DecodeError> {
    FieldScanner::new(buf).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_varint_multi_byte() {
        let mut pos = 0;
        assert_eq!(read_varint(&[0xac, 0x02], &mut pos).unwrap(), 300);
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_read_varint_truncated_returns_error() {
        let mut pos = 0;
        assert_eq!(
            read_varint(&[0x9a], &mut pos),
            Err(DecodeError::Truncated { offset: 0 })
        );
    }

    #[test]
    fn test_read_varint_eleven_bytes_overflows() {
        let mut pos = 0;
        let bytes = [0xff; 11];
        assert_eq!(
            read_varint(&bytes, &mut pos),
            Err(DecodeError::VarintOverflow { offset: 0 })
        );
    }

    #[test]
    fn test_write_varint_matches_reader() {
        for value in [0, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX] {
            let mut out = Vec::new();
            write_varint(&mut out, value);
            let mut pos = 0;
            assert_eq!(read_varint(&out, &mut pos).unwrap(), value);
            assert_eq!(pos, out.len());
        }
    }

    #[test]
    fn test_scan_reads_each_wire_type() {
        let mut buf = Vec::new();
        write_varint_field(&mut buf, 1, 150);
        write_bytes_field(&mut buf, 2, b"5m");
        write_tag(&mut buf, 3, WireType::Fixed32);
        buf.extend_from_slice(&7u32.to_le_bytes());
        write_tag(&mut buf, 4, WireType::Fixed64);
        buf.extend_from_slice(&9u64.to_le_bytes());

        let fields = scan(&buf).unwrap();
        let values: Vec<_> = fields.iter().map(|f| (f.number, f.value)).collect();
        assert_eq!(
            values,
            vec![
                (1, WireValue::Varint(150)),
                (2, WireValue::Bytes(b"5m")),
                (3, WireValue::Fixed32(7)),
                (4, WireValue::Fixed64(9)),
            ]
        );
        assert_eq!(fields[1].offset, 3);
    }

    #[test]
    fn test_scan_rejects_groups() {
        // Field 1, wire type 3 (start group).
        assert!(matches!(
            scan(&[0x0b]),
            Err(DecodeError::UnsupportedWireType { field: 1, wire_type: 3, .. })
        ));
    }

    #[test]
    fn test_scan_rejects_field_zero() {
        assert_eq!(scan(&[0x00]), Err(DecodeError::ZeroFieldNumber { offset: 0 }));
    }

    #[test]
    fn test_scan_rejects_overlong_length() {
        assert_eq!(scan(&[0x12, 0x05, b'a']), Err(DecodeError::Truncated { offset: 0 }));
    }

    #[test]
    fn test_scanner_fuses_after_error() {
        let mut scanner = FieldScanner::new(&[0x00, 0x08, 0x01]);
        assert!(scanner.next().unwrap().is_err());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_scan_empty_message_has_no_fields() {
        assert!(scan(&[]).unwrap().is_empty());
    }
}
