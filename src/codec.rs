// MMS encapsulation codec - WSP primitive value encodings
//
// This module holds the wire-level building blocks shared by the header and
// body codecs: the error type, the Encodable/Decodable traits, and the WSP
// primitive encodings (short/long integers, value-length, text strings).

use crate::datatypes::{HeaderField, MessageType, Uintvar};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Quote octet placed before a text-string whose first octet is >= 0x80
pub const QUOTE: u8 = 0x7F;

/// Leading octet of a quoted-string
pub const QUOTED_STRING_START: u8 = b'"';

/// Largest value-length that fits in a single octet
pub const SHORT_LENGTH_MAX: u8 = 30;

/// Marks a value-length carried as a uintvar
pub const LENGTH_QUOTE: u8 = 31;

/// First octet of a text-string
pub const TEXT_MIN: u8 = 32;

/// Largest value a short-integer carries
pub const SHORT_INTEGER_MAX: u8 = 0x7F;

/// Widest long-integer this codec accepts (fits a u64)
pub const LONG_INTEGER_MAX_OCTETS: usize = 8;

/// Trait for types that can be encoded to bytes
pub trait Encodable {
    /// Encode this value to the buffer
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    /// Calculate the encoded size without keeping the encoding
    fn encoded_size(&self) -> usize {
        let mut buf = BytesMut::new();
        self.encode(&mut buf).map(|_| buf.len()).unwrap_or(0)
    }

    /// Convert this value to bytes (convenience method)
    fn to_bytes(&self) -> Result<Bytes, CodecError> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Trait for types that can be decoded from bytes
pub trait Decodable: Sized {
    /// Decode a value from the buffer, advancing past it
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError>;
}

/// Codec errors with detailed context for debugging
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Truncated input: need more data")]
    TruncatedInput,

    #[error("Malformed uintvar")]
    MalformedVarInt,

    #[error("Unsupported charset: MIBenum {0}")]
    UnsupportedCharset(u32),

    #[error("Header {field:?} holds {actual}, not {expected}")]
    HeaderTypeMismatch {
        field: HeaderField,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Unrecognized message type: {0:#x}")]
    UnrecognizedMessageType(u8),

    #[error("{message_type:?} is missing mandatory header {field:?}")]
    MissingMandatoryField {
        message_type: MessageType,
        field: HeaderField,
    },

    #[error("Part count mismatch: declared {declared}, found {actual}")]
    PartCountMismatch { declared: u32, actual: u32 },

    #[error("Field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Unable to read part data from '{location}': {source}")]
    PartData {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CodecError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CodecError::FieldValidation {
            field,
            reason: reason.into(),
        }
    }
}

/// Peek at the next octet without advancing the cursor
pub fn peek_u8(buf: &Cursor<&[u8]>) -> Result<u8, CodecError> {
    buf.chunk().first().copied().ok_or(CodecError::TruncatedInput)
}

/// Decode a single octet
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::TruncatedInput);
    }
    Ok(buf.get_u8())
}

/// Take exactly `len` octets
pub fn decode_bytes(buf: &mut Cursor<&[u8]>, len: usize) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::TruncatedInput);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Short-integer: one octet with bit 7 set, value in the low seven bits
pub fn decode_short_integer(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    let octet = decode_u8(buf)?;
    if octet & 0x80 == 0 {
        return Err(CodecError::invalid(
            "short-integer",
            format!("{octet:#04x} does not have bit 7 set"),
        ));
    }
    Ok(octet & SHORT_INTEGER_MAX)
}

/// Long-integer: short-length octet followed by that many big-endian octets
pub fn decode_long_integer(buf: &mut Cursor<&[u8]>) -> Result<u64, CodecError> {
    let len = decode_u8(buf)? as usize;
    if len == 0 || len > LONG_INTEGER_MAX_OCTETS {
        return Err(CodecError::invalid(
            "long-integer",
            format!("length {len} outside 1..={LONG_INTEGER_MAX_OCTETS}"),
        ));
    }
    if buf.remaining() < len {
        return Err(CodecError::TruncatedInput);
    }
    Ok(buf.get_uint(len))
}

/// Integer-value: either a short-integer or a long-integer
pub fn decode_integer_value(buf: &mut Cursor<&[u8]>) -> Result<u64, CodecError> {
    if peek_u8(buf)? & 0x80 != 0 {
        decode_short_integer(buf).map(u64::from)
    } else {
        decode_long_integer(buf)
    }
}

/// Value-length: a short length (0..=30) or Length-quote followed by a uintvar
pub fn decode_value_length(buf: &mut Cursor<&[u8]>) -> Result<usize, CodecError> {
    let first = decode_u8(buf)?;
    match first {
        0..=SHORT_LENGTH_MAX => Ok(first as usize),
        LENGTH_QUOTE => Ok(Uintvar::decode(buf)?.0 as usize),
        _ => Err(CodecError::invalid(
            "value-length",
            format!("{first:#04x} is not a length"),
        )),
    }
}

/// Read a value-length and return the cursor position where the value ends,
/// checking that the buffer actually holds that many octets.
pub fn decode_value_end(buf: &mut Cursor<&[u8]>) -> Result<u64, CodecError> {
    let len = decode_value_length(buf)?;
    if buf.remaining() < len {
        return Err(CodecError::TruncatedInput);
    }
    Ok(buf.position() + len as u64)
}

/// Move the cursor to the end of a length-delimited value, rejecting values
/// whose contents overran the declared length.
pub fn finish_value(
    buf: &mut Cursor<&[u8]>,
    end: u64,
    field: &'static str,
) -> Result<(), CodecError> {
    if buf.position() > end {
        return Err(CodecError::invalid(field, "value overruns its length"));
    }
    buf.set_position(end);
    Ok(())
}

/// Text-string: octets up to a NUL terminator, with an optional leading Quote
pub fn decode_text_string(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    if peek_u8(buf)? == QUOTE {
        buf.advance(1);
    }
    decode_until_nul(buf)
}

/// Quoted-string: a leading `"` followed by text up to the NUL terminator
pub fn decode_quoted_string(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    if peek_u8(buf)? == QUOTED_STRING_START {
        buf.advance(1);
    }
    decode_until_nul(buf)
}

fn decode_until_nul(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    let end = buf
        .chunk()
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::TruncatedInput)?;
    let text = buf.copy_to_bytes(end);
    buf.advance(1);
    Ok(text)
}

/// Take one self-describing value and return its raw octets, length prefix
/// included. Used to step over headers and parameters this codec does not
/// interpret while keeping them for pass-through.
pub fn take_value(buf: &mut Cursor<&[u8]>) -> Result<Bytes, CodecError> {
    let start = buf.position() as usize;
    let first = peek_u8(buf)?;
    match first {
        0..=LENGTH_QUOTE => {
            let end = decode_value_end(buf)?;
            buf.set_position(end);
        }
        TEXT_MIN..=QUOTE => {
            decode_text_string(buf)?;
        }
        _ => buf.advance(1),
    }
    let end = buf.position() as usize;
    Ok(Bytes::copy_from_slice(&buf.get_ref()[start..end]))
}

/// Encode a short-integer
pub fn encode_short_integer(buf: &mut BytesMut, value: u8) -> Result<(), CodecError> {
    if value > SHORT_INTEGER_MAX {
        return Err(CodecError::invalid(
            "short-integer",
            format!("{value} does not fit in seven bits"),
        ));
    }
    buf.put_u8(value | 0x80);
    Ok(())
}

/// Encode a long-integer using the fewest octets that hold the value
pub fn encode_long_integer(buf: &mut BytesMut, value: u64) {
    let octets = (u64::BITS - value.leading_zeros()).div_ceil(8).max(1) as usize;
    buf.put_u8(octets as u8);
    buf.put_uint(value, octets);
}

/// Encode an integer-value, preferring the short-integer form
pub fn encode_integer_value(buf: &mut BytesMut, value: u64) {
    if value <= u64::from(SHORT_INTEGER_MAX) {
        buf.put_u8(value as u8 | 0x80);
    } else {
        encode_long_integer(buf, value);
    }
}

/// Encode a value-length
pub fn encode_value_length(buf: &mut BytesMut, len: usize) -> Result<(), CodecError> {
    if len <= SHORT_LENGTH_MAX as usize {
        buf.put_u8(len as u8);
        return Ok(());
    }
    let len = u32::try_from(len)
        .map_err(|_| CodecError::invalid("value-length", format!("{len} exceeds 32 bits")))?;
    buf.put_u8(LENGTH_QUOTE);
    Uintvar(len).encode(buf)
}

/// Encode a value produced by `f` prefixed by its value-length
pub fn encode_with_value_length<F>(buf: &mut BytesMut, f: F) -> Result<(), CodecError>
where
    F: FnOnce(&mut BytesMut) -> Result<(), CodecError>,
{
    let mut value = BytesMut::new();
    f(&mut value)?;
    encode_value_length(buf, value.len())?;
    buf.extend_from_slice(&value);
    Ok(())
}

/// Encode a NUL-terminated text-string, quoting it when the first octet is
/// outside the text range
pub fn encode_text_string(buf: &mut BytesMut, text: &[u8]) {
    if text.first().is_some_and(|&b| b > QUOTE) {
        buf.put_u8(QUOTE);
    }
    buf.put_slice(text);
    buf.put_u8(0);
}

/// Encode a quoted-string
pub fn encode_quoted_string(buf: &mut BytesMut, text: &[u8]) {
    buf.put_u8(QUOTED_STRING_START);
    buf.put_slice(text);
    buf.put_u8(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_integer_roundtrip() {
        let mut buf = BytesMut::new();
        encode_short_integer(&mut buf, 0x13).unwrap();
        assert_eq!(buf.as_ref(), &[0x93]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(decode_short_integer(&mut cursor).unwrap(), 0x13);
    }

    #[test]
    fn short_integer_rejects_wide_values() {
        let mut buf = BytesMut::new();
        assert!(encode_short_integer(&mut buf, 0x80).is_err());

        let data = [0x13u8];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            decode_short_integer(&mut cursor),
            Err(CodecError::FieldValidation { .. })
        ));
    }

    #[test]
    fn long_integer_uses_minimal_octets() {
        let mut buf = BytesMut::new();
        encode_long_integer(&mut buf, 0);
        assert_eq!(buf.as_ref(), &[0x01, 0x00]);

        let mut buf = BytesMut::new();
        encode_long_integer(&mut buf, 50_000);
        assert_eq!(buf.as_ref(), &[0x02, 0xC3, 0x50]);

        let mut buf = BytesMut::new();
        encode_long_integer(&mut buf, 1_600_000_000);
        assert_eq!(buf.as_ref(), &[0x04, 0x5F, 0x5E, 0x10, 0x00]);
    }

    #[test]
    fn long_integer_decode() {
        let data = [0x04, 0x5F, 0x5E, 0x10, 0x00];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(decode_long_integer(&mut cursor).unwrap(), 1_600_000_000);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn long_integer_rejects_bad_lengths() {
        let data = [0x00];
        let mut cursor = Cursor::new(&data[..]);
        assert!(decode_long_integer(&mut cursor).is_err());

        let data = [0x09, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut cursor = Cursor::new(&data[..]);
        assert!(decode_long_integer(&mut cursor).is_err());

        let data = [0x04, 0x5F, 0x5E];
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            decode_long_integer(&mut cursor),
            Err(CodecError::TruncatedInput)
        ));
    }

    #[test]
    fn integer_value_picks_form() {
        let mut buf = BytesMut::new();
        encode_integer_value(&mut buf, 106);
        assert_eq!(buf.as_ref(), &[0xEA]);

        let mut buf = BytesMut::new();
        encode_integer_value(&mut buf, 2026);
        assert_eq!(buf.as_ref(), &[0x02, 0x07, 0xEA]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(decode_integer_value(&mut cursor).unwrap(), 2026);
    }

    #[test]
    fn value_length_forms() {
        let mut buf = BytesMut::new();
        encode_value_length(&mut buf, 30).unwrap();
        encode_value_length(&mut buf, 200).unwrap();
        assert_eq!(buf.as_ref(), &[30, LENGTH_QUOTE, 0x81, 0x48]);

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(decode_value_length(&mut cursor).unwrap(), 30);
        assert_eq!(decode_value_length(&mut cursor).unwrap(), 200);
    }

    #[test]
    fn text_string_quotes_high_first_octet() {
        let mut buf = BytesMut::new();
        encode_text_string(&mut buf, &[0xE4, 0xBD, 0xA0]);
        assert_eq!(buf.as_ref(), &[QUOTE, 0xE4, 0xBD, 0xA0, 0x00]);

        let mut cursor = Cursor::new(buf.as_ref());
        let text = decode_text_string(&mut cursor).unwrap();
        assert_eq!(text.as_ref(), &[0xE4, 0xBD, 0xA0]);
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn text_string_without_terminator_is_truncated() {
        let data = b"TEST001";
        let mut cursor = Cursor::new(&data[..]);
        assert!(matches!(
            decode_text_string(&mut cursor),
            Err(CodecError::TruncatedInput)
        ));
    }

    #[test]
    fn quoted_string_roundtrip() {
        let mut buf = BytesMut::new();
        encode_quoted_string(&mut buf, b"<smil>");
        assert_eq!(buf.as_ref(), b"\"<smil>\0");

        let mut cursor = Cursor::new(buf.as_ref());
        assert_eq!(decode_quoted_string(&mut cursor).unwrap().as_ref(), b"<smil>");
    }

    #[test]
    fn take_value_covers_every_form() {
        let data: &[u8] = &[
            0x02, 0xAA, 0xBB, // short length
            b'h', b'i', 0x00, // text
            0x85, // short integer
            LENGTH_QUOTE, 0x01, 0xCC, // uintvar length
        ];
        let mut cursor = Cursor::new(data);
        assert_eq!(take_value(&mut cursor).unwrap().as_ref(), &[0x02, 0xAA, 0xBB]);
        assert_eq!(take_value(&mut cursor).unwrap().as_ref(), b"hi\0");
        assert_eq!(take_value(&mut cursor).unwrap().as_ref(), &[0x85]);
        assert_eq!(
            take_value(&mut cursor).unwrap().as_ref(),
            &[LENGTH_QUOTE, 0x01, 0xCC]
        );
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn take_value_rejects_overlong_length() {
        let data: &[u8] = &[0x05, 0x01];
        let mut cursor = Cursor::new(data);
        assert!(matches!(
            take_value(&mut cursor),
            Err(CodecError::TruncatedInput)
        ));
    }
}
