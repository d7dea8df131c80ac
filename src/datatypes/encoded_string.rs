// ABOUTME: Encoded-string-value, a text-string optionally tagged with the charset of its octets
// ABOUTME: Used for subjects, response texts and addresses

use crate::codec::{
    CodecError, Decodable, Encodable, LENGTH_QUOTE, QUOTE, decode_integer_value,
    decode_text_string, decode_value_end, encode_integer_value, encode_text_string,
    encode_with_value_length, finish_value, peek_u8,
};
use crate::datatypes::Charset;
use crate::datatypes::charset::decode_latin1;
use bytes::{Buf, Bytes, BytesMut};
use std::io::Cursor;

/// Charset-tagged octets with a decoded string view
///
/// The octets are kept exactly as received, so a value in a charset this
/// crate cannot decode still survives a parse and can be re-encoded.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedStringValue {
    charset: Charset,
    bytes: Bytes,
}

impl EncodedStringValue {
    /// Encode `text` in `charset`
    pub fn new(charset: Charset, text: &str) -> Result<Self, CodecError> {
        Ok(EncodedStringValue {
            charset,
            bytes: Bytes::from(charset.encode(text)?),
        })
    }

    /// Wrap octets that are already in `charset`
    pub fn from_raw(charset: Charset, bytes: impl Into<Bytes>) -> Self {
        EncodedStringValue {
            charset,
            bytes: bytes.into(),
        }
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the octets; fails with `UnsupportedCharset` for charsets this
    /// crate has no decoder for
    pub fn text(&self) -> Result<String, CodecError> {
        self.charset.decode(&self.bytes)
    }

    /// Decode the octets, reading them as ISO-8859-1 when the charset is
    /// unsupported or the octets are invalid in it
    pub fn text_lossy(&self) -> String {
        self.text().unwrap_or_else(|_| decode_latin1(&self.bytes))
    }

    /// Whether the value goes on the wire as a bare text-string
    fn is_plain(&self) -> bool {
        matches!(self.charset, Charset::UsAscii | Charset::Any)
    }
}

impl From<&str> for EncodedStringValue {
    /// ASCII text is tagged us-ascii, anything else utf-8
    fn from(text: &str) -> Self {
        let charset = if text.is_ascii() {
            Charset::UsAscii
        } else {
            Charset::Utf8
        };
        EncodedStringValue {
            charset,
            bytes: Bytes::copy_from_slice(text.as_bytes()),
        }
    }
}

impl From<String> for EncodedStringValue {
    fn from(text: String) -> Self {
        EncodedStringValue::from(text.as_str())
    }
}

impl Encodable for EncodedStringValue {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if self.is_plain() {
            encode_text_string(buf, &self.bytes);
            return Ok(());
        }
        encode_with_value_length(buf, |value| {
            encode_integer_value(value, u64::from(self.charset.mib_enum()));
            encode_text_string(value, &self.bytes);
            Ok(())
        })
    }
}

impl Decodable for EncodedStringValue {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let first = peek_u8(buf)?;
        if first == 0 {
            buf.advance(1);
            return Ok(EncodedStringValue::from_raw(Charset::UsAscii, Bytes::new()));
        }
        if first > LENGTH_QUOTE {
            // Untagged: us-ascii when it is, otherwise left for `Any` to sniff
            let bytes = decode_text_string(buf)?;
            let charset = if bytes.is_ascii() {
                Charset::UsAscii
            } else {
                Charset::Any
            };
            return Ok(EncodedStringValue::from_raw(charset, bytes));
        }
        let end = decode_value_end(buf)?;
        let mib = decode_integer_value(buf)?;
        let mib = u32::try_from(mib).map_err(|_| CodecError::UnsupportedCharset(u32::MAX))?;
        let charset = Charset::from(mib);
        if charset.is_ascii_compatible() {
            let bytes = decode_text_string(buf)?;
            finish_value(buf, end, "encoded-string-value")?;
            return Ok(EncodedStringValue::from_raw(charset, bytes));
        }
        // Wide charsets may contain NUL octets, so the value length bounds
        // the text rather than the terminator
        if buf.position() < end && peek_u8(buf)? == QUOTE {
            buf.advance(1);
        }
        let len = end
            .checked_sub(buf.position())
            .ok_or_else(|| CodecError::invalid("encoded-string-value", "value overruns its length"))?
            as usize;
        let mut bytes = buf.copy_to_bytes(len);
        if bytes.last() == Some(&0) {
            bytes.truncate(bytes.len() - 1);
        }
        Ok(EncodedStringValue::from_raw(charset, bytes))
    }
}
