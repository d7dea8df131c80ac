// ABOUTME: WSP uintvar (variable-length unsigned integer) encoding and decoding
// ABOUTME: Used for part counts, part header/data lengths and long value-lengths

use crate::codec::{CodecError, Decodable, Encodable};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// WSP caps a uintvar at 32 bits, which takes at most five octets.
pub const MAX_UINTVAR_OCTETS: usize = 5;

const CONTINUATION: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;

/// A WSP variable-length unsigned integer.
///
/// Each octet carries seven bits of the value, most significant group first.
/// Every octet except the last has bit 7 set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uintvar(pub u32);

impl Uintvar {
    /// Number of octets this value occupies on the wire
    pub fn encoded_len(&self) -> usize {
        let mut len = 1;
        let mut rest = self.0 >> 7;
        while rest != 0 {
            len += 1;
            rest >>= 7;
        }
        len
    }
}

impl From<u32> for Uintvar {
    fn from(value: u32) -> Self {
        Uintvar(value)
    }
}

impl From<Uintvar> for u32 {
    fn from(value: Uintvar) -> Self {
        value.0
    }
}

impl Encodable for Uintvar {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let len = self.encoded_len();
        for i in (0..len).rev() {
            let group = ((self.0 >> (7 * i)) as u8) & GROUP_MASK;
            if i == 0 {
                buf.put_u8(group);
            } else {
                buf.put_u8(group | CONTINUATION);
            }
        }
        Ok(())
    }

    fn encoded_size(&self) -> usize {
        self.encoded_len()
    }
}

impl Decodable for Uintvar {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let mut value: u64 = 0;
        for _ in 0..MAX_UINTVAR_OCTETS {
            if !buf.has_remaining() {
                return Err(CodecError::MalformedVarInt);
            }
            let octet = buf.get_u8();
            value = (value << 7) | u64::from(octet & GROUP_MASK);
            if value > u64::from(u32::MAX) {
                return Err(CodecError::MalformedVarInt);
            }
            if octet & CONTINUATION == 0 {
                return Ok(Uintvar(value as u32));
            }
        }
        // Five octets and still continuing
        Err(CodecError::MalformedVarInt)
    }
}

/// Decode a uintvar starting at `offset`, returning the value and the number
/// of octets consumed.
pub fn decode_uintvar(data: &[u8], offset: usize) -> Result<(u32, usize), CodecError> {
    let tail = data.get(offset..).ok_or(CodecError::MalformedVarInt)?;
    let mut cursor = Cursor::new(tail);
    let value = Uintvar::decode(&mut cursor)?;
    Ok((value.0, cursor.position() as usize))
}

/// Encode `value` as a uintvar.
pub fn encode_uintvar(value: u32) -> Bytes {
    let uintvar = Uintvar(value);
    let mut buf = BytesMut::with_capacity(uintvar.encoded_len());
    // Encoding a uintvar cannot fail
    let _ = uintvar.encode(&mut buf);
    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn small_values_take_one_octet() {
        assert_eq!(encode_uintvar(0).as_ref(), &[0x00]);
        assert_eq!(encode_uintvar(0x7F).as_ref(), &[0x7F]);
    }

    #[test]
    fn multi_octet_values_set_continuation_bits() {
        assert_eq!(encode_uintvar(0x80).as_ref(), &[0x81, 0x00]);
        assert_eq!(encode_uintvar(300_000).as_ref(), &[0x92, 0xA7, 0x60]);
        assert_eq!(
            encode_uintvar(u32::MAX).as_ref(),
            &[0x8F, 0xFF, 0xFF, 0xFF, 0x7F]
        );
    }

    #[test]
    fn decode_reports_consumed_octets() {
        let data = [0xAA, 0x92, 0xA7, 0x60, 0x01];
        let (value, consumed) = decode_uintvar(&data, 1).unwrap();
        assert_eq!(value, 300_000);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn decode_truncated_is_malformed() {
        assert!(matches!(
            decode_uintvar(&[0x81, 0x80], 0),
            Err(CodecError::MalformedVarInt)
        ));
        assert!(matches!(
            decode_uintvar(&[], 0),
            Err(CodecError::MalformedVarInt)
        ));
        assert!(matches!(
            decode_uintvar(&[0x01], 4),
            Err(CodecError::MalformedVarInt)
        ));
    }

    #[test]
    fn decode_overlong_is_malformed() {
        // Six octets
        let data = [0x81, 0x80, 0x80, 0x80, 0x80, 0x00];
        assert!(matches!(
            decode_uintvar(&data, 0),
            Err(CodecError::MalformedVarInt)
        ));
        // Five octets but wider than 32 bits
        let data = [0x9F, 0xFF, 0xFF, 0xFF, 0x7F];
        assert!(matches!(
            decode_uintvar(&data, 0),
            Err(CodecError::MalformedVarInt)
        ));
    }

    proptest! {
        #[test]
        fn uintvar_roundtrip(value in any::<u32>()) {
            let encoded = encode_uintvar(value);
            let (decoded, consumed) = decode_uintvar(&encoded, 0).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert_eq!(consumed, encoded.len());
            prop_assert_eq!(consumed, Uintvar(value).encoded_len());
        }
    }
}
