// ABOUTME: X-Mms-MMS-Version value, major version in the high nibble and minor in the low
// ABOUTME: Travels as a short-integer so the wire octet carries bit 7 (1.3 encodes as 0x93)

use crate::codec::{CodecError, Decodable, Encodable, decode_short_integer, encode_short_integer};
use bytes::BytesMut;
use std::fmt;
use std::io::Cursor;

/// MMS encapsulation version
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MmsVersion {
    pub major: u8,
    pub minor: u8,
}

impl MmsVersion {
    pub const V1_0: MmsVersion = MmsVersion { major: 1, minor: 0 };
    pub const V1_1: MmsVersion = MmsVersion { major: 1, minor: 1 };
    pub const V1_2: MmsVersion = MmsVersion { major: 1, minor: 2 };
    pub const V1_3: MmsVersion = MmsVersion { major: 1, minor: 3 };

    /// Build a version, rejecting components that do not fit the encoding
    /// (three bits of major, four bits of minor).
    pub fn new(major: u8, minor: u8) -> Result<Self, CodecError> {
        if major > 0x07 || minor > 0x0F {
            return Err(CodecError::invalid(
                "mms_version",
                format!("{major}.{minor} does not fit in a short-integer"),
            ));
        }
        Ok(MmsVersion { major, minor })
    }

    /// The seven-bit value carried by the short-integer
    pub fn value(&self) -> u8 {
        (self.major << 4) | self.minor
    }

    /// The octet as it appears on the wire
    pub fn wire_octet(&self) -> u8 {
        self.value() | 0x80
    }

    /// Accepts either the wire octet (0x93) or the bare value (0x13)
    pub fn from_octet(octet: u8) -> Self {
        let value = octet & 0x7F;
        MmsVersion {
            major: value >> 4,
            minor: value & 0x0F,
        }
    }
}

impl Default for MmsVersion {
    fn default() -> Self {
        MmsVersion::V1_2
    }
}

impl fmt::Display for MmsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Encodable for MmsVersion {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_short_integer(buf, self.value())
    }

    fn encoded_size(&self) -> usize {
        1
    }
}

impl Decodable for MmsVersion {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(MmsVersion::from_octet(decode_short_integer(buf)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_octets() {
        assert_eq!(MmsVersion::V1_0.wire_octet(), 0x90);
        assert_eq!(MmsVersion::V1_3.wire_octet(), 0x93);
        assert_eq!(MmsVersion::from_octet(0x93), MmsVersion::V1_3);
        assert_eq!(MmsVersion::from_octet(0x12), MmsVersion::V1_2);
    }

    #[test]
    fn encode_decode() {
        let bytes = MmsVersion::V1_3.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0x93]);
        let mut cursor = Cursor::new(bytes.as_ref());
        assert_eq!(MmsVersion::decode(&mut cursor).unwrap(), MmsVersion::V1_3);
    }

    #[test]
    fn new_rejects_wide_components() {
        assert!(MmsVersion::new(8, 0).is_err());
        assert!(MmsVersion::new(1, 16).is_err());
        assert_eq!(MmsVersion::new(1, 1).unwrap().to_string(), "1.1");
    }
}
