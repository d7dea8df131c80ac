// ABOUTME: IANA MIBenum charset table and the byte <-> string conversions MMS text needs
// ABOUTME: Unknown MIBenums are kept as Charset::Other so an odd charset never aborts a parse

use crate::codec::CodecError;
use encoding_rs::Encoding;
use num_enum::{FromPrimitive, IntoPrimitive};

/// Character set identified by its IANA MIBenum
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    /// `*`, the sender did not say
    Any = 0,
    UsAscii = 3,
    Iso8859_1 = 4,
    Iso8859_2 = 5,
    Iso8859_3 = 6,
    Iso8859_4 = 7,
    Iso8859_5 = 8,
    Iso8859_6 = 9,
    Iso8859_7 = 10,
    Iso8859_8 = 11,
    Iso8859_9 = 12,
    ShiftJis = 17,
    EucJp = 18,
    Iso2022Kr = 37,
    EucKr = 38,
    Iso2022Jp = 39,
    Iso2022Jp2 = 40,
    Utf8 = 106,
    Gbk = 113,
    Ucs2 = 1000,
    Utf16Be = 1013,
    Utf16Le = 1014,
    Utf16 = 1015,
    Gb2312 = 2025,
    Big5 = 2026,
    #[num_enum(catch_all)]
    Other(u32),
}

const NAMES: &[(Charset, &str)] = &[
    (Charset::Any, "*"),
    (Charset::UsAscii, "us-ascii"),
    (Charset::Iso8859_1, "iso-8859-1"),
    (Charset::Iso8859_2, "iso-8859-2"),
    (Charset::Iso8859_3, "iso-8859-3"),
    (Charset::Iso8859_4, "iso-8859-4"),
    (Charset::Iso8859_5, "iso-8859-5"),
    (Charset::Iso8859_6, "iso-8859-6"),
    (Charset::Iso8859_7, "iso-8859-7"),
    (Charset::Iso8859_8, "iso-8859-8"),
    (Charset::Iso8859_9, "iso-8859-9"),
    (Charset::ShiftJis, "shift_jis"),
    (Charset::EucJp, "euc-jp"),
    (Charset::Iso2022Kr, "iso-2022-kr"),
    (Charset::EucKr, "euc-kr"),
    (Charset::Iso2022Jp, "iso-2022-jp"),
    (Charset::Iso2022Jp2, "iso-2022-jp-2"),
    (Charset::Utf8, "utf-8"),
    (Charset::Gbk, "gbk"),
    (Charset::Ucs2, "iso-10646-ucs-2"),
    (Charset::Utf16Be, "utf-16be"),
    (Charset::Utf16Le, "utf-16le"),
    (Charset::Utf16, "utf-16"),
    (Charset::Gb2312, "gb2312"),
    (Charset::Big5, "big5"),
];

impl Charset {
    pub fn mib_enum(&self) -> u32 {
        u32::from(*self)
    }

    /// Preferred MIME name, `None` for MIBenums outside the table
    pub fn name(&self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(charset, _)| charset == self)
            .map(|(_, name)| *name)
    }

    /// Case-insensitive lookup by MIME name; also accepts a few common aliases
    pub fn from_name(name: &str) -> Option<Charset> {
        let name = name.trim();
        let alias = match name.to_ascii_lowercase().as_str() {
            "utf8" => Some(Charset::Utf8),
            "ascii" => Some(Charset::UsAscii),
            "latin1" => Some(Charset::Iso8859_1),
            "ucs-2" => Some(Charset::Ucs2),
            _ => None,
        };
        alias.or_else(|| {
            NAMES
                .iter()
                .find(|(_, known)| known.eq_ignore_ascii_case(name))
                .map(|(charset, _)| *charset)
        })
    }

    /// True when the ASCII range means ASCII in this charset, so text tokens
    /// such as `/TYPE=PLMN` can be matched on the raw bytes.
    pub fn is_ascii_compatible(&self) -> bool {
        matches!(
            self,
            Charset::Any
                | Charset::UsAscii
                | Charset::Utf8
                | Charset::Iso8859_1
                | Charset::Iso8859_2
                | Charset::Iso8859_3
                | Charset::Iso8859_4
                | Charset::Iso8859_5
                | Charset::Iso8859_6
                | Charset::Iso8859_7
                | Charset::Iso8859_8
                | Charset::Iso8859_9
        )
    }

    /// Whether `decode`/`encode` handle this charset
    pub fn is_supported(&self) -> bool {
        matches!(
            self,
            Charset::Any
                | Charset::UsAscii
                | Charset::Iso8859_1
                | Charset::Utf8
                | Charset::Ucs2
                | Charset::Utf16
                | Charset::Utf16Be
                | Charset::Utf16Le
        ) || self.legacy_encoding().is_some()
    }

    /// Regional charsets converted by `encoding_rs`. ISO-2022-KR and
    /// ISO-2022-JP-2 have no converter there.
    fn legacy_encoding(&self) -> Option<&'static Encoding> {
        let encoding = match self {
            Charset::Iso8859_2 => encoding_rs::ISO_8859_2,
            Charset::Iso8859_3 => encoding_rs::ISO_8859_3,
            Charset::Iso8859_4 => encoding_rs::ISO_8859_4,
            Charset::Iso8859_5 => encoding_rs::ISO_8859_5,
            Charset::Iso8859_6 => encoding_rs::ISO_8859_6,
            Charset::Iso8859_7 => encoding_rs::ISO_8859_7,
            Charset::Iso8859_8 => encoding_rs::ISO_8859_8,
            // ISO-8859-9 is windows-1254 minus the C1 range
            Charset::Iso8859_9 => encoding_rs::WINDOWS_1254,
            Charset::ShiftJis => encoding_rs::SHIFT_JIS,
            Charset::EucJp => encoding_rs::EUC_JP,
            Charset::EucKr => encoding_rs::EUC_KR,
            Charset::Iso2022Jp => encoding_rs::ISO_2022_JP,
            Charset::Gbk | Charset::Gb2312 => encoding_rs::GBK,
            Charset::Big5 => encoding_rs::BIG5,
            _ => return None,
        };
        Some(encoding)
    }

    fn field_name(&self) -> &'static str {
        self.name().unwrap_or("charset")
    }

    /// Decode raw octets in this charset
    pub fn decode(&self, bytes: &[u8]) -> Result<String, CodecError> {
        match self {
            Charset::Any => match std::str::from_utf8(bytes) {
                Ok(text) => Ok(text.to_owned()),
                Err(_) => Ok(decode_latin1(bytes)),
            },
            Charset::UsAscii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(CodecError::invalid(
                        "us-ascii",
                        format!("octet {:#04x} at {pos} is outside ASCII", bytes[pos]),
                    ));
                }
                Ok(decode_latin1(bytes))
            }
            Charset::Iso8859_1 => Ok(decode_latin1(bytes)),
            Charset::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|source| {
                CodecError::Utf8Error {
                    field: "encoded-string-value",
                    source,
                }
            }),
            Charset::Ucs2 | Charset::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Charset::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Charset::Utf16 => match bytes {
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                _ => decode_utf16(bytes, u16::from_be_bytes),
            },
            other => {
                let encoding = other
                    .legacy_encoding()
                    .ok_or(CodecError::UnsupportedCharset(other.mib_enum()))?;
                encoding
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|text| text.into_owned())
                    .ok_or_else(|| {
                        CodecError::invalid(other.field_name(), "malformed octet sequence")
                    })
            }
        }
    }

    /// Encode a string into this charset
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, CodecError> {
        match self {
            Charset::Any | Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::UsAscii => {
                if !text.is_ascii() {
                    return Err(CodecError::invalid(
                        "us-ascii",
                        "text contains non-ASCII characters",
                    ));
                }
                Ok(text.as_bytes().to_vec())
            }
            Charset::Iso8859_1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        CodecError::invalid("iso-8859-1", format!("{c:?} has no Latin-1 form"))
                    })
                })
                .collect(),
            Charset::Ucs2 => {
                if let Some(c) = text.chars().find(|c| u32::from(*c) > 0xFFFF) {
                    return Err(CodecError::invalid(
                        "iso-10646-ucs-2",
                        format!("{c:?} is outside the basic multilingual plane"),
                    ));
                }
                Ok(encode_utf16(text, u16::to_be_bytes))
            }
            Charset::Utf16Be => Ok(encode_utf16(text, u16::to_be_bytes)),
            Charset::Utf16Le => Ok(encode_utf16(text, u16::to_le_bytes)),
            Charset::Utf16 => {
                let mut out = vec![0xFE, 0xFF];
                out.extend(encode_utf16(text, u16::to_be_bytes));
                Ok(out)
            }
            other => {
                let encoding = other
                    .legacy_encoding()
                    .ok_or(CodecError::UnsupportedCharset(other.mib_enum()))?;
                let (bytes, _, unmappable) = encoding.encode(text);
                if unmappable {
                    return Err(CodecError::invalid(
                        other.field_name(),
                        "text has characters outside the charset",
                    ));
                }
                Ok(bytes.into_owned())
            }
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Charset::Utf8
    }
}

pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, CodecError> {
    if bytes.len() % 2 != 0 {
        return Err(CodecError::invalid("utf-16", "odd number of octets"));
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| CodecError::invalid("utf-16", e.to_string()))
}

fn encode_utf16(text: &str, unit: fn(u16) -> [u8; 2]) -> Vec<u8> {
    text.encode_utf16().flat_map(unit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mib_enums() {
        assert_eq!(Charset::Utf8.mib_enum(), 106);
        assert_eq!(Charset::from(106u32), Charset::Utf8);
        assert_eq!(Charset::from(2026u32), Charset::Big5);
        assert_eq!(Charset::from(9999u32), Charset::Other(9999));
        assert_eq!(Charset::Other(9999).mib_enum(), 9999);
    }

    #[test]
    fn names() {
        assert_eq!(Charset::Utf8.name(), Some("utf-8"));
        assert_eq!(Charset::from_name("UTF-8"), Some(Charset::Utf8));
        assert_eq!(Charset::from_name("latin1"), Some(Charset::Iso8859_1));
        assert_eq!(Charset::from_name("klingon"), None);
        assert_eq!(Charset::Other(7).name(), None);
    }

    #[test]
    fn latin1_roundtrip() {
        let bytes = Charset::Iso8859_1.encode("café").unwrap();
        assert_eq!(bytes, vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(Charset::Iso8859_1.decode(&bytes).unwrap(), "café");
        assert!(Charset::Iso8859_1.encode("你").is_err());
    }

    #[test]
    fn utf16_with_and_without_bom() {
        let encoded = Charset::Utf16.encode("hi").unwrap();
        assert_eq!(encoded, vec![0xFE, 0xFF, 0x00, b'h', 0x00, b'i']);
        assert_eq!(Charset::Utf16.decode(&encoded).unwrap(), "hi");
        assert_eq!(
            Charset::Utf16.decode(&[0xFF, 0xFE, b'h', 0x00]).unwrap(),
            "h"
        );
        assert_eq!(Charset::Utf16.decode(&[0x00, b'h']).unwrap(), "h");
        assert!(Charset::Utf16Le.decode(&[0x00]).is_err());
    }

    #[test]
    fn ucs2_rejects_astral_characters() {
        assert!(Charset::Ucs2.encode("🎉").is_err());
        assert_eq!(Charset::Ucs2.encode("A").unwrap(), vec![0x00, b'A']);
    }

    #[test]
    fn any_falls_back_to_latin1() {
        assert_eq!(Charset::Any.decode("你好".as_bytes()).unwrap(), "你好");
        assert_eq!(Charset::Any.decode(&[0xE9]).unwrap(), "é");
    }

    #[test]
    fn unsupported_charsets_report_mib_enum() {
        assert!(matches!(
            Charset::Iso2022Kr.decode(b"x"),
            Err(CodecError::UnsupportedCharset(37))
        ));
        assert!(matches!(
            Charset::Iso2022Jp2.encode("x"),
            Err(CodecError::UnsupportedCharset(40))
        ));
        assert!(matches!(
            Charset::Other(4242).encode("x"),
            Err(CodecError::UnsupportedCharset(4242))
        ));
        assert!(matches!(
            Charset::Other(4242).decode(b"x"),
            Err(CodecError::UnsupportedCharset(4242))
        ));
        assert!(!Charset::Iso2022Kr.is_supported());
        assert!(!Charset::Other(4242).is_supported());
    }

    #[test]
    fn regional_charsets() {
        let cases: [(Charset, &str, &[u8]); 7] = [
            (Charset::ShiftJis, "日本", &[0x93, 0xFA, 0x96, 0x7B]),
            (Charset::EucKr, "한", &[0xC7, 0xD1]),
            (Charset::Big5, "中", &[0xA4, 0xA4]),
            (Charset::Gbk, "中", &[0xD6, 0xD0]),
            (Charset::Gb2312, "中", &[0xD6, 0xD0]),
            (Charset::Iso8859_5, "Ж", &[0xB6]),
            (Charset::Iso2022Jp, "日", &[0x1B, b'$', b'B', 0x46, 0x7C, 0x1B, b'(', b'B']),
        ];
        for (charset, text, bytes) in cases {
            assert!(charset.is_supported(), "{charset:?}");
            assert_eq!(charset.decode(bytes).unwrap(), text, "{charset:?}");
            assert_eq!(charset.encode(text).unwrap(), bytes, "{charset:?}");
        }
    }

    #[test]
    fn regional_charset_errors() {
        assert!(matches!(
            Charset::ShiftJis.decode(&[0x82]),
            Err(CodecError::FieldValidation { field: "shift_jis", .. })
        ));
        assert!(matches!(
            Charset::Iso8859_5.encode("é"),
            Err(CodecError::FieldValidation { field: "iso-8859-5", .. })
        ));
    }

    #[test]
    fn bad_utf8_is_reported() {
        assert!(matches!(
            Charset::Utf8.decode(&[0xFF, 0xFE]),
            Err(CodecError::Utf8Error { .. })
        ));
    }
}
