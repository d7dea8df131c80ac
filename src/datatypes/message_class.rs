// ABOUTME: X-Mms-Message-Class, a well-known class octet or a free token

use crate::codec::{
    CodecError, Decodable, Encodable, decode_text_string, encode_text_string, peek_u8,
};
use crate::datatypes::content_type::text;
use bytes::{Buf, BufMut, BytesMut};
use std::io::Cursor;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum MessageClass {
    #[default]
    Personal,
    Advertisement,
    Informational,
    Auto,
    Token(String),
}

impl MessageClass {
    fn code(&self) -> Option<u8> {
        match self {
            MessageClass::Personal => Some(0x80),
            MessageClass::Advertisement => Some(0x81),
            MessageClass::Informational => Some(0x82),
            MessageClass::Auto => Some(0x83),
            MessageClass::Token(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageClass::Personal => "personal",
            MessageClass::Advertisement => "advertisement",
            MessageClass::Informational => "informational",
            MessageClass::Auto => "auto",
            MessageClass::Token(token) => token,
        }
    }
}

impl From<&str> for MessageClass {
    fn from(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "personal" => MessageClass::Personal,
            "advertisement" => MessageClass::Advertisement,
            "informational" => MessageClass::Informational,
            "auto" => MessageClass::Auto,
            _ => MessageClass::Token(token.to_owned()),
        }
    }
}

impl Encodable for MessageClass {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self.code() {
            Some(code) => buf.put_u8(code),
            None => encode_text_string(buf, self.as_str().as_bytes()),
        }
        Ok(())
    }
}

impl Decodable for MessageClass {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let first = peek_u8(buf)?;
        let class = match first {
            0x80 => MessageClass::Personal,
            0x81 => MessageClass::Advertisement,
            0x82 => MessageClass::Informational,
            0x83 => MessageClass::Auto,
            _ if first >= 0x80 => {
                return Err(CodecError::invalid(
                    "message-class",
                    format!("unknown class {first:#04x}"),
                ));
            }
            _ => {
                let token = text(decode_text_string(buf)?, "message-class");
                return Ok(MessageClass::from(token.as_str()));
            }
        };
        buf.advance(1);
        Ok(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(data: &[u8]) -> MessageClass {
        MessageClass::decode(&mut Cursor::new(data)).unwrap()
    }

    #[test]
    fn well_known_classes() {
        assert_eq!(MessageClass::Personal.to_bytes().unwrap().as_ref(), &[0x80]);
        assert_eq!(decode(&[0x83]), MessageClass::Auto);
    }

    #[test]
    fn tokens() {
        let class = MessageClass::Token("x-carrier".into());
        let bytes = class.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), b"x-carrier\0");
        assert_eq!(decode(&bytes), class);
        // Spelled-out well-known names collapse to the enum
        assert_eq!(decode(b"personal\0"), MessageClass::Personal);
    }

    #[test]
    fn unknown_octet() {
        assert!(MessageClass::decode(&mut Cursor::new(&[0x90u8][..])).is_err());
    }
}
