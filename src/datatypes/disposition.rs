// ABOUTME: Content-Disposition of a body part: form-data, attachment or inline, with a filename
// ABOUTME: Some carriers send dispositions the parser cannot read, so decoding can be switched off

use crate::codec::{
    CodecError, Decodable, Encodable, LENGTH_QUOTE, decode_integer_value, decode_text_string,
    decode_u8, decode_value_end, encode_short_integer, encode_text_string,
    encode_with_value_length, finish_value, peek_u8, take_value,
};
use crate::datatypes::content_type::{decode_text_value, text};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;
use tracing::trace;

const FORM_DATA: u8 = 0x80;
const ATTACHMENT: u8 = 0x81;
const INLINE: u8 = 0x82;

const FILENAME_V1_1: u64 = 0x06;
const FILENAME: u64 = 0x18;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DispositionKind {
    FormData,
    Attachment,
    Inline,
    Token(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Disposition {
    pub kind: DispositionKind,
    pub filename: Option<String>,
}

impl Disposition {
    pub fn inline() -> Self {
        Disposition {
            kind: DispositionKind::Inline,
            filename: None,
        }
    }

    pub fn attachment(filename: impl Into<String>) -> Self {
        Disposition {
            kind: DispositionKind::Attachment,
            filename: Some(filename.into()),
        }
    }
}

impl Encodable for Disposition {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_with_value_length(buf, |value| {
            match &self.kind {
                DispositionKind::FormData => value.put_u8(FORM_DATA),
                DispositionKind::Attachment => value.put_u8(ATTACHMENT),
                DispositionKind::Inline => value.put_u8(INLINE),
                DispositionKind::Token(token) => encode_text_string(value, token.as_bytes()),
            }
            if let Some(filename) = &self.filename {
                encode_short_integer(value, FILENAME_V1_1 as u8)?;
                encode_text_string(value, filename.as_bytes());
            }
            Ok(())
        })
    }
}

impl Decodable for Disposition {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let end = decode_value_end(buf)?;
        let first = peek_u8(buf)?;
        let kind = if first > LENGTH_QUOTE && first < 0x80 {
            DispositionKind::Token(text(decode_text_string(buf)?, "content-disposition"))
        } else {
            match decode_u8(buf)? {
                FORM_DATA => DispositionKind::FormData,
                ATTACHMENT => DispositionKind::Attachment,
                INLINE => DispositionKind::Inline,
                other => {
                    return Err(CodecError::invalid(
                        "content-disposition",
                        format!("unknown disposition {other:#04x}"),
                    ));
                }
            }
        };

        let mut filename = None;
        while buf.position() < end {
            if peek_u8(buf)? & 0x80 == 0 && peek_u8(buf)? > LENGTH_QUOTE {
                // Untyped parameter
                let name = text(decode_text_string(buf)?, "content-disposition");
                let value = decode_text_value(buf)?;
                if name.eq_ignore_ascii_case("filename") {
                    filename = Some(value);
                }
                continue;
            }
            match decode_integer_value(buf)? {
                FILENAME_V1_1 | FILENAME => filename = Some(decode_text_value(buf)?),
                other => {
                    take_value(buf)?;
                    trace!(token = other, "skipping content-disposition parameter");
                }
            }
        }
        finish_value(buf, end, "content-disposition")?;
        Ok(Disposition { kind, filename })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Buf;

    #[test]
    fn attachment_with_filename() {
        let disposition = Disposition::attachment("photo.jpg");
        let bytes = disposition.to_bytes().unwrap();
        assert_eq!(&bytes[..3], &[0x0C, ATTACHMENT, 0x86]);
        let mut cursor = Cursor::new(bytes.as_ref());
        assert_eq!(Disposition::decode(&mut cursor).unwrap(), disposition);
        assert!(!cursor.has_remaining());
    }

    #[test]
    fn bare_inline() {
        let bytes = Disposition::inline().to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0x01, INLINE]);
    }

    #[test]
    fn newer_filename_token() {
        let mut data = vec![0x00, 0x82, 0x98];
        data.extend_from_slice(b"\"a.txt\0");
        data[0] = (data.len() - 1) as u8;
        let mut cursor = Cursor::new(data.as_slice());
        let disposition = Disposition::decode(&mut cursor).unwrap();
        assert_eq!(disposition.kind, DispositionKind::Inline);
        assert_eq!(disposition.filename.as_deref(), Some("a.txt"));
    }
}
