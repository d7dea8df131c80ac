// ABOUTME: WSP well-known content types and the Content-type-value encoding with its parameters
// ABOUTME: Shared by the PDU Content-Type header and every body part's content type

use crate::codec::{
    CodecError, Decodable, Encodable, LENGTH_QUOTE, QUOTED_STRING_START, SHORT_LENGTH_MAX,
    decode_integer_value, decode_quoted_string, decode_text_string, decode_value_end,
    encode_integer_value, encode_short_integer, encode_text_string, encode_with_value_length,
    finish_value, peek_u8, take_value,
};
use crate::datatypes::Charset;
use crate::datatypes::charset::decode_latin1;
use bytes::{Buf, BytesMut};
use std::fmt;
use std::io::Cursor;
use tracing::trace;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_SMIL: &str = "application/smil";
pub const MULTIPART_MIXED: &str = "application/vnd.wap.multipart.mixed";
pub const MULTIPART_RELATED: &str = "application/vnd.wap.multipart.related";
pub const APPLICATION_OCTET_STREAM: &str = "application/octet-stream";

/// WSP assigned content type numbers (WAP-230 table 40), indexed by code
const WELL_KNOWN: [&str; 0x4C] = [
    "*/*",
    "text/*",
    "text/html",
    "text/plain",
    "text/x-hdml",
    "text/x-ttml",
    "text/x-vCalendar",
    "text/x-vCard",
    "text/vnd.wap.wml",
    "text/vnd.wap.wmlscript",
    "text/vnd.wap.wta-event",
    "multipart/*",
    "multipart/mixed",
    "multipart/form-data",
    "multipart/byteranges",
    "multipart/alternative",
    "application/*",
    "application/java-vm",
    "application/x-www-form-urlencoded",
    "application/x-hdmlc",
    "application/vnd.wap.wmlc",
    "application/vnd.wap.wmlscriptc",
    "application/vnd.wap.wta-eventc",
    "application/vnd.wap.uaprof",
    "application/vnd.wap.wtls-ca-certificate",
    "application/vnd.wap.wtls-user-certificate",
    "application/x-x509-ca-cert",
    "application/x-x509-user-cert",
    "image/*",
    "image/gif",
    "image/jpeg",
    "image/tiff",
    "image/png",
    "image/vnd.wap.wbmp",
    "application/vnd.wap.multipart.*",
    "application/vnd.wap.multipart.mixed",
    "application/vnd.wap.multipart.form-data",
    "application/vnd.wap.multipart.byteranges",
    "application/vnd.wap.multipart.alternative",
    "application/xml",
    "text/xml",
    "application/vnd.wap.wbxml",
    "application/x-x968-cross-cert",
    "application/x-x968-ca-cert",
    "application/x-x968-user-cert",
    "text/vnd.wap.si",
    "application/vnd.wap.sic",
    "text/vnd.wap.sl",
    "application/vnd.wap.slc",
    "text/vnd.wap.co",
    "application/vnd.wap.coc",
    "application/vnd.wap.multipart.related",
    "application/vnd.wap.sia",
    "text/vnd.wap.connectivity-xml",
    "application/vnd.wap.connectivity-wbxml",
    "application/pkcs7-mime",
    "application/vnd.wap.hashed-certificate",
    "application/vnd.wap.signed-certificate",
    "application/vnd.wap.cert-response",
    "application/xhtml+xml",
    "application/wml+xml",
    "text/css",
    "application/vnd.wap.mms-message",
    "application/vnd.wap.rollover-certificate",
    "application/vnd.wap.locc+wbxml",
    "application/vnd.wap.loc+xml",
    "application/vnd.syncml.dm+wbxml",
    "application/vnd.syncml.dm+xml",
    "application/vnd.syncml.notification",
    "application/vnd.wap.xhtml+xml",
    "application/vnd.wv.csp.cir",
    "application/vnd.oma.dd+xml",
    "application/vnd.oma.drm.message",
    "application/vnd.oma.drm.content",
    "application/vnd.oma.drm.rights+xml",
    "application/vnd.oma.drm.rights+wbxml",
];

/// Well-known parameter tokens (WAP-230 table 38)
mod param {
    pub const CHARSET: u64 = 0x01;
    pub const TYPE_V1_1: u64 = 0x03;
    pub const NAME_V1_1: u64 = 0x05;
    pub const FILENAME_V1_1: u64 = 0x06;
    pub const TYPE: u64 = 0x09;
    pub const START_V1_2: u64 = 0x0A;
    pub const NAME: u64 = 0x17;
    pub const FILENAME: u64 = 0x18;
    pub const START: u64 = 0x19;
}

/// MIME type for a well-known content type code
pub fn well_known_mime(code: u64) -> Option<&'static str> {
    usize::try_from(code)
        .ok()
        .and_then(|index| WELL_KNOWN.get(index))
        .copied()
}

/// Well-known code for a MIME type, compared case-insensitively
pub fn well_known_code(mime: &str) -> Option<u8> {
    WELL_KNOWN
        .iter()
        .position(|known| known.eq_ignore_ascii_case(mime))
        .map(|index| index as u8)
}

/// A content type with the parameters MMS uses
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentType {
    pub media_type: String,
    pub charset: Option<Charset>,
    pub name: Option<String>,
    pub filename: Option<String>,
    /// Content-ID of the root part of a multipart/related body
    pub start: Option<String>,
    /// Media type of the root part of a multipart/related body
    pub start_type: Option<String>,
}

impl ContentType {
    pub fn new(media_type: impl Into<String>) -> Self {
        ContentType {
            media_type: media_type.into(),
            charset: None,
            name: None,
            filename: None,
            start: None,
            start_type: None,
        }
    }

    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = Some(charset);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_start(mut self, start: impl Into<String>, start_type: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self.start_type = Some(start_type.into());
        self
    }

    pub fn is(&self, mime: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(mime)
    }

    fn top_level(&self) -> &str {
        self.media_type.split('/').next().unwrap_or_default()
    }

    pub fn is_text(&self) -> bool {
        self.top_level().eq_ignore_ascii_case("text")
    }

    pub fn is_image(&self) -> bool {
        self.top_level().eq_ignore_ascii_case("image")
    }

    pub fn is_video(&self) -> bool {
        self.top_level().eq_ignore_ascii_case("video")
    }

    pub fn is_audio(&self) -> bool {
        self.top_level().eq_ignore_ascii_case("audio")
    }

    pub fn is_smil(&self) -> bool {
        self.is(APPLICATION_SMIL)
    }

    pub fn is_multipart(&self) -> bool {
        self.top_level().eq_ignore_ascii_case("multipart")
            || self
                .media_type
                .to_ascii_lowercase()
                .starts_with("application/vnd.wap.multipart.")
    }

    fn has_params(&self) -> bool {
        self.charset.is_some()
            || self.name.is_some()
            || self.filename.is_some()
            || self.start.is_some()
            || self.start_type.is_some()
    }

    fn encode_media(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match well_known_code(&self.media_type) {
            Some(code) => encode_short_integer(buf, code),
            None => {
                encode_text_string(buf, self.media_type.as_bytes());
                Ok(())
            }
        }
    }

    fn decode_media(buf: &mut Cursor<&[u8]>) -> Result<String, CodecError> {
        let first = peek_u8(buf)?;
        if first & 0x80 != 0 || first <= SHORT_LENGTH_MAX {
            let code = decode_integer_value(buf)?;
            Ok(media_for_code(code))
        } else {
            Ok(text(decode_text_string(buf)?, "content-type"))
        }
    }

    fn decode_param(&mut self, buf: &mut Cursor<&[u8]>) -> Result<(), CodecError> {
        let first = peek_u8(buf)?;
        if first & 0x80 == 0 && first > LENGTH_QUOTE {
            return self.decode_untyped_param(buf);
        }
        let token = decode_integer_value(buf)?;
        match token {
            param::CHARSET => self.charset = Some(decode_charset(buf)?),
            param::TYPE_V1_1 => {
                self.start_type = Some(media_for_code(decode_integer_value(buf)?));
            }
            param::TYPE => self.start_type = Some(Self::decode_media(buf)?),
            param::NAME_V1_1 | param::NAME => self.name = Some(decode_text_value(buf)?),
            param::FILENAME_V1_1 | param::FILENAME => {
                self.filename = Some(decode_text_value(buf)?)
            }
            param::START_V1_2 | param::START => self.start = Some(decode_text_value(buf)?),
            other => {
                let skipped = take_value(buf)?;
                trace!(token = other, len = skipped.len(), "skipping content-type parameter");
            }
        }
        Ok(())
    }

    fn decode_untyped_param(&mut self, buf: &mut Cursor<&[u8]>) -> Result<(), CodecError> {
        let name = text(decode_text_string(buf)?, "content-type parameter");
        let first = peek_u8(buf)?;
        let value = if first & 0x80 != 0 || (1..=SHORT_LENGTH_MAX).contains(&first) {
            decode_integer_value(buf)?.to_string()
        } else {
            decode_text_value(buf)?
        };
        match name.to_ascii_lowercase().as_str() {
            "charset" => {
                self.charset = Some(
                    value
                        .parse::<u32>()
                        .map(Charset::from)
                        .ok()
                        .or_else(|| Charset::from_name(&value))
                        .unwrap_or(Charset::Any),
                )
            }
            "name" => self.name = Some(value),
            "filename" => self.filename = Some(value),
            "start" => self.start = Some(value),
            "type" => self.start_type = Some(value),
            _ => trace!(%name, "skipping untyped content-type parameter"),
        }
        Ok(())
    }
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::new(APPLICATION_OCTET_STREAM)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.media_type)?;
        if let Some(charset) = self.charset {
            match charset.name() {
                Some(name) => write!(f, "; charset={name}")?,
                None => write!(f, "; charset={}", charset.mib_enum())?,
            }
        }
        if let Some(name) = &self.name {
            write!(f, "; name=\"{name}\"")?;
        }
        if let Some(filename) = &self.filename {
            write!(f, "; filename=\"{filename}\"")?;
        }
        if let Some(start) = &self.start {
            write!(f, "; start=\"{start}\"")?;
        }
        if let Some(start_type) = &self.start_type {
            write!(f, "; type=\"{start_type}\"")?;
        }
        Ok(())
    }
}

impl From<&str> for ContentType {
    fn from(media_type: &str) -> Self {
        ContentType::new(media_type)
    }
}

impl Encodable for ContentType {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        if !self.has_params() {
            return self.encode_media(buf);
        }
        encode_with_value_length(buf, |value| {
            self.encode_media(value)?;
            if let Some(charset) = self.charset {
                encode_short_integer(value, param::CHARSET as u8)?;
                encode_integer_value(value, u64::from(charset.mib_enum()));
            }
            if let Some(name) = &self.name {
                encode_short_integer(value, param::NAME_V1_1 as u8)?;
                encode_text_string(value, name.as_bytes());
            }
            if let Some(filename) = &self.filename {
                encode_short_integer(value, param::FILENAME_V1_1 as u8)?;
                encode_text_string(value, filename.as_bytes());
            }
            if let Some(start) = &self.start {
                encode_short_integer(value, param::START_V1_2 as u8)?;
                encode_text_string(value, start.as_bytes());
            }
            if let Some(start_type) = &self.start_type {
                encode_short_integer(value, param::TYPE as u8)?;
                ContentType::new(start_type.as_str()).encode_media(value)?;
            }
            Ok(())
        })
    }
}

impl Decodable for ContentType {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let first = peek_u8(buf)?;
        if first > LENGTH_QUOTE {
            // Constrained-media: well-known short-integer or extension media
            return Ok(ContentType::new(Self::decode_media(buf)?));
        }
        let end = decode_value_end(buf)?;
        let mut content_type = ContentType::new(Self::decode_media(buf)?);
        while buf.position() < end {
            content_type.decode_param(buf)?;
        }
        finish_value(buf, end, "content-type")?;
        Ok(content_type)
    }
}

fn media_for_code(code: u64) -> String {
    match well_known_mime(code) {
        Some(mime) => mime.to_owned(),
        None => {
            trace!(code, "unassigned content type code");
            APPLICATION_OCTET_STREAM.to_owned()
        }
    }
}

/// Well-known-charset: Any-charset (short-integer 0) or an integer-value
/// MIBenum. Some senders put a text name here instead.
fn decode_charset(buf: &mut Cursor<&[u8]>) -> Result<Charset, CodecError> {
    let first = peek_u8(buf)?;
    if first & 0x80 == 0 && first > LENGTH_QUOTE {
        let name = text(decode_text_string(buf)?, "charset");
        return Ok(Charset::from_name(&name).unwrap_or(Charset::Any));
    }
    let mib = decode_integer_value(buf)?;
    let mib = u32::try_from(mib).map_err(|_| CodecError::UnsupportedCharset(u32::MAX))?;
    Ok(Charset::from(mib))
}

/// Text-value: No-value, Token-text or Quoted-string
pub(crate) fn decode_text_value(buf: &mut Cursor<&[u8]>) -> Result<String, CodecError> {
    match peek_u8(buf)? {
        0 => {
            buf.advance(1);
            Ok(String::new())
        }
        QUOTED_STRING_START => Ok(text(decode_quoted_string(buf)?, "text-value")),
        _ => Ok(text(decode_text_string(buf)?, "text-value")),
    }
}

/// Header text is nominally US-ASCII. UTF-8 is taken as sent; anything else
/// is read as Latin-1 so one odd octet never costs the whole PDU.
pub(crate) fn text(bytes: bytes::Bytes, field: &'static str) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(_) => {
            trace!(field, "text is not UTF-8, reading as Latin-1");
            decode_latin1(&bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(data: &[u8]) -> ContentType {
        let mut cursor = Cursor::new(data);
        let content_type = ContentType::decode(&mut cursor).unwrap();
        assert!(!cursor.has_remaining());
        content_type
    }

    #[test]
    fn well_known_table() {
        assert_eq!(well_known_mime(0x03), Some("text/plain"));
        assert_eq!(well_known_mime(0x33), Some(MULTIPART_RELATED));
        assert_eq!(well_known_mime(0x4B), Some("application/vnd.oma.drm.rights+wbxml"));
        assert_eq!(well_known_mime(0x4C), None);
        assert_eq!(well_known_code("IMAGE/JPEG"), Some(0x1E));
        assert_eq!(well_known_code(APPLICATION_SMIL), None);
    }

    #[test]
    fn short_form_well_known() {
        let content_type = ContentType::new(MULTIPART_RELATED);
        assert_eq!(content_type.to_bytes().unwrap().as_ref(), &[0xB3]);
        assert_eq!(decode(&[0xB3]), content_type);
    }

    #[test]
    fn short_form_text() {
        let content_type = ContentType::new(APPLICATION_SMIL);
        let bytes = content_type.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), b"application/smil\0");
        assert_eq!(decode(&bytes), content_type);
    }

    #[test]
    fn general_form_with_charset() {
        let content_type = ContentType::new(TEXT_PLAIN).with_charset(Charset::Utf8);
        let bytes = content_type.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0x03, 0x83, 0x81, 0xEA]);
        assert_eq!(decode(&bytes), content_type);
    }

    #[test]
    fn related_with_start_and_type() {
        let content_type =
            ContentType::new(MULTIPART_RELATED).with_start("<smil>", APPLICATION_SMIL);
        let bytes = content_type.to_bytes().unwrap();
        assert_eq!(bytes[1], 0xB3);
        assert_eq!(bytes[2], 0x8A);
        assert_eq!(decode(&bytes), content_type);
    }

    #[test]
    fn newer_parameter_tokens_are_understood() {
        // image/jpeg; name="a.jpg" (0x97); filename=a.jpg (0x98)
        let mut data = vec![0x00, 0x9E, 0x97, b'"'];
        data.extend_from_slice(b"a.jpg\0");
        data.push(0x98);
        data.extend_from_slice(b"a.jpg\0");
        data[0] = (data.len() - 1) as u8;
        let content_type = decode(&data);
        assert_eq!(content_type.media_type, "image/jpeg");
        assert_eq!(content_type.name.as_deref(), Some("a.jpg"));
        assert_eq!(content_type.filename.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn unknown_parameters_are_skipped() {
        // text/plain; q (not interpreted); charset=us-ascii
        let data = [0x05, 0x83, 0x80, 0x83, 0x81, 0x83];
        let content_type = decode(&data);
        assert_eq!(content_type.charset, Some(Charset::UsAscii));
    }

    #[test]
    fn untyped_parameters() {
        let mut data = vec![0x00, 0x83];
        data.extend_from_slice(b"charset\0utf-8\0");
        data[0] = (data.len() - 1) as u8;
        assert_eq!(decode(&data).charset, Some(Charset::Utf8));
    }

    #[test]
    fn any_charset() {
        let data = [0x03, 0x83, 0x81, 0x80];
        assert_eq!(decode(&data).charset, Some(Charset::Any));
    }

    #[test]
    fn overrunning_parameters_are_rejected() {
        // Declared length 2 but the charset parameter needs three octets
        let data = [0x02, 0x83, 0x81, 0xEA];
        let mut cursor = Cursor::new(&data[..]);
        assert!(ContentType::decode(&mut cursor).is_err());
    }

    #[test]
    fn categories() {
        assert!(ContentType::new("image/png").is_image());
        assert!(ContentType::new("Video/mp4").is_video());
        assert!(ContentType::new("audio/amr").is_audio());
        assert!(ContentType::new(TEXT_PLAIN).is_text());
        assert!(ContentType::new(MULTIPART_MIXED).is_multipart());
        assert!(ContentType::new(APPLICATION_SMIL).is_smil());
    }

    #[test]
    fn latin1_name_is_read_not_rejected() {
        let data = [
            0x0B, 0x9E, 0x85, b'c', b'a', b'f', 0xE9, b'.', b'j', b'p', b'g', 0x00,
        ];
        let content_type = decode(&data);
        assert_eq!(content_type.media_type, "image/jpeg");
        assert_eq!(content_type.name.as_deref(), Some("café.jpg"));
    }

    #[test]
    fn display() {
        let content_type = ContentType::new(TEXT_PLAIN).with_charset(Charset::Utf8);
        assert_eq!(content_type.to_string(), "text/plain; charset=utf-8");
    }
}
