// ABOUTME: Multipart message body: ordered parts, each with MIME headers and in-memory or URI-backed data
// ABOUTME: Also holds the codec for a single part's header block

use crate::codec::{
    CodecError, Decodable, Encodable, LENGTH_QUOTE, QUOTED_STRING_START, decode_quoted_string,
    decode_text_string, decode_u8, encode_quoted_string, encode_text_string, peek_u8, take_value,
};
use crate::datatypes::content_type::{TEXT_PLAIN, decode_text_value, text};
use crate::datatypes::{Charset, ContentType, Disposition};
use crate::macros::optional_setters;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;
use tracing::trace;

/// Part header codes (WSP well-known header field names with bit 7 set)
mod part_header {
    pub const CONTENT_LOCATION: u8 = 0x8E;
    pub const CONTENT_DISPOSITION_V1_1: u8 = 0xAE;
    pub const CONTENT_ID: u8 = 0xC0;
    pub const CONTENT_DISPOSITION: u8 = 0xC5;
    pub const CONTENT_TRANSFER_ENCODING: u8 = 0xC8;
}

/// Where a part's octets come from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PartData {
    Bytes(Bytes),
    /// Read through a `PartDataResolver` when the PDU is composed
    Uri(String),
}

impl Default for PartData {
    fn default() -> Self {
        PartData::Bytes(Bytes::new())
    }
}

/// One MIME body part
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PduPart {
    content_type: ContentType,
    content_location: Option<String>,
    content_id: Option<String>,
    disposition: Option<Disposition>,
    transfer_encoding: Option<String>,
    data: PartData,
}

impl PduPart {
    pub fn builder(content_type: impl Into<ContentType>) -> PduPartBuilder {
        PduPartBuilder::new(content_type.into())
    }

    /// A `text/plain; charset=utf-8` part
    pub fn text(text: &str) -> Self {
        PduPart {
            content_type: ContentType::new(TEXT_PLAIN).with_charset(Charset::Utf8),
            content_location: None,
            content_id: None,
            disposition: None,
            transfer_encoding: None,
            data: PartData::Bytes(Bytes::copy_from_slice(text.as_bytes())),
        }
    }

    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn charset(&self) -> Option<Charset> {
        self.content_type.charset
    }

    pub fn content_location(&self) -> Option<&str> {
        self.content_location.as_deref()
    }

    /// Content-ID without the surrounding angle brackets
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    pub fn disposition(&self) -> Option<&Disposition> {
        self.disposition.as_ref()
    }

    pub fn transfer_encoding(&self) -> Option<&str> {
        self.transfer_encoding.as_deref()
    }

    /// Best available file name: disposition filename, then content-type
    /// filename and name parameters, then the content location
    pub fn filename(&self) -> Option<&str> {
        self.disposition
            .as_ref()
            .and_then(|d| d.filename.as_deref())
            .or(self.content_type.filename.as_deref())
            .or(self.content_type.name.as_deref())
            .or(self.content_location.as_deref())
    }

    pub fn data(&self) -> &PartData {
        &self.data
    }

    /// In-memory octets, `None` for URI-backed parts
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.data {
            PartData::Bytes(bytes) => Some(bytes),
            PartData::Uri(_) => None,
        }
    }

    /// Decode in-memory data using the part's charset (sniffed when absent)
    pub fn text_content(&self) -> Result<String, CodecError> {
        let bytes = self.bytes().ok_or_else(|| {
            CodecError::invalid("part data", "URI-backed part has not been resolved")
        })?;
        self.charset().unwrap_or(Charset::Any).decode(bytes)
    }

    pub fn to_builder(&self) -> PduPartBuilder {
        PduPartBuilder {
            content_type: self.content_type.clone(),
            content_location: self.content_location.clone(),
            content_id: self.content_id.clone(),
            disposition: self.disposition.clone(),
            transfer_encoding: self.transfer_encoding.clone(),
            data: self.data.clone(),
        }
    }

    pub(crate) fn set_content_location(&mut self, location: String) {
        self.content_location = Some(location);
    }

    pub(crate) fn set_content_id(&mut self, id: String) {
        self.content_id = Some(strip_angle_brackets(&id));
    }

    pub(crate) fn with_data(mut self, data: Bytes) -> Self {
        self.data = PartData::Bytes(data);
        self
    }

    /// Encode the part header block: content type first, then the optional
    /// headers
    pub(crate) fn encode_headers(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        self.content_type.encode(buf)?;
        if let Some(location) = &self.content_location {
            buf.put_u8(part_header::CONTENT_LOCATION);
            encode_text_string(buf, location.as_bytes());
        }
        if let Some(id) = &self.content_id {
            buf.put_u8(part_header::CONTENT_ID);
            encode_quoted_string(buf, format!("<{id}>").as_bytes());
        }
        if let Some(disposition) = &self.disposition {
            buf.put_u8(part_header::CONTENT_DISPOSITION);
            disposition.encode(buf)?;
        }
        if let Some(encoding) = &self.transfer_encoding {
            buf.put_u8(part_header::CONTENT_TRANSFER_ENCODING);
            encode_text_string(buf, encoding.as_bytes());
        }
        Ok(())
    }

    /// Decode a part header block that spans the whole of `buf`
    pub(crate) fn decode_headers(
        buf: &mut Cursor<&[u8]>,
        parse_disposition: bool,
    ) -> Result<PduPartBuilder, CodecError> {
        let mut builder = PduPartBuilder::new(ContentType::decode(buf)?);
        while (buf.position() as usize) < buf.get_ref().len() {
            let code = peek_u8(buf)?;
            if code & 0x80 == 0 {
                builder.decode_textual_header(buf)?;
                continue;
            }
            decode_u8(buf)?;
            match code {
                part_header::CONTENT_LOCATION => {
                    builder.content_location = Some(text(decode_text_string(buf)?, "content-location"));
                }
                part_header::CONTENT_ID => {
                    builder.content_id = Some(strip_angle_brackets(&decode_content_id(buf)?));
                }
                part_header::CONTENT_DISPOSITION | part_header::CONTENT_DISPOSITION_V1_1
                    if parse_disposition =>
                {
                    builder.disposition = Some(Disposition::decode(buf)?);
                }
                part_header::CONTENT_TRANSFER_ENCODING => {
                    builder.transfer_encoding = Some(decode_text_value(buf)?);
                }
                other => {
                    let skipped = take_value(buf)?;
                    trace!(code = other, len = skipped.len(), "skipping part header");
                }
            }
        }
        Ok(builder)
    }
}

/// Content-ID values arrive as quoted-strings or, from some senders, as plain
/// text-strings
fn decode_content_id(buf: &mut Cursor<&[u8]>) -> Result<String, CodecError> {
    let raw = if peek_u8(buf)? == QUOTED_STRING_START {
        decode_quoted_string(buf)?
    } else {
        decode_text_string(buf)?
    };
    Ok(text(raw, "content-id"))
}

fn strip_angle_brackets(id: &str) -> String {
    id.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(id)
        .to_owned()
}

/// Builder for body parts
#[derive(Clone, Debug)]
pub struct PduPartBuilder {
    content_type: ContentType,
    content_location: Option<String>,
    content_id: Option<String>,
    disposition: Option<Disposition>,
    transfer_encoding: Option<String>,
    data: PartData,
}

impl PduPartBuilder {
    pub fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_location: None,
            content_id: None,
            disposition: None,
            transfer_encoding: None,
            data: PartData::default(),
        }
    }

    optional_setters! {
        content_location: String,
        disposition: Disposition,
        transfer_encoding: String,
    }

    /// Angle brackets, if given, are stripped; they are added back on the wire
    pub fn content_id(mut self, id: impl AsRef<str>) -> Self {
        self.content_id = Some(strip_angle_brackets(id.as_ref()));
        self
    }

    pub fn charset(mut self, charset: Charset) -> Self {
        self.content_type.charset = Some(charset);
        self
    }

    pub fn data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = PartData::Bytes(data.into());
        self
    }

    /// Data to be read from `uri` at compose time
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.data = PartData::Uri(uri.into());
        self
    }

    /// Build the part, validating header values that must be text-safe
    pub fn build(self) -> Result<PduPart, CodecError> {
        if self.content_type.media_type.is_empty() {
            return Err(CodecError::invalid("content-type", "media type is empty"));
        }
        for (field, value) in [
            ("content-type", Some(&self.content_type.media_type)),
            ("content-location", self.content_location.as_ref()),
            ("content-id", self.content_id.as_ref()),
            ("content-transfer-encoding", self.transfer_encoding.as_ref()),
        ] {
            if value.is_some_and(|v| v.contains('\0')) {
                return Err(CodecError::invalid(field, "contains a NUL octet"));
            }
        }
        if let PartData::Uri(uri) = &self.data {
            if uri.is_empty() {
                return Err(CodecError::invalid("part data", "URI is empty"));
            }
        }
        Ok(PduPart {
            content_type: self.content_type,
            content_location: self.content_location,
            content_id: self.content_id,
            disposition: self.disposition,
            transfer_encoding: self.transfer_encoding,
            data: self.data,
        })
    }

    /// Textual (Token-text) part headers
    fn decode_textual_header(&mut self, buf: &mut Cursor<&[u8]>) -> Result<(), CodecError> {
        let first = peek_u8(buf)?;
        if first <= LENGTH_QUOTE {
            return Err(CodecError::invalid(
                "part header",
                format!("{first:#04x} is neither a header code nor a header name"),
            ));
        }
        let name = text(decode_text_string(buf)?, "part header");
        let value = decode_text_value(buf)?;
        match name.to_ascii_lowercase().as_str() {
            "content-location" => self.content_location = Some(value),
            "content-id" => self.content_id = Some(strip_angle_brackets(&value)),
            "content-transfer-encoding" => self.transfer_encoding = Some(value),
            _ => trace!(%name, "skipping textual part header"),
        }
        Ok(())
    }
}

/// Ordered parts of a multipart message; order is presentation order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PduBody {
    parts: Vec<PduPart>,
}

impl PduBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_part(&mut self, part: PduPart) {
        self.parts.push(part);
    }

    pub fn insert_part(&mut self, index: usize, part: PduPart) {
        self.parts.insert(index.min(self.parts.len()), part);
    }

    pub fn remove_part(&mut self, index: usize) -> Option<PduPart> {
        (index < self.parts.len()).then(|| self.parts.remove(index))
    }

    pub fn part(&self, index: usize) -> Option<&PduPart> {
        self.parts.get(index)
    }

    pub fn parts(&self) -> &[PduPart] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub(crate) fn parts_mut(&mut self) -> &mut [PduPart] {
        &mut self.parts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PduPart> {
        self.parts.iter()
    }

    /// Look a part up by Content-ID, with or without angle brackets
    pub fn part_by_content_id(&self, id: &str) -> Option<&PduPart> {
        let id = strip_angle_brackets(id);
        self.parts.iter().find(|part| part.content_id() == Some(id.as_str()))
    }

    pub fn part_by_content_location(&self, location: &str) -> Option<&PduPart> {
        self.parts
            .iter()
            .find(|part| part.content_location() == Some(location))
    }

    pub fn into_parts(self) -> Vec<PduPart> {
        self.parts
    }
}

impl FromIterator<PduPart> for PduBody {
    fn from_iter<I: IntoIterator<Item = PduPart>>(iter: I) -> Self {
        PduBody {
            parts: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PduBody {
    type Item = PduPart;
    type IntoIter = std::vec::IntoIter<PduPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}

impl<'a> IntoIterator for &'a PduBody {
    type Item = &'a PduPart;
    type IntoIter = std::slice::Iter<'a, PduPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_headers(data: &[u8]) -> PduPart {
        let mut cursor = Cursor::new(data);
        PduPart::decode_headers(&mut cursor, true)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn builder_strips_angle_brackets() {
        let part = PduPart::builder("image/jpeg")
            .content_id("<img1>")
            .content_location("img1.jpg")
            .data(Bytes::from_static(&[0xFF, 0xD8]))
            .build()
            .unwrap();
        assert_eq!(part.content_id(), Some("img1"));
        assert_eq!(part.filename(), Some("img1.jpg"));
        assert_eq!(part.bytes().unwrap().as_ref(), &[0xFF, 0xD8]);
    }

    #[test]
    fn builder_rejects_nul() {
        assert!(
            PduPart::builder(TEXT_PLAIN)
                .content_location("a\0b")
                .build()
                .is_err()
        );
        assert!(PduPart::builder("").build().is_err());
    }

    #[test]
    fn header_block_roundtrip() {
        let part = PduPart::builder(ContentType::new(TEXT_PLAIN).with_charset(Charset::Utf8))
            .content_id("text1")
            .content_location("text1.txt")
            .disposition(Disposition::inline())
            .transfer_encoding("binary")
            .build()
            .unwrap();
        let mut buf = BytesMut::new();
        part.encode_headers(&mut buf).unwrap();
        assert!(buf.windows(8).any(|w| w == b"\"<text1>"));
        assert_eq!(decode_headers(&buf), part);
    }

    #[test]
    fn textual_and_unknown_headers() {
        let mut data = vec![0x83];
        data.extend_from_slice(b"Content-ID\0<abc>\0");
        data.extend_from_slice(&[0x99, 0x81]);
        data.extend_from_slice(b"X-Whatever\0ignored\0");
        let part = decode_headers(&data);
        assert_eq!(part.content_type().media_type, TEXT_PLAIN);
        assert_eq!(part.content_id(), Some("abc"));
    }

    #[test]
    fn disposition_can_be_skipped() {
        let mut data = vec![0x83, part_header::CONTENT_DISPOSITION];
        data.extend_from_slice(&[0x01, 0x81]);
        let mut cursor = Cursor::new(data.as_slice());
        let part = PduPart::decode_headers(&mut cursor, false)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(part.disposition(), None);
    }

    #[test]
    fn body_lookup_and_order() {
        let mut body = PduBody::new();
        body.add_part(PduPart::text("one"));
        body.add_part(
            PduPart::builder("image/png")
                .content_id("img")
                .content_location("a.png")
                .build()
                .unwrap(),
        );
        body.insert_part(0, PduPart::text("zero"));
        assert_eq!(body.len(), 3);
        assert_eq!(body.part(0).unwrap().text_content().unwrap(), "zero");
        assert!(body.part_by_content_id("<img>").is_some());
        assert!(body.part_by_content_location("a.png").is_some());
        assert!(body.remove_part(7).is_none());
    }

    #[test]
    fn uri_parts_have_no_bytes() {
        let part = PduPart::builder("image/jpeg").uri("photo.jpg").build().unwrap();
        assert!(part.bytes().is_none());
        assert!(part.text_content().is_err());
    }
}
