// ABOUTME: Decodes a complete MMS PDU from a byte buffer: header section, then the multipart body
// ABOUTME: parse() swallows failures into None; try_parse() reports why decoding stopped

use crate::body::{PduBody, PduPart};
use crate::codec::{
    CodecError, Decodable, decode_bytes, decode_text_string, decode_u8, peek_u8, take_value,
};
use crate::datatypes::content_type::text;
use crate::datatypes::{HeaderField, MessageType, Uintvar};
use crate::headers::{ExtensionHeader, HeaderValue, PduHeaders};
use crate::pdu::Pdu;
use bytes::Buf;
use std::io::Cursor;
use tracing::{debug, trace, warn};

/// Parser for one encoded PDU
#[derive(Debug)]
pub struct PduParser<'a> {
    data: &'a [u8],
    parse_content_disposition: bool,
}

impl<'a> PduParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        PduParser {
            data,
            parse_content_disposition: true,
        }
    }

    /// Whether part Content-Disposition headers are decoded (the default)
    /// or skipped
    pub fn parse_content_disposition(mut self, enabled: bool) -> Self {
        self.parse_content_disposition = enabled;
        self
    }

    /// Decode the PDU, logging and discarding the reason on failure
    pub fn parse(&self) -> Option<Pdu> {
        match self.try_parse() {
            Ok(pdu) => Some(pdu),
            Err(e) => {
                warn!(error = %e, len = self.data.len(), "failed to parse MMS PDU");
                None
            }
        }
    }

    pub fn try_parse(&self) -> Result<Pdu, CodecError> {
        let mut buf = Cursor::new(self.data);
        let (message_type, headers) = parse_headers(&mut buf)?;
        debug!(
            message_type = message_type.name(),
            headers = headers.len(),
            "parsed PDU headers"
        );

        let body = if message_type.has_body() {
            self.parse_body(&mut buf)?
        } else {
            PduBody::new()
        };

        if buf.has_remaining() {
            trace!(remaining = buf.remaining(), "ignoring trailing octets");
        }

        Pdu::from_headers(message_type, headers, body)
    }

    fn parse_body(&self, buf: &mut Cursor<&[u8]>) -> Result<PduBody, CodecError> {
        // A PDU that ends right after Content-Type has no parts
        if !buf.has_remaining() {
            return Ok(PduBody::new());
        }
        let declared = Uintvar::decode(buf)?.0;
        let mut body = PduBody::new();
        for index in 0..declared {
            if !buf.has_remaining() {
                return Err(CodecError::PartCountMismatch {
                    declared,
                    actual: index,
                });
            }
            body.add_part(self.parse_part(buf)?);
        }
        trace!(parts = declared, "parsed PDU body");
        Ok(body)
    }

    fn parse_part(&self, buf: &mut Cursor<&[u8]>) -> Result<PduPart, CodecError> {
        let headers_len = Uintvar::decode(buf)?.0 as usize;
        let data_len = Uintvar::decode(buf)?.0 as usize;
        let header_block = decode_bytes(buf, headers_len)?;
        let mut headers = Cursor::new(header_block.as_ref());
        let builder = PduPart::decode_headers(&mut headers, self.parse_content_disposition)?;
        let data = decode_bytes(buf, data_len)?;
        builder.data(data).build()
    }
}

/// Parse `data`, returning `None` if it is not a well-formed PDU
pub fn parse(data: &[u8]) -> Option<Pdu> {
    PduParser::new(data).parse()
}

/// Decode the header section. X-Mms-Message-Type must come first; for
/// message types with a body, Content-Type ends the section.
pub fn parse_headers(buf: &mut Cursor<&[u8]>) -> Result<(MessageType, PduHeaders), CodecError> {
    let first = decode_u8(buf)?;
    if first != HeaderField::MessageType as u8 {
        return Err(CodecError::invalid(
            "X-Mms-Message-Type",
            format!("PDU starts with {first:#04x}, not the message type"),
        ));
    }
    let type_octet = decode_u8(buf)?;
    let message_type = MessageType::try_from(type_octet)
        .map_err(|_| CodecError::UnrecognizedMessageType(type_octet))?;

    let mut headers = PduHeaders::new();
    headers.set_octet(HeaderField::MessageType, type_octet)?;

    while buf.has_remaining() {
        let code = peek_u8(buf)?;
        if code & 0x80 == 0 {
            headers.push_extension(decode_application_header(buf)?);
            continue;
        }
        decode_u8(buf)?;
        let Ok(field) = HeaderField::try_from(code) else {
            let value = take_value(buf)?;
            trace!(code, len = value.len(), "skipping unknown header");
            headers.push_extension(ExtensionHeader::Binary { code, value });
            continue;
        };
        let value = HeaderValue::decode(field, buf)?;
        trace!(header = field.name(), "decoded header");
        headers.merge(field, value)?;
        if field == HeaderField::ContentType && message_type.has_body() {
            break;
        }
    }

    Ok((message_type, headers))
}

fn decode_application_header(buf: &mut Cursor<&[u8]>) -> Result<ExtensionHeader, CodecError> {
    let name = decode_text_string(buf)?;
    let value = decode_text_string(buf)?;
    let name = text(name, "application-header");
    trace!(%name, "decoded application header");
    Ok(ExtensionHeader::Application { name, value })
}
