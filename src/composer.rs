// ABOUTME: Encodes PDUs to bytes: m-send-req with SMIL and content-type defaults, any other PDU as-is
// ABOUTME: Header order follows the MMS encapsulation rules; Content-Type and the body always come last

use crate::body::{PartData, PduBody, PduPart};
use crate::codec::{CodecError, Encodable};
use crate::datatypes::address::add_type_suffix;
use crate::datatypes::content_type::{APPLICATION_SMIL, MULTIPART_MIXED, MULTIPART_RELATED};
use crate::datatypes::{ContentType, HeaderField, Sender, Uintvar};
use crate::headers::PduHeaders;
use crate::pdu::{Pdu, SendReq};
use crate::resolver::PartDataResolver;
use crate::smil;
use bytes::{BufMut, Bytes, BytesMut};
use std::io;
use tracing::{debug, trace};

/// Headers every PDU leads with
const LEADING_HEADERS: [HeaderField; 3] = [
    HeaderField::MessageType,
    HeaderField::TransactionId,
    HeaderField::MmsVersion,
];

/// m-send-req header order; anything else follows in field-code order
const SEND_REQ_HEADERS: [HeaderField; 16] = [
    HeaderField::MessageType,
    HeaderField::TransactionId,
    HeaderField::MmsVersion,
    HeaderField::From,
    HeaderField::To,
    HeaderField::Subject,
    HeaderField::Date,
    HeaderField::MessageClass,
    HeaderField::Cc,
    HeaderField::Bcc,
    HeaderField::Expiry,
    HeaderField::DeliveryTime,
    HeaderField::Priority,
    HeaderField::DeliveryReport,
    HeaderField::ReadReport,
    HeaderField::SenderVisibility,
];

/// Composer for outgoing PDUs
pub struct PduComposer<'a> {
    smil: bool,
    address_types: bool,
    resolver: Option<&'a dyn PartDataResolver>,
}

impl Default for PduComposer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> PduComposer<'a> {
    pub fn new() -> Self {
        PduComposer {
            smil: true,
            address_types: true,
            resolver: None,
        }
    }

    /// Prepend a generated SMIL part to bodies that lack one (default on)
    pub fn with_smil(mut self, enabled: bool) -> Self {
        self.smil = enabled;
        self
    }

    /// Append `/TYPE=PLMN` style suffixes to addresses (default on)
    pub fn with_address_types(mut self, enabled: bool) -> Self {
        self.address_types = enabled;
        self
    }

    /// Source for the data of URI-backed parts
    pub fn with_resolver(mut self, resolver: &'a dyn PartDataResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Encode an m-send-req
    pub fn make(&self, send_req: &SendReq) -> Result<Bytes, CodecError> {
        send_req.validate()?;
        let mut send_req = send_req.clone();

        if self.address_types {
            for list in [&mut send_req.to, &mut send_req.cc, &mut send_req.bcc] {
                for address in list.iter_mut() {
                    *address = add_type_suffix(address);
                }
            }
            if let Sender::Address(address) = &mut send_req.from {
                *address = add_type_suffix(address);
            }
        }

        if self.smil && smil::ensure_smil(&mut send_req.body)? {
            trace!("prepended generated SMIL part");
        }
        send_req.content_type = Some(choose_content_type(
            send_req.content_type.take(),
            &send_req.body,
        ));

        let body = std::mem::take(&mut send_req.body);
        let mut headers = PduHeaders::new();
        headers.insert(HeaderField::MessageType, SendReq::MESSAGE_TYPE as u8)?;
        headers.insert(HeaderField::MmsVersion, send_req.mms_version.wire_octet())?;
        send_req.write_headers(&mut headers)?;

        let mut buf = BytesMut::new();
        encode_headers(&headers, &SEND_REQ_HEADERS, &mut buf)?;
        self.encode_body(&body, &mut buf)?;
        debug!(
            transaction_id = %send_req.transaction_id,
            parts = body.len(),
            len = buf.len(),
            "composed m-send-req"
        );
        Ok(buf.freeze())
    }

    /// Encode any PDU. m-send-req goes through `make`; other PDUs are
    /// written exactly as they stand.
    pub fn compose(&self, pdu: &Pdu) -> Result<Bytes, CodecError> {
        if let Pdu::SendReq(send_req) = pdu {
            return self.make(send_req);
        }
        let headers = pdu.to_headers()?;
        let mut buf = BytesMut::new();
        encode_headers(&headers, &LEADING_HEADERS, &mut buf)?;
        if let Some(body) = pdu.body() {
            self.encode_body(body, &mut buf)?;
        }
        debug!(
            message_type = pdu.message_type().name(),
            len = buf.len(),
            "composed PDU"
        );
        Ok(buf.freeze())
    }

    fn encode_body(&self, body: &PduBody, buf: &mut BytesMut) -> Result<(), CodecError> {
        Uintvar(to_u32(body.len(), "part count")?).encode(buf)?;
        for part in body.iter() {
            self.encode_part(part, buf)?;
        }
        Ok(())
    }

    fn encode_part(&self, part: &PduPart, buf: &mut BytesMut) -> Result<(), CodecError> {
        let mut headers = BytesMut::new();
        part.encode_headers(&mut headers)?;
        let data = self.part_data(part)?;

        Uintvar(to_u32(headers.len(), "part header length")?).encode(buf)?;
        Uintvar(to_u32(data.len(), "part data length")?).encode(buf)?;
        buf.put_slice(&headers);
        buf.put_slice(&data);
        trace!(
            content_type = %part.content_type().media_type,
            headers = headers.len(),
            data = data.len(),
            "encoded part"
        );
        Ok(())
    }

    fn part_data(&self, part: &PduPart) -> Result<Bytes, CodecError> {
        match part.data() {
            PartData::Bytes(bytes) => Ok(bytes.clone()),
            PartData::Uri(uri) => {
                let result = match self.resolver {
                    Some(resolver) => resolver.resolve(uri),
                    None => Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        "no part data resolver configured",
                    )),
                };
                result.map_err(|source| CodecError::PartData {
                    location: uri.clone(),
                    source,
                })
            }
        }
    }
}

/// Encode an m-send-req with the default composer
pub fn make(send_req: &SendReq) -> Result<Bytes, CodecError> {
    PduComposer::new().make(send_req)
}

/// Write `headers` with the fields in `order` first, the remaining fields in
/// code order, then extension headers, then Content-Type
fn encode_headers(
    headers: &PduHeaders,
    order: &[HeaderField],
    buf: &mut BytesMut,
) -> Result<(), CodecError> {
    for &field in order {
        if let Some(value) = headers.get(field) {
            value.encode_field(field, buf)?;
        }
    }
    for field in headers.fields() {
        if order.contains(&field) || field == HeaderField::ContentType {
            continue;
        }
        if let Some(value) = headers.get(field) {
            value.encode_field(field, buf)?;
        }
    }
    for extension in headers.extensions() {
        extension.encode(buf)?;
    }
    if let Some(value) = headers.get(HeaderField::ContentType) {
        value.encode_field(HeaderField::ContentType, buf)?;
    }
    Ok(())
}

/// multipart/related pointing at the SMIL part when there is one, otherwise
/// multipart/mixed. An explicit content type is kept, with start and type
/// filled in when it is multipart/related.
fn choose_content_type(explicit: Option<ContentType>, body: &PduBody) -> ContentType {
    let smil_id = body
        .iter()
        .find(|part| part.content_type().is_smil())
        .map(|part| part.content_id().map(|id| format!("<{id}>")));

    match (explicit, smil_id) {
        (Some(mut content_type), smil_id) => {
            if content_type.is(MULTIPART_RELATED) && content_type.start_type.is_none() {
                if let Some(Some(start)) = smil_id {
                    content_type.start.get_or_insert(start);
                    content_type.start_type = Some(APPLICATION_SMIL.to_owned());
                }
            }
            content_type
        }
        (None, Some(Some(start))) => {
            ContentType::new(MULTIPART_RELATED).with_start(start, APPLICATION_SMIL)
        }
        (None, Some(None)) => {
            let mut content_type = ContentType::new(MULTIPART_RELATED);
            content_type.start_type = Some(APPLICATION_SMIL.to_owned());
            content_type
        }
        (None, None) => ContentType::new(MULTIPART_MIXED),
    }
}

fn to_u32(len: usize, field: &'static str) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::invalid(field, format!("{len} exceeds a uintvar")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::MmsVersion;

    fn send_req(parts: Vec<PduPart>) -> SendReq {
        SendReq::builder()
            .transaction_id("TEST001")
            .mms_version(MmsVersion::V1_3)
            .date(0)
            .to("+15551234567")
            .body(parts.into_iter().collect())
            .build()
            .unwrap()
    }

    #[test]
    fn leading_headers() {
        let bytes = PduComposer::new()
            .with_smil(false)
            .make(&send_req(vec![PduPart::text("Hello World")]))
            .unwrap();
        assert_eq!(&bytes[..2], &[0x8C, 0x80]);
        assert_eq!(&bytes[2..11], b"\x98TEST001\0");
        assert_eq!(&bytes[11..13], &[0x8D, 0x93]);
        // insert-address From follows the version
        assert_eq!(&bytes[13..16], &[0x89, 0x01, 0x81]);
        assert_eq!(bytes[16], 0x97);
    }

    #[test]
    fn related_when_smil_present() {
        let body: PduBody = vec![PduPart::text("hi")].into_iter().collect();
        let mut with_smil = body.clone();
        smil::ensure_smil(&mut with_smil).unwrap();
        let content_type = choose_content_type(None, &with_smil);
        assert!(content_type.is(MULTIPART_RELATED));
        assert_eq!(content_type.start.as_deref(), Some("<smil>"));
        assert_eq!(content_type.start_type.as_deref(), Some(APPLICATION_SMIL));

        assert!(choose_content_type(None, &body).is(MULTIPART_MIXED));
    }

    #[test]
    fn explicit_content_type_is_kept() {
        let body = PduBody::new();
        let explicit = ContentType::new("application/vnd.wap.multipart.alternative");
        assert_eq!(
            choose_content_type(Some(explicit.clone()), &body),
            explicit
        );
    }

    #[test]
    fn uri_part_without_resolver_fails() {
        let part = PduPart::builder(ContentType::new("image/png"))
            .uri("img.png")
            .build()
            .unwrap();
        let err = PduComposer::new()
            .make(&send_req(vec![part]))
            .unwrap_err();
        assert!(matches!(err, CodecError::PartData { ref location, .. } if location == "img.png"));
    }

    #[test]
    fn uri_part_with_resolver() {
        let part = PduPart::builder(ContentType::new("image/png"))
            .uri("img.png")
            .build()
            .unwrap();
        let resolver = |_: &str| -> io::Result<Bytes> { Ok(Bytes::from_static(b"\x89PNG")) };
        let bytes = PduComposer::new()
            .with_resolver(&resolver)
            .with_smil(false)
            .make(&send_req(vec![part]))
            .unwrap();
        assert!(bytes.ends_with(b"\x89PNG"));
    }

    #[test]
    fn address_suffix_is_optional() {
        let req = send_req(vec![]);
        let suffixed = PduComposer::new().make(&req).unwrap();
        let plain = PduComposer::new().with_address_types(false).make(&req).unwrap();
        let needle = b"+15551234567/TYPE=PLMN";
        assert!(suffixed.windows(needle.len()).any(|w| w == needle));
        assert!(!plain.windows(needle.len()).any(|w| w == needle));
    }
}
