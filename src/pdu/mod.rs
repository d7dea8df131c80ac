// ABOUTME: The closed set of MMS PDUs, one struct per message type, and conversion to and from headers
// ABOUTME: Pdu::from_headers is the only place a parsed PDU is constructed

mod acknowledge_ind;
mod delivery_ind;
mod notification_ind;
mod notify_resp_ind;
mod read_report;
mod retrieve_conf;
mod send_conf;
mod send_req;

pub use acknowledge_ind::AcknowledgeInd;
pub use delivery_ind::DeliveryInd;
pub use notification_ind::NotificationInd;
pub use notify_resp_ind::NotifyRespInd;
pub use read_report::{ReadOrigInd, ReadRecInd};
pub use retrieve_conf::RetrieveConf;
pub use send_conf::SendConf;
pub use send_req::{SendReq, SendReqBuilder, generate_transaction_id};

use crate::body::PduBody;
use crate::codec::CodecError;
use crate::datatypes::status::{from_yes_no, yes_no};
use crate::datatypes::{EncodedStringValue, HeaderField, MessageType, MmsVersion};
use crate::headers::{ExtensionHeader, HeaderValueType, PduHeaders};
use bytes::BytesMut;
use tracing::trace;

/// A decoded or composable MMS PDU
#[derive(Clone, Debug, PartialEq)]
pub enum Pdu {
    SendReq(Box<SendReq>),
    SendConf(SendConf),
    NotificationInd(NotificationInd),
    NotifyRespInd(NotifyRespInd),
    RetrieveConf(Box<RetrieveConf>),
    AcknowledgeInd(AcknowledgeInd),
    DeliveryInd(DeliveryInd),
    ReadRecInd(ReadRecInd),
    ReadOrigInd(ReadOrigInd),
}

impl Pdu {
    pub fn message_type(&self) -> MessageType {
        match self {
            Pdu::SendReq(_) => MessageType::SendReq,
            Pdu::SendConf(_) => MessageType::SendConf,
            Pdu::NotificationInd(_) => MessageType::NotificationInd,
            Pdu::NotifyRespInd(_) => MessageType::NotifyRespInd,
            Pdu::RetrieveConf(_) => MessageType::RetrieveConf,
            Pdu::AcknowledgeInd(_) => MessageType::AcknowledgeInd,
            Pdu::DeliveryInd(_) => MessageType::DeliveryInd,
            Pdu::ReadRecInd(_) => MessageType::ReadRecInd,
            Pdu::ReadOrigInd(_) => MessageType::ReadOrigInd,
        }
    }

    pub fn mms_version(&self) -> MmsVersion {
        match self {
            Pdu::SendReq(pdu) => pdu.mms_version,
            Pdu::SendConf(pdu) => pdu.mms_version,
            Pdu::NotificationInd(pdu) => pdu.mms_version,
            Pdu::NotifyRespInd(pdu) => pdu.mms_version,
            Pdu::RetrieveConf(pdu) => pdu.mms_version,
            Pdu::AcknowledgeInd(pdu) => pdu.mms_version,
            Pdu::DeliveryInd(pdu) => pdu.mms_version,
            Pdu::ReadRecInd(pdu) => pdu.mms_version,
            Pdu::ReadOrigInd(pdu) => pdu.mms_version,
        }
    }

    /// X-Mms-Transaction-Id, for the PDUs that carry one
    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Pdu::SendReq(pdu) => Some(&pdu.transaction_id),
            Pdu::SendConf(pdu) => Some(&pdu.transaction_id),
            Pdu::NotificationInd(pdu) => Some(&pdu.transaction_id),
            Pdu::NotifyRespInd(pdu) => Some(&pdu.transaction_id),
            Pdu::RetrieveConf(pdu) => pdu.transaction_id.as_deref(),
            Pdu::AcknowledgeInd(pdu) => Some(&pdu.transaction_id),
            Pdu::DeliveryInd(_) | Pdu::ReadRecInd(_) | Pdu::ReadOrigInd(_) => None,
        }
    }

    /// Multipart body, for SendReq and RetrieveConf
    pub fn body(&self) -> Option<&PduBody> {
        match self {
            Pdu::SendReq(pdu) => Some(&pdu.body),
            Pdu::RetrieveConf(pdu) => Some(&pdu.body),
            _ => None,
        }
    }

    /// Build the PDU for `message_type` from parsed headers, failing when a
    /// mandatory header is absent
    pub fn from_headers(
        message_type: MessageType,
        headers: PduHeaders,
        body: PduBody,
    ) -> Result<Pdu, CodecError> {
        let mut fields = Fields::new(message_type, headers);
        let pdu: Pdu = match message_type {
            MessageType::SendReq => SendReq::from_fields(&mut fields, body)?.into(),
            MessageType::SendConf => SendConf::from_fields(&mut fields)?.into(),
            MessageType::NotificationInd => NotificationInd::from_fields(&mut fields)?.into(),
            MessageType::NotifyRespInd => NotifyRespInd::from_fields(&mut fields)?.into(),
            MessageType::RetrieveConf => RetrieveConf::from_fields(&mut fields, body)?.into(),
            MessageType::AcknowledgeInd => AcknowledgeInd::from_fields(&mut fields)?.into(),
            MessageType::DeliveryInd => DeliveryInd::from_fields(&mut fields)?.into(),
            MessageType::ReadRecInd => ReadRecInd::from_fields(&mut fields)?.into(),
            MessageType::ReadOrigInd => ReadOrigInd::from_fields(&mut fields)?.into(),
        };
        Ok(pdu)
    }

    /// Headers that encode this PDU, message type and version included
    pub fn to_headers(&self) -> Result<PduHeaders, CodecError> {
        let mut headers = PduHeaders::new();
        headers.insert(HeaderField::MessageType, self.message_type() as u8)?;
        headers.insert(HeaderField::MmsVersion, self.mms_version().wire_octet())?;
        match self {
            Pdu::SendReq(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::SendConf(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::NotificationInd(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::NotifyRespInd(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::RetrieveConf(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::AcknowledgeInd(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::DeliveryInd(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::ReadRecInd(pdu) => pdu.write_headers(&mut headers)?,
            Pdu::ReadOrigInd(pdu) => pdu.write_headers(&mut headers)?,
        }
        Ok(headers)
    }
}

/// Header extraction for one message type: required fields fail with
/// `MissingMandatoryField`, optional ones yield `None`
pub(crate) struct Fields {
    message_type: MessageType,
    headers: PduHeaders,
}

impl Fields {
    fn new(message_type: MessageType, headers: PduHeaders) -> Self {
        Fields {
            message_type,
            headers,
        }
    }

    pub(crate) fn required<T: HeaderValueType>(&mut self, field: HeaderField) -> Result<T, CodecError> {
        self.headers
            .take(field)?
            .ok_or(CodecError::MissingMandatoryField {
                message_type: self.message_type,
                field,
            })
    }

    pub(crate) fn optional<T: HeaderValueType>(
        &mut self,
        field: HeaderField,
    ) -> Result<Option<T>, CodecError> {
        self.headers.take(field)
    }

    /// To/Cc/Bcc, empty when absent
    pub(crate) fn addresses(&mut self, field: HeaderField) -> Result<Vec<EncodedStringValue>, CodecError> {
        Ok(self.optional(field)?.unwrap_or_default())
    }

    pub(crate) fn version(&mut self) -> Result<MmsVersion, CodecError> {
        self.required::<u8>(HeaderField::MmsVersion)
            .map(MmsVersion::from_octet)
    }

    /// Yes/No header; unknown tokens read as absent
    pub(crate) fn flag(&mut self, field: HeaderField) -> Result<Option<bool>, CodecError> {
        Ok(self.optional::<u8>(field)?.and_then(from_yes_no))
    }

    /// Extension headers, then any known header this message type has no
    /// field for, re-encoded so a later compose writes it back out. Call last.
    pub(crate) fn extensions(&mut self) -> Result<Vec<ExtensionHeader>, CodecError> {
        let mut extensions = self.headers.take_extensions();
        for field in self.headers.fields() {
            if field == HeaderField::MessageType {
                continue;
            }
            let Some(value) = self.headers.remove(field) else {
                continue;
            };
            let mut encoded = BytesMut::new();
            value.encode_field(field, &mut encoded)?;
            trace!(header = field.name(), "keeping unmodelled header as extension");
            extensions.push(ExtensionHeader::Binary {
                code: field as u8,
                value: encoded.split_off(1).freeze(),
            });
        }
        Ok(extensions)
    }
}

/// Store a recipient list, leaving the field absent when it is empty
pub(crate) fn put_addresses(
    headers: &mut PduHeaders,
    field: HeaderField,
    addresses: &[EncodedStringValue],
) -> Result<(), CodecError> {
    if addresses.is_empty() {
        return Ok(());
    }
    headers.insert(field, addresses.to_vec())
}

/// Store a Yes/No header when set
pub(crate) fn put_flag(
    headers: &mut PduHeaders,
    field: HeaderField,
    value: Option<bool>,
) -> Result<(), CodecError> {
    headers.insert_opt(field, value.map(yes_no))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{ResponseStatus, Status};

    fn base(message_type: MessageType) -> PduHeaders {
        let mut headers = PduHeaders::new();
        headers
            .insert(HeaderField::MessageType, message_type as u8)
            .unwrap();
        headers
            .insert(HeaderField::MmsVersion, MmsVersion::V1_2.wire_octet())
            .unwrap();
        headers
    }

    #[test]
    fn missing_version_is_mandatory() {
        let mut headers = PduHeaders::new();
        headers.set_text_string(HeaderField::TransactionId, "t").unwrap();
        let err = Pdu::from_headers(MessageType::AcknowledgeInd, headers, PduBody::new())
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::MissingMandatoryField {
                message_type: MessageType::AcknowledgeInd,
                field: HeaderField::MmsVersion,
            }
        ));
    }

    #[test]
    fn send_conf_from_headers() {
        let mut headers = base(MessageType::SendConf);
        headers.set_text_string(HeaderField::TransactionId, "t1").unwrap();
        headers
            .set_octet(HeaderField::ResponseStatus, ResponseStatus::Ok.into())
            .unwrap();
        headers.set_text_string(HeaderField::MessageId, "m1").unwrap();
        let pdu = Pdu::from_headers(MessageType::SendConf, headers, PduBody::new()).unwrap();
        match &pdu {
            Pdu::SendConf(conf) => {
                assert_eq!(conf.response_status, ResponseStatus::Ok);
                assert_eq!(conf.message_id.as_deref(), Some("m1"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(pdu.transaction_id(), Some("t1"));
        assert_eq!(pdu.mms_version(), MmsVersion::V1_2);
    }

    #[test]
    fn headers_roundtrip() {
        let pdu = Pdu::from(NotifyRespInd::new("t9", Status::Retrieved));
        let headers = pdu.to_headers().unwrap();
        assert_eq!(headers.octet(HeaderField::Status).unwrap(), Some(0x81));
        let rebuilt =
            Pdu::from_headers(MessageType::NotifyRespInd, headers, PduBody::new()).unwrap();
        assert_eq!(rebuilt, pdu);
    }

    #[test]
    fn delivery_ind_needs_recipient() {
        let mut headers = base(MessageType::DeliveryInd);
        headers.set_text_string(HeaderField::MessageId, "m").unwrap();
        headers.set_long_integer(HeaderField::Date, 1).unwrap();
        headers.set_octet(HeaderField::Status, 0x81).unwrap();
        assert!(matches!(
            Pdu::from_headers(MessageType::DeliveryInd, headers, PduBody::new()),
            Err(CodecError::MissingMandatoryField {
                field: HeaderField::To,
                ..
            })
        ));
    }
}
