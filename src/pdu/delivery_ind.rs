// ABOUTME: m-delivery-ind, the MMSC's delivery report for a previously sent message
// ABOUTME: Identifies the message by Message-ID and the recipient it concerns

use super::{Fields, put_addresses};
use crate::codec::CodecError;
use crate::datatypes::{EncodedStringValue, HeaderField, MessageType, MmsVersion, Status};
use crate::headers::PduHeaders;
use crate::macros::impl_message_type;

/// m-delivery-ind
#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryInd {
    pub mms_version: MmsVersion,
    pub message_id: String,
    /// Never empty once parsed
    pub to: Vec<EncodedStringValue>,
    /// Unix seconds
    pub date: u64,
    pub status: Status,
    pub status_text: Option<EncodedStringValue>,
}

impl_message_type!(DeliveryInd, DeliveryInd);

impl DeliveryInd {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        let mms_version = fields.version()?;
        let message_id = fields.required(HeaderField::MessageId)?;
        let to = fields.addresses(HeaderField::To)?;
        if to.is_empty() {
            return Err(CodecError::MissingMandatoryField {
                message_type: MessageType::DeliveryInd,
                field: HeaderField::To,
            });
        }
        Ok(DeliveryInd {
            mms_version,
            message_id,
            to,
            date: fields.required(HeaderField::Date)?,
            status: fields.required::<u8>(HeaderField::Status)?.into(),
            status_text: fields.optional(HeaderField::StatusText)?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::MessageId, self.message_id.clone())?;
        put_addresses(headers, HeaderField::To, &self.to)?;
        headers.insert(HeaderField::Date, self.date)?;
        headers.insert(HeaderField::Status, u8::from(self.status))?;
        headers.insert_opt(HeaderField::StatusText, self.status_text.clone())
    }
}
