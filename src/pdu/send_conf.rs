// ABOUTME: m-send-conf, the MMSC's answer to an m-send-req
// ABOUTME: Carries the response status and, on success, the assigned Message-ID

use super::Fields;
use crate::codec::CodecError;
use crate::datatypes::{EncodedStringValue, HeaderField, MmsVersion, ResponseStatus};
use crate::headers::PduHeaders;
use crate::macros::impl_message_type;

/// m-send-conf
#[derive(Clone, Debug, PartialEq)]
pub struct SendConf {
    pub transaction_id: String,
    pub mms_version: MmsVersion,
    pub response_status: ResponseStatus,
    pub response_text: Option<EncodedStringValue>,
    pub message_id: Option<String>,
    /// X-Mms-Content-Location, present when the MMSC stored the message
    pub content_location: Option<String>,
}

impl_message_type!(SendConf, SendConf);

impl SendConf {
    pub fn new(transaction_id: impl Into<String>, response_status: ResponseStatus) -> Self {
        SendConf {
            transaction_id: transaction_id.into(),
            mms_version: MmsVersion::default(),
            response_status,
            response_text: None,
            message_id: None,
            content_location: None,
        }
    }

    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        Ok(SendConf {
            transaction_id: fields.required(HeaderField::TransactionId)?,
            mms_version: fields.version()?,
            response_status: fields
                .required::<u8>(HeaderField::ResponseStatus)?
                .into(),
            response_text: fields.optional(HeaderField::ResponseText)?,
            message_id: fields.optional(HeaderField::MessageId)?,
            content_location: fields.optional(HeaderField::ContentLocation)?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::TransactionId, self.transaction_id.clone())?;
        headers.insert(HeaderField::ResponseStatus, u8::from(self.response_status))?;
        headers.insert_opt(HeaderField::ResponseText, self.response_text.clone())?;
        headers.insert_opt(HeaderField::MessageId, self.message_id.clone())?;
        headers.insert_opt(HeaderField::ContentLocation, self.content_location.clone())
    }
}
