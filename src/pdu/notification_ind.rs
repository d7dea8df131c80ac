// ABOUTME: m-notification-ind, pushed by the MMSC to announce a message waiting for retrieval
// ABOUTME: The content location it carries is what the client fetches

use super::{Fields, put_flag};
use crate::codec::CodecError;
use crate::datatypes::{
    EncodedStringValue, HeaderField, MessageClass, MmsVersion, Priority, Sender, TimeValue,
};
use crate::headers::PduHeaders;
use crate::macros::impl_message_type;

/// m-notification-ind
#[derive(Clone, Debug, PartialEq)]
pub struct NotificationInd {
    pub transaction_id: String,
    pub mms_version: MmsVersion,
    pub from: Option<Sender>,
    pub subject: Option<EncodedStringValue>,
    pub message_class: MessageClass,
    /// Octets
    pub message_size: u64,
    pub expiry: TimeValue,
    pub content_location: String,
    pub delivery_report: Option<bool>,
    pub priority: Option<Priority>,
    pub distribution_indicator: Option<bool>,
    /// X-Mms-Content-Class token, kept as its raw octet
    pub content_class: Option<u8>,
}

impl_message_type!(NotificationInd, NotificationInd);

impl NotificationInd {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        Ok(NotificationInd {
            transaction_id: fields.required(HeaderField::TransactionId)?,
            mms_version: fields.version()?,
            from: fields.optional(HeaderField::From)?,
            subject: fields.optional(HeaderField::Subject)?,
            message_class: fields.required(HeaderField::MessageClass)?,
            message_size: fields.required(HeaderField::MessageSize)?,
            expiry: fields.required(HeaderField::Expiry)?,
            content_location: fields.required(HeaderField::ContentLocation)?,
            delivery_report: fields.flag(HeaderField::DeliveryReport)?,
            priority: fields
                .optional::<u8>(HeaderField::Priority)?
                .map(Priority::from),
            distribution_indicator: fields.flag(HeaderField::DistributionIndicator)?,
            content_class: fields.optional(HeaderField::ContentClass)?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::TransactionId, self.transaction_id.clone())?;
        headers.insert_opt(HeaderField::From, self.from.clone())?;
        headers.insert_opt(HeaderField::Subject, self.subject.clone())?;
        headers.insert(HeaderField::MessageClass, self.message_class.clone())?;
        headers.insert(HeaderField::MessageSize, self.message_size)?;
        headers.insert(HeaderField::Expiry, self.expiry)?;
        headers.insert(HeaderField::ContentLocation, self.content_location.clone())?;
        put_flag(headers, HeaderField::DeliveryReport, self.delivery_report)?;
        headers.insert_opt(HeaderField::Priority, self.priority.map(u8::from))?;
        put_flag(
            headers,
            HeaderField::DistributionIndicator,
            self.distribution_indicator,
        )?;
        headers.insert_opt(HeaderField::ContentClass, self.content_class)
    }
}
