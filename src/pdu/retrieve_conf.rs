// ABOUTME: m-retrieve-conf, the retrieved message with its multipart body
// ABOUTME: Also the shape of a message read back from storage, so the transaction id is optional

use super::{Fields, put_addresses, put_flag};
use crate::body::PduBody;
use crate::codec::CodecError;
use crate::datatypes::{
    ContentType, EncodedStringValue, HeaderField, MessageClass, MmsVersion, Priority,
    RetrieveStatus, Sender,
};
use crate::headers::{ExtensionHeader, PduHeaders};
use crate::macros::impl_message_type;

/// m-retrieve-conf
#[derive(Clone, Debug, PartialEq)]
pub struct RetrieveConf {
    pub mms_version: MmsVersion,
    pub transaction_id: Option<String>,
    pub message_id: Option<String>,
    /// Unix seconds
    pub date: u64,
    pub from: Option<Sender>,
    pub to: Vec<EncodedStringValue>,
    pub cc: Vec<EncodedStringValue>,
    pub subject: Option<EncodedStringValue>,
    pub message_class: Option<MessageClass>,
    pub priority: Option<Priority>,
    pub delivery_report: Option<bool>,
    pub read_report: Option<bool>,
    pub retrieve_status: Option<RetrieveStatus>,
    pub retrieve_text: Option<EncodedStringValue>,
    pub content_type: ContentType,
    pub body: PduBody,
    pub extensions: Vec<ExtensionHeader>,
}

impl_message_type!(RetrieveConf, RetrieveConf, boxed);

impl RetrieveConf {
    pub(crate) fn from_fields(fields: &mut Fields, body: PduBody) -> Result<Self, CodecError> {
        Ok(RetrieveConf {
            mms_version: fields.version()?,
            transaction_id: fields.optional(HeaderField::TransactionId)?,
            message_id: fields.optional(HeaderField::MessageId)?,
            date: fields.required(HeaderField::Date)?,
            from: fields.optional(HeaderField::From)?,
            to: fields.addresses(HeaderField::To)?,
            cc: fields.addresses(HeaderField::Cc)?,
            subject: fields.optional(HeaderField::Subject)?,
            message_class: fields.optional(HeaderField::MessageClass)?,
            priority: fields
                .optional::<u8>(HeaderField::Priority)?
                .map(Priority::from),
            delivery_report: fields.flag(HeaderField::DeliveryReport)?,
            read_report: fields.flag(HeaderField::ReadReport)?,
            retrieve_status: fields
                .optional::<u8>(HeaderField::RetrieveStatus)?
                .map(RetrieveStatus::from),
            retrieve_text: fields.optional(HeaderField::RetrieveText)?,
            content_type: fields.required(HeaderField::ContentType)?,
            body,
            extensions: fields.extensions()?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert_opt(HeaderField::TransactionId, self.transaction_id.clone())?;
        headers.insert_opt(HeaderField::MessageId, self.message_id.clone())?;
        headers.insert(HeaderField::Date, self.date)?;
        headers.insert_opt(HeaderField::From, self.from.clone())?;
        put_addresses(headers, HeaderField::To, &self.to)?;
        put_addresses(headers, HeaderField::Cc, &self.cc)?;
        headers.insert_opt(HeaderField::Subject, self.subject.clone())?;
        headers.insert_opt(HeaderField::MessageClass, self.message_class.clone())?;
        headers.insert_opt(HeaderField::Priority, self.priority.map(u8::from))?;
        put_flag(headers, HeaderField::DeliveryReport, self.delivery_report)?;
        put_flag(headers, HeaderField::ReadReport, self.read_report)?;
        headers.insert_opt(
            HeaderField::RetrieveStatus,
            self.retrieve_status.map(u8::from),
        )?;
        headers.insert_opt(HeaderField::RetrieveText, self.retrieve_text.clone())?;
        headers.insert(HeaderField::ContentType, self.content_type.clone())?;
        for extension in &self.extensions {
            headers.push_extension(extension.clone());
        }
        Ok(())
    }
}
