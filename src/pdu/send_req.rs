// ABOUTME: m-send-req, the message a client submits to the MMSC, and its validating builder
// ABOUTME: The only PDU with a full outbound construction path

use super::{Fields, put_addresses, put_flag};
use crate::body::{PduBody, PduPart};
use crate::codec::CodecError;
use crate::datatypes::{
    ContentType, EncodedStringValue, HeaderField, MessageClass, MessageType, MmsVersion,
    Priority, Sender, TimeValue, now_unix_secs,
};
use crate::headers::{ExtensionHeader, PduHeaders};
use crate::macros::{impl_message_type, optional_setters};
use std::sync::atomic::{AtomicU32, Ordering};

static TRANSACTION_COUNTER: AtomicU32 = AtomicU32::new(0);

/// m-send-req
#[derive(Clone, Debug, PartialEq)]
pub struct SendReq {
    pub transaction_id: String,
    pub mms_version: MmsVersion,
    pub from: Sender,
    pub to: Vec<EncodedStringValue>,
    pub cc: Vec<EncodedStringValue>,
    pub bcc: Vec<EncodedStringValue>,
    pub subject: Option<EncodedStringValue>,
    /// Unix seconds
    pub date: Option<u64>,
    pub message_class: Option<MessageClass>,
    pub expiry: Option<TimeValue>,
    pub delivery_time: Option<TimeValue>,
    pub priority: Option<Priority>,
    pub delivery_report: Option<bool>,
    pub read_report: Option<bool>,
    /// X-Mms-Sender-Visibility: `true` is Hide (0x80), `false` is Show (0x81)
    pub hide_sender: Option<bool>,
    /// Chosen from the body at compose time when unset
    pub content_type: Option<ContentType>,
    pub body: PduBody,
    pub extensions: Vec<ExtensionHeader>,
}

impl_message_type!(SendReq, SendReq, boxed);

impl SendReq {
    pub fn builder() -> SendReqBuilder {
        SendReqBuilder::new()
    }

    /// Checks the composer relies on
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.transaction_id.is_empty() {
            return Err(CodecError::MissingMandatoryField {
                message_type: MessageType::SendReq,
                field: HeaderField::TransactionId,
            });
        }
        if self.transaction_id.contains('\0') {
            return Err(CodecError::invalid(
                "transaction_id",
                "contains a NUL octet",
            ));
        }
        Ok(())
    }

    pub(crate) fn from_fields(fields: &mut Fields, body: PduBody) -> Result<Self, CodecError> {
        Ok(SendReq {
            transaction_id: fields.required(HeaderField::TransactionId)?,
            mms_version: fields.version()?,
            from: fields.required(HeaderField::From)?,
            to: fields.addresses(HeaderField::To)?,
            cc: fields.addresses(HeaderField::Cc)?,
            bcc: fields.addresses(HeaderField::Bcc)?,
            subject: fields.optional(HeaderField::Subject)?,
            date: fields.optional(HeaderField::Date)?,
            message_class: fields.optional(HeaderField::MessageClass)?,
            expiry: fields.optional(HeaderField::Expiry)?,
            delivery_time: fields.optional(HeaderField::DeliveryTime)?,
            priority: fields
                .optional::<u8>(HeaderField::Priority)?
                .map(Priority::from),
            delivery_report: fields.flag(HeaderField::DeliveryReport)?,
            read_report: fields.flag(HeaderField::ReadReport)?,
            hide_sender: fields.flag(HeaderField::SenderVisibility)?,
            content_type: Some(fields.required(HeaderField::ContentType)?),
            body,
            extensions: fields.extensions()?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::TransactionId, self.transaction_id.clone())?;
        headers.insert(HeaderField::From, self.from.clone())?;
        put_addresses(headers, HeaderField::To, &self.to)?;
        put_addresses(headers, HeaderField::Cc, &self.cc)?;
        put_addresses(headers, HeaderField::Bcc, &self.bcc)?;
        headers.insert_opt(HeaderField::Subject, self.subject.clone())?;
        headers.insert_opt(HeaderField::Date, self.date)?;
        headers.insert_opt(HeaderField::MessageClass, self.message_class.clone())?;
        headers.insert_opt(HeaderField::Expiry, self.expiry)?;
        headers.insert_opt(HeaderField::DeliveryTime, self.delivery_time)?;
        headers.insert_opt(HeaderField::Priority, self.priority.map(u8::from))?;
        put_flag(headers, HeaderField::DeliveryReport, self.delivery_report)?;
        put_flag(headers, HeaderField::ReadReport, self.read_report)?;
        put_flag(headers, HeaderField::SenderVisibility, self.hide_sender)?;
        headers.insert_opt(HeaderField::ContentType, self.content_type.clone())?;
        for extension in &self.extensions {
            headers.push_extension(extension.clone());
        }
        Ok(())
    }
}

/// A transaction id unique within this process: the current time in
/// milliseconds followed by a counter
pub fn generate_transaction_id() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    let counter = TRANSACTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("T{millis:x}{counter:04x}")
}

/// Builder for creating SendReq PDUs with validation and sensible defaults
#[derive(Clone, Debug, Default)]
pub struct SendReqBuilder {
    transaction_id: Option<String>,
    mms_version: Option<MmsVersion>,
    from: Option<Sender>,
    to: Vec<EncodedStringValue>,
    cc: Vec<EncodedStringValue>,
    bcc: Vec<EncodedStringValue>,
    subject: Option<EncodedStringValue>,
    date: Option<u64>,
    message_class: Option<MessageClass>,
    expiry: Option<TimeValue>,
    delivery_time: Option<TimeValue>,
    priority: Option<Priority>,
    delivery_report: Option<bool>,
    read_report: Option<bool>,
    hide_sender: Option<bool>,
    content_type: Option<ContentType>,
    body: PduBody,
    extensions: Vec<ExtensionHeader>,
}

impl SendReqBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    optional_setters! {
        transaction_id: String,
        mms_version: MmsVersion,
        subject: EncodedStringValue,
        message_class: MessageClass,
        expiry: TimeValue,
        delivery_time: TimeValue,
        priority: Priority,
        delivery_report: bool,
        read_report: bool,
        hide_sender: bool,
        content_type: ContentType,
    }

    /// Date in Unix seconds (default: now)
    pub fn date(mut self, date: u64) -> Self {
        self.date = Some(date);
        self
    }

    pub fn from(mut self, address: impl Into<EncodedStringValue>) -> Self {
        self.from = Some(Sender::Address(address.into()));
        self
    }

    /// Leave the From address for the MMSC to fill in (the default)
    pub fn insert_address(mut self) -> Self {
        self.from = Some(Sender::InsertAddress);
        self
    }

    pub fn to(mut self, address: impl Into<EncodedStringValue>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn cc(mut self, address: impl Into<EncodedStringValue>) -> Self {
        self.cc.push(address.into());
        self
    }

    pub fn bcc(mut self, address: impl Into<EncodedStringValue>) -> Self {
        self.bcc.push(address.into());
        self
    }

    pub fn part(mut self, part: PduPart) -> Self {
        self.body.add_part(part);
        self
    }

    pub fn body(mut self, body: PduBody) -> Self {
        self.body = body;
        self
    }

    pub fn extension(mut self, header: ExtensionHeader) -> Self {
        self.extensions.push(header);
        self
    }

    /// Build the SendReq. The MMS version must be set; the transaction id
    /// and date default to a generated id and the current time.
    pub fn build(self) -> Result<SendReq, CodecError> {
        let mms_version = self.mms_version.ok_or(CodecError::MissingMandatoryField {
            message_type: MessageType::SendReq,
            field: HeaderField::MmsVersion,
        })?;

        let send_req = SendReq {
            transaction_id: self.transaction_id.unwrap_or_else(generate_transaction_id),
            mms_version,
            from: self.from.unwrap_or(Sender::InsertAddress),
            to: self.to,
            cc: self.cc,
            bcc: self.bcc,
            subject: self.subject,
            date: Some(self.date.unwrap_or_else(now_unix_secs)),
            message_class: self.message_class,
            expiry: self.expiry,
            delivery_time: self.delivery_time,
            priority: self.priority,
            delivery_report: self.delivery_report,
            read_report: self.read_report,
            hide_sender: self.hide_sender,
            content_type: self.content_type,
            body: self.body,
            extensions: self.extensions,
        };
        send_req.validate()?;
        Ok(send_req)
    }
}
