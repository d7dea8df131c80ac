// ABOUTME: Read reports: m-read-rec-ind from the recipient's client and m-read-orig-ind
// ABOUTME: as relayed by the MMSC to the original sender

use super::{Fields, put_addresses};
use crate::codec::CodecError;
use crate::datatypes::{
    EncodedStringValue, HeaderField, MessageType, MmsVersion, ReadStatus, Sender,
};
use crate::headers::PduHeaders;
use crate::macros::impl_message_type;

/// m-read-rec-ind
#[derive(Clone, Debug, PartialEq)]
pub struct ReadRecInd {
    pub mms_version: MmsVersion,
    pub message_id: String,
    pub to: Vec<EncodedStringValue>,
    pub from: Sender,
    pub date: Option<u64>,
    pub read_status: ReadStatus,
}

impl_message_type!(ReadRecInd, ReadRecInd);

/// m-read-orig-ind
#[derive(Clone, Debug, PartialEq)]
pub struct ReadOrigInd {
    pub mms_version: MmsVersion,
    pub message_id: String,
    pub to: Vec<EncodedStringValue>,
    pub from: Sender,
    pub date: u64,
    pub read_status: ReadStatus,
}

impl_message_type!(ReadOrigInd, ReadOrigInd);

fn recipients(
    fields: &mut Fields,
    message_type: MessageType,
) -> Result<Vec<EncodedStringValue>, CodecError> {
    let to = fields.addresses(HeaderField::To)?;
    if to.is_empty() {
        return Err(CodecError::MissingMandatoryField {
            message_type,
            field: HeaderField::To,
        });
    }
    Ok(to)
}

impl ReadRecInd {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        let mms_version = fields.version()?;
        let message_id = fields.required(HeaderField::MessageId)?;
        let to = recipients(fields, MessageType::ReadRecInd)?;
        Ok(ReadRecInd {
            mms_version,
            message_id,
            to,
            from: fields.required(HeaderField::From)?,
            date: fields.optional(HeaderField::Date)?,
            read_status: fields.required::<u8>(HeaderField::ReadStatus)?.into(),
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::MessageId, self.message_id.clone())?;
        put_addresses(headers, HeaderField::To, &self.to)?;
        headers.insert(HeaderField::From, self.from.clone())?;
        headers.insert_opt(HeaderField::Date, self.date)?;
        headers.insert(HeaderField::ReadStatus, u8::from(self.read_status))
    }
}

impl ReadOrigInd {
    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        let mms_version = fields.version()?;
        let message_id = fields.required(HeaderField::MessageId)?;
        let to = recipients(fields, MessageType::ReadOrigInd)?;
        Ok(ReadOrigInd {
            mms_version,
            message_id,
            to,
            from: fields.required(HeaderField::From)?,
            date: fields.required(HeaderField::Date)?,
            read_status: fields.required::<u8>(HeaderField::ReadStatus)?.into(),
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::MessageId, self.message_id.clone())?;
        put_addresses(headers, HeaderField::To, &self.to)?;
        headers.insert(HeaderField::From, self.from.clone())?;
        headers.insert(HeaderField::Date, self.date)?;
        headers.insert(HeaderField::ReadStatus, u8::from(self.read_status))
    }
}
