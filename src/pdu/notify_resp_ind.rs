// ABOUTME: m-notifyresp-ind, the client's reply to a notification
// ABOUTME: Reports whether the message was retrieved, deferred or rejected

use super::{Fields, put_flag};
use crate::codec::CodecError;
use crate::datatypes::{HeaderField, MmsVersion, Status};
use crate::headers::PduHeaders;
use crate::macros::impl_message_type;

/// m-notifyresp-ind
#[derive(Clone, Debug, PartialEq)]
pub struct NotifyRespInd {
    pub transaction_id: String,
    pub mms_version: MmsVersion,
    pub status: Status,
    pub report_allowed: Option<bool>,
}

impl_message_type!(NotifyRespInd, NotifyRespInd);

impl NotifyRespInd {
    pub fn new(transaction_id: impl Into<String>, status: Status) -> Self {
        NotifyRespInd {
            transaction_id: transaction_id.into(),
            mms_version: MmsVersion::default(),
            status,
            report_allowed: None,
        }
    }

    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        Ok(NotifyRespInd {
            transaction_id: fields.required(HeaderField::TransactionId)?,
            mms_version: fields.version()?,
            status: fields.required::<u8>(HeaderField::Status)?.into(),
            report_allowed: fields.flag(HeaderField::ReportAllowed)?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::TransactionId, self.transaction_id.clone())?;
        headers.insert(HeaderField::Status, u8::from(self.status))?;
        put_flag(headers, HeaderField::ReportAllowed, self.report_allowed)
    }
}
