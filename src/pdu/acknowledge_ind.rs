// ABOUTME: m-acknowledge-ind, sent after a deferred retrieval completes

use super::{Fields, put_flag};
use crate::codec::CodecError;
use crate::datatypes::{HeaderField, MmsVersion};
use crate::headers::PduHeaders;
use crate::macros::impl_message_type;

/// m-acknowledge-ind
#[derive(Clone, Debug, PartialEq)]
pub struct AcknowledgeInd {
    pub transaction_id: String,
    pub mms_version: MmsVersion,
    pub report_allowed: Option<bool>,
}

impl_message_type!(AcknowledgeInd, AcknowledgeInd);

impl AcknowledgeInd {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        AcknowledgeInd {
            transaction_id: transaction_id.into(),
            mms_version: MmsVersion::default(),
            report_allowed: None,
        }
    }

    pub(crate) fn from_fields(fields: &mut Fields) -> Result<Self, CodecError> {
        Ok(AcknowledgeInd {
            transaction_id: fields.required(HeaderField::TransactionId)?,
            mms_version: fields.version()?,
            report_allowed: fields.flag(HeaderField::ReportAllowed)?,
        })
    }

    pub(crate) fn write_headers(&self, headers: &mut PduHeaders) -> Result<(), CodecError> {
        headers.insert(HeaderField::TransactionId, self.transaction_id.clone())?;
        put_flag(headers, HeaderField::ReportAllowed, self.report_allowed)
    }
}
