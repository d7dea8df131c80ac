// ABOUTME: X-Mms-Message-Type values identifying each MMS encapsulation PDU
// ABOUTME: Drives the parser's variant dispatch and decides which PDUs carry a multipart body

use num_enum::TryFromPrimitive;

/// X-Mms-Message-Type (OMA MMS encapsulation, section 7.3.30)
///
/// The message type is always the first header of a PDU. It selects which
/// headers are mandatory and whether a multipart body follows the
/// Content-Type header.
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// m-send-req: originator to MMSC
    SendReq = 0x80,
    /// m-send-conf: MMSC response to m-send-req
    SendConf = 0x81,
    /// m-notification-ind: MMSC announces a message waiting for retrieval
    NotificationInd = 0x82,
    /// m-notifyresp-ind: recipient acknowledges the notification
    NotifyRespInd = 0x83,
    /// m-retrieve-conf: the retrieved message itself
    RetrieveConf = 0x84,
    /// m-acknowledge-ind: recipient acknowledges a deferred retrieval
    AcknowledgeInd = 0x85,
    /// m-delivery-ind: delivery report to the originator
    DeliveryInd = 0x86,
    /// m-read-rec-ind: read report from the recipient
    ReadRecInd = 0x87,
    /// m-read-orig-ind: read report forwarded to the originator
    ReadOrigInd = 0x88,
}

impl MessageType {
    /// PDUs whose Content-Type header is followed by a multipart body
    pub fn has_body(&self) -> bool {
        matches!(self, MessageType::SendReq | MessageType::RetrieveConf)
    }

    /// The message type name used by the MMS encapsulation specification
    pub fn name(&self) -> &'static str {
        match self {
            MessageType::SendReq => "m-send-req",
            MessageType::SendConf => "m-send-conf",
            MessageType::NotificationInd => "m-notification-ind",
            MessageType::NotifyRespInd => "m-notifyresp-ind",
            MessageType::RetrieveConf => "m-retrieve-conf",
            MessageType::AcknowledgeInd => "m-acknowledge-ind",
            MessageType::DeliveryInd => "m-delivery-ind",
            MessageType::ReadRecInd => "m-read-rec-ind",
            MessageType::ReadOrigInd => "m-read-orig-ind",
        }
    }
}
