// ABOUTME: Enumerated single-octet header values: response, retrieve, delivery and read status, priority
// ABOUTME: Unknown codes are preserved in an Other variant so newer MMSC values still parse

use num_enum::{FromPrimitive, IntoPrimitive};

/// Wire value of the Yes token in boolean headers
pub const YES: u8 = 0x80;
/// Wire value of the No token in boolean headers
pub const NO: u8 = 0x81;

/// Encode a boolean header value
pub fn yes_no(value: bool) -> u8 {
    if value { YES } else { NO }
}

/// Decode a boolean header value; anything but Yes/No is `None`
pub fn from_yes_no(octet: u8) -> Option<bool> {
    match octet {
        YES => Some(true),
        NO => Some(false),
        _ => None,
    }
}

/// X-Mms-Response-Status, carried by m-send-conf
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResponseStatus {
    Ok = 0x80,
    ErrorUnspecified = 0x81,
    ErrorServiceDenied = 0x82,
    ErrorMessageFormatCorrupt = 0x83,
    ErrorSendingAddressUnresolved = 0x84,
    ErrorMessageNotFound = 0x85,
    ErrorNetworkProblem = 0x86,
    ErrorContentNotAccepted = 0x87,
    ErrorUnsupportedMessage = 0x88,
    TransientFailure = 0xC0,
    TransientSendingAddressUnresolved = 0xC1,
    TransientMessageNotFound = 0xC2,
    TransientNetworkProblem = 0xC3,
    TransientPartialSuccess = 0xC4,
    PermanentFailure = 0xE0,
    PermanentServiceDenied = 0xE1,
    PermanentMessageFormatCorrupt = 0xE2,
    PermanentSendingAddressUnresolved = 0xE3,
    PermanentMessageNotFound = 0xE4,
    PermanentContentNotAccepted = 0xE5,
    PermanentReplyChargingLimitationsNotMet = 0xE6,
    PermanentReplyChargingRequestNotAccepted = 0xE7,
    PermanentReplyChargingForwardingDenied = 0xE8,
    PermanentReplyChargingNotSupported = 0xE9,
    PermanentAddressHidingNotSupported = 0xEA,
    PermanentLackOfPrepaid = 0xEB,
    #[num_enum(catch_all)]
    Other(u8),
}

impl ResponseStatus {
    pub fn is_ok(&self) -> bool {
        *self == ResponseStatus::Ok
    }

    /// Worth retrying later. The MMS 1.0 network-problem code and the whole
    /// 0xC0..=0xDF range are transient.
    pub fn is_transient(&self) -> bool {
        let code = u8::from(*self);
        code == 0x86 || (0xC0..=0xDF).contains(&code)
    }
}

/// X-Mms-Retrieve-Status, carried by m-retrieve-conf
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RetrieveStatus {
    Ok = 0x80,
    TransientFailure = 0xC0,
    TransientMessageNotFound = 0xC1,
    TransientNetworkProblem = 0xC2,
    PermanentFailure = 0xE0,
    PermanentServiceDenied = 0xE1,
    PermanentMessageNotFound = 0xE2,
    PermanentContentUnsupported = 0xE3,
    #[num_enum(catch_all)]
    Other(u8),
}

impl RetrieveStatus {
    pub fn is_ok(&self) -> bool {
        *self == RetrieveStatus::Ok
    }
}

/// X-Mms-Status, the fate of a message as reported by the MMSC
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Expired = 0x80,
    Retrieved = 0x81,
    Rejected = 0x82,
    Deferred = 0x83,
    Unrecognised = 0x84,
    Indeterminate = 0x85,
    Forwarded = 0x86,
    Unreachable = 0x87,
    #[num_enum(catch_all)]
    Other(u8),
}

/// X-Mms-Read-Status
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ReadStatus {
    Read = 0x80,
    DeletedWithoutBeingRead = 0x81,
    #[num_enum(catch_all)]
    Other(u8),
}

/// X-Mms-Priority
#[derive(FromPrimitive, IntoPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Priority {
    Low = 0x80,
    Normal = 0x81,
    High = 0x82,
    #[num_enum(catch_all)]
    Other(u8),
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}
