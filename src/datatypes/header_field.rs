// ABOUTME: Binary header field codes of the MMS encapsulation and the wire kind of each value
// ABOUTME: Unknown codes are not representable here; the parser skips them as opaque values

use num_enum::TryFromPrimitive;

/// Header field codes (OMA MMS encapsulation, table 12)
#[derive(TryFromPrimitive)]
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderField {
    Bcc = 0x81,
    Cc = 0x82,
    ContentLocation = 0x83,
    ContentType = 0x84,
    Date = 0x85,
    DeliveryReport = 0x86,
    DeliveryTime = 0x87,
    Expiry = 0x88,
    From = 0x89,
    MessageClass = 0x8A,
    MessageId = 0x8B,
    MessageType = 0x8C,
    MmsVersion = 0x8D,
    MessageSize = 0x8E,
    Priority = 0x8F,
    ReadReport = 0x90,
    ReportAllowed = 0x91,
    ResponseStatus = 0x92,
    ResponseText = 0x93,
    SenderVisibility = 0x94,
    Status = 0x95,
    Subject = 0x96,
    To = 0x97,
    TransactionId = 0x98,
    RetrieveStatus = 0x99,
    RetrieveText = 0x9A,
    ReadStatus = 0x9B,
    ReplyCharging = 0x9C,
    ReplyChargingDeadline = 0x9D,
    ReplyChargingId = 0x9E,
    ReplyChargingSize = 0x9F,
    PreviouslySentBy = 0xA0,
    PreviouslySentDate = 0xA1,
    Store = 0xA2,
    MmState = 0xA3,
    MmFlags = 0xA4,
    StoreStatus = 0xA5,
    StoreStatusText = 0xA6,
    Stored = 0xA7,
    Attributes = 0xA8,
    Totals = 0xA9,
    MboxTotals = 0xAA,
    Quotas = 0xAB,
    MboxQuotas = 0xAC,
    MessageCount = 0xAD,
    Content = 0xAE,
    Start = 0xAF,
    AdditionalHeaders = 0xB0,
    DistributionIndicator = 0xB1,
    ElementDescriptor = 0xB2,
    Limit = 0xB3,
    RecommendedRetrievalMode = 0xB4,
    RecommendedRetrievalModeText = 0xB5,
    StatusText = 0xB6,
    ApplicId = 0xB7,
    ReplyApplicId = 0xB8,
    AuxApplicId = 0xB9,
    ContentClass = 0xBA,
    DrmContent = 0xBB,
    AdaptationAllowed = 0xBC,
    ReplaceId = 0xBD,
    CancelId = 0xBE,
    CancelStatus = 0xBF,
}

/// How a header's value is laid out on the wire
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeaderKind {
    /// Single octet (short-integer or token)
    Octet,
    /// Long-integer
    LongInteger,
    /// NUL-terminated text-string
    TextString,
    /// Encoded-string-value (optionally charset tagged)
    EncodedString,
    /// Encoded-string-value repeated once per recipient
    AddressList,
    /// Value-length, address-present or insert-address token
    Sender,
    /// Value-length, absolute or relative token, long-integer
    Time,
    /// Well-known class octet or token text
    MessageClass,
    /// Content-type-value with parameters
    ContentType,
    /// Not interpreted; carried through as a raw self-describing value
    Opaque,
}

impl HeaderKind {
    pub fn name(&self) -> &'static str {
        match self {
            HeaderKind::Octet => "octet",
            HeaderKind::LongInteger => "long-integer",
            HeaderKind::TextString => "text-string",
            HeaderKind::EncodedString => "encoded-string-value",
            HeaderKind::AddressList => "address list",
            HeaderKind::Sender => "from-value",
            HeaderKind::Time => "date-value",
            HeaderKind::MessageClass => "message-class-value",
            HeaderKind::ContentType => "content-type-value",
            HeaderKind::Opaque => "opaque value",
        }
    }
}

impl HeaderField {
    /// The declared wire type of this field's value
    pub fn kind(&self) -> HeaderKind {
        use HeaderField::*;
        match self {
            MessageType | MmsVersion | DeliveryReport | ReadReport | ReportAllowed
            | SenderVisibility | Priority | Status | ResponseStatus | RetrieveStatus
            | ReadStatus | ReplyCharging | Store | MmState | StoreStatus | Stored
            | DistributionIndicator | RecommendedRetrievalMode | ContentClass | DrmContent
            | AdaptationAllowed | CancelStatus => HeaderKind::Octet,

            Date | MessageSize | ReplyChargingSize => HeaderKind::LongInteger,

            TransactionId | MessageId | ContentLocation | ReplyChargingId | ApplicId
            | ReplyApplicId | AuxApplicId | ReplaceId | CancelId => HeaderKind::TextString,

            Subject | ResponseText | RetrieveText | StatusText | StoreStatusText
            | RecommendedRetrievalModeText => HeaderKind::EncodedString,

            To | Cc | Bcc => HeaderKind::AddressList,
            From => HeaderKind::Sender,
            Expiry | DeliveryTime | ReplyChargingDeadline => HeaderKind::Time,
            MessageClass => HeaderKind::MessageClass,
            ContentType => HeaderKind::ContentType,

            PreviouslySentBy | PreviouslySentDate | MmFlags | Attributes | Totals
            | MboxTotals | Quotas | MboxQuotas | MessageCount | Content | Start
            | AdditionalHeaders | ElementDescriptor | Limit => HeaderKind::Opaque,
        }
    }

    /// Header name as written in the MMS encapsulation specification
    pub fn name(&self) -> &'static str {
        use HeaderField::*;
        match self {
            Bcc => "Bcc",
            Cc => "Cc",
            ContentLocation => "X-Mms-Content-Location",
            ContentType => "Content-Type",
            Date => "Date",
            DeliveryReport => "X-Mms-Delivery-Report",
            DeliveryTime => "X-Mms-Delivery-Time",
            Expiry => "X-Mms-Expiry",
            From => "From",
            MessageClass => "X-Mms-Message-Class",
            MessageId => "Message-ID",
            MessageType => "X-Mms-Message-Type",
            MmsVersion => "X-Mms-MMS-Version",
            MessageSize => "X-Mms-Message-Size",
            Priority => "X-Mms-Priority",
            ReadReport => "X-Mms-Read-Report",
            ReportAllowed => "X-Mms-Report-Allowed",
            ResponseStatus => "X-Mms-Response-Status",
            ResponseText => "X-Mms-Response-Text",
            SenderVisibility => "X-Mms-Sender-Visibility",
            Status => "X-Mms-Status",
            Subject => "Subject",
            To => "To",
            TransactionId => "X-Mms-Transaction-Id",
            RetrieveStatus => "X-Mms-Retrieve-Status",
            RetrieveText => "X-Mms-Retrieve-Text",
            ReadStatus => "X-Mms-Read-Status",
            ReplyCharging => "X-Mms-Reply-Charging",
            ReplyChargingDeadline => "X-Mms-Reply-Charging-Deadline",
            ReplyChargingId => "X-Mms-Reply-Charging-ID",
            ReplyChargingSize => "X-Mms-Reply-Charging-Size",
            PreviouslySentBy => "X-Mms-Previously-Sent-By",
            PreviouslySentDate => "X-Mms-Previously-Sent-Date",
            Store => "X-Mms-Store",
            MmState => "X-Mms-MM-State",
            MmFlags => "X-Mms-MM-Flags",
            StoreStatus => "X-Mms-Store-Status",
            StoreStatusText => "X-Mms-Store-Status-Text",
            Stored => "X-Mms-Stored",
            Attributes => "X-Mms-Attributes",
            Totals => "X-Mms-Totals",
            MboxTotals => "X-Mms-Mbox-Totals",
            Quotas => "X-Mms-Quotas",
            MboxQuotas => "X-Mms-Mbox-Quotas",
            MessageCount => "X-Mms-Message-Count",
            Content => "Content",
            Start => "X-Mms-Start",
            AdditionalHeaders => "Additional-headers",
            DistributionIndicator => "X-Mms-Distribution-Indicator",
            ElementDescriptor => "X-Mms-Element-Descriptor",
            Limit => "X-Mms-Limit",
            RecommendedRetrievalMode => "X-Mms-Recommended-Retrieval-Mode",
            RecommendedRetrievalModeText => "X-Mms-Recommended-Retrieval-Mode-Text",
            StatusText => "X-Mms-Status-Text",
            ApplicId => "X-Mms-Applic-ID",
            ReplyApplicId => "X-Mms-Reply-Applic-ID",
            AuxApplicId => "X-Mms-Aux-Applic-Info",
            ContentClass => "X-Mms-Content-Class",
            DrmContent => "X-Mms-DRM-Content",
            AdaptationAllowed => "X-Mms-Adaptation-Allowed",
            ReplaceId => "X-Mms-Replace-ID",
            CancelId => "X-Mms-Cancel-ID",
            CancelStatus => "X-Mms-Cancel-Status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_the_wire() {
        assert_eq!(HeaderField::MessageType as u8, 0x8C);
        assert_eq!(HeaderField::TransactionId as u8, 0x98);
        assert_eq!(HeaderField::MmsVersion as u8, 0x8D);
        assert_eq!(HeaderField::From as u8, 0x89);
        assert_eq!(HeaderField::To as u8, 0x97);
        assert_eq!(HeaderField::Subject as u8, 0x96);
        assert_eq!(HeaderField::Date as u8, 0x85);
        assert_eq!(HeaderField::ContentType as u8, 0x84);
        assert_eq!(HeaderField::MessageClass as u8, 0x8A);
        assert_eq!(HeaderField::MessageSize as u8, 0x8E);
        assert_eq!(HeaderField::MessageId as u8, 0x8B);
        assert_eq!(HeaderField::ResponseStatus as u8, 0x92);
        assert_eq!(HeaderField::Status as u8, 0x95);
        assert_eq!(HeaderField::Expiry as u8, 0x88);
    }

    #[test]
    fn kinds() {
        assert_eq!(HeaderField::Date.kind(), HeaderKind::LongInteger);
        assert_eq!(HeaderField::Subject.kind(), HeaderKind::EncodedString);
        assert_eq!(HeaderField::Cc.kind(), HeaderKind::AddressList);
        assert_eq!(HeaderField::Expiry.kind(), HeaderKind::Time);
        assert_eq!(HeaderField::Totals.kind(), HeaderKind::Opaque);
    }

    #[test]
    fn codes_outside_the_table_are_rejected() {
        assert!(HeaderField::try_from(0x80u8).is_err());
        assert!(HeaderField::try_from(0xC0u8).is_err());
    }
}
