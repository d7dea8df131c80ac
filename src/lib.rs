pub mod body;
pub mod codec;
pub mod composer;
pub mod datatypes;
pub mod headers;
pub(crate) mod macros;
pub mod parser;
pub mod pdu;
pub mod resolver;
pub mod smil;


// Re-export codec types for direct access
pub use codec::{CodecError, Decodable, Encodable};

// Re-export the main PDU API for easy access
pub use body::{PartData, PduBody, PduPart, PduPartBuilder};
pub use composer::PduComposer;
pub use headers::{ExtensionHeader, HeaderValue, PduHeaders};
pub use parser::{PduParser, parse};
pub use pdu::{
    AcknowledgeInd, DeliveryInd, NotificationInd, NotifyRespInd, Pdu, ReadOrigInd, ReadRecInd,
    RetrieveConf, SendConf, SendReq, SendReqBuilder,
};
pub use resolver::{FsResolver, PartDataResolver};

/// Error returned by most functions.
///
/// When writing a real application, one might want to consider a specialized
/// error handling crate or defining an error type as an `enum` of causes.
/// However, for our example, using a boxed `std::error::Error` is sufficient.
///
/// The codec itself never boxes: parsing and composing return `CodecError`,
/// which converts into this type with `?`.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// A specialized `Result` type for MMS applications.
///
/// This is defined as a convenience.
///
/// # Examples
///
/// ## Composing and parsing an m-send-req
///
/// ```rust
/// use mms_pdu::datatypes::MmsVersion;
/// use mms_pdu::{Pdu, PduComposer, PduPart, SendReq};
///
/// fn main() -> mms_pdu::Result<()> {
///     let send_req = SendReq::builder()
///         .mms_version(MmsVersion::V1_3)
///         .to("+15551234567")
///         .subject("Greetings")
///         .part(PduPart::text("Hello World"))
///         .build()?;
///
///     // A SMIL presentation part is generated and prepended
///     let bytes = PduComposer::new().make(&send_req)?;
///
///     match mms_pdu::parse(&bytes) {
///         Some(Pdu::SendReq(parsed)) => {
///             assert_eq!(parsed.to[0].text()?, "+15551234567");
///             assert_eq!(parsed.body.len(), 2);
///         }
///         other => panic!("unexpected {other:?}"),
///     }
///     Ok(())
/// }
/// ```
///
/// ## Reading a notification
///
/// ```rust
/// use mms_pdu::{Pdu, PduParser};
///
/// # let bytes: &[u8] = &[];
/// if let Some(Pdu::NotificationInd(notification)) = PduParser::new(bytes).parse() {
///     println!("fetch {}", notification.content_location);
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;
