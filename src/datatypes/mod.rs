pub mod address;
mod charset;
pub mod content_type;
mod disposition;
mod encoded_string;
mod header_field;
mod message_class;
mod message_type;
mod mms_version;
pub mod status;
mod time;
mod uintvar;

pub use address::{AddressType, Sender};
pub use charset::Charset;
pub use content_type::ContentType;
pub use disposition::{Disposition, DispositionKind};
pub use encoded_string::EncodedStringValue;
pub use header_field::{HeaderField, HeaderKind};
pub use message_class::MessageClass;
pub use message_type::MessageType;
pub use mms_version::MmsVersion;
pub use status::{Priority, ReadStatus, ResponseStatus, RetrieveStatus, Status};
pub use time::{TimeValue, now_unix_secs};
pub use uintvar::{MAX_UINTVAR_OCTETS, Uintvar, decode_uintvar, encode_uintvar};
