// ABOUTME: Date values for Expiry, Delivery-Time and Reply-Charging-Deadline
// ABOUTME: Either an absolute time in Unix seconds or a delta in seconds from receipt

use crate::codec::{
    CodecError, Decodable, Encodable, decode_integer_value, decode_long_integer, decode_u8,
    decode_value_end, encode_long_integer, encode_with_value_length, finish_value,
};
use bytes::{BufMut, BytesMut};
use std::io::Cursor;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const ABSOLUTE: u8 = 0x80;
const RELATIVE: u8 = 0x81;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TimeValue {
    /// Seconds since the Unix epoch
    Absolute(u64),
    /// Seconds from the time the PDU is received
    Relative(u64),
}

impl TimeValue {
    pub fn relative(delay: Duration) -> Self {
        TimeValue::Relative(delay.as_secs())
    }

    pub fn absolute(at: SystemTime) -> Self {
        TimeValue::Absolute(at.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs()))
    }

    /// Resolve against the time the PDU was received. `None` when the
    /// result is past what `SystemTime` can hold.
    pub fn resolve(&self, received: SystemTime) -> Option<SystemTime> {
        match self {
            TimeValue::Absolute(secs) => UNIX_EPOCH.checked_add(Duration::from_secs(*secs)),
            TimeValue::Relative(secs) => received.checked_add(Duration::from_secs(*secs)),
        }
    }
}

impl Encodable for TimeValue {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_with_value_length(buf, |value| {
            let (token, secs) = match self {
                TimeValue::Absolute(secs) => (ABSOLUTE, *secs),
                TimeValue::Relative(secs) => (RELATIVE, *secs),
            };
            value.put_u8(token);
            encode_long_integer(value, secs);
            Ok(())
        })
    }
}

impl Decodable for TimeValue {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let end = decode_value_end(buf)?;
        let time = match decode_u8(buf)? {
            ABSOLUTE => TimeValue::Absolute(decode_long_integer(buf)?),
            // Delta-seconds is specified as a long-integer, but short forms
            // show up in the wild
            RELATIVE => TimeValue::Relative(decode_integer_value(buf)?),
            other => {
                return Err(CodecError::invalid(
                    "date-value",
                    format!("unknown token {other:#04x}"),
                ));
            }
        };
        finish_value(buf, end, "date-value")?;
        Ok(time)
    }
}

/// Current time in Unix seconds
pub fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
