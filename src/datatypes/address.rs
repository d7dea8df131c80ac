// ABOUTME: MMS address handling: /TYPE= suffixes on recipients and the From header value
// ABOUTME: Outgoing addresses are classified and suffixed, incoming ones have the suffix stripped

use crate::codec::{
    CodecError, Decodable, Encodable, decode_u8, decode_value_end, encode_with_value_length,
    finish_value,
};
use crate::datatypes::EncodedStringValue;
use bytes::{BufMut, Bytes, BytesMut};
use std::io::Cursor;
use std::net::{Ipv4Addr, Ipv6Addr};

const TYPE_MARKER: &[u8] = b"/TYPE=";

const ADDRESS_PRESENT: u8 = 0x80;
const INSERT_ADDRESS: u8 = 0x81;

/// Address kinds from the MMS addressing model
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AddressType {
    /// Phone number (`/TYPE=PLMN`)
    Plmn,
    Ipv4,
    Ipv6,
    /// RFC 822 mailbox, sent without a suffix
    Email,
    /// Anything else; sent as given
    Unknown,
}

impl AddressType {
    /// Classify a bare address
    pub fn classify(address: &str) -> AddressType {
        if address.contains('@') {
            return AddressType::Email;
        }
        if address.parse::<Ipv4Addr>().is_ok() {
            return AddressType::Ipv4;
        }
        if address.parse::<Ipv6Addr>().is_ok() {
            return AddressType::Ipv6;
        }
        if is_phone_number(address) {
            return AddressType::Plmn;
        }
        AddressType::Unknown
    }

    fn suffix(&self) -> Option<&'static str> {
        match self {
            AddressType::Plmn => Some("/TYPE=PLMN"),
            AddressType::Ipv4 => Some("/TYPE=IPV4"),
            AddressType::Ipv6 => Some("/TYPE=IPV6"),
            AddressType::Email | AddressType::Unknown => None,
        }
    }
}

fn is_phone_number(address: &str) -> bool {
    let digits = address.strip_prefix('+').unwrap_or(address);
    digits.chars().any(|c| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

/// Append the `/TYPE=` suffix for `address`'s kind. Addresses that already
/// carry a suffix are returned unchanged.
pub fn with_type_suffix(address: &str) -> String {
    if address.contains("/TYPE=") {
        return address.to_owned();
    }
    match AddressType::classify(address).suffix() {
        Some(suffix) => format!("{address}{suffix}"),
        None => address.to_owned(),
    }
}

/// Suffix an encoded address. Only ASCII-compatible charsets are touched,
/// since the suffix is appended as raw ASCII octets.
pub fn add_type_suffix(address: &EncodedStringValue) -> EncodedStringValue {
    if !address.charset().is_ascii_compatible() {
        return address.clone();
    }
    match address.text() {
        Ok(text) => {
            let suffixed = with_type_suffix(&text);
            if suffixed == text {
                address.clone()
            } else {
                let mut bytes = address.as_bytes().to_vec();
                bytes.extend_from_slice(&suffixed.as_bytes()[text.len()..]);
                EncodedStringValue::from_raw(address.charset(), bytes)
            }
        }
        Err(_) => address.clone(),
    }
}

/// Remove a trailing `/TYPE=...` suffix from a received address
pub fn strip_type_suffix(address: &EncodedStringValue) -> EncodedStringValue {
    if !address.charset().is_ascii_compatible() {
        return address.clone();
    }
    let bytes = address.as_bytes();
    match bytes
        .windows(TYPE_MARKER.len())
        .rposition(|window| window.eq_ignore_ascii_case(TYPE_MARKER))
    {
        Some(pos) => {
            EncodedStringValue::from_raw(address.charset(), Bytes::copy_from_slice(&bytes[..pos]))
        }
        None => address.clone(),
    }
}

/// Value of the From header
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sender {
    Address(EncodedStringValue),
    /// Ask the MMSC to fill in the sender's address
    InsertAddress,
}

impl Sender {
    pub fn address(&self) -> Option<&EncodedStringValue> {
        match self {
            Sender::Address(address) => Some(address),
            Sender::InsertAddress => None,
        }
    }
}

impl From<&str> for Sender {
    fn from(address: &str) -> Self {
        Sender::Address(EncodedStringValue::from(address))
    }
}

impl Encodable for Sender {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        encode_with_value_length(buf, |value| match self {
            Sender::Address(address) => {
                value.put_u8(ADDRESS_PRESENT);
                address.encode(value)
            }
            Sender::InsertAddress => {
                value.put_u8(INSERT_ADDRESS);
                Ok(())
            }
        })
    }
}

impl Decodable for Sender {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        let end = decode_value_end(buf)?;
        let sender = match decode_u8(buf)? {
            ADDRESS_PRESENT => Sender::Address(strip_type_suffix(&EncodedStringValue::decode(buf)?)),
            INSERT_ADDRESS => Sender::InsertAddress,
            other => {
                return Err(CodecError::invalid(
                    "from",
                    format!("unknown address token {other:#04x}"),
                ));
            }
        };
        finish_value(buf, end, "from")?;
        Ok(sender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::Charset;

    #[test]
    fn classification() {
        assert_eq!(AddressType::classify("+15551234567"), AddressType::Plmn);
        assert_eq!(AddressType::classify("555-1234"), AddressType::Plmn);
        assert_eq!(AddressType::classify("bob@example.com"), AddressType::Email);
        assert_eq!(AddressType::classify("10.0.0.1"), AddressType::Ipv4);
        assert_eq!(AddressType::classify("::1"), AddressType::Ipv6);
        assert_eq!(AddressType::classify("shortcode"), AddressType::Unknown);
    }

    #[test]
    fn suffixes() {
        assert_eq!(with_type_suffix("+15551234567"), "+15551234567/TYPE=PLMN");
        assert_eq!(with_type_suffix("fe80::1"), "fe80::1/TYPE=IPV6");
        assert_eq!(with_type_suffix("bob@example.com"), "bob@example.com");
        assert_eq!(
            with_type_suffix("+15551234567/TYPE=PLMN"),
            "+15551234567/TYPE=PLMN"
        );
    }

    #[test]
    fn strip_and_add_are_inverse() {
        let address = EncodedStringValue::from("+15551234567");
        let suffixed = add_type_suffix(&address);
        assert_eq!(suffixed.as_bytes(), b"+15551234567/TYPE=PLMN");
        assert_eq!(strip_type_suffix(&suffixed), address);
    }

    #[test]
    fn wide_charsets_are_left_alone() {
        let address = EncodedStringValue::new(Charset::Utf16, "+1555").unwrap();
        assert_eq!(add_type_suffix(&address), address);
    }

    #[test]
    fn sender_roundtrip() {
        let sender = Sender::from("+15550000000");
        let bytes = sender.to_bytes().unwrap();
        assert_eq!(bytes[0] as usize, bytes.len() - 1);
        assert_eq!(bytes[1], ADDRESS_PRESENT);
        let mut cursor = Cursor::new(bytes.as_ref());
        assert_eq!(Sender::decode(&mut cursor).unwrap(), sender);
    }

    #[test]
    fn insert_address_token() {
        let bytes = Sender::InsertAddress.to_bytes().unwrap();
        assert_eq!(bytes.as_ref(), &[0x01, INSERT_ADDRESS]);
        let mut cursor = Cursor::new(bytes.as_ref());
        assert_eq!(Sender::decode(&mut cursor).unwrap(), Sender::InsertAddress);
    }

    #[test]
    fn received_sender_is_stripped() {
        let mut data = vec![0x00, ADDRESS_PRESENT];
        data.extend_from_slice(b"+15550000000/TYPE=PLMN\0");
        data[0] = (data.len() - 1) as u8;
        let mut cursor = Cursor::new(data.as_slice());
        let sender = Sender::decode(&mut cursor).unwrap();
        assert_eq!(sender.address().unwrap().text().unwrap(), "+15550000000");
    }
}
