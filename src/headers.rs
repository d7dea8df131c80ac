// ABOUTME: PDU header storage: typed values keyed by header field, plus pass-through extension headers
// ABOUTME: Every read and write is checked against the wire kind the field is declared with

use crate::codec::{
    CodecError, Decodable, Encodable, decode_long_integer, decode_text_string, decode_u8,
    encode_long_integer, encode_text_string, take_value,
};
use crate::datatypes::address::strip_type_suffix;
use crate::datatypes::content_type::text;
use crate::datatypes::{
    ContentType, EncodedStringValue, HeaderField, HeaderKind, MessageClass, Sender, TimeValue,
};
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::Cursor;

/// A decoded header value, one variant per wire kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderValue {
    Octet(u8),
    LongInteger(u64),
    TextString(String),
    EncodedString(EncodedStringValue),
    AddressList(Vec<EncodedStringValue>),
    Sender(Sender),
    Time(TimeValue),
    MessageClass(MessageClass),
    ContentType(ContentType),
    /// Raw value octets of a field this crate does not interpret
    Opaque(Bytes),
}

impl HeaderValue {
    pub fn kind(&self) -> HeaderKind {
        match self {
            HeaderValue::Octet(_) => HeaderKind::Octet,
            HeaderValue::LongInteger(_) => HeaderKind::LongInteger,
            HeaderValue::TextString(_) => HeaderKind::TextString,
            HeaderValue::EncodedString(_) => HeaderKind::EncodedString,
            HeaderValue::AddressList(_) => HeaderKind::AddressList,
            HeaderValue::Sender(_) => HeaderKind::Sender,
            HeaderValue::Time(_) => HeaderKind::Time,
            HeaderValue::MessageClass(_) => HeaderKind::MessageClass,
            HeaderValue::ContentType(_) => HeaderKind::ContentType,
            HeaderValue::Opaque(_) => HeaderKind::Opaque,
        }
    }

    /// Decode the value of `field` according to its declared kind
    pub fn decode(field: HeaderField, buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        Ok(match field.kind() {
            HeaderKind::Octet => HeaderValue::Octet(decode_u8(buf)?),
            HeaderKind::LongInteger => HeaderValue::LongInteger(decode_long_integer(buf)?),
            HeaderKind::TextString => {
                HeaderValue::TextString(text(decode_text_string(buf)?, field.name()))
            }
            HeaderKind::EncodedString => {
                HeaderValue::EncodedString(EncodedStringValue::decode(buf)?)
            }
            HeaderKind::AddressList => HeaderValue::AddressList(vec![strip_type_suffix(
                &EncodedStringValue::decode(buf)?,
            )]),
            HeaderKind::Sender => HeaderValue::Sender(Sender::decode(buf)?),
            HeaderKind::Time => HeaderValue::Time(TimeValue::decode(buf)?),
            HeaderKind::MessageClass => HeaderValue::MessageClass(MessageClass::decode(buf)?),
            HeaderKind::ContentType => HeaderValue::ContentType(ContentType::decode(buf)?),
            HeaderKind::Opaque => HeaderValue::Opaque(take_value(buf)?),
        })
    }

    /// Encode `field` with this value. Address lists repeat the field code
    /// once per address.
    pub fn encode_field(&self, field: HeaderField, buf: &mut BytesMut) -> Result<(), CodecError> {
        if let HeaderValue::AddressList(addresses) = self {
            for address in addresses {
                buf.put_u8(field as u8);
                address.encode(buf)?;
            }
            return Ok(());
        }
        buf.put_u8(field as u8);
        match self {
            HeaderValue::Octet(octet) => buf.put_u8(*octet),
            HeaderValue::LongInteger(value) => encode_long_integer(buf, *value),
            HeaderValue::TextString(value) => encode_text_string(buf, value.as_bytes()),
            HeaderValue::EncodedString(value) => value.encode(buf)?,
            HeaderValue::Sender(sender) => sender.encode(buf)?,
            HeaderValue::Time(time) => time.encode(buf)?,
            HeaderValue::MessageClass(class) => class.encode(buf)?,
            HeaderValue::ContentType(content_type) => content_type.encode(buf)?,
            HeaderValue::Opaque(raw) => buf.put_slice(raw),
            HeaderValue::AddressList(_) => {}
        }
        Ok(())
    }
}

/// Rust types that map onto one header value kind
pub trait HeaderValueType: Sized {
    const KIND: HeaderKind;

    fn from_header_value(value: HeaderValue) -> Option<Self>;

    fn into_header_value(self) -> HeaderValue;
}

macro_rules! header_value_type {
    ($type:ty, $kind:ident, $variant:ident) => {
        impl HeaderValueType for $type {
            const KIND: HeaderKind = HeaderKind::$kind;

            fn from_header_value(value: HeaderValue) -> Option<Self> {
                match value {
                    HeaderValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn into_header_value(self) -> HeaderValue {
                HeaderValue::$variant(self)
            }
        }
    };
}

header_value_type!(u8, Octet, Octet);
header_value_type!(u64, LongInteger, LongInteger);
header_value_type!(String, TextString, TextString);
header_value_type!(EncodedStringValue, EncodedString, EncodedString);
header_value_type!(Vec<EncodedStringValue>, AddressList, AddressList);
header_value_type!(Sender, Sender, Sender);
header_value_type!(TimeValue, Time, Time);
header_value_type!(MessageClass, MessageClass, MessageClass);
header_value_type!(ContentType, ContentType, ContentType);
header_value_type!(Bytes, Opaque, Opaque);

/// A header the PDU types do not model, carried through untouched
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtensionHeader {
    /// Binary field code and its raw value octets: a code with no entry in the
    /// table, or a known field the message type has no member for
    Binary { code: u8, value: Bytes },
    /// Application-header: token name with a text value
    Application { name: String, value: Bytes },
}

impl ExtensionHeader {
    pub fn application(name: impl Into<String>, value: impl Into<String>) -> Self {
        ExtensionHeader::Application {
            name: name.into(),
            value: Bytes::from(value.into()),
        }
    }

    pub fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        match self {
            ExtensionHeader::Binary { code, value } => {
                buf.put_u8(*code);
                buf.put_slice(value);
            }
            ExtensionHeader::Application { name, value } => {
                if name.is_empty() || name.bytes().any(|b| !(0x20..0x7F).contains(&b)) {
                    return Err(CodecError::invalid(
                        "application-header",
                        format!("{name:?} is not a token"),
                    ));
                }
                encode_text_string(buf, name.as_bytes());
                encode_text_string(buf, value);
            }
        }
        Ok(())
    }
}

/// Header values of one PDU
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PduHeaders {
    values: HashMap<HeaderField, HeaderValue>,
    extensions: Vec<ExtensionHeader>,
}

impl PduHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: HeaderField) -> Option<&HeaderValue> {
        self.values.get(&field)
    }

    pub fn contains(&self, field: HeaderField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn remove(&mut self, field: HeaderField) -> Option<HeaderValue> {
        self.values.remove(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.extensions.is_empty()
    }

    /// Present fields in ascending code order
    pub fn fields(&self) -> Vec<HeaderField> {
        let mut fields: Vec<_> = self.values.keys().copied().collect();
        fields.sort();
        fields
    }

    /// Store `value`, replacing any earlier value. The value's kind must
    /// match the field's declared kind.
    pub fn set(&mut self, field: HeaderField, value: HeaderValue) -> Result<(), CodecError> {
        check_kind(field, value.kind())?;
        self.values.insert(field, value);
        Ok(())
    }

    /// Typed form of `set`
    pub fn insert<T: HeaderValueType>(
        &mut self,
        field: HeaderField,
        value: T,
    ) -> Result<(), CodecError> {
        self.set(field, value.into_header_value())
    }

    /// Insert when `value` is present
    pub fn insert_opt<T: HeaderValueType>(
        &mut self,
        field: HeaderField,
        value: Option<T>,
    ) -> Result<(), CodecError> {
        match value {
            Some(value) => self.insert(field, value),
            None => Ok(()),
        }
    }

    /// Remove and return a typed value
    pub fn take<T: HeaderValueType>(&mut self, field: HeaderField) -> Result<Option<T>, CodecError> {
        check_kind(field, T::KIND)?;
        Ok(self.values.remove(&field).and_then(T::from_header_value))
    }

    /// Add one recipient to To, Cc or Bcc
    pub fn append_address(
        &mut self,
        field: HeaderField,
        address: EncodedStringValue,
    ) -> Result<(), CodecError> {
        check_kind(field, HeaderKind::AddressList)?;
        match self
            .values
            .entry(field)
            .or_insert_with(|| HeaderValue::AddressList(Vec::new()))
        {
            HeaderValue::AddressList(addresses) => addresses.push(address),
            other => {
                return Err(mismatch(field, HeaderKind::AddressList, other.kind()));
            }
        }
        Ok(())
    }

    /// Merge a freshly decoded value: address lists accumulate, everything
    /// else keeps the last occurrence
    pub(crate) fn merge(&mut self, field: HeaderField, value: HeaderValue) -> Result<(), CodecError> {
        match value {
            HeaderValue::AddressList(addresses) => {
                for address in addresses {
                    self.append_address(field, address)?;
                }
                Ok(())
            }
            value => self.set(field, value),
        }
    }

    fn lookup(&self, field: HeaderField, kind: HeaderKind) -> Result<Option<&HeaderValue>, CodecError> {
        check_kind(field, kind)?;
        Ok(self.values.get(&field))
    }

    pub fn octet(&self, field: HeaderField) -> Result<Option<u8>, CodecError> {
        Ok(match self.lookup(field, HeaderKind::Octet)? {
            Some(HeaderValue::Octet(octet)) => Some(*octet),
            _ => None,
        })
    }

    pub fn long_integer(&self, field: HeaderField) -> Result<Option<u64>, CodecError> {
        Ok(match self.lookup(field, HeaderKind::LongInteger)? {
            Some(HeaderValue::LongInteger(value)) => Some(*value),
            _ => None,
        })
    }

    pub fn text_string(&self, field: HeaderField) -> Result<Option<&str>, CodecError> {
        Ok(match self.lookup(field, HeaderKind::TextString)? {
            Some(HeaderValue::TextString(value)) => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn encoded_string_value(
        &self,
        field: HeaderField,
    ) -> Result<Option<&EncodedStringValue>, CodecError> {
        Ok(match self.lookup(field, HeaderKind::EncodedString)? {
            Some(HeaderValue::EncodedString(value)) => Some(value),
            _ => None,
        })
    }

    pub fn address_list(
        &self,
        field: HeaderField,
    ) -> Result<Option<&[EncodedStringValue]>, CodecError> {
        Ok(match self.lookup(field, HeaderKind::AddressList)? {
            Some(HeaderValue::AddressList(addresses)) => Some(addresses.as_slice()),
            _ => None,
        })
    }

    pub fn sender(&self) -> Result<Option<&Sender>, CodecError> {
        Ok(match self.lookup(HeaderField::From, HeaderKind::Sender)? {
            Some(HeaderValue::Sender(sender)) => Some(sender),
            _ => None,
        })
    }

    pub fn time(&self, field: HeaderField) -> Result<Option<TimeValue>, CodecError> {
        Ok(match self.lookup(field, HeaderKind::Time)? {
            Some(HeaderValue::Time(time)) => Some(*time),
            _ => None,
        })
    }

    pub fn message_class(&self) -> Result<Option<&MessageClass>, CodecError> {
        Ok(match self.lookup(HeaderField::MessageClass, HeaderKind::MessageClass)? {
            Some(HeaderValue::MessageClass(class)) => Some(class),
            _ => None,
        })
    }

    pub fn content_type(&self) -> Result<Option<&ContentType>, CodecError> {
        Ok(match self.lookup(HeaderField::ContentType, HeaderKind::ContentType)? {
            Some(HeaderValue::ContentType(content_type)) => Some(content_type),
            _ => None,
        })
    }

    pub fn set_octet(&mut self, field: HeaderField, value: u8) -> Result<(), CodecError> {
        self.insert(field, value)
    }

    pub fn set_long_integer(&mut self, field: HeaderField, value: u64) -> Result<(), CodecError> {
        self.insert(field, value)
    }

    pub fn set_text_string(
        &mut self,
        field: HeaderField,
        value: impl Into<String>,
    ) -> Result<(), CodecError> {
        self.insert(field, value.into())
    }

    pub fn set_encoded_string_value(
        &mut self,
        field: HeaderField,
        value: EncodedStringValue,
    ) -> Result<(), CodecError> {
        self.insert(field, value)
    }

    pub fn set_time(&mut self, field: HeaderField, value: TimeValue) -> Result<(), CodecError> {
        self.insert(field, value)
    }

    pub fn extensions(&self) -> &[ExtensionHeader] {
        &self.extensions
    }

    pub fn push_extension(&mut self, header: ExtensionHeader) {
        self.extensions.push(header);
    }

    pub(crate) fn take_extensions(&mut self) -> Vec<ExtensionHeader> {
        std::mem::take(&mut self.extensions)
    }
}

fn check_kind(field: HeaderField, kind: HeaderKind) -> Result<(), CodecError> {
    if field.kind() == kind {
        Ok(())
    } else {
        Err(mismatch(field, kind, field.kind()))
    }
}

fn mismatch(field: HeaderField, expected: HeaderKind, actual: HeaderKind) -> CodecError {
    CodecError::HeaderTypeMismatch {
        field,
        expected: expected.name(),
        actual: actual.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_accessors() {
        let mut headers = PduHeaders::new();
        headers.set_octet(HeaderField::MessageType, 0x80).unwrap();
        headers.set_text_string(HeaderField::TransactionId, "T1").unwrap();
        headers.set_long_integer(HeaderField::Date, 1_600_000_000).unwrap();
        headers
            .set_encoded_string_value(HeaderField::Subject, "Hi".into())
            .unwrap();

        assert_eq!(headers.octet(HeaderField::MessageType).unwrap(), Some(0x80));
        assert_eq!(headers.text_string(HeaderField::TransactionId).unwrap(), Some("T1"));
        assert_eq!(headers.long_integer(HeaderField::Date).unwrap(), Some(1_600_000_000));
        assert_eq!(
            headers
                .encoded_string_value(HeaderField::Subject)
                .unwrap()
                .unwrap()
                .text()
                .unwrap(),
            "Hi"
        );
        assert_eq!(headers.octet(HeaderField::Priority).unwrap(), None);
    }

    #[test]
    fn wrong_kind_is_a_mismatch() {
        let mut headers = PduHeaders::new();
        headers.set_text_string(HeaderField::TransactionId, "T1").unwrap();
        assert!(matches!(
            headers.long_integer(HeaderField::TransactionId),
            Err(CodecError::HeaderTypeMismatch {
                field: HeaderField::TransactionId,
                expected: "long-integer",
                actual: "text-string",
            })
        ));
        assert!(matches!(
            headers.set_octet(HeaderField::Date, 1),
            Err(CodecError::HeaderTypeMismatch { .. })
        ));
        assert!(headers.append_address(HeaderField::Subject, "x".into()).is_err());
    }

    #[test]
    fn addresses_accumulate() {
        let mut headers = PduHeaders::new();
        headers.append_address(HeaderField::To, "+1555".into()).unwrap();
        headers
            .merge(HeaderField::To, HeaderValue::AddressList(vec!["+1666".into()]))
            .unwrap();
        let to = headers.address_list(HeaderField::To).unwrap().unwrap();
        assert_eq!(to.len(), 2);
        assert_eq!(to[1].text().unwrap(), "+1666");
    }

    #[test]
    fn address_list_repeats_field_code() {
        let value = HeaderValue::AddressList(vec!["a".into(), "b".into()]);
        let mut buf = BytesMut::new();
        value.encode_field(HeaderField::To, &mut buf).unwrap();
        assert_eq!(buf.as_ref(), &[0x97, b'a', 0, 0x97, b'b', 0]);
    }

    #[test]
    fn decode_by_field_kind() {
        let data = [0x04, 0x5F, 0x5E, 0x10, 0x00];
        let mut cursor = Cursor::new(&data[..]);
        assert_eq!(
            HeaderValue::decode(HeaderField::Date, &mut cursor).unwrap(),
            HeaderValue::LongInteger(1_600_000_000)
        );

        let data = b"+1555/TYPE=PLMN\0";
        let mut cursor = Cursor::new(&data[..]);
        match HeaderValue::decode(HeaderField::To, &mut cursor).unwrap() {
            HeaderValue::AddressList(addresses) => {
                assert_eq!(addresses[0].text().unwrap(), "+1555")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn take_removes() {
        let mut headers = PduHeaders::new();
        headers.set_text_string(HeaderField::MessageId, "m1").unwrap();
        assert_eq!(
            headers.take::<String>(HeaderField::MessageId).unwrap(),
            Some("m1".to_owned())
        );
        assert!(!headers.contains(HeaderField::MessageId));
        assert!(headers.take::<u64>(HeaderField::MessageId).is_err());
    }

    #[test]
    fn application_headers_must_be_tokens() {
        let mut buf = BytesMut::new();
        ExtensionHeader::application("X-Carrier", "abc")
            .encode(&mut buf)
            .unwrap();
        assert_eq!(buf.as_ref(), b"X-Carrier\0abc\0");
        assert!(ExtensionHeader::application("", "abc").encode(&mut buf).is_err());
    }
}
