// ABOUTME: This module provides macros to reduce boilerplate in MMS PDU implementations
// ABOUTME: Includes macros for builder patterns and for wiring PDU structs into the Pdu enum

/// Macro for generating builder setters for optional fields
///
/// Each generated method takes anything convertible into the field's inner
/// type, stores it as `Some`, and returns self for method chaining.
///
/// # Generated code
/// For each field, generates:
/// ```rust,ignore
/// pub fn $field(mut self, $field: impl Into<$type>) -> Self {
///     self.$field = Some($field.into());
///     self
/// }
/// ```
macro_rules! optional_setters {
    ($($field:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $field(mut self, $field: impl Into<$type>) -> Self {
                self.$field = Some($field.into());
                self
            }
        )*
    };
}

/// Macro for tying a PDU struct to its message type
///
/// # Arguments
/// * `$pdu_type` - The PDU struct name (e.g., SendConf)
/// * `$variant` - The `Pdu` and `MessageType` variant name
/// * `boxed` - Optional marker for variants stored boxed in `Pdu`
///
/// # Generated code
/// - `MESSAGE_TYPE` associated constant
/// - `From<$pdu_type> for Pdu`
macro_rules! impl_message_type {
    ($pdu_type:ident, $variant:ident) => {
        impl $pdu_type {
            pub const MESSAGE_TYPE: $crate::datatypes::MessageType =
                $crate::datatypes::MessageType::$variant;
        }

        impl From<$pdu_type> for $crate::pdu::Pdu {
            fn from(pdu: $pdu_type) -> Self {
                $crate::pdu::Pdu::$variant(pdu)
            }
        }
    };
    ($pdu_type:ident, $variant:ident, boxed) => {
        impl $pdu_type {
            pub const MESSAGE_TYPE: $crate::datatypes::MessageType =
                $crate::datatypes::MessageType::$variant;
        }

        impl From<$pdu_type> for $crate::pdu::Pdu {
            fn from(pdu: $pdu_type) -> Self {
                $crate::pdu::Pdu::$variant(Box::new(pdu))
            }
        }
    };
}

// Make macros available to the rest of the crate
pub(crate) use {impl_message_type, optional_setters};
