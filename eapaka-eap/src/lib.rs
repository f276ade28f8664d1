//! EAP-AKA protocol library
//!
//! Implements EAP-AKA (RFC 4187) message encoding/decoding on top of the
//! EAP framing of RFC 3748, together with the AT_MAC message protection.
//!
//! # Message Structure
//!
//! - Code (1 byte), Identifier (1 byte), Length (2 bytes, big-endian)
//! - Type (1 byte, always 23 for EAP-AKA)
//! - Subtype (1 byte) and 2 reserved bytes
//! - Attributes, each a type byte, a length byte in 4-byte units and a value
//!
//! # Example
//!
//! ```rust
//! use eapaka_eap::{decode_eap_aka, encode_eap_aka_to_vec, EapAkaMessage, EapCode};
//!
//! let mut msg = EapAkaMessage::challenge(EapCode::Response, 7);
//! msg.attributes.put_res(&[0xa5, 0x42, 0x11, 0xd5]);
//!
//! let bytes = encode_eap_aka_to_vec(&msg).unwrap();
//! assert_eq!(decode_eap_aka(&bytes).unwrap(), msg);
//! ```

pub mod eap;
pub mod security;

pub use eap::{
    decode_eap_aka, encode_eap_aka, encode_eap_aka_to_vec, Attribute, AttributeLayout,
    EapAkaMessage, EapAkaSubType, EapAttributeType, EapAttributes, EapCode, EapError, EapType,
    AUTS_SIZE, EAP_AKA_HEADER_SIZE, MAX_ATTRIBUTE_SPAN, MAX_MESSAGE_SIZE,
};
pub use security::{compute_mac, seal, verify_mac};
