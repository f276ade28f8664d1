//! EAP-AKA message parsing
//!
//! This module implements EAP-AKA message encoding/decoding as defined in
//! RFC 3748 (EAP framing) and RFC 4187 (EAP-AKA attributes).
//!
//! # Attribute Layouts
//!
//! Every attribute starts with a type byte and a length byte counting 4-byte
//! units, including the 2-byte attribute header. The value that follows has
//! one of four shapes, see [`AttributeLayout`]. The decoded [`Attribute`]
//! only carries the value itself: reserved fields, length prefixes and
//! padding are stripped on decode and regenerated on encode.

use bytes::{Buf, BufMut};
use thiserror::Error;

/// EAP header plus type, subtype and reserved bytes
pub const EAP_AKA_HEADER_SIZE: usize = 8;

/// Largest encodable attribute span (255 units of 4 bytes)
pub const MAX_ATTRIBUTE_SPAN: usize = 255 * 4;

/// Largest encodable EAP message
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;

/// AT_AUTS value size
pub const AUTS_SIZE: usize = 14;

/// Attribute codes from this value upwards may be skipped when unknown
const SKIPPABLE_ATTRIBUTE_MIN: u8 = 128;

const ATTRIBUTE_HEADER_SIZE: usize = 2;
const VALUE_PREFIX_SIZE: usize = 2;

/// Error type for EAP-AKA encoding/decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EapError {
    /// Buffer too short for decoding
    #[error("Buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum bytes
        expected: usize,
        /// Actual bytes available
        actual: usize,
    },
    /// Length field does not match the buffer
    #[error("Length mismatch: header declares {declared} bytes, buffer holds {actual}")]
    LengthMismatch {
        /// Length from the EAP header
        declared: usize,
        /// Buffer length
        actual: usize,
    },
    /// Invalid EAP code
    #[error("Invalid EAP code: {0}")]
    InvalidCode(u8),
    /// EAP type is not EAP-AKA
    #[error("Unexpected EAP type: {0}")]
    UnexpectedType(u8),
    /// Invalid EAP-AKA subtype
    #[error("Invalid EAP-AKA subtype: {0}")]
    InvalidSubType(u8),
    /// Unknown non-skippable attribute
    #[error("Unknown attribute type: {0}")]
    UnknownAttribute(u8),
    /// Attribute with a length of zero units
    #[error("Zero-length attribute: type {0}")]
    ZeroLengthAttribute(u8),
    /// Attribute span runs past the end of the message
    #[error("Truncated attribute: type {attr_type} spans {span} bytes, {remaining} remaining")]
    TruncatedAttribute {
        /// Attribute type code
        attr_type: u8,
        /// Declared span in bytes
        span: usize,
        /// Bytes left in the message
        remaining: usize,
    },
    /// Padding after a length-prefixed value is not zero
    #[error("Non-zero padding in attribute type {0}")]
    NonZeroPadding(u8),
    /// Attribute value violates its layout
    #[error("Invalid value for attribute {attr_type:?}: {reason}")]
    InvalidAttributeValue {
        /// Attribute type
        attr_type: EapAttributeType,
        /// What is wrong with it
        reason: &'static str,
    },
    /// Attribute value does not fit into 255 length units
    #[error("Attribute {attr_type:?} too long: {len} bytes")]
    AttributeTooLong {
        /// Attribute type
        attr_type: EapAttributeType,
        /// Value length
        len: usize,
    },
    /// Message does not fit into the 16-bit length field
    #[error("Message too long: {0} bytes")]
    MessageTooLong(usize),
    /// AT_MAC required but absent
    #[error("AT_MAC attribute missing")]
    MissingMac,
}

// ============================================================================
// EAP Code (RFC 3748 Section 4)
// ============================================================================

/// EAP Code values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EapCode {
    /// Request (1)
    Request = 1,
    /// Response (2)
    Response = 2,
    /// Success (3)
    Success = 3,
    /// Failure (4)
    Failure = 4,
}

impl TryFrom<u8> for EapCode {
    type Error = EapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EapCode::Request),
            2 => Ok(EapCode::Response),
            3 => Ok(EapCode::Success),
            4 => Ok(EapCode::Failure),
            _ => Err(EapError::InvalidCode(value)),
        }
    }
}

impl From<EapCode> for u8 {
    fn from(code: EapCode) -> u8 {
        code as u8
    }
}

// ============================================================================
// EAP Type (RFC 3748 Section 5)
// ============================================================================

/// EAP Type values relevant to an EAP-AKA peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EapType {
    /// Identity (1)
    Identity = 1,
    /// Notification (2)
    Notification = 2,
    /// Legacy Nak (3)
    LegacyNak = 3,
    /// EAP-AKA (23)
    EapAka = 23,
}

impl TryFrom<u8> for EapType {
    type Error = EapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EapType::Identity),
            2 => Ok(EapType::Notification),
            3 => Ok(EapType::LegacyNak),
            23 => Ok(EapType::EapAka),
            _ => Err(EapError::UnexpectedType(value)),
        }
    }
}

impl From<EapType> for u8 {
    fn from(t: EapType) -> u8 {
        t as u8
    }
}

// ============================================================================
// EAP-AKA Subtype (RFC 4187 Section 11)
// ============================================================================

/// EAP-AKA Subtype values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EapAkaSubType {
    /// AKA-Challenge (1)
    AkaChallenge = 1,
    /// AKA-Authentication-Reject (2)
    AkaAuthenticationReject = 2,
    /// AKA-Synchronization-Failure (4)
    AkaSynchronizationFailure = 4,
    /// AKA-Identity (5)
    AkaIdentity = 5,
    /// AKA-Notification (12)
    AkaNotification = 12,
    /// AKA-Reauthentication (13)
    AkaReauthentication = 13,
    /// AKA-Client-Error (14)
    AkaClientError = 14,
}

impl TryFrom<u8> for EapAkaSubType {
    type Error = EapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EapAkaSubType::AkaChallenge),
            2 => Ok(EapAkaSubType::AkaAuthenticationReject),
            4 => Ok(EapAkaSubType::AkaSynchronizationFailure),
            5 => Ok(EapAkaSubType::AkaIdentity),
            12 => Ok(EapAkaSubType::AkaNotification),
            13 => Ok(EapAkaSubType::AkaReauthentication),
            14 => Ok(EapAkaSubType::AkaClientError),
            _ => Err(EapError::InvalidSubType(value)),
        }
    }
}

impl From<EapAkaSubType> for u8 {
    fn from(st: EapAkaSubType) -> u8 {
        st as u8
    }
}

// ============================================================================
// EAP-AKA Attribute Type (RFC 4187 Section 11)
// ============================================================================

/// Wire shape of an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeLayout {
    /// 2 reserved bytes, then a value that fills the span
    Reserved,
    /// 2-byte length in bits, value, zero padding
    BitLength,
    /// 2-byte length in bytes, value, zero padding
    ByteLength,
    /// Value fills the span directly after the attribute header
    Raw,
}

/// EAP-AKA Attribute Type values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum EapAttributeType {
    /// AT_RAND (1) - Random challenge
    AtRand = 1,
    /// AT_AUTN (2) - Authentication token
    AtAutn = 2,
    /// AT_RES (3) - Authentication response
    AtRes = 3,
    /// AT_AUTS (4) - Resynchronization parameter
    AtAuts = 4,
    /// AT_PADDING (6) - Padding
    AtPadding = 6,
    /// AT_PERMANENT_ID_REQ (10) - Permanent identity request
    AtPermanentIdReq = 10,
    /// AT_MAC (11) - Message authentication code
    AtMac = 11,
    /// AT_NOTIFICATION (12) - Notification code
    AtNotification = 12,
    /// AT_ANY_ID_REQ (13) - Any identity request
    AtAnyIdReq = 13,
    /// AT_IDENTITY (14) - Identity
    AtIdentity = 14,
    /// AT_FULLAUTH_ID_REQ (17) - Full authentication identity request
    AtFullauthIdReq = 17,
    /// AT_COUNTER (19) - Counter
    AtCounter = 19,
    /// AT_COUNTER_TOO_SMALL (20) - Counter too small
    AtCounterTooSmall = 20,
    /// AT_NONCE_S (21) - Nonce from server
    AtNonceS = 21,
    /// AT_CLIENT_ERROR_CODE (22) - Client error code
    AtClientErrorCode = 22,
    /// AT_IV (129) - Initialization vector
    AtIv = 129,
    /// AT_ENCR_DATA (130) - Encrypted data
    AtEncrData = 130,
    /// AT_NEXT_PSEUDONYM (132) - Next pseudonym
    AtNextPseudonym = 132,
    /// AT_NEXT_REAUTH_ID (133) - Next reauthentication identity
    AtNextReauthId = 133,
    /// AT_CHECKCODE (134) - Checkcode
    AtCheckcode = 134,
    /// AT_RESULT_IND (135) - Result indication
    AtResultInd = 135,
}

impl EapAttributeType {
    /// Wire shape of this attribute's value
    pub fn layout(self) -> AttributeLayout {
        match self {
            EapAttributeType::AtRand
            | EapAttributeType::AtAutn
            | EapAttributeType::AtMac
            | EapAttributeType::AtIv
            | EapAttributeType::AtEncrData
            | EapAttributeType::AtNonceS
            | EapAttributeType::AtCheckcode => AttributeLayout::Reserved,
            EapAttributeType::AtRes => AttributeLayout::BitLength,
            EapAttributeType::AtIdentity
            | EapAttributeType::AtNextPseudonym
            | EapAttributeType::AtNextReauthId => AttributeLayout::ByteLength,
            EapAttributeType::AtAuts
            | EapAttributeType::AtPadding
            | EapAttributeType::AtPermanentIdReq
            | EapAttributeType::AtNotification
            | EapAttributeType::AtAnyIdReq
            | EapAttributeType::AtFullauthIdReq
            | EapAttributeType::AtCounter
            | EapAttributeType::AtCounterTooSmall
            | EapAttributeType::AtClientErrorCode
            | EapAttributeType::AtResultInd => AttributeLayout::Raw,
        }
    }
}

impl TryFrom<u8> for EapAttributeType {
    type Error = EapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EapAttributeType::AtRand),
            2 => Ok(EapAttributeType::AtAutn),
            3 => Ok(EapAttributeType::AtRes),
            4 => Ok(EapAttributeType::AtAuts),
            6 => Ok(EapAttributeType::AtPadding),
            10 => Ok(EapAttributeType::AtPermanentIdReq),
            11 => Ok(EapAttributeType::AtMac),
            12 => Ok(EapAttributeType::AtNotification),
            13 => Ok(EapAttributeType::AtAnyIdReq),
            14 => Ok(EapAttributeType::AtIdentity),
            17 => Ok(EapAttributeType::AtFullauthIdReq),
            19 => Ok(EapAttributeType::AtCounter),
            20 => Ok(EapAttributeType::AtCounterTooSmall),
            21 => Ok(EapAttributeType::AtNonceS),
            22 => Ok(EapAttributeType::AtClientErrorCode),
            129 => Ok(EapAttributeType::AtIv),
            130 => Ok(EapAttributeType::AtEncrData),
            132 => Ok(EapAttributeType::AtNextPseudonym),
            133 => Ok(EapAttributeType::AtNextReauthId),
            134 => Ok(EapAttributeType::AtCheckcode),
            135 => Ok(EapAttributeType::AtResultInd),
            _ => Err(EapError::UnknownAttribute(value)),
        }
    }
}

impl From<EapAttributeType> for u8 {
    fn from(t: EapAttributeType) -> u8 {
        t as u8
    }
}

// ============================================================================
// EAP Attributes Container
// ============================================================================

/// A single decoded attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute type
    pub attr_type: EapAttributeType,
    /// Value without reserved field, length prefix or padding
    pub value: Vec<u8>,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(attr_type: EapAttributeType, value: Vec<u8>) -> Self {
        Self { attr_type, value }
    }
}

/// Ordered list of EAP-AKA attributes
///
/// Keeps wire order and duplicates, so that a receiver can tell an attribute
/// that appears twice from one that appears once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EapAttributes {
    attributes: Vec<Attribute>,
}

impl EapAttributes {
    /// Create a new empty attributes container
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute
    pub fn push(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Append a raw attribute value
    pub fn put_raw_attribute(&mut self, attr_type: EapAttributeType, value: Vec<u8>) {
        self.push(Attribute::new(attr_type, value));
    }

    /// Value of the first attribute of the given type
    pub fn get(&self, attr_type: EapAttributeType) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|a| a.attr_type == attr_type)
            .map(|a| a.value.as_slice())
    }

    /// Number of attributes of the given type
    pub fn count(&self, attr_type: EapAttributeType) -> usize {
        self.attributes
            .iter()
            .filter(|a| a.attr_type == attr_type)
            .count()
    }

    /// Whether an attribute of the given type is present
    pub fn contains(&self, attr_type: EapAttributeType) -> bool {
        self.get(attr_type).is_some()
    }

    /// Replace the value of the first attribute of the given type
    ///
    /// Returns `false` when no such attribute exists.
    pub fn replace(&mut self, attr_type: EapAttributeType, value: Vec<u8>) -> bool {
        match self.attributes.iter_mut().find(|a| a.attr_type == attr_type) {
            Some(attr) => {
                attr.value = value;
                true
            }
            None => false,
        }
    }

    /// Get the RAND value
    pub fn get_rand(&self) -> Option<&[u8]> {
        self.get(EapAttributeType::AtRand)
    }

    /// Get the AUTN value
    pub fn get_autn(&self) -> Option<&[u8]> {
        self.get(EapAttributeType::AtAutn)
    }

    /// Get the RES value
    pub fn get_res(&self) -> Option<&[u8]> {
        self.get(EapAttributeType::AtRes)
    }

    /// Get the AUTS value
    pub fn get_auts(&self) -> Option<&[u8]> {
        self.get(EapAttributeType::AtAuts)
    }

    /// Get the MAC value
    pub fn get_mac(&self) -> Option<&[u8]> {
        self.get(EapAttributeType::AtMac)
    }

    /// Put RAND attribute
    pub fn put_rand(&mut self, rand: &[u8]) {
        self.put_raw_attribute(EapAttributeType::AtRand, rand.to_vec());
    }

    /// Put AUTN attribute
    pub fn put_autn(&mut self, autn: &[u8]) {
        self.put_raw_attribute(EapAttributeType::AtAutn, autn.to_vec());
    }

    /// Put RES attribute (bit length prefix added on encode)
    pub fn put_res(&mut self, res: &[u8]) {
        self.put_raw_attribute(EapAttributeType::AtRes, res.to_vec());
    }

    /// Put AUTS attribute
    pub fn put_auts(&mut self, auts: &[u8; AUTS_SIZE]) {
        self.put_raw_attribute(EapAttributeType::AtAuts, auts.to_vec());
    }

    /// Put MAC attribute (reserved field added on encode)
    pub fn put_mac(&mut self, mac: &[u8]) {
        self.put_raw_attribute(EapAttributeType::AtMac, mac.to_vec());
    }

    /// Replace MAC attribute value (for MAC calculation)
    pub fn replace_mac(&mut self, mac: &[u8]) -> bool {
        self.replace(EapAttributeType::AtMac, mac.to_vec())
    }

    /// Iterate over attributes in wire order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Check if the container is empty
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Get the number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }
}

// ============================================================================
// EAP-AKA Message
// ============================================================================

/// EAP-AKA message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EapAkaMessage {
    /// EAP code
    pub code: EapCode,
    /// Identifier
    pub id: u8,
    /// EAP-AKA subtype
    pub sub_type: EapAkaSubType,
    /// Attributes
    pub attributes: EapAttributes,
}

impl EapAkaMessage {
    /// Create a new EAP-AKA message
    pub fn new(code: EapCode, id: u8, sub_type: EapAkaSubType) -> Self {
        Self {
            code,
            id,
            sub_type,
            attributes: EapAttributes::new(),
        }
    }

    /// Create an AKA-Challenge message
    pub fn challenge(code: EapCode, id: u8) -> Self {
        Self::new(code, id, EapAkaSubType::AkaChallenge)
    }

    /// Create an AKA-Authentication-Reject message
    pub fn authentication_reject(code: EapCode, id: u8) -> Self {
        Self::new(code, id, EapAkaSubType::AkaAuthenticationReject)
    }

    /// Create an AKA-Synchronization-Failure response carrying AUTS
    pub fn synchronization_failure(id: u8, auts: &[u8; AUTS_SIZE]) -> Self {
        let mut msg = Self::new(EapCode::Response, id, EapAkaSubType::AkaSynchronizationFailure);
        msg.attributes.put_auts(auts);
        msg
    }

}

// ============================================================================
// EAP-AKA Encoding
// ============================================================================

fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

fn encode_attribute<B: BufMut>(buf: &mut B, attr: &Attribute) -> Result<usize, EapError> {
    let attr_type = attr.attr_type;
    let value = &attr.value;
    let layout = attr_type.layout();

    let (prefix_len, padding) = match layout {
        AttributeLayout::Reserved => {
            if value.len() % 4 != 0 {
                return Err(EapError::InvalidAttributeValue {
                    attr_type,
                    reason: "value length must be a multiple of 4",
                });
            }
            (VALUE_PREFIX_SIZE, 0)
        }
        AttributeLayout::Raw => {
            if value.len() % 4 != 2 {
                return Err(EapError::InvalidAttributeValue {
                    attr_type,
                    reason: "value length must be 2 modulo 4",
                });
            }
            (0, 0)
        }
        AttributeLayout::BitLength | AttributeLayout::ByteLength => (
            VALUE_PREFIX_SIZE,
            padding_for(ATTRIBUTE_HEADER_SIZE + VALUE_PREFIX_SIZE + value.len()),
        ),
    };

    let span = ATTRIBUTE_HEADER_SIZE + prefix_len + value.len() + padding;
    if span > MAX_ATTRIBUTE_SPAN {
        return Err(EapError::AttributeTooLong {
            attr_type,
            len: value.len(),
        });
    }

    buf.put_u8(attr_type.into());
    buf.put_u8((span / 4) as u8);
    match layout {
        AttributeLayout::Reserved => buf.put_u16(0),
        // span <= 1020, so both length prefixes fit in 16 bits
        AttributeLayout::BitLength => buf.put_u16((value.len() * 8) as u16),
        AttributeLayout::ByteLength => buf.put_u16(value.len() as u16),
        AttributeLayout::Raw => {}
    }
    buf.put_slice(value);
    buf.put_bytes(0, padding);

    Ok(span)
}

/// Encode an EAP-AKA message into a buffer
///
/// Attributes are written in container order. Output is deterministic: the
/// same message always yields the same bytes.
pub fn encode_eap_aka<B: BufMut>(buf: &mut B, msg: &EapAkaMessage) -> Result<(), EapError> {
    let mut body = Vec::new();
    for attr in msg.attributes.iter() {
        encode_attribute(&mut body, attr)?;
    }

    let total_len = EAP_AKA_HEADER_SIZE + body.len();
    if total_len > MAX_MESSAGE_SIZE {
        return Err(EapError::MessageTooLong(total_len));
    }

    buf.put_u8(msg.code.into());
    buf.put_u8(msg.id);
    buf.put_u16(total_len as u16);
    buf.put_u8(EapType::EapAka.into());
    buf.put_u8(msg.sub_type.into());
    buf.put_u16(0); // Reserved
    buf.put_slice(&body);

    Ok(())
}

/// Encode an EAP-AKA message to a new Vec<u8>
pub fn encode_eap_aka_to_vec(msg: &EapAkaMessage) -> Result<Vec<u8>, EapError> {
    let mut buf = Vec::new();
    encode_eap_aka(&mut buf, msg)?;
    Ok(buf)
}

// ============================================================================
// EAP-AKA Decoding
// ============================================================================

/// Strip a length prefix and validate the zero padding behind the value
fn decode_prefixed_value(
    attr_type: EapAttributeType,
    body: &[u8],
    value_len: usize,
) -> Result<Vec<u8>, EapError> {
    let rest = &body[VALUE_PREFIX_SIZE..];
    if value_len > rest.len() {
        return Err(EapError::InvalidAttributeValue {
            attr_type,
            reason: "length prefix exceeds attribute span",
        });
    }
    let (value, padding) = rest.split_at(value_len);
    if padding.iter().any(|&b| b != 0) {
        return Err(EapError::NonZeroPadding(attr_type.into()));
    }
    Ok(value.to_vec())
}

/// Decode one attribute; `Ok(None)` for a skipped unknown attribute
fn decode_attribute<B: Buf>(buf: &mut B) -> Result<Option<Attribute>, EapError> {
    let remaining = buf.remaining();
    if remaining < ATTRIBUTE_HEADER_SIZE {
        return Err(EapError::TruncatedAttribute {
            attr_type: buf.chunk().first().copied().unwrap_or_default(),
            span: ATTRIBUTE_HEADER_SIZE,
            remaining,
        });
    }

    let raw_type = buf.get_u8();
    let units = buf.get_u8() as usize;
    if units == 0 {
        return Err(EapError::ZeroLengthAttribute(raw_type));
    }

    let span = units * 4;
    if span > remaining {
        return Err(EapError::TruncatedAttribute {
            attr_type: raw_type,
            span,
            remaining,
        });
    }
    let body = buf.copy_to_bytes(span - ATTRIBUTE_HEADER_SIZE);

    let attr_type = match EapAttributeType::try_from(raw_type) {
        Ok(t) => t,
        Err(_) if raw_type >= SKIPPABLE_ATTRIBUTE_MIN => {
            tracing::trace!(attr_type = raw_type, span, "Skipping unknown attribute");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let value = match attr_type.layout() {
        AttributeLayout::Reserved => body[VALUE_PREFIX_SIZE..].to_vec(),
        AttributeLayout::Raw => body.to_vec(),
        AttributeLayout::BitLength => {
            let bits = u16::from_be_bytes([body[0], body[1]]) as usize;
            let value = decode_prefixed_value(attr_type, &body, bits.div_ceil(8))?;
            // Bits past the declared length in the last value byte must be clear
            let unused = (8 - bits % 8) % 8;
            if let Some(&last) = value.last() {
                if last & ((1u8 << unused) - 1) != 0 {
                    return Err(EapError::NonZeroPadding(attr_type.into()));
                }
            }
            value
        }
        AttributeLayout::ByteLength => {
            let len = u16::from_be_bytes([body[0], body[1]]) as usize;
            decode_prefixed_value(attr_type, &body, len)?
        }
    };

    Ok(Some(Attribute::new(attr_type, value)))
}

/// Decode an EAP-AKA message
///
/// The length field must equal `data.len()` exactly and the EAP type must be
/// EAP-AKA.
pub fn decode_eap_aka(data: &[u8]) -> Result<EapAkaMessage, EapError> {
    let mut buf = data;
    if buf.remaining() < 4 {
        return Err(EapError::BufferTooShort {
            expected: 4,
            actual: buf.remaining(),
        });
    }

    let code = EapCode::try_from(buf.get_u8())?;
    let id = buf.get_u8();
    let length = buf.get_u16() as usize;

    if length != data.len() {
        return Err(EapError::LengthMismatch {
            declared: length,
            actual: data.len(),
        });
    }
    if length < EAP_AKA_HEADER_SIZE {
        return Err(EapError::BufferTooShort {
            expected: EAP_AKA_HEADER_SIZE,
            actual: length,
        });
    }

    let eap_type = buf.get_u8();
    if eap_type != u8::from(EapType::EapAka) {
        return Err(EapError::UnexpectedType(eap_type));
    }
    let sub_type = EapAkaSubType::try_from(buf.get_u8())?;
    buf.advance(2); // Reserved

    let mut msg = EapAkaMessage::new(code, id, sub_type);
    while buf.has_remaining() {
        if let Some(attr) = decode_attribute(&mut buf)? {
            msg.attributes.push(attr);
        }
    }

    Ok(msg)
}

// ============================================================================
// Tests
// ============================================================================
