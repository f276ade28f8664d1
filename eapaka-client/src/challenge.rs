//! Inbound EAP-AKA challenge
//!
//! A [`Challenge`] is either parsed from a framed EAP-Request/AKA-Challenge
//! or built from RAND and AUTN supplied directly as hex strings.

use eapaka_common::logging::{log_eap_message, Direction};
use eapaka_eap::{
    decode_eap_aka, EapAkaMessage, EapAkaSubType, EapAttributeType, EapCode, EapError,
};

use crate::error::{AkaError, Result};

/// RAND size in bytes
pub const RAND_SIZE: usize = 16;

/// AUTN size in bytes
pub const AUTN_SIZE: usize = 16;

/// RAND/AUTN pair plus the identifier the response must echo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    identifier: u8,
    rand: [u8; RAND_SIZE],
    autn: [u8; AUTN_SIZE],
    message: Option<EapAkaMessage>,
}

fn decode_hex<const N: usize>(field: &'static str, input: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(input.trim()).map_err(|e| AkaError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| AkaError::InvalidHex {
        field,
        reason: format!("expected {N} bytes, got {}", bytes.len()),
    })
}

/// Single occurrence of a fixed-size attribute
fn unique_value<const N: usize>(
    msg: &EapAkaMessage,
    attr_type: EapAttributeType,
) -> Result<[u8; N]> {
    let count = msg.attributes.count(attr_type);
    let value = match msg.attributes.get(attr_type) {
        Some(value) if count == 1 => value,
        _ => return Err(AkaError::MissingAttribute { attr_type, count }),
    };
    <[u8; N]>::try_from(value).map_err(|_| {
        AkaError::MalformedMessage(EapError::InvalidAttributeValue {
            attr_type,
            reason: "unexpected value size",
        })
    })
}

impl Challenge {
    /// Create a challenge from raw values
    pub fn new(identifier: u8, rand: [u8; RAND_SIZE], autn: [u8; AUTN_SIZE]) -> Self {
        Self {
            identifier,
            rand,
            autn,
            message: None,
        }
    }

    /// Create a challenge from pre-extracted RAND and AUTN hex strings
    ///
    /// The response to such a challenge uses identifier 0.
    pub fn from_hex(rand_hex: &str, autn_hex: &str) -> Result<Self> {
        let rand = decode_hex::<RAND_SIZE>("RAND", rand_hex)?;
        let autn = decode_hex::<AUTN_SIZE>("AUTN", autn_hex)?;
        Ok(Self::new(0, rand, autn))
    }

    /// Parse a framed EAP-Request/AKA-Challenge
    pub fn parse(frame: &[u8]) -> Result<Self> {
        log_eap_message(Direction::Rx, "AKA-Challenge", frame);

        let msg = decode_eap_aka(frame)?;
        if msg.code != EapCode::Request {
            return Err(EapError::InvalidCode(msg.code.into()).into());
        }
        if msg.sub_type != EapAkaSubType::AkaChallenge {
            return Err(EapError::InvalidSubType(msg.sub_type.into()).into());
        }

        let rand = unique_value::<RAND_SIZE>(&msg, EapAttributeType::AtRand)?;
        let autn = unique_value::<AUTN_SIZE>(&msg, EapAttributeType::AtAutn)?;

        tracing::debug!(
            id = msg.id,
            attributes = msg.attributes.len(),
            mac = msg.attributes.contains(EapAttributeType::AtMac),
            "Parsed AKA-Challenge"
        );

        Ok(Self {
            identifier: msg.id,
            rand,
            autn,
            message: Some(msg),
        })
    }

    /// Parse a hex encoded framed challenge
    pub fn parse_hex(frame_hex: &str) -> Result<Self> {
        let frame = hex::decode(frame_hex.trim()).map_err(|e| AkaError::InvalidHex {
            field: "challenge",
            reason: e.to_string(),
        })?;
        Self::parse(&frame)
    }

    /// EAP identifier to echo in the response
    pub fn identifier(&self) -> u8 {
        self.identifier
    }

    /// RAND
    pub fn rand(&self) -> &[u8; RAND_SIZE] {
        &self.rand
    }

    /// AUTN
    pub fn autn(&self) -> &[u8; AUTN_SIZE] {
        &self.autn
    }

    /// Decoded request, if the challenge was framed
    pub fn message(&self) -> Option<&EapAkaMessage> {
        self.message.as_ref()
    }
}
