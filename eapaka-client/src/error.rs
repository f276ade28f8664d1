//! Error types for the EAP-AKA peer

use eapaka_eap::{EapAttributeType, EapError};
use thiserror::Error;

/// Errors reported by challenge parsing and [`respond`](crate::Authenticator::respond)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AkaError {
    /// Bad framing or attribute structure
    #[error("Malformed message: {0}")]
    MalformedMessage(#[from] EapError),

    /// Required attribute absent or repeated
    #[error("Attribute {attr_type:?} must appear exactly once, found {count}")]
    MissingAttribute {
        /// Attribute type
        attr_type: EapAttributeType,
        /// Occurrences found
        count: usize,
    },

    /// Input is not valid hex or has the wrong size
    #[error("Invalid hex in {field}: {reason}")]
    InvalidHex {
        /// Which input was rejected
        field: &'static str,
        /// Why
        reason: String,
    },

    /// IMSI or realm rejected
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Oracle or identity source could not serve the request
    #[error("Authentication oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// AT_MAC of the challenge does not verify
    #[error("AT_MAC of the challenge does not verify")]
    MacMismatch,

    /// Encoder and decoder disagree about a message built locally
    #[error("Internal codec invariant violated: {0}")]
    InternalCodecInvariantViolation(String),
}

/// Result type for EAP-AKA peer operations
pub type Result<T> = std::result::Result<T, AkaError>;
