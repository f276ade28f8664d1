//! Permanent identity (NAI) construction
//!
//! The EAP-AKA permanent identity is `"0" <IMSI> "@" <realm>`; the leading
//! digit selects EAP-AKA (3GPP TS 23.003 Section 19.3.2).

use std::fmt;

use crate::error::{AkaError, Result};

/// Leading identity digit for EAP-AKA permanent identities
pub const AKA_PERMANENT_PREFIX: char = '0';

/// Shortest accepted IMSI
pub const IMSI_MIN_DIGITS: usize = 6;

/// Longest accepted IMSI
pub const IMSI_MAX_DIGITS: usize = 15;

/// NAI identity used as key derivation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity(String);

impl Identity {
    /// Build `"0" + imsi + "@" + realm`
    pub fn build(imsi: &str, realm: &str) -> Result<Self> {
        if !(IMSI_MIN_DIGITS..=IMSI_MAX_DIGITS).contains(&imsi.len()) {
            return Err(AkaError::InvalidIdentity(format!(
                "IMSI must have {IMSI_MIN_DIGITS} to {IMSI_MAX_DIGITS} digits, got {}",
                imsi.len()
            )));
        }
        if !imsi.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AkaError::InvalidIdentity(
                "IMSI must contain decimal digits only".to_string(),
            ));
        }
        if realm.is_empty() {
            return Err(AkaError::InvalidIdentity("realm must not be empty".to_string()));
        }

        Ok(Self(format!("{AKA_PERMANENT_PREFIX}{imsi}@{realm}")))
    }

    /// Identity as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Identity bytes as hashed into MK
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
