//! Authentication oracle and identity source seams
//!
//! The AKA algorithm itself (AUTN check, RES/CK/IK generation) runs on a
//! credential holder outside this crate: a UICC, a remote service, or the
//! [`SoftUsim`](crate::SoftUsim) in tests and local runs. The peer only talks
//! to it through these traits.

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// CK / IK size in bytes
pub const CK_IK_SIZE: usize = 16;

/// AUTS size in bytes
pub use eapaka_eap::AUTS_SIZE;

/// RES, CK and IK returned by a successful authentication
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AkaSecrets {
    /// Authentication response, length depends on the algorithm
    pub res: Vec<u8>,
    /// Cipher key
    pub ck: [u8; CK_IK_SIZE],
    /// Integrity key
    pub ik: [u8; CK_IK_SIZE],
}

impl AkaSecrets {
    /// Create a new set of secrets
    pub fn new(res: Vec<u8>, ck: [u8; CK_IK_SIZE], ik: [u8; CK_IK_SIZE]) -> Self {
        Self { res, ck, ik }
    }
}

impl fmt::Debug for AkaSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AkaSecrets")
            .field("res_len", &self.res.len())
            .finish_non_exhaustive()
    }
}

/// Outcome of one oracle invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleResult {
    /// AUTN accepted
    Success(AkaSecrets),
    /// SQN out of range; AUTS lets the network resynchronise
    SyncFailure {
        /// Resynchronisation token
        auts: [u8; AUTS_SIZE],
    },
}

/// Oracle failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    /// Credential holder could not be reached or failed
    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
    /// AUTN did not verify
    #[error("Authentication rejected: {0}")]
    AuthenticationRejected(String),
}

/// Runs the AKA algorithm for a RAND/AUTN pair
pub trait AuthenticationOracle {
    /// Authenticate a challenge for the given subscriber context
    fn authenticate(
        &mut self,
        subscriber_context_id: u32,
        rand: &[u8; 16],
        autn: &[u8; 16],
    ) -> Result<OracleResult, OracleError>;
}

/// Supplies the IMSI of the active subscription
pub trait IdentitySource {
    /// IMSI digit string for the given subscriber context
    fn imsi(&self, subscriber_context_id: u32) -> Result<String, OracleError>;
}

/// Identity source returning a configured IMSI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticImsi(String);

impl StaticImsi {
    /// Create a new static identity source
    pub fn new(imsi: impl Into<String>) -> Self {
        Self(imsi.into())
    }
}

impl IdentitySource for StaticImsi {
    fn imsi(&self, _subscriber_context_id: u32) -> Result<String, OracleError> {
        Ok(self.0.clone())
    }
}

impl<T: AuthenticationOracle + ?Sized> AuthenticationOracle for Box<T> {
    fn authenticate(
        &mut self,
        subscriber_context_id: u32,
        rand: &[u8; 16],
        autn: &[u8; 16],
    ) -> Result<OracleResult, OracleError> {
        (**self).authenticate(subscriber_context_id, rand, autn)
    }
}

impl<T: IdentitySource + ?Sized> IdentitySource for &T {
    fn imsi(&self, subscriber_context_id: u32) -> Result<String, OracleError> {
        (**self).imsi(subscriber_context_id)
    }
}
