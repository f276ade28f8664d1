//! EAP-AKA peer
//!
//! Answers EAP-AKA challenges (RFC 4187) on behalf of a subscriber:
//!
//! - [`Challenge`]: framed or RAND/AUTN hex input
//! - [`Identity`]: NAI permanent identity feeding key derivation
//! - [`AuthenticationOracle`] / [`IdentitySource`]: the credential holder
//! - [`Authenticator`]: builds the challenge, sync-failure or reject response
//! - [`SoftUsim`]: Milenage-backed oracle for local use and tests
//!
//! # Example
//!
//! ```rust
//! use eapaka_client::{Authenticator, Challenge, SoftUsim, StaticImsi};
//!
//! let key = [0x46; 16];
//! let opc = [0xcd; 16];
//! let usim = SoftUsim::new("001010000000001", &key, &opc, [0; 6]);
//! let auth = Authenticator::new(usim, StaticImsi::new("001010000000001"), "nai.epc");
//!
//! // A random AUTN does not carry a valid MAC-A, so the peer rejects it
//! let challenge = Challenge::new(1, [0x23; 16], [0x55; 16]);
//! let outcome = auth.respond(&challenge).unwrap();
//! assert_eq!(outcome.kind(), "authentication-reject");
//! ```

pub mod challenge;
pub mod error;
pub mod identity;
pub mod oracle;
pub mod response;
pub mod usim;

pub use challenge::{Challenge, AUTN_SIZE, RAND_SIZE};
pub use error::{AkaError, Result};
pub use identity::Identity;
pub use oracle::{
    AkaSecrets, AuthenticationOracle, IdentitySource, OracleError, OracleResult, StaticImsi,
    AUTS_SIZE,
};
pub use response::{Authenticator, ResponseOutcome};
pub use usim::SoftUsim;
