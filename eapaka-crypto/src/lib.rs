//! Cryptographic algorithms for eapaka
//!
//! Implements the primitives behind EAP-AKA (RFC 4187):
//! - Master key computation and the FIPS 186-2 PRF key expansion
//! - HMAC-SHA1-128 for AT_MAC
//! - Milenage (3GPP TS 35.206) for the software USIM

pub mod kdf;
pub mod mac;
pub mod milenage;

pub use kdf::{derive_master_key, fips186_2_prf, KeyMaterial, MasterKey};
pub use mac::{hmac_sha1_128, verify_hmac_sha1_128, MAC_SIZE};
pub use milenage::{compute_opc, AkaVector, Milenage};
