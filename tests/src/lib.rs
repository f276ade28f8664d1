//! Integration test framework for eapaka
#![allow(missing_docs)]
//!
//! This crate provides test doubles and fixtures for exercising the EAP-AKA
//! peer across crate boundaries.
//!
//! # Components
//!
//! - [`mock_network`] - Network-side authenticator that issues Milenage
//!   challenges and checks the peer's responses
//! - [`test_fixtures`] - Test vectors, configuration helpers and a scripted oracle
//! - [`test_utils`] - Logging setup and small helpers
//!
//! # Test Categories
//!
//! 1. **Challenge/Response** - Full rounds against the software USIM
//! 2. **Synchronization Failure** - AUTS generation and network resync
//! 3. **Malformed Input** - Framing, attribute and hex errors
//! 4. **Concurrency** - Oracle access from several threads

pub mod mock_network;
pub mod test_utils;

pub use mock_network::{MockNetwork, NetworkVerdict};
pub use test_fixtures::{
    client_config, soft_usim, usim_config, ScriptedOracle, IMSI, REALM,
};
pub use test_utils::{hex_array, init_test_logging, TestResult};
