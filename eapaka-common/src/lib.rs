//! Common types and utilities for eapaka
//!
//! This crate provides the client configuration, logging setup and the
//! shared error type used across all eapaka crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    load_client_config, load_client_config_from_str, validate_client_config, ClientConfig,
    OpType, UsimConfig, DEFAULT_REALM,
};
pub use error::Error;
pub use logging::{
    init_logging, init_logging_with_filter, log_eap_message, Direction, HexDump, LogLevel,
};
