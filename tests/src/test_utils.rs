//! Test utility functions for integration tests
//!
//! Provides common utilities for test setup and logging.

use tracing_subscriber::{fmt, EnvFilter};

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests with optional filter
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "info"
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Decode a hex string into a fixed-size array
///
/// Panics on malformed input; only meant for test vectors.
pub fn hex_array<const N: usize>(s: &str) -> [u8; N] {
    let bytes = hex::decode(s).expect("test vector is not valid hex");
    bytes
        .try_into()
        .unwrap_or_else(|v: Vec<u8>| panic!("test vector has {} bytes, expected {N}", v.len()))
}
