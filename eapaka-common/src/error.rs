//! Error types for eapaka

use thiserror::Error;

/// Error types shared by the eapaka crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration value failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}
