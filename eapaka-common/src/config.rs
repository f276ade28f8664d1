//! Client configuration
//!
//! The configuration selects the NAI realm, the oracle subscriber context
//! and, for the software USIM, the subscription credentials. Byte-valued
//! credentials are written as hex strings in YAML:
//!
//! ```yaml
//! realm: nai.epc
//! verify_challenge_mac: true
//! usim:
//!   imsi: "001010000000001"
//!   key: "465b5ce8b199b49faa5f0a2ee238a6bc"
//!   op: "cdc202d5123e20f62b6d676ac72cb318"
//!   op_type: op
//!   sqn: "ff9bb4d0b606"
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::logging::LogLevel;

/// Realm used when the configuration does not name one.
pub const DEFAULT_REALM: &str = "nai.epc";

/// Operator key type for the software USIM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    /// Operator key (OP) - converted to OPc when the USIM is created
    Op,
    /// Operator key derived (OPc) - used directly
    #[default]
    Opc,
}

/// Subscription parameters of the Milenage software USIM.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsimConfig {
    /// IMSI digit string (6-15 digits)
    pub imsi: String,
    /// Subscriber key K (128-bit)
    #[serde(with = "hex::serde")]
    pub key: [u8; 16],
    /// Operator key OP or OPc (128-bit)
    #[serde(with = "hex::serde")]
    pub op: [u8; 16],
    /// Type of operator key (OP or OPc)
    #[serde(default)]
    pub op_type: OpType,
    /// Highest sequence number accepted so far (48-bit)
    #[serde(with = "hex::serde", default)]
    pub sqn: [u8; 6],
}

impl fmt::Debug for UsimConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsimConfig")
            .field("imsi", &self.imsi)
            .field("key", &"<redacted>")
            .field("op", &"<redacted>")
            .field("op_type", &self.op_type)
            .field("sqn", &hex::encode(self.sqn))
            .finish()
    }
}

/// EAP-AKA client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Realm appended to the NAI identity
    #[serde(default = "default_realm")]
    pub realm: String,
    /// Opaque subscriber context selector handed to the oracle
    #[serde(default)]
    pub subscriber_context_id: u32,
    /// Verify AT_MAC of framed challenges before answering
    #[serde(default)]
    pub verify_challenge_mac: bool,
    /// Log level for the binary
    #[serde(default)]
    pub log_level: LogLevel,
    /// Software USIM parameters
    pub usim: UsimConfig,
}

fn default_realm() -> String {
    DEFAULT_REALM.to_string()
}

/// Loads a client configuration from a YAML file.
///
/// Call [`validate_client_config`] afterwards for semantic checks.
pub fn load_client_config<P: AsRef<Path>>(path: P) -> Result<ClientConfig, Error> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_client_config_from_str(&contents)
}

/// Loads a client configuration from a YAML string.
pub fn load_client_config_from_str(yaml: &str) -> Result<ClientConfig, Error> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Validates a client configuration.
///
/// # Validation Rules
///
/// - realm must not be empty
/// - IMSI must be 6-15 decimal digits
/// - subscriber key K must not be all zeros
pub fn validate_client_config(config: &ClientConfig) -> Result<(), Error> {
    if config.realm.is_empty() {
        return Err(Error::Config("realm must not be empty".to_string()));
    }

    let imsi = &config.usim.imsi;
    if !(6..=15).contains(&imsi.len()) || !imsi.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Config(format!(
            "IMSI '{imsi}' must be 6 to 15 decimal digits"
        )));
    }

    if config.usim.key.iter().all(|&b| b == 0) {
        return Err(Error::Config(
            "Subscriber key K cannot be all zeros".to_string(),
        ));
    }

    Ok(())
}
