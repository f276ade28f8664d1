//! Challenge/response orchestration
//!
//! [`Authenticator::respond`] runs one EAP-AKA round for the peer:
//!
//! 1. Ask the oracle to authenticate RAND/AUTN
//! 2. On resynchronisation, answer with AKA-Synchronization-Failure (AT_AUTS)
//! 3. On rejection, answer with AKA-Authentication-Reject
//! 4. On success, derive the session keys from the NAI identity, CK and IK,
//!    and answer with AKA-Challenge carrying AT_RES and AT_MAC
//!
//! Keys only live for the duration of one call. Oracle access is serialized
//! through a mutex since the oracle stands for a single credential holder.

use std::sync::Mutex;

use eapaka_common::config::ClientConfig;
use eapaka_common::logging::{log_eap_message, Direction};
use eapaka_crypto::kdf::KeyMaterial;
use eapaka_crypto::mac::MAC_SIZE;
use eapaka_eap::{
    decode_eap_aka, encode_eap_aka_to_vec, security, EapAkaMessage, EapCode, EapError,
};

use crate::challenge::Challenge;
use crate::error::{AkaError, Result};
use crate::identity::Identity;
use crate::oracle::{
    AkaSecrets, AuthenticationOracle, IdentitySource, OracleError, OracleResult, AUTS_SIZE,
};

/// Result of one [`Authenticator::respond`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// EAP-Response/AKA-Challenge
    Success {
        /// Encoded response
        message: Vec<u8>,
        /// RES, CK and IK as returned by the oracle
        secrets: AkaSecrets,
    },
    /// EAP-Response/AKA-Synchronization-Failure
    SyncFailure {
        /// Encoded response
        message: Vec<u8>,
        /// AUTS carried in the response
        auts: [u8; AUTS_SIZE],
    },
    /// EAP-Response/AKA-Authentication-Reject
    AuthenticationReject {
        /// Encoded response
        message: Vec<u8>,
    },
}

impl ResponseOutcome {
    /// Encoded EAP response
    pub fn message(&self) -> &[u8] {
        match self {
            ResponseOutcome::Success { message, .. }
            | ResponseOutcome::SyncFailure { message, .. }
            | ResponseOutcome::AuthenticationReject { message } => message,
        }
    }

    /// Encoded EAP response as lowercase hex
    pub fn message_hex(&self) -> String {
        hex::encode(self.message())
    }

    /// Short name of the outcome for logs and status output
    pub fn kind(&self) -> &'static str {
        match self {
            ResponseOutcome::Success { .. } => "success",
            ResponseOutcome::SyncFailure { .. } => "sync-failure",
            ResponseOutcome::AuthenticationReject { .. } => "authentication-reject",
        }
    }
}

/// Encode a locally built message and check that it decodes back unchanged
fn encode_checked(msg: &EapAkaMessage) -> Result<Vec<u8>> {
    let bytes = encode_eap_aka_to_vec(msg)
        .map_err(|e| AkaError::InternalCodecInvariantViolation(e.to_string()))?;

    match decode_eap_aka(&bytes) {
        Ok(decoded) if decoded == *msg => Ok(bytes),
        Ok(_) => Err(AkaError::InternalCodecInvariantViolation(
            "decoded response differs from the encoded one".to_string(),
        )),
        Err(e) => Err(AkaError::InternalCodecInvariantViolation(e.to_string())),
    }
}

fn seal_failed(e: EapError) -> AkaError {
    AkaError::InternalCodecInvariantViolation(e.to_string())
}

/// EAP-AKA peer bound to one oracle and identity source
pub struct Authenticator<O, I> {
    oracle: Mutex<O>,
    identity_source: I,
    realm: String,
    subscriber_context_id: u32,
    verify_challenge_mac: bool,
}

impl<O, I> Authenticator<O, I>
where
    O: AuthenticationOracle,
    I: IdentitySource,
{
    /// Create an authenticator for the given realm
    pub fn new(oracle: O, identity_source: I, realm: impl Into<String>) -> Self {
        Self {
            oracle: Mutex::new(oracle),
            identity_source,
            realm: realm.into(),
            subscriber_context_id: 0,
            verify_challenge_mac: false,
        }
    }

    /// Create an authenticator from the client configuration
    pub fn from_config(oracle: O, identity_source: I, config: &ClientConfig) -> Self {
        Self::new(oracle, identity_source, config.realm.clone())
            .with_subscriber_context(config.subscriber_context_id)
            .with_mac_verification(config.verify_challenge_mac)
    }

    /// Select the subscriber context handed to the oracle
    pub fn with_subscriber_context(mut self, subscriber_context_id: u32) -> Self {
        self.subscriber_context_id = subscriber_context_id;
        self
    }

    /// Verify AT_MAC of framed challenges before answering
    pub fn with_mac_verification(mut self, enabled: bool) -> Self {
        self.verify_challenge_mac = enabled;
        self
    }

    /// Consume the authenticator and return the oracle
    pub fn into_oracle(self) -> Result<O> {
        self.oracle
            .into_inner()
            .map_err(|_| AkaError::OracleUnavailable("oracle lock poisoned".to_string()))
    }

    fn authenticate(
        &self,
        challenge: &Challenge,
    ) -> Result<std::result::Result<OracleResult, OracleError>> {
        let mut oracle = self
            .oracle
            .lock()
            .map_err(|_| AkaError::OracleUnavailable("oracle lock poisoned".to_string()))?;
        Ok(oracle.authenticate(
            self.subscriber_context_id,
            challenge.rand(),
            challenge.autn(),
        ))
    }

    /// Answer a challenge
    ///
    /// Any failure aborts the whole round; no partial response is returned.
    pub fn respond(&self, challenge: &Challenge) -> Result<ResponseOutcome> {
        let id = challenge.identifier();

        let outcome = match self.authenticate(challenge)? {
            Ok(OracleResult::Success(secrets)) => self.challenge_response(challenge, secrets)?,
            Ok(OracleResult::SyncFailure { auts }) => {
                tracing::warn!(id, "Oracle reported synchronisation failure");
                let msg = EapAkaMessage::synchronization_failure(id, &auts);
                ResponseOutcome::SyncFailure {
                    message: encode_checked(&msg)?,
                    auts,
                }
            }
            Err(OracleError::AuthenticationRejected(reason)) => {
                tracing::warn!(id, %reason, "Oracle rejected AUTN");
                let msg = EapAkaMessage::authentication_reject(EapCode::Response, id);
                ResponseOutcome::AuthenticationReject {
                    message: encode_checked(&msg)?,
                }
            }
            Err(OracleError::Unavailable(reason)) => {
                return Err(AkaError::OracleUnavailable(reason));
            }
        };

        log_eap_message(Direction::Tx, outcome.kind(), outcome.message());
        tracing::info!(id, outcome = outcome.kind(), "EAP-AKA response built");
        Ok(outcome)
    }

    fn challenge_response(
        &self,
        challenge: &Challenge,
        secrets: AkaSecrets,
    ) -> Result<ResponseOutcome> {
        let imsi = self
            .identity_source
            .imsi(self.subscriber_context_id)
            .map_err(|e| AkaError::OracleUnavailable(e.to_string()))?;
        let identity = Identity::build(&imsi, &self.realm)?;
        tracing::debug!(identity = %identity, "Deriving session keys");

        let keys = KeyMaterial::derive(identity.as_bytes(), &secrets.ik, &secrets.ck);

        if self.verify_challenge_mac {
            if let Some(request) = challenge.message() {
                if !security::verify_mac(request, keys.k_aut()) {
                    tracing::warn!(id = challenge.identifier(), "Challenge AT_MAC mismatch");
                    return Err(AkaError::MacMismatch);
                }
            }
        }

        let mut msg = EapAkaMessage::challenge(EapCode::Response, challenge.identifier());
        msg.attributes.put_res(&secrets.res);
        msg.attributes.put_mac(&[0u8; MAC_SIZE]);
        security::seal(&mut msg, keys.k_aut()).map_err(seal_failed)?;

        Ok(ResponseOutcome::Success {
            message: encode_checked(&msg)?,
            secrets,
        })
    }
}
