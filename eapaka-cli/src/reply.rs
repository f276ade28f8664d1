//! JSON replies printed on stdout

use eapaka_client::{AkaError, ResponseOutcome};
use serde::Serialize;

/// Reply to a framed challenge
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ChallengeReply {
    /// "ok" or "error"
    pub status: &'static str,
    /// Response frame as hex, or the error text
    pub response: String,
}

impl ChallengeReply {
    pub fn from_result(result: &Result<ResponseOutcome, AkaError>) -> Self {
        match result {
            Ok(outcome) => Self {
                status: "ok",
                response: outcome.message_hex(),
            },
            Err(e) => Self {
                status: "error",
                response: e.to_string(),
            },
        }
    }
}

/// Reply to a RAND/AUTN query
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum VectorReply {
    Keys { res: String, ck: String, ik: String },
    Resync { auts: String },
    Error { error: String },
}

impl VectorReply {
    pub fn from_result(result: &Result<ResponseOutcome, AkaError>) -> Self {
        match result {
            Ok(ResponseOutcome::Success { secrets, .. }) => VectorReply::Keys {
                res: hex::encode(&secrets.res),
                ck: hex::encode(secrets.ck),
                ik: hex::encode(secrets.ik),
            },
            Ok(ResponseOutcome::SyncFailure { auts, .. }) => VectorReply::Resync {
                auts: hex::encode(auts),
            },
            Ok(ResponseOutcome::AuthenticationReject { .. }) => VectorReply::Error {
                error: "authentication rejected".to_string(),
            },
            Err(e) => VectorReply::Error {
                error: e.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, VectorReply::Error { .. })
    }
}

#[derive(Debug, Serialize)]
pub struct ImsiReply {
    pub imsi: String,
}

#[derive(Debug, Serialize)]
pub struct InfoReply {
    pub name: &'static str,
    pub version: &'static str,
}
