//! Milenage software USIM
//!
//! Stands in for the hardware credential holder. Implements the USIM side of
//! 3GPP TS 33.102 Section 6.3.3: recover SQN from AUTN, check MAC-A, check
//! SQN freshness, then return RES/CK/IK or an AUTS for resynchronisation.

use eapaka_common::config::{OpType, UsimConfig};
use eapaka_crypto::milenage::{compute_opc, Milenage, AK_SIZE, KEY_SIZE, MAC_SIZE, SQN_SIZE};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::oracle::{
    AkaSecrets, AuthenticationOracle, IdentitySource, OracleError, OracleResult, AUTS_SIZE,
};

/// Largest accepted step between the stored and received SQN
pub const SQN_DELTA: u64 = 1 << 28;

/// AMF used for MAC-S (TS 33.102 Section 6.3.3)
const RESYNC_AMF: [u8; 2] = [0x00, 0x00];

fn sqn_to_u64(sqn: &[u8; SQN_SIZE]) -> u64 {
    sqn.iter().fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
}

/// Constant-time MAC-A comparison
fn mac_matches(expected: &[u8; MAC_SIZE], received: &[u8]) -> bool {
    expected.as_slice().ct_eq(received).into()
}

fn xor6(a: &[u8; SQN_SIZE], b: &[u8; AK_SIZE]) -> [u8; SQN_SIZE] {
    std::array::from_fn(|i| a[i] ^ b[i])
}

/// Software USIM backed by Milenage
pub struct SoftUsim {
    imsi: String,
    milenage: Milenage,
    sqn_ms: [u8; SQN_SIZE],
}

impl SoftUsim {
    /// Create a USIM from K, OPc and the highest SQN accepted so far
    pub fn new(
        imsi: impl Into<String>,
        key: &[u8; KEY_SIZE],
        opc: &[u8; KEY_SIZE],
        sqn_ms: [u8; SQN_SIZE],
    ) -> Self {
        Self {
            imsi: imsi.into(),
            milenage: Milenage::new(key, opc),
            sqn_ms,
        }
    }

    /// Create a USIM from configuration
    pub fn from_config(config: &UsimConfig) -> Self {
        let opc = match config.op_type {
            OpType::Opc => Zeroizing::new(config.op),
            OpType::Op => Zeroizing::new(compute_opc(&config.key, &config.op)),
        };
        Self::new(config.imsi.clone(), &config.key, &opc, config.sqn)
    }

    /// Highest SQN accepted so far
    pub fn sqn(&self) -> [u8; SQN_SIZE] {
        self.sqn_ms
    }

    fn is_fresh(&self, sqn: &[u8; SQN_SIZE]) -> bool {
        let received = sqn_to_u64(sqn);
        let stored = sqn_to_u64(&self.sqn_ms);
        received > stored && received - stored <= SQN_DELTA
    }

    /// AUTS = (SQN_MS xor AK*) || MAC-S
    fn resync_token(&self, rand: &[u8; 16]) -> [u8; AUTS_SIZE] {
        let ak_star = self.milenage.f5_star(rand);
        let mac_s = self.milenage.f1_star(rand, &self.sqn_ms, &RESYNC_AMF);

        let mut auts = [0u8; AUTS_SIZE];
        auts[..SQN_SIZE].copy_from_slice(&xor6(&self.sqn_ms, &ak_star));
        auts[SQN_SIZE..].copy_from_slice(&mac_s);
        auts
    }
}

impl AuthenticationOracle for SoftUsim {
    fn authenticate(
        &mut self,
        _subscriber_context_id: u32,
        rand: &[u8; 16],
        autn: &[u8; 16],
    ) -> Result<OracleResult, OracleError> {
        let vector = self.milenage.f2345(rand);

        // AUTN = SQN xor AK || AMF || MAC-A
        let mut concealed = [0u8; SQN_SIZE];
        concealed.copy_from_slice(&autn[..SQN_SIZE]);
        let sqn = xor6(&concealed, &vector.ak);
        let amf = [autn[6], autn[7]];
        let mac_a = &autn[8..8 + MAC_SIZE];

        if !mac_matches(&self.milenage.f1(rand, &sqn, &amf), mac_a) {
            tracing::warn!("AUTN MAC-A verification failed");
            return Err(OracleError::AuthenticationRejected(
                "MAC-A mismatch".to_string(),
            ));
        }

        if !self.is_fresh(&sqn) {
            tracing::warn!(
                sqn = %hex::encode(sqn),
                sqn_ms = %hex::encode(self.sqn_ms),
                "SQN out of range, requesting resynchronisation"
            );
            return Ok(OracleResult::SyncFailure {
                auts: self.resync_token(rand),
            });
        }

        self.sqn_ms = sqn;
        tracing::debug!(sqn = %hex::encode(sqn), "AUTN accepted");

        Ok(OracleResult::Success(AkaSecrets::new(
            vector.res.to_vec(),
            vector.ck,
            vector.ik,
        )))
    }
}

impl IdentitySource for SoftUsim {
    fn imsi(&self, _subscriber_context_id: u32) -> Result<String, OracleError> {
        Ok(self.imsi.clone())
    }
}
