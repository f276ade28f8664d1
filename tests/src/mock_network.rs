//! Mock network authenticator for integration testing
//!
//! Plays the server side of EAP-AKA against the peer: issues Milenage
//! challenges with a sealed AT_MAC, checks the peer's RES and AT_MAC, and
//! recovers from synchronisation failures the way an HSS would.

use eapaka_crypto::kdf::KeyMaterial;
use eapaka_crypto::milenage::{Milenage, AMF_SIZE, KEY_SIZE, SQN_SIZE};
use eapaka_eap::{
    decode_eap_aka, encode_eap_aka_to_vec, security, EapAkaMessage, EapAkaSubType, EapCode,
    EapError, AUTS_SIZE,
};
use thiserror::Error;

/// AMF used for resynchronisation MAC-S
const RESYNC_AMF: [u8; AMF_SIZE] = [0, 0];

/// Mock network errors
#[derive(Debug, Error)]
pub enum MockNetworkError {
    #[error("No challenge outstanding")]
    NoPendingChallenge,
    #[error("Identifier mismatch: expected {expected}, got {actual}")]
    IdentifierMismatch { expected: u8, actual: u8 },
    #[error("Unexpected message: {0}")]
    UnexpectedMessage(String),
    #[error("Codec error: {0}")]
    Codec(#[from] EapError),
}

/// Network decision on a peer response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkVerdict {
    /// RES and AT_MAC verified
    Authenticated {
        /// Session key shared with the peer
        msk: Vec<u8>,
    },
    /// RES or AT_MAC did not verify
    Failed(String),
    /// AUTS verified, SQN moved past the peer's SQN_MS
    Resynchronised {
        /// SQN recovered from AUTS
        sqn_ms: [u8; SQN_SIZE],
    },
    /// Peer refused the AUTN
    Rejected,
}

/// Challenge waiting for a response
struct PendingChallenge {
    id: u8,
    rand: [u8; 16],
    xres: Vec<u8>,
    keys: KeyMaterial,
}

/// Network-side EAP-AKA authenticator for one subscriber
pub struct MockNetwork {
    identity: String,
    milenage: Milenage,
    amf: [u8; AMF_SIZE],
    sqn: u64,
    pending: Option<PendingChallenge>,
}

impl MockNetwork {
    /// Create a network holding the subscriber's K and OPc
    ///
    /// `sqn` is the next sequence number put into an AUTN.
    pub fn new(
        imsi: &str,
        realm: &str,
        key: &[u8; KEY_SIZE],
        opc: &[u8; KEY_SIZE],
        amf: [u8; AMF_SIZE],
        sqn: [u8; SQN_SIZE],
    ) -> Self {
        Self {
            identity: format!("0{imsi}@{realm}"),
            milenage: Milenage::new(key, opc),
            amf,
            sqn: sqn_to_u64(&sqn),
            pending: None,
        }
    }

    /// Next SQN the network will use
    pub fn sqn(&self) -> [u8; SQN_SIZE] {
        u64_to_sqn(self.sqn)
    }

    /// Build an EAP-Request/AKA-Challenge for `rand`
    pub fn next_challenge(&mut self, id: u8, rand: [u8; 16]) -> Result<Vec<u8>, MockNetworkError> {
        let sqn = u64_to_sqn(self.sqn);
        self.sqn += 1;

        let vector = self.milenage.f2345(&rand);
        let mac_a = self.milenage.f1(&rand, &sqn, &self.amf);

        let mut autn = [0u8; 16];
        autn[..SQN_SIZE].copy_from_slice(&xor_sqn(&sqn, &vector.ak));
        autn[6..8].copy_from_slice(&self.amf);
        autn[8..].copy_from_slice(&mac_a);

        let keys = KeyMaterial::derive(self.identity.as_bytes(), &vector.ik, &vector.ck);

        let mut msg = EapAkaMessage::challenge(EapCode::Request, id);
        msg.attributes.put_rand(&rand);
        msg.attributes.put_autn(&autn);
        msg.attributes.put_mac(&[0u8; 16]);
        security::seal(&mut msg, keys.k_aut())?;

        self.pending = Some(PendingChallenge {
            id,
            rand,
            xres: vector.res.to_vec(),
            keys,
        });

        Ok(encode_eap_aka_to_vec(&msg)?)
    }

    /// Check the peer's response to the outstanding challenge
    pub fn verify_response(&mut self, frame: &[u8]) -> Result<NetworkVerdict, MockNetworkError> {
        let msg = decode_eap_aka(frame)?;
        let pending = self.pending.take().ok_or(MockNetworkError::NoPendingChallenge)?;

        if msg.code != EapCode::Response {
            return Err(MockNetworkError::UnexpectedMessage(format!("{:?}", msg.code)));
        }
        if msg.id != pending.id {
            return Err(MockNetworkError::IdentifierMismatch {
                expected: pending.id,
                actual: msg.id,
            });
        }

        match msg.sub_type {
            EapAkaSubType::AkaChallenge => {
                if msg.attributes.get_res() != Some(pending.xres.as_slice()) {
                    return Ok(NetworkVerdict::Failed("RES mismatch".to_string()));
                }
                if !security::verify_mac(&msg, pending.keys.k_aut()) {
                    return Ok(NetworkVerdict::Failed("AT_MAC mismatch".to_string()));
                }
                Ok(NetworkVerdict::Authenticated {
                    msk: pending.keys.msk().to_vec(),
                })
            }
            EapAkaSubType::AkaSynchronizationFailure => {
                let auts: [u8; AUTS_SIZE] = msg
                    .attributes
                    .get_auts()
                    .and_then(|v| v.try_into().ok())
                    .ok_or_else(|| MockNetworkError::UnexpectedMessage("no AT_AUTS".to_string()))?;
                self.resynchronise(&pending.rand, &auts)
            }
            EapAkaSubType::AkaAuthenticationReject => Ok(NetworkVerdict::Rejected),
            other => Err(MockNetworkError::UnexpectedMessage(format!("{other:?}"))),
        }
    }

    fn resynchronise(
        &mut self,
        rand: &[u8; 16],
        auts: &[u8; AUTS_SIZE],
    ) -> Result<NetworkVerdict, MockNetworkError> {
        let ak_star = self.milenage.f5_star(rand);
        let mut concealed = [0u8; SQN_SIZE];
        concealed.copy_from_slice(&auts[..SQN_SIZE]);
        let sqn_ms = xor_sqn(&concealed, &ak_star);

        let mac_s = self.milenage.f1_star(rand, &sqn_ms, &RESYNC_AMF);
        if mac_s.as_slice() != &auts[SQN_SIZE..] {
            return Ok(NetworkVerdict::Failed("MAC-S mismatch".to_string()));
        }

        self.sqn = sqn_to_u64(&sqn_ms) + 1;
        Ok(NetworkVerdict::Resynchronised { sqn_ms })
    }
}

fn xor_sqn(a: &[u8; SQN_SIZE], b: &[u8; SQN_SIZE]) -> [u8; SQN_SIZE] {
    let mut out = [0u8; SQN_SIZE];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b)) {
        *o = x ^ y;
    }
    out
}

fn sqn_to_u64(sqn: &[u8; SQN_SIZE]) -> u64 {
    sqn.iter().fold(0, |acc, b| (acc << 8) | u64::from(*b))
}

fn u64_to_sqn(value: u64) -> [u8; SQN_SIZE] {
    let mut sqn = [0u8; SQN_SIZE];
    sqn.copy_from_slice(&value.to_be_bytes()[2..]);
    sqn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{AUTN, CHALLENGE_WITH_MAC, IMSI, K, NETWORK_SQN, OPC, RAND, REALM};
    use crate::test_utils::hex_array;

    fn network() -> MockNetwork {
        MockNetwork::new(
            IMSI,
            REALM,
            &hex_array(K),
            &hex_array(OPC),
            [0xb9, 0xb9],
            hex_array(NETWORK_SQN),
        )
    }

    #[test]
    fn test_challenge_matches_vector() {
        let mut net = network();
        let frame = net.next_challenge(7, hex_array(RAND)).unwrap();
        assert_eq!(hex::encode(&frame), CHALLENGE_WITH_MAC);

        let msg = decode_eap_aka(&frame).unwrap();
        assert_eq!(hex::encode(msg.attributes.get_autn().unwrap()), AUTN);
    }

    #[test]
    fn test_sqn_advances_per_challenge() {
        let mut net = network();
        net.next_challenge(1, [0x11; 16]).unwrap();
        assert_eq!(hex::encode(net.sqn()), "ff9bb4d0b608");
    }

    #[test]
    fn test_response_without_challenge() {
        let mut net = network();
        let err = net.verify_response(&hex::decode("0204000817020000").unwrap());
        assert!(matches!(err, Err(MockNetworkError::NoPendingChallenge)));
    }

    #[test]
    fn test_identifier_mismatch() {
        let mut net = network();
        net.next_challenge(7, hex_array(RAND)).unwrap();
        let err = net.verify_response(&hex::decode("0204000817020000").unwrap());
        assert!(matches!(
            err,
            Err(MockNetworkError::IdentifierMismatch { expected: 7, actual: 4 })
        ));
    }

    #[test]
    fn test_sqn_conversion() {
        let sqn = hex_array::<6>("ff9bb4d0b607");
        assert_eq!(u64_to_sqn(sqn_to_u64(&sqn)), sqn);
        assert_eq!(sqn_to_u64(&[0, 0, 0, 0, 1, 0]), 256);
    }
}
