//! Challenge/response integration tests
//!
//! Runs full EAP-AKA rounds through the peer: framed and hex challenges,
//! the software USIM, the YAML configuration and the mock network.

use std::path::Path;

use eapaka_client::{AkaError, Authenticator, Challenge, ResponseOutcome, StaticImsi};
use eapaka_common::config::load_client_config;
use eapaka_crypto::KeyMaterial;
use integration_tests::test_fixtures::{
    kat, AUTN, CHALLENGE_NO_MAC, CHALLENGE_RESPONSE, CHALLENGE_WITH_MAC, CK, IK, K, NETWORK_SQN,
    OPC, RAND, RES, SQN_BEHIND,
};
use integration_tests::{
    client_config, hex_array, init_test_logging, soft_usim, MockNetwork, NetworkVerdict,
    ScriptedOracle, TestResult, IMSI, REALM,
};

fn usim_authenticator(
    verify_mac: bool,
) -> Authenticator<eapaka_client::SoftUsim, StaticImsi> {
    let config = client_config(SQN_BEHIND, verify_mac);
    Authenticator::from_config(soft_usim(SQN_BEHIND), StaticImsi::new(IMSI), &config)
}

#[test]
fn test_known_answer_response() -> TestResult {
    init_test_logging();

    let oracle = ScriptedOracle::new().then_succeed(kat::RES, CK, IK);
    let auth = Authenticator::new(oracle, StaticImsi::new(kat::IMSI), REALM);
    let challenge = Challenge::new(kat::IDENTIFIER, [0x01; 16], [0x02; 16]);

    let outcome = auth.respond(&challenge)?;
    assert_eq!(outcome.message_hex(), kat::RESPONSE);

    let keys = KeyMaterial::derive(b"0123456789012345@nai.epc", &hex_array(IK), &hex_array(CK));
    assert_eq!(hex::encode(keys.k_aut()), kat::K_AUT);
    Ok(())
}

#[test]
fn test_framed_challenge_with_soft_usim() -> TestResult {
    init_test_logging();

    let auth = usim_authenticator(false);
    let challenge = Challenge::parse_hex(CHALLENGE_NO_MAC)?;
    assert_eq!(challenge.identifier(), 7);

    let outcome = auth.respond(&challenge)?;
    assert_eq!(outcome.kind(), "success");
    assert_eq!(outcome.message_hex(), CHALLENGE_RESPONSE);

    match outcome {
        ResponseOutcome::Success { secrets, .. } => {
            assert_eq!(hex::encode(&secrets.res), RES);
            assert_eq!(hex::encode(secrets.ck), CK);
            assert_eq!(hex::encode(secrets.ik), IK);
        }
        other => panic!("unexpected outcome {other:?}"),
    }

    let usim = auth.into_oracle()?;
    assert_eq!(hex::encode(usim.sqn()), NETWORK_SQN);
    Ok(())
}

#[test]
fn test_challenge_mac_verified() -> TestResult {
    init_test_logging();

    let auth = usim_authenticator(true);
    let outcome = auth.respond(&Challenge::parse_hex(CHALLENGE_WITH_MAC)?)?;
    assert_eq!(outcome.message_hex(), CHALLENGE_RESPONSE);
    Ok(())
}

#[test]
fn test_challenge_mac_tampered() -> TestResult {
    let auth = usim_authenticator(true);

    let mut frame = hex::decode(CHALLENGE_WITH_MAC)?;
    let last = frame.len() - 1;
    frame[last] ^= 0x01;

    let err = auth.respond(&Challenge::parse(&frame)?).unwrap_err();
    assert_eq!(err, AkaError::MacMismatch);
    Ok(())
}

#[test]
fn test_challenge_without_mac_rejected_when_verifying() -> TestResult {
    let auth = usim_authenticator(true);
    let err = auth.respond(&Challenge::parse_hex(CHALLENGE_NO_MAC)?).unwrap_err();
    assert_eq!(err, AkaError::MacMismatch);
    Ok(())
}

#[test]
fn test_hex_challenge_uses_identifier_zero() -> TestResult {
    let auth = usim_authenticator(true);
    let outcome = auth.respond(&Challenge::from_hex(RAND, AUTN)?)?;

    let frame = outcome.message();
    assert_eq!(frame[0], 2);
    assert_eq!(frame[1], 0);
    assert_eq!(&frame[12..20], hex::decode(RES)?.as_slice());
    Ok(())
}

#[test]
fn test_replayed_challenge_requests_resync() -> TestResult {
    let auth = usim_authenticator(false);
    let challenge = Challenge::parse_hex(CHALLENGE_NO_MAC)?;

    assert_eq!(auth.respond(&challenge)?.kind(), "success");
    assert_eq!(auth.respond(&challenge)?.kind(), "sync-failure");
    Ok(())
}

#[test]
fn test_sample_config_round() -> TestResult {
    init_test_logging();

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../config/client.yaml");
    let config = load_client_config(&path)?;
    assert_eq!(config.realm, REALM);
    assert!(config.verify_challenge_mac);

    let usim = eapaka_client::SoftUsim::from_config(&config.usim);
    let auth = Authenticator::from_config(usim, StaticImsi::new(config.usim.imsi.clone()), &config);

    let outcome = auth.respond(&Challenge::parse_hex(CHALLENGE_WITH_MAC)?)?;
    assert_eq!(outcome.message_hex(), CHALLENGE_RESPONSE);
    Ok(())
}

#[test]
fn test_mock_network_authenticates_peer() -> TestResult {
    init_test_logging();

    let mut network = MockNetwork::new(
        IMSI,
        REALM,
        &hex_array(K),
        &hex_array(OPC),
        [0xb9, 0xb9],
        hex_array(NETWORK_SQN),
    );
    let auth = usim_authenticator(true);

    for (id, rand) in [(7u8, hex_array::<16>(RAND)), (8, [0x5a; 16]), (9, [0xc3; 16])] {
        let request = network.next_challenge(id, rand)?;
        let outcome = auth.respond(&Challenge::parse(&request)?)?;

        let verdict = network.verify_response(outcome.message())?;
        let ResponseOutcome::Success { secrets, .. } = outcome else {
            panic!("round {id} did not succeed");
        };
        let identity = format!("0{IMSI}@{REALM}");
        let keys = KeyMaterial::derive(identity.as_bytes(), &secrets.ik, &secrets.ck);
        assert_eq!(
            verdict,
            NetworkVerdict::Authenticated {
                msk: keys.msk().to_vec()
            }
        );
    }
    Ok(())
}

#[test]
fn test_mock_network_sees_reject_for_forged_autn() -> TestResult {
    let mut network = MockNetwork::new(
        IMSI,
        REALM,
        &hex_array(K),
        &hex_array(OPC),
        [0xb9, 0xb9],
        hex_array(NETWORK_SQN),
    );
    let auth = usim_authenticator(false);

    let request = network.next_challenge(3, hex_array(RAND))?;
    let mut challenge = Challenge::parse(&request)?;
    let mut autn = *challenge.autn();
    autn[15] ^= 0xff;
    challenge = Challenge::new(challenge.identifier(), *challenge.rand(), autn);

    let outcome = auth.respond(&challenge)?;
    assert_eq!(outcome.kind(), "authentication-reject");
    assert_eq!(network.verify_response(outcome.message())?, NetworkVerdict::Rejected);
    Ok(())
}
