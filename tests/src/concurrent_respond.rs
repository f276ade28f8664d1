//! Concurrency integration tests
//!
//! One authenticator shared by several threads: the oracle must never be
//! entered twice at the same time.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use eapaka_client::{
    AkaSecrets, AuthenticationOracle, Authenticator, Challenge, OracleError, OracleResult,
    StaticImsi,
};
use integration_tests::test_fixtures::{CK, IK, RES};
use integration_tests::{hex_array, init_test_logging, TestResult, IMSI, REALM};

const THREADS: usize = 8;
const ROUNDS: usize = 16;

/// Oracle that fails the test if two calls overlap
#[derive(Default)]
struct ExclusiveOracle {
    busy: AtomicBool,
    calls: AtomicUsize,
}

impl AuthenticationOracle for &ExclusiveOracle {
    fn authenticate(
        &mut self,
        _subscriber_context_id: u32,
        rand: &[u8; 16],
        _autn: &[u8; 16],
    ) -> Result<OracleResult, OracleError> {
        assert!(
            !self.busy.swap(true, Ordering::SeqCst),
            "oracle entered concurrently"
        );
        thread::sleep(Duration::from_micros(200));
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.busy.store(false, Ordering::SeqCst);

        // Odd first RAND byte asks for resync so both paths run in parallel
        if rand[0] % 2 == 1 {
            return Ok(OracleResult::SyncFailure { auts: [rand[0]; 14] });
        }
        Ok(OracleResult::Success(AkaSecrets::new(
            hex::decode(RES).map_err(|e| OracleError::Unavailable(e.to_string()))?,
            hex_array(CK),
            hex_array(IK),
        )))
    }
}

#[test]
fn test_oracle_access_is_serialized() -> TestResult {
    init_test_logging();

    let oracle = ExclusiveOracle::default();
    let auth = Authenticator::new(&oracle, StaticImsi::new(IMSI), REALM);

    thread::scope(|s| {
        for t in 0..THREADS {
            let auth = &auth;
            s.spawn(move || {
                for r in 0..ROUNDS {
                    let id = (t * ROUNDS + r) as u8;
                    let challenge = Challenge::new(id, [id; 16], [0x55; 16]);
                    let outcome = auth.respond(&challenge).expect("respond failed");

                    let expected = if id % 2 == 1 { "sync-failure" } else { "success" };
                    assert_eq!(outcome.kind(), expected);
                    assert_eq!(outcome.message()[1], id);
                }
            });
        }
    });

    assert_eq!(oracle.calls.load(Ordering::SeqCst), THREADS * ROUNDS);
    Ok(())
}

#[test]
fn test_parallel_responses_are_identical() -> TestResult {
    let oracle = ExclusiveOracle::default();
    let auth = Authenticator::new(&oracle, StaticImsi::new(IMSI), REALM);
    let challenge = Challenge::new(0x20, [0x20; 16], [0x55; 16]);
    let reference = auth.respond(&challenge)?.message_hex();

    let (auth, challenge) = (&auth, &challenge);
    let results: Vec<String> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(move || auth.respond(challenge).map(|o| o.message_hex())))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    assert!(results.iter().all(|hex| *hex == reference));
    Ok(())
}
