//! HMAC-SHA1-128 message authentication (RFC 4187 Section 10.15)
//!
//! AT_MAC carries the first 128 bits of HMAC-SHA1 keyed with K_aut.

use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// HMAC-SHA1 output size in bytes
pub const HMAC_SHA1_SIZE: usize = 20;

/// Truncated MAC size carried in AT_MAC
pub const MAC_SIZE: usize = 16;

fn keyed(key: &[u8]) -> HmacSha1 {
    // HMAC accepts keys of any size, so this should never fail
    HmacSha1::new_from_slice(key).unwrap_or_else(|_| unreachable!("HMAC accepts keys of any size"))
}

/// Compute full HMAC-SHA1
pub fn hmac_sha1(key: &[u8], input: &[u8]) -> [u8; HMAC_SHA1_SIZE] {
    let mut mac = keyed(key);
    mac.update(input);
    let mut output = [0u8; HMAC_SHA1_SIZE];
    output.copy_from_slice(&mac.finalize().into_bytes());
    output
}

/// Compute HMAC-SHA1 truncated to 128 bits
pub fn hmac_sha1_128(key: &[u8], input: &[u8]) -> [u8; MAC_SIZE] {
    let full = hmac_sha1(key, input);
    let mut output = [0u8; MAC_SIZE];
    output.copy_from_slice(&full[..MAC_SIZE]);
    output
}

/// Verify a 128-bit truncated HMAC-SHA1 tag in constant time
///
/// Tags of any other length are rejected.
pub fn verify_hmac_sha1_128(key: &[u8], input: &[u8], tag: &[u8]) -> bool {
    if tag.len() != MAC_SIZE {
        return false;
    }
    let mut mac = keyed(key);
    mac.update(input);
    mac.verify_truncated_left(tag).is_ok()
}
