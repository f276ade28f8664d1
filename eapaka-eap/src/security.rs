//! AT_MAC message protection (RFC 4187 Section 10.15)
//!
//! The MAC covers the whole EAP packet as it appears on the wire, with the
//! value field of AT_MAC set to zero. The attribute header and reserved
//! bytes take part unchanged.

use eapaka_crypto::mac::{hmac_sha1_128, verify_hmac_sha1_128, MAC_SIZE};

use crate::eap::{encode_eap_aka_to_vec, EapAkaMessage, EapError};

/// Encode `msg` with a zeroed AT_MAC value
fn mac_input(msg: &EapAkaMessage) -> Result<Vec<u8>, EapError> {
    let mut zeroed = msg.clone();
    if !zeroed.attributes.replace_mac(&[0u8; MAC_SIZE]) {
        return Err(EapError::MissingMac);
    }
    encode_eap_aka_to_vec(&zeroed)
}

/// Compute the AT_MAC value of a message
///
/// Whatever the AT_MAC attribute currently holds is ignored.
///
/// # Errors
///
/// Returns [`EapError::MissingMac`] if the message has no AT_MAC attribute,
/// or the encoding error if the message cannot be encoded.
pub fn compute_mac(msg: &EapAkaMessage, k_aut: &[u8]) -> Result<[u8; MAC_SIZE], EapError> {
    let input = mac_input(msg)?;
    Ok(hmac_sha1_128(k_aut, &input))
}

/// Compute the MAC and write it into the message's AT_MAC attribute
pub fn seal(msg: &mut EapAkaMessage, k_aut: &[u8]) -> Result<[u8; MAC_SIZE], EapError> {
    let mac = compute_mac(msg, k_aut)?;
    msg.attributes.replace_mac(&mac);
    Ok(mac)
}

/// Verify the AT_MAC value carried by a message in constant time
///
/// A message without AT_MAC, or one that cannot be re-encoded, does not
/// verify.
pub fn verify_mac(msg: &EapAkaMessage, k_aut: &[u8]) -> bool {
    let Some(received) = msg.attributes.get_mac() else {
        return false;
    };
    match mac_input(msg) {
        Ok(input) => verify_hmac_sha1_128(k_aut, &input, received),
        Err(_) => false,
    }
}
