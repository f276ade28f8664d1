//! Key derivation for EAP-AKA
//!
//! Implements the key hierarchy of RFC 4187 Section 7:
//!
//! ```text
//! MK = SHA1(Identity | IK | CK)
//! K_encr | K_aut | MSK | EMSK = PRF(MK)
//! ```
//!
//! The PRF is the FIPS 186-2 (change notice 1) random number generator with
//! `XSEED_j = 0`. Its `G` function is the bare SHA-1 compression function
//! applied to the 160-bit `XVAL` zero-padded to one 512-bit block, without the
//! usual SHA-1 length padding.

use sha1::{Digest, Sha1};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// SHA-1 output size in bytes
pub const SHA1_DIGEST_SIZE: usize = 20;

/// Size of K_encr and K_aut in bytes
pub const KEY_128_SIZE: usize = 16;

/// Size of the MSK in bytes
pub const MSK_SIZE: usize = 64;

/// Size of the EMSK in bytes
pub const EMSK_SIZE: usize = 64;

/// Bytes of PRF output consumed by EAP-AKA
pub const KEY_STREAM_SIZE: usize = 2 * KEY_128_SIZE + MSK_SIZE + EMSK_SIZE;

/// SHA-1 block size in bytes
const SHA1_BLOCK_SIZE: usize = 64;

/// SHA-1 initial hash value, used as `t` in the FIPS 186-2 `G` function
const SHA1_IV: [u32; 5] = [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476, 0xC3D2_E1F0];

/// EAP-AKA master key (MK), wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; SHA1_DIGEST_SIZE]);

impl MasterKey {
    /// Wrap a raw 160-bit master key
    pub fn from_bytes(bytes: [u8; SHA1_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw master key bytes
    pub fn as_bytes(&self) -> &[u8; SHA1_DIGEST_SIZE] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(<redacted>)")
    }
}

/// Derive MK from the identity and the AKA keys (RFC 4187 Section 7)
///
/// # Arguments
/// * `identity` - Identity bytes exactly as used in the EAP exchange
/// * `ik` - 128-bit Integrity Key from AKA
/// * `ck` - 128-bit Cipher Key from AKA
pub fn derive_master_key(
    identity: &[u8],
    ik: &[u8; KEY_128_SIZE],
    ck: &[u8; KEY_128_SIZE],
) -> MasterKey {
    let mut hasher = Sha1::new();
    hasher.update(identity);
    hasher.update(ik);
    hasher.update(ck);
    let mut mk = [0u8; SHA1_DIGEST_SIZE];
    mk.copy_from_slice(&hasher.finalize());
    MasterKey(mk)
}

/// FIPS 186-2 `G(t, c)`: one SHA-1 compression of `c` padded with zeros
fn g_function(xval: &[u8; SHA1_DIGEST_SIZE]) -> [u8; SHA1_DIGEST_SIZE] {
    let mut state = SHA1_IV;
    let mut block = [0u8; SHA1_BLOCK_SIZE];
    block[..SHA1_DIGEST_SIZE].copy_from_slice(xval);
    sha1::compress(&mut state, &[block.into()]);
    block.zeroize();

    let mut w = [0u8; SHA1_DIGEST_SIZE];
    for (chunk, word) in w.chunks_exact_mut(4).zip(state.iter()) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    state.zeroize();
    w
}

/// `XKEY = (1 + XKEY + w) mod 2^160`, big-endian
fn advance_xkey(xkey: &mut [u8; SHA1_DIGEST_SIZE], w: &[u8; SHA1_DIGEST_SIZE]) {
    let mut carry: u16 = 1;
    for i in (0..SHA1_DIGEST_SIZE).rev() {
        let sum = u16::from(xkey[i]) + u16::from(w[i]) + carry;
        xkey[i] = sum as u8;
        carry = sum >> 8;
    }
}

/// Expand a 160-bit seed with the FIPS 186-2 PRF
///
/// Fills `output` completely; each `G` invocation contributes 20 bytes, and a
/// trailing partial block is truncated.
pub fn fips186_2_prf(seed: &MasterKey, output: &mut [u8]) {
    let mut xkey = seed.0;

    for chunk in output.chunks_mut(SHA1_DIGEST_SIZE) {
        let mut w = g_function(&xkey);
        chunk.copy_from_slice(&w[..chunk.len()]);
        advance_xkey(&mut xkey, &w);
        w.zeroize();
    }

    xkey.zeroize();
}

/// Session keys derived for one EAP-AKA exchange, wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    k_encr: [u8; KEY_128_SIZE],
    k_aut: [u8; KEY_128_SIZE],
    msk: [u8; MSK_SIZE],
    emsk: [u8; EMSK_SIZE],
}

impl KeyMaterial {
    /// Derive the full key set from the identity, IK and CK
    pub fn derive(identity: &[u8], ik: &[u8; KEY_128_SIZE], ck: &[u8; KEY_128_SIZE]) -> Self {
        let mk = derive_master_key(identity, ik, ck);
        Self::from_master_key(&mk)
    }

    /// Expand an existing master key into the key set
    pub fn from_master_key(mk: &MasterKey) -> Self {
        let mut stream = [0u8; KEY_STREAM_SIZE];
        fips186_2_prf(mk, &mut stream);

        let mut keys = Self {
            k_encr: [0u8; KEY_128_SIZE],
            k_aut: [0u8; KEY_128_SIZE],
            msk: [0u8; MSK_SIZE],
            emsk: [0u8; EMSK_SIZE],
        };
        let (k_encr, rest) = stream.split_at(KEY_128_SIZE);
        let (k_aut, rest) = rest.split_at(KEY_128_SIZE);
        let (msk, emsk) = rest.split_at(MSK_SIZE);
        keys.k_encr.copy_from_slice(k_encr);
        keys.k_aut.copy_from_slice(k_aut);
        keys.msk.copy_from_slice(msk);
        keys.emsk.copy_from_slice(emsk);

        stream.zeroize();
        keys
    }

    /// Encryption key for AT_ENCR_DATA
    pub fn k_encr(&self) -> &[u8; KEY_128_SIZE] {
        &self.k_encr
    }

    /// Authentication key for AT_MAC
    pub fn k_aut(&self) -> &[u8; KEY_128_SIZE] {
        &self.k_aut
    }

    /// Master Session Key
    pub fn msk(&self) -> &[u8; MSK_SIZE] {
        &self.msk
    }

    /// Extended Master Session Key
    pub fn emsk(&self) -> &[u8; EMSK_SIZE] {
        &self.emsk
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}
