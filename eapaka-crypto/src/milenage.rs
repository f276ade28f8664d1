//! Milenage algorithm set (3GPP TS 35.206)
//!
//! Backs the software USIM used in place of a hardware authentication
//! oracle. Provides:
//! - f1 / f1*: network and resynchronisation authentication (MAC-A / MAC-S)
//! - f2 / f3 / f4 / f5: RES, CK, IK and AK
//! - f5*: anonymity key for AUTS
//!
//! All rotations used by Milenage are whole bytes, so the rotation helper
//! works on byte granularity.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes128;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Block size in bytes (128 bits)
pub const BLOCK_SIZE: usize = 16;

/// Key, OP and OPc size in bytes
pub const KEY_SIZE: usize = 16;

/// RAND size in bytes
pub const RAND_SIZE: usize = 16;

/// SQN size in bytes (48 bits)
pub const SQN_SIZE: usize = 6;

/// AMF size in bytes
pub const AMF_SIZE: usize = 2;

/// MAC-A / MAC-S size in bytes
pub const MAC_SIZE: usize = 8;

/// RES size in bytes
pub const RES_SIZE: usize = 8;

/// AK size in bytes
pub const AK_SIZE: usize = 6;

type Block = [u8; BLOCK_SIZE];

const fn constant(last: u8) -> Block {
    let mut c = [0u8; BLOCK_SIZE];
    c[BLOCK_SIZE - 1] = last;
    c
}

const C1: Block = constant(0x00);
const C2: Block = constant(0x01);
const C3: Block = constant(0x02);
const C4: Block = constant(0x04);
const C5: Block = constant(0x08);

/// Rotations r1..r5 in bytes
const R1: usize = 8;
const R2: usize = 0;
const R3: usize = 4;
const R4: usize = 8;
const R5: usize = 12;

fn xor(a: &Block, b: &Block) -> Block {
    let mut out = *a;
    out.iter_mut().zip(b.iter()).for_each(|(x, y)| *x ^= y);
    out
}

fn rotate(block: &Block, bytes: usize) -> Block {
    let mut out = *block;
    out.rotate_left(bytes);
    out
}

fn encrypt(cipher: &Aes128, block: &Block) -> Block {
    let mut ga = GenericArray::clone_from_slice(block);
    cipher.encrypt_block(&mut ga);
    let mut out = [0u8; BLOCK_SIZE];
    out.copy_from_slice(&ga);
    out
}

/// Compute OPc = OP XOR E_K(OP)
pub fn compute_opc(k: &[u8; KEY_SIZE], op: &[u8; KEY_SIZE]) -> [u8; KEY_SIZE] {
    let cipher = Aes128::new(GenericArray::from_slice(k));
    xor(op, &encrypt(&cipher, op))
}

/// Outputs of f2, f3, f4 and f5 for one RAND
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct AkaVector {
    /// f2: RES
    pub res: [u8; RES_SIZE],
    /// f3: cipher key
    pub ck: [u8; KEY_SIZE],
    /// f4: integrity key
    pub ik: [u8; KEY_SIZE],
    /// f5: anonymity key
    pub ak: [u8; AK_SIZE],
}

/// Milenage context bound to one subscriber key and OPc
pub struct Milenage {
    cipher: Aes128,
    opc: Block,
}

impl Milenage {
    /// Create a Milenage instance from K and OPc
    pub fn new(k: &[u8; KEY_SIZE], opc: &[u8; KEY_SIZE]) -> Self {
        Self {
            cipher: Aes128::new(GenericArray::from_slice(k)),
            opc: *opc,
        }
    }

    /// Create a Milenage instance from K and OP
    pub fn new_with_op(k: &[u8; KEY_SIZE], op: &[u8; KEY_SIZE]) -> Self {
        let opc = compute_opc(k, op);
        Self::new(k, &opc)
    }

    /// TEMP = E_K(RAND XOR OPc)
    fn temp(&self, rand: &[u8; RAND_SIZE]) -> Block {
        encrypt(&self.cipher, &xor(rand, &self.opc))
    }

    /// OUT1 = E_K(TEMP XOR rot(IN1 XOR OPc, r1) XOR c1) XOR OPc
    fn out1(&self, rand: &[u8; RAND_SIZE], sqn: &[u8; SQN_SIZE], amf: &[u8; AMF_SIZE]) -> Block {
        let mut in1 = [0u8; BLOCK_SIZE];
        in1[0..6].copy_from_slice(sqn);
        in1[6..8].copy_from_slice(amf);
        in1[8..14].copy_from_slice(sqn);
        in1[14..16].copy_from_slice(amf);

        let block = xor(&xor(&self.temp(rand), &rotate(&xor(&in1, &self.opc), R1)), &C1);
        xor(&encrypt(&self.cipher, &block), &self.opc)
    }

    /// OUTn = E_K(rot(TEMP XOR OPc, rn) XOR cn) XOR OPc, for n = 2..5
    fn out_n(&self, temp: &Block, rotation: usize, c: &Block) -> Block {
        let block = xor(&rotate(&xor(temp, &self.opc), rotation), c);
        xor(&encrypt(&self.cipher, &block), &self.opc)
    }

    /// f1: network authentication code MAC-A
    pub fn f1(&self, rand: &[u8; RAND_SIZE], sqn: &[u8; SQN_SIZE], amf: &[u8; AMF_SIZE]) -> [u8; MAC_SIZE] {
        let out1 = self.out1(rand, sqn, amf);
        let mut mac = [0u8; MAC_SIZE];
        mac.copy_from_slice(&out1[..MAC_SIZE]);
        mac
    }

    /// f1*: resynchronisation authentication code MAC-S
    pub fn f1_star(&self, rand: &[u8; RAND_SIZE], sqn: &[u8; SQN_SIZE], amf: &[u8; AMF_SIZE]) -> [u8; MAC_SIZE] {
        let out1 = self.out1(rand, sqn, amf);
        let mut mac = [0u8; MAC_SIZE];
        mac.copy_from_slice(&out1[MAC_SIZE..]);
        mac
    }

    /// f2, f3, f4, f5: RES, CK, IK and AK
    pub fn f2345(&self, rand: &[u8; RAND_SIZE]) -> AkaVector {
        let temp = self.temp(rand);
        let out2 = self.out_n(&temp, R2, &C2);
        let out3 = self.out_n(&temp, R3, &C3);
        let out4 = self.out_n(&temp, R4, &C4);

        let mut vector = AkaVector {
            res: [0u8; RES_SIZE],
            ck: out3,
            ik: out4,
            ak: [0u8; AK_SIZE],
        };
        vector.res.copy_from_slice(&out2[8..16]);
        vector.ak.copy_from_slice(&out2[..AK_SIZE]);
        vector
    }

    /// f5*: resynchronisation anonymity key AK*
    pub fn f5_star(&self, rand: &[u8; RAND_SIZE]) -> [u8; AK_SIZE] {
        let out5 = self.out_n(&self.temp(rand), R5, &C5);
        let mut ak = [0u8; AK_SIZE];
        ak.copy_from_slice(&out5[..AK_SIZE]);
        ak
    }
}

impl Drop for Milenage {
    fn drop(&mut self) {
        self.opc.zeroize();
    }
}
