//! Cryptography provider interface for the bounty claim covenant.
//!
//! Consensus code must depend only on this narrow interface. The hash
//! primitives and the curve are fixed by the host ledger: SHA-256,
//! RIPEMD-160 and ECDSA over secp256k1.

use sha2::{Digest, Sha256};

pub trait CryptoProvider {
    fn sha256(&self, input: &[u8]) -> Result<[u8; 32], String>;
    fn ripemd160(&self, input: &[u8]) -> Result<[u8; 20], String>;

    /// Verifies a strict-DER ECDSA signature (no sighash byte) over `digest32`.
    ///
    /// `Ok(false)` means the inputs were well-formed for the call but do not
    /// verify, including unparsable keys or signatures. `Err` is reserved for
    /// provider faults.
    fn verify_ecdsa_secp256k1(
        &self,
        pubkey: &[u8],
        sig_der: &[u8],
        digest32: &[u8; 32],
        require_low_s: bool,
    ) -> Result<bool, String>;

    fn sha256d(&self, input: &[u8]) -> Result<[u8; 32], String> {
        let first = self.sha256(input)?;
        self.sha256(&first)
    }

    /// RIPEMD-160 of SHA-256, the ledger's public key commitment.
    fn hash160(&self, input: &[u8]) -> Result<[u8; 20], String> {
        let first = self.sha256(input)?;
        self.ripemd160(&first)
    }
}

/// Plain SHA-256 for callers that have no provider at hand (txids, tests).
pub fn sha256(input: &[u8]) -> [u8; 32] {
    let mut h = Sha256::new();
    h.update(input);
    let out = h.finalize();
    let mut r = [0u8; 32];
    r.copy_from_slice(&out);
    r
}

pub fn sha256d(input: &[u8]) -> [u8; 32] {
    sha256(&sha256(input))
}

pub fn ripemd160(input: &[u8]) -> [u8; 20] {
    use ripemd::Ripemd160;
    let mut h = Ripemd160::new();
    h.update(input);
    let out = h.finalize();
    let mut r = [0u8; 20];
    r.copy_from_slice(&out);
    r
}

pub fn hash160(input: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(input))
}

#[cfg(feature = "secp256k1-provider")]
mod secp256k1_provider;
#[cfg(feature = "secp256k1-provider")]
pub use secp256k1_provider::Secp256k1Provider;
