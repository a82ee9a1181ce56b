use secp256k1::{ecdsa, Message, PublicKey, Secp256k1, VerifyOnly};

use crate::CryptoProvider;

/// Software provider backed by libsecp256k1.
pub struct Secp256k1Provider {
    secp: Secp256k1<VerifyOnly>,
}

impl Secp256k1Provider {
    pub fn new() -> Self {
        Self {
            secp: Secp256k1::verification_only(),
        }
    }
}

impl Default for Secp256k1Provider {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for Secp256k1Provider {
    fn sha256(&self, input: &[u8]) -> Result<[u8; 32], String> {
        Ok(crate::sha256(input))
    }

    fn ripemd160(&self, input: &[u8]) -> Result<[u8; 20], String> {
        Ok(crate::ripemd160(input))
    }

    fn verify_ecdsa_secp256k1(
        &self,
        pubkey: &[u8],
        sig_der: &[u8],
        digest32: &[u8; 32],
        require_low_s: bool,
    ) -> Result<bool, String> {
        let Ok(pk) = PublicKey::from_slice(pubkey) else {
            log::trace!("secp256k1: public key does not parse");
            return Ok(false);
        };
        let Ok(mut sig) = ecdsa::Signature::from_der(sig_der) else {
            log::trace!("secp256k1: signature is not strict DER");
            return Ok(false);
        };

        // libsecp256k1 only accepts low-S; the ledger accepts both unless told otherwise.
        let original = sig;
        sig.normalize_s();
        if require_low_s && sig != original {
            return Ok(false);
        }

        let msg = Message::from_digest(*digest32);
        Ok(self.secp.verify_ecdsa(&msg, &sig, &pk).is_ok())
    }
}
