use bounty_crypto::CryptoProvider;

use crate::constants::{COMPRESSED_PUBKEY_BYTES, UNCOMPRESSED_PUBKEY_BYTES};
use crate::covenant::{ClaimContract, PubKeyHash};
use crate::error::{ClaimError, ClaimSpendError, ErrorCode, TxError};
use crate::flags::VerifyFlags;
use crate::sighash::{sighash_forkid_digest, SighashType};
use crate::tx::Tx;
use crate::unlocking::parse_claim_unlocking_script;

/// The output being spent, as the validation engine knows it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UtxoEntry {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

/// Everything outside the contract that a signature must cover.
#[derive(Clone, Copy, Debug)]
pub struct SpendContext<'a> {
    tx: &'a Tx,
    input_index: u32,
    amount: u64,
    script_code: &'a [u8],
}

impl<'a> SpendContext<'a> {
    pub fn new(
        tx: &'a Tx,
        input_index: u32,
        amount: u64,
        script_code: &'a [u8],
    ) -> Result<Self, TxError> {
        let in_range = usize::try_from(input_index)
            .map(|i| i < tx.inputs.len())
            .unwrap_or(false);
        if !in_range {
            return Err(TxError::new(
                ErrorCode::TxErrParse,
                "spend context: input_index out of bounds",
            ));
        }
        Ok(Self {
            tx,
            input_index,
            amount,
            script_code,
        })
    }

    pub fn tx(&self) -> &'a Tx {
        self.tx
    }

    pub fn input_index(&self) -> u32 {
        self.input_index
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn script_code(&self) -> &'a [u8] {
        self.script_code
    }

    pub fn sighash(
        &self,
        provider: &dyn CryptoProvider,
        sighash_type: SighashType,
    ) -> Result<[u8; 32], TxError> {
        sighash_forkid_digest(
            provider,
            self.tx,
            self.input_index,
            self.script_code,
            self.amount,
            sighash_type,
        )
    }
}

fn is_pubkey_encoding_valid(pubkey: &[u8], flags: VerifyFlags) -> bool {
    match (pubkey.len(), pubkey.first()) {
        (COMPRESSED_PUBKEY_BYTES, Some(0x02 | 0x03)) => true,
        (UNCOMPRESSED_PUBKEY_BYTES, Some(0x04)) => !flags.require_compressed_pubkey,
        _ => false,
    }
}

/// Evaluates claim attempts against [`ClaimContract`] instances.
///
/// Holds no state of its own beyond the crypto backend and the flags, so a
/// single verifier can be shared and re-run freely.
pub struct ClaimVerifier<'p> {
    provider: &'p dyn CryptoProvider,
    flags: VerifyFlags,
}

impl<'p> ClaimVerifier<'p> {
    pub fn new(provider: &'p dyn CryptoProvider) -> Self {
        Self::with_flags(provider, VerifyFlags::consensus())
    }

    pub fn with_flags(provider: &'p dyn CryptoProvider, flags: VerifyFlags) -> Self {
        Self { provider, flags }
    }

    pub fn flags(&self) -> VerifyFlags {
        self.flags
    }

    /// Decides whether `pubkey`'s owner may take the value locked under `contract`.
    ///
    /// The checks run in a fixed order and the first failure wins:
    /// 1. the bounty must be resolved,
    /// 2. `hash160(pubkey)` must equal the committed winner,
    /// 3. `signature` must be the winner's signature over the spend.
    pub fn claim(
        &self,
        contract: &ClaimContract,
        ctx: &SpendContext<'_>,
        signature: &[u8],
        pubkey: &[u8],
    ) -> Result<(), ClaimError> {
        let res = self.evaluate(contract, ctx, signature, pubkey);
        match res {
            Ok(()) => log::debug!("claim accepted: input={}", ctx.input_index),
            Err(e) => log::debug!("claim rejected: input={} {}", ctx.input_index, e.as_str()),
        }
        res
    }

    fn evaluate(
        &self,
        contract: &ClaimContract,
        ctx: &SpendContext<'_>,
        signature: &[u8],
        pubkey: &[u8],
    ) -> Result<(), ClaimError> {
        if contract.is_open() {
            return Err(ClaimError::BountyNotResolved);
        }

        let presented = match self.provider.hash160(pubkey) {
            Ok(h) => PubKeyHash(h),
            Err(e) => {
                log::warn!("claim: provider hash160 failed: {e}");
                return Err(ClaimError::NotSelectedWinner);
            }
        };
        if presented != contract.winner_commitment() {
            return Err(ClaimError::NotSelectedWinner);
        }

        if !self.check_sig(ctx, signature, pubkey) {
            return Err(ClaimError::BadSignature);
        }
        Ok(())
    }

    fn check_sig(&self, ctx: &SpendContext<'_>, signature: &[u8], pubkey: &[u8]) -> bool {
        let Some((&type_byte, der)) = signature.split_last() else {
            return false;
        };
        let Ok(sighash_type) = SighashType::from_byte(type_byte) else {
            return false;
        };
        if !sighash_type.has_forkid() || der.is_empty() {
            return false;
        }
        if !is_pubkey_encoding_valid(pubkey, self.flags) {
            return false;
        }

        let digest = match ctx.sighash(self.provider, sighash_type) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("claim: sighash failed: {e}");
                return false;
            }
        };
        match self
            .provider
            .verify_ecdsa_secp256k1(pubkey, der, &digest, self.flags.require_low_s)
        {
            Ok(ok) => ok,
            Err(e) => {
                log::warn!("claim: provider verify failed: {e}");
                false
            }
        }
    }

    /// Validates input `input_index` of `tx` spending the claim output `entry`.
    ///
    /// The contract state comes from the trailer of `entry.script_pubkey`, the
    /// claim attempt from the input's unlocking script, and the whole locking
    /// script is the script code the signature commits to.
    pub fn validate_spend(
        &self,
        tx: &Tx,
        input_index: u32,
        entry: &UtxoEntry,
    ) -> Result<(), ClaimSpendError> {
        let contract = ClaimContract::from_locking_script(&entry.script_pubkey)?;
        let ctx = SpendContext::new(tx, input_index, entry.value, &entry.script_pubkey)?;
        let input = &ctx.tx().inputs[input_index as usize];
        let witness = parse_claim_unlocking_script(&input.script_sig)?;
        self.claim(&contract, &ctx, &witness.signature, &witness.pubkey)?;
        Ok(())
    }
}
