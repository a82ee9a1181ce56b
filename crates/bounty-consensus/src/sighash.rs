use bounty_crypto::CryptoProvider;

use crate::compactsize::encode_var_bytes;
use crate::constants::*;
use crate::error::{ErrorCode, TxError};
use crate::tx::{tx_output_bytes, Tx};

/// Signature hash type: the byte appended to every DER signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SighashType(u8);

impl SighashType {
    pub const ALL_FORKID: SighashType = SighashType(SIGHASH_ALL | SIGHASH_FORKID);

    pub fn from_byte(b: u8) -> Result<Self, TxError> {
        let base = b & SIGHASH_BASE_MASK;
        if !(SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base) {
            return Err(TxError::new(
                ErrorCode::TxErrSighashTypeInvalid,
                "unknown sighash base type",
            ));
        }
        if b & !(SIGHASH_BASE_MASK | SIGHASH_FORKID | SIGHASH_ANYONECANPAY) != 0 {
            return Err(TxError::new(
                ErrorCode::TxErrSighashTypeInvalid,
                "undefined sighash flag bits",
            ));
        }
        Ok(Self(b))
    }

    pub fn as_byte(self) -> u8 {
        self.0
    }

    pub fn base(self) -> u8 {
        self.0 & SIGHASH_BASE_MASK
    }

    pub fn has_forkid(self) -> bool {
        self.0 & SIGHASH_FORKID != 0
    }

    pub fn anyone_can_pay(self) -> bool {
        self.0 & SIGHASH_ANYONECANPAY != 0
    }
}

fn dsha(provider: &dyn CryptoProvider, b: &[u8]) -> Result<[u8; 32], TxError> {
    provider.sha256d(b).map_err(|e| {
        log::warn!("sighash: provider sha256d failed: {e}");
        TxError::new(ErrorCode::TxErrCryptoProvider, "sha256d failed")
    })
}

/// FORKID signature digest for `tx.inputs[input_index]` spending an output
/// of `amount` locked by `script_code`.
pub fn sighash_forkid_digest(
    provider: &dyn CryptoProvider,
    tx: &Tx,
    input_index: u32,
    script_code: &[u8],
    amount: u64,
    sighash_type: SighashType,
) -> Result<[u8; 32], TxError> {
    let idx = usize::try_from(input_index)
        .map_err(|_| TxError::new(ErrorCode::TxErrParse, "sighash: input_index overflows usize"))?;
    let Some(input) = tx.inputs.get(idx) else {
        return Err(TxError::new(
            ErrorCode::TxErrParse,
            "sighash: input_index out of bounds",
        ));
    };
    if !sighash_type.has_forkid() {
        return Err(TxError::new(
            ErrorCode::TxErrSighashTypeInvalid,
            "sighash: FORKID flag required",
        ));
    }

    let base = sighash_type.base();
    let zero = [0u8; 32];

    let hash_prevouts = if sighash_type.anyone_can_pay() {
        zero
    } else {
        let mut prevouts = Vec::with_capacity(tx.inputs.len() * 36);
        for i in &tx.inputs {
            prevouts.extend_from_slice(&i.prev_txid);
            prevouts.extend_from_slice(&i.prev_vout.to_le_bytes());
        }
        dsha(provider, &prevouts)?
    };

    let hash_sequence =
        if sighash_type.anyone_can_pay() || base == SIGHASH_SINGLE || base == SIGHASH_NONE {
            zero
        } else {
            let mut sequences = Vec::with_capacity(tx.inputs.len() * 4);
            for i in &tx.inputs {
                sequences.extend_from_slice(&i.sequence.to_le_bytes());
            }
            dsha(provider, &sequences)?
        };

    let hash_outputs = match base {
        SIGHASH_ALL => {
            let mut outputs = Vec::new();
            for o in &tx.outputs {
                tx_output_bytes(o, &mut outputs);
            }
            dsha(provider, &outputs)?
        }
        SIGHASH_SINGLE if idx < tx.outputs.len() => {
            let mut single = Vec::new();
            tx_output_bytes(&tx.outputs[idx], &mut single);
            dsha(provider, &single)?
        }
        _ => zero,
    };

    let mut preimage = Vec::with_capacity(156 + script_code.len() + 9);
    preimage.extend_from_slice(&tx.version.to_le_bytes());
    preimage.extend_from_slice(&hash_prevouts);
    preimage.extend_from_slice(&hash_sequence);
    preimage.extend_from_slice(&input.prev_txid);
    preimage.extend_from_slice(&input.prev_vout.to_le_bytes());
    encode_var_bytes(script_code, &mut preimage);
    preimage.extend_from_slice(&amount.to_le_bytes());
    preimage.extend_from_slice(&input.sequence.to_le_bytes());
    preimage.extend_from_slice(&hash_outputs);
    preimage.extend_from_slice(&tx.locktime.to_le_bytes());
    preimage.extend_from_slice(&u32::from(sighash_type.as_byte()).to_le_bytes());

    let digest = dsha(provider, &preimage)?;
    log::trace!(
        "sighash: input={input_index} type={:#04x} preimage_len={}",
        sighash_type.as_byte(),
        preimage.len()
    );
    Ok(digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tx::{TxInput, TxOutput};
    use bounty_crypto::Secp256k1Provider;

    fn two_in_two_out() -> Tx {
        let input = |n: u8| TxInput {
            prev_txid: [n; 32],
            prev_vout: n as u32,
            script_sig: Vec::new(),
            sequence: 0xffff_ffff,
        };
        let output = |v: u64| TxOutput {
            value: v,
            script_pubkey: vec![0x51],
        };
        Tx {
            version: 1,
            inputs: vec![input(1), input(2)],
            outputs: vec![output(10), output(20)],
            locktime: 0,
        }
    }

    fn digest(tx: &Tx, idx: u32, amount: u64, t: u8) -> Result<[u8; 32], TxError> {
        let st = SighashType::from_byte(t)?;
        sighash_forkid_digest(&Secp256k1Provider::new(), tx, idx, &[0xac], amount, st)
    }

    #[test]
    fn sighash_type_parsing() {
        assert!(SighashType::from_byte(0x41).is_ok());
        assert!(SighashType::from_byte(0xc3).is_ok());
        assert_eq!(
            SighashType::from_byte(0x00).unwrap_err().code,
            ErrorCode::TxErrSighashTypeInvalid
        );
        assert_eq!(
            SighashType::from_byte(0x44).unwrap_err().code,
            ErrorCode::TxErrSighashTypeInvalid
        );
        assert_eq!(
            SighashType::from_byte(0x61).unwrap_err().msg,
            "undefined sighash flag bits"
        );
    }

    #[test]
    fn forkid_required() {
        let err = digest(&two_in_two_out(), 0, 10, SIGHASH_ALL).unwrap_err();
        assert_eq!(err.code, ErrorCode::TxErrSighashTypeInvalid);
    }

    #[test]
    fn input_index_out_of_bounds() {
        let err = digest(&two_in_two_out(), 2, 10, 0x41).unwrap_err();
        assert_eq!(err.code, ErrorCode::TxErrParse);
    }

    #[test]
    fn commits_to_index_amount_and_type() {
        let tx = two_in_two_out();
        let base = digest(&tx, 0, 10, 0x41).expect("digest");
        assert_eq!(base, digest(&tx, 0, 10, 0x41).expect("digest"));
        assert_ne!(base, digest(&tx, 1, 10, 0x41).expect("digest"));
        assert_ne!(base, digest(&tx, 0, 11, 0x41).expect("digest"));
        assert_ne!(base, digest(&tx, 0, 10, 0xc1).expect("digest"));
        assert_ne!(base, digest(&tx, 0, 10, 0x42).expect("digest"));
    }

    #[test]
    fn all_commits_to_outputs_none_does_not() {
        let tx = two_in_two_out();
        let mut changed = tx.clone();
        changed.outputs[1].value = 21;

        assert_ne!(
            digest(&tx, 0, 10, 0x41).expect("digest"),
            digest(&changed, 0, 10, 0x41).expect("digest")
        );
        assert_eq!(
            digest(&tx, 0, 10, 0x42).expect("digest"),
            digest(&changed, 0, 10, 0x42).expect("digest")
        );
        // SINGLE on input 0 only covers output 0.
        assert_eq!(
            digest(&tx, 0, 10, 0x43).expect("digest"),
            digest(&changed, 0, 10, 0x43).expect("digest")
        );
    }

    #[test]
    fn single_without_matching_output_hashes_no_outputs() {
        let mut tx = two_in_two_out();
        tx.outputs.truncate(1);
        let a = digest(&tx, 1, 10, 0x43).expect("digest");
        tx.outputs[0].value = 99;
        let b = digest(&tx, 1, 10, 0x43).expect("digest");
        assert_eq!(a, b);
    }

    #[test]
    fn anyonecanpay_ignores_other_inputs() {
        let tx = two_in_two_out();
        let mut changed = tx.clone();
        changed.inputs[1].prev_vout = 77;
        assert_eq!(
            digest(&tx, 0, 10, 0xc1).expect("digest"),
            digest(&changed, 0, 10, 0xc1).expect("digest")
        );
        assert_ne!(
            digest(&tx, 0, 10, 0x41).expect("digest"),
            digest(&changed, 0, 10, 0x41).expect("digest")
        );
    }
}
