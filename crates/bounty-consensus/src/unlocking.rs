use crate::constants::{OP_PUSHBYTES_MAX, OP_PUSHDATA1, OP_PUSHDATA2};
use crate::error::{ErrorCode, TxError};
use crate::wire_read::Reader;

/// A claim attempt as carried in the spending input: `<sig> <pubkey>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimWitness {
    /// DER signature with the sighash type byte appended.
    pub signature: Vec<u8>,
    pub pubkey: Vec<u8>,
}

/// Reads one canonical push. OP_0 yields an empty item only where
/// `allow_empty` is set.
fn read_push<'a>(r: &mut Reader<'a>, allow_empty: bool) -> Result<&'a [u8], TxError> {
    let op = r.read_u8()?;
    let n = match op {
        0x00 if allow_empty => 0,
        0x00 => {
            return Err(TxError::new(
                ErrorCode::TxErrParse,
                "claim unlocking script: empty push",
            ))
        }
        0x01..=OP_PUSHBYTES_MAX => op as usize,
        OP_PUSHDATA1 => {
            let n = r.read_u8()?;
            if n <= OP_PUSHBYTES_MAX {
                return Err(TxError::new(
                    ErrorCode::TxErrParse,
                    "claim unlocking script: non-minimal OP_PUSHDATA1",
                ));
            }
            n as usize
        }
        OP_PUSHDATA2 => {
            let n = r.read_u16_le()?;
            if n <= 0xff {
                return Err(TxError::new(
                    ErrorCode::TxErrParse,
                    "claim unlocking script: non-minimal OP_PUSHDATA2",
                ));
            }
            n as usize
        }
        _ => {
            return Err(TxError::new(
                ErrorCode::TxErrParse,
                "claim unlocking script: non-push opcode",
            ))
        }
    };
    r.read_bytes(n)
}

/// Parses `<sig> <pubkey>`. An `OP_0` signature is a well-formed empty
/// signature and is left for the signature check to reject; the public key
/// must be a non-empty push.
pub fn parse_claim_unlocking_script(script_sig: &[u8]) -> Result<ClaimWitness, TxError> {
    let mut r = Reader::new(script_sig);
    let signature = read_push(&mut r, true)?.to_vec();
    let pubkey = read_push(&mut r, false)?.to_vec();
    if !r.is_empty() {
        return Err(TxError::new(
            ErrorCode::TxErrParse,
            "claim unlocking script: trailing bytes",
        ));
    }
    Ok(ClaimWitness { signature, pubkey })
}

fn push_data(b: &[u8], out: &mut Vec<u8>) {
    match b.len() {
        n @ 0..=0x4b => out.push(n as u8),
        n @ 0x4c..=0xff => {
            out.push(OP_PUSHDATA1);
            out.push(n as u8);
        }
        n => {
            out.push(OP_PUSHDATA2);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
    }
    out.extend_from_slice(b);
}

impl ClaimWitness {
    /// Encodes the witness with minimal pushes; an empty signature becomes
    /// `OP_0`. Pushes longer than `u16::MAX` bytes cannot be expressed and are
    /// rejected.
    pub fn unlocking_script(&self) -> Result<Vec<u8>, TxError> {
        if self.pubkey.is_empty() {
            return Err(TxError::new(
                ErrorCode::TxErrParse,
                "claim unlocking script: empty push",
            ));
        }
        if self.signature.len() > u16::MAX as usize || self.pubkey.len() > u16::MAX as usize {
            return Err(TxError::new(
                ErrorCode::TxErrParse,
                "claim unlocking script: push too long",
            ));
        }
        let mut out = Vec::with_capacity(self.signature.len() + self.pubkey.len() + 6);
        push_data(&self.signature, &mut out);
        push_data(&self.pubkey, &mut out);
        Ok(out)
    }
}
