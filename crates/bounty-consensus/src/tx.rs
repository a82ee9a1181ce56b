use crate::compactsize::{encode_compact_size, encode_var_bytes, read_compact_size, read_len};
use crate::constants::*;
use crate::error::{ErrorCode, TxError};
use crate::wire_read::Reader;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tx {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub locktime: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    pub prev_txid: [u8; 32],
    pub prev_vout: u32,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

impl Tx {
    /// Double SHA-256 of the serialized transaction, internal byte order.
    pub fn txid(&self) -> [u8; 32] {
        bounty_crypto::sha256d(&marshal_tx(self))
    }
}

/// Capacity to reserve for `count` entries of at least `min_entry` bytes
/// each. Never more than the unread bytes could hold.
fn entry_capacity(count: u64, remaining: usize, min_entry: usize) -> usize {
    let fits = remaining / min_entry;
    usize::try_from(count).map_or(fits, |c| c.min(fits))
}

/// Parses one transaction from the front of `b`.
///
/// Returns the transaction, its txid and the number of bytes consumed.
/// Trailing bytes are left for the caller to judge.
pub fn parse_tx(b: &[u8]) -> Result<(Tx, [u8; 32], usize), TxError> {
    let mut r = Reader::new(b);

    let version = r.read_u32_le()?;

    let in_count = read_compact_size(&mut r)?;
    if in_count > MAX_TX_INPUTS {
        return Err(TxError::new(ErrorCode::TxErrParse, "input_count overflow"));
    }
    let mut inputs = Vec::with_capacity(entry_capacity(
        in_count,
        r.remaining(),
        MIN_TX_INPUT_BYTES,
    ));
    for _ in 0..in_count {
        let mut prev_txid = [0u8; 32];
        prev_txid.copy_from_slice(r.read_bytes(32)?);
        let prev_vout = r.read_u32_le()?;
        let script_len = read_len(&mut r, MAX_SCRIPT_BYTES, "script_sig_len overflow")?;
        let script_sig = r.read_bytes(script_len)?.to_vec();
        let sequence = r.read_u32_le()?;

        inputs.push(TxInput {
            prev_txid,
            prev_vout,
            script_sig,
            sequence,
        });
    }

    let out_count = read_compact_size(&mut r)?;
    if out_count > MAX_TX_OUTPUTS {
        return Err(TxError::new(ErrorCode::TxErrParse, "output_count overflow"));
    }
    let mut outputs = Vec::with_capacity(entry_capacity(
        out_count,
        r.remaining(),
        MIN_TX_OUTPUT_BYTES,
    ));
    for _ in 0..out_count {
        let value = r.read_u64_le()?;
        let script_len = read_len(&mut r, MAX_SCRIPT_BYTES, "script_pubkey_len overflow")?;
        let script_pubkey = r.read_bytes(script_len)?.to_vec();
        outputs.push(TxOutput {
            value,
            script_pubkey,
        });
    }

    let locktime = r.read_u32_le()?;
    let end = r.offset();

    let tx = Tx {
        version,
        inputs,
        outputs,
        locktime,
    };
    Ok((tx, bounty_crypto::sha256d(&b[..end]), end))
}

pub fn marshal_tx(tx: &Tx) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&tx.version.to_le_bytes());
    encode_compact_size(tx.inputs.len() as u64, &mut out);
    for input in &tx.inputs {
        out.extend_from_slice(&input.prev_txid);
        out.extend_from_slice(&input.prev_vout.to_le_bytes());
        encode_var_bytes(&input.script_sig, &mut out);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }
    encode_compact_size(tx.outputs.len() as u64, &mut out);
    for output in &tx.outputs {
        tx_output_bytes(output, &mut out);
    }
    out.extend_from_slice(&tx.locktime.to_le_bytes());
    out
}

pub(crate) fn tx_output_bytes(output: &TxOutput, out: &mut Vec<u8>) {
    out.extend_from_slice(&output.value.to_le_bytes());
    encode_var_bytes(&output.script_pubkey, out);
}
