use crate::error::{ErrorCode, TxError};
use crate::wire_read::Reader;

/// Reads a ledger CompactSize, rejecting any encoding that is not the shortest one.
pub fn read_compact_size(r: &mut Reader<'_>) -> Result<u64, TxError> {
    let (v, minimal) = match r.read_u8()? {
        tag @ 0x00..=0xfc => (tag as u64, true),
        0xfd => {
            let v = r.read_u16_le()? as u64;
            (v, v >= 0xfd)
        }
        0xfe => {
            let v = r.read_u32_le()? as u64;
            (v, v > 0xffff)
        }
        0xff => {
            let v = r.read_u64_le()?;
            (v, v > 0xffff_ffff)
        }
    };
    if !minimal {
        return Err(TxError::new(ErrorCode::TxErrParse, "non-minimal CompactSize"));
    }
    Ok(v)
}

/// Reads a CompactSize length and checks it against `max`.
pub(crate) fn read_len(
    r: &mut Reader<'_>,
    max: u64,
    overflow: &'static str,
) -> Result<usize, TxError> {
    let n = read_compact_size(r)?;
    if n > max {
        return Err(TxError::new(ErrorCode::TxErrParse, overflow));
    }
    usize::try_from(n).map_err(|_| TxError::new(ErrorCode::TxErrParse, overflow))
}

pub fn encode_compact_size(n: u64, out: &mut Vec<u8>) {
    match n {
        0x00..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

/// CompactSize length prefix followed by the bytes themselves.
pub(crate) fn encode_var_bytes(b: &[u8], out: &mut Vec<u8>) {
    encode_compact_size(b.len() as u64, out);
    out.extend_from_slice(b);
}
