pub const MAX_TX_INPUTS: u64 = 100_000;
pub const MAX_TX_OUTPUTS: u64 = 100_000;
pub const MAX_SCRIPT_BYTES: u64 = 10_000_000;
// txid(32) + vout(4) + script_len(1) + sequence(4)
pub const MIN_TX_INPUT_BYTES: usize = 41;
// value(8) + script_len(1)
pub const MIN_TX_OUTPUT_BYTES: usize = 9;

pub const PUBKEY_HASH_BYTES: usize = 20;
pub const COMPRESSED_PUBKEY_BYTES: usize = 33;
pub const UNCOMPRESSED_PUBKEY_BYTES: usize = 65;

// Covenant state: open_flag(1) || winner(20).
pub const CLAIM_COVENANT_DATA_BYTES: usize = 1 + PUBKEY_HASH_BYTES;
pub const CLAIM_FLAG_RESOLVED: u8 = 0x00;
pub const CLAIM_FLAG_OPEN: u8 = 0x01;

pub const OP_PUSHBYTES_MAX: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_RETURN: u8 = 0x6a;

pub const SIGHASH_ALL: u8 = 0x01;
pub const SIGHASH_NONE: u8 = 0x02;
pub const SIGHASH_SINGLE: u8 = 0x03;
pub const SIGHASH_FORKID: u8 = 0x40;
pub const SIGHASH_ANYONECANPAY: u8 = 0x80;
// Bit 0x20 is undefined; a type byte carrying it is invalid.
pub const SIGHASH_BASE_MASK: u8 = 0x1f;
