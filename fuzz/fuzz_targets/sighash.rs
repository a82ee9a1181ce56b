#![no_main]

use bounty_consensus::{sighash_forkid_digest, Secp256k1Provider, SighashType};
use libfuzzer_sys::fuzz_target;

// Fuzz sighash_forkid_digest: parse arbitrary bytes into a Tx, then compute
// the digest for one input. Verifies determinism and no-panic.
fuzz_target!(|data: &[u8]| {
    // Trailing params: input_index(4) + amount(8) + sighash_type(1).
    if data.len() < 13 {
        return;
    }
    let split = data.len() - 13;
    let (body, params) = data.split_at(split);

    let Ok((tx, _, n)) = bounty_consensus::parse_tx(body) else {
        return;
    };
    if tx.inputs.is_empty() {
        return;
    }
    let script_code = &body[n..];

    let input_index = u32::from_le_bytes([params[0], params[1], params[2], params[3]])
        % tx.inputs.len() as u32;
    let mut amount = [0u8; 8];
    amount.copy_from_slice(&params[4..12]);
    let amount = u64::from_le_bytes(amount);
    let Ok(st) = SighashType::from_byte(params[12]) else {
        return;
    };

    let p = Secp256k1Provider::new();
    let r1 = sighash_forkid_digest(&p, &tx, input_index, script_code, amount, st);
    let r2 = sighash_forkid_digest(&p, &tx, input_index, script_code, amount, st);
    if r1 != r2 {
        panic!("sighash_forkid_digest non-deterministic");
    }
});
