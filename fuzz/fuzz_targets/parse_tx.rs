#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz parse_tx: no panic on arbitrary bytes, and any parsed prefix must
// re-serialize to exactly the bytes consumed.
fuzz_target!(|data: &[u8]| {
    let Ok((tx, txid, n)) = bounty_consensus::parse_tx(data) else {
        return;
    };
    let again = bounty_consensus::marshal_tx(&tx);
    if again != data[..n] {
        panic!("marshal_tx(parse_tx(b)) != b[..consumed]");
    }
    if tx.txid() != txid {
        panic!("txid mismatch between parse and Tx::txid");
    }
});
