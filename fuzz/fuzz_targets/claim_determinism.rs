#![no_main]

use bounty_consensus::{
    ClaimContract, ClaimError, ClaimVerifier, PubKeyHash, Secp256k1Provider, SpendContext, Tx,
    TxInput,
};
use libfuzzer_sys::fuzz_target;

// Fuzz ClaimVerifier::claim with arbitrary signature/pubkey bytes. The
// predicate must be deterministic, must never accept on an open contract and
// must reject any key that does not hash to the winner.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split = (data[0] as usize) % data.len();
    let (sig, pubkey) = data[1..].split_at(split.min(data.len() - 1));

    let tx = Tx {
        version: 1,
        inputs: vec![TxInput {
            prev_txid: [0u8; 32],
            prev_vout: 0,
            script_sig: Vec::new(),
            sequence: 0xffff_ffff,
        }],
        outputs: Vec::new(),
        locktime: 0,
    };
    let script = [0x51u8];
    let Ok(ctx) = SpendContext::new(&tx, 0, 1, &script) else {
        return;
    };
    let provider = Secp256k1Provider::new();
    let verifier = ClaimVerifier::new(&provider);

    let open = ClaimContract::open_bounty();
    if verifier.claim(&open, &ctx, sig, pubkey) != Err(ClaimError::BountyNotResolved) {
        panic!("open bounty did not reject");
    }

    let Ok(resolved) = ClaimContract::resolved(PubKeyHash::of_pubkey(pubkey)) else {
        return;
    };
    let r1 = verifier.claim(&resolved, &ctx, sig, pubkey);
    let r2 = verifier.claim(&resolved, &ctx, sig, pubkey);
    if r1 != r2 {
        panic!("claim non-deterministic");
    }
    if r1 == Err(ClaimError::NotSelectedWinner) {
        panic!("matching key rejected as not selected");
    }

    let other = ClaimContract::resolved(PubKeyHash([0xa5; 20])).expect("non-zero winner");
    if PubKeyHash::of_pubkey(pubkey) != PubKeyHash([0xa5; 20])
        && verifier.claim(&other, &ctx, sig, pubkey) != Err(ClaimError::NotSelectedWinner)
    {
        panic!("foreign key not rejected as not selected");
    }
});
