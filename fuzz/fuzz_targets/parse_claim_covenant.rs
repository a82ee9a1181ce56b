#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz the claim state decoders: no panic, and every accepted state
// re-encodes to the input.
fuzz_target!(|data: &[u8]| {
    if let Ok(c) = bounty_consensus::parse_claim_covenant_data(data) {
        if c.covenant_data()[..] != data[..] {
            panic!("covenant_data does not round-trip");
        }
        if !c.is_open() && c.winner().is_none() {
            panic!("resolved contract without a winner");
        }
    }
    let _ = bounty_consensus::ClaimContract::from_locking_script(data);
});
