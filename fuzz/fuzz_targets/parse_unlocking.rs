#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz parse_claim_unlocking_script: only minimal pushes are accepted, so an
// accepted script must re-encode byte for byte.
fuzz_target!(|data: &[u8]| {
    let Ok(w) = bounty_consensus::parse_claim_unlocking_script(data) else {
        return;
    };
    match w.unlocking_script() {
        Ok(b) if b == data => {}
        _ => panic!("accepted unlocking script is not canonical"),
    }
});
