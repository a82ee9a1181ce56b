/// Script verification switches for the signature step.
///
/// The defaults are the ledger's consensus rules. Stricter settings are
/// relay policy and only ever turn a success into `BadSignature`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct VerifyFlags {
    /// Reject high-S signatures instead of normalizing them.
    pub require_low_s: bool,
    /// Only accept 33-byte compressed public keys.
    pub require_compressed_pubkey: bool,
}

impl VerifyFlags {
    pub fn consensus() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            require_low_s: true,
            require_compressed_pubkey: true,
        }
    }
}
