pub mod claim;
mod compactsize;
pub mod constants;
pub mod covenant;
pub mod error;
pub mod flags;
pub mod sighash;
pub mod tx;
pub mod unlocking;
mod wire_read;

pub use claim::{ClaimVerifier, SpendContext, UtxoEntry};
pub use compactsize::encode_compact_size;
pub use covenant::{parse_claim_covenant_data, ClaimContract, PubKeyHash};
pub use error::{ClaimError, ClaimSpendError, ErrorCode, TxError};
pub use flags::VerifyFlags;
pub use sighash::{sighash_forkid_digest, SighashType};
pub use tx::{marshal_tx, parse_tx, Tx, TxInput, TxOutput};
pub use unlocking::{parse_claim_unlocking_script, ClaimWitness};

pub use bounty_crypto::{CryptoProvider, Secp256k1Provider};
