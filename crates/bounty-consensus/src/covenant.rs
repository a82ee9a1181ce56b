use core::fmt;

use crate::constants::{
    CLAIM_COVENANT_DATA_BYTES, CLAIM_FLAG_OPEN, CLAIM_FLAG_RESOLVED, OP_RETURN, PUBKEY_HASH_BYTES,
};
use crate::error::{ErrorCode, TxError};

/// hash160 commitment to a public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PubKeyHash(pub [u8; PUBKEY_HASH_BYTES]);

impl PubKeyHash {
    /// Placeholder winner for an open bounty. No key is known to hash to it.
    pub const UNASSIGNED: PubKeyHash = PubKeyHash([0u8; PUBKEY_HASH_BYTES]);

    pub fn of_pubkey(pubkey: &[u8]) -> Self {
        Self(bounty_crypto::hash160(pubkey))
    }

    pub fn from_slice(b: &[u8]) -> Result<Self, TxError> {
        let arr: [u8; PUBKEY_HASH_BYTES] = b.try_into().map_err(|_| {
            TxError::new(ErrorCode::TxErrParse, "pubkey hash must be 20 bytes")
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_HASH_BYTES] {
        &self.0
    }

    pub fn is_unassigned(&self) -> bool {
        *self == Self::UNASSIGNED
    }
}

impl fmt::Debug for PubKeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKeyHash(")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// State committed in a bounty claim output. Immutable once built; a state
/// transition is a new value locked in a new output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClaimContract {
    open: bool,
    winner: PubKeyHash,
}

impl ClaimContract {
    pub fn open_bounty() -> Self {
        Self {
            open: true,
            winner: PubKeyHash::UNASSIGNED,
        }
    }

    pub fn resolved(winner: PubKeyHash) -> Result<Self, TxError> {
        Self::new(false, winner)
    }

    /// A resolved contract must name a real winner; an open one may carry any
    /// commitment, conventionally [`PubKeyHash::UNASSIGNED`].
    pub fn new(open: bool, winner: PubKeyHash) -> Result<Self, TxError> {
        if !open && winner.is_unassigned() {
            return Err(TxError::new(
                ErrorCode::TxErrCovenantDataInvalid,
                "resolved bounty requires an assigned winner",
            ));
        }
        Ok(Self { open, winner })
    }

    /// Builds the successor state that pays `winner`. `self` is left as is.
    pub fn resolve(&self, winner: PubKeyHash) -> Result<Self, TxError> {
        Self::resolved(winner)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The committed hash exactly as stored, placeholder included.
    pub fn winner_commitment(&self) -> PubKeyHash {
        self.winner
    }

    /// `None` while no winner has been assigned.
    pub fn winner(&self) -> Option<PubKeyHash> {
        (!self.winner.is_unassigned()).then_some(self.winner)
    }

    pub fn covenant_data(&self) -> [u8; CLAIM_COVENANT_DATA_BYTES] {
        let mut out = [0u8; CLAIM_COVENANT_DATA_BYTES];
        out[0] = if self.open {
            CLAIM_FLAG_OPEN
        } else {
            CLAIM_FLAG_RESOLVED
        };
        out[1..].copy_from_slice(&self.winner.0);
        out
    }

    /// Appends the state to `code` as `OP_RETURN <push 21> <covenant_data>`.
    pub fn locking_script(&self, code: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(code.len() + 2 + CLAIM_COVENANT_DATA_BYTES);
        out.extend_from_slice(code);
        out.push(OP_RETURN);
        out.push(CLAIM_COVENANT_DATA_BYTES as u8);
        out.extend_from_slice(&self.covenant_data());
        out
    }

    pub fn from_locking_script(script: &[u8]) -> Result<Self, TxError> {
        const TRAILER: usize = 2 + CLAIM_COVENANT_DATA_BYTES;
        if script.len() < TRAILER {
            return Err(TxError::new(
                ErrorCode::TxErrCovenantDataInvalid,
                "locking script too short for claim state",
            ));
        }
        let tail = &script[script.len() - TRAILER..];
        if tail[0] != OP_RETURN || tail[1] as usize != CLAIM_COVENANT_DATA_BYTES {
            return Err(TxError::new(
                ErrorCode::TxErrCovenantDataInvalid,
                "locking script missing claim state trailer",
            ));
        }
        parse_claim_covenant_data(&tail[2..])
    }
}

pub fn parse_claim_covenant_data(cov_data: &[u8]) -> Result<ClaimContract, TxError> {
    if cov_data.len() != CLAIM_COVENANT_DATA_BYTES {
        return Err(TxError::new(
            ErrorCode::TxErrCovenantDataInvalid,
            "claim covenant_data length mismatch",
        ));
    }
    let open = match cov_data[0] {
        CLAIM_FLAG_OPEN => true,
        CLAIM_FLAG_RESOLVED => false,
        _ => {
            return Err(TxError::new(
                ErrorCode::TxErrCovenantDataInvalid,
                "claim open_flag invalid",
            ))
        }
    };
    let winner = PubKeyHash::from_slice(&cov_data[1..])?;
    ClaimContract::new(open, winner)
}
