use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    TxErrParse,
    TxErrCovenantDataInvalid,
    TxErrSighashTypeInvalid,
    TxErrCryptoProvider,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::TxErrParse => "TX_ERR_PARSE",
            ErrorCode::TxErrCovenantDataInvalid => "TX_ERR_COVENANT_DATA_INVALID",
            ErrorCode::TxErrSighashTypeInvalid => "TX_ERR_SIGHASH_TYPE_INVALID",
            ErrorCode::TxErrCryptoProvider => "TX_ERR_CRYPTO_PROVIDER",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxError {
    pub code: ErrorCode,
    pub msg: &'static str,
}

impl TxError {
    pub fn new(code: ErrorCode, msg: &'static str) -> Self {
        Self { code, msg }
    }
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.msg.is_empty() {
            write!(f, "{}", self.code.as_str())
        } else {
            write!(f, "{}: {}", self.code.as_str(), self.msg)
        }
    }
}

impl std::error::Error for TxError {}

/// Rejection of a single claim attempt. Checked in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimError {
    /// The bounty is still open.
    BountyNotResolved,
    /// hash160 of the presented key is not the committed winner.
    NotSelectedWinner,
    /// The signature does not prove possession of the winner's key.
    BadSignature,
}

impl ClaimError {
    pub fn as_str(self) -> &'static str {
        match self {
            ClaimError::BountyNotResolved => "CLAIM_ERR_BOUNTY_NOT_RESOLVED",
            ClaimError::NotSelectedWinner => "CLAIM_ERR_NOT_SELECTED_WINNER",
            ClaimError::BadSignature => "CLAIM_ERR_BAD_SIGNATURE",
        }
    }
}

impl fmt::Display for ClaimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for ClaimError {}

/// Outcome of validating a full spend of a claim output: either the spend
/// was malformed before the predicate could run, or the predicate said no.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimSpendError {
    Tx(TxError),
    Claim(ClaimError),
}

impl ClaimSpendError {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimSpendError::Tx(e) => e.code.as_str(),
            ClaimSpendError::Claim(e) => e.as_str(),
        }
    }
}

impl From<TxError> for ClaimSpendError {
    fn from(e: TxError) -> Self {
        ClaimSpendError::Tx(e)
    }
}

impl From<ClaimError> for ClaimSpendError {
    fn from(e: ClaimError) -> Self {
        ClaimSpendError::Claim(e)
    }
}

impl fmt::Display for ClaimSpendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimSpendError::Tx(e) => e.fmt(f),
            ClaimSpendError::Claim(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for ClaimSpendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClaimSpendError::Tx(e) => Some(e),
            ClaimSpendError::Claim(e) => Some(e),
        }
    }
}
