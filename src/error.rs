use thiserror::Error;

/// Validation failures reported back to the caller. None of these leave partial state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MixerError {
    #[error("account name already in use: {0}")]
    NameConflict(String),

    #[error("address already in use: {0}")]
    AddressInUse(String),

    #[error("unknown deposit: {0}")]
    UnknownDeposit(String),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("unknown user: {0}")]
    UnknownUser(String),

    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("a deposit needs at least one alias")]
    EmptyAliases,
}

pub type MixerResult<T> = Result<T, MixerError>;

/// Parse a coin count or delay. Only non-negative integers are accepted.
pub fn parse_amount(raw: &str) -> MixerResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| MixerError::InvalidAmount(raw.to_string()))
}
