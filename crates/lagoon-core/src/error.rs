use thiserror::Error;

/// Protocol-wide error types for the Lagoon Protocol.
///
/// Every failure is a synchronous, atomic rejection of the whole
/// operation: callers observe either the full effect of a call or none of
/// it. There is no retry policy; resubmitting a corrected transaction is a
/// caller concern.
#[derive(Debug, Error)]
pub enum LagoonError {
    /// Mint payment does not match the configured mint price.
    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    /// Collection is sold out (supply reached the configured maximum).
    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Caller is not the owner, token owner, or lock operator required.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid state transition (already locked/staked/unstaked, nothing
    /// to stake/unstake/claim).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Swap output below the caller-specified minimum, or liquidity
    /// ratio mismatch.
    #[error("Slippage exceeded: {0}")]
    SlippageExceeded(String),

    /// Zero or out-of-range quantity, or insufficient balance/allowance.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Operation gated while the contract is paused.
    #[error("Contract paused: {0}")]
    ContractPaused(String),

    /// Checked arithmetic overflowed or divided by zero.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for LagoonError {
    fn from(e: serde_json::Error) -> Self {
        LagoonError::Serialization(e.to_string())
    }
}
