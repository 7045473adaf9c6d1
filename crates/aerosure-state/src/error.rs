use thiserror::Error;

/// Shared error taxonomy for every ledger and engine operation.
///
/// Any validation failure aborts the whole operation with no partial state
/// change; callers observe the rejection and retry with corrected input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuretyError {
    #[error("contract is not operational")]
    NotOperational,

    #[error("caller is not the owner or an authorized contract")]
    Unauthorized,

    #[error("airline is not registered")]
    NotRegistered,

    #[error("airline has not provided funding")]
    NotFunded,

    #[error("airline is already registered")]
    AlreadyRegistered,

    #[error("caller has already voted for this candidate")]
    DuplicateVote,

    #[error("policy already purchased for this flight")]
    AlreadyInsured,

    #[error("payment exceeds the maximum insurance cap")]
    PaymentExceedsCap,

    #[error("insufficient funds: required {required}, provided {provided}")]
    InsufficientFunds { required: u128, provided: u128 },

    #[error("submitted index is not assigned to this oracle")]
    IndexMismatch,

    #[error("pooled funds too low: required {required}, available {available}")]
    InsufficientPoolFunds { required: u128, available: u128 },

    #[error("serialization error: {0}")]
    Serialization(String),
}
