use soroban_sdk::{contracterror, contracttype};

/// Error categories, for callers that map failures onto transport codes.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ErrorCategory {
    /// Invalid input parameters.
    Validation = 1,
    /// Missing signature, admin tier, or ownership.
    Authorization = 2,
    /// Resource lookup failures.
    NotFound = 3,
    /// State-machine violations: already processed, already claimed, duplicates.
    StateConflict = 4,
    /// Storage decode failures and arithmetic overflow.
    Storage = 5,
    /// Contract-level conditions such as pausing.
    System = 6,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller does not hold the admin tier the operation requires.
    Unauthorized = 3,
    /// Caller does not own the row it is acting on.
    Forbidden = 4,
    NotFound = 5,
    InvalidAmount = 6,
    InvalidInput = 7,
    AlreadyProcessed = 8,
    AlreadyClaimed = 9,
    InsufficientBalance = 10,
    DuplicateBonus = 11,
    StorageError = 12,
    ArithmeticOverflow = 13,
    AlreadyRegistered = 14,
    ReferralCodeTaken = 15,
    PositionInactive = 16,
    WithdrawalAlreadyOpen = 17,
    Paused = 18,
}

impl ContractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ContractError::NotInitialized
            | ContractError::AlreadyInitialized
            | ContractError::InvalidAmount
            | ContractError::InvalidInput
            | ContractError::InsufficientBalance => ErrorCategory::Validation,
            ContractError::Unauthorized | ContractError::Forbidden => {
                ErrorCategory::Authorization
            }
            ContractError::NotFound => ErrorCategory::NotFound,
            ContractError::AlreadyProcessed
            | ContractError::AlreadyClaimed
            | ContractError::DuplicateBonus
            | ContractError::AlreadyRegistered
            | ContractError::ReferralCodeTaken
            | ContractError::PositionInactive
            | ContractError::WithdrawalAlreadyOpen => ErrorCategory::StateConflict,
            ContractError::StorageError | ContractError::ArithmeticOverflow => {
                ErrorCategory::Storage
            }
            ContractError::Paused => ErrorCategory::System,
        }
    }
}
