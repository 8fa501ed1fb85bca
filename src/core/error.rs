//! Error kinds surfaced by the conversion form

use thiserror::Error;

/// Failure of one of the two startup fetches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to load accounts: {0}")]
    Accounts(String),

    #[error("Failed to load exchange rates: {0}")]
    Rates(String),
}

/// Input rejected by the validator. Rules are checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select both a source and a destination account")]
    MissingAccount,

    #[error("Please enter a valid amount greater than zero")]
    InvalidAmount,

    #[error("Insufficient balance in the source account")]
    InsufficientBalance,
}

/// The converted amount fell outside the representable range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Conversion failed: {0}")]
    Failed(String),
}

/// The single error shown by the form at any time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
