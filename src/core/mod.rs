//! Core form logic: data model, validation, conversion, debounce and state

pub mod account;
pub mod config;
pub mod conversion;
pub mod debounce;
pub mod error;
pub mod log;
pub mod rates;
pub mod state;
pub mod validation;

// Re-export main types for cleaner imports
pub use account::{Account, AccountSource};
pub use conversion::{ConversionResult, convert};
pub use error::{ConversionError, FetchError, FormError, ValidationError};
pub use rates::{RateSource, RateTable};
pub use state::{FormEvent, FormState};
pub use validation::validate;
