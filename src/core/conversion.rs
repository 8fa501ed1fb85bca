//! Conversion engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ConversionError;
use super::rates::RateTable;

/// Fee charged on every conversion, as a fraction of the source amount.
pub const FEE_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    pub rate: Decimal,
    pub fee: Decimal,
}

/// Converts `amount` using the directional rate for the pair, or identity when
/// the table has none. The fee depends on the source amount only.
///
/// Fails only when the converted amount does not fit in a [`Decimal`].
pub fn convert(
    amount: Decimal,
    from: &str,
    to: &str,
    rates: &RateTable,
) -> Result<ConversionResult, ConversionError> {
    let rate = rates.rate_or_identity(from, to);
    let out_of_range = || ConversionError::Failed("amount out of range".to_string());
    Ok(ConversionResult {
        from_amount: amount,
        to_amount: amount.checked_mul(rate).ok_or_else(out_of_range)?,
        rate,
        fee: amount.checked_mul(FEE_RATE).ok_or_else(out_of_range)?,
    })
}
