//! Input validation for the conversion form

use rust_decimal::Decimal;
use std::str::FromStr;

use super::account::{Account, find_account};
use super::error::ValidationError;

/// Inputs that passed validation, resolved against the fetched accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInput<'a> {
    pub from: &'a Account,
    pub to: &'a Account,
    pub amount: Decimal,
}

/// Checks the selections and the amount text. The first failing rule wins:
/// missing account, then unparsable or non-positive amount, then balance.
pub fn validate<'a>(
    from_id: &str,
    to_id: &str,
    amount_text: &str,
    accounts: &'a [Account],
) -> Result<ValidInput<'a>, ValidationError> {
    let (from, to) = match (find_account(accounts, from_id), find_account(accounts, to_id)) {
        (Some(from), Some(to)) if !from_id.is_empty() && !to_id.is_empty() => (from, to),
        _ => return Err(ValidationError::MissingAccount),
    };

    let amount = match parse_amount(amount_text) {
        Some(amount) => amount,
        // No Decimal balance can cover it
        None if exceeds_decimal_range(amount_text) => {
            return Err(ValidationError::InsufficientBalance);
        }
        None => return Err(ValidationError::InvalidAmount),
    };
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount);
    }

    if amount > from.balance {
        return Err(ValidationError::InsufficientBalance);
    }

    Ok(ValidInput { from, to, amount })
}

/// Parses plain (`12.5`) or scientific (`1.25e1`) notation. Decimal has no
/// NaN or infinity, so anything that parses is finite.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Decimal exponent of the largest power of ten a [`Decimal`] can hold.
const MAX_DECIMAL_MAGNITUDE: i64 = 28;

/// True when `text` is a well-formed positive number, plain or scientific,
/// whose magnitude is beyond what [`Decimal`] can represent.
pub fn exceeds_decimal_range(text: &str) -> bool {
    let text = text.trim();
    let unsigned = text.strip_prefix('+').unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], &unsigned[at + 1..]),
        None => (unsigned, "0"),
    };
    let Ok(exponent) = exponent.parse::<i64>() else {
        return false;
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
        return false;
    }

    let int_digits = int_part.trim_start_matches('0').len() as i64;
    let magnitude = if int_digits > 0 {
        int_digits - 1
    } else {
        match frac_part.find(|c| c != '0') {
            Some(leading_zeros) => -(leading_zeros as i64) - 1,
            None => return false,
        }
    };
    magnitude.saturating_add(exponent) >= MAX_DECIMAL_MAGNITUDE
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn accounts() -> Vec<Account> {
        vec![
            Account::new("usd", "Dollar Checking", "USD", dec!(1000)),
            Account::new("eur", "Euro Savings", "EUR", dec!(2000)),
        ]
    }

    #[test]
    fn test_valid_input() {
        let accounts = accounts();
        let input = validate("usd", "eur", "100", &accounts).unwrap();
        assert_eq!(input.from.id, "usd");
        assert_eq!(input.to.id, "eur");
        assert_eq!(input.amount, dec!(100));
    }

    #[test]
    fn test_missing_account() {
        let accounts = accounts();
        assert_eq!(
            validate("", "eur", "100", &accounts),
            Err(ValidationError::MissingAccount)
        );
        assert_eq!(
            validate("usd", "", "100", &accounts),
            Err(ValidationError::MissingAccount)
        );
        assert_eq!(
            validate("eur", "gbp", "100", &accounts),
            Err(ValidationError::MissingAccount)
        );
        assert_eq!(
            validate("usd", "eur", "100", &[]),
            Err(ValidationError::MissingAccount)
        );
    }

    #[test]
    fn test_missing_account_checked_before_amount() {
        let accounts = accounts();
        assert_eq!(
            validate("usd", "gbp", "abc", &accounts),
            Err(ValidationError::MissingAccount)
        );
    }

    #[test]
    fn test_invalid_amount() {
        let accounts = accounts();
        for text in ["", "   ", "abc", "0", "-5", "0.00", "NaN", "inf", "1,000", "12abc"] {
            assert_eq!(
                validate("usd", "eur", text, &accounts),
                Err(ValidationError::InvalidAmount),
                "amount text {text:?}"
            );
        }
    }

    #[test]
    fn test_amount_formats() {
        assert_eq!(parse_amount(" 12.50 "), Some(dec!(12.5)));
        assert_eq!(parse_amount("1e3"), Some(dec!(1000)));
        assert_eq!(parse_amount("2.5E-1"), Some(dec!(0.25)));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_amounts_beyond_decimal_range() {
        let accounts = accounts();
        for text in ["1e40", "100000000000000000000000000000000", " 8E28 ", "+1e400"] {
            assert_eq!(
                validate("usd", "eur", text, &accounts),
                Err(ValidationError::InsufficientBalance),
                "amount text {text:?}"
            );
        }
        // Positive but below the smallest representable unit
        assert_eq!(
            validate("usd", "eur", "1e-40", &accounts),
            Err(ValidationError::InvalidAmount)
        );
        for text in ["-1e40", "0e40", "1e", "e40", ".e40", "1e40x", "1.2.3e40"] {
            assert!(!exceeds_decimal_range(text), "amount text {text:?}");
        }
        assert!(exceeds_decimal_range("0.001e31"));
        assert!(!exceeds_decimal_range("0.001e30"));
    }

    #[test]
    fn test_insufficient_balance() {
        let accounts = accounts();
        assert_eq!(
            validate("usd", "eur", "2000", &accounts),
            Err(ValidationError::InsufficientBalance)
        );
        assert_eq!(
            validate("usd", "eur", "1000.01", &accounts),
            Err(ValidationError::InsufficientBalance)
        );
        // The full balance may be converted
        assert!(validate("usd", "eur", "1000", &accounts).is_ok());
    }

    #[test]
    fn test_same_account_is_allowed() {
        let accounts = accounts();
        let input = validate("usd", "usd", "10", &accounts).unwrap();
        assert_eq!(input.from, input.to);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_non_positive_amounts_are_invalid(cents in -1_000_000i64..=0) {
            let accounts = accounts();
            let text = Decimal::new(cents, 2).to_string();
            prop_assert_eq!(
                validate("usd", "eur", &text, &accounts),
                Err(ValidationError::InvalidAmount)
            );
        }

        #[test]
        fn prop_non_numeric_text_is_invalid(text in "[a-zA-Z ]{0,12}") {
            let accounts = accounts();
            prop_assert_eq!(
                validate("usd", "eur", &text, &accounts),
                Err(ValidationError::InvalidAmount)
            );
        }

        #[test]
        fn prop_amounts_above_balance_are_rejected(excess in 1i64..10_000_000) {
            let accounts = accounts();
            let text = (dec!(1000) + Decimal::new(excess, 2)).to_string();
            prop_assert_eq!(
                validate("usd", "eur", &text, &accounts),
                Err(ValidationError::InsufficientBalance)
            );
        }

        #[test]
        fn prop_amounts_within_balance_are_accepted(cents in 1i64..=100_000) {
            let accounts = accounts();
            let text = Decimal::new(cents, 2).to_string();
            let input = validate("usd", "eur", &text, &accounts).unwrap();
            prop_assert_eq!(input.amount, Decimal::new(cents, 2));
        }
    }
}
