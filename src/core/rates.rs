//! Exchange rate table and the source that supplies it

use anyhow::{Result, bail};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::account::is_currency_code;

/// Directional rates keyed by `FROM-TO`. `A-B` and `B-A` are independent entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<String, Decimal>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pair_key(from: &str, to: &str) -> String {
        format!("{from}-{to}")
    }

    pub fn insert(&mut self, from: &str, to: &str, rate: Decimal) {
        self.rates.insert(Self::pair_key(from, to), rate);
    }

    pub fn get(&self, from: &str, to: &str) -> Option<Decimal> {
        self.rates.get(&Self::pair_key(from, to)).copied()
    }

    /// Rate for the pair, or identity when the table has no entry.
    pub fn rate_or_identity(&self, from: &str, to: &str) -> Decimal {
        self.get(from, to).unwrap_or(Decimal::ONE)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Every key must be `XXX-YYY` and every rate positive.
    pub fn check(&self) -> Result<()> {
        for (key, rate) in &self.rates {
            let well_formed = key
                .split_once('-')
                .is_some_and(|(from, to)| is_currency_code(from) && is_currency_code(to));
            if !well_formed {
                bail!("Invalid currency pair key: {key}");
            }
            if *rate <= Decimal::ZERO {
                bail!("Rate for {key} must be positive, got {rate}");
            }
        }
        Ok(())
    }
}

impl FromIterator<(String, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (String, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self) -> Result<RateTable>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_lookup_is_directional() {
        let mut table = RateTable::new();
        table.insert("USD", "EUR", dec!(0.85));
        table.insert("EUR", "USD", dec!(1.2));

        assert_eq!(table.get("USD", "EUR"), Some(dec!(0.85)));
        assert_eq!(table.get("EUR", "USD"), Some(dec!(1.2)));
        assert_eq!(table.get("EUR", "GBP"), None);
        assert_eq!(table.rate_or_identity("EUR", "GBP"), Decimal::ONE);
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let table: RateTable = serde_json::from_str(r#"{"USD-EUR": 0.85, "EUR-GBP": "0.86"}"#)
            .expect("Failed to deserialize");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("USD", "EUR"), Some(dec!(0.85)));
        assert_eq!(table.get("EUR", "GBP"), Some(dec!(0.86)));
        assert!(table.check().is_ok());
    }

    #[test]
    fn test_check_rejects_bad_entries() {
        let table: RateTable = [("USDEUR".to_string(), dec!(0.85))].into_iter().collect();
        assert_eq!(
            table.check().unwrap_err().to_string(),
            "Invalid currency pair key: USDEUR"
        );

        let table: RateTable = [("USD-EUR".to_string(), dec!(0))].into_iter().collect();
        assert_eq!(
            table.check().unwrap_err().to_string(),
            "Rate for USD-EUR must be positive, got 0"
        );
    }
}
