//! Account model and the source that supplies it

use anyhow::{Result, bail};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub balance: Decimal,
}

impl Account {
    pub fn new(id: &str, name: &str, currency: &str, balance: Decimal) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            currency: currency.to_string(),
            balance,
        }
    }

    /// Rejects accounts that a source must never hand out: malformed currency
    /// codes and negative balances.
    pub fn check(&self) -> Result<()> {
        if self.id.is_empty() {
            bail!("Account without id: {}", self.name);
        }
        if !is_currency_code(&self.currency) {
            bail!(
                "Invalid currency code '{}' for account {}",
                self.currency,
                self.id
            );
        }
        if self.balance < Decimal::ZERO {
            bail!("Negative balance for account {}", self.id);
        }
        Ok(())
    }
}

/// Three ASCII letters, e.g. `USD`.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

pub fn find_account<'a>(accounts: &'a [Account], id: &str) -> Option<&'a Account> {
    accounts.iter().find(|a| a.id == id)
}

#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Account>>;
}
