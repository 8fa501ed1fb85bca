use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::{Account, AccountSource, RateSource, RateTable};

/// Resolves with a fixed list of accounts, optionally after a delay.
pub struct FixedAccountSource {
    accounts: Vec<Account>,
    latency: Duration,
}

impl FixedAccountSource {
    pub fn new(accounts: Vec<Account>) -> Self {
        FixedAccountSource {
            accounts,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl AccountSource for FixedAccountSource {
    #[instrument(name = "FixedAccountsFetch", skip(self))]
    async fn fetch(&self) -> Result<Vec<Account>> {
        if !self.latency.is_zero() {
            debug!(latency_ms = self.latency.as_millis() as u64, "Simulating latency");
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.accounts.clone())
    }
}

/// Resolves with a fixed rate table, optionally after a delay.
pub struct FixedRateSource {
    rates: RateTable,
    latency: Duration,
}

impl FixedRateSource {
    pub fn new(rates: RateTable) -> Self {
        FixedRateSource {
            rates,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl RateSource for FixedRateSource {
    #[instrument(name = "FixedRatesFetch", skip(self))]
    async fn fetch(&self) -> Result<RateTable> {
        if !self.latency.is_zero() {
            debug!(latency_ms = self.latency.as_millis() as u64, "Simulating latency");
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.rates.clone())
    }
}
