use anyhow::{Context, Result};
use directories::ProjectDirs;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};
use tracing::debug;

use super::account::Account;
use super::debounce::DEFAULT_DEBOUNCE;
use super::rates::RateTable;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpSourceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixedAccountsConfig {
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FixedRatesConfig {
    pub rates: RateTable,
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum AccountSourceConfig {
    Http(HttpSourceConfig),
    Fixed(FixedAccountsConfig),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum RateSourceConfig {
    Http(HttpSourceConfig),
    Fixed(FixedRatesConfig),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourcesConfig {
    pub accounts: AccountSourceConfig,
    pub rates: RateSourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        let accounts = vec![
            Account::new("checking", "Everyday Checking", "USD", Decimal::new(1000, 0)),
            Account::new("savings", "Euro Savings", "EUR", Decimal::new(2000, 0)),
            Account::new("travel", "Travel Wallet", "GBP", Decimal::new(500, 0)),
        ];

        let mut rates = RateTable::new();
        rates.insert("USD", "EUR", Decimal::new(85, 2));
        rates.insert("EUR", "USD", Decimal::new(118, 2));
        rates.insert("USD", "GBP", Decimal::new(73, 2));
        rates.insert("GBP", "USD", Decimal::new(137, 2));
        rates.insert("EUR", "GBP", Decimal::new(86, 2));
        rates.insert("GBP", "EUR", Decimal::new(116, 2));

        SourcesConfig {
            accounts: AccountSourceConfig::Fixed(FixedAccountsConfig {
                accounts,
                latency_ms: 0,
            }),
            rates: RateSourceConfig::Fixed(FixedRatesConfig {
                rates,
                latency_ms: 0,
            }),
        }
    }
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            debounce_ms: default_debounce_ms(),
            sources: SourcesConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fxform")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
