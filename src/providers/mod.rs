pub mod fixed;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::{AccountSourceConfig, RateSourceConfig};
use crate::core::{AccountSource, RateSource};
use fixed::{FixedAccountSource, FixedRateSource};
use http::{HttpAccountSource, HttpRateSource};

pub fn account_source(config: &AccountSourceConfig) -> Arc<dyn AccountSource> {
    match config {
        AccountSourceConfig::Http(http) => Arc::new(HttpAccountSource::new(&http.base_url)),
        AccountSourceConfig::Fixed(fixed) => Arc::new(
            FixedAccountSource::new(fixed.accounts.clone())
                .with_latency(Duration::from_millis(fixed.latency_ms)),
        ),
    }
}

pub fn rate_source(config: &RateSourceConfig) -> Arc<dyn RateSource> {
    match config {
        RateSourceConfig::Http(http) => Arc::new(HttpRateSource::new(&http.base_url)),
        RateSourceConfig::Fixed(fixed) => Arc::new(
            FixedRateSource::new(fixed.rates.clone())
                .with_latency(Duration::from_millis(fixed.latency_ms)),
        ),
    }
}
