use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::core::{Account, AccountSource, RateSource, RateTable};

async fn get_json<T: DeserializeOwned>(url: &str, what: &str) -> Result<T> {
    debug!("Requesting {} from {}", what, url);

    let client = reqwest::Client::builder().user_agent("fxform/1.0").build()?;
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| anyhow!("Request error: {} for {} URL: {}", e, what, url))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP error: {} for {}", response.status(), what));
    }

    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", what, e))
}

// Backend-provided account list at `{base_url}/accounts`
pub struct HttpAccountSource {
    base_url: String,
}

impl HttpAccountSource {
    pub fn new(base_url: &str) -> Self {
        HttpAccountSource {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AccountSource for HttpAccountSource {
    #[instrument(name = "HttpAccountsFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self) -> Result<Vec<Account>> {
        let url = format!("{}/accounts", self.base_url);
        get_json(&url, "accounts").await
    }
}

// Backend-provided rate table at `{base_url}/rates`
pub struct HttpRateSource {
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: &str) -> Self {
        HttpRateSource {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    #[instrument(name = "HttpRatesFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch(&self) -> Result<RateTable> {
        let url = format!("{}/rates", self.base_url);
        get_json(&url, "exchange rates").await
    }
}
