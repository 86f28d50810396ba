use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::currency::{CurrencyRateProvider, RateTable};

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ExchangeRate-API v4 implementation for CurrencyRateProvider
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    date: Option<String>,
    // Values stay loose so one bad entry doesn't sink the whole table
    rates: HashMap<String, serde_json::Value>,
}

impl LatestRatesResponse {
    fn into_rate_table(self, requested_base: &str) -> RateTable {
        let rates = self
            .rates
            .into_iter()
            .filter_map(|(code, value)| value.as_f64().map(|rate| (code, rate)))
            .collect();
        let date = self
            .date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());

        RateTable {
            base: self.base.unwrap_or_else(|| requested_base.to_string()),
            date,
            rates,
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: &str) -> Result<RateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for base: {}", e, base))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for base: {}",
                response.status(),
                base
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response for {}: {}", base, e))?;

        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", base, e))?;

        let table = data.into_rate_table(base);
        debug!(rates = table.rates.len(), date = ?table.date, "Received exchange rates");
        Ok(table)
    }
}
