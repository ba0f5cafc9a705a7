use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;

use super::traits::RateProvider;

const BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// exchangerate-api.com provider for fiat exchange-rate tables.
///
/// - **Free**: no API key required for the v4 endpoint.
/// - Returns all rates relative to the requested base currency.
pub struct ExchangeRateApiProvider {
    client: Client,
}

impl ExchangeRateApiProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ExchangeRateApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── exchangerate-api response types ─────────────────────────────────

#[derive(Deserialize)]
struct LatestRatesResponse {
    rates: Option<HashMap<String, f64>>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for ExchangeRateApiProvider {
    fn name(&self) -> &str {
        "exchangerate-api"
    }

    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>, CoreError> {
        let base = base.to_uppercase();
        let url = format!("{BASE_URL}/{base}");

        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(CoreError::Provider {
                provider: "exchangerate-api".into(),
                message: format!("HTTP {} while fetching rates for {base}", resp.status()),
            });
        }

        let body: LatestRatesResponse = resp.json().await.map_err(|e| CoreError::Provider {
            provider: "exchangerate-api".into(),
            message: format!("Failed to parse rate response for {base}: {e}"),
        })?;

        body.rates.ok_or_else(|| CoreError::Provider {
            provider: "exchangerate-api".into(),
            message: format!("Rate response for {base} is missing the rates table"),
        })
    }
}
