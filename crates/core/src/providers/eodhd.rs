use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;

use super::traits::{EodBar, QuoteProvider, SymbolMatch};

const BASE_URL: &str = "https://eodhd.com/api";

/// EODHD API provider for stock metadata and end-of-day prices.
///
/// - **Requires**: API key (stored in settings, passed per call).
/// - **Search**: `/search/{query}` — first result is taken as canonical.
/// - **Prices**: `/eod/{SYMBOL}.{EXCHANGE}` requested in descending date
///   order, so the first record is the latest close.
/// - Free-tier keys are heavily rate limited; callers doing bulk fetches
///   must pace their requests.
pub struct EodhdProvider {
    client: Client,
}

impl EodhdProvider {
    pub fn new() -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for EodhdProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── EODHD API response types ────────────────────────────────────────

#[derive(Deserialize)]
struct SearchHit {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Exchange")]
    exchange: String,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Type")]
    kind: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "ISIN")]
    isin: Option<String>,
}

#[derive(Deserialize)]
struct EodRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    #[serde(default)]
    volume: f64,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl QuoteProvider for EodhdProvider {
    fn name(&self) -> &str {
        "EODHD"
    }

    async fn search_symbol(&self, api_key: &str, symbol: &str) -> Result<SymbolMatch, CoreError> {
        if api_key.is_empty() {
            return Err(CoreError::AuthRequired);
        }

        let url = format!("{BASE_URL}/search/{symbol}");
        let resp = self
            .client
            .get(&url)
            .query(&[("api_token", api_key), ("limit", "1")])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(CoreError::Provider {
                provider: "EODHD".into(),
                message: format!("HTTP {} while searching for {symbol}", resp.status()),
            });
        }

        let hits: Vec<SearchHit> = resp.json().await.map_err(|e| CoreError::Provider {
            provider: "EODHD".into(),
            message: format!("Failed to parse search response for {symbol}: {e}"),
        })?;

        // First hit is the most relevant match
        let hit = hits
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::SymbolNotFound(symbol.to_string()))?;

        Ok(SymbolMatch {
            symbol: hit.code,
            exchange: hit.exchange,
            name: hit.name,
            currency: hit.currency,
            kind: hit.kind,
            country: hit.country,
            isin: hit.isin,
        })
    }

    async fn latest_eod(
        &self,
        api_key: &str,
        symbol: &str,
        exchange: &str,
    ) -> Result<EodBar, CoreError> {
        if api_key.is_empty() {
            return Err(CoreError::AuthRequired);
        }

        let ticker = format!("{symbol}.{exchange}");
        let url = format!("{BASE_URL}/eod/{ticker}");
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("api_token", api_key),
                ("period", "d"),
                ("order", "d"),
                ("fmt", "json"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(CoreError::Provider {
                provider: "EODHD".into(),
                message: format!("HTTP {} while fetching prices for {ticker}", resp.status()),
            });
        }

        let rows: Vec<EodRow> = resp.json().await.map_err(|e| CoreError::Provider {
            provider: "EODHD".into(),
            message: format!("Failed to parse price response for {ticker}: {e}"),
        })?;

        // Descending date order — the first row is the latest bar
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| CoreError::NoPriceData(ticker))?;

        Ok(EodBar {
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        })
    }
}
