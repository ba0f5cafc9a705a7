use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::errors::CoreError;

/// Canonical metadata for one listing, as resolved by a symbol search.
/// Only the single most relevant match is ever surfaced — there is no
/// disambiguation step.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolMatch {
    /// Canonical ticker symbol (may differ from the search query).
    pub symbol: String,
    /// Exchange code used to build the price-endpoint ticker.
    pub exchange: String,
    pub name: Option<String>,
    pub currency: String,
    pub kind: Option<String>,
    pub country: Option<String>,
    pub isin: Option<String>,
}

/// One end-of-day bar from the price endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct EodBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Trait abstraction for quote providers (symbol search + latest price).
///
/// The engine and services are written against this seam so the HTTP
/// implementation can be swapped for a mock in tests, and a different
/// market-data vendor can be dropped in without touching the rest of the
/// codebase.
///
/// The API key is passed per call: it lives in user settings and can
/// change at any time, so providers hold no key state of their own.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Resolve a symbol via the provider's search endpoint.
    /// Fails with `AuthRequired` when no key is configured and
    /// `SymbolNotFound` when the search returns zero results.
    async fn search_symbol(&self, api_key: &str, symbol: &str) -> Result<SymbolMatch, CoreError>;

    /// Fetch the most recent end-of-day bar for `symbol` on `exchange`.
    /// Fails with `NoPriceData` when the provider returns an empty series.
    async fn latest_eod(
        &self,
        api_key: &str,
        symbol: &str,
        exchange: &str,
    ) -> Result<EodBar, CoreError>;
}

/// Trait abstraction for exchange-rate providers.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the latest rate table for `base`: currency code → units of
    /// that currency per 1 unit of `base`.
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>, CoreError>;
}
