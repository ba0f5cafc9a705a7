use chrono::NaiveTime;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::quote::{Quote, QuoteResult};
use crate::providers::traits::{QuoteProvider, SymbolMatch};

/// Minimum spacing between consecutive provider calls during a bulk fetch.
/// EODHD free-tier keys are rate limited; bulk refreshes must not burst.
pub const FETCH_PACING: Duration = Duration::from_millis(300);

/// Fetches symbol metadata and latest prices through a `QuoteProvider`.
///
/// This is the boundary where provider errors become the tagged
/// `QuoteResult` variant: a failed fetch for one symbol must never abort a
/// bulk refresh of the others.
pub struct QuoteService {
    provider: Box<dyn QuoteProvider>,
}

impl QuoteService {
    pub fn new(provider: Box<dyn QuoteProvider>) -> Self {
        Self { provider }
    }

    /// Resolve a symbol and fetch its latest price, with typed errors.
    ///
    /// When `cached` carries both currency and exchange metadata, the
    /// search call is skipped and the stored metadata reused — routine
    /// refreshes then spend only one rate-limited call per symbol. The
    /// price itself is always fetched fresh.
    pub async fn resolve_and_fetch(
        &self,
        api_key: &str,
        symbol: &str,
        cached: Option<&Position>,
    ) -> Result<Quote, CoreError> {
        let cached_match = cached.and_then(|position| {
            let currency = position.currency.clone()?;
            let exchange = position.exchange_name.clone()?;
            Some(SymbolMatch {
                symbol: position.symbol.clone(),
                exchange,
                name: position.name.clone(),
                currency,
                kind: position.kind.clone(),
                country: position.country.clone(),
                isin: position.isin.clone(),
            })
        });

        let resolved = match cached_match {
            Some(resolved) => {
                log::debug!("Reusing cached metadata for {symbol}, skipping search");
                resolved
            }
            None => self.provider.search_symbol(api_key, symbol).await?,
        };

        let bar = self
            .provider
            .latest_eod(api_key, &resolved.symbol, &resolved.exchange)
            .await?;

        Ok(Quote {
            symbol: resolved.symbol,
            name: resolved.name,
            currency: resolved.currency,
            exchange_name: Some(resolved.exchange),
            country: resolved.country,
            kind: resolved.kind,
            isin: resolved.isin,
            price: bar.close,
            timestamp: bar.date.and_time(NaiveTime::MIN).and_utc(),
        })
    }

    /// Like [`resolve_and_fetch`](Self::resolve_and_fetch), but catches
    /// every error into the `Failure` variant instead of propagating.
    pub async fn fetch_quote(
        &self,
        api_key: &str,
        symbol: &str,
        cached: Option<&Position>,
    ) -> QuoteResult {
        match self.resolve_and_fetch(api_key, symbol, cached).await {
            Ok(quote) => QuoteResult::Success(quote),
            Err(e) => {
                log::error!("Quote fetch failed for {symbol}: {e}");
                QuoteResult::Failure {
                    symbol: symbol.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Fetch quotes for many symbols, one result per input symbol in input
    /// order.
    ///
    /// Calls are issued strictly sequentially with at least
    /// [`FETCH_PACING`] between consecutive call starts — never in
    /// parallel — to respect the provider's rate limit. `metadata` maps
    /// symbols to stored positions whose metadata can skip the search call.
    pub async fn fetch_many(
        &self,
        api_key: &str,
        symbols: &[String],
        metadata: &HashMap<String, Position>,
    ) -> Vec<QuoteResult> {
        let mut results = Vec::with_capacity(symbols.len());

        for (index, symbol) in symbols.iter().enumerate() {
            if index > 0 {
                #[cfg(not(target_arch = "wasm32"))]
                tokio::time::sleep(FETCH_PACING).await;
            }
            let result = self
                .fetch_quote(api_key, symbol, metadata.get(symbol))
                .await;
            results.push(result);
        }

        results
    }
}
