use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::providers::traits::RateProvider;

/// One cached rate table for a base currency.
struct CachedTable {
    rates: HashMap<String, f64>,
    fetched_at: DateTime<Utc>,
}

/// Fetches exchange-rate tables with per-base-currency caching.
///
/// The cache is owned by the service instance (no hidden module-level
/// state) and its expiry duration is a construction parameter, defaulting
/// to one hour. Only successful fetches are cached.
pub struct RateService {
    provider: Box<dyn RateProvider>,
    cache: HashMap<String, CachedTable>,
    ttl: Duration,
}

impl RateService {
    pub fn new(provider: Box<dyn RateProvider>) -> Self {
        Self::with_ttl(provider, Duration::hours(1))
    }

    pub fn with_ttl(provider: Box<dyn RateProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            cache: HashMap::new(),
            ttl,
        }
    }

    /// Rate table for `base`: cached if younger than the expiry duration,
    /// otherwise fetched fresh.
    ///
    /// Fails soft: any provider error yields an empty table rather than
    /// propagating. Callers then fall through to the currency converter's
    /// missing-rate behavior — rate staleness must never block valuation.
    pub async fn rates(&mut self, base: &str) -> HashMap<String, f64> {
        let base = base.to_uppercase();

        if let Some(cached) = self.cache.get(&base) {
            if Utc::now() - cached.fetched_at < self.ttl {
                log::debug!("Using cached exchange rates for {base}");
                return cached.rates.clone();
            }
        }

        match self.provider.latest_rates(&base).await {
            Ok(rates) => {
                self.cache.insert(
                    base,
                    CachedTable {
                        rates: rates.clone(),
                        fetched_at: Utc::now(),
                    },
                );
                rates
            }
            Err(e) => {
                log::warn!(
                    "Failed to fetch exchange rates for {base} from {}: {e}",
                    self.provider.name()
                );
                HashMap::new()
            }
        }
    }
}
