use std::sync::Arc;

use crate::models::price::{PriceHistory, PriceObservation};

use super::store::KeyValueStore;

/// Storage record key for the price observation cache.
pub const PRICE_CACHE_KEY: &str = "stock_data_cache";

/// Durable store for the per-symbol price observation log.
///
/// The whole cache is loaded and saved as a single unit on each mutation.
/// Corrupt or unreadable storage is treated as an empty cache, never as
/// fatal.
pub struct PriceCacheStore {
    store: Arc<dyn KeyValueStore>,
}

impl PriceCacheStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the full cache, or an empty one on any failure.
    #[must_use]
    pub fn load(&self) -> PriceHistory {
        let raw = match self.store.get(PRICE_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PriceHistory::new(),
            Err(e) => {
                log::warn!("Failed to read price cache record: {e}");
                return PriceHistory::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(e) => {
                log::warn!("Corrupt price cache record, starting empty: {e}");
                PriceHistory::new()
            }
        }
    }

    /// Persist the full cache as one snapshot.
    pub fn save(&self, history: &PriceHistory) {
        let raw = match serde_json::to_string(history) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to serialize price cache: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(PRICE_CACHE_KEY, &raw) {
            log::warn!("Failed to write price cache record: {e}");
        }
    }

    /// Append one observation to a symbol's log and persist.
    pub fn record(&self, symbol: &str, observation: PriceObservation) {
        let mut history = self.load();
        history.record(symbol, observation);
        self.save(&history);
    }

    /// The most recent observation recorded for a symbol.
    #[must_use]
    pub fn latest(&self, symbol: &str) -> Option<PriceObservation> {
        self.load().latest(symbol).cloned()
    }
}
