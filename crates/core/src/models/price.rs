use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single observed price for a symbol, recorded at fetch time.
/// Timestamps serialize as epoch milliseconds to match the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Append-only per-symbol log of price observations.
///
/// Entries are kept in insertion order, which is also chronological since
/// fetches happen at increasing wall-clock time. Nothing is ever deleted;
/// the cache is a simple log, not a ring buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceHistory {
    entries: HashMap<String, Vec<PriceObservation>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation to a symbol's log, creating the log if absent.
    pub fn record(&mut self, symbol: &str, observation: PriceObservation) {
        self.entries
            .entry(symbol.to_string())
            .or_default()
            .push(observation);
    }

    /// The most recent observation for a symbol (last appended entry).
    #[must_use]
    pub fn latest(&self, symbol: &str) -> Option<&PriceObservation> {
        self.entries.get(symbol).and_then(|log| log.last())
    }

    /// All observations recorded for a symbol, oldest first.
    #[must_use]
    pub fn history(&self, symbol: &str) -> &[PriceObservation] {
        self.entries.get(symbol).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of observations across all symbols.
    #[must_use]
    pub fn total_observations(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Number of distinct symbols with at least one observation.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
