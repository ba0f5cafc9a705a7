use chrono::{DateTime, Utc};

/// Resolved metadata and latest price for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Canonical symbol as returned by the provider's search endpoint.
    pub symbol: String,
    pub name: Option<String>,
    pub currency: String,
    pub exchange_name: Option<String>,
    pub country: Option<String>,
    pub kind: Option<String>,
    pub isin: Option<String>,
    pub price: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a metadata+price fetch for one symbol.
///
/// Keyed by position id (not symbol) in the engine's in-memory map, since
/// the canonical symbol may change across a refresh. Transient: rebuilt
/// wholesale on every refresh, never merged.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteResult {
    Success(Quote),
    Failure { symbol: String, error: String },
}

impl QuoteResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, QuoteResult::Success(_))
    }

    /// The resolved quote, if the fetch succeeded.
    #[must_use]
    pub fn quote(&self) -> Option<&Quote> {
        match self {
            QuoteResult::Success(quote) => Some(quote),
            QuoteResult::Failure { .. } => None,
        }
    }

    /// The symbol this result refers to (canonical on success, as-requested
    /// on failure).
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            QuoteResult::Success(quote) => &quote.symbol,
            QuoteResult::Failure { symbol, .. } => symbol,
        }
    }
}
