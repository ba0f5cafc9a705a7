use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-held holding: a canonical ticker symbol plus share count and
/// an optional target allocation, enriched with provider metadata.
///
/// `symbol` is always the canonical ticker as resolved by the quote
/// provider's search endpoint — it may differ from what the user typed.
/// The metadata fields are `None` for legacy positions created before
/// metadata existed; they are backfilled on the next price refresh.
///
/// Persisted as camelCase JSON so stored records stay compatible with
/// earlier versions of the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Opaque unique identifier, assigned at creation, never reused.
    pub id: Uuid,

    /// Canonical ticker symbol (e.g., "AAPL", "SAP").
    pub symbol: String,

    /// Number of shares held. Positive real number.
    pub shares: f64,

    /// Desired percentage of total portfolio value, in [0, 100].
    #[serde(default)]
    pub target_allocation: f64,

    // ── Provider metadata (mirrored at creation, backfilled on refresh) ──
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub exchange_name: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    /// Instrument type as reported by the provider ("Common Stock", "ETF", …).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,

    #[serde(default)]
    pub isin: Option<String>,
}

impl Position {
    /// Whether this position carries enough cached metadata (currency and
    /// exchange) for a refresh to skip the provider's search call.
    #[must_use]
    pub fn has_metadata(&self) -> bool {
        self.currency.is_some() && self.exchange_name.is_some()
    }
}

/// A partial update applied by the edit operation.
/// Only `shares` and `target_allocation` are user-mutable; everything else
/// on a position is owned by the quote provider.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionUpdate {
    pub shares: Option<f64>,
    pub target_allocation: Option<f64>,
}

impl PositionUpdate {
    pub fn shares(shares: f64) -> Self {
        Self {
            shares: Some(shares),
            ..Self::default()
        }
    }

    pub fn target_allocation(target_allocation: f64) -> Self {
        Self {
            target_allocation: Some(target_allocation),
            ..Self::default()
        }
    }
}
