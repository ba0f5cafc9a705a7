use std::collections::HashMap;
use uuid::Uuid;

use crate::models::position::Position;
use crate::models::quote::QuoteResult;
use crate::models::valuation::{EnrichedPosition, PortfolioValuation};

use super::currency::convert;

/// Recompute the derived valuation from current engine state.
///
/// Pure function of (positions, quotes, selected currency, rates) — the
/// engine invokes it after state-mutating operations instead of relying on
/// implicit dependency tracking.
///
/// The portfolio total sums converted values across positions with a
/// successful quote; positions without one contribute zero and surface
/// with empty pricing fields. Enriched positions come back sorted by
/// symbol, ascending.
#[must_use]
pub fn compute_valuation(
    positions: &[Position],
    quotes: &HashMap<Uuid, QuoteResult>,
    selected_currency: &str,
    rates: &HashMap<String, f64>,
) -> PortfolioValuation {
    let total: f64 = positions
        .iter()
        .filter_map(|position| {
            let quote = quotes.get(&position.id)?.quote()?;
            Some(convert(
                position.shares * quote.price,
                &quote.currency,
                selected_currency,
                rates,
            ))
        })
        .sum();

    let mut enriched: Vec<EnrichedPosition> = positions
        .iter()
        .map(|position| match quotes.get(&position.id).and_then(QuoteResult::quote) {
            Some(quote) => {
                let native_price = quote.price;
                let native_value = position.shares * native_price;
                let converted_price =
                    convert(native_price, &quote.currency, selected_currency, rates);
                let converted_value =
                    convert(native_value, &quote.currency, selected_currency, rates);
                let percentage = if total > 0.0 {
                    converted_value / total * 100.0
                } else {
                    0.0
                };
                EnrichedPosition {
                    position: position.clone(),
                    native_price: Some(native_price),
                    native_value: Some(native_value),
                    converted_price: Some(converted_price),
                    converted_value: Some(converted_value),
                    percentage,
                }
            }
            None => EnrichedPosition {
                position: position.clone(),
                native_price: None,
                native_value: None,
                converted_price: None,
                converted_value: None,
                percentage: 0.0,
            },
        })
        .collect();

    enriched.sort_by(|a, b| a.position.symbol.cmp(&b.position.symbol));

    PortfolioValuation {
        currency: selected_currency.to_string(),
        total,
        positions: enriched,
    }
}
