use std::collections::HashMap;

/// Convert an amount between currencies using a rate table.
///
/// The table maps currency code → units of that currency per 1 unit of the
/// table's base currency, so the conversion goes through the base:
/// `amount / rates[from] * rates[to]`.
///
/// Degrades gracefully: when either currency is absent from the table (or
/// carries an unusable zero rate), the amount is returned unconverted and a
/// warning is logged. Callers must tolerate unconverted values under
/// rate-table gaps — a missing rate never halts valuation.
#[must_use]
pub fn convert(amount: f64, from: &str, to: &str, rates: &HashMap<String, f64>) -> f64 {
    if from == to {
        return amount;
    }

    let from_rate = match rates.get(from) {
        Some(&rate) if rate != 0.0 => rate,
        _ => {
            log::warn!("Missing exchange rate for {from} or {to}");
            return amount;
        }
    };
    let to_rate = match rates.get(to) {
        Some(&rate) if rate != 0.0 => rate,
        _ => {
            log::warn!("Missing exchange rate for {from} or {to}");
            return amount;
        }
    };

    amount / from_rate * to_rate
}

/// Format a value as a currency display string with 2 decimal places and
/// thousands grouping, e.g. `$1,234.50` or `PLN 987.00`.
#[must_use]
pub fn format_amount(value: f64, currency: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));
    let grouped = group_thousands(int_part);

    match currency_symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{grouped}.{frac_part}"),
        None => format!("{sign}{} {grouped}.{frac_part}", currency.to_uppercase()),
    }
}

/// Display symbols for common ISO codes; anything else falls back to the
/// code itself.
fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CHF" => Some("CHF "),
        "CAD" => Some("CA$"),
        "AUD" => Some("A$"),
        _ => None,
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
