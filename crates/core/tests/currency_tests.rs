// ═══════════════════════════════════════════════════════════════════
// Currency Tests — conversion math and display formatting
// ═══════════════════════════════════════════════════════════════════

use std::collections::HashMap;

use portfolio_tracker_core::services::currency::{convert, format_amount};

const EPSILON: f64 = 1e-9;

/// A USD-based rate table: units of currency per 1 USD.
fn usd_rates() -> HashMap<String, f64> {
    let mut rates = HashMap::new();
    rates.insert("USD".to_string(), 1.0);
    rates.insert("EUR".to_string(), 0.9);
    rates.insert("PLN".to_string(), 4.0);
    rates.insert("GBP".to_string(), 0.78);
    rates.insert("JPY".to_string(), 155.0);
    rates
}

// ═══════════════════════════════════════════════════════════════════
// convert
// ═══════════════════════════════════════════════════════════════════

#[test]
fn same_currency_is_identity() {
    let rates = usd_rates();
    assert_eq!(convert(123.45, "USD", "USD", &rates), 123.45);
    assert_eq!(convert(0.0, "EUR", "EUR", &rates), 0.0);
    // Identity holds even when the currency is not in the table at all
    assert_eq!(convert(50.0, "XXX", "XXX", &HashMap::new()), 50.0);
}

#[test]
fn converts_through_the_base_currency() {
    let rates = usd_rates();
    // 100 EUR → USD: 100 / 0.9
    let in_usd = convert(100.0, "EUR", "USD", &rates);
    assert!((in_usd - 111.111_111_111).abs() < 1e-6);

    // 100 EUR → PLN: 100 / 0.9 * 4.0
    let in_pln = convert(100.0, "EUR", "PLN", &rates);
    assert!((in_pln - 444.444_444_444).abs() < 1e-6);
}

#[test]
fn conversion_is_transitive() {
    let rates = usd_rates();
    let direct = convert(250.0, "EUR", "JPY", &rates);
    let via_gbp = convert(convert(250.0, "EUR", "GBP", &rates), "GBP", "JPY", &rates);
    assert!((direct - via_gbp).abs() < EPSILON * direct.abs());
}

#[test]
fn missing_source_rate_returns_amount_unchanged() {
    let rates = usd_rates();
    assert_eq!(convert(75.0, "CHF", "USD", &rates), 75.0);
}

#[test]
fn missing_target_rate_returns_amount_unchanged() {
    let rates = usd_rates();
    assert_eq!(convert(75.0, "USD", "CHF", &rates), 75.0);
}

#[test]
fn empty_rate_table_returns_amount_unchanged() {
    assert_eq!(convert(42.0, "USD", "EUR", &HashMap::new()), 42.0);
}

#[test]
fn zero_rate_is_treated_as_missing() {
    let mut rates = usd_rates();
    rates.insert("EUR".to_string(), 0.0);
    // Division by a zero rate would explode; the amount passes through instead
    assert_eq!(convert(100.0, "EUR", "USD", &rates), 100.0);
    assert_eq!(convert(100.0, "USD", "EUR", &rates), 100.0);
}

// ═══════════════════════════════════════════════════════════════════
// format_amount
// ═══════════════════════════════════════════════════════════════════

#[test]
fn formats_known_symbols() {
    assert_eq!(format_amount(1234.5, "USD"), "$1,234.50");
    assert_eq!(format_amount(987.0, "EUR"), "€987.00");
    assert_eq!(format_amount(0.5, "GBP"), "£0.50");
}

#[test]
fn formats_unknown_codes_with_prefix() {
    assert_eq!(format_amount(1234.0, "PLN"), "PLN 1,234.00");
    assert_eq!(format_amount(10.0, "sek"), "SEK 10.00");
}

#[test]
fn groups_thousands() {
    assert_eq!(format_amount(999.0, "USD"), "$999.00");
    assert_eq!(format_amount(1000.0, "USD"), "$1,000.00");
    assert_eq!(format_amount(1_234_567.891, "USD"), "$1,234,567.89");
}

#[test]
fn formats_negative_values() {
    assert_eq!(format_amount(-12.3, "USD"), "-$12.30");
    assert_eq!(format_amount(-1500.0, "PLN"), "-PLN 1,500.00");
}
