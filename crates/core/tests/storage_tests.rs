// ═══════════════════════════════════════════════════════════════════
// Storage Tests — KeyValueStore backends and the typed record stores
// ═══════════════════════════════════════════════════════════════════

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use portfolio_tracker_core::models::position::Position;
use portfolio_tracker_core::models::price::{PriceHistory, PriceObservation};
use portfolio_tracker_core::models::settings::Settings;
use portfolio_tracker_core::storage::positions::{PositionStore, POSITIONS_KEY};
use portfolio_tracker_core::storage::prices::{PriceCacheStore, PRICE_CACHE_KEY};
use portfolio_tracker_core::storage::settings::{SettingsStore, SETTINGS_KEY};
use portfolio_tracker_core::storage::store::{FileStore, KeyValueStore, MemoryStore};

fn sample_position(symbol: &str) -> Position {
    Position {
        id: Uuid::new_v4(),
        symbol: symbol.to_string(),
        shares: 12.5,
        target_allocation: 40.0,
        name: Some("Sample Corp".to_string()),
        currency: Some("USD".to_string()),
        exchange_name: Some("US".to_string()),
        country: Some("USA".to_string()),
        kind: Some("Common Stock".to_string()),
        isin: Some("US0000000001".to_string()),
    }
}

fn observation(epoch_ms: i64, price: f64) -> PriceObservation {
    PriceObservation {
        timestamp: Utc.timestamp_millis_opt(epoch_ms).unwrap(),
        price,
    }
}

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

#[test]
fn memory_store_roundtrip() {
    let store = MemoryStore::new();
    assert_eq!(store.get("missing").unwrap(), None);

    store.set("key", "value").unwrap();
    assert_eq!(store.get("key").unwrap().as_deref(), Some("value"));

    store.set("key", "replaced").unwrap();
    assert_eq!(store.get("key").unwrap().as_deref(), Some("replaced"));
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

#[test]
fn file_store_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    assert_eq!(store.get("missing").unwrap(), None);

    store.set("positions", r#"[{"a":1}]"#).unwrap();
    assert_eq!(
        store.get("positions").unwrap().as_deref(),
        Some(r#"[{"a":1}]"#)
    );
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStore::new(dir.path()).unwrap();
        store.set("record", "snapshot").unwrap();
    }
    let reopened = FileStore::new(dir.path()).unwrap();
    assert_eq!(reopened.get("record").unwrap().as_deref(), Some("snapshot"));
}

#[test]
fn file_store_overwrites_whole_value() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();

    store.set("record", "a long first snapshot").unwrap();
    store.set("record", "short").unwrap();
    // No remnants of the longer previous snapshot
    assert_eq!(store.get("record").unwrap().as_deref(), Some("short"));
}

// ═══════════════════════════════════════════════════════════════════
// PositionStore
// ═══════════════════════════════════════════════════════════════════

#[test]
fn position_store_empty_when_absent() {
    let store = PositionStore::new(Arc::new(MemoryStore::new()));
    assert!(store.load().is_empty());
}

#[test]
fn position_store_corrupt_record_degrades_to_empty() {
    let backend = Arc::new(MemoryStore::new());
    backend.set(POSITIONS_KEY, "{not json").unwrap();

    let store = PositionStore::new(backend);
    assert!(store.load().is_empty());
}

#[test]
fn position_store_roundtrip() {
    let backend = Arc::new(MemoryStore::new());
    let store = PositionStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);

    let positions = vec![sample_position("AAPL"), sample_position("SAP")];
    store.save(&positions);

    let loaded = store.load();
    assert_eq!(loaded, positions);
    assert!(loaded.iter().all(Position::has_metadata));
}

#[test]
fn position_store_accepts_legacy_records_without_metadata() {
    let backend = Arc::new(MemoryStore::new());
    let raw = format!(
        r#"[{{"id":"{}","symbol":"AAPL","shares":3.0}}]"#,
        Uuid::new_v4()
    );
    backend.set(POSITIONS_KEY, &raw).unwrap();

    let store = PositionStore::new(backend);
    let loaded = store.load();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].symbol, "AAPL");
    assert_eq!(loaded[0].target_allocation, 0.0);
    assert_eq!(loaded[0].currency, None);
    assert_eq!(loaded[0].exchange_name, None);
    assert!(!loaded[0].has_metadata());
}

#[test]
fn position_record_uses_camel_case_fields() {
    let backend = Arc::new(MemoryStore::new());
    let store = PositionStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);

    store.save(&[sample_position("AAPL")]);

    let raw = backend.get(POSITIONS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"targetAllocation\""));
    assert!(raw.contains("\"exchangeName\""));
    assert!(raw.contains("\"type\""));
    assert!(!raw.contains("target_allocation"));
}

// ═══════════════════════════════════════════════════════════════════
// PriceCacheStore
// ═══════════════════════════════════════════════════════════════════

#[test]
fn price_cache_empty_when_absent_or_corrupt() {
    let backend = Arc::new(MemoryStore::new());
    let store = PriceCacheStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);
    assert!(store.load().is_empty());
    assert_eq!(store.latest("AAPL"), None);

    backend.set(PRICE_CACHE_KEY, "][").unwrap();
    assert!(store.load().is_empty());
}

#[test]
fn latest_is_the_last_appended_observation() {
    let store = PriceCacheStore::new(Arc::new(MemoryStore::new()));

    store.record("AAPL", observation(1_000, 100.0));
    store.record("AAPL", observation(2_000, 105.0));
    store.record("SAP", observation(1_500, 200.0));

    assert_eq!(store.latest("AAPL"), Some(observation(2_000, 105.0)));
    assert_eq!(store.latest("SAP"), Some(observation(1_500, 200.0)));

    let history = store.load();
    assert_eq!(history.history("AAPL").len(), 2);
    assert_eq!(history.total_observations(), 3);
    assert_eq!(history.symbol_count(), 2);
}

#[test]
fn price_record_serializes_timestamps_as_epoch_millis() {
    let backend = Arc::new(MemoryStore::new());
    let store = PriceCacheStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);

    store.record("AAPL", observation(1_700_000_000_000, 187.5));

    let raw = backend.get(PRICE_CACHE_KEY).unwrap().unwrap();
    assert!(raw.contains("\"timestamp\":1700000000000"));
    assert!(raw.contains("\"AAPL\""));
}

#[test]
fn price_history_model_defaults() {
    let history = PriceHistory::new();
    assert!(history.is_empty());
    assert_eq!(history.latest("AAPL"), None);
    assert!(history.history("AAPL").is_empty());
    assert_eq!(history.total_observations(), 0);
    assert_eq!(history.symbol_count(), 0);
}

// ═══════════════════════════════════════════════════════════════════
// SettingsStore
// ═══════════════════════════════════════════════════════════════════

#[test]
fn settings_default_when_absent_or_corrupt() {
    let backend = Arc::new(MemoryStore::new());
    let store = SettingsStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);

    let settings = store.load();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.selected_currency, "USD");
    assert!(settings.api_key.is_empty());

    backend.set(SETTINGS_KEY, "not-json").unwrap();
    assert_eq!(store.load(), Settings::default());
}

#[test]
fn settings_roundtrip_with_camel_case_fields() {
    let backend = Arc::new(MemoryStore::new());
    let store = SettingsStore::new(Arc::clone(&backend) as Arc<dyn KeyValueStore>);

    let settings = Settings {
        api_key: "demo-key".to_string(),
        selected_currency: "EUR".to_string(),
    };
    store.save(&settings);

    let raw = backend.get(SETTINGS_KEY).unwrap().unwrap();
    assert!(raw.contains("\"apiKey\":\"demo-key\""));
    assert!(raw.contains("\"selectedCurrency\":\"EUR\""));

    assert_eq!(store.load(), settings);
}

#[test]
fn partial_settings_record_fills_defaults() {
    let backend = Arc::new(MemoryStore::new());
    backend.set(SETTINGS_KEY, r#"{"apiKey":"k"}"#).unwrap();

    let store = SettingsStore::new(backend);
    let settings = store.load();
    assert_eq!(settings.api_key, "k");
    assert_eq!(settings.selected_currency, "USD");
}
