pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

use errors::CoreError;
use models::{
    position::{Position, PositionUpdate},
    price::PriceObservation,
    quote::{Quote, QuoteResult},
    settings::Settings,
    valuation::PortfolioValuation,
};
use providers::eodhd::EodhdProvider;
use providers::exchange_rate::ExchangeRateApiProvider;
use providers::traits::{QuoteProvider, RateProvider};
use services::quote_service::QuoteService;
use services::rate_service::RateService;
use services::valuation::compute_valuation;
use storage::positions::PositionStore;
use storage::prices::PriceCacheStore;
use storage::settings::SettingsStore;
use storage::store::KeyValueStore;

/// Main entry point for the Portfolio Tracker core library.
///
/// Owns the in-memory position list and per-position quote results, drives
/// position creation/editing/removal and bulk price refreshes, merges
/// freshly-fetched metadata back into stored positions, and derives
/// valuation data in the selected display currency.
///
/// Mutating operations take `&mut self`, so an add and a refresh can never
/// interleave their read-modify-write of the position list. The `loading`
/// flag additionally rejects a refresh requested while one is already in
/// flight for hosts that queue calls behind their own lock.
#[must_use]
pub struct PortfolioTracker {
    positions: Vec<Position>,
    /// Current fetch outcome per position id. Keyed by id, not symbol,
    /// since the canonical symbol may change across a refresh.
    quotes: HashMap<Uuid, QuoteResult>,
    settings: Settings,
    exchange_rates: HashMap<String, f64>,
    /// Distinct currencies across positions, sorted ascending.
    available_currencies: Vec<String>,
    last_refresh: Option<DateTime<Utc>>,
    loading: bool,

    quote_service: QuoteService,
    rate_service: RateService,
    position_store: PositionStore,
    price_store: PriceCacheStore,
    settings_store: SettingsStore,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("positions", &self.positions.len())
            .field("selected_currency", &self.settings.selected_currency)
            .field("available_currencies", &self.available_currencies)
            .field("loading", &self.loading)
            .field("last_refresh", &self.last_refresh)
            .finish()
    }
}

impl PortfolioTracker {
    /// Open a tracker over a storage backend with the default EODHD and
    /// exchangerate-api providers.
    ///
    /// Performs the cold-start reconstruction: positions are loaded from
    /// storage and, for each one with currency metadata and a cached
    /// price, a quote is synthesized from the cache. No network calls
    /// happen at startup.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_providers(
            store,
            Box::new(EodhdProvider::new()),
            Box::new(ExchangeRateApiProvider::new()),
        )
    }

    /// Open a tracker with custom provider implementations.
    pub fn with_providers(
        store: Arc<dyn KeyValueStore>,
        quote_provider: Box<dyn QuoteProvider>,
        rate_provider: Box<dyn RateProvider>,
    ) -> Self {
        let position_store = PositionStore::new(Arc::clone(&store));
        let price_store = PriceCacheStore::new(Arc::clone(&store));
        let settings_store = SettingsStore::new(store);

        let settings = settings_store.load();
        let positions = position_store.load();

        // Cold-start reconstruction: synthesize quotes from the price cache
        // so the portfolio is usable offline before the first refresh.
        let history = price_store.load();
        let mut quotes = HashMap::new();
        let mut currencies = BTreeSet::new();
        let mut last_refresh: Option<DateTime<Utc>> = None;

        for position in &positions {
            let Some(observation) = history.latest(&position.symbol) else {
                continue;
            };
            let Some(currency) = position.currency.clone() else {
                continue;
            };

            quotes.insert(
                position.id,
                QuoteResult::Success(Quote {
                    symbol: position.symbol.clone(),
                    name: position.name.clone(),
                    currency: currency.clone(),
                    exchange_name: position.exchange_name.clone(),
                    country: position.country.clone(),
                    kind: position.kind.clone(),
                    isin: position.isin.clone(),
                    price: observation.price,
                    timestamp: observation.timestamp,
                }),
            );
            currencies.insert(currency);

            if last_refresh.map_or(true, |t| observation.timestamp > t) {
                last_refresh = Some(observation.timestamp);
            }
        }

        Self {
            positions,
            quotes,
            settings,
            exchange_rates: HashMap::new(),
            available_currencies: currencies.into_iter().collect(),
            last_refresh,
            loading: false,
            quote_service: QuoteService::new(quote_provider),
            rate_service: RateService::new(rate_provider),
            position_store,
            price_store,
            settings_store,
        }
    }

    // ── Position Management ─────────────────────────────────────────

    /// Add a new position for `symbol`.
    ///
    /// The symbol is fully resolved through the provider's search endpoint
    /// first — the position is created under the canonical symbol, which
    /// may differ from what the user typed. Fails with `DuplicatePosition`
    /// when the resolved symbol already exists, leaving state untouched.
    /// Returns the new position's id.
    pub async fn add_position(
        &mut self,
        symbol: &str,
        shares: f64,
        target_allocation: f64,
    ) -> Result<Uuid, CoreError> {
        self.loading = true;

        // Full resolution, no cached metadata: this may be a never-seen symbol.
        let quote = match self
            .quote_service
            .resolve_and_fetch(&self.settings.api_key, symbol, None)
            .await
        {
            Ok(quote) => quote,
            Err(e) => {
                self.loading = false;
                return Err(e);
            }
        };

        if self.positions.iter().any(|p| p.symbol == quote.symbol) {
            self.loading = false;
            return Err(CoreError::DuplicatePosition(quote.symbol));
        }

        let position = Position {
            id: Uuid::new_v4(),
            symbol: quote.symbol.clone(),
            shares,
            target_allocation,
            name: quote.name.clone(),
            currency: Some(quote.currency.clone()),
            exchange_name: quote.exchange_name.clone(),
            country: quote.country.clone(),
            kind: quote.kind.clone(),
            isin: quote.isin.clone(),
        };
        let id = position.id;
        let currency = quote.currency.clone();

        self.positions.push(position);
        self.position_store.save(&self.positions);

        self.price_store.record(
            &quote.symbol,
            PriceObservation {
                timestamp: quote.timestamp,
                price: quote.price,
            },
        );

        self.quotes.insert(id, QuoteResult::Success(quote));

        // Only a newly-introduced currency warrants a rate refresh
        let newly_seen = !self.available_currencies.contains(&currency);
        if newly_seen {
            self.available_currencies.push(currency);
            self.available_currencies.sort();
            self.sync_exchange_rates().await;
        }

        self.last_refresh = Some(Utc::now());
        self.loading = false;
        Ok(id)
    }

    /// Apply a partial update to a position's user-mutable fields.
    /// An unknown id is a silent no-op — idempotent-edit behavior, not an
    /// error.
    pub fn edit_position(&mut self, id: Uuid, update: PositionUpdate) {
        let Some(position) = self.positions.iter_mut().find(|p| p.id == id) else {
            return;
        };

        if let Some(shares) = update.shares {
            position.shares = shares;
        }
        if let Some(target_allocation) = update.target_allocation {
            position.target_allocation = target_allocation;
        }

        self.position_store.save(&self.positions);
    }

    /// Remove a position and drop its quote.
    ///
    /// `available_currencies` is deliberately not recomputed here: a
    /// currency with no remaining position lingers in the selector until
    /// the next refresh.
    pub fn remove_position(&mut self, id: Uuid) {
        self.positions.retain(|p| p.id != id);
        self.position_store.save(&self.positions);
        self.quotes.remove(&id);
    }

    // ── Price Refresh ───────────────────────────────────────────────

    /// Refresh quotes for every position from the provider.
    ///
    /// No-op with zero positions. Stored metadata is reused to skip search
    /// calls; provider-resolved symbols and backfilled metadata are merged
    /// back into the position list (persisted only if something actually
    /// changed); every successful price lands in the cache; the quote map
    /// is rebuilt wholesale, so a position that fails this round loses its
    /// previously-displayed price. If the selected display currency is no
    /// longer available afterwards, it falls back to USD, then to the
    /// alphabetically-first remaining currency.
    pub async fn refresh_prices(&mut self) -> Result<(), CoreError> {
        if self.positions.is_empty() {
            return Ok(());
        }
        if self.loading {
            return Err(CoreError::RefreshInProgress);
        }
        self.loading = true;

        let symbols: Vec<String> = self.positions.iter().map(|p| p.symbol.clone()).collect();
        let metadata: HashMap<String, Position> = self
            .positions
            .iter()
            .filter(|p| p.currency.is_some())
            .map(|p| (p.symbol.clone(), p.clone()))
            .collect();

        let results = self
            .quote_service
            .fetch_many(&self.settings.api_key, &symbols, &metadata)
            .await;

        // Merge resolved symbols and backfilled metadata into stored positions
        let mut updated = self.positions.clone();
        for (position, result) in updated.iter_mut().zip(&results) {
            let QuoteResult::Success(quote) = result else {
                continue;
            };
            if quote.symbol != position.symbol {
                position.symbol = quote.symbol.clone();
            }
            if position.currency.is_none() {
                position.name = quote.name.clone();
                position.currency = Some(quote.currency.clone());
                position.exchange_name = quote.exchange_name.clone();
                position.country = quote.country.clone();
                position.kind = quote.kind.clone();
                position.isin = quote.isin.clone();
            }
        }
        if updated != self.positions {
            self.positions = updated;
            self.position_store.save(&self.positions);
        }

        // Record every successful price in one cache snapshot
        let mut history = self.price_store.load();
        for result in &results {
            if let QuoteResult::Success(quote) = result {
                history.record(
                    &quote.symbol,
                    PriceObservation {
                        timestamp: quote.timestamp,
                        price: quote.price,
                    },
                );
            }
        }
        self.price_store.save(&history);

        // Rebuild the quote map wholesale: results arrive in position order
        self.quotes = self
            .positions
            .iter()
            .zip(results)
            .map(|(position, result)| (position.id, result))
            .collect();
        self.last_refresh = Some(Utc::now());

        self.available_currencies = self
            .positions
            .iter()
            .filter_map(|p| p.currency.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        // Selected currency may have just become invalid
        if !self.available_currencies.is_empty()
            && !self
                .available_currencies
                .contains(&self.settings.selected_currency)
        {
            let fallback = if self.available_currencies.iter().any(|c| c == "USD") {
                "USD".to_string()
            } else {
                self.available_currencies[0].clone()
            };
            log::debug!(
                "Selected currency {} no longer available, falling back to {fallback}",
                self.settings.selected_currency
            );
            self.settings.selected_currency = fallback;
            self.settings_store.save(&self.settings);
        }

        self.sync_exchange_rates().await;
        self.loading = false;
        Ok(())
    }

    /// Fetch the exchange-rate table for the selected display currency.
    /// A no-op while no position currencies are known. Fails soft: rate
    /// staleness never blocks the rest of the engine.
    pub async fn sync_exchange_rates(&mut self) {
        if self.available_currencies.is_empty() {
            return;
        }
        self.exchange_rates = self
            .rate_service
            .rates(&self.settings.selected_currency)
            .await;
    }

    // ── Valuation ───────────────────────────────────────────────────

    /// Derive the current portfolio valuation in the selected display
    /// currency. Pure recomputation from current state — call after any
    /// state change.
    #[must_use]
    pub fn valuation(&self) -> PortfolioValuation {
        compute_valuation(
            &self.positions,
            &self.quotes,
            &self.settings.selected_currency,
            &self.exchange_rates,
        )
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Set the display currency (e.g., "USD", "EUR", "PLN") and re-sync
    /// exchange rates. Currency code must be a 3-letter alphabetic string.
    pub async fn set_selected_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidCurrency(currency.to_string()));
        }
        self.settings.selected_currency = trimmed;
        self.settings_store.save(&self.settings);
        self.sync_exchange_rates().await;
        Ok(())
    }

    /// Set the quote-provider API key. Takes effect on the next fetch.
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.settings.api_key = key.into();
        self.settings_store.save(&self.settings);
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Read-only State ─────────────────────────────────────────────

    /// Positions in storage order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Get a single position by its id.
    #[must_use]
    pub fn get_position(&self, id: Uuid) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// The current fetch outcome for a position, if any.
    #[must_use]
    pub fn quote_for(&self, id: Uuid) -> Option<&QuoteResult> {
        self.quotes.get(&id)
    }

    /// Distinct currencies across positions, sorted ascending.
    #[must_use]
    pub fn available_currencies(&self) -> &[String] {
        &self.available_currencies
    }

    /// The most recently fetched exchange-rate table.
    #[must_use]
    pub fn exchange_rates(&self) -> &HashMap<String, f64> {
        &self.exchange_rates
    }

    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Whether a network-bound operation is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // ── Cache Inspection ────────────────────────────────────────────

    /// All cached price observations for a symbol, oldest first.
    #[must_use]
    pub fn price_history(&self, symbol: &str) -> Vec<PriceObservation> {
        self.price_store.load().history(symbol).to_vec()
    }

    /// Total number of cached price observations across all symbols.
    #[must_use]
    pub fn cached_observation_count(&self) -> usize {
        self.price_store.load().total_observations()
    }
}
