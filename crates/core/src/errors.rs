use thiserror::Error;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Quote / Rate providers ──────────────────────────────────────
    #[error("No API key configured. Add your EODHD API key in settings.")]
    AuthRequired,

    #[error("Symbol {0} not found")]
    SymbolNotFound(String),

    #[error("No price data available for {0}")]
    NoPriceData(String),

    #[error("Provider error ({provider}): {message}")]
    Provider {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Portfolio engine ────────────────────────────────────────────
    #[error("Position for {0} already exists")]
    DuplicatePosition(String),

    #[error("A price refresh is already in progress")]
    RefreshInProgress,

    #[error("Invalid currency code '{0}': must be exactly 3 ASCII letters (e.g., USD, EUR, PLN)")]
    InvalidCurrency(String),

    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
