pub mod traits;

// API provider implementations
pub mod eodhd;
pub mod exchange_rate;
