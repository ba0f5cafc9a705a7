use serde::{Deserialize, Serialize};

fn default_currency() -> String {
    "USD".to_string()
}

/// User-configurable settings, persisted as their own storage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// EODHD API key. Empty string means no key configured.
    #[serde(default)]
    pub api_key: String,

    /// The currency in which all portfolio values are displayed.
    #[serde(default = "default_currency")]
    pub selected_currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            selected_currency: default_currency(),
        }
    }
}
