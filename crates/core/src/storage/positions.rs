use std::sync::Arc;

use crate::models::position::Position;

use super::store::KeyValueStore;

/// Storage record key for the position collection.
pub const POSITIONS_KEY: &str = "portfolio_positions";

/// Durable store for the position list.
///
/// Whole-collection snapshot semantics: every mutation writes the entire
/// list back. Corrupt or unreadable storage yields an empty list, and
/// write failures are logged and absorbed — storage problems never
/// propagate to the engine's callers.
pub struct PositionStore {
    store: Arc<dyn KeyValueStore>,
}

impl PositionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the stored position list, or an empty list on any failure.
    #[must_use]
    pub fn load(&self) -> Vec<Position> {
        let raw = match self.store.get(POSITIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Failed to read positions record: {e}");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(positions) => positions,
            Err(e) => {
                log::warn!("Corrupt positions record, starting empty: {e}");
                Vec::new()
            }
        }
    }

    /// Persist the full position list as one snapshot.
    pub fn save(&self, positions: &[Position]) {
        let raw = match serde_json::to_string(positions) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("Failed to serialize positions: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(POSITIONS_KEY, &raw) {
            log::warn!("Failed to write positions record: {e}");
        }
    }
}
