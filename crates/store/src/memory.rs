use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use eyre::{eyre, Result};
use rbos_primitives::cart::CartState;
use rbos_primitives::conflict::ConflictReport;
use rbos_primitives::token::CartToken;
use tracing::warn;

use crate::traits::CartStorage;
use crate::{codec, CART_SLOT, PENDING_CONFLICTS_SLOT};

/// In-memory cart storage for tests and embedders without a filesystem.
///
/// Slots hold raw JSON strings, so loads run through the same decode and
/// normalization path as the file backend, legacy shapes included.
#[derive(Clone, Debug, Default)]
pub struct MemoryCartStorage {
    slots: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot with raw JSON, e.g. a legacy-shaped cart.
    pub fn insert_raw(&self, slot: &str, raw: impl Into<String>) {
        if let Ok(mut slots) = self.slots.write() {
            let _previous = slots.insert(slot.to_owned(), raw.into());
        }
    }

    /// Raw contents of a slot, if present.
    #[must_use]
    pub fn raw(&self, slot: &str) -> Option<String> {
        self.slots.read().ok()?.get(slot).cloned()
    }

    fn take_raw(&self, slot: &str) -> Option<String> {
        self.slots.write().ok()?.remove(slot)
    }

    fn put_raw(&self, slot: &str, raw: String) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| eyre!("failed to acquire write lock on slots"))?;
        let _previous = slots.insert(slot.to_owned(), raw);
        Ok(())
    }
}

#[async_trait]
impl CartStorage for MemoryCartStorage {
    async fn load(&self) -> (CartState, Option<CartToken>) {
        let Some(raw) = self.raw(CART_SLOT) else {
            return (CartState::default(), None);
        };

        codec::decode_cart_slot(&raw).unwrap_or_else(|| {
            warn!(slot = CART_SLOT, "malformed cart slot; starting empty");
            (CartState::default(), None)
        })
    }

    async fn save(&self, state: &CartState, token: Option<&CartToken>) -> Result<()> {
        let raw = codec::encode_cart_slot(state, token)?;
        self.put_raw(CART_SLOT, raw)
    }

    async fn take_pending_conflicts(&self) -> Option<ConflictReport> {
        let raw = self.take_raw(PENDING_CONFLICTS_SLOT)?;
        codec::decode_conflicts(&raw)
    }

    async fn stash_pending_conflicts(&self, report: &ConflictReport) -> Result<()> {
        let raw = codec::encode_conflicts(report)?;
        self.put_raw(PENDING_CONFLICTS_SLOT, raw)
    }
}

#[cfg(test)]
mod tests {
    use rbos_primitives::cart::CartLine;

    use super::*;

    #[tokio::test]
    async fn legacy_seed_loads_deduplicated() {
        let store = MemoryCartStorage::new();
        store.insert_raw(
            CART_SLOT,
            r#"{
                "items": [
                    {"itemId": "soda", "name": "Soda", "unitPrice": 2.5, "qty": 1},
                    {"itemId": "soda", "name": "Soda", "unitPrice": 2.5, "qty": 1}
                ],
                "subtotal": 0, "tax": 0, "total": 0, "banners": []
            }"#,
        );

        let (state, token) = store.load().await;

        assert_eq!(state.lines.len(), 1);
        assert_eq!(state.lines[0].qty, 2);
        assert_eq!(state.subtotal, 5.0);
        assert_eq!(token, None);
    }

    #[tokio::test]
    async fn save_writes_wrapped_shape() {
        let store = MemoryCartStorage::new();
        let state = CartState::from_lines(vec![CartLine::new("soda", "Soda", 2.5)], vec![]);

        store
            .save(&state, Some(&CartToken::from("t0")))
            .await
            .unwrap();

        let raw = store.raw(CART_SLOT).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.get("state").is_some());
        assert_eq!(json["cartToken"], "t0");
    }
}
