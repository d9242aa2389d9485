//! Slot encoding and decoding, including legacy shape tolerance.
//!
//! The durable cart slot has carried two shapes over time: a bare
//! serialized cart (`{items, subtotal, tax, total, banners}`) and the
//! current wrapped form (`{state: {...}, cartToken}`). Both decode; only
//! the wrapped form is ever written back.

use rbos_primitives::cart::CartState;
use rbos_primitives::conflict::ConflictReport;
use rbos_primitives::token::CartToken;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::CART_SLOT;

/// The wrapped on-disk shape of the durable cart slot.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedCart {
    state: CartState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cart_token: Option<CartToken>,
}

/// Decode the durable cart slot, whichever shape it holds.
///
/// Returns `None` for unparseable data. The decoded state is normalized:
/// duplicate `item_id` rows collapse (quantities summed) and all totals
/// are re-derived, which shields the cart from any duplicate rows an
/// older version may have persisted.
#[must_use]
pub fn decode_cart_slot(raw: &str) -> Option<(CartState, Option<CartToken>)> {
    // Wrapped shape first: a bare decode of a wrapped document would
    // succeed with every field defaulted and silently drop the cart.
    if let Ok(wrapped) = serde_json::from_str::<PersistedCart>(raw) {
        return Some((normalize(wrapped.state), wrapped.cart_token));
    }

    if let Ok(bare) = serde_json::from_str::<CartState>(raw) {
        return Some((normalize(bare), None));
    }

    None
}

/// Encode the durable cart slot in the wrapped shape.
pub fn encode_cart_slot(
    state: &CartState,
    cart_token: Option<&CartToken>,
) -> Result<String, StoreError> {
    let persisted = PersistedCart {
        state: state.clone(),
        cart_token: cart_token.cloned(),
    };

    serde_json::to_string(&persisted).map_err(|source| StoreError::Encode {
        slot: CART_SLOT,
        source,
    })
}

#[must_use]
pub fn decode_conflicts(raw: &str) -> Option<ConflictReport> {
    serde_json::from_str(raw).ok()
}

pub fn encode_conflicts(report: &ConflictReport) -> Result<String, StoreError> {
    serde_json::to_string(report).map_err(|source| StoreError::Encode {
        slot: crate::PENDING_CONFLICTS_SLOT,
        source,
    })
}

fn normalize(state: CartState) -> CartState {
    CartState::from_lines(state.lines, state.banners)
}
