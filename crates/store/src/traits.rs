use async_trait::async_trait;
use eyre::Result;
use rbos_primitives::cart::CartState;
use rbos_primitives::conflict::ConflictReport;
use rbos_primitives::token::CartToken;

/// Abstract persistence for the cart engine.
///
/// Implementations back this with whatever the host has: a directory of
/// JSON files, an in-memory map for tests, a browser storage bridge.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Load the durable cart slot.
    ///
    /// Infallible by contract: missing or malformed data loads as the
    /// empty cart with no token. Implementations log and move on rather
    /// than surface storage corruption to the UI.
    async fn load(&self) -> (CartState, Option<CartToken>);

    /// Persist the durable cart slot in the wrapped shape.
    async fn save(&self, state: &CartState, token: Option<&CartToken>) -> Result<()>;

    /// One-shot read of the pending-conflicts slot; clears it.
    async fn take_pending_conflicts(&self) -> Option<ConflictReport>;

    /// Stash a conflict report for later consumption. Overwrites the
    /// slot; callers fold the current slot contents in first via
    /// [`Self::take_pending_conflicts`].
    async fn stash_pending_conflicts(&self, report: &ConflictReport) -> Result<()>;
}
