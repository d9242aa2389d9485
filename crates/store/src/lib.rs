//! Durable persistence for the cart engine.
//!
//! The store owns two slots: the durable cart slot (serialized state plus
//! the opaque cart token) and a pending-conflicts slot holding a conflict
//! report that arrived but has not yet been shown, so an interruption
//! between a merge response and its rendering cannot lose the report.
//!
//! The durable slot is shared across processes of the same installation
//! with no locking; the last writer wins. That race is a known property
//! of the original storage layer and is deliberately left as-is.

pub mod codec;
pub mod errors;
pub mod file;
pub mod memory;
pub mod traits;

pub use errors::StoreError;
pub use file::FileCartStorage;
pub use memory::MemoryCartStorage;
pub use traits::CartStorage;

/// Name of the durable cart slot.
pub const CART_SLOT: &str = "rbos_cart";

/// Name of the one-shot pending-conflicts slot.
pub const PENDING_CONFLICTS_SLOT: &str = "rbos_cart_conflicts";
