use std::io;

use thiserror::Error;

/// Failures on the store's write path.
///
/// The read path never surfaces errors: malformed or missing slot data
/// loads as an empty cart.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode slot {slot:?}")]
    Encode {
        slot: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write slot {slot:?}")]
    Write {
        slot: &'static str,
        #[source]
        source: io::Error,
    },
}
