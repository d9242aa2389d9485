use std::fmt;

use serde::{Deserialize, Serialize};

/// The value distinguishing which authenticated principal, if any, is
/// currently active. Anonymous sessions are represented as
/// `Option::<IdentityKey>::None` by callers.
///
/// Only equality matters to the cart engine; the full user object never
/// crosses this boundary. Two different authenticated users in sequence
/// are two distinct keys and each requires its own reconciliation.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for IdentityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for IdentityKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

impl From<u64> for IdentityKey {
    fn from(key: u64) -> Self {
        Self(key.to_string())
    }
}
