use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Opaque identifier correlating a client's cart with server-side state,
/// independent of any login session.
///
/// The store owns the persisted copy. Every gateway request may carry the
/// current token; every response may carry a replacement, which must
/// overwrite the stored one.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct CartToken(String);

impl CartToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for CartToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CartToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for CartToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for CartToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<CartToken> for String {
    fn from(token: CartToken) -> Self {
        token.0
    }
}
