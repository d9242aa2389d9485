use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use rbos_primitives::server::{CartMergeRequest, CartMergeResponse};
use rbos_primitives::token::CartToken;

/// The two operations the cart engine needs from the backend.
///
/// Both are idempotent from the client's perspective: repeating a merge
/// with the same input must not compound server-side conflicts, and the
/// response is always treated as an atomic replacement of local state.
#[async_trait]
pub trait CartGateway: Send + Sync {
    /// Resolve an existing (typically anonymous) cart by token.
    async fn fetch_cart(&self, token: Option<&CartToken>) -> Result<CartMergeResponse>;

    /// Offer the local lines for merging; the server answers with the
    /// authoritative resolved cart plus any conflicts it detected.
    async fn merge_cart(&self, request: &CartMergeRequest) -> Result<CartMergeResponse>;
}

#[async_trait]
impl<T> CartGateway for Arc<T>
where
    T: CartGateway + ?Sized,
{
    async fn fetch_cart(&self, token: Option<&CartToken>) -> Result<CartMergeResponse> {
        (**self).fetch_cart(token).await
    }

    async fn merge_cart(&self, request: &CartMergeRequest) -> Result<CartMergeResponse> {
        (**self).merge_cart(request).await
    }
}
