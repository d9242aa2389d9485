//! HTTP implementation of the cart gateway.
//!
//! Modeled as a thin connection object: a base URL plus a reqwest client.
//! The cart token rides the [`CART_TOKEN_HEADER`] on every request; a
//! non-empty value of the same header on the response overrides any
//! token in the body.

use async_trait::async_trait;
use eyre::{bail, Result};
use rbos_primitives::server::{CartMergeRequest, CartMergeResponse};
use rbos_primitives::token::CartToken;
use reqwest::header::HeaderMap;
use reqwest::{Client, Response};
use url::Url;

use crate::traits::CartGateway;

/// Header carrying the cart token in both directions.
pub const CART_TOKEN_HEADER: &str = "X-Cart-Token";

#[derive(Clone, Debug)]
pub struct HttpCartGateway {
    api_url: Url,
    client: Client,
}

impl HttpCartGateway {
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url.join(path).map_err(Into::into)
    }

    async fn resolve(&self, response: Response) -> Result<CartMergeResponse> {
        if !response.status().is_success() {
            bail!("cart request failed with status: {}", response.status());
        }

        let header_token = response_token(response.headers());
        let mut body = response.json::<CartMergeResponse>().await?;

        if let Some(token) = header_token {
            body.cart_token = Some(token);
        }

        Ok(body)
    }
}

/// A replacement token from the response headers. Empty or absent means
/// "no rotation" at this layer; the body-level token, if any, stands.
fn response_token(headers: &HeaderMap) -> Option<CartToken> {
    headers
        .get(CART_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(CartToken::from)
}

#[async_trait]
impl CartGateway for HttpCartGateway {
    async fn fetch_cart(&self, token: Option<&CartToken>) -> Result<CartMergeResponse> {
        let mut builder = self.client.get(self.endpoint("cart")?);

        if let Some(token) = token {
            builder = builder.header(CART_TOKEN_HEADER, token.as_str());
        }

        self.resolve(builder.send().await?).await
    }

    async fn merge_cart(&self, request: &CartMergeRequest) -> Result<CartMergeResponse> {
        let mut builder = self.client.post(self.endpoint("cart/merge")?).json(request);

        if let Some(token) = &request.cart_token {
            builder = builder.header(CART_TOKEN_HEADER, token.as_str());
        }

        self.resolve(builder.send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;

    use super::*;

    #[test]
    fn response_token_ignores_empty_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(response_token(&headers), None);

        let _previous = headers.insert(CART_TOKEN_HEADER, HeaderValue::from_static(""));
        assert_eq!(response_token(&headers), None);

        let _previous = headers.insert(CART_TOKEN_HEADER, HeaderValue::from_static("t1"));
        assert_eq!(response_token(&headers), Some(CartToken::from("t1")));
    }

    #[test]
    fn endpoints_join_against_base() {
        let gateway = HttpCartGateway::new("http://localhost:4000/api/".parse().unwrap());

        assert_eq!(
            gateway.endpoint("cart").unwrap().as_str(),
            "http://localhost:4000/api/cart"
        );
        assert_eq!(
            gateway.endpoint("cart/merge").unwrap().as_str(),
            "http://localhost:4000/api/cart/merge"
        );
    }
}
