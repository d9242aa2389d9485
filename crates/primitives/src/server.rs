//! Wire types for the cart gateway endpoints.
//!
//! `GET /cart` and `POST /cart/merge` both answer with [`CartMergeResponse`].
//! The response is authoritative: the client replaces its local cart with
//! it wholesale and never unions the two line lists.

use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::conflict::ConflictReport;
use crate::token::CartToken;

/// One locally-held line offered to the server for merging. Quantities
/// are proposals; the server applies inventory and business rules before
/// answering.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeItem {
    pub item_id: String,
    pub qty: u32,
    pub unit_price: f64,
    pub name: String,
}

impl MergeItem {
    #[must_use]
    pub fn new(
        item_id: impl Into<String>,
        qty: u32,
        unit_price: f64,
        name: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            qty,
            unit_price,
            name: name.into(),
        }
    }
}

impl From<&CartLine> for MergeItem {
    fn from(line: &CartLine) -> Self {
        Self::new(
            line.item_id.clone(),
            line.qty,
            line.unit_price,
            line.name.clone(),
        )
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMergeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_token: Option<CartToken>,
    pub items: Vec<MergeItem>,
}

impl CartMergeRequest {
    #[must_use]
    pub fn new(cart_token: Option<CartToken>, items: Vec<MergeItem>) -> Self {
        Self { cart_token, items }
    }
}

/// The resolved cart the server answers with, plus anything it changed
/// along the way. A missing `cart_token` means "no rotation"; a missing
/// `conflicts` means nothing was adjusted.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMergeResponse {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_token: Option<CartToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<ConflictReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_request_serializes_camel_case() {
        let request = CartMergeRequest::new(
            Some(CartToken::from("t0")),
            vec![MergeItem::new("soda", 1, 2.5, "Soda")],
        );

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["cartToken"], "t0");
        assert_eq!(json["items"][0]["itemId"], "soda");
        assert_eq!(json["items"][0]["unitPrice"], 2.5);
    }

    #[test]
    fn merge_request_omits_absent_token() {
        let request = CartMergeRequest::new(None, vec![]);
        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("cartToken").is_none());
    }

    #[test]
    fn response_tolerates_sparse_payloads() {
        // a server answering an anonymous fetch with no cart at all
        let response: CartMergeResponse = serde_json::from_str("{}").unwrap();

        assert!(response.items.is_empty());
        assert!(response.cart_token.is_none());
        assert!(response.conflicts.is_none());

        // and one answering with lines that omit lineTotal
        let response: CartMergeResponse = serde_json::from_str(
            r#"{"items":[{"itemId":"soda","name":"Soda","unitPrice":2.5,"qty":2}],"cartToken":"t1"}"#,
        )
        .unwrap();

        assert_eq!(response.items[0].qty, 2);
        assert_eq!(response.cart_token, Some(CartToken::from("t1")));
    }
}
