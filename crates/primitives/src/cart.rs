use serde::{Deserialize, Serialize};

use crate::money::{self, TAX_RATE};

/// A single order line in a cart.
///
/// `item_id` is unique within a cart's line list; two lines sharing an id
/// are collapsed into one (quantities summed) whenever the list is
/// rebuilt. `line_total` always equals `qty * unit_price` to cents.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub qty: u32,
    #[serde(default)]
    pub line_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_tags: Option<String>,
}

impl CartLine {
    /// A fresh line with quantity 1.
    #[must_use]
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, unit_price: f64) -> Self {
        let mut line = Self {
            item_id: item_id.into(),
            name: name.into(),
            unit_price,
            qty: 1,
            line_total: 0.0,
            notes: None,
            image_url: None,
            dietary_tags: None,
        };
        line.reconcile();
        line
    }

    #[must_use]
    pub fn with_qty(mut self, qty: u32) -> Self {
        self.qty = qty;
        self.reconcile();
        self
    }

    /// Re-derive `line_total` from `qty` and `unit_price`.
    pub fn reconcile(&mut self) {
        self.line_total = money::line_total(self.qty, self.unit_price);
    }
}

/// The in-memory cart: order lines, derived totals, and pending notice
/// banners.
///
/// Serialized with the line list under `items`, matching both the durable
/// storage shape and the gateway wire format.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    #[serde(default, rename = "items")]
    pub lines: Vec<CartLine>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub banners: Vec<String>,
}

impl CartState {
    /// Build a normalized state from a list of lines.
    ///
    /// Lines sharing an `item_id` collapse into the first occurrence with
    /// quantities summed, every `line_total` is re-derived, and all
    /// aggregates are recomputed from scratch.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>, banners: Vec<String>) -> Self {
        let lines = dedupe_lines(lines);
        let subtotal = money::round2(lines.iter().map(|line| line.line_total).sum());
        let tax = money::round2(subtotal * TAX_RATE);
        let total = money::round2(subtotal + tax);

        Self {
            lines,
            subtotal,
            tax,
            total,
            banners,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Collapse duplicate `item_id` rows, preserving first-seen order.
fn dedupe_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut deduped: Vec<CartLine> = Vec::with_capacity(lines.len());

    for line in lines {
        if let Some(existing) = deduped
            .iter_mut()
            .find(|existing| existing.item_id == line.item_id)
        {
            existing.qty = existing.qty.saturating_add(line.qty);
            existing.reconcile();
        } else {
            let mut line = line;
            line.reconcile();
            deduped.push(line);
        }
    }

    deduped
}
