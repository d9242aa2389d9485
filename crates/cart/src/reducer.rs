//! Pure cart state transitions.
//!
//! `reduce` is side-effect free: persistence and notification are the
//! engine's job. Every transition rebuilds the line list and re-derives
//! all aggregates from scratch; nothing is patched incrementally.

use rbos_primitives::cart::{CartLine, CartState};

/// A menu item being added to the cart; quantity starts at 1.
#[derive(Clone, Debug, PartialEq)]
pub struct NewLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: f64,
    pub notes: Option<String>,
    pub image_url: Option<String>,
    pub dietary_tags: Option<String>,
}

impl NewLine {
    #[must_use]
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, unit_price: f64) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            unit_price,
            notes: None,
            image_url: None,
            dietary_tags: None,
        }
    }

    fn into_line(self) -> CartLine {
        let mut line = CartLine::new(self.item_id, self.name, self.unit_price);
        line.notes = self.notes;
        line.image_url = self.image_url;
        line.dietary_tags = self.dietary_tags;
        line
    }
}

#[derive(Clone, Debug)]
pub enum CartAction {
    /// Add one of the given item; an existing line with the same id has
    /// its quantity incremented instead.
    AddItem(NewLine),
    /// Set a line's quantity. Zero or negative removes the line.
    UpdateQuantity { item_id: String, qty: i64 },
    /// Remove a line. Unknown ids are a no-op.
    RemoveItem { item_id: String },
    /// Reset to the empty cart: no lines, zero totals, no banners.
    ClearCart,
    /// Wholesale replacement with a server-resolved cart. Reserved for
    /// the engine's reconciliation path; everything else mutates through
    /// the other actions.
    ReplaceState(CartState),
}

/// Apply an action to a cart state, yielding the next state.
#[must_use]
pub fn reduce(state: &CartState, action: CartAction) -> CartState {
    match action {
        CartAction::AddItem(item) => {
            let mut lines = state.lines.clone();

            match lines.iter_mut().find(|line| line.item_id == item.item_id) {
                Some(line) => line.qty = line.qty.saturating_add(1),
                None => lines.push(item.into_line()),
            }

            CartState::from_lines(lines, state.banners.clone())
        }
        CartAction::UpdateQuantity { item_id, qty } => {
            if qty <= 0 {
                return reduce(state, CartAction::RemoveItem { item_id });
            }

            let mut lines = state.lines.clone();

            if let Some(line) = lines.iter_mut().find(|line| line.item_id == item_id) {
                line.qty = u32::try_from(qty).unwrap_or(u32::MAX);
            }

            CartState::from_lines(lines, state.banners.clone())
        }
        CartAction::RemoveItem { item_id } => {
            let lines = state
                .lines
                .iter()
                .filter(|line| line.item_id != item_id)
                .cloned()
                .collect();

            CartState::from_lines(lines, state.banners.clone())
        }
        CartAction::ClearCart => CartState::default(),
        CartAction::ReplaceState(next) => CartState::from_lines(next.lines, next.banners),
    }
}
