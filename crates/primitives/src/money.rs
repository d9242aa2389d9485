//! Cents-precision arithmetic for cart totals.
//!
//! All monetary values travel as JSON numbers, so they are `f64` here.
//! Every aggregate is rounded to cents on derivation; nothing is patched
//! incrementally, which keeps float drift out of persisted carts.

/// Fixed sales tax rate applied to the cart subtotal.
pub const TAX_RATE: f64 = 0.08;

/// Round a monetary value to cents.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Line total for a quantity at a unit price, reconciled to cents.
#[must_use]
pub fn line_total(qty: u32, unit_price: f64) -> f64 {
    round2(f64::from(qty) * unit_price)
}
