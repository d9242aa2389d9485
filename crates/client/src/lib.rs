//! Gateway to the server-side cart.
//!
//! The trait seam lets the engine run against any transport; the bundled
//! implementation speaks HTTP with the cart token travelling in a custom
//! header both ways.

pub mod connection;
pub mod traits;

pub use connection::{HttpCartGateway, CART_TOKEN_HEADER};
pub use traits::CartGateway;
