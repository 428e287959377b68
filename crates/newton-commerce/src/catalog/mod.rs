//! Product catalog types consumed by the cart.

mod product;

pub use product::Product;
