//! Domain layer: orders, products, pagination and the storage ports the
//! application layer depends on.

pub mod order;
pub mod pagination;
pub mod ports;
pub mod product;
pub mod validation;
