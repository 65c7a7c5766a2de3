//! Repositories orchestrating domain operations over the store.

pub mod shift;
pub mod stock;

pub use shift::ShiftRepository;
pub use stock::StockRepository;
