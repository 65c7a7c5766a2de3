//! Common types used across the application.

pub mod id;
pub mod pagination;
pub mod quantity;


pub use id::*;
pub use pagination::{MAX_PER_PAGE, PageMeta, PageRequest, PageResponse};
pub use quantity::{percent_of, round_litres, round_money};
