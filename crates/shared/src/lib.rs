//! Shared types, errors, and configuration for Fuelbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Decimal rounding helpers for money and litres
//! - Pagination types for list endpoints
//! - The HTTP-facing error envelope
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ReconciliationConfig};
pub use error::{AppError, AppResult};
