//! In-memory store and repositories for Fuelbook.
//!
//! Records live in id-keyed maps behind a single `RwLock`. Repositories
//! serialize work per shift and per fuel through keyed locks, compute
//! everything they need under a read lock, and commit in one write so a
//! failed operation leaves no partial state behind.

pub mod locks;
pub mod repositories;
mod tables;

pub use locks::KeyedLocks;
pub use repositories::{ShiftRepository, StockRepository};

use fuelbook_core::catalog::FuelType;
use fuelbook_core::shift::ShiftError;
use fuelbook_core::stock::StockError;
use fuelbook_shared::types::ShiftId;
use std::sync::RwLock;
use thiserror::Error;

use crate::tables::Tables;

/// Store infrastructure failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lock was poisoned by a panicking writer.
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}

impl From<StoreError> for ShiftError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<StoreError> for StockError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Shared arena holding every record.
#[derive(Default)]
pub struct Store {
    tables: RwLock<Tables>,
    shift_locks: KeyedLocks<ShiftId>,
    fuel_locks: KeyedLocks<FuelType>,
}

impl Store {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::Poisoned("tables"))?;
        Ok(f(&tables))
    }

    /// Runs `f` under the write lock. `f` must validate before it mutates.
    pub(crate) fn write<T, E>(&self, f: impl FnOnce(&mut Tables) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::Poisoned("tables"))?;
        f(&mut tables)
    }
}
