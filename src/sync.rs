//! Lock-wrapped handles for sharing across threads.
//!
//! The engine assumes exclusive access during every call. These handles
//! serialize callers with one `parking_lot` mutex per table or data set.

use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use tessera_engine::{DataSet, Table};

/// A table shared between threads.
#[derive(Debug, Clone)]
pub struct SharedTable(Arc<Mutex<Table>>);

impl SharedTable {
    /// Put a table behind a lock.
    pub fn new(table: Table) -> Self {
        Self(Arc::new(Mutex::new(table)))
    }

    /// Exclusive access until the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, Table> {
        self.0.lock()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut Table) -> R) -> R {
        f(&mut self.0.lock())
    }
}

/// A data set shared between threads.
#[derive(Debug, Clone)]
pub struct SharedDataSet(Arc<Mutex<DataSet>>);

impl SharedDataSet {
    /// Put a data set behind a lock.
    pub fn new(data_set: DataSet) -> Self {
        Self(Arc::new(Mutex::new(data_set)))
    }

    /// Exclusive access until the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, DataSet> {
        self.0.lock()
    }

    /// Run `f` with exclusive access.
    pub fn with<R>(&self, f: impl FnOnce(&mut DataSet) -> R) -> R {
        f(&mut self.0.lock())
    }
}
