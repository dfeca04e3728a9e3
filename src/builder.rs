//! Builder for tables and data sets sharing one set of options.

use crate::sync::{SharedDataSet, SharedTable};
use tessera_core::Result;
use tessera_engine::{DataSet, DataSetOptions, Table};

/// Builder for tables and data sets.
///
/// # Example
///
/// ```
/// use tesseradb::StoreBuilder;
///
/// // Exact column names, checks deferred to explicit validation
/// let table = StoreBuilder::new()
///     .case_sensitive(true)
///     .enforce_constraints(false)
///     .table("Orders");
/// assert!(table.options().case_sensitive);
///
/// // Options read from a TOML document
/// let ds = StoreBuilder::from_toml_str("case_sensitive = true")?.data_set("Sales");
/// assert!(ds.options().enforce_constraints);
/// # Ok::<(), tesseradb::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreBuilder {
    options: DataSetOptions,
}

impl StoreBuilder {
    /// Create a builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder from a TOML options document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(Self {
            options: DataSetOptions::from_toml_str(source)?,
        })
    }

    /// Resolve names exactly only.
    pub fn case_sensitive(mut self, on: bool) -> Self {
        self.options.case_sensitive = on;
        self
    }

    /// Check constraints after every committing mutation.
    pub fn enforce_constraints(mut self, on: bool) -> Self {
        self.options.enforce_constraints = on;
        self
    }

    /// Options the builder will apply.
    pub fn options(&self) -> DataSetOptions {
        self.options
    }

    /// Build an empty table.
    pub fn table(&self, name: impl Into<String>) -> Table {
        Table::with_options(name, self.options.table_options())
    }

    /// Build an empty data set.
    pub fn data_set(&self, name: impl Into<String>) -> DataSet {
        DataSet::with_options(name, self.options)
    }

    /// Build an empty table behind a lock.
    pub fn shared_table(&self, name: impl Into<String>) -> SharedTable {
        SharedTable::new(self.table(name))
    }

    /// Build an empty data set behind a lock.
    pub fn shared_data_set(&self, name: impl Into<String>) -> SharedDataSet {
        SharedDataSet::new(self.data_set(name))
    }
}
