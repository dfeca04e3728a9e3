//! Table and data set options
//!
//! Options are plain serde structs with defaults, so they can be built in
//! code or read from TOML:
//!
//! ```
//! use tessera_engine::TableOptions;
//!
//! let options = TableOptions::from_toml_str("case_sensitive = true").unwrap();
//! assert!(options.case_sensitive);
//! assert!(options.enforce_constraints);
//! ```

use serde::{Deserialize, Serialize};
use tessera_core::{Error, Result};

/// Behavior switches of a single table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Resolve column names exactly only
    pub case_sensitive: bool,
    /// Validate constraints after every committing mutation
    pub enforce_constraints: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            case_sensitive: false,
            enforce_constraints: true,
        }
    }
}

impl TableOptions {
    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source)
            .map_err(|e| Error::InvalidArgument(format!("invalid table options: {}", e)))
    }
}

/// Behavior switches of a data set, pushed into every table it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSetOptions {
    /// Resolve table, column and relation names exactly only
    pub case_sensitive: bool,
    /// Validate constraints after every committing mutation
    pub enforce_constraints: bool,
}

impl Default for DataSetOptions {
    fn default() -> Self {
        DataSetOptions {
            case_sensitive: false,
            enforce_constraints: true,
        }
    }
}

impl DataSetOptions {
    /// Parse options from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source)
            .map_err(|e| Error::InvalidArgument(format!("invalid data set options: {}", e)))
    }

    /// Options applied to member tables
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            case_sensitive: self.case_sensitive,
            enforce_constraints: self.enforce_constraints,
        }
    }
}
