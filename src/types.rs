//! Public types, re-exported from the layer crates.

// Values and identities
pub use tessera_core::{ColumnId, RowId, TableId, Value};

// Schema
pub use tessera_core::{
    AutoIncrement, Column, ColumnAlias, ColumnKey, ColumnType, Expression, FnExpression,
    RowValues, TableKey,
};

// Row lifecycle
pub use tessera_core::{RowState, RowVersion};

// Constraints and errors
pub use tessera_core::{Error, ErrorKind, ForeignKey, Result, UniqueConstraint, Violation, ViolationKind};

// Engine
pub use tessera_engine::{
    ColumnChangeEvent, ColumnPhase, DataSet, DataSetLoad, DataSetOptions, ListenerId, LoadScope,
    Relation, RelationKey, RowChange, RowChangeEvent, RowImage, Table, TableMut, TableOptions,
};
