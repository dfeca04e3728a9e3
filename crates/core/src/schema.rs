//! Column schema
//!
//! A [`Column`] is built with chained setters and then handed to a table,
//! which owns it from then on. Every row of the table shares the table's
//! column list; rows only hold values.
//!
//! ## Assignment boundary
//!
//! Writes arrive as `Option<Value>`. `None` is the generic "no value"
//! marker and never reaches storage:
//!
//! | Column kind | `None` becomes |
//! |-------------|----------------|
//! | value kind (Bool, Int, Float) | invalid-argument error |
//! | everything else | `Value::Null` |

use crate::error::{Error, Result};
use crate::types::ColumnId;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Declared kind of a column's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Boolean (value kind)
    Bool,
    /// 64-bit integer (value kind)
    Int,
    /// 64-bit float (value kind)
    Float,
    /// Text
    String,
    /// Binary data
    Bytes,
    /// Structured value (array or object)
    Object,
    /// Any value
    Any,
}

impl ColumnType {
    /// Value kinds cannot take the "no value" marker
    pub fn is_value_kind(&self) -> bool {
        matches!(self, ColumnType::Bool | ColumnType::Int | ColumnType::Float)
    }
}

/// Auto-increment sequence parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoIncrement {
    /// First value handed out
    pub seed: i64,
    /// Increment between values
    pub step: i64,
}

/// Computed-column hook
///
/// Evaluated against the row's committed values whenever the row enters a
/// table or one of its values commits. Columns are evaluated in declaration
/// order, so an expression may read computed columns declared before it.
pub trait Expression: fmt::Debug + Send + Sync {
    /// Compute the column value for one row
    fn evaluate(&self, row: &RowValues<'_>) -> Value;
}

/// Expression that mirrors another column's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAlias(pub String);

impl Expression for ColumnAlias {
    fn evaluate(&self, row: &RowValues<'_>) -> Value {
        row.get(&self.0).cloned().unwrap_or(Value::Null)
    }
}

/// Expression backed by a closure
pub struct FnExpression<F> {
    label: String,
    f: F,
}

impl<F> FnExpression<F>
where
    F: Fn(&RowValues<'_>) -> Value + Send + Sync,
{
    /// Wrap `f`; `label` is shown in debug output
    pub fn new(label: impl Into<String>, f: F) -> Self {
        FnExpression {
            label: label.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnExpression<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FnExpression").field(&self.label).finish()
    }
}

impl<F> Expression for FnExpression<F>
where
    F: Fn(&RowValues<'_>) -> Value + Send + Sync,
{
    fn evaluate(&self, row: &RowValues<'_>) -> Value {
        (self.f)(row)
    }
}

/// Read-only view of one row version, addressed by column name
pub struct RowValues<'a> {
    columns: &'a [Column],
    values: &'a [Value],
    case_sensitive: bool,
}

impl<'a> RowValues<'a> {
    /// View `values` laid out per `columns`
    pub fn new(columns: &'a [Column], values: &'a [Value], case_sensitive: bool) -> Self {
        RowValues {
            columns,
            values,
            case_sensitive,
        }
    }

    /// Value of the named column
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        find_column(self.columns, name, self.case_sensitive).and_then(|i| self.values.get(i))
    }

    /// Value at a column index
    pub fn at(&self, index: usize) -> Option<&'a Value> {
        self.values.get(index)
    }
}

/// Position of the column called `name`
///
/// Exact matches win; otherwise the first case-insensitive match unless
/// `case_sensitive` is set. Empty names never resolve.
pub fn find_column(columns: &[Column], name: &str, case_sensitive: bool) -> Option<usize> {
    if name.is_empty() {
        return None;
    }
    if let Some(i) = columns.iter().position(|c| c.name == name) {
        return Some(i);
    }
    if case_sensitive {
        return None;
    }
    let folded = name.to_lowercase();
    columns
        .iter()
        .position(|c| !c.name.is_empty() && c.name.to_lowercase() == folded)
}

/// Column definition
#[derive(Debug, Clone)]
pub struct Column {
    id: ColumnId,
    name: String,
    data_type: ColumnType,
    allow_null: bool,
    unique: bool,
    default: Value,
    auto_increment: Option<AutoIncrement>,
    expression: Option<Arc<dyn Expression>>,
}

impl Column {
    /// Nullable column with a null default
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Column {
            id: ColumnId::new(),
            name: name.into(),
            data_type,
            allow_null: true,
            unique: false,
            default: Value::Null,
            auto_increment: None,
            expression: None,
        }
    }

    /// Reject null in committed values
    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Single-column unique constraint, registered when the column is added
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Value seeded into new rows
    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// Draw new-row values from a per-table sequence
    pub fn auto_increment(mut self, seed: i64, step: i64) -> Self {
        self.auto_increment = Some(AutoIncrement { seed, step });
        self
    }

    /// Make the column computed and read-only
    pub fn computed(mut self, expression: impl Expression + 'static) -> Self {
        self.expression = Some(Arc::new(expression));
        self
    }

    /// Column identity
    pub fn id(&self) -> ColumnId {
        self.id
    }

    /// Column name, possibly empty
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind
    pub fn data_type(&self) -> ColumnType {
        self.data_type
    }

    /// Whether committed values may be null
    pub fn allows_null(&self) -> bool {
        self.allow_null
    }

    /// Whether a single-column unique constraint is requested
    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Default for new rows
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Sequence parameters, if auto-incrementing
    pub fn auto_increment_spec(&self) -> Option<AutoIncrement> {
        self.auto_increment
    }

    /// Computed expression, if any
    pub fn expression(&self) -> Option<&Arc<dyn Expression>> {
        self.expression.as_ref()
    }

    /// Whether the column is computed
    pub fn is_computed(&self) -> bool {
        self.expression.is_some()
    }

    /// Apply the assignment rules for "no value"
    pub fn normalize(&self, value: Option<Value>) -> Result<Value> {
        match value {
            Some(v) => Ok(v),
            None if self.data_type.is_value_kind() => Err(Error::InvalidArgument(format!(
                "cannot set column '{}' to no value; assign Value::Null to store a null",
                self.name
            ))),
            None => Ok(Value::Null),
        }
    }
}
