//! Parent/child relations between tables
//!
//! A [`Relation`] pairs key columns of a parent table with key columns of
//! a child table, by column identity. It holds no rows and no table
//! references; navigation takes the two tables explicitly, and a
//! [`DataSet`](crate::DataSet) looks relations up by name.
//!
//! # Version semantics
//!
//! The source row's key is read at the requested version. Target rows are
//! compared at the same version, except that a Proposed request compares
//! them at Default: an open edit belongs to one row only. Rows lacking the
//! version match nothing, and a key containing null matches nothing.

use crate::table::Table;
use tessera_core::{
    constraint::key_has_null, ColumnId, ColumnKey, Error, ForeignKey, Result, RowId, RowVersion,
    TableId,
};

/// Key pairing between a parent and a child table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    name: String,
    parent_table: TableId,
    parent_columns: Vec<ColumnId>,
    child_table: TableId,
    child_columns: Vec<ColumnId>,
    constrained: bool,
}

impl Relation {
    /// Pair `parent_columns` of `parent` with `child_columns` of `child`
    ///
    /// Both lists must be non-empty and of equal length; every column must
    /// resolve on its table.
    pub fn between<'k, K>(
        name: impl Into<String>,
        parent: &Table,
        parent_columns: &[K],
        child: &Table,
        child_columns: &[K],
    ) -> Result<Relation>
    where
        K: Into<ColumnKey<'k>> + Copy,
    {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgument("a relation name is required".to_string()));
        }
        if parent_columns.is_empty() || parent_columns.len() != child_columns.len() {
            return Err(Error::InvalidArgument(format!(
                "relation '{}' needs matching non-empty parent and child key columns",
                name
            )));
        }
        Ok(Relation {
            parent_table: parent.id(),
            parent_columns: resolve(parent, parent_columns)?,
            child_table: child.id(),
            child_columns: resolve(child, child_columns)?,
            name,
            constrained: false,
        })
    }

    /// Back the relation with a unique parent key and a foreign key
    pub fn with_constraints(mut self) -> Self {
        self.constrained = true;
        self
    }

    /// Relation name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent table identity
    pub fn parent_table(&self) -> TableId {
        self.parent_table
    }

    /// Parent key columns
    pub fn parent_columns(&self) -> &[ColumnId] {
        &self.parent_columns
    }

    /// Child table identity
    pub fn child_table(&self) -> TableId {
        self.child_table
    }

    /// Child key columns
    pub fn child_columns(&self) -> &[ColumnId] {
        &self.child_columns
    }

    /// Whether the relation carries constraints
    pub fn is_constrained(&self) -> bool {
        self.constrained
    }

    /// Referential rule implied by a constrained relation
    pub fn foreign_key(&self) -> Option<ForeignKey> {
        self.constrained.then(|| ForeignKey {
            name: self.name.clone(),
            parent_table: self.parent_table,
            parent_columns: self.parent_columns.clone(),
            child_table: self.child_table,
            child_columns: self.child_columns.clone(),
        })
    }

    pub(crate) fn uses_column(&self, table: TableId, column: ColumnId) -> bool {
        (self.parent_table == table && self.parent_columns.contains(&column))
            || (self.child_table == table && self.child_columns.contains(&column))
    }

    /// Check that `parent` and `child` are the tables this relation pairs
    pub fn check_tables(&self, parent: &Table, child: &Table) -> Result<()> {
        if parent.id() == self.parent_table
            && child.id() == self.child_table
            && parent.has_columns(&self.parent_columns)
            && child.has_columns(&self.child_columns)
        {
            return Ok(());
        }
        Err(Error::RelationMismatch(format!(
            "relation '{}' does not pair table '{}' with table '{}'",
            self.name,
            parent.name(),
            child.name()
        )))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Parent rows of a child row, in parent table order
    pub fn parent_rows(
        &self,
        child: &Table,
        row: RowId,
        parent: &Table,
        version: RowVersion,
    ) -> Result<Vec<RowId>> {
        self.check_tables(parent, child)?;
        matching_rows(child, &self.child_columns, row, parent, &self.parent_columns, version)
    }

    /// The single parent row of a child row, if any
    ///
    /// More than one match is invalid-argument.
    pub fn parent_row(
        &self,
        child: &Table,
        row: RowId,
        parent: &Table,
        version: RowVersion,
    ) -> Result<Option<RowId>> {
        let rows = self.parent_rows(child, row, parent, version)?;
        if rows.len() > 1 {
            return Err(Error::InvalidArgument(format!(
                "relation '{}' matches {} parent rows for row {}",
                self.name,
                rows.len(),
                row
            )));
        }
        Ok(rows.first().copied())
    }

    /// Child rows of a parent row, in child table order
    pub fn child_rows(
        &self,
        parent: &Table,
        row: RowId,
        child: &Table,
        version: RowVersion,
    ) -> Result<Vec<RowId>> {
        self.check_tables(parent, child)?;
        matching_rows(parent, &self.parent_columns, row, child, &self.child_columns, version)
    }
}

fn resolve<'k, K>(table: &Table, columns: &[K]) -> Result<Vec<ColumnId>>
where
    K: Into<ColumnKey<'k>> + Copy,
{
    columns
        .iter()
        .map(|k| table.column(*k).map(|c| c.id()))
        .collect()
}

fn matching_rows(
    source: &Table,
    source_columns: &[ColumnId],
    row: RowId,
    target: &Table,
    target_columns: &[ColumnId],
    version: RowVersion,
) -> Result<Vec<RowId>> {
    let key = source
        .record_key(source.record(row)?, source_columns, version)
        .ok_or(Error::VersionNotFound { version })?;
    if key_has_null(&key) {
        return Ok(Vec::new());
    }
    let target_version = match version {
        RowVersion::Proposed => RowVersion::Default,
        v => v,
    };
    Ok(target
        .rows
        .members()
        .filter(|r| target.record_key(r, target_columns, target_version).as_ref() == Some(&key))
        .map(|r| r.id())
        .collect())
}

/// Relation reference: a relation value or a relation name
#[derive(Debug, Clone, Copy)]
pub enum RelationKey<'a> {
    /// Relation value
    Relation(&'a Relation),
    /// Name of a relation registered on the data set
    Name(&'a str),
}

impl<'a> From<&'a Relation> for RelationKey<'a> {
    fn from(relation: &'a Relation) -> Self {
        RelationKey::Relation(relation)
    }
}

impl<'a> From<&'a str> for RelationKey<'a> {
    fn from(name: &'a str) -> Self {
        RelationKey::Name(name)
    }
}
