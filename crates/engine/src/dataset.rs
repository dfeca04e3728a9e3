//! Data sets: tables joined by relations
//!
//! A [`DataSet`] owns its tables and relations. Relations are looked up by
//! name, and tables by name or identity, so rows never point at other
//! tables. A constrained relation adds a unique key on the parent columns
//! and a foreign key checked in both directions:
//!
//! - a child key that is not null must match a live parent row
//! - a parent row may not lose a key that child rows still reference
//!
//! There is no cascading; a delete or key change that would orphan child
//! rows is rejected.
//!
//! Mutations made through [`TableMut`] run the referential checks along
//! with the table's own. Listeners receive the bare [`Table`] and their
//! writes are checked against that table's constraints only.

use crate::config::DataSetOptions;
use crate::events::{ColumnChangeEvent, ListenerId, RowChangeEvent};
use crate::relation::{Relation, RelationKey};
use crate::table::{RowImage, Table};
use crate::validation::{check_child_row, orphans_left, Staged};
use rustc_hash::FxHashMap;
use std::ops::{Deref, DerefMut};
use tessera_core::{
    constraint::{join_values, key_has_null},
    Column, ColumnId, ColumnKey, Error, ForeignKey, Result, RowId, RowVersion, TableId, TableKey,
    Value, Violation, ViolationKind,
};
use tracing::{debug, warn};

/// Tables and the relations between them
#[derive(Debug, Default)]
pub struct DataSet {
    name: String,
    options: DataSetOptions,
    tables: Vec<Table>,
    relations: Vec<Relation>,
    // relation name -> parent key constraint it registered
    owned_keys: FxHashMap<String, String>,
}

impl DataSet {
    /// Create an empty data set with default options
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, DataSetOptions::default())
    }

    /// Create an empty data set
    pub fn with_options(name: impl Into<String>, options: DataSetOptions) -> Self {
        DataSet {
            name: name.into(),
            options,
            ..Default::default()
        }
    }

    /// Data set name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active options
    pub fn options(&self) -> DataSetOptions {
        self.options
    }

    // ========================================================================
    // Tables
    // ========================================================================

    /// Take ownership of a table; the data set's options replace its own
    pub fn add_table(&mut self, mut table: Table) -> Result<TableId> {
        if self.find_table(table.name()).is_some() {
            return Err(Error::InvalidArgument(format!(
                "a table named '{}' already belongs to data set '{}'",
                table.name(),
                self.name
            )));
        }
        table.options = self.options.table_options();
        let id = table.id();
        debug!(data_set = %self.name, table = %table.name(), "table added");
        self.tables.push(table);
        Ok(id)
    }

    /// Give up a table that no relation uses
    pub fn remove_table<'t>(&mut self, key: impl Into<TableKey<'t>>) -> Result<Table> {
        let index = self.table_index(key)?;
        let id = self.tables[index].id();
        if let Some(r) = self
            .relations
            .iter()
            .find(|r| r.parent_table() == id || r.child_table() == id)
        {
            return Err(Error::InvalidArgument(format!(
                "table '{}' is used by relation '{}'",
                self.tables[index].name(),
                r.name()
            )));
        }
        Ok(self.tables.remove(index))
    }

    /// Tables in registration order
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Look up a table
    pub fn table<'t>(&self, key: impl Into<TableKey<'t>>) -> Result<&Table> {
        let index = self.table_index(key)?;
        Ok(&self.tables[index])
    }

    /// Mutable handle on a table that runs referential checks
    pub fn table_mut<'t>(&mut self, key: impl Into<TableKey<'t>>) -> Result<TableMut<'_>> {
        let index = self.table_index(key)?;
        Ok(TableMut { ds: self, index })
    }

    fn table_index<'t>(&self, key: impl Into<TableKey<'t>>) -> Result<usize> {
        let key = key.into();
        let found = match key {
            TableKey::Name("") => {
                return Err(Error::InvalidArgument("a table name is required".to_string()))
            }
            TableKey::Name(name) => self.find_table(name),
            TableKey::Id(id) => self.index_of(id),
        };
        found.ok_or_else(|| {
            Error::NotFound(format!("{} does not belong to data set '{}'", key, self.name))
        })
    }

    fn find_table(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name() == name).or_else(|| {
            if self.options.case_sensitive {
                return None;
            }
            let folded = name.to_lowercase();
            self.tables
                .iter()
                .position(|t| t.name().to_lowercase() == folded)
        })
    }

    fn index_of(&self, id: TableId) -> Option<usize> {
        self.tables.iter().position(|t| t.id() == id)
    }

    // ========================================================================
    // Relations
    // ========================================================================

    /// Relations in registration order
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Look up a relation by name
    pub fn relation(&self, name: &str) -> Result<&Relation> {
        self.find_relation(name).map(|i| &self.relations[i]).ok_or_else(|| {
            Error::NotFound(format!(
                "relation '{}' does not belong to data set '{}'",
                name, self.name
            ))
        })
    }

    fn find_relation(&self, name: &str) -> Option<usize> {
        self.relations.iter().position(|r| r.name() == name).or_else(|| {
            if self.options.case_sensitive {
                return None;
            }
            let folded = name.to_lowercase();
            self.relations
                .iter()
                .position(|r| r.name().to_lowercase() == folded)
        })
    }

    /// Register a relation
    ///
    /// A constrained relation registers a unique key on the parent columns
    /// (unless one already covers them) and checks existing child rows.
    /// On failure nothing is registered.
    pub fn add_relation(&mut self, relation: Relation) -> Result<()> {
        if self.find_relation(relation.name()).is_some() {
            return Err(Error::InvalidArgument(format!(
                "a relation named '{}' already belongs to data set '{}'",
                relation.name(),
                self.name
            )));
        }
        let (parent, child) = self.relation_tables(&relation)?;
        let owned_key = if relation.is_constrained()
            && self.tables[parent].unique_over(relation.parent_columns()).is_none()
        {
            let key = format!("Constraint_{}", relation.name());
            let columns: Vec<ColumnKey<'_>> =
                relation.parent_columns().iter().map(|c| ColumnKey::Id(*c)).collect();
            self.tables[parent].add_unique(&key, &columns)?;
            Some(key)
        } else {
            None
        };
        if let Some(fk) = relation.foreign_key() {
            if self.options.enforce_constraints {
                let violations = self.check_children(&fk, parent, child);
                if !violations.is_empty() {
                    if let Some(key) = &owned_key {
                        self.tables[parent].drop_unique(key);
                    }
                    self.annotate(&violations);
                    return Err(Error::constraint(violations));
                }
            }
        }
        debug!(data_set = %self.name, relation = %relation.name(), "relation added");
        if let Some(key) = owned_key {
            self.owned_keys.insert(relation.name().to_owned(), key);
        }
        self.relations.push(relation);
        Ok(())
    }

    /// Unregister a relation and the parent key it registered
    pub fn remove_relation(&mut self, name: &str) -> Result<Relation> {
        let index = self.find_relation(name).ok_or_else(|| {
            Error::NotFound(format!(
                "relation '{}' does not belong to data set '{}'",
                name, self.name
            ))
        })?;
        let relation = self.relations.remove(index);
        if let Some(key) = self.owned_keys.remove(relation.name()) {
            if let Some(parent) = self.index_of(relation.parent_table()) {
                self.tables[parent].drop_unique(&key);
            }
        }
        Ok(relation)
    }

    fn resolve_relation<'r>(&'r self, key: RelationKey<'r>) -> Result<&'r Relation> {
        match key {
            RelationKey::Relation(relation) => Ok(relation),
            RelationKey::Name(name) => self.relation(name),
        }
    }

    /// Positions of the parent and child tables of a relation
    fn relation_tables(&self, relation: &Relation) -> Result<(usize, usize)> {
        let mismatch = || {
            Error::RelationMismatch(format!(
                "the tables of relation '{}' do not belong to data set '{}'",
                relation.name(),
                self.name
            ))
        };
        let parent = self.index_of(relation.parent_table()).ok_or_else(mismatch)?;
        let child = self.index_of(relation.child_table()).ok_or_else(mismatch)?;
        relation.check_tables(&self.tables[parent], &self.tables[child])?;
        Ok((parent, child))
    }

    fn foreign_keys(&self) -> impl Iterator<Item = ForeignKey> + '_ {
        self.relations.iter().filter_map(Relation::foreign_key)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Parent rows of a child row, in parent table order
    pub fn parent_rows<'r, 't>(
        &self,
        relation: impl Into<RelationKey<'r>>,
        table: impl Into<TableKey<'t>>,
        row: RowId,
        version: RowVersion,
    ) -> Result<Vec<RowId>> {
        let relation = self.resolve_relation(relation.into())?;
        let child = self.table(table)?;
        let (parent, _) = self.relation_sides(relation, child)?;
        relation.parent_rows(child, row, &self.tables[parent], version)
    }

    /// The single parent row of a child row, if any
    pub fn parent_row<'r, 't>(
        &self,
        relation: impl Into<RelationKey<'r>>,
        table: impl Into<TableKey<'t>>,
        row: RowId,
        version: RowVersion,
    ) -> Result<Option<RowId>> {
        let relation = self.resolve_relation(relation.into())?;
        let child = self.table(table)?;
        let (parent, _) = self.relation_sides(relation, child)?;
        relation.parent_row(child, row, &self.tables[parent], version)
    }

    /// Child rows of a parent row, in child table order
    pub fn child_rows<'r, 't>(
        &self,
        relation: impl Into<RelationKey<'r>>,
        table: impl Into<TableKey<'t>>,
        row: RowId,
        version: RowVersion,
    ) -> Result<Vec<RowId>> {
        let relation = self.resolve_relation(relation.into())?;
        let parent = self.table(table)?;
        let (_, child) = self.relation_sides(relation, parent)?;
        relation.child_rows(parent, row, &self.tables[child], version)
    }

    fn relation_sides(&self, relation: &Relation, given: &Table) -> Result<(usize, usize)> {
        let (parent, child) = self.relation_tables(relation)?;
        let given = given.id();
        if given != relation.parent_table() && given != relation.child_table() {
            return Err(Error::RelationMismatch(format!(
                "relation '{}' does not involve table '{}'",
                relation.name(),
                self.tables.iter().find(|t| t.id() == given).map_or("", Table::name)
            )));
        }
        Ok((parent, child))
    }

    /// Point a child row at `parent`, or at no parent
    ///
    /// The parent's Default key values (or nulls) are written into the
    /// child key columns as one edit and checked like any commit.
    pub fn set_parent_row<'r, 't>(
        &mut self,
        table: impl Into<TableKey<'t>>,
        row: RowId,
        parent: Option<RowId>,
        relation: impl Into<RelationKey<'r>>,
    ) -> Result<()> {
        let child = self.table_index(table)?;
        let relation = self.resolve_relation(relation.into())?.clone();
        let (parent_index, child_index) = self.relation_tables(&relation)?;
        if child_index != child {
            return Err(Error::RelationMismatch(format!(
                "table '{}' is not the child of relation '{}'",
                self.tables[child].name(),
                relation.name()
            )));
        }
        let values: Vec<Value> = match parent {
            Some(p) => {
                let parents = &self.tables[parent_index];
                parents.record(p)?;
                parents
                    .key_of(p, relation.parent_columns(), RowVersion::Default)
                    .ok_or(Error::VersionNotFound {
                        version: RowVersion::Default,
                    })?
                    .into_vec()
            }
            None => vec![Value::Null; relation.child_columns().len()],
        };
        let table = &mut self.tables[child];
        let writes = relation
            .child_columns()
            .iter()
            .zip(values)
            .map(|(id, value)| table.column_index(*id).map(|i| (i, value)))
            .collect::<Result<Vec<_>>>()?;
        let staged = table.stage_write_many(row, writes)?;
        self.settle(child, staged)
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check a staged mutation of `index` and finish or revert it
    fn settle(&mut self, index: usize, staged: Option<Staged>) -> Result<()> {
        let Some(staged) = staged else {
            return Ok(());
        };
        let violations = self.staged_violations(index, &staged);
        self.tables[index].conclude(staged, violations)
    }

    /// Local and referential checks of one staged mutation
    fn staged_violations(&self, index: usize, staged: &Staged) -> Vec<Violation> {
        let table = &self.tables[index];
        let mut violations = table.check_staged(staged);
        if table.eager() {
            violations.extend(self.check_staged_references(index, staged));
        }
        violations
    }

    /// Roll back every row of the given tables and check the result as a
    /// whole; on a violation every table keeps its changes
    fn reject_tables(&mut self, indices: &[usize]) -> Result<()> {
        let mut batches: Vec<(usize, Vec<Staged>)> = Vec::with_capacity(indices.len());
        for &index in indices {
            match self.tables[index].stage_reject_all() {
                Ok(staged) => batches.push((index, staged)),
                Err(err) => {
                    self.revert_batches(batches);
                    return Err(err);
                }
            }
        }
        let violations: Vec<Violation> = batches
            .iter()
            .flat_map(|(index, staged)| staged.iter().map(move |s| (*index, s)))
            .flat_map(|(index, s)| self.staged_violations(index, s))
            .collect();
        if violations.is_empty() {
            for (index, staged) in batches {
                self.tables[index].finish_all(staged);
            }
            return Ok(());
        }
        warn!(
            dataset = %self.name,
            violations = violations.len(),
            "rollback rejected by constraints"
        );
        self.revert_batches(batches);
        self.annotate(&violations);
        Err(Error::constraint(violations))
    }

    fn revert_batches(&mut self, batches: Vec<(usize, Vec<Staged>)>) {
        for (index, staged) in batches.into_iter().rev() {
            self.tables[index].revert_all(staged);
        }
    }

    fn check_staged_references(&self, index: usize, staged: &Staged) -> Vec<Violation> {
        let table = &self.tables[index];
        // freed rows have no record left
        let record = table.rows.get(staged.row);
        let mut violations = Vec::new();
        for fk in self.foreign_keys() {
            let (Some(parent), Some(child)) =
                (self.index_of(fk.parent_table), self.index_of(fk.child_table))
            else {
                continue;
            };
            if child == index {
                if let Some(record) = record.filter(|r| r.state().is_attached()) {
                    violations.extend(check_child_row(&fk, table, record, &self.tables[parent]));
                }
            }
            if parent != index {
                continue;
            }
            let Some(old) = table.record_key(&staged.before, &fk.parent_columns, RowVersion::Current)
            else {
                continue;
            };
            let new = record.and_then(|r| table.record_key(r, &fk.parent_columns, RowVersion::Current));
            if key_has_null(&old) || new.as_ref() == Some(&old) {
                continue;
            }
            if orphans_left(&fk, table, &old, &self.tables[child]) {
                violations.push(Violation {
                    table: table.id(),
                    row: staged.row,
                    constraint: fk.name.clone(),
                    kind: ViolationKind::ParentKey,
                    columns: fk.parent_columns.clone(),
                    message: format!(
                        "key '{}' of table '{}' is still referenced by rows of table '{}' through '{}'",
                        join_values(&old),
                        table.name(),
                        self.tables[child].name(),
                        fk.name
                    ),
                });
            }
        }
        violations
    }

    fn check_children(&self, fk: &ForeignKey, parent: usize, child: usize) -> Vec<Violation> {
        let (parent, child) = (&self.tables[parent], &self.tables[child]);
        child
            .live_rows()
            .filter_map(|r| check_child_row(fk, child, r, parent))
            .collect()
    }

    /// Full check of one table: unique keys, foreign keys in both
    /// directions, then not-null columns
    fn validate_table(&self, index: usize) -> Vec<Violation> {
        let table = &self.tables[index];
        let mut violations = table.check_unique_all();
        let id = table.id();
        for fk in self.foreign_keys() {
            if fk.child_table != id && fk.parent_table != id {
                continue;
            }
            if let (Some(parent), Some(child)) =
                (self.index_of(fk.parent_table), self.index_of(fk.child_table))
            {
                violations.extend(self.check_children(&fk, parent, child));
            }
        }
        violations.extend(table.check_not_null_all());
        violations
    }

    fn annotate(&mut self, violations: &[Violation]) {
        for table in &mut self.tables {
            table.annotate(violations);
        }
    }

    // ========================================================================
    // Batch load
    // ========================================================================

    /// Enter a batch-load scope on one table
    ///
    /// Closing the outermost scope also checks foreign keys the table takes
    /// part in.
    pub fn begin_load_data<'t>(&mut self, table: impl Into<TableKey<'t>>) -> Result<DataSetLoad<'_>> {
        let index = self.table_index(table)?;
        self.tables[index].enter_load();
        Ok(DataSetLoad {
            ds: self,
            index,
            open: true,
        })
    }

    fn leave_load(&mut self, index: usize) -> Result<()> {
        if !self.tables[index].exit_load() {
            return Ok(());
        }
        let violations = self.validate_table(index);
        if violations.is_empty() {
            return Ok(());
        }
        self.annotate(&violations);
        Err(Error::constraint(violations))
    }

    // ========================================================================
    // Data set wide
    // ========================================================================

    /// Accept changes on every table
    pub fn accept_changes(&mut self) -> Result<()> {
        for index in 0..self.tables.len() {
            self.at(index).accept_changes()?;
        }
        Ok(())
    }

    /// Reject changes on every table
    ///
    /// The rollback is checked as a whole, foreign keys included; on a
    /// violation every row keeps its changes and the offending rows are
    /// annotated.
    pub fn reject_changes(&mut self) -> Result<()> {
        let indices: Vec<usize> = (0..self.tables.len()).collect();
        self.reject_tables(&indices)
    }

    /// Whether any table has rows in error
    pub fn has_errors(&self) -> bool {
        self.tables.iter().any(Table::has_errors)
    }

    fn at(&mut self, index: usize) -> TableMut<'_> {
        TableMut { ds: self, index }
    }
}

/// Mutable view of a data set table
///
/// Reads go through `Deref`. Committing mutations are checked against the
/// table's constraints and the foreign keys of the data set.
#[derive(Debug)]
pub struct TableMut<'a> {
    ds: &'a mut DataSet,
    index: usize,
}

impl Deref for TableMut<'_> {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.ds.tables[self.index]
    }
}

impl TableMut<'_> {
    fn table(&mut self) -> &mut Table {
        &mut self.ds.tables[self.index]
    }

    fn settle(&mut self, staged: Option<Staged>) -> Result<()> {
        self.ds.settle(self.index, staged)
    }

    /// See [`Table::add_column`]
    pub fn add_column(&mut self, column: Column) -> Result<ColumnId> {
        self.table().add_column(column)
    }

    /// See [`Table::remove_column`]; columns used by a relation stay
    pub fn remove_column<'k>(&mut self, key: impl Into<ColumnKey<'k>>) -> Result<Column> {
        let index = self.column_index(key)?;
        let id = self.columns()[index].id();
        let table = self.id();
        if let Some(r) = self.ds.relations.iter().find(|r| r.uses_column(table, id)) {
            return Err(Error::InvalidArgument(format!(
                "column '{}' is used by relation '{}'",
                self.columns()[index].name(),
                r.name()
            )));
        }
        self.table().remove_column(index)
    }

    /// See [`Table::add_unique`]
    pub fn add_unique<'k, K>(&mut self, name: &str, columns: &[K]) -> Result<()>
    where
        K: Into<ColumnKey<'k>> + Copy,
    {
        self.table().add_unique(name, columns)
    }

    /// See [`Table::new_row`]
    pub fn new_row(&mut self) -> RowId {
        self.table().new_row()
    }

    /// See [`Table::add_row`]
    pub fn add_row(&mut self, row: RowId) -> Result<()> {
        let staged = self.table().stage_attach(row)?;
        self.settle(staged)
    }

    /// See [`Table::add_values`]
    pub fn add_values(&mut self, values: Vec<Value>) -> Result<RowId> {
        let (row, staged) = self.table().stage_add_values(values)?;
        self.settle(staged)?;
        Ok(row)
    }

    /// See [`Table::import_row`]
    pub fn import_row(&mut self, image: &RowImage) -> Result<RowId> {
        let (row, staged) = self.table().stage_import(image)?;
        self.settle(staged)?;
        Ok(row)
    }

    /// See [`Table::remove_row`]
    pub fn remove_row(&mut self, row: RowId) -> Result<()> {
        self.table().remove_row(row)
    }

    /// See [`Table::set`]
    pub fn set<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.set_value(row, column, Some(value.into()))
    }

    /// See [`Table::set_value`]
    pub fn set_value<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        value: Option<Value>,
    ) -> Result<()> {
        let staged = self.table().stage_set(row, column, value)?;
        self.settle(staged)
    }

    /// See [`Table::set_item_array`]
    pub fn set_item_array(&mut self, row: RowId, values: Vec<Option<Value>>) -> Result<()> {
        let staged = self.table().stage_assign(row, values)?;
        self.settle(staged)
    }

    /// See [`Table::begin_edit`]
    pub fn begin_edit(&mut self, row: RowId) -> Result<()> {
        self.table().begin_edit(row)
    }

    /// See [`Table::end_edit`]
    pub fn end_edit(&mut self, row: RowId) -> Result<()> {
        let staged = self.table().stage_end_edit(row)?;
        self.settle(staged)
    }

    /// See [`Table::cancel_edit`]
    pub fn cancel_edit(&mut self, row: RowId) -> Result<()> {
        self.table().cancel_edit(row)
    }

    /// See [`Table::delete`]
    pub fn delete(&mut self, row: RowId) -> Result<()> {
        let staged = self.table().stage_delete(row)?;
        self.settle(Some(staged))
    }

    /// See [`Table::accept_row`]
    pub fn accept_row(&mut self, row: RowId) -> Result<()> {
        self.end_edit(row)?;
        self.table().commit_row(row)
    }

    /// See [`Table::reject_row`]; foreign keys are checked too
    pub fn reject_row(&mut self, row: RowId) -> Result<()> {
        let staged = self.table().stage_reject(row)?;
        self.settle(staged)
    }

    /// See [`Table::accept_changes`]
    pub fn accept_changes(&mut self) -> Result<()> {
        for row in self.rows().to_vec() {
            self.accept_row(row)?;
        }
        Ok(())
    }

    /// See [`Table::reject_changes`]; foreign keys are checked too
    pub fn reject_changes(&mut self) -> Result<()> {
        let index = self.index;
        self.ds.reject_tables(&[index])
    }

    /// See [`Table::set_added`]
    pub fn set_added(&mut self, row: RowId) -> Result<()> {
        self.table().set_added(row)
    }

    /// See [`Table::set_modified`]
    pub fn set_modified(&mut self, row: RowId) -> Result<()> {
        self.table().set_modified(row)
    }

    /// See [`Table::set_row_error`]
    pub fn set_row_error(&mut self, row: RowId, message: &str) -> Result<()> {
        self.table().set_row_error(row, message)
    }

    /// See [`Table::set_column_error`]
    pub fn set_column_error<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        message: &str,
    ) -> Result<()> {
        self.table().set_column_error(row, column, message)
    }

    /// See [`Table::clear_errors`]
    pub fn clear_errors(&mut self, row: RowId) -> Result<()> {
        self.table().clear_errors(row)
    }

    /// See [`Table::on_column_change`]
    pub fn on_column_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Table, &ColumnChangeEvent) + Send + 'static,
    {
        self.table().on_column_change(listener)
    }

    /// See [`Table::on_row_change`]
    pub fn on_row_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Table, &RowChangeEvent) + Send + 'static,
    {
        self.table().on_row_change(listener)
    }

    /// See [`Table::remove_listener`]
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.table().remove_listener(id)
    }
}

/// Guard of a batch-load scope on a data set table
///
/// Derefs to the table. Referential checks are suspended along with the
/// table's own until the scope closes.
#[derive(Debug)]
pub struct DataSetLoad<'a> {
    ds: &'a mut DataSet,
    index: usize,
    open: bool,
}

impl DataSetLoad<'_> {
    /// Close the scope and report violations
    pub fn finish(mut self) -> Result<()> {
        self.open = false;
        self.ds.leave_load(self.index)
    }
}

impl Deref for DataSetLoad<'_> {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.ds.tables[self.index]
    }
}

impl DerefMut for DataSetLoad<'_> {
    fn deref_mut(&mut self) -> &mut Table {
        &mut self.ds.tables[self.index]
    }
}

impl Drop for DataSetLoad<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = self.ds.leave_load(self.index) {
            warn!(
                data_set = %self.ds.name,
                table = %self.ds.tables[self.index].name(),
                error = %err,
                "load scope dropped with violations"
            );
        }
    }
}
