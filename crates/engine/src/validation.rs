//! Constraint validation
//!
//! Checks come in two shapes:
//!
//! - **Row checks** run after a single committing mutation and only look at
//!   the mutated row (its key against the other live rows).
//! - **Full checks** run when a batch-load scope closes and look at every
//!   live row; every duplicate in a unique group is reported.
//!
//! Referential checks need the other tables of a data set and live in the
//! `dataset` module; the helpers they share with local checks are here.
//!
//! ## Staging
//!
//! | Step | Clean | Violations |
//! |------|-------|------------|
//! | apply mutation, keep prior record | yes | yes |
//! | check | - | - |
//! | fire post-change notifications | yes | no |
//! | restore prior record and membership | no | yes |
//! | annotate offending rows | no | yes |
//!
//! A rollback of many rows is staged row by row and checked once all of
//! them are rolled back; a violation reverts the whole batch.

use crate::events::{ColumnChangeEvent, RowChange};
use crate::index::KeyIndex;
use crate::table::Table;
use rustc_hash::FxHashMap;
use tessera_core::{
    constraint::{join_values, key_has_null},
    Error, ForeignKey, KeyValues, Result, RowId, RowVersion, UniqueConstraint, Violation,
    ViolationKind,
};
use tessera_storage::RowRecord;
use tracing::warn;

/// Post-change notification held back until validation passes
#[derive(Debug, Clone)]
pub(crate) enum Notice {
    Column(ColumnChangeEvent),
    Row(RowChange),
}

/// A committed-but-unchecked mutation
#[derive(Debug)]
pub(crate) struct Staged {
    pub(crate) row: RowId,
    pub(crate) before: RowRecord,
    position: Option<usize>,
    notices: Vec<Notice>,
    cancel_on_revert: bool,
    discard_on_revert: bool,
}

impl Staged {
    pub(crate) fn new(row: RowId, before: RowRecord, position: Option<usize>) -> Self {
        Staged {
            row,
            before,
            position,
            notices: Vec::new(),
            cancel_on_revert: false,
            discard_on_revert: false,
        }
    }

    pub(crate) fn notify(mut self, notice: Notice) -> Self {
        self.notices.push(notice);
        self
    }

    /// Close the edit the mutation opened if it is reverted
    pub(crate) fn cancel_on_revert(mut self) -> Self {
        self.cancel_on_revert = true;
        self
    }

    /// Free the row if the mutation is reverted; the caller never saw its id
    pub(crate) fn discard_on_revert(mut self) -> Self {
        self.discard_on_revert = true;
        self
    }
}

impl Table {
    /// Whether committing mutations are checked right away
    pub(crate) fn eager(&self) -> bool {
        self.load_depth == 0 && self.options.enforce_constraints
    }

    /// Run local checks on a staged mutation and finish or revert it
    pub(crate) fn settle(&mut self, staged: Option<Staged>) -> Result<()> {
        let Some(staged) = staged else {
            return Ok(());
        };
        let violations = self.check_staged(&staged);
        self.conclude(staged, violations)
    }

    /// Finish a staged mutation when `violations` is empty, revert it otherwise
    pub(crate) fn conclude(&mut self, staged: Staged, violations: Vec<Violation>) -> Result<()> {
        if violations.is_empty() {
            self.finish(staged);
            return Ok(());
        }
        warn!(
            table = %self.name(),
            row = %staged.row,
            violations = violations.len(),
            "mutation rejected by constraints"
        );
        self.revert(staged);
        self.annotate(&violations);
        Err(Error::constraint(violations))
    }

    /// Finish a batch when `violations` is empty, revert all of it otherwise
    pub(crate) fn conclude_all(&mut self, staged: Vec<Staged>, violations: Vec<Violation>) -> Result<()> {
        if violations.is_empty() {
            self.finish_all(staged);
            return Ok(());
        }
        warn!(
            table = %self.name(),
            rows = staged.len(),
            violations = violations.len(),
            "rollback rejected by constraints"
        );
        self.revert_all(staged);
        self.annotate(&violations);
        Err(Error::constraint(violations))
    }

    pub(crate) fn check_staged(&self, staged: &Staged) -> Vec<Violation> {
        if !self.eager() {
            return Vec::new();
        }
        let Some(record) = self.rows.get(staged.row) else {
            return Vec::new();
        };
        if !record.state().is_attached() || !record.cells().has_version(RowVersion::Current) {
            return Vec::new();
        }
        let mut violations = Vec::new();
        for (constraint, index) in self.indexed_unique() {
            if let Some(v) = self.check_unique_row(constraint, index, record) {
                violations.push(v);
            }
        }
        violations.extend(self.check_not_null_row(record));
        violations
    }

    pub(crate) fn finish(&mut self, staged: Staged) {
        let row = staged.row;
        for notice in staged.notices {
            match notice {
                Notice::Column(event) => self.notify_column(&event),
                Notice::Row(change) => self.notify_row(row, change),
            }
        }
    }

    pub(crate) fn finish_all(&mut self, staged: Vec<Staged>) {
        for s in staged {
            self.finish(s);
        }
    }

    pub(crate) fn revert(&mut self, staged: Staged) {
        let row = staged.row;
        if staged.discard_on_revert {
            self.rows.release(row);
        } else {
            let mut before = staged.before;
            if staged.cancel_on_revert {
                before.cancel_edit();
            }
            self.rows.restore(before);
            self.rows.restore_position(row, staged.position);
        }
        self.reindex(row);
    }

    /// Revert a batch, last mutation first
    pub(crate) fn revert_all(&mut self, staged: Vec<Staged>) {
        for s in staged.into_iter().rev() {
            self.revert(s);
        }
    }

    /// Record each violation as the row error and on each listed column
    pub(crate) fn annotate(&mut self, violations: &[Violation]) {
        let table = self.id();
        for v in violations.iter().filter(|v| v.table == table) {
            if let Some(record) = self.rows.get_mut(v.row) {
                let errors = record.errors_mut();
                errors.set_row_error(&v.message);
                for column in &v.columns {
                    errors.set_column_error(*column, &v.message);
                }
            }
        }
    }

    // ========================================================================
    // Unique and not-null
    // ========================================================================

    fn unique_message(&self, constraint: &UniqueConstraint, key: &[tessera_core::Value]) -> String {
        format!(
            "column(s) '{}' are constrained to be unique; value '{}' is already present",
            self.column_names(&constraint.columns),
            join_values(key)
        )
    }

    fn unique_violation(&self, constraint: &UniqueConstraint, row: RowId, key: &[tessera_core::Value]) -> Violation {
        Violation {
            table: self.id(),
            row,
            constraint: constraint.name.clone(),
            kind: ViolationKind::Unique,
            columns: constraint.columns.clone(),
            message: self.unique_message(constraint, key),
        }
    }

    fn check_unique_row(
        &self,
        constraint: &UniqueConstraint,
        index: &KeyIndex,
        record: &RowRecord,
    ) -> Option<Violation> {
        let key = self.record_key(record, &constraint.columns, RowVersion::Current)?;
        if key_has_null(&key) || !index.shared(&key, record.id()) {
            return None;
        }
        Some(self.unique_violation(constraint, record.id(), &key))
    }

    /// Every row sharing a key with another row under `constraint`
    pub(crate) fn check_unique(&self, constraint: &UniqueConstraint) -> Vec<Violation> {
        let mut groups: FxHashMap<KeyValues, Vec<RowId>> = FxHashMap::default();
        let mut order: Vec<KeyValues> = Vec::new();
        for record in self.live_rows() {
            let Some(key) = self.record_key(record, &constraint.columns, RowVersion::Current) else {
                continue;
            };
            if key_has_null(&key) {
                continue;
            }
            let rows = groups.entry(key.clone()).or_default();
            if rows.is_empty() {
                order.push(key);
            }
            rows.push(record.id());
        }
        let mut violations = Vec::new();
        for key in order {
            let Some(rows) = groups.get(&key) else { continue };
            if rows.len() < 2 {
                continue;
            }
            for row in rows {
                violations.push(self.unique_violation(constraint, *row, &key));
            }
        }
        violations
    }

    fn check_not_null_row(&self, record: &RowRecord) -> Vec<Violation> {
        let Some(values) = record.cells().values(tessera_storage::Slot::Current) else {
            return Vec::new();
        };
        self.columns()
            .iter()
            .zip(values)
            .filter(|(column, value)| !column.allows_null() && value.is_null())
            .map(|(column, _)| Violation {
                table: self.id(),
                row: record.id(),
                constraint: format!("NotNull_{}", column.name()),
                kind: ViolationKind::NotNull,
                columns: vec![column.id()],
                message: format!("column '{}' does not allow nulls", column.name()),
            })
            .collect()
    }

    pub(crate) fn check_unique_all(&self) -> Vec<Violation> {
        self.unique_constraints()
            .iter()
            .flat_map(|c| self.check_unique(c))
            .collect()
    }

    pub(crate) fn check_not_null_all(&self) -> Vec<Violation> {
        self.live_rows()
            .flat_map(|record| self.check_not_null_row(record))
            .collect()
    }

    /// Full local check: unique constraints first, then not-null columns
    pub(crate) fn check_all(&self) -> Vec<Violation> {
        let mut violations = self.check_unique_all();
        violations.extend(self.check_not_null_all());
        violations
    }
}

// ============================================================================
// Referential helpers
// ============================================================================

/// Whether a live row of `parent` carries `key` on the foreign key's parent columns
pub(crate) fn parent_exists(fk: &ForeignKey, parent: &Table, key: &KeyValues) -> bool {
    if let Some(rows) = parent.indexed_rows(&fk.parent_columns, key) {
        return !rows.is_empty();
    }
    parent.live_rows().any(|r| {
        parent
            .record_key(r, &fk.parent_columns, RowVersion::Current)
            .as_ref()
            == Some(key)
    })
}

/// Referential check of one child row
pub(crate) fn check_child_row(
    fk: &ForeignKey,
    child: &Table,
    record: &RowRecord,
    parent: &Table,
) -> Option<Violation> {
    let key = child.record_key(record, &fk.child_columns, RowVersion::Current)?;
    if key_has_null(&key) || parent_exists(fk, parent, &key) {
        return None;
    }
    Some(Violation {
        table: child.id(),
        row: record.id(),
        constraint: fk.name.clone(),
        kind: ViolationKind::ForeignKey,
        columns: fk.child_columns.clone(),
        message: format!(
            "foreign key '{}' requires the child key '{}' to exist in table '{}'",
            fk.name,
            join_values(&key),
            parent.name()
        ),
    })
}

/// Whether live children still reference `key` that no parent row carries
pub(crate) fn orphans_left(fk: &ForeignKey, parent: &Table, key: &KeyValues, child: &Table) -> bool {
    if parent_exists(fk, parent, key) {
        return false;
    }
    child.live_rows().any(|r| {
        child
            .record_key(r, &fk.child_columns, RowVersion::Current)
            .as_ref()
            == Some(key)
    })
}
