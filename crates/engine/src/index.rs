//! Key index for unique constraints
//!
//! One [`KeyIndex`] per unique constraint maps the committed, non-null key
//! of every live row to the rows carrying it. Row checks and parent
//! lookups use it instead of scanning the row collection.
//!
//! Duplicates are representable: inside a batch-load scope, or with
//! enforcement off, several rows may share a key until the full check runs.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tessera_core::{KeyValues, RowId};

/// Rows by key, and the key each row is filed under
#[derive(Debug, Default, Clone)]
pub(crate) struct KeyIndex {
    by_key: FxHashMap<KeyValues, SmallVec<[RowId; 1]>>,
    by_row: FxHashMap<RowId, KeyValues>,
}

impl KeyIndex {
    /// File `row` under `key`, or under nothing
    pub(crate) fn set(&mut self, row: RowId, key: Option<KeyValues>) {
        if self.by_row.get(&row) == key.as_ref() {
            return;
        }
        if let Some(old) = self.by_row.remove(&row) {
            if let Some(rows) = self.by_key.get_mut(&old) {
                rows.retain(|r| *r != row);
                if rows.is_empty() {
                    self.by_key.remove(&old);
                }
            }
        }
        if let Some(key) = key {
            self.by_key.entry(key.clone()).or_default().push(row);
            self.by_row.insert(row, key);
        }
    }

    /// Rows filed under `key`
    pub(crate) fn rows(&self, key: &KeyValues) -> &[RowId] {
        self.by_key.get(key).map_or(&[], |rows| rows.as_slice())
    }

    /// Whether a row other than `row` is filed under `key`
    pub(crate) fn shared(&self, key: &KeyValues, row: RowId) -> bool {
        self.rows(key).iter().any(|r| *r != row)
    }
}
