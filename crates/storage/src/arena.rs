//! Row arena
//!
//! Owns the records of one table, keyed by [`RowId`], plus the ordered
//! membership list of the table's row collection.
//!
//! # Design
//!
//! - FxHashMap: O(1) lookups by row identity, fast non-crypto hash
//! - `order` + `positions`: attached rows in insertion order with an O(1)
//!   position lookup; Deleted rows stay listed until their deletion is
//!   committed
//! - Ids carry the owning table, so a foreign id never resolves here
//! - A physically removed row is released and its id resolves nowhere

use crate::record::RowRecord;
use rustc_hash::FxHashMap;
use tessera_core::{RowId, TableId, Value};

/// Record storage for one table
#[derive(Debug)]
pub struct RowArena {
    owner: TableId,
    records: FxHashMap<RowId, RowRecord>,
    order: Vec<RowId>,
    positions: FxHashMap<RowId, usize>,
    next_seq: u64,
}

impl RowArena {
    /// Create an empty arena for `owner`
    pub fn new(owner: TableId) -> Self {
        Self::with_capacity(owner, 0)
    }

    /// Create an arena with pre-allocated capacity
    pub fn with_capacity(owner: TableId, capacity: usize) -> Self {
        Self {
            owner,
            records: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next_seq: 0,
        }
    }

    /// Table whose rows this arena holds
    pub fn owner(&self) -> TableId {
        self.owner
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Create a detached record holding `values` as pending edits
    pub fn allocate(&mut self, values: Vec<Value>) -> RowId {
        self.insert_with(|id| RowRecord::detached(id, values))
    }

    /// Create a record from a builder that receives the new identity
    pub fn insert_with(&mut self, build: impl FnOnce(RowId) -> RowRecord) -> RowId {
        let id = RowId::new(self.owner, self.next_seq);
        self.next_seq += 1;
        self.records.insert(id, build(id));
        id
    }

    /// Put a record back under its own id, replacing any current one
    ///
    /// Ids of other tables are ignored.
    pub fn restore(&mut self, record: RowRecord) {
        if record.id().table() == self.owner {
            self.records.insert(record.id(), record);
        }
    }

    /// Drop a record and its membership
    pub fn release(&mut self, id: RowId) -> Option<RowRecord> {
        self.detach(id);
        self.records.remove(&id)
    }

    /// Get a record
    pub fn get(&self, id: RowId) -> Option<&RowRecord> {
        self.records.get(&id)
    }

    /// Get a record mutably
    pub fn get_mut(&mut self, id: RowId) -> Option<&mut RowRecord> {
        self.records.get_mut(&id)
    }

    /// Whether the arena holds this row
    pub fn contains(&self, id: RowId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of records held, members or not
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Every record, member or not, in no particular order
    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut RowRecord> {
        self.records.values_mut()
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Append to the row collection if not already listed
    pub fn attach(&mut self, id: RowId) {
        if self.positions.contains_key(&id) {
            return;
        }
        self.positions.insert(id, self.order.len());
        self.order.push(id);
    }

    /// Take out of the row collection, returning the old position
    pub fn detach(&mut self, id: RowId) -> Option<usize> {
        let pos = self.positions.remove(&id)?;
        self.order.remove(pos);
        self.renumber(pos);
        Some(pos)
    }

    /// Position in the row collection
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Put membership back the way a snapshot recorded it
    pub fn restore_position(&mut self, id: RowId, position: Option<usize>) {
        if self.position(id) == position {
            return;
        }
        self.detach(id);
        if let Some(pos) = position {
            let pos = pos.min(self.order.len());
            self.order.insert(pos, id);
            self.renumber(pos);
        }
    }

    // positions from `from` on follow `order` again
    fn renumber(&mut self, from: usize) {
        for (pos, id) in self.order.iter().enumerate().skip(from) {
            self.positions.insert(*id, pos);
        }
    }

    /// Row collection in order
    pub fn ids(&self) -> &[RowId] {
        &self.order
    }

    /// Member records in order
    pub fn members(&self) -> impl Iterator<Item = &RowRecord> + '_ {
        self.order.iter().filter_map(move |id| self.records.get(id))
    }

    /// Number of rows in the collection
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
