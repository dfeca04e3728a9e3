//! Version slots of a row
//!
//! A row stores up to three full value vectors, one per [`Slot`]. Each slot
//! is present or absent as a whole; presence is what the version queries
//! report, never a sentinel inside the values.
//!
//! | RowVersion | Resolves to |
//! |------------|-------------|
//! | Original | Original slot |
//! | Current | Current slot |
//! | Proposed | Proposed slot |
//! | Default | Proposed if present, else Current |

use tessera_core::{RowVersion, Value};

/// Stored version of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Values as of the last commit
    Original,
    /// Committed working values
    Current,
    /// Uncommitted edit values
    Proposed,
}

impl Slot {
    /// Every slot
    pub const ALL: [Slot; 3] = [Slot::Original, Slot::Current, Slot::Proposed];

    const fn index(self) -> usize {
        match self {
            Slot::Original => 0,
            Slot::Current => 1,
            Slot::Proposed => 2,
        }
    }
}

/// Per-row cell storage across versions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellStore {
    slots: [Option<Vec<Value>>; 3],
}

impl CellStore {
    /// Store with no slots at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding only a Proposed slot, as a freshly created row does
    pub fn pending(values: Vec<Value>) -> Self {
        let mut store = Self::new();
        store.open(Slot::Proposed, values);
        store
    }

    /// Whether `slot` is present
    pub fn has(&self, slot: Slot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// True when no slot is present
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Slot a version selector reads from, if present
    pub fn resolve(&self, version: RowVersion) -> Option<Slot> {
        let slot = match version {
            RowVersion::Original => Slot::Original,
            RowVersion::Current => Slot::Current,
            RowVersion::Proposed => Slot::Proposed,
            RowVersion::Default if self.has(Slot::Proposed) => Slot::Proposed,
            RowVersion::Default => Slot::Current,
        };
        self.has(slot).then_some(slot)
    }

    /// Whether a version selector resolves to a present slot
    pub fn has_version(&self, version: RowVersion) -> bool {
        self.resolve(version).is_some()
    }

    /// All values of a slot
    pub fn values(&self, slot: Slot) -> Option<&[Value]> {
        self.slots[slot.index()].as_deref()
    }

    /// All values a version selector resolves to
    pub fn version_values(&self, version: RowVersion) -> Option<&[Value]> {
        self.resolve(version).and_then(|slot| self.values(slot))
    }

    /// One cell of a version
    pub fn read(&self, column: usize, version: RowVersion) -> Option<&Value> {
        self.version_values(version).and_then(|v| v.get(column))
    }

    /// Overwrite one cell of a present slot, returning the previous value
    ///
    /// Returns `None` and writes nothing when the slot is absent or the
    /// column is out of range.
    pub fn write(&mut self, slot: Slot, column: usize, value: Value) -> Option<Value> {
        let cell = self.slots[slot.index()].as_mut()?.get_mut(column)?;
        Some(std::mem::replace(cell, value))
    }

    /// Install a whole slot
    pub fn open(&mut self, slot: Slot, values: Vec<Value>) {
        self.slots[slot.index()] = Some(values);
    }

    /// Remove a slot, returning its values
    pub fn take(&mut self, slot: Slot) -> Option<Vec<Value>> {
        self.slots[slot.index()].take()
    }

    /// Copy `from` into `to`; an absent source clears the target
    pub fn copy(&mut self, from: Slot, to: Slot) {
        self.slots[to.index()] = self.slots[from.index()].clone();
    }

    /// Whether two slots are both present with equal values
    pub fn same(&self, a: Slot, b: Slot) -> bool {
        match (self.values(a), self.values(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Drop every slot
    pub fn clear(&mut self) {
        self.slots = Default::default();
    }

    /// Append a column to every present slot
    pub fn push_column(&mut self, value: &Value) {
        for values in self.slots.iter_mut().flatten() {
            values.push(value.clone());
        }
    }

    /// Remove a column from every present slot
    pub fn remove_column(&mut self, column: usize) {
        for values in self.slots.iter_mut().flatten() {
            if column < values.len() {
                values.remove(column);
            }
        }
    }
}
