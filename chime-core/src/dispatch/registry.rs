//! Slot Registry
//!
//! The registry owns every slot connected to a signal, in connection order.
//! That order is the firing order, and for non-void signals it decides which
//! slot's result is returned (the last one).
//!
//! # Storage
//!
//! Entries live in an [`IndexMap`] keyed by [`ConnectionId`]:
//!
//! - insertion order is preserved and iteration follows it;
//! - lookup by connection id is a hash probe;
//! - removal uses `shift_remove`, which keeps the remaining order intact.
//!
//! Slots are held as `Rc` handles. Dispatch clones the handles into a
//! snapshot so that slot bodies can mutate the registry while the snapshot is
//! being walked. A removed slot is released as soon as its last handle goes:
//! immediately when no dispatch is running, or when the running dispatch
//! drops its snapshot.

use std::rc::Rc;

use indexmap::IndexMap;
use smallvec::SmallVec;

use super::connection::ConnectionId;
use super::slot::{Slot, SlotIdentity};

/// Inline capacity of a dispatch snapshot before it spills to the heap.
const SNAPSHOT_INLINE: usize = 8;

/// Ordered handles captured at the start of a dispatch.
pub(crate) type Snapshot<Args, R> = SmallVec<[Rc<dyn Slot<Args, R>>; SNAPSHOT_INLINE]>;

/// A registered slot and its identity key.
pub(crate) struct SlotEntry<Args, R> {
    pub identity: SlotIdentity,
    pub slot: Rc<dyn Slot<Args, R>>,
}

/// Insertion-ordered, exclusively owned collection of slots.
pub(crate) struct SlotRegistry<Args, R> {
    entries: IndexMap<ConnectionId, SlotEntry<Args, R>>,
}

impl<Args, R> SlotRegistry<Args, R> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty registry with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Insert a slot at the tail.
    pub fn append(&mut self, id: ConnectionId, entry: SlotEntry<Args, R>) {
        let previous = self.entries.insert(id, entry);
        debug_assert!(previous.is_none(), "connection id {id} registered twice");
    }

    /// Remove the first entry, in insertion order, for which `predicate` holds.
    ///
    /// The removed entry is handed back so the caller decides where it is
    /// dropped. Returns `None` if nothing matched.
    pub fn remove_first_matching<P>(&mut self, predicate: P) -> Option<(ConnectionId, SlotEntry<Args, R>)>
    where
        P: FnMut(&SlotEntry<Args, R>) -> bool,
    {
        let index = self.entries.values().position(predicate)?;
        self.entries.shift_remove_index(index)
    }

    /// Remove the entry registered under `id`.
    pub fn remove(&mut self, id: ConnectionId) -> Option<SlotEntry<Args, R>> {
        self.entries.shift_remove(&id)
    }

    /// Remove every entry.
    ///
    /// The removed entries come back as a registry of their own; they are
    /// released when it is dropped.
    pub fn clear(&mut self) -> Self {
        Self {
            entries: std::mem::take(&mut self.entries),
        }
    }

    /// Ordered, read-only traversal of the entries.
    pub fn iter(&self) -> impl Iterator<Item = (ConnectionId, &SlotEntry<Args, R>)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Capture the current slots, in order, for one dispatch.
    pub fn snapshot(&self) -> Snapshot<Args, R> {
        self.entries
            .values()
            .map(|entry| Rc::clone(&entry.slot))
            .collect()
    }

    /// Whether a slot is registered under `id`.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of registered slots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no slots.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Args, R> Default for SlotRegistry<Args, R> {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
