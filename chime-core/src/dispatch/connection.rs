//! Connection tokens.
//!
//! Every `connect` hands back a [`ConnectionId`]. The id is the only removal
//! path that works for every slot, including closures that cannot be compared
//! by value.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a connected slot.
///
/// Ids are drawn from a process-wide counter, so an id taken from one signal
/// never matches a slot on another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn#{}", self.0)
    }
}

/// Address of a bound slot's receiver.
///
/// The receiver is kept alive by the slot that holds it, so the address
/// cannot be reused by another allocation while the slot is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReceiverId(usize);

impl ReceiverId {
    pub(crate) fn of<T>(receiver: &std::rc::Rc<T>) -> Self {
        Self(std::rc::Rc::as_ptr(receiver).cast::<()>() as usize)
    }
}
