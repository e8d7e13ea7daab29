//! Signal Implementation
//!
//! A Signal is the publisher half of the dispatch engine. It holds an ordered
//! list of slots and, when emitted, calls each of them with the emitted
//! arguments.
//!
//! # How Signals Work
//!
//! 1. `connect` wraps a callable in a slot and appends it to the registry.
//!    The returned [`ConnectionId`] removes exactly that slot later.
//!
//! 2. `emit` captures a snapshot of the registry, then calls every slot in
//!    connection order. Each slot receives as many leading arguments as its
//!    callable declares.
//!
//! 3. For a signal returning `R`, the value of the *last* slot is returned and
//!    earlier results are discarded. With no slots connected, `R::default()`
//!    is returned.
//!
//! # Reentrancy
//!
//! Every method takes `&self`, so a slot may connect, disconnect or emit on
//! the signal that is calling it. Such changes apply from the next `emit`
//! onwards; the dispatch in progress keeps walking its snapshot.
//!
//! # Thread Safety
//!
//! Signals are single-threaded. Slots are held behind `Rc` and the registry
//! behind `RefCell`, so a `Signal` is neither `Send` nor `Sync`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use super::arity::{ArgList, Handler, Method};
use super::connection::{ConnectionId, ReceiverId};
use super::registry::{SlotEntry, SlotRegistry};
use super::slot::{BoundSlot, Slot, SlotIdentity, UnboundSlot};

/// Counter for generating unique signal IDs.
static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique signal ID.
fn next_signal_id() -> u64 {
    SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// A typed signal carrying arguments `Args` and returning `R`.
///
/// # Type Parameters
///
/// - `Args`: tuple of parameter types, `()` up to six elements.
/// - `R`: the value `emit` returns. Defaults to `()`.
///
/// # Example
///
/// ```rust
/// use chime_core::dispatch::Signal;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let resized: Signal<(u32, u32)> = Signal::new();
/// let area = Rc::new(Cell::new(0));
///
/// let sink = area.clone();
/// resized.connect(move |w: u32, h: u32| sink.set(w * h));
/// resized.connect(|| println!("resized"));
///
/// resized.emit((4, 5));
/// assert_eq!(area.get(), 20);
/// ```
pub struct Signal<Args, R = ()>
where
    Args: ArgList,
    R: 'static,
{
    /// Unique identifier for this signal.
    id: u64,

    /// Connected slots in firing order.
    registry: RefCell<SlotRegistry<Args, R>>,
}

impl<Args, R> Signal<Args, R>
where
    Args: ArgList,
    R: 'static,
{
    /// Create a signal with no slots.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a signal with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id: next_signal_id(),
            registry: RefCell::new(SlotRegistry::with_capacity(capacity)),
        }
    }

    /// Get the signal's unique ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Connect a free callable.
    ///
    /// The callable may declare any prefix of `Args` as its parameters; the
    /// remaining arguments are not passed to it. Returns a token for
    /// [`disconnect_connection`](Self::disconnect_connection).
    ///
    /// The callable is stored with its own type. A fn item connected as-is
    /// (`signal.connect(handler)`) can only be removed with its token; connect
    /// it as a fn pointer (`handler as fn(i32)`) to remove it later with
    /// [`disconnect`](Self::disconnect).
    ///
    /// Parameter types must match the signal's leading argument types:
    ///
    /// ```compile_fail
    /// use chime_core::Signal;
    ///
    /// let signal: Signal<(i32,)> = Signal::new();
    /// signal.connect(|_wide: u64| {});
    /// ```
    ///
    /// and a callable cannot ask for more arguments than the signal has:
    ///
    /// ```compile_fail
    /// use chime_core::Signal;
    ///
    /// let signal: Signal<(i32,)> = Signal::new();
    /// signal.connect(|_a: i32, _b: i32| {});
    /// ```
    pub fn connect<F, M>(&self, callable: F) -> ConnectionId
    where
        F: Handler<Args, R, M>,
        M: 'static,
    {
        let identity = SlotIdentity {
            receiver: None,
            arity: F::ARITY,
        };
        self.register(identity, UnboundSlot::<F, M>::erased(callable))
    }

    /// Connect a callable that is invoked through `receiver`.
    ///
    /// `method` is typically a method path such as `Counter::record`. The
    /// slot keeps `receiver` alive for as long as it is connected.
    ///
    /// As with [`connect`](Self::connect), a method path passed as-is keeps
    /// its fn item type, and only the returned token removes it. To remove
    /// the pair by value, connect and disconnect with the same fn pointer:
    ///
    /// ```rust
    /// use chime_core::Signal;
    /// use std::rc::Rc;
    ///
    /// struct Meter;
    ///
    /// impl Meter {
    ///     fn hit(&self, _n: i32) {}
    /// }
    ///
    /// let meter = Rc::new(Meter);
    /// let signal: Signal<(i32,)> = Signal::new();
    ///
    /// signal.connect_bound(&meter, Meter::hit as fn(&Meter, i32));
    /// assert!(signal.disconnect_bound(&meter, Meter::hit as fn(&Meter, i32)));
    /// assert!(signal.is_empty());
    /// ```
    pub fn connect_bound<T, F, M>(&self, receiver: &Rc<T>, method: F) -> ConnectionId
    where
        T: 'static,
        F: Method<T, Args, R, M>,
        M: 'static,
    {
        let identity = SlotIdentity {
            receiver: Some(ReceiverId::of(receiver)),
            arity: F::ARITY,
        };
        self.register(identity, BoundSlot::<T, F, M>::erased(Rc::clone(receiver), method))
    }

    fn register(&self, identity: SlotIdentity, slot: Rc<dyn Slot<Args, R>>) -> ConnectionId {
        let id = ConnectionId::next();
        self.registry
            .borrow_mut()
            .append(id, SlotEntry { identity, slot });

        trace!(
            signal = self.id,
            connection = %id,
            arity = identity.arity,
            params = Args::LEN,
            bound = identity.receiver.is_some(),
            "Connected slot."
        );
        id
    }

    /// Disconnect the first free slot whose callable equals `callable`.
    ///
    /// Only slots connected with a callable of the same type are considered.
    /// The `PartialEq` bound means closures that capture state cannot be
    /// passed here; use the [`ConnectionId`] returned by `connect` for those.
    /// Connect a fn item as a fn pointer (`handler as fn(i32)`) to be able to
    /// disconnect it by value.
    ///
    /// Returns `false` if nothing matched.
    ///
    /// ```compile_fail
    /// use chime_core::Signal;
    /// use std::cell::Cell;
    ///
    /// let signal: Signal<(i32,)> = Signal::new();
    /// let last = Cell::new(0);
    /// signal.disconnect(move |x: i32| last.set(x));
    /// ```
    pub fn disconnect<F>(&self, callable: F) -> bool
    where
        F: PartialEq + 'static,
    {
        self.disconnect_matching(None, &callable)
    }

    /// Disconnect the first slot bound to `receiver` whose callable equals `method`.
    ///
    /// Returns `false` if nothing matched.
    pub fn disconnect_bound<T, F>(&self, receiver: &Rc<T>, method: F) -> bool
    where
        T: 'static,
        F: PartialEq + 'static,
    {
        self.disconnect_matching(Some(ReceiverId::of(receiver)), &method)
    }

    fn disconnect_matching<F>(&self, receiver: Option<ReceiverId>, callable: &F) -> bool
    where
        F: PartialEq + 'static,
    {
        // The removed entry is dropped after the registry borrow ends, so a
        // slot whose captures reach back into this signal can be released.
        let removed = self
            .registry
            .borrow_mut()
            .remove_first_matching(|entry| entry.identity.matches(entry.slot.callable(), receiver, callable));

        match removed {
            Some((id, _entry)) => {
                trace!(signal = self.id, connection = %id, "Disconnected slot.");
                true
            }
            None => {
                trace!(signal = self.id, "No matching slot to disconnect.");
                false
            }
        }
    }

    /// Disconnect the slot registered under `id`.
    ///
    /// Works for every kind of slot. Returns `false` if `id` is not (or no
    /// longer) connected to this signal.
    pub fn disconnect_connection(&self, id: ConnectionId) -> bool {
        let removed = self.registry.borrow_mut().remove(id);
        trace!(
            signal = self.id,
            connection = %id,
            removed = removed.is_some(),
            "Disconnected connection."
        );
        removed.is_some()
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) {
        let drained = self.registry.borrow_mut().clear();
        trace!(signal = self.id, slots = drained.len(), "Disconnected all slots.");
        drop(drained);
    }

    /// Whether `id` is currently connected to this signal.
    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.registry.borrow().contains(id)
    }

    /// Number of connected slots.
    pub fn len(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Whether no slots are connected.
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Call every connected slot with `args` and return the last slot's result.
    ///
    /// Slots run in connection order on the calling thread. Each slot but the
    /// last receives a clone of `args`; the last receives `args` itself. If
    /// no slot is connected nothing is called and `R::default()` is returned.
    ///
    /// A panic in a slot propagates to the caller; slots after it do not run.
    pub fn emit(&self, args: Args) -> R
    where
        Args: Clone,
        R: Default,
    {
        // The registry borrow ends with this statement, before any slot runs.
        let snapshot = self.registry.borrow().snapshot();
        trace!(signal = self.id, slots = snapshot.len(), "Emitting signal.");

        let Some((last, rest)) = snapshot.split_last() else {
            return R::default();
        };

        for slot in rest {
            slot.invoke(args.clone());
        }
        last.invoke(args)
    }
}

impl<Args, R> Default for Signal<Args, R>
where
    Args: ArgList,
    R: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Args, R> fmt::Debug for Signal<Args, R>
where
    Args: ArgList,
    R: 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.borrow();
        let slots: Vec<_> = registry
            .iter()
            .map(|(id, entry)| (id.raw(), entry.identity.arity, entry.identity.receiver.is_some()))
            .collect();

        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("params", &Args::LEN)
            .field("slots", &slots)
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
