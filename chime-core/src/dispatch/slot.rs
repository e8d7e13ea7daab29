//! Type-erased slots.
//!
//! A signal stores heterogeneous callables side by side. Each one is wrapped
//! in a slot that erases its concrete type behind [`Slot`], whose single
//! dispatch operation is `invoke`. Two variants exist:
//!
//! - [`UnboundSlot`]: a free function, fn pointer or closure.
//! - [`BoundSlot`]: a receiver plus a callable invoked through it.
//!
//! Next to every slot the registry keeps a [`SlotIdentity`], the comparable
//! key used by value-based disconnect.

use std::any::Any;
use std::marker::PhantomData;
use std::rc::Rc;

use super::arity::{Handler, Method};
use super::connection::ReceiverId;

/// Something invocable with a signal's argument tuple.
pub(crate) trait Slot<Args, R> {
    /// Invoke the underlying callable, forwarding the prefix of `args` it accepts.
    fn invoke(&self, args: Args) -> R;

    /// The callable value, for equality checks during disconnect.
    fn callable(&self) -> &dyn Any;
}

/// Comparable identity of a connected slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SlotIdentity {
    /// Address of the receiver for bound slots.
    pub receiver: Option<ReceiverId>,

    /// Number of signal arguments forwarded to the callable.
    pub arity: usize,
}

impl SlotIdentity {
    /// Whether this slot was connected with `receiver` and a callable equal to `callable`.
    pub fn matches<F>(&self, slot: &dyn Any, receiver: Option<ReceiverId>, callable: &F) -> bool
    where
        F: PartialEq + 'static,
    {
        self.receiver == receiver
            && slot
                .downcast_ref::<F>()
                .is_some_and(|stored| stored == callable)
    }
}

/// A slot wrapping a free callable.
pub(crate) struct UnboundSlot<F, M> {
    callable: F,
    _marker: PhantomData<fn() -> M>,
}

impl<F, M> UnboundSlot<F, M> {
    pub fn new(callable: F) -> Self {
        Self {
            callable,
            _marker: PhantomData,
        }
    }

    /// Box `callable` into a shareable, type-erased slot.
    pub fn erased<Args, R>(callable: F) -> Rc<dyn Slot<Args, R>>
    where
        F: Handler<Args, R, M>,
        M: 'static,
    {
        Rc::new(Self::new(callable))
    }
}

impl<F, M, Args, R> Slot<Args, R> for UnboundSlot<F, M>
where
    F: Handler<Args, R, M>,
{
    #[inline]
    fn invoke(&self, args: Args) -> R {
        self.callable.call(args)
    }

    fn callable(&self) -> &dyn Any {
        &self.callable
    }
}

/// A slot wrapping a receiver and a callable invoked through it.
///
/// The slot holds a strong reference, so the receiver lives at least as
/// long as the connection.
pub(crate) struct BoundSlot<T, F, M> {
    receiver: Rc<T>,
    callable: F,
    _marker: PhantomData<fn() -> M>,
}

impl<T, F, M> BoundSlot<T, F, M> {
    pub fn new(receiver: Rc<T>, callable: F) -> Self {
        Self {
            receiver,
            callable,
            _marker: PhantomData,
        }
    }

    /// Box the pair into a shareable, type-erased slot.
    pub fn erased<Args, R>(receiver: Rc<T>, callable: F) -> Rc<dyn Slot<Args, R>>
    where
        T: 'static,
        F: Method<T, Args, R, M>,
        M: 'static,
    {
        Rc::new(Self::new(receiver, callable))
    }
}

impl<T, F, M, Args, R> Slot<Args, R> for BoundSlot<T, F, M>
where
    F: Method<T, Args, R, M>,
{
    #[inline]
    fn invoke(&self, args: Args) -> R {
        self.callable.call(&self.receiver, args)
    }

    fn callable(&self) -> &dyn Any {
        &self.callable
    }
}
