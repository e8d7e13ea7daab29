//! Signal/Slot Dispatch
//!
//! This module implements a synchronous, typed publish/call facility. A
//! [`Signal`] holds an ordered list of callables (slots) and invokes all of
//! them when emitted.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A `Signal<Args, R>` declares a parameter tuple `Args` and a return type
//! `R`. Emitting calls every slot in connection order. For `R = ()` that is
//! all there is; otherwise the last slot's result is returned, and an empty
//! signal returns `R::default()`.
//!
//! ## Slots
//!
//! A slot is either a free callable (fn item, fn pointer, closure) or a
//! receiver plus a callable invoked through it (`connect_bound`). Slots are
//! stored type-erased, so one signal can mix both kinds and any callable
//! shapes.
//!
//! ## Arity Adaptation
//!
//! A slot may declare fewer parameters than the signal provides. It then
//! receives only the leading arguments it asked for. The prefix length is
//! fixed when the slot is connected.
//!
//! ## Disconnecting
//!
//! Every connect returns a [`ConnectionId`]; `disconnect_connection` removes
//! that exact slot. Callables that implement `PartialEq` (fn pointers,
//! [`Packed`] values) can also be removed by value with `disconnect` /
//! `disconnect_bound`, which take out the first matching slot.
//!
//! # Implementation Notes
//!
//! Dispatch walks a snapshot of the slot list taken when `emit` starts, so
//! slot bodies may freely connect, disconnect or emit on the same signal.

mod arity;
mod connection;
mod registry;
mod signal;
mod slot;

pub use arity::{ArgList, Handler, Method, Packed, PackedMarker};
pub use connection::{ConnectionId, ReceiverId};
pub use signal::Signal;
