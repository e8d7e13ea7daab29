//! Chime Core
//!
//! This crate provides a synchronous, strongly typed signal/slot dispatch
//! engine, together with a small type-checked `printf`.
//!
//! It implements:
//!
//! - Signals with any parameter list of up to six values
//! - Slots that accept a prefix of the signal's parameters
//! - Free and receiver-bound slots on the same signal
//! - Last-writer-wins return values
//! - Disconnection by connection token or by callable value
//! - C-style formatting whose arguments are checked before output
//!
//! # Architecture
//!
//! - `dispatch`: signals, slots, arity adaptation and the slot registry
//! - `printf`: format scanning, argument checking, rendering and sinks
//! - `error`: the error type shared by formatting operations
//!
//! # Example
//!
//! ```rust
//! use chime_core::dispatch::Signal;
//! use std::rc::Rc;
//!
//! struct Thermostat {
//!     offset: i32,
//! }
//!
//! impl Thermostat {
//!     fn adjust(&self, reading: i32) -> i32 {
//!         reading + self.offset
//!     }
//! }
//!
//! let reading: Signal<(i32, &'static str), i32> = Signal::new();
//! let thermostat = Rc::new(Thermostat { offset: -2 });
//!
//! reading.connect(|r: i32, unit: &'static str| {
//!     println!("{r}{unit}");
//!     r
//! });
//! reading.connect_bound(&thermostat, Thermostat::adjust);
//!
//! // The bound slot was connected last, so its value wins.
//! assert_eq!(reading.emit((21, "C")), 19);
//! ```

pub mod dispatch;
pub mod error;
pub mod printf;

pub use dispatch::{ConnectionId, Signal};
pub use error::FormatError;
