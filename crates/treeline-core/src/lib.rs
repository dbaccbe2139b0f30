//! Foundation crate for Treeline.
//!
//! This crate provides the pieces of Treeline that are independent of any
//! particular tree model or view:
//!
//! - [`Signal`] — a type-safe observer mechanism used for every lifecycle
//!   hook the view exposes (load completion, selection changes, ...)
//! - [`Throttle`] — a latest-wins fixed-interval sampler used to coalesce
//!   high-frequency input such as drag-move feedback
//! - [`logging`] — `tracing` target constants for filtering by subsystem
//!
//! Treeline is single-threaded and event-driven: every public operation
//! runs to completion before the next event is handled, so signal slots
//! are always invoked directly on the emitting thread.

pub mod logging;
mod signal;
mod throttle;

pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use throttle::Throttle;
