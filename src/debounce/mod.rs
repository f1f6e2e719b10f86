// src/debounce/mod.rs

//! Debounce / coalescing engine.
//!
//! Raw create/write events for a path start or extend a countdown of one quiet
//! window. When the countdown runs out with no further activity the path is
//! "settled" and handed to the [`SettlementSink`]. Remove/rename events cancel
//! a pending countdown without emitting anything.
//!
//! - [`coordinator`] owns the per-path pending state and the countdown tasks.
//! - [`sink`] is the single-slot hand-off to the consumer.

pub mod coordinator;
pub mod sink;

pub use coordinator::DebounceCoordinator;
pub use sink::{settlement_channel, Delivery, SettlementSink};
