//! # strata-telemetry
//!
//! Event bus for simulation telemetry. The driver emits structured events
//! (step boundaries, diagnostics, contacts, restart I/O) that pluggable
//! sinks consume: an in-memory [`VecSink`] for tests and inspection, and a
//! [`TracingSink`] that forwards to `tracing`.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventLog, EventSink, TracingSink, VecSink};
