//! Pluggable event sinks.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::events::SimulationEvent;

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the run ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Shared view of the events collected by a [`VecSink`].
///
/// The sink itself is moved into the bus; keep an `EventLog` to read what
/// it collected.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<Vec<SimulationEvent>>>,
}

impl EventLog {
    fn lock(&self) -> MutexGuard<'_, Vec<SimulationEvent>> {
        // A panicking sink cannot leave the vec half-written; keep reading.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every event collected so far.
    pub fn snapshot(&self) -> Vec<SimulationEvent> {
        self.lock().clone()
    }

    /// Labels of collected events, in arrival order.
    pub fn labels(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.label().to_string()).collect()
    }
}

/// Collects events in memory, for tests and inspection.
#[derive(Debug, Default)]
pub struct VecSink {
    log: EventLog,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the collected events that outlives the sink's move into a bus.
    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.log.lock().push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing` at a fixed level.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(tracing::Level::INFO)
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        match self.level {
            tracing::Level::ERROR => {
                tracing::error!(frame = event.frame, event = ?event.kind, "simulation_event")
            }
            tracing::Level::WARN => {
                tracing::warn!(frame = event.frame, event = ?event.kind, "simulation_event")
            }
            tracing::Level::INFO => {
                tracing::info!(frame = event.frame, event = ?event.kind, "simulation_event")
            }
            tracing::Level::DEBUG => {
                tracing::debug!(frame = event.frame, event = ?event.kind, "simulation_event")
            }
            tracing::Level::TRACE => {
                tracing::trace!(frame = event.frame, event = ?event.kind, "simulation_event")
            }
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
