//! Simulation event types.
//!
//! Structured events emitted by the MPM driver at step boundaries and
//! lifecycle points. Events are plain values carrying just enough data to
//! monitor a run.

use serde::{Deserialize, Serialize};

/// A simulation event, tagged with the frame counter at emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    pub frame: u32,
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Driver configured and ready to step.
    Initialized {
        particle_count: u32,
        kernel: String,
        start_frame: u32,
        end_frame: u32,
    },

    /// Step about to run.
    StepBegin {
        /// Simulation time at the start of the step (seconds).
        time: f64,
        /// Requested time step (seconds).
        dt: f64,
    },

    /// Step completed.
    StepEnd {
        /// Simulation time after the step (seconds).
        time: f64,
        /// Wall-clock duration of the step (seconds).
        wall_time: f64,
    },

    /// Step rejected after it began; state is unchanged.
    StepAborted {
        /// Simulation time the step started from (seconds).
        time: f64,
        reason: String,
    },

    /// Conserved-quantity snapshot after a step.
    Diagnostics {
        total_mass: f64,
        grid_mass: f64,
        kinetic_energy: f64,
        momentum: [f64; 3],
    },

    /// Contact impulses consumed by a step.
    ContactImpulses { count: u32 },

    /// Restart file written.
    RestartWritten { path: String },

    /// Restart file loaded.
    RestartRead { path: String },

    /// Custom event for extensibility.
    Custom {
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl SimulationEvent {
    pub fn new(frame: u32, kind: EventKind) -> Self {
        Self { frame, kind }
    }

    /// Short stable name of the payload variant.
    pub fn label(&self) -> &str {
        match &self.kind {
            EventKind::Initialized { .. } => "initialized",
            EventKind::StepBegin { .. } => "step_begin",
            EventKind::StepEnd { .. } => "step_end",
            EventKind::StepAborted { .. } => "step_aborted",
            EventKind::Diagnostics { .. } => "diagnostics",
            EventKind::ContactImpulses { .. } => "contact_impulses",
            EventKind::RestartWritten { .. } => "restart_written",
            EventKind::RestartRead { .. } => "restart_read",
            EventKind::Custom { label, .. } => label,
        }
    }
}
