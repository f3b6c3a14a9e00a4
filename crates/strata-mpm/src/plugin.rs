//! Driver plugins.
//!
//! Plugins observe the driver at fixed lifecycle points. They are called
//! synchronously, in registration order, and cannot influence control flow.
//!
//! ```text
//! configure:    plugin.on_initialize(...)
//! each step:    plugin.on_step_begin(...)
//!               <P2G, grid update, G2P>
//!               plugin.on_step_end(...)   or   plugin.on_step_abort(...)
//! restart I/O:  plugin.on_write(...) / plugin.on_read(...)
//! ```

use std::path::Path;

use strata_kernel::KernelKind;
use strata_telemetry::{EventBus, EventKind, SimulationEvent};
use strata_types::{Scalar, StrataError};

use crate::diagnostics::Diagnostics;

/// Run description passed to [`DriverPlugin::on_initialize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunInfo {
    pub particle_count: u32,
    pub kernel: KernelKind,
    pub start_frame: u32,
    pub end_frame: u32,
}

/// Step description passed to the step hooks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    /// Frame counter: before the step in `on_step_begin`, after it in
    /// `on_step_end`.
    pub frame: u32,
    /// Simulation time, on the same convention as `frame`.
    pub time: f64,
    pub dt: Scalar,
    /// Contact impulses consumed by the step.
    pub contact_impulses: u32,
    /// Wall-clock duration of the step (seconds); zero before it runs.
    pub wall_time: f64,
}

/// Observer attached to a driver.
pub trait DriverPlugin: Send {
    fn name(&self) -> &str;

    fn on_initialize(&mut self, run: &RunInfo) {
        let _ = run;
    }

    fn on_step_begin(&mut self, step: &StepInfo) {
        let _ = step;
    }

    fn on_step_end(&mut self, step: &StepInfo, diagnostics: &Diagnostics) {
        let _ = (step, diagnostics);
    }

    /// Called instead of `on_step_end` when a step that already began is
    /// rejected. The driver state is as it was before `on_step_begin`.
    fn on_step_abort(&mut self, step: &StepInfo, error: &StrataError) {
        let _ = (step, error);
    }

    fn on_write(&mut self, frame: u32, path: &Path) {
        let _ = (frame, path);
    }

    fn on_read(&mut self, frame: u32, path: &Path) {
        let _ = (frame, path);
    }
}

/// Bridges driver callbacks to a telemetry [`EventBus`]. Events are flushed
/// to the sinks at the end of every callback.
pub struct TelemetryPlugin {
    bus: EventBus,
}

impl TelemetryPlugin {
    pub fn new(bus: EventBus) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    fn publish(&mut self, frame: u32, kind: EventKind) {
        self.bus.emit(SimulationEvent::new(frame, kind));
        self.bus.flush();
    }
}

impl DriverPlugin for TelemetryPlugin {
    fn name(&self) -> &str {
        "telemetry"
    }

    fn on_initialize(&mut self, run: &RunInfo) {
        self.publish(
            run.start_frame,
            EventKind::Initialized {
                particle_count: run.particle_count,
                kernel: run.kernel.name().to_string(),
                start_frame: run.start_frame,
                end_frame: run.end_frame,
            },
        );
    }

    fn on_step_begin(&mut self, step: &StepInfo) {
        self.bus.emit(SimulationEvent::new(
            step.frame,
            EventKind::StepBegin {
                time: step.time,
                dt: step.dt as f64,
            },
        ));
        if step.contact_impulses > 0 {
            self.bus.emit(SimulationEvent::new(
                step.frame,
                EventKind::ContactImpulses {
                    count: step.contact_impulses,
                },
            ));
        }
        self.bus.flush();
    }

    fn on_step_end(&mut self, step: &StepInfo, diagnostics: &Diagnostics) {
        self.bus.emit(SimulationEvent::new(
            step.frame,
            EventKind::StepEnd {
                time: step.time,
                wall_time: step.wall_time,
            },
        ));
        self.publish(
            step.frame,
            EventKind::Diagnostics {
                total_mass: diagnostics.total_mass,
                grid_mass: diagnostics.grid_mass,
                kinetic_energy: diagnostics.kinetic_energy,
                momentum: diagnostics.momentum,
            },
        );
    }

    fn on_step_abort(&mut self, step: &StepInfo, error: &StrataError) {
        self.publish(
            step.frame,
            EventKind::StepAborted {
                time: step.time,
                reason: error.to_string(),
            },
        );
    }

    fn on_write(&mut self, frame: u32, path: &Path) {
        self.publish(
            frame,
            EventKind::RestartWritten {
                path: path.display().to_string(),
            },
        );
    }

    fn on_read(&mut self, frame: u32, path: &Path) {
        self.publish(
            frame,
            EventKind::RestartRead {
                path: path.display().to_string(),
            },
        );
    }
}

impl Drop for TelemetryPlugin {
    fn drop(&mut self) {
        self.bus.finish();
    }
}

/// Logs step boundaries through `tracing`.
#[derive(Debug, Default)]
pub struct LogPlugin;

impl DriverPlugin for LogPlugin {
    fn name(&self) -> &str {
        "log"
    }

    fn on_initialize(&mut self, run: &RunInfo) {
        tracing::info!(
            particles = run.particle_count,
            kernel = %run.kernel,
            start = run.start_frame,
            end = run.end_frame,
            "Run initialized"
        );
    }

    fn on_step_end(&mut self, step: &StepInfo, diagnostics: &Diagnostics) {
        tracing::info!(
            frame = step.frame,
            time = step.time,
            dt = step.dt,
            kinetic_energy = diagnostics.kinetic_energy,
            "Step complete"
        );
    }

    fn on_step_abort(&mut self, step: &StepInfo, error: &StrataError) {
        tracing::warn!(frame = step.frame, dt = step.dt, %error, "Step aborted");
    }

    fn on_write(&mut self, frame: u32, path: &Path) {
        tracing::info!(frame, path = %path.display(), "Restart written");
    }

    fn on_read(&mut self, frame: u32, path: &Path) {
        tracing::info!(frame, path = %path.display(), "Restart read");
    }
}
