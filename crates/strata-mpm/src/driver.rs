//! MPM drivers.
//!
//! [`MpmDriver`] is the object-safe interface the frame loop ([`run`])
//! drives. [`MpmBase`] carries the state every driver shares (frame range,
//! clock, plugins, the owned weight function) and [`ExplicitMpm`] is the
//! explicit PIC/FLIP implementation.
//!
//! ## Lifecycle
//!
//! ```text
//! Unconfigured --init_configuration--> Configured (frame = start_frame)
//! Configured   --advance_step-------> Configured (frame += 1)
//!                                     Complete   (once frame == end_frame)
//! ```
//!
//! `write`/`read` are valid in `Configured` and `Complete` only. A failed
//! configuration leaves the driver `Unconfigured`.

use std::path::{Path, PathBuf};
use std::time::Instant;

use strata_contact::{sample_contacts, CollidableRegistry, CollisionPairSet, ContactPoint};
use strata_io::{
    read_restart, validate_setup, write_restart, RestartFile, RestartHeader, RestartState,
    SimulationSetup,
};
use strata_kernel::{KernelKind, KernelShape, WeightFunction, WeightFunctionFactory};
use strata_math::{GridMatrix, GridVector};
use strata_types::constants::{DEFAULT_FRAME_RATE, DEFAULT_MAX_DT, MIN_DT};
use strata_types::{Scalar, StrataError, StrataResult};

use crate::contact::{impulses_from_contacts, ContactImpulse};
use crate::diagnostics::Diagnostics;
use crate::grid::Grid;
use crate::material::Constitutive;
use crate::particles::ParticleSet;
use crate::plugin::{DriverPlugin, RunInfo, StepInfo};
use crate::transfer::{grid_to_particle, particle_to_grid, update_grid, StepParams};

/// Relative slack allowed when a caller passes back the bound itself.
const DT_TOLERANCE: Scalar = 1.0e-5;

/// Driver lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Unconfigured,
    Configured,
    Complete,
}

/// Interface between a time-stepping driver and the frame loop.
pub trait MpmDriver {
    /// Loads and applies a setup file (descriptor or `.toml`).
    fn init_configuration(&mut self, path: &Path) -> StrataResult<()>;

    /// Largest stable time step for the current state.
    fn compute_time_step(&self) -> StrataResult<Scalar>;

    /// Advances the simulation by one step of length `dt`.
    fn advance_step(&mut self, dt: Scalar) -> StrataResult<()>;

    /// Attaches an observer. Duplicates are kept and notified twice.
    fn add_plugin(&mut self, plugin: Box<dyn DriverPlugin>);

    /// Whether [`MpmDriver::write`] and [`MpmDriver::read`] are supported.
    /// [`run`] never calls them on a driver that returns false.
    fn with_restart_support(&self) -> bool;

    fn write(&mut self, path: &Path) -> StrataResult<()>;

    fn read(&mut self, path: &Path) -> StrataResult<()>;

    fn state(&self) -> DriverState;

    /// Current frame counter.
    fn frame(&self) -> u32;

    /// Current simulation time (seconds).
    fn time(&self) -> f64;

    /// Directory restart files go to, if the run writes them.
    fn output_directory(&self) -> Option<&Path>;
}

/// Path of the restart file written after `frame`.
pub fn restart_path(dir: &Path, frame: u32) -> PathBuf {
    dir.join(format!("restart_{:05}.bin", frame))
}

/// Steps a configured driver until it completes. Returns the number of
/// steps taken.
///
/// When the driver supports restarts and names an output directory, a
/// restart file is written after every step.
pub fn run(driver: &mut dyn MpmDriver) -> StrataResult<u32> {
    if driver.state() == DriverState::Unconfigured {
        return Err(StrataError::InvalidState(
            "run called before init_configuration".into(),
        ));
    }
    let output = if driver.with_restart_support() {
        driver.output_directory().map(Path::to_path_buf)
    } else {
        None
    };
    if let Some(dir) = &output {
        std::fs::create_dir_all(dir)?;
    }

    let mut steps = 0;
    while driver.state() == DriverState::Configured {
        let dt = driver.compute_time_step()?;
        driver.advance_step(dt)?;
        steps += 1;
        if let Some(dir) = &output {
            driver.write(&restart_path(dir, driver.frame()))?;
        }
    }
    tracing::info!(steps, frame = driver.frame(), time = driver.time(), "Run complete");
    Ok(steps)
}

// ─── Shared driver state ────────────────────────────────────

/// State shared by every MPM driver.
pub struct MpmBase<V: GridVector> {
    start_frame: u32,
    end_frame: u32,
    frame_rate: Scalar,
    max_dt: Scalar,
    write_to_file: bool,
    output_dir: PathBuf,
    frame: u32,
    time: f64,
    state: DriverState,
    plugins: Vec<Box<dyn DriverPlugin>>,
    weight_function: Option<Box<dyn WeightFunction<V>>>,
    factory: WeightFunctionFactory<V>,
    /// Grid spacing kernels are scaled to.
    cell_width: Scalar,
}

impl<V: GridVector> MpmBase<V> {
    pub fn new(
        start_frame: u32,
        end_frame: u32,
        frame_rate: Scalar,
        max_dt: Scalar,
        write_to_file: bool,
    ) -> StrataResult<Self> {
        check_frame_range(start_frame, end_frame, frame_rate, max_dt)?;
        Ok(Self {
            start_frame,
            end_frame,
            frame_rate,
            max_dt,
            write_to_file,
            output_dir: PathBuf::from("output"),
            frame: start_frame,
            time: 0.0,
            state: DriverState::Unconfigured,
            plugins: Vec::new(),
            weight_function: None,
            factory: WeightFunctionFactory::with_defaults(),
            cell_width: 1.0,
        })
    }

    pub fn start_frame(&self) -> u32 {
        self.start_frame
    }

    pub fn end_frame(&self) -> u32 {
        self.end_frame
    }

    pub fn frame_rate(&self) -> Scalar {
        self.frame_rate
    }

    pub fn max_dt(&self) -> Scalar {
        self.max_dt
    }

    pub fn write_to_file(&self) -> bool {
        self.write_to_file
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn cell_width(&self) -> Scalar {
        self.cell_width
    }

    pub fn output_directory(&self) -> Option<&Path> {
        self.write_to_file.then_some(self.output_dir.as_path())
    }

    /// The owned weight function, once one is set.
    pub fn weight_function(&self) -> Option<&dyn WeightFunction<V>> {
        self.weight_function.as_deref()
    }

    /// Kernel constructors available to this driver.
    pub fn factory(&self) -> &WeightFunctionFactory<V> {
        &self.factory
    }

    /// Registry access, e.g. to register a custom kernel constructor.
    pub fn factory_mut(&mut self) -> &mut WeightFunctionFactory<V> {
        &mut self.factory
    }

    /// Replaces the owned weight function with the kernel for shape `S`,
    /// scaled to the current cell width. On failure the previous function
    /// is kept.
    pub fn set_weight_function<S: KernelShape>(&mut self) -> StrataResult<()> {
        let function = self.factory.create_shape::<S>(S::SUPPORT * self.cell_width)?;
        self.install(function);
        Ok(())
    }

    /// Replaces the owned weight function with the kernel registered for
    /// `kind`. On failure the previous function is kept.
    pub fn set_weight_function_kind(&mut self, kind: KernelKind) -> StrataResult<()> {
        let function = self.factory.create(kind, kind.support_cells() * self.cell_width)?;
        self.install(function);
        Ok(())
    }

    fn install(&mut self, function: Box<dyn WeightFunction<V>>) {
        tracing::debug!(
            kernel = %function.kind(),
            support_radius = function.support_radius(),
            "Weight function installed"
        );
        self.weight_function = Some(function);
    }

    pub fn add_plugin(&mut self, plugin: Box<dyn DriverPlugin>) {
        tracing::debug!(plugin = plugin.name(), "Plugin attached");
        self.plugins.push(plugin);
    }

    /// Fails unless the driver is configured or complete.
    pub fn require_configured(&self, operation: &str) -> StrataResult<()> {
        match self.state {
            DriverState::Unconfigured => Err(StrataError::InvalidState(format!(
                "{} requires a configured driver",
                operation
            ))),
            DriverState::Configured | DriverState::Complete => Ok(()),
        }
    }

    /// Moves the clock forward by one step and updates the state.
    pub fn advance_clock(&mut self, dt: Scalar) {
        self.time += dt as f64;
        self.frame += 1;
        if self.frame >= self.end_frame {
            self.state = DriverState::Complete;
        }
    }

    /// Resets the clock to `frame` and `time`, deriving the state.
    pub fn restore_clock(&mut self, frame: u32, time: f64) {
        self.frame = frame;
        self.time = time;
        self.state = if frame >= self.end_frame {
            DriverState::Complete
        } else {
            DriverState::Configured
        };
    }

    pub fn notify_initialize(&mut self, run: &RunInfo) {
        for plugin in &mut self.plugins {
            plugin.on_initialize(run);
        }
    }

    pub fn notify_step_begin(&mut self, step: &StepInfo) {
        for plugin in &mut self.plugins {
            plugin.on_step_begin(step);
        }
    }

    pub fn notify_step_end(&mut self, step: &StepInfo, diagnostics: &Diagnostics) {
        for plugin in &mut self.plugins {
            plugin.on_step_end(step, diagnostics);
        }
    }

    pub fn notify_step_abort(&mut self, step: &StepInfo, error: &StrataError) {
        for plugin in &mut self.plugins {
            plugin.on_step_abort(step, error);
        }
    }

    pub fn notify_write(&mut self, path: &Path) {
        let frame = self.frame;
        for plugin in &mut self.plugins {
            plugin.on_write(frame, path);
        }
    }

    pub fn notify_read(&mut self, path: &Path) {
        let frame = self.frame;
        for plugin in &mut self.plugins {
            plugin.on_read(frame, path);
        }
    }
}

impl<V: GridVector> Default for MpmBase<V> {
    fn default() -> Self {
        Self {
            start_frame: 0,
            end_frame: 0,
            frame_rate: DEFAULT_FRAME_RATE,
            max_dt: DEFAULT_MAX_DT,
            write_to_file: false,
            output_dir: PathBuf::from("output"),
            frame: 0,
            time: 0.0,
            state: DriverState::Unconfigured,
            plugins: Vec::new(),
            weight_function: None,
            factory: WeightFunctionFactory::with_defaults(),
            cell_width: 1.0,
        }
    }
}

fn check_frame_range(start: u32, end: u32, frame_rate: Scalar, max_dt: Scalar) -> StrataResult<()> {
    if end < start {
        return Err(StrataError::Configuration(format!(
            "End frame {} precedes start frame {}",
            end, start
        )));
    }
    if !(frame_rate > 0.0 && frame_rate.is_finite()) {
        return Err(StrataError::Configuration("Frame rate must be positive".into()));
    }
    if !(max_dt > 0.0 && max_dt.is_finite()) {
        return Err(StrataError::Configuration(
            "Maximum time step must be positive".into(),
        ));
    }
    Ok(())
}

// ─── Explicit PIC/FLIP driver ───────────────────────────────

/// Everything built from a setup, committed in one piece.
struct Simulation<V: GridVector> {
    setup: SimulationSetup,
    particles: ParticleSet<V>,
    grid: Grid<V>,
    material: Constitutive,
    gravity: V,
}

/// Explicit MPM with PIC/FLIP transfers.
pub struct ExplicitMpm<V: GridVector> {
    base: MpmBase<V>,
    sim: Option<Simulation<V>>,
    /// Impulses consumed by the next step.
    pending_impulses: Vec<ContactImpulse<V>>,
}

impl<V: GridVector> Default for ExplicitMpm<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: GridVector> ExplicitMpm<V> {
    pub fn new() -> Self {
        Self::with_base(MpmBase::default())
    }

    pub fn with_base(base: MpmBase<V>) -> Self {
        Self {
            base,
            sim: None,
            pending_impulses: Vec::new(),
        }
    }

    pub fn base(&self) -> &MpmBase<V> {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut MpmBase<V> {
        &mut self.base
    }

    /// The setup the driver was configured with.
    pub fn setup(&self) -> Option<&SimulationSetup> {
        self.sim.as_ref().map(|s| &s.setup)
    }

    /// Particle state. Empty until configured.
    pub fn particles(&self) -> Option<&ParticleSet<V>> {
        self.sim.as_ref().map(|s| &s.particles)
    }

    pub fn grid(&self) -> Option<&Grid<V>> {
        self.sim.as_ref().map(|s| &s.grid)
    }

    pub fn weight_function(&self) -> Option<&dyn WeightFunction<V>> {
        self.base.weight_function()
    }

    /// See [`MpmBase::set_weight_function`].
    pub fn set_weight_function<S: KernelShape>(&mut self) -> StrataResult<()> {
        self.base.set_weight_function::<S>()
    }

    /// Applies a validated setup.
    ///
    /// Everything is built before anything is committed: on error the
    /// driver is left `Unconfigured` and its buffers untouched.
    pub fn configure(&mut self, setup: SimulationSetup) -> StrataResult<()> {
        let (sim, kernel) = match self.build(setup) {
            Ok(built) => built,
            Err(e) => {
                self.base.state = DriverState::Unconfigured;
                tracing::warn!(error = %e, "Configuration rejected");
                return Err(e);
            }
        };

        let setup = &sim.setup;
        let base = &mut self.base;
        base.start_frame = setup.start_frame;
        base.end_frame = setup.end_frame;
        base.frame_rate = setup.frame_rate;
        base.max_dt = setup.max_dt;
        base.write_to_file = setup.write_to_file;
        base.output_dir = PathBuf::from(&setup.output_dir);
        base.cell_width = setup.grid.cell_width;
        base.install(kernel);
        base.restore_clock(setup.start_frame, 0.0);
        self.pending_impulses.clear();

        let run = RunInfo {
            particle_count: sim.particles.len() as u32,
            kernel: setup.kernel,
            start_frame: setup.start_frame,
            end_frame: setup.end_frame,
        };
        tracing::info!(
            dim = V::DIM,
            particles = run.particle_count,
            kernel = %setup.kernel,
            material = setup.material.model.name(),
            "Driver configured"
        );
        self.sim = Some(sim);
        self.base.notify_initialize(&run);
        Ok(())
    }

    fn build(
        &self,
        setup: SimulationSetup,
    ) -> StrataResult<(Simulation<V>, Box<dyn WeightFunction<V>>)> {
        validate_setup(&setup, V::DIM)?;
        check_frame_range(setup.start_frame, setup.end_frame, setup.frame_rate, setup.max_dt)?;

        let h = setup.grid.cell_width;
        let kernel = self
            .base
            .factory
            .create(setup.kernel, setup.kernel.support_cells() * h)?;
        let grid = Grid::new(setup.grid.resolution, h, from_array(setup.grid.origin))?;
        let material = Constitutive::from_setup(&setup.material);
        let seeding = &setup.seeding;
        let particles = ParticleSet::seed_box(
            from_array(seeding.min),
            from_array(seeding.max),
            seeding.count as usize,
            material.density,
            from_array(seeding.velocity),
        );
        let gravity = from_array(setup.gravity);
        let sim = Simulation {
            setup,
            particles,
            grid,
            material,
            gravity,
        };
        Ok((sim, kernel))
    }

    fn simulation(&self, operation: &str) -> StrataResult<&Simulation<V>> {
        self.base.require_configured(operation)?;
        self.sim.as_ref().ok_or_else(|| {
            StrataError::InvalidState(format!("{} requires a configured driver", operation))
        })
    }

    fn kernel(&self) -> StrataResult<&dyn WeightFunction<V>> {
        self.base
            .weight_function()
            .ok_or_else(|| StrataError::InvalidState("No weight function installed".into()))
    }

    /// Queues impulses for the next step.
    pub fn apply_contact_impulses(&mut self, impulses: impl IntoIterator<Item = ContactImpulse<V>>) {
        self.pending_impulses.extend(impulses);
    }

    /// Queues one impulse of `magnitude` per sampled contact.
    pub fn apply_contacts(&mut self, contacts: &[ContactPoint], magnitude: Scalar) {
        self.pending_impulses
            .extend(impulses_from_contacts::<V>(contacts, magnitude));
    }

    /// Samples `pairs` against `registry` and queues the resulting impulses.
    /// Returns the number of impulses queued.
    ///
    /// Fails with [`StrataError::CollisionData`] if the pairs are stale.
    pub fn apply_collision_pairs(
        &mut self,
        pairs: &CollisionPairSet,
        registry: &CollidableRegistry,
        magnitude: Scalar,
    ) -> StrataResult<usize> {
        let contacts = sample_contacts(pairs, registry)?;
        self.apply_contacts(&contacts, magnitude);
        Ok(contacts.len())
    }

    pub fn pending_impulse_count(&self) -> usize {
        self.pending_impulses.len()
    }

    fn time_step_bound(&self, sim: &Simulation<V>) -> Scalar {
        let h = sim.grid.cell_width();
        let speed = sim.particles.max_speed() + sim.material.wave_speed();
        let cfl_dt = sim.setup.cfl * h / speed;
        let dt = self.base.max_dt.min(1.0 / self.base.frame_rate).min(cfl_dt);
        dt.max(MIN_DT).min(self.base.max_dt)
    }

    /// Runs the transfers for one step. Particles are untouched on error.
    fn transfer(&mut self, params: &StepParams<V>, impulses: &[ContactImpulse<V>]) -> StrataResult<()> {
        let kernel = self
            .base
            .weight_function
            .as_deref()
            .ok_or_else(|| StrataError::InvalidState("No weight function installed".into()))?;
        let sim = self
            .sim
            .as_mut()
            .ok_or_else(|| StrataError::InvalidState("Driver has no simulation state".into()))?;
        particle_to_grid(&sim.particles, &mut sim.grid, kernel, &sim.material);
        update_grid(&mut sim.grid, kernel, impulses, params);
        grid_to_particle(&mut sim.particles, &sim.grid, kernel, &sim.material, params)
    }

    /// Builds the restart header describing the current configuration.
    pub fn restart_header(&self) -> StrataResult<RestartHeader> {
        let sim = self.simulation("restart_header")?;
        let kernel = self.kernel()?;
        Ok(RestartHeader::new(
            V::DIM as u32,
            kernel.kind(),
            sim.particles.len() as u32,
            sim.grid.resolution(),
            sim.grid.cell_width(),
        ))
    }

    /// Captures the full state as a restart file.
    pub fn snapshot(&self) -> StrataResult<RestartFile> {
        let header = self.restart_header()?;
        let sim = self.simulation("snapshot")?;
        let p = &sim.particles;
        let state = RestartState {
            frame: self.base.frame,
            time: self.base.time,
            positions: flatten_vectors(&p.positions),
            velocities: flatten_vectors(&p.velocities),
            deformation_gradients: flatten_matrices::<V>(&p.deformation),
            masses: p.masses.clone(),
            volumes: p.volumes.clone(),
            grid_mass: sim.grid.mass.clone(),
            grid_velocity: flatten_vectors(&sim.grid.velocity),
        };
        Ok(RestartFile { header, state })
    }

    /// Replaces the current state with `file`, after checking its header
    /// against the current configuration.
    pub fn restore(&mut self, file: &RestartFile) -> StrataResult<()> {
        let expected = self.restart_header()?;
        file.header.ensure_matches(&expected)?;
        file.state.check_lengths(&file.header)?;

        let state = &file.state;
        if state.frame < self.base.start_frame || state.frame > self.base.end_frame {
            return Err(StrataError::Restart(format!(
                "Restart frame {} lies outside the run ({} .. {})",
                state.frame, self.base.start_frame, self.base.end_frame
            )));
        }
        let particles = ParticleSet {
            positions: unflatten_vectors(&state.positions),
            velocities: unflatten_vectors(&state.velocities),
            deformation: unflatten_matrices::<V>(&state.deformation_gradients),
            masses: state.masses.clone(),
            volumes: state.volumes.clone(),
        };
        let grid_velocity = unflatten_vectors(&state.grid_velocity);

        let sim = self
            .sim
            .as_mut()
            .ok_or_else(|| StrataError::InvalidState("Driver has no simulation state".into()))?;
        sim.particles = particles;
        sim.grid.clear();
        sim.grid.mass.copy_from_slice(&state.grid_mass);
        sim.grid.velocity.copy_from_slice(&grid_velocity);
        self.pending_impulses.clear();
        self.base.restore_clock(state.frame, state.time);
        Ok(())
    }
}

impl<V: GridVector> MpmDriver for ExplicitMpm<V> {
    fn init_configuration(&mut self, path: &Path) -> StrataResult<()> {
        tracing::info!(path = %path.display(), "Loading configuration");
        let setup = match SimulationSetup::load(path) {
            Ok(setup) => setup,
            Err(e) => {
                self.base.state = DriverState::Unconfigured;
                return Err(e);
            }
        };
        self.configure(setup)
    }

    fn compute_time_step(&self) -> StrataResult<Scalar> {
        let sim = self.simulation("compute_time_step")?;
        Ok(self.time_step_bound(sim))
    }

    fn advance_step(&mut self, dt: Scalar) -> StrataResult<()> {
        match self.base.state {
            DriverState::Unconfigured => {
                return Err(StrataError::InvalidState(
                    "advance_step called before init_configuration".into(),
                ))
            }
            DriverState::Complete => {
                return Err(StrataError::InvalidState(format!(
                    "Run already complete at frame {}",
                    self.base.frame
                )))
            }
            DriverState::Configured => {}
        }
        let sim = self.simulation("advance_step")?;
        let bound = self.time_step_bound(sim);
        if !(dt > 0.0 && dt.is_finite()) || dt > bound * (1.0 + DT_TOLERANCE) {
            return Err(StrataError::NumericalInstability {
                requested: dt,
                bound,
            });
        }
        // Steps inside the tolerance run at the bound, never past it.
        let dt = dt.min(bound);
        let params = StepParams {
            dt,
            gravity: sim.gravity,
            flip_ratio: sim.setup.flip_ratio,
            dt_bound: bound,
        };

        let impulses = std::mem::take(&mut self.pending_impulses);
        let mut step = StepInfo {
            frame: self.base.frame,
            time: self.base.time,
            dt,
            contact_impulses: impulses.len() as u32,
            wall_time: 0.0,
        };
        self.base.notify_step_begin(&step);

        let started = Instant::now();
        if let Err(e) = self.transfer(&params, &impulses) {
            self.pending_impulses = impulses;
            self.base.notify_step_abort(&step, &e);
            return Err(e);
        }
        self.base.advance_clock(dt);

        let sim = self.simulation("advance_step")?;
        let diagnostics = Diagnostics::measure(&sim.particles, &sim.grid);
        step.frame = self.base.frame;
        step.time = self.base.time;
        step.wall_time = started.elapsed().as_secs_f64();
        tracing::debug!(
            frame = step.frame,
            dt,
            total_mass = diagnostics.total_mass,
            kinetic_energy = diagnostics.kinetic_energy,
            "Step advanced"
        );
        self.base.notify_step_end(&step, &diagnostics);
        Ok(())
    }

    fn add_plugin(&mut self, plugin: Box<dyn DriverPlugin>) {
        self.base.add_plugin(plugin);
    }

    fn with_restart_support(&self) -> bool {
        true
    }

    fn write(&mut self, path: &Path) -> StrataResult<()> {
        self.base.require_configured("write")?;
        let file = self.snapshot()?;
        write_restart(path, &file)?;
        self.base.notify_write(path);
        Ok(())
    }

    fn read(&mut self, path: &Path) -> StrataResult<()> {
        self.base.require_configured("read")?;
        let file = read_restart(path)?;
        self.restore(&file)?;
        tracing::info!(path = %path.display(), frame = self.base.frame, "Restart loaded");
        self.base.notify_read(path);
        Ok(())
    }

    fn state(&self) -> DriverState {
        self.base.state()
    }

    fn frame(&self) -> u32 {
        self.base.frame()
    }

    fn time(&self) -> f64 {
        self.base.time()
    }

    fn output_directory(&self) -> Option<&Path> {
        self.base.output_directory()
    }
}

fn from_array<V: GridVector>(a: [f32; 3]) -> V {
    V::from_fn(|axis| a[axis])
}

fn flatten_vectors<V: GridVector>(values: &[V]) -> Vec<f32> {
    values
        .iter()
        .flat_map(|v| (0..V::DIM).map(move |a| v[a]))
        .collect()
}

fn unflatten_vectors<V: GridVector>(data: &[f32]) -> Vec<V> {
    data.chunks_exact(V::DIM)
        .map(|c| V::from_fn(|a| c[a]))
        .collect()
}

/// Column-major, `dim²` values per matrix.
fn flatten_matrices<V: GridVector>(values: &[V::Matrix]) -> Vec<f32> {
    values
        .iter()
        .flat_map(|m| {
            (0..V::DIM).flat_map(move |c| {
                let col = m.column(c);
                (0..V::DIM).map(move |r| col[r])
            })
        })
        .collect()
}

fn unflatten_matrices<V: GridVector>(data: &[f32]) -> Vec<V::Matrix> {
    let d = V::DIM;
    data.chunks_exact(d * d)
        .map(|m| V::Matrix::from_columns(|c| V::from_fn(|r| m[c * d + r])))
        .collect()
}
