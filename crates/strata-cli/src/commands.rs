//! CLI command implementations.

use std::path::Path;

use strata_io::{read_restart, validate_setup, SimulationSetup};
use strata_math::{GridVector, Vec2, Vec3};
use strata_mpm::{ExplicitMpm, LogPlugin, MpmDriver, TelemetryPlugin};
use strata_telemetry::{EventBus, TracingSink};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Run a simulation to completion.
pub fn run(setup: &Path, dim: usize, restart: Option<&Path>, telemetry: bool) -> CliResult {
    match dim {
        2 => run_in::<Vec2>(setup, restart, telemetry),
        3 => run_in::<Vec3>(setup, restart, telemetry),
        other => Err(format!("Unsupported dimension {other}; use 2 or 3").into()),
    }
}

fn run_in<V: GridVector>(setup: &Path, restart: Option<&Path>, telemetry: bool) -> CliResult {
    let mut driver = ExplicitMpm::<V>::new();
    driver.add_plugin(Box::new(LogPlugin));
    if telemetry {
        let bus = EventBus::new().with_sink(Box::new(TracingSink::default()));
        driver.add_plugin(Box::new(TelemetryPlugin::new(bus)));
    }
    driver.init_configuration(setup)?;
    if let Some(path) = restart {
        driver.read(path)?;
    }

    println!("Strata Simulation");
    println!("─────────────────");
    println!("Setup:      {}", setup.display());
    println!("Dimension:  {}", V::DIM);
    if let Some(particles) = driver.particles() {
        println!("Particles:  {}", particles.len());
    }
    println!(
        "Frames:     {} → {}",
        driver.frame(),
        driver.base().end_frame()
    );
    println!();

    let steps = strata_mpm::run(&mut driver)?;

    println!("Steps:      {steps}");
    println!("Sim time:   {:.4}s", driver.time());
    if let Some(particles) = driver.particles() {
        println!("Total mass: {:.6e}", particles.total_mass());
        println!("Final KE:   {:.6e}", particles.kinetic_energy());
    }
    if let Some(dir) = driver.output_directory() {
        println!("Restarts:   {}", dir.display());
    }
    Ok(())
}

/// Inspect a restart file.
pub fn inspect(path: &Path) -> CliResult {
    println!("Strata Restart Inspector");
    println!("────────────────────────");
    println!();

    let file = read_restart(path)?;
    let header = &file.header;
    let state = &file.state;
    let dim = header.dimension as usize;

    println!("Version:      {}", header.version);
    println!("Dimension:    {}", header.dimension);
    println!("Kernel:       {}", header.kernel()?);
    println!("Particles:    {}", header.particle_count);
    println!(
        "Grid:         {:?} cells, h = {}",
        header.grid_resolution.iter().take(dim).collect::<Vec<_>>(),
        header.cell_width
    );
    println!("Frame:        {}", state.frame);
    println!("Sim time:     {:.4}s", state.time);

    let mass: f64 = state.masses.iter().map(|&m| m as f64).sum();
    println!("Total mass:   {:.6e}", mass);

    // Height range along the second axis.
    if dim >= 2 && !state.positions.is_empty() {
        let heights = state.positions.iter().skip(1).step_by(dim).copied();
        let (lo, hi) = heights.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| {
            (lo.min(y), hi.max(y))
        });
        println!("Y range:      [{:.4}, {:.4}]", lo, hi);
    }

    Ok(())
}

/// Validate a setup file.
pub fn validate(setup: &Path, dim: usize) -> CliResult {
    println!("Strata Validator");
    println!("────────────────");
    println!();
    println!("Validating setup: {}", setup.display());

    let parsed = SimulationSetup::load(setup)?;
    match validate_setup(&parsed, dim) {
        Ok(()) => println!(
            "✅ Setup is valid ({} particles, {} kernel, frames {}..{}).",
            parsed.seeding.count, parsed.kernel, parsed.start_frame, parsed.end_frame
        ),
        Err(e) => {
            println!("❌ Setup validation failed: {e}");
            return Err(e.into());
        }
    }
    Ok(())
}
