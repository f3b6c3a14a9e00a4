//! Integration tests for strata-mpm.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use strata_contact::{CollidableRegistry, ContactPoint, MeshMeshDetector};
use strata_io::{read_restart_header, SimulationSetup};
use strata_kernel::{CubicBSpline, KernelKind, LinearSpline, QuadraticBSpline};
use strata_math::{Mat3, Vec2, Vec3};
use strata_mesh::generators::single_triangle;
use strata_mesh::TriangleMesh;
use strata_mpm::{
    impulses_from_contacts, restart_path, run, ContactImpulse, Diagnostics, DriverPlugin,
    DriverState, ExplicitMpm2, ExplicitMpm3, Grid, MpmDriver, ParticleSet, RunInfo, StepInfo,
    TelemetryPlugin,
};
use strata_telemetry::{EventBus, VecSink};
use strata_types::{ObjectId, StrataError};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("strata_mpm_{}_{}", std::process::id(), name))
}

fn configured() -> ExplicitMpm3 {
    let mut driver = ExplicitMpm3::new();
    driver.configure(SimulationSetup::default()).unwrap();
    driver
}

fn step_n(driver: &mut ExplicitMpm3, n: usize) {
    for _ in 0..n {
        let dt = driver.compute_time_step().unwrap();
        driver.advance_step(dt).unwrap();
    }
}

const DESCRIPTOR_WITHOUT_POISSON: &str = "\
*start_frame
0
*end_frame
10
*frame_rate
24
*max_dt
0.01
*write_to_file
0
*weight_function
quadratic
*grid_resolution
10
*grid_cell_width
0.1
*particle_count
100
*material
neo_hookean
*density
1000
*youngs_modulus
1e4
";

// ─── Particle Tests ───────────────────────────────────────────

#[test]
fn seed_box_places_count_particles_inside() {
    let set =
        ParticleSet::<Vec3>::seed_box(Vec3::splat(0.3), Vec3::splat(0.7), 100, 1000.0, Vec3::ZERO);
    assert_eq!(set.len(), 100);
    for p in &set.positions {
        assert!(p.cmpgt(Vec3::splat(0.3)).all() && p.cmplt(Vec3::splat(0.7)).all());
    }
    // 0.4³ m³ of material at 1000 kg/m³
    assert!((set.total_mass() - 64.0).abs() < 1e-3);
    assert!(set.deformation.iter().all(|f| *f == Mat3::IDENTITY));
}

#[test]
fn seed_box_empty() {
    let set = ParticleSet::<Vec2>::seed_box(Vec2::ZERO, Vec2::ONE, 0, 1.0, Vec2::ZERO);
    assert!(set.is_empty());
    assert_eq!(set.max_speed(), 0.0);
}

#[test]
fn momentum_and_energy() {
    let mut set = ParticleSet::<Vec2>::new();
    set.push(Vec2::ZERO, Vec2::new(2.0, 0.0), 3.0, 1.0);
    set.push(Vec2::ONE, Vec2::new(0.0, -1.0), 1.0, 1.0);
    assert_eq!(set.momentum(), [6.0, -1.0, 0.0]);
    assert!((set.kinetic_energy() - 6.5).abs() < 1e-9);
    assert_eq!(set.max_speed(), 2.0);
}

// ─── Grid Tests ───────────────────────────────────────────────

#[test]
fn grid_node_indexing() {
    let grid = Grid::<Vec3>::new([4, 5, 6], 0.5, Vec3::ZERO).unwrap();
    assert_eq!(grid.node_count(), 5 * 6 * 7);
    let coord = [3, 2, 4];
    let i = grid.node_index(coord);
    assert_eq!(grid.node_coord(i), coord);
    assert_eq!(grid.node_position(coord), Vec3::new(1.5, 1.0, 2.0));
    assert_eq!(grid.domain_max(), Vec3::new(2.0, 2.5, 3.0));
}

#[test]
fn grid_rejects_bad_shape() {
    assert!(matches!(
        Grid::<Vec2>::new([4, 0, 0], 0.1, Vec2::ZERO),
        Err(StrataError::Configuration(_))
    ));
    assert!(matches!(
        Grid::<Vec2>::new([4, 4, 0], 0.0, Vec2::ZERO),
        Err(StrataError::Configuration(_))
    ));
}

#[test]
fn stencil_covers_quadratic_support() {
    let grid = Grid::<Vec3>::new([10, 10, 10], 0.1, Vec3::ZERO).unwrap();
    let nodes: Vec<_> = grid.stencil(Vec3::splat(0.53), 0.15).collect();
    assert_eq!(nodes.len(), 27);
    for (_, x) in &nodes {
        assert!((*x - Vec3::splat(0.53)).abs().max_element() < 0.15);
    }
}

#[test]
fn stencil_clamped_at_domain_edge() {
    let grid = Grid::<Vec2>::new([10, 10, 0], 0.1, Vec2::ZERO).unwrap();
    let nodes: Vec<_> = grid.stencil(Vec2::new(0.01, 0.5), 0.15).collect();
    // x: nodes 0 and 1 only; y: three nodes
    assert_eq!(nodes.len(), 6);
    assert_eq!(grid.stencil(Vec2::new(-5.0, 0.5), 0.15).count(), 0);
}

#[test]
fn boundary_layer() {
    let grid = Grid::<Vec2>::new([10, 10, 0], 0.1, Vec2::ZERO).unwrap();
    assert!(grid.is_boundary_node([1, 5, 0]));
    assert!(grid.is_boundary_node([5, 9, 0]));
    assert!(!grid.is_boundary_node([2, 8, 0]));
}

// ─── Configuration Tests ──────────────────────────────────────

#[test]
fn configure_default_scenario() {
    let driver = configured();
    assert_eq!(driver.state(), DriverState::Configured);
    assert_eq!(driver.frame(), 0);
    assert_eq!(driver.time(), 0.0);
    assert_eq!(driver.particles().unwrap().len(), 100);
    assert_eq!(
        driver.weight_function().unwrap().kind(),
        KernelKind::QuadraticBSpline
    );
    assert!((driver.weight_function().unwrap().support_radius() - 0.15).abs() < 1e-6);
    assert_eq!(driver.output_directory(), None);
}

#[test]
fn init_from_descriptor_file() {
    let path = temp_path("full.cfg");
    let text = format!("{}*poisson_ratio\n0.3\n", DESCRIPTOR_WITHOUT_POISSON);
    std::fs::write(&path, text).unwrap();

    let mut driver = ExplicitMpm3::new();
    driver.init_configuration(&path).unwrap();
    assert_eq!(driver.state(), DriverState::Configured);
    assert_eq!(driver.base().end_frame(), 10);
    assert_eq!(driver.particles().unwrap().len(), 100);

    std::fs::remove_file(&path).ok();
}

#[test]
fn init_from_toml_file() {
    let mut setup = SimulationSetup::default();
    setup.kernel = KernelKind::CubicBSpline;
    setup.end_frame = 3;
    let path = temp_path("setup.toml");
    std::fs::write(&path, setup.to_toml_string().unwrap()).unwrap();

    let mut driver = ExplicitMpm3::new();
    driver.init_configuration(&path).unwrap();
    assert_eq!(driver.weight_function().unwrap().kind(), KernelKind::CubicBSpline);
    assert_eq!(driver.setup(), Some(&setup));

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_option_leaves_driver_unconfigured() {
    let path = temp_path("missing.cfg");
    std::fs::write(&path, DESCRIPTOR_WITHOUT_POISSON).unwrap();

    let mut driver = ExplicitMpm3::new();
    let err = driver.init_configuration(&path).unwrap_err();
    assert!(matches!(err, StrataError::Configuration(ref msg) if msg.contains("poisson_ratio")));
    assert_eq!(driver.state(), DriverState::Unconfigured);
    assert!(driver.weight_function().is_none());

    std::fs::remove_file(&path).ok();
}

#[test]
fn missing_file_is_configuration_error() {
    let mut driver = ExplicitMpm3::new();
    let err = driver
        .init_configuration(Path::new("/nonexistent/strata/setup.cfg"))
        .unwrap_err();
    assert!(matches!(err, StrataError::Configuration(_)));
    assert_eq!(driver.state(), DriverState::Unconfigured);
}

#[test]
fn invalid_setup_rejected() {
    let mut setup = SimulationSetup::default();
    setup.end_frame = 0;
    setup.start_frame = 5;
    let mut driver = ExplicitMpm3::new();
    assert!(matches!(
        driver.configure(setup),
        Err(StrataError::Configuration(_))
    ));
    assert_eq!(driver.state(), DriverState::Unconfigured);
}

#[test]
fn failed_reconfigure_returns_to_unconfigured() {
    let mut driver = configured();
    let mut bad = SimulationSetup::default();
    bad.material.poisson_ratio = 0.5;
    assert!(driver.configure(bad).is_err());
    assert_eq!(driver.state(), DriverState::Unconfigured);
    assert!(matches!(
        driver.advance_step(1e-3),
        Err(StrataError::InvalidState(_))
    ));
}

#[test]
fn unregistered_kernel_is_configuration_error() {
    let mut driver = ExplicitMpm3::new();
    *driver.base_mut().factory_mut() = strata_kernel::WeightFunctionFactory::empty();
    assert!(matches!(
        driver.configure(SimulationSetup::default()),
        Err(StrataError::Configuration(_))
    ));
    assert!(driver.weight_function().is_none());
}

#[test]
fn empty_frame_range_is_complete_immediately() {
    let mut setup = SimulationSetup::default();
    setup.end_frame = 0;
    let mut driver = ExplicitMpm3::new();
    driver.configure(setup).unwrap();
    assert_eq!(driver.state(), DriverState::Complete);
    assert_eq!(run(&mut driver).unwrap(), 0);
}

// ─── Weight Function Tests ────────────────────────────────────

#[test]
fn set_weight_function_replaces_owned_kernel() {
    let mut driver = configured();
    driver.set_weight_function::<CubicBSpline>().unwrap();
    assert_eq!(driver.weight_function().unwrap().kind(), KernelKind::CubicBSpline);
    assert!((driver.weight_function().unwrap().support_radius() - 0.2).abs() < 1e-6);

    let offset = Vec3::new(0.03, -0.07, 0.11);
    let kernel = driver.weight_function().unwrap();
    let (w0, g0) = (kernel.weight(offset), kernel.gradient(offset));
    assert!(w0 > 0.0);

    driver.set_weight_function::<CubicBSpline>().unwrap();
    let kernel = driver.weight_function().unwrap();
    assert_eq!(kernel.kind(), KernelKind::CubicBSpline);
    assert_eq!(kernel.weight(offset), w0);
    assert_eq!(kernel.gradient(offset), g0);

    driver.set_weight_function::<LinearSpline>().unwrap();
    assert_eq!(driver.weight_function().unwrap().kind(), KernelKind::Linear);
}

#[test]
fn set_weight_function_before_configuration() {
    let mut driver = ExplicitMpm3::new();
    driver.set_weight_function::<QuadraticBSpline>().unwrap();
    assert_eq!(
        driver.weight_function().unwrap().kind(),
        KernelKind::QuadraticBSpline
    );
    assert_eq!(driver.state(), DriverState::Unconfigured);
}

// ─── Stepping Tests ───────────────────────────────────────────

#[test]
fn scenario_runs_ten_steps_to_completion() {
    let mut driver = configured();
    let initial_mass = driver.particles().unwrap().total_mass();

    for step in 0..10 {
        assert_eq!(driver.state(), DriverState::Configured);
        let dt = driver.compute_time_step().unwrap();
        driver.advance_step(dt).unwrap();
        assert_eq!(driver.frame(), step + 1);
    }
    assert_eq!(driver.frame(), 10);
    assert_eq!(driver.state(), DriverState::Complete);

    let particles = driver.particles().unwrap();
    assert_eq!(particles.total_mass(), initial_mass);
    let grid_mass = driver.grid().unwrap().total_mass();
    assert!((grid_mass - initial_mass).abs() / initial_mass < 1e-3);
    assert!(driver.time() > 0.0);
}

#[test]
fn time_step_within_bounds() {
    let driver = configured();
    let dt = driver.compute_time_step().unwrap();
    assert!(dt > 0.0 && dt <= 0.01);

    let mut setup = SimulationSetup::default();
    setup.seeding.velocity = [50.0, 0.0, 0.0];
    let mut fast = ExplicitMpm3::new();
    fast.configure(setup).unwrap();
    let fast_dt = fast.compute_time_step().unwrap();
    assert!(fast_dt > 0.0 && fast_dt < dt);
}

#[test]
fn gravity_accelerates_downward() {
    let mut driver = configured();
    step_n(&mut driver, 3);
    let momentum = driver.particles().unwrap().momentum();
    assert!(momentum[1] < 0.0);
}

#[test]
fn advance_before_init_is_invalid_state() {
    let mut driver = ExplicitMpm3::new();
    assert!(matches!(
        driver.advance_step(1e-3),
        Err(StrataError::InvalidState(_))
    ));
    assert!(matches!(
        driver.compute_time_step(),
        Err(StrataError::InvalidState(_))
    ));
    assert!(matches!(run(&mut driver), Err(StrataError::InvalidState(_))));
}

#[test]
fn advance_after_complete_is_invalid_state() {
    let mut driver = configured();
    step_n(&mut driver, 10);
    assert!(matches!(
        driver.advance_step(1e-3),
        Err(StrataError::InvalidState(_))
    ));
}

#[test]
fn oversized_step_rejected_without_mutation() {
    let mut driver = configured();
    let before = driver.particles().unwrap().clone();
    let err = driver.advance_step(1.0).unwrap_err();
    match err {
        StrataError::NumericalInstability { requested, bound } => {
            assert_eq!(requested, 1.0);
            assert!(bound <= 0.01);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert_eq!(driver.frame(), 0);
    assert_eq!(driver.particles().unwrap(), &before);

    assert!(matches!(
        driver.advance_step(0.0),
        Err(StrataError::NumericalInstability { .. })
    ));
    assert!(matches!(
        driver.advance_step(f32::NAN),
        Err(StrataError::NumericalInstability { .. })
    ));
}

#[test]
fn step_within_tolerance_runs_at_bound() {
    let mut driver = configured();
    let bound = driver.compute_time_step().unwrap();
    assert!(bound <= driver.base().max_dt());

    driver.advance_step(bound * (1.0 + 5.0e-6)).unwrap();
    assert_eq!(driver.frame(), 1);
    assert_eq!(driver.time(), bound as f64);
    assert!(driver.time() <= driver.base().max_dt() as f64);
}

#[test]
fn stepping_is_deterministic() {
    let mut a = configured();
    let mut b = configured();
    step_n(&mut a, 4);
    step_n(&mut b, 4);
    assert_eq!(a.particles(), b.particles());
}

#[test]
fn two_dimensional_run() {
    let mut driver = ExplicitMpm2::new();
    driver.configure(SimulationSetup::default()).unwrap();
    let mass = driver.particles().unwrap().total_mass();
    assert_eq!(run(&mut driver).unwrap(), 10);
    assert_eq!(driver.state(), DriverState::Complete);
    assert_eq!(driver.particles().unwrap().total_mass(), mass);
    assert!(driver.particles().unwrap().momentum()[1] < 0.0);
}

#[test]
fn fluid_material_runs() {
    let mut setup = SimulationSetup::default();
    setup.material.model = strata_io::MaterialModel::Fluid;
    setup.end_frame = 5;
    let mut driver = ExplicitMpm3::new();
    driver.configure(setup).unwrap();
    assert_eq!(run(&mut driver).unwrap(), 5);
    for f in &driver.particles().unwrap().deformation {
        // shear is projected out every step
        assert_eq!(f.x_axis.y, 0.0);
    }
}

#[test]
fn diagnostics_track_scattered_mass() {
    let mut driver = configured();
    step_n(&mut driver, 1);
    let d = Diagnostics::measure(driver.particles().unwrap(), driver.grid().unwrap());
    assert!((d.grid_mass - d.total_mass).abs() / d.total_mass < 1e-3);
    assert!(d.kinetic_energy > 0.0);

    let json = serde_json::to_string(&d).unwrap();
    let back: Diagnostics = serde_json::from_str(&json).unwrap();
    assert_eq!(back, d);
}

// ─── Contact Impulse Tests ────────────────────────────────────

#[test]
fn contact_impulse_changes_momentum() {
    let mut plain = configured();
    let mut pushed = configured();
    pushed.apply_contact_impulses([ContactImpulse::new(Vec3::splat(0.5), Vec3::X)]);
    assert_eq!(pushed.pending_impulse_count(), 1);

    step_n(&mut plain, 1);
    step_n(&mut pushed, 1);
    assert_eq!(pushed.pending_impulse_count(), 0);

    let dp = pushed.particles().unwrap().momentum()[0] - plain.particles().unwrap().momentum()[0];
    assert!(dp > 0.5 && dp < 1.5, "x momentum gained {dp}");
}

#[test]
fn impulses_follow_contact_normals() {
    let contacts = [ContactPoint {
        object_lhs: ObjectId(0),
        object_rhs: ObjectId(1),
        position: Vec3::new(0.1, 0.2, 0.3),
        normal: Vec3::Z,
    }];
    let impulses = impulses_from_contacts::<Vec2>(&contacts, 2.0);
    assert_eq!(impulses.len(), 1);
    assert_eq!(impulses[0].position, Vec2::new(0.1, 0.2));
    assert_eq!(impulses[0].impulse, Vec2::ZERO);

    let impulses = impulses_from_contacts::<Vec3>(&contacts, 2.0);
    assert_eq!(impulses[0].impulse, Vec3::new(0.0, 0.0, 2.0));
}

fn crossing_registry() -> CollidableRegistry {
    let mut registry = CollidableRegistry::new();
    registry
        .add_mesh_body(single_triangle(
            Vec3::new(0.3, 0.3, 0.5),
            Vec3::new(0.7, 0.3, 0.5),
            Vec3::new(0.3, 0.7, 0.5),
        ))
        .unwrap();
    let positions = [
        0.4, 0.4, 0.3, //
        0.4, 0.4, 0.7, //
        0.6, 0.35, 0.5,
    ];
    registry
        .add_mesh_body(TriangleMesh::from_interleaved(&positions, &[0, 1, 2]).unwrap())
        .unwrap();
    registry
}

#[test]
fn collision_pairs_feed_impulses() {
    let registry = crossing_registry();
    let pairs = MeshMeshDetector::default().detect(&registry).unwrap();
    assert_eq!(pairs.len(), 1);

    let mut driver = configured();
    assert_eq!(driver.apply_collision_pairs(&pairs, &registry, 0.5).unwrap(), 1);
    assert_eq!(driver.pending_impulse_count(), 1);
    step_n(&mut driver, 1);
    assert_eq!(driver.pending_impulse_count(), 0);
}

#[test]
fn stale_collision_pairs_rejected() {
    let mut registry = crossing_registry();
    let pairs = MeshMeshDetector::default().detect(&registry).unwrap();
    registry.add_mesh_body(single_triangle(Vec3::ZERO, Vec3::X, Vec3::Y)).unwrap();

    let mut driver = configured();
    assert!(matches!(
        driver.apply_collision_pairs(&pairs, &registry, 0.5),
        Err(StrataError::CollisionData(_))
    ));
    assert_eq!(driver.pending_impulse_count(), 0);
}

// ─── Restart Tests ────────────────────────────────────────────

#[test]
fn restart_round_trip_is_bit_exact() {
    let path = temp_path("roundtrip.bin");
    let mut original = configured();
    step_n(&mut original, 3);
    original.write(&path).unwrap();

    let mut restored = configured();
    restored.read(&path).unwrap();
    assert_eq!(restored.frame(), 3);
    assert_eq!(restored.time(), original.time());
    assert_eq!(restored.state(), DriverState::Configured);
    assert_eq!(restored.particles(), original.particles());
    assert_eq!(restored.grid().unwrap().mass, original.grid().unwrap().mass);
    assert_eq!(
        restored.grid().unwrap().velocity,
        original.grid().unwrap().velocity
    );

    // Both continue identically.
    let dt = original.compute_time_step().unwrap();
    assert_eq!(restored.compute_time_step().unwrap(), dt);
    original.advance_step(dt).unwrap();
    restored.advance_step(dt).unwrap();
    assert_eq!(restored.particles(), original.particles());

    std::fs::remove_file(&path).ok();
}

#[test]
fn restart_read_into_complete_driver_resumes() {
    let path = temp_path("resume.bin");
    let mut original = configured();
    step_n(&mut original, 2);
    original.write(&path).unwrap();

    let mut other = configured();
    step_n(&mut other, 10);
    assert_eq!(other.state(), DriverState::Complete);
    other.read(&path).unwrap();
    assert_eq!(other.state(), DriverState::Configured);
    assert_eq!(other.frame(), 2);

    std::fs::remove_file(&path).ok();
}

#[test]
fn restart_particle_count_mismatch() {
    let path = temp_path("count_mismatch.bin");
    let mut original = configured();
    original.write(&path).unwrap();

    let mut setup = SimulationSetup::default();
    setup.seeding.count = 64;
    let mut other = ExplicitMpm3::new();
    other.configure(setup).unwrap();
    let before = other.particles().unwrap().clone();
    let err = other.read(&path).unwrap_err();
    assert!(matches!(err, StrataError::Restart(ref msg) if msg.contains("particle count")));
    assert_eq!(other.particles().unwrap(), &before);

    std::fs::remove_file(&path).ok();
}

#[test]
fn restart_kernel_mismatch() {
    let path = temp_path("kernel_mismatch.bin");
    configured().write(&path).unwrap();

    let mut other = configured();
    other.set_weight_function::<CubicBSpline>().unwrap();
    assert!(matches!(other.read(&path), Err(StrataError::Restart(_))));

    std::fs::remove_file(&path).ok();
}

#[test]
fn restart_dimension_mismatch() {
    let path = temp_path("dim_mismatch.bin");
    configured().write(&path).unwrap();

    let mut flat = ExplicitMpm2::new();
    flat.configure(SimulationSetup::default()).unwrap();
    assert!(matches!(flat.read(&path), Err(StrataError::Restart(_))));

    std::fs::remove_file(&path).ok();
}

#[test]
fn restart_requires_configuration() {
    let path = temp_path("unconfigured.bin");
    let mut driver = ExplicitMpm3::new();
    assert!(matches!(driver.write(&path), Err(StrataError::InvalidState(_))));
    assert!(matches!(driver.read(&path), Err(StrataError::InvalidState(_))));
    assert!(!path.exists());
}

#[test]
fn run_writes_restart_per_step() {
    let dir = temp_path("run_output");
    let mut setup = SimulationSetup::default();
    setup.end_frame = 3;
    setup.write_to_file = true;
    setup.output_dir = dir.display().to_string();

    let mut driver = ExplicitMpm3::new();
    driver.configure(setup).unwrap();
    assert_eq!(driver.output_directory(), Some(dir.as_path()));
    assert_eq!(run(&mut driver).unwrap(), 3);

    for frame in 1..=3 {
        let header = read_restart_header(restart_path(&dir, frame)).unwrap();
        assert_eq!(header.particle_count, 100);
        assert_eq!(header.kernel().unwrap(), KernelKind::QuadraticBSpline);
    }
    std::fs::remove_dir_all(&dir).ok();
}

// ─── Plugin Tests ─────────────────────────────────────────────

struct Recorder {
    name: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl DriverPlugin for Recorder {
    fn name(&self) -> &str {
        self.name
    }

    fn on_initialize(&mut self, run: &RunInfo) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:init:{}", self.name, run.particle_count));
    }

    fn on_step_begin(&mut self, step: &StepInfo) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:begin:{}", self.name, step.frame));
    }

    fn on_step_end(&mut self, step: &StepInfo, diagnostics: &Diagnostics) {
        assert!(diagnostics.total_mass > 0.0);
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:end:{}", self.name, step.frame));
    }

    fn on_step_abort(&mut self, step: &StepInfo, error: &StrataError) {
        assert!(matches!(error, StrataError::NumericalInstability { .. }));
        self.log
            .lock()
            .unwrap()
            .push(format!("{}:abort:{}", self.name, step.frame));
    }
}

#[test]
fn plugins_notified_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut driver = ExplicitMpm3::new();
    for name in ["a", "b", "a"] {
        driver.add_plugin(Box::new(Recorder {
            name,
            log: Arc::clone(&log),
        }));
    }
    assert_eq!(driver.base().plugin_count(), 3);

    driver.configure(SimulationSetup::default()).unwrap();
    step_n(&mut driver, 1);

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            "a:init:100",
            "b:init:100",
            "a:init:100",
            "a:begin:0",
            "b:begin:0",
            "a:begin:0",
            "a:end:1",
            "b:end:1",
            "a:end:1",
        ]
    );
}

#[test]
fn rejected_step_notifies_nobody() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut driver = configured();
    driver.add_plugin(Box::new(Recorder {
        name: "r",
        log: Arc::clone(&log),
    }));
    assert!(driver.advance_step(10.0).is_err());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn failed_step_pairs_begin_with_abort() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut driver = configured();
    driver.add_plugin(Box::new(Recorder {
        name: "r",
        log: Arc::clone(&log),
    }));
    let before = driver.particles().unwrap().clone();
    driver.apply_contact_impulses([ContactImpulse::new(
        Vec3::splat(0.5),
        Vec3::splat(f32::NAN),
    )]);

    let dt = driver.compute_time_step().unwrap();
    assert!(matches!(
        driver.advance_step(dt),
        Err(StrataError::NumericalInstability { .. })
    ));
    assert_eq!(*log.lock().unwrap(), vec!["r:begin:0", "r:abort:0"]);
    assert_eq!(driver.frame(), 0);
    assert_eq!(driver.particles().unwrap(), &before);
    assert_eq!(driver.pending_impulse_count(), 1);
}

#[test]
fn telemetry_plugin_reports_aborted_step() {
    let sink = VecSink::new();
    let events = sink.log();
    let mut driver = configured();
    driver.add_plugin(Box::new(TelemetryPlugin::new(
        EventBus::new().with_sink(Box::new(sink)),
    )));
    driver.apply_contact_impulses([ContactImpulse::new(
        Vec3::splat(0.5),
        Vec3::splat(f32::NAN),
    )]);
    let dt = driver.compute_time_step().unwrap();
    assert!(driver.advance_step(dt).is_err());
    assert_eq!(
        events.labels(),
        vec!["step_begin", "contact_impulses", "step_aborted"]
    );
}

#[test]
fn telemetry_plugin_publishes_events() {
    let sink = VecSink::new();
    let events = sink.log();
    let mut driver = ExplicitMpm3::new();
    driver.add_plugin(Box::new(TelemetryPlugin::new(
        EventBus::new().with_sink(Box::new(sink)),
    )));
    driver.configure(SimulationSetup::default()).unwrap();
    driver.apply_contact_impulses([ContactImpulse::new(Vec3::splat(0.5), Vec3::X)]);
    step_n(&mut driver, 1);

    let path = temp_path("telemetry.bin");
    driver.write(&path).unwrap();
    driver.read(&path).unwrap();

    assert_eq!(
        events.labels(),
        vec![
            "initialized",
            "step_begin",
            "contact_impulses",
            "step_end",
            "diagnostics",
            "restart_written",
            "restart_read",
        ]
    );
    std::fs::remove_file(&path).ok();
}

// ─── Frame Loop Tests ─────────────────────────────────────────

/// Counts steps; panics if the frame loop ever asks it to persist state.
struct NoRestartDriver {
    frame: u32,
    end: u32,
    output: PathBuf,
}

impl MpmDriver for NoRestartDriver {
    fn init_configuration(&mut self, _path: &Path) -> strata_types::StrataResult<()> {
        Ok(())
    }

    fn compute_time_step(&self) -> strata_types::StrataResult<f32> {
        Ok(0.01)
    }

    fn advance_step(&mut self, _dt: f32) -> strata_types::StrataResult<()> {
        self.frame += 1;
        Ok(())
    }

    fn add_plugin(&mut self, _plugin: Box<dyn DriverPlugin>) {}

    fn with_restart_support(&self) -> bool {
        false
    }

    fn write(&mut self, _path: &Path) -> strata_types::StrataResult<()> {
        panic!("write called on a driver without restart support");
    }

    fn read(&mut self, _path: &Path) -> strata_types::StrataResult<()> {
        panic!("read called on a driver without restart support");
    }

    fn state(&self) -> DriverState {
        if self.frame >= self.end {
            DriverState::Complete
        } else {
            DriverState::Configured
        }
    }

    fn frame(&self) -> u32 {
        self.frame
    }

    fn time(&self) -> f64 {
        self.frame as f64 * 0.01
    }

    fn output_directory(&self) -> Option<&Path> {
        Some(self.output.as_path())
    }
}

#[test]
fn run_skips_restart_without_support() {
    let output = temp_path("never_created");
    let mut driver = NoRestartDriver {
        frame: 0,
        end: 4,
        output: output.clone(),
    };
    assert_eq!(run(&mut driver).unwrap(), 4);
    assert!(!output.exists());
}
