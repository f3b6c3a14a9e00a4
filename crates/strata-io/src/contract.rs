//! Simulation setup contract.
//!
//! [`SimulationSetup`] is everything a driver needs to configure a run. It
//! can be loaded from TOML or from a line-oriented descriptor (a fixed set
//! of required options, see [`SimulationSetup::DESCRIPTOR_OPTIONS`]).
//!
//! TOML setups must name the `kernel`; every other field has a default.
//! Unknown keys are rejected so a misspelled option never falls back to a
//! default silently.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_kernel::KernelKind;
use strata_types::{StrataError, StrataResult};

use crate::descriptor::{ConfigDescriptor, OptionType};

/// Complete description of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationSetup {
    /// Interpolation kernel. Required.
    pub kernel: KernelKind,
    #[serde(default)]
    pub start_frame: u32,
    #[serde(default = "defaults::end_frame")]
    pub end_frame: u32,
    /// Frames per second; bounds a single step to `1 / frame_rate`.
    #[serde(default = "defaults::frame_rate")]
    pub frame_rate: f32,
    /// Upper bound on a single time step (seconds).
    #[serde(default = "defaults::max_dt")]
    pub max_dt: f32,
    /// CFL number for the adaptive time step.
    #[serde(default = "defaults::cfl")]
    pub cfl: f32,
    /// PIC/FLIP blend (0 = pure PIC, 1 = pure FLIP).
    #[serde(default = "defaults::flip_ratio")]
    pub flip_ratio: f32,
    /// Gravitational acceleration (m/s²).
    #[serde(default = "defaults::gravity")]
    pub gravity: [f32; 3],
    /// Write a restart file after every step when set.
    #[serde(default)]
    pub write_to_file: bool,
    /// Directory restart files are written to.
    #[serde(default = "defaults::output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub grid: GridSetup,
    #[serde(default)]
    pub material: MaterialSetup,
    #[serde(default)]
    pub seeding: SeedingSetup,
}

mod defaults {
    use strata_types::constants::{
        DEFAULT_CFL, DEFAULT_FLIP_RATIO, DEFAULT_FRAME_RATE, DEFAULT_MAX_DT, GRAVITY,
    };

    pub fn end_frame() -> u32 {
        10
    }

    pub fn frame_rate() -> f32 {
        DEFAULT_FRAME_RATE
    }

    pub fn max_dt() -> f32 {
        DEFAULT_MAX_DT
    }

    pub fn cfl() -> f32 {
        DEFAULT_CFL
    }

    pub fn flip_ratio() -> f32 {
        DEFAULT_FLIP_RATIO
    }

    pub fn gravity() -> [f32; 3] {
        [0.0, -GRAVITY, 0.0]
    }

    pub fn output_dir() -> String {
        "output".to_string()
    }
}

/// Background grid. Two-dimensional runs ignore the third component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridSetup {
    /// Cells per axis.
    pub resolution: [u32; 3],
    /// Cell width (meters).
    pub cell_width: f32,
    /// World position of node (0, 0, 0).
    pub origin: [f32; 3],
}

/// Constitutive model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialModel {
    /// Compressible neo-Hookean solid.
    NeoHookean,
    /// Weakly compressible fluid, pressure from volume change only.
    Fluid,
}

impl MaterialModel {
    pub fn name(&self) -> &'static str {
        match self {
            MaterialModel::NeoHookean => "neo_hookean",
            MaterialModel::Fluid => "fluid",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "neo_hookean" | "neohookean" => Some(MaterialModel::NeoHookean),
            "fluid" => Some(MaterialModel::Fluid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialSetup {
    pub model: MaterialModel,
    /// Rest density (kg/m³).
    pub density: f32,
    /// Young's modulus (Pa).
    pub youngs_modulus: f32,
    /// Poisson's ratio, in `[0, 0.5)`.
    pub poisson_ratio: f32,
}

/// Particles seeded uniformly in an axis-aligned box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedingSetup {
    pub min: [f32; 3],
    pub max: [f32; 3],
    /// Total particle count.
    pub count: u32,
    /// Initial velocity of every particle (m/s).
    pub velocity: [f32; 3],
}

impl Default for SimulationSetup {
    fn default() -> Self {
        Self {
            kernel: KernelKind::QuadraticBSpline,
            start_frame: 0,
            end_frame: defaults::end_frame(),
            frame_rate: defaults::frame_rate(),
            max_dt: defaults::max_dt(),
            cfl: defaults::cfl(),
            flip_ratio: defaults::flip_ratio(),
            gravity: defaults::gravity(),
            write_to_file: false,
            output_dir: defaults::output_dir(),
            grid: GridSetup::default(),
            material: MaterialSetup::default(),
            seeding: SeedingSetup::default(),
        }
    }
}

impl Default for GridSetup {
    fn default() -> Self {
        Self {
            resolution: [10, 10, 10],
            cell_width: 0.1,
            origin: [0.0; 3],
        }
    }
}

impl Default for MaterialSetup {
    fn default() -> Self {
        Self {
            model: MaterialModel::NeoHookean,
            density: 1000.0,
            youngs_modulus: 1.0e4,
            poisson_ratio: 0.3,
        }
    }
}

impl Default for SeedingSetup {
    fn default() -> Self {
        Self {
            min: [0.3, 0.3, 0.3],
            max: [0.7, 0.7, 0.7],
            count: 100,
            velocity: [0.0; 3],
        }
    }
}

impl GridSetup {
    /// World-space extent of the grid along each axis.
    pub fn extent(&self) -> [f32; 3] {
        self.resolution.map(|n| n as f32 * self.cell_width)
    }
}

impl SimulationSetup {
    /// Options a descriptor must supply, with their types.
    ///
    /// Descriptor grids are cubic with `grid_resolution` cells per axis at
    /// the origin; particles are seeded in the middle half of the domain.
    pub const DESCRIPTOR_OPTIONS: &'static [(&'static str, OptionType)] = &[
        ("start_frame", OptionType::Int),
        ("end_frame", OptionType::Int),
        ("frame_rate", OptionType::Float),
        ("max_dt", OptionType::Float),
        ("write_to_file", OptionType::Bool),
        ("weight_function", OptionType::String),
        ("grid_resolution", OptionType::Int),
        ("grid_cell_width", OptionType::Float),
        ("particle_count", OptionType::Int),
        ("material", OptionType::String),
        ("density", OptionType::Float),
        ("youngs_modulus", OptionType::Float),
        ("poisson_ratio", OptionType::Float),
    ];

    /// Loads a setup, choosing the format by extension: `.toml` is read as
    /// TOML, anything else as a descriptor.
    pub fn load(path: impl AsRef<Path>) -> StrataResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            _ => Self::from_descriptor_file(path),
        }
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> StrataResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            StrataError::Configuration(format!("Couldn't open {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> StrataResult<Self> {
        toml::from_str(text)
            .map_err(|e| StrataError::Configuration(format!("Malformed TOML setup: {}", e)))
    }

    pub fn to_toml_string(&self) -> StrataResult<String> {
        toml::to_string_pretty(self).map_err(|e| StrataError::Serialization(e.to_string()))
    }

    /// A descriptor with [`Self::DESCRIPTOR_OPTIONS`] registered.
    pub fn descriptor() -> StrataResult<ConfigDescriptor> {
        let mut descriptor = ConfigDescriptor::new();
        for &(name, ty) in Self::DESCRIPTOR_OPTIONS {
            descriptor.add_option(name, ty)?;
        }
        Ok(descriptor)
    }

    pub fn from_descriptor_file(path: impl AsRef<Path>) -> StrataResult<Self> {
        let mut descriptor = Self::descriptor()?;
        descriptor.parse_file(path)?;
        Self::from_descriptor(&descriptor)
    }

    pub fn from_descriptor_str(text: &str) -> StrataResult<Self> {
        let mut descriptor = Self::descriptor()?;
        descriptor.parse_str(text)?;
        Self::from_descriptor(&descriptor)
    }

    /// Builds a setup from a parsed descriptor. Fields the descriptor does
    /// not cover keep their defaults.
    pub fn from_descriptor(d: &ConfigDescriptor) -> StrataResult<Self> {
        let kernel_name = d.get_string("weight_function")?;
        let kernel = KernelKind::from_name(kernel_name).ok_or_else(|| {
            StrataError::Configuration(format!("Unknown weight function '{}'", kernel_name))
        })?;
        let model_name = d.get_string("material")?;
        let model = MaterialModel::from_name(model_name).ok_or_else(|| {
            StrataError::Configuration(format!("Unknown material model '{}'", model_name))
        })?;

        let n = non_negative_u32(d, "grid_resolution")?;
        let cell_width = d.get_float("grid_cell_width")?;
        let extent = n as f32 * cell_width;

        Ok(Self {
            kernel,
            start_frame: non_negative_u32(d, "start_frame")?,
            end_frame: non_negative_u32(d, "end_frame")?,
            frame_rate: d.get_float("frame_rate")?,
            max_dt: d.get_float("max_dt")?,
            write_to_file: d.get_bool("write_to_file")?,
            grid: GridSetup {
                resolution: [n; 3],
                cell_width,
                origin: [0.0; 3],
            },
            material: MaterialSetup {
                model,
                density: d.get_float("density")?,
                youngs_modulus: d.get_float("youngs_modulus")?,
                poisson_ratio: d.get_float("poisson_ratio")?,
            },
            seeding: SeedingSetup {
                min: [0.25 * extent; 3],
                max: [0.75 * extent; 3],
                count: non_negative_u32(d, "particle_count")?,
                velocity: [0.0; 3],
            },
            ..Self::default()
        })
    }
}

fn non_negative_u32(d: &ConfigDescriptor, name: &str) -> StrataResult<u32> {
    let v = d.get_int(name)?;
    u32::try_from(v).map_err(|_| {
        StrataError::Configuration(format!("Option '{}' out of range: {}", name, v))
    })
}
