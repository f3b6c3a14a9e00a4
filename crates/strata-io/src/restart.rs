//! Restart files.
//!
//! A restart file is a [`RestartHeader`] followed by a [`RestartState`],
//! both `bincode`-encoded. The header is self-describing: it names the
//! format version, dimensionality, kernel, particle count and grid shape, so
//! a reader can reject a file before decoding any state.
//!
//! Particle and grid arrays are flat, `dim` components per entry (`dim²`
//! for deformation gradients, column-major). `f32` values are stored as
//! their exact bit patterns, so a write/read round trip is bit-exact.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use strata_kernel::KernelKind;
use strata_types::{StrataError, StrataResult};

/// File signature.
pub const RESTART_MAGIC: [u8; 8] = *b"STRATARS";

/// Current format version.
pub const RESTART_VERSION: u32 = 1;

/// Self-describing restart header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartHeader {
    pub magic: [u8; 8],
    pub version: u32,
    pub dimension: u32,
    /// [`KernelKind::code`] of the kernel the state was produced with.
    pub kernel_code: u8,
    pub particle_count: u32,
    pub grid_resolution: [u32; 3],
    pub cell_width: f32,
}

/// Full particle and grid state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestartState {
    pub frame: u32,
    /// Simulation time (seconds).
    pub time: f64,
    pub positions: Vec<f32>,
    pub velocities: Vec<f32>,
    pub deformation_gradients: Vec<f32>,
    pub masses: Vec<f32>,
    /// Reference (initial) particle volumes.
    pub volumes: Vec<f32>,
    pub grid_mass: Vec<f32>,
    pub grid_velocity: Vec<f32>,
}

/// A complete restart file.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartFile {
    pub header: RestartHeader,
    pub state: RestartState,
}

impl RestartHeader {
    pub fn new(
        dimension: u32,
        kernel: KernelKind,
        particle_count: u32,
        grid_resolution: [u32; 3],
        cell_width: f32,
    ) -> Self {
        Self {
            magic: RESTART_MAGIC,
            version: RESTART_VERSION,
            dimension,
            kernel_code: kernel.code(),
            particle_count,
            grid_resolution,
            cell_width,
        }
    }

    /// Kernel named by the header.
    pub fn kernel(&self) -> StrataResult<KernelKind> {
        KernelKind::from_code(self.kernel_code).ok_or_else(|| {
            StrataError::Restart(format!("Unknown kernel code {}", self.kernel_code))
        })
    }

    /// Checks signature and version.
    pub fn check_format(&self) -> StrataResult<()> {
        if self.magic != RESTART_MAGIC {
            return Err(StrataError::Restart("Not a restart file (bad signature)".into()));
        }
        if self.version != RESTART_VERSION {
            return Err(StrataError::Restart(format!(
                "Unsupported restart version {} (expected {})",
                self.version, RESTART_VERSION
            )));
        }
        Ok(())
    }

    /// Fails with [`StrataError::Restart`] naming every field in which this
    /// header differs from `expected`.
    pub fn ensure_matches(&self, expected: &RestartHeader) -> StrataResult<()> {
        let mut mismatches = Vec::new();
        if self.dimension != expected.dimension {
            mismatches.push(format!(
                "dimension {} (expected {})",
                self.dimension, expected.dimension
            ));
        }
        if self.kernel_code != expected.kernel_code {
            mismatches.push(format!(
                "kernel {} (expected {})",
                describe_kernel(self.kernel_code),
                describe_kernel(expected.kernel_code)
            ));
        }
        if self.particle_count != expected.particle_count {
            mismatches.push(format!(
                "particle count {} (expected {})",
                self.particle_count, expected.particle_count
            ));
        }
        if self.grid_resolution != expected.grid_resolution {
            mismatches.push(format!(
                "grid resolution {:?} (expected {:?})",
                self.grid_resolution, expected.grid_resolution
            ));
        }
        if self.cell_width.to_bits() != expected.cell_width.to_bits() {
            mismatches.push(format!(
                "cell width {} (expected {})",
                self.cell_width, expected.cell_width
            ));
        }
        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(StrataError::Restart(format!(
                "Restart schema mismatch: {}",
                mismatches.join(", ")
            )))
        }
    }

    /// Number of grid nodes described by the header.
    pub fn node_count(&self) -> usize {
        self.grid_resolution
            .iter()
            .take(self.dimension as usize)
            .map(|&n| n as usize + 1)
            .product()
    }
}

fn describe_kernel(code: u8) -> String {
    KernelKind::from_code(code)
        .map(|k| k.name().to_string())
        .unwrap_or_else(|| format!("#{}", code))
}

impl RestartState {
    /// Checks every array length against `header`.
    pub fn check_lengths(&self, header: &RestartHeader) -> StrataResult<()> {
        let n = header.particle_count as usize;
        let d = header.dimension as usize;
        let nodes = header.node_count();
        let expected = [
            ("positions", self.positions.len(), n * d),
            ("velocities", self.velocities.len(), n * d),
            ("deformation_gradients", self.deformation_gradients.len(), n * d * d),
            ("masses", self.masses.len(), n),
            ("volumes", self.volumes.len(), n),
            ("grid_mass", self.grid_mass.len(), nodes),
            ("grid_velocity", self.grid_velocity.len(), nodes * d),
        ];
        for (name, found, wanted) in expected {
            if found != wanted {
                return Err(StrataError::Restart(format!(
                    "Array '{}' holds {} values, header implies {}",
                    name, found, wanted
                )));
            }
        }
        Ok(())
    }
}

impl RestartFile {
    /// Encodes header then state.
    pub fn write_to(&self, writer: impl Write) -> StrataResult<()> {
        let mut writer = writer;
        bincode::serialize_into(&mut writer, &self.header)
            .and_then(|_| bincode::serialize_into(&mut writer, &self.state))
            .map_err(|e| StrataError::Serialization(format!("Restart encoding failed: {}", e)))
    }

    /// Decodes and validates a restart file.
    pub fn read_from(reader: impl Read) -> StrataResult<Self> {
        let mut reader = reader;
        let header = read_header_from(&mut reader)?;
        let state: RestartState = bincode::deserialize_from(&mut reader)
            .map_err(|e| StrataError::Restart(format!("Malformed restart state: {}", e)))?;
        state.check_lengths(&header)?;
        Ok(Self { header, state })
    }

    pub fn to_bytes(&self) -> StrataResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(data: &[u8]) -> StrataResult<Self> {
        Self::read_from(data)
    }
}

fn read_header_from(reader: &mut impl Read) -> StrataResult<RestartHeader> {
    let header: RestartHeader = bincode::deserialize_from(reader)
        .map_err(|e| StrataError::Restart(format!("Malformed restart header: {}", e)))?;
    header.check_format()?;
    Ok(header)
}

/// Writes `file` to `path`, replacing any existing file.
pub fn write_restart(path: impl AsRef<Path>, file: &RestartFile) -> StrataResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    file.write_to(&mut writer)?;
    writer.flush()?;
    tracing::debug!(
        path = %path.display(),
        particles = file.header.particle_count,
        frame = file.state.frame,
        "Restart file written"
    );
    Ok(())
}

/// Reads and validates the restart file at `path`.
pub fn read_restart(path: impl AsRef<Path>) -> StrataResult<RestartFile> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    RestartFile::read_from(reader)
}

/// Reads only the header of the restart file at `path`.
pub fn read_restart_header(path: impl AsRef<Path>) -> StrataResult<RestartHeader> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    read_header_from(&mut reader)
}
