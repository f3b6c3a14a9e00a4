//! Physical constants and simulation defaults.

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Default frame rate (frames per second).
pub const DEFAULT_FRAME_RATE: f32 = 24.0;

/// Default upper bound on a single time step (seconds).
pub const DEFAULT_MAX_DT: f32 = 1.0e-2;

/// Default CFL number used by the adaptive time step.
pub const DEFAULT_CFL: f32 = 0.5;

/// Default PIC/FLIP blend (0 = pure PIC, 1 = pure FLIP).
pub const DEFAULT_FLIP_RATIO: f32 = 0.95;

/// Lower bound on any computed time step (seconds).
pub const MIN_DT: f32 = 1.0e-7;

/// Grid nodes with less mass than this are treated as empty.
pub const MASS_EPSILON: f32 = 1.0e-10;

/// Epsilon for floating-point comparisons.
pub const EPSILON: f32 = 1.0e-7;

/// Epsilon for degenerate triangle detection (area threshold).
pub const DEGENERATE_AREA_THRESHOLD: f32 = 1.0e-10;
