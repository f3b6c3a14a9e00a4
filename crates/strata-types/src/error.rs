//! Error types for the Strata core.
//!
//! All crates return `StrataResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for the Strata core.
#[derive(Debug, Error)]
pub enum StrataError {
    /// Setup is malformed or incomplete (unknown kernel, missing option, bad value).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A requested time step exceeds the current stability bound.
    #[error("Numerical instability: dt {requested:.3e} exceeds stability bound {bound:.3e}")]
    NumericalInstability {
        requested: f32,
        bound: f32,
    },

    /// Restart data is corrupt or does not match the current configuration.
    #[error("Restart error: {0}")]
    Restart(String),

    /// A collision pair references an object or face outside the valid range,
    /// or was consumed after the geometry it names changed.
    #[error("Collision data error: {0}")]
    CollisionData(String),

    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Operation is not valid in the driver's current state.
    #[error("Invalid driver state: {0}")]
    InvalidState(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, StrataError>`.
pub type StrataResult<T> = Result<T, StrataError>;
