//! # strata-io
//!
//! The I/O boundary of the Strata simulation core.
//!
//! - [`descriptor`]: line-oriented `*option` / value configuration files
//!   with typed option registration
//! - [`contract`]: [`SimulationSetup`], the validated description of a run,
//!   loadable from a descriptor or from TOML
//! - [`validator`]: physical and structural checks on a setup
//! - [`restart`]: versioned, self-describing binary restart files

pub mod contract;
pub mod descriptor;
pub mod restart;
pub mod validator;

pub use contract::{GridSetup, MaterialModel, MaterialSetup, SeedingSetup, SimulationSetup};
pub use descriptor::{ConfigDescriptor, OptionType, OptionValue};
pub use restart::{
    read_restart, read_restart_header, write_restart, RestartFile, RestartHeader,
    RestartState,
};
pub use validator::validate_setup;
