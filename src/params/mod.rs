//! Simulation parameters and configuration

pub mod config;
pub mod simulation;

pub use config::{CascadeConfig, OceanConfig};
pub use simulation::{resolve, ResolvedParameters, SimulationParameters, MAX_REPEAT_TIME_SECONDS};
