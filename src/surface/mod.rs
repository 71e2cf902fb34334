//! Spatial ocean surface: output fields and their assembly from transformed spectra.

pub mod assembler;
pub mod field;

pub use assembler::{AssembledTexel, AssemblyParams, FoamParams, SurfaceAssembler};
pub use field::{slope_to_normal, DisplacementField, SlopeField, SurfaceFrame};
