//! Per-frame ocean pipeline
//!
//! Each frame runs, per cascade:
//! 1. Time evolution of the initial spectrum into packed displacement/slope spectra
//! 2. Inverse 2D FFT of both packed grids
//! 3. Surface assembly into the back frame, reading foam from the front frame
//! 4. Front/back swap

pub mod cascade;
pub mod system;

pub use cascade::OceanCascade;
pub use system::OceanSystem;
