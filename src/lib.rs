//! Rktri Ocean - spectral FFT ocean surface simulation

pub mod core;
pub mod math;
pub mod params;
pub mod spectrum;
pub mod fft;
pub mod surface;
pub mod simulation;
