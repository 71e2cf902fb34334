//! Grid storage and wave-vector helpers

pub mod grid;

pub use grid::{
    checkerboard_sign, is_nyquist_edge, mirror, validate_patch_length, validate_size, wavenumber_step, Grid,
    WaveVector, K_MAG_EPSILON,
};
