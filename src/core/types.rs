//! Core type aliases and re-exports

pub use glam::{Vec2, Vec3, Vec4};
pub use num_complex::Complex32;

/// Standard Result type for the simulation
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;

/// Gravitational acceleration (m/s²)
pub const GRAVITY: f32 = 9.81;
