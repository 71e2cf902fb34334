//! Spatial output fields consumed by the renderer.

use std::ops::{Add, Mul};

use glam::{Vec2, Vec3, Vec4};

use crate::core::Result;
use crate::math::{validate_patch_length, Grid};

/// Bilinear sample of a tiling grid at world-space `position`.
///
/// Texel `(x, y)` sits at world position `(x, y) * L / N`.
fn sample_bilinear<T>(grid: &Grid<T>, patch_length: f32, position: Vec2) -> T
where
    T: Copy + Send + Sync + Add<Output = T> + Mul<f32, Output = T>,
{
    let texel = position * (grid.size() as f32 / patch_length);
    let base = texel.floor();
    let frac = texel - base;
    let x0 = base.x as i64;
    let y0 = base.y as i64;

    let top = grid.get_wrapped(x0, y0) * (1.0 - frac.x) + grid.get_wrapped(x0 + 1, y0) * frac.x;
    let bottom = grid.get_wrapped(x0, y0 + 1) * (1.0 - frac.x) + grid.get_wrapped(x0 + 1, y0 + 1) * frac.x;
    top * (1.0 - frac.y) + bottom * frac.y
}

/// Per-texel `(dx, dy, dz, foam)` in object-space units.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementField {
    grid: Grid<Vec4>,
    patch_length: f32,
}

impl DisplacementField {
    /// Flat, foam-free field.
    pub fn new(size: usize, patch_length: f32) -> Result<Self> {
        validate_patch_length(patch_length)?;
        Ok(Self {
            grid: Grid::new(size, Vec4::ZERO)?,
            patch_length,
        })
    }

    pub fn from_grid(grid: Grid<Vec4>, patch_length: f32) -> Result<Self> {
        validate_patch_length(patch_length)?;
        Ok(Self { grid, patch_length })
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn patch_length(&self) -> f32 {
        self.patch_length
    }

    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Vec4 {
        self.grid.get(x, y)
    }

    /// Foam carried into the next frame.
    #[inline]
    pub fn foam(&self, x: usize, y: usize) -> f32 {
        self.grid.get(x, y).w
    }

    pub fn grid(&self) -> &Grid<Vec4> {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid<Vec4> {
        &mut self.grid
    }

    /// Displacement and foam at a world-space position (tiles every `L`).
    pub fn sample(&self, position: Vec2) -> Vec4 {
        sample_bilinear(&self.grid, self.patch_length, position)
    }

    /// Raw texel bytes (four `f32` per texel) for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.grid.cells())
    }

    /// Minimum and maximum vertical displacement.
    pub fn height_range(&self) -> (f32, f32) {
        self.grid
            .cells()
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), t| (lo.min(t.y), hi.max(t.y)))
    }

    /// Mean foam coverage over the patch.
    pub fn mean_foam(&self) -> f32 {
        let cells = self.grid.cells();
        cells.iter().map(|t| t.w).sum::<f32>() / cells.len() as f32
    }
}

/// Per-texel `(slopeX, slopeZ)`.
#[derive(Clone, Debug, PartialEq)]
pub struct SlopeField {
    grid: Grid<Vec2>,
    patch_length: f32,
}

impl SlopeField {
    pub fn new(size: usize, patch_length: f32) -> Result<Self> {
        validate_patch_length(patch_length)?;
        Ok(Self {
            grid: Grid::new(size, Vec2::ZERO)?,
            patch_length,
        })
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    pub fn patch_length(&self) -> f32 {
        self.patch_length
    }

    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> Vec2 {
        self.grid.get(x, y)
    }

    pub fn grid(&self) -> &Grid<Vec2> {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid<Vec2> {
        &mut self.grid
    }

    pub fn sample(&self, position: Vec2) -> Vec2 {
        sample_bilinear(&self.grid, self.patch_length, position)
    }

    /// Surface normal `normalize(-slopeX, 1, -slopeZ)` at a world-space position.
    pub fn normal(&self, position: Vec2) -> Vec3 {
        slope_to_normal(self.sample(position))
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.grid.cells())
    }
}

#[inline]
pub fn slope_to_normal(slope: Vec2) -> Vec3 {
    Vec3::new(-slope.x, 1.0, -slope.y).normalize()
}

/// One complete frame of output.
#[derive(Clone, Debug, PartialEq)]
pub struct SurfaceFrame {
    pub displacement: DisplacementField,
    pub slope: SlopeField,
    /// Simulation time the frame was evolved to
    pub time: f64,
    /// Sequence number; 0 is the flat frame shown before the first step
    pub frame_index: u64,
}

impl SurfaceFrame {
    /// Flat frame at time zero.
    pub fn flat(size: usize, patch_length: f32) -> Result<Self> {
        Ok(Self {
            displacement: DisplacementField::new(size, patch_length)?,
            slope: SlopeField::new(size, patch_length)?,
            time: 0.0,
            frame_index: 0,
        })
    }
}
