//! Square power-of-two grids addressed by texel coordinate.
//!
//! Every simulation buffer (initial spectrum, evolved spectra, output fields)
//! is a [`Grid`] of side `N`, stored row-major with `index = y * N + x`.

use glam::Vec2;
use rayon::prelude::*;

use crate::core::{Error, Result};

/// Below this wavenumber magnitude the reciprocal is substituted with 1.0
pub const K_MAG_EPSILON: f32 = 1e-4;

/// Check that `size` is a power of two of at least 2.
pub fn validate_size(size: usize) -> Result<()> {
    if size >= 2 && size.is_power_of_two() {
        Ok(())
    } else {
        Err(Error::GridSizeMismatch {
            expected: size.max(2).next_power_of_two(),
            actual: size,
        })
    }
}

/// Check that `patch_length` is a positive finite length.
pub fn validate_patch_length(patch_length: f32) -> Result<()> {
    if patch_length.is_finite() && patch_length > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid("patch_length", patch_length, "must be a positive finite length"))
    }
}

/// True for cells on the `-N/2` row or column, which alias onto themselves
/// under negation of that axis.
#[inline]
pub fn is_nyquist_edge(x: usize, y: usize) -> bool {
    x == 0 || y == 0
}

/// Coordinate of the cell holding `-k` for the cell at `(x, y)`.
#[inline]
pub fn mirror(x: usize, y: usize, size: usize) -> (usize, usize) {
    ((size - x) % size, (size - y) % size)
}

/// `(-1)^(x+y)`: undoes the half-grid frequency shift after the inverse transform.
#[inline]
pub fn checkerboard_sign(x: usize, y: usize) -> f32 {
    if (x + y) % 2 == 0 { 1.0 } else { -1.0 }
}

/// Square grid of cells of side `size`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    size: usize,
    cells: Vec<T>,
}

impl<T: Copy + Send + Sync> Grid<T> {
    /// Create a grid filled with `fill`.
    pub fn new(size: usize, fill: T) -> Result<Self> {
        validate_size(size)?;
        Ok(Self {
            size,
            cells: vec![fill; size * size],
        })
    }

    /// Create a grid by evaluating `f(x, y)` for every cell in parallel.
    pub fn from_fn<F>(size: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        validate_size(size)?;
        let cells = (0..size * size)
            .into_par_iter()
            .map(|i| f(i % size, i / size))
            .collect();
        Ok(Self { size, cells })
    }

    /// Wrap an existing row-major buffer.
    pub fn from_cells(size: usize, cells: Vec<T>) -> Result<Self> {
        validate_size(size)?;
        if cells.len() != size * size {
            return Err(Error::GridSizeMismatch {
                expected: size * size,
                actual: cells.len(),
            });
        }
        Ok(Self { size, cells })
    }

    /// Overwrite every cell with `f(x, y)`, rows in parallel.
    ///
    /// Returns once every row is written, so consecutive calls are ordered.
    pub fn par_fill_with<F>(&mut self, f: F)
    where
        F: Fn(usize, usize) -> T + Sync + Send,
    {
        let size = self.size;
        self.cells
            .par_chunks_mut(size)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    *cell = f(x, y);
                }
            });
    }

    /// Side length in cells
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.size && y < self.size);
        y * self.size + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.cells[self.index(x, y)]
    }

    /// Read with toroidal wrapping on both axes.
    #[inline]
    pub fn get_wrapped(&self, x: i64, y: i64) -> T {
        let n = self.size as i64;
        self.get(x.rem_euclid(n) as usize, y.rem_euclid(n) as usize)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let i = self.index(x, y);
        self.cells[i] = value;
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Fail with `GridSizeMismatch` unless this grid has side `expected`.
    pub fn ensure_size(&self, expected: usize) -> Result<()> {
        if self.size == expected {
            Ok(())
        } else {
            Err(Error::GridSizeMismatch {
                expected,
                actual: self.size,
            })
        }
    }
}

/// Wave vector of a spectrum cell.
///
/// Cell `(x, y)` maps to `k = (x - N/2, y - N/2) * 2π/L`, so the zero
/// frequency sits at the grid centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveVector {
    pub k: Vec2,
    pub magnitude: f32,
}

impl WaveVector {
    pub fn at(x: usize, y: usize, size: usize, patch_length: f32) -> Self {
        let half = (size / 2) as f32;
        let k = Vec2::new(x as f32 - half, y as f32 - half) * wavenumber_step(patch_length);
        Self {
            k,
            magnitude: k.length(),
        }
    }

    /// `1 / |k|`, or 1.0 at the zero-frequency cell.
    #[inline]
    pub fn reciprocal_magnitude(&self) -> f32 {
        if self.magnitude < K_MAG_EPSILON {
            1.0
        } else {
            1.0 / self.magnitude
        }
    }

    /// Direction of travel in radians from the +x axis
    #[inline]
    pub fn angle(&self) -> f32 {
        self.k.y.atan2(self.k.x)
    }
}

/// Spacing between neighbouring wavenumbers, `Δk = 2π/L`.
#[inline]
pub fn wavenumber_step(patch_length: f32) -> f32 {
    std::f32::consts::TAU / patch_length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_size() {
        assert!(validate_size(2).is_ok());
        assert!(validate_size(512).is_ok());
        assert!(matches!(
            validate_size(12),
            Err(Error::GridSizeMismatch { expected: 16, actual: 12 })
        ));
        assert!(validate_size(1).is_err());
        assert!(validate_size(0).is_err());
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(4, |x, y| (x, y)).unwrap();
        assert_eq!(grid.get(3, 1), (3, 1));
        assert_eq!(grid.cells()[1 * 4 + 3], (3, 1));
    }

    #[test]
    fn test_from_cells_rejects_wrong_length() {
        assert!(Grid::from_cells(4, vec![0u8; 15]).is_err());
        assert!(Grid::from_cells(4, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_mirror_pairs_opposite_wave_vectors() {
        let n = 8;
        for y in 0..n {
            for x in 0..n {
                let (mx, my) = mirror(x, y, n);
                let k = WaveVector::at(x, y, n, 10.0).k;
                let mk = WaveVector::at(mx, my, n, 10.0).k;
                // Row/column 0 holds -N/2, which aliases onto itself
                if x != 0 {
                    assert!((k.x + mk.x).abs() < 1e-5);
                }
                if y != 0 {
                    assert!((k.y + mk.y).abs() < 1e-5);
                }
            }
        }
    }

    #[test]
    fn test_nyquist_edge_cells_are_self_mirrored_on_one_axis() {
        let n = 8;
        for y in 0..n {
            for x in 0..n {
                let (mx, my) = mirror(x, y, n);
                let k = WaveVector::at(x, y, n, 10.0).k;
                let mk = WaveVector::at(mx, my, n, 10.0).k;
                // The mirror does not negate a nonzero component on the edge
                let unpaired = (k.x != 0.0 && mk.x == k.x) || (k.y != 0.0 && mk.y == k.y);
                assert_eq!(is_nyquist_edge(x, y), unpaired, "cell ({x},{y})");
            }
        }
    }

    #[test]
    fn test_validate_patch_length() {
        assert!(validate_patch_length(10.0).is_ok());
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                validate_patch_length(bad),
                Err(Error::InvalidParameter { name: "patch_length", .. })
            ));
        }
    }

    #[test]
    fn test_zero_frequency_reciprocal_is_one() {
        let wv = WaveVector::at(4, 4, 8, 10.0);
        assert_eq!(wv.magnitude, 0.0);
        assert_eq!(wv.reciprocal_magnitude(), 1.0);
    }

    #[test]
    fn test_get_wrapped() {
        let grid = Grid::from_fn(4, |x, y| x + 10 * y).unwrap();
        assert_eq!(grid.get_wrapped(-1, 0), 3);
        assert_eq!(grid.get_wrapped(4, 5), 10);
    }

    #[test]
    fn test_ensure_size() {
        let grid = Grid::new(8, 0.0f32).unwrap();
        assert!(grid.ensure_size(8).is_ok());
        assert!(matches!(
            grid.ensure_size(16),
            Err(Error::GridSizeMismatch { expected: 16, actual: 8 })
        ));
    }
}
