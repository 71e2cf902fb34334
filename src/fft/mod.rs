//! Separable 2D inverse FFT over packed spectrum grids.
//!
//! The transform is an explicit schedule of stages: for each axis a
//! bit-reversal reorder followed by `log2(N)` radix-2 butterfly stages. Each
//! stage reads one grid and writes another, every output cell computed
//! independently in parallel; the stage returns only after all cells are
//! written, which is the barrier the next stage relies on.
//!
//! No `1/N²` normalisation is applied. The `Δk²` factor in the synthesized
//! amplitudes already sets the physical scale.

pub mod plan;

pub use plan::{ButterflyPlan, FftSample};

use crate::core::Result;
use crate::math::Grid;

/// Direction a stage transforms along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along `x`, one line per row
    Rows,
    /// Along `y`, one line per column
    Columns,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Bit-reversal permutation of every line
    Reorder,
    /// Radix-2 butterfly stage `0..log2(N)`
    Butterfly(u32),
}

/// One barrier-delimited step of the 2D transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformStage {
    pub axis: Axis,
    pub kind: StageKind,
}

/// Ordered stages of a full 2D inverse transform: rows, then columns.
#[derive(Clone, Debug)]
pub struct StageSchedule {
    stages_per_axis: usize,
    cursor: usize,
}

impl StageSchedule {
    pub fn new(butterfly_stages: u32) -> Self {
        Self {
            stages_per_axis: butterfly_stages as usize + 1,
            cursor: 0,
        }
    }

    /// Stages for a single axis only.
    pub fn axis(self, axis: Axis) -> impl Iterator<Item = TransformStage> {
        self.filter(move |stage| stage.axis == axis)
    }

    fn stage_at(&self, index: usize) -> Option<TransformStage> {
        if index >= self.stages_per_axis * 2 {
            return None;
        }
        let axis = if index < self.stages_per_axis { Axis::Rows } else { Axis::Columns };
        let kind = match index % self.stages_per_axis {
            0 => StageKind::Reorder,
            step => StageKind::Butterfly(step as u32 - 1),
        };
        Some(TransformStage { axis, kind })
    }
}

impl Iterator for StageSchedule {
    type Item = TransformStage;

    fn next(&mut self) -> Option<TransformStage> {
        let stage = self.stage_at(self.cursor)?;
        self.cursor += 1;
        Some(stage)
    }
}

/// Write the output of `stage` applied to `src` into `dst`.
pub fn apply_stage<T: FftSample>(
    plan: &ButterflyPlan,
    stage: TransformStage,
    src: &Grid<T>,
    dst: &mut Grid<T>,
) -> Result<()> {
    src.ensure_size(plan.size())?;
    dst.ensure_size(plan.size())?;

    match (stage.axis, stage.kind) {
        (Axis::Rows, StageKind::Reorder) => {
            dst.par_fill_with(|x, y| src.get(plan.reorder_source(x), y));
        }
        (Axis::Columns, StageKind::Reorder) => {
            dst.par_fill_with(|x, y| src.get(x, plan.reorder_source(y)));
        }
        (Axis::Rows, StageKind::Butterfly(s)) => {
            dst.par_fill_with(|x, y| plan.butterfly(s, x, |j| src.get(j, y)));
        }
        (Axis::Columns, StageKind::Butterfly(s)) => {
            dst.par_fill_with(|x, y| plan.butterfly(s, y, |j| src.get(x, j)));
        }
    }
    Ok(())
}

/// In-place 2D inverse transform with a reusable scratch grid.
#[derive(Clone, Debug)]
pub struct SpectralTransform<T> {
    plan: ButterflyPlan,
    scratch: Grid<T>,
}

impl<T: FftSample> SpectralTransform<T> {
    pub fn new(size: usize) -> Result<Self> {
        Ok(Self {
            plan: ButterflyPlan::new(size)?,
            scratch: Grid::new(size, T::default())?,
        })
    }

    pub fn size(&self) -> usize {
        self.plan.size()
    }

    pub fn plan(&self) -> &ButterflyPlan {
        &self.plan
    }

    pub fn schedule(&self) -> StageSchedule {
        StageSchedule::new(self.plan.stage_count())
    }

    /// Run one stage; `grid` holds its output afterwards.
    pub fn step(&mut self, stage: TransformStage, grid: &mut Grid<T>) -> Result<()> {
        apply_stage(&self.plan, stage, grid, &mut self.scratch)?;
        std::mem::swap(grid, &mut self.scratch);
        Ok(())
    }

    /// Frequency domain to spatial domain, in place.
    pub fn inverse_transform_2d(&mut self, grid: &mut Grid<T>) -> Result<()> {
        grid.ensure_size(self.size())?;
        for stage in self.schedule() {
            self.step(stage, grid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Complex32, Error};
    use std::f64::consts::TAU;

    /// Naive O(N⁴) 2D DFT; `sign` is +1 for inverse, -1 for forward. Unnormalised.
    fn reference_dft(input: &Grid<Complex32>, sign: f64) -> Grid<Complex32> {
        let n = input.size();
        Grid::from_fn(n, |u, v| {
            let mut re = 0.0f64;
            let mut im = 0.0f64;
            for y in 0..n {
                for x in 0..n {
                    let c = input.get(x, y);
                    let angle = sign * TAU * ((u * x + v * y) % n) as f64 / n as f64;
                    let (s, co) = angle.sin_cos();
                    re += c.re as f64 * co - c.im as f64 * s;
                    im += c.re as f64 * s + c.im as f64 * co;
                }
            }
            Complex32::new(re as f32, im as f32)
        })
        .unwrap()
    }

    fn reference_dft_1d(line: &[Complex32]) -> Vec<Complex32> {
        let n = line.len();
        (0..n)
            .map(|u| {
                line.iter().enumerate().fold(Complex32::default(), |acc, (x, c)| {
                    let angle = (TAU * ((u * x) % n) as f64 / n as f64) as f32;
                    acc + c * Complex32::new(angle.cos(), angle.sin())
                })
            })
            .collect()
    }

    fn test_signal(n: usize) -> Grid<Complex32> {
        Grid::from_fn(n, |x, y| {
            let fx = x as f32;
            let fy = y as f32;
            Complex32::new((0.7 * fx + 0.3 * fy).sin() + 0.1 * fx, (1.3 * fy).cos() - 0.05 * fx * fy)
        })
        .unwrap()
    }

    fn max_error(a: &Grid<Complex32>, b: &Grid<Complex32>) -> f32 {
        a.cells()
            .iter()
            .zip(b.cells())
            .map(|(p, q)| (p - q).norm())
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_schedule_order() {
        let stages: Vec<_> = StageSchedule::new(3).collect();
        assert_eq!(stages.len(), 8);
        assert_eq!(stages[0], TransformStage { axis: Axis::Rows, kind: StageKind::Reorder });
        assert_eq!(stages[1], TransformStage { axis: Axis::Rows, kind: StageKind::Butterfly(0) });
        assert_eq!(stages[3], TransformStage { axis: Axis::Rows, kind: StageKind::Butterfly(2) });
        assert_eq!(stages[4], TransformStage { axis: Axis::Columns, kind: StageKind::Reorder });
        assert_eq!(stages[7], TransformStage { axis: Axis::Columns, kind: StageKind::Butterfly(2) });
    }

    #[test]
    fn test_round_trip_against_reference_dft() {
        for n in [8, 16] {
            let signal = test_signal(n);
            let mut spectrum = reference_dft(&signal, -1.0);
            let mut transform = SpectralTransform::<Complex32>::new(n).unwrap();
            transform.inverse_transform_2d(&mut spectrum).unwrap();

            let scale = 1.0 / (n * n) as f32;
            let restored = Grid::from_fn(n, |x, y| spectrum.get(x, y) * scale).unwrap();
            let err = max_error(&restored, &signal);
            assert!(err < 1e-3, "N={n}: max error {err}");
        }
    }

    #[test]
    fn test_inverse_matches_reference_on_packed_channels() {
        let n = 8;
        let a = test_signal(n);
        let b = Grid::from_fn(n, |x, y| Complex32::new(y as f32 * 0.25, (x * y) as f32 * 0.1)).unwrap();
        let mut packed = Grid::from_fn(n, |x, y| [a.get(x, y), b.get(x, y)]).unwrap();
        let mut transform = SpectralTransform::<[Complex32; 2]>::new(n).unwrap();
        transform.inverse_transform_2d(&mut packed).unwrap();

        let expect_a = reference_dft(&a, 1.0);
        let expect_b = reference_dft(&b, 1.0);
        let got_a = Grid::from_fn(n, |x, y| packed.get(x, y)[0]).unwrap();
        let got_b = Grid::from_fn(n, |x, y| packed.get(x, y)[1]).unwrap();
        assert!(max_error(&got_a, &expect_a) < 1e-3);
        assert!(max_error(&got_b, &expect_b) < 1e-3);
    }

    #[test]
    fn test_row_stages_transform_each_row() {
        let n = 16;
        let signal = test_signal(n);
        let mut grid = signal.clone();
        let mut transform = SpectralTransform::<Complex32>::new(n).unwrap();
        for stage in transform.schedule().axis(Axis::Rows) {
            transform.step(stage, &mut grid).unwrap();
        }
        for y in 0..n {
            let row: Vec<Complex32> = (0..n).map(|x| signal.get(x, y)).collect();
            let expected = reference_dft_1d(&row);
            for x in 0..n {
                assert!((grid.get(x, y) - expected[x]).norm() < 1e-3, "row {y} col {x}");
            }
        }
    }

    #[test]
    fn test_stages_out_of_order_corrupt_result() {
        let n = 8;
        let signal = test_signal(n);
        let mut transform = SpectralTransform::<Complex32>::new(n).unwrap();
        let mut stages: Vec<_> = transform.schedule().collect();
        stages.swap(1, 2);
        let mut grid = signal.clone();
        for stage in stages {
            transform.step(stage, &mut grid).unwrap();
        }
        let expected = reference_dft(&signal, 1.0);
        assert!(max_error(&grid, &expected) > 1e-2);
    }

    #[test]
    fn test_parseval_without_normalisation() {
        let n = 16;
        let spectrum = test_signal(n);
        let freq_energy: f64 = spectrum.cells().iter().map(|c| c.norm_sqr() as f64).sum();
        let mut spatial = spectrum.clone();
        SpectralTransform::<Complex32>::new(n).unwrap().inverse_transform_2d(&mut spatial).unwrap();
        let spatial_energy: f64 = spatial.cells().iter().map(|c| c.norm_sqr() as f64).sum();
        let ratio = spatial_energy / (freq_energy * (n * n) as f64);
        assert!((ratio - 1.0).abs() < 1e-4, "ratio {ratio}");
    }

    #[test]
    fn test_single_frequency_becomes_plane_wave() {
        let n = 8;
        let mut grid = Grid::new(n, Complex32::default()).unwrap();
        grid.set(1, 2, Complex32::new(1.0, 0.0));
        SpectralTransform::<Complex32>::new(n).unwrap().inverse_transform_2d(&mut grid).unwrap();
        for y in 0..n {
            for x in 0..n {
                let angle = (TAU * (x + 2 * y) as f64 / n as f64) as f32;
                let expected = Complex32::new(angle.cos(), angle.sin());
                assert!((grid.get(x, y) - expected).norm() < 1e-5);
            }
        }
    }

    #[test]
    fn test_rejects_mismatched_grid() {
        let mut transform = SpectralTransform::<Complex32>::new(8).unwrap();
        let mut grid = Grid::new(16, Complex32::default()).unwrap();
        assert!(matches!(
            transform.inverse_transform_2d(&mut grid),
            Err(Error::GridSizeMismatch { expected: 8, actual: 16 })
        ));
    }
}
