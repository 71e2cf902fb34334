//! Time evolution of the initial spectrum.
//!
//! Every frame, `h0` is rotated to the current time with a looping
//! (quantized) dispersion and expanded into the eight derivative spectra the
//! surface needs, packed as two complex channels in each of two grids:
//!
//! | grid | channel 0 | channel 1 |
//! |---|---|---|
//! | displacement | `Dx + i·Dz` | `Dy + i·Dxz` |
//! | slope | `Dyx + i·Dyz` | `Dxx + i·Dzz` |
//!
//! Each packed channel holds two Hermitian spectra, so after the inverse
//! transform the real part is one real field and the imaginary part the other.

use std::f64::consts::TAU;

use rayon::prelude::*;

use super::jonswap::dispersion;
use super::synthesizer::{InitialCell, InitialSpectrum};
use crate::core::{Complex32, Result};
use crate::math::{validate_patch_length, validate_size, Grid, WaveVector};
use crate::params::ResolvedParameters;

/// Two packed complex channels per cell.
pub type SpectrumChannels = [Complex32; 2];

/// Grid of packed channels (displacement or slope spectrum, before or after the transform).
pub type PackedSpectrum = Grid<SpectrumChannels>;

/// `h̃(k, t) = h0(k)·e^{iωt} + h0*(-k)·e^{-iωt}`.
#[inline]
pub fn height_amplitude(cell: &InitialCell, phasor: Complex32) -> Complex32 {
    cell.h0 * phasor + cell.h0_minus_conj * phasor.conj()
}

/// The eight derivative spectra of `h̃` at one wave vector.
///
/// Horizontal displacement terms carry `1/|k|`; the vertical ones do not.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DerivativeTerms {
    pub dx: Complex32,
    pub dy: Complex32,
    pub dz: Complex32,
    pub dx_dx: Complex32,
    pub dy_dx: Complex32,
    pub dz_dx: Complex32,
    pub dy_dz: Complex32,
    pub dz_dz: Complex32,
}

impl DerivativeTerms {
    pub fn new(h: Complex32, wave: &WaveVector) -> Self {
        let ih = Complex32::i() * h;
        let kx = wave.k.x;
        let kz = wave.k.y;
        let rcp = wave.reciprocal_magnitude();
        Self {
            dx: ih * (kx * rcp),
            dy: h,
            dz: ih * (kz * rcp),
            dx_dx: -h * (kx * kx * rcp),
            dy_dx: ih * kx,
            dz_dx: -h * (kx * kz * rcp),
            dy_dz: ih * kz,
            dz_dz: -h * (kz * kz * rcp),
        }
    }

    pub fn to_array(&self) -> [Complex32; 8] {
        [self.dx, self.dy, self.dz, self.dx_dx, self.dy_dx, self.dz_dx, self.dy_dz, self.dz_dz]
    }

    /// Pack as `(displacement, slope)` channels.
    pub fn pack(&self) -> (SpectrumChannels, SpectrumChannels) {
        let i = Complex32::i();
        (
            [self.dx + i * self.dz, self.dy + i * self.dz_dx],
            [self.dy_dx + i * self.dy_dz, self.dx_dx + i * self.dz_dz],
        )
    }
}

/// Derivative spectra of `h̃` packed as `(displacement, slope)` channels.
#[inline]
pub fn derivative_channels(h: Complex32, wave: &WaveVector) -> (SpectrumChannels, SpectrumChannels) {
    DerivativeTerms::new(h, wave).pack()
}

/// Advances an [`InitialSpectrum`] to a point in time.
#[derive(Clone, Debug)]
pub struct TimeEvolver {
    size: usize,
    patch_length: f32,
    gravity: f32,
    depth: f32,
}

impl TimeEvolver {
    pub fn new(size: usize, patch_length: f32, resolved: &ResolvedParameters) -> Result<Self> {
        validate_size(size)?;
        validate_patch_length(patch_length)?;
        Ok(Self {
            size,
            patch_length,
            gravity: resolved.gravity,
            depth: resolved.depth,
        })
    }

    /// Adopt the depth of newly resolved parameters.
    pub fn set_sea_state(&mut self, resolved: &ResolvedParameters) {
        self.gravity = resolved.gravity;
        self.depth = resolved.depth;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Angular frequency of wavenumber `k`, snapped to the nearest multiple of `2π/T`.
    pub fn quantized_frequency(&self, k: f32, repeat_time: f32) -> f32 {
        let base = std::f32::consts::TAU / repeat_time;
        (dispersion(k, self.gravity, self.depth) / base).round() * base
    }

    /// `e^{iωt}` with the quantized frequency.
    ///
    /// The phase is reduced to a fraction of a cycle in `f64` so that `t` and
    /// `t + repeat_time` give the same phasor.
    pub fn phasor(&self, k: f32, time: f64, repeat_time: f32) -> Complex32 {
        let base = std::f32::consts::TAU / repeat_time;
        let quanta = (dispersion(k, self.gravity, self.depth) / base).round() as f64;
        let cycles = (quanta * time / repeat_time as f64).rem_euclid(1.0);
        let phase = (cycles * TAU) as f32;
        Complex32::new(phase.cos(), phase.sin())
    }

    /// Write the displacement and slope spectra for `time` into the given grids.
    pub fn evolve_into(
        &self,
        initial: &InitialSpectrum,
        time: f64,
        repeat_time: f32,
        displacement: &mut PackedSpectrum,
        slope: &mut PackedSpectrum,
    ) -> Result<()> {
        initial.ensure_size(self.size)?;
        displacement.ensure_size(self.size)?;
        slope.ensure_size(self.size)?;

        let n = self.size;
        displacement
            .cells_mut()
            .par_chunks_mut(n)
            .zip(slope.cells_mut().par_chunks_mut(n))
            .enumerate()
            .for_each(|(y, (disp_row, slope_row))| {
                for x in 0..n {
                    let wave = WaveVector::at(x, y, n, self.patch_length);
                    let phasor = self.phasor(wave.magnitude, time, repeat_time);
                    let h = height_amplitude(&initial.get(x, y), phasor);
                    let (d, s) = derivative_channels(h, &wave);
                    disp_row[x] = d;
                    slope_row[x] = s;
                }
            });
        Ok(())
    }

    /// Allocating variant of [`evolve_into`](Self::evolve_into).
    pub fn evolve(
        &self,
        initial: &InitialSpectrum,
        time: f64,
        repeat_time: f32,
    ) -> Result<(PackedSpectrum, PackedSpectrum)> {
        let mut displacement = Grid::new(self.size, SpectrumChannels::default())?;
        let mut slope = Grid::new(self.size, SpectrumChannels::default())?;
        self.evolve_into(initial, time, repeat_time, &mut displacement, &mut slope)?;
        Ok((displacement, slope))
    }
}
