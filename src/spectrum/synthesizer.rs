//! Initial spectrum synthesis.
//!
//! Builds `h0(k)` from the directional JONSWAP density and per-texel Gaussian
//! noise, then pairs every cell with the conjugate of its mirror so the time
//! evolver reads `h0(k)` and `h0*(-k)` from a single cell.
//!
//! The `-N/2` row and column carry no energy: their mirror is the cell itself
//! along that axis, so the odd `i·k` derivative spectra there cannot be
//! Hermitian and would leak into the imaginary half of each packed channel.

use std::f32::consts::PI;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::jonswap::{directional_density, dispersion, dispersion_derivative};
use super::noise::GaussianNoise;
use crate::core::{Complex32, Result};
use crate::math::{is_nyquist_edge, mirror, validate_patch_length, validate_size, wavenumber_step, Grid, WaveVector};
use crate::params::ResolvedParameters;

/// One cell of the initial spectrum: `h0(k)` and `h0*(-k)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InitialCell {
    pub h0: Complex32,
    pub h0_minus_conj: Complex32,
}

/// Static spectrum, rebuilt only when parameters change.
pub type InitialSpectrum = Grid<InitialCell>;

/// Band of wavenumber magnitudes `[low_cutoff, high_cutoff]` carrying energy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpectrumBand {
    pub low_cutoff: f32,
    pub high_cutoff: f32,
}

impl SpectrumBand {
    /// Default low cutoff; keeps the `k = 0` singularity out of the spectrum.
    pub const MIN_WAVENUMBER: f32 = 1e-4;

    /// Band limited by the axis Nyquist wavenumber `π·N/L`.
    pub fn for_grid(size: usize, patch_length: f32) -> Self {
        Self {
            low_cutoff: Self::MIN_WAVENUMBER,
            high_cutoff: PI * size as f32 / patch_length,
        }
    }

    #[inline]
    pub fn contains(&self, k: f32) -> bool {
        k >= self.low_cutoff && k <= self.high_cutoff
    }
}

/// Produces [`InitialSpectrum`]s for a fixed grid size and patch length.
#[derive(Clone, Debug)]
pub struct SpectrumSynthesizer {
    size: usize,
    patch_length: f32,
    band: SpectrumBand,
}

impl SpectrumSynthesizer {
    pub fn new(size: usize, patch_length: f32) -> Result<Self> {
        validate_size(size)?;
        validate_patch_length(patch_length)?;
        Ok(Self {
            size,
            patch_length,
            band: SpectrumBand::for_grid(size, patch_length),
        })
    }

    /// Restrict synthesis to `band` (used to split cascades).
    pub fn with_band(mut self, band: SpectrumBand) -> Self {
        self.band = band;
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn patch_length(&self) -> f32 {
        self.patch_length
    }

    pub fn band(&self) -> SpectrumBand {
        self.band
    }

    /// Synthesize a single-layer spectrum.
    pub fn synthesize(&self, resolved: &ResolvedParameters, noise: GaussianNoise) -> Result<InitialSpectrum> {
        self.synthesize_layers(std::slice::from_ref(resolved), noise)
    }

    /// Synthesize the sum of several spectrum layers (e.g. wind sea + swell).
    ///
    /// Dispersion uses the depth of the first layer. An empty slice yields a
    /// flat spectrum.
    pub fn synthesize_layers(&self, layers: &[ResolvedParameters], noise: GaussianNoise) -> Result<InitialSpectrum> {
        let start = Instant::now();

        let h0 = match layers.first() {
            Some(primary) => Grid::from_fn(self.size, |x, y| self.amplitude(x, y, primary, layers, noise))?,
            None => Grid::new(self.size, Complex32::default())?,
        };
        let spectrum = pair_conjugates(&h0)?;

        log::info!(
            "Synthesized {}x{} spectrum over {:.1}m ({} layer(s), k in [{:.4}, {:.2}]) in {:.1}ms",
            self.size,
            self.size,
            self.patch_length,
            layers.len(),
            self.band.low_cutoff,
            self.band.high_cutoff,
            start.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(spectrum)
    }

    /// `h0(k)` for cell `(x, y)`.
    fn amplitude(
        &self,
        x: usize,
        y: usize,
        primary: &ResolvedParameters,
        layers: &[ResolvedParameters],
        noise: GaussianNoise,
    ) -> Complex32 {
        if is_nyquist_edge(x, y) {
            return Complex32::default();
        }
        let wave = WaveVector::at(x, y, self.size, self.patch_length);
        if !self.band.contains(wave.magnitude) {
            return Complex32::default();
        }

        let k = wave.magnitude;
        let omega = dispersion(k, primary.gravity, primary.depth);
        let d_omega_dk = dispersion_derivative(k, primary.gravity, primary.depth);
        let density: f32 = layers
            .iter()
            .map(|layer| directional_density(&wave, omega, layer))
            .sum();

        let delta_k = wavenumber_step(self.patch_length);
        let amplitude = (2.0 * density * d_omega_dk.abs() / k * delta_k * delta_k).sqrt();
        if !amplitude.is_finite() {
            return Complex32::default();
        }

        let (a, b) = noise.pair(x, y, self.size);
        Complex32::new(a * amplitude, b * amplitude)
    }
}

/// Store `h0(k)` and `h0*(-k)` side by side in each cell.
pub fn pair_conjugates(h0: &Grid<Complex32>) -> Result<InitialSpectrum> {
    let size = h0.size();
    Grid::from_fn(size, |x, y| {
        let (mx, my) = mirror(x, y, size);
        InitialCell {
            h0: h0.get(x, y),
            h0_minus_conj: h0.get(mx, my).conj(),
        }
    })
}

/// Total spectral energy `Σ|h0|²`.
pub fn spectral_energy(spectrum: &InitialSpectrum) -> f64 {
    spectrum
        .cells()
        .iter()
        .map(|cell| cell.h0.norm_sqr() as f64)
        .sum()
}
