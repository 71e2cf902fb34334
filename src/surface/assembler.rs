//! Surface assembly: spatial-domain spectra to displacement, slope and foam.

use glam::{Vec2, Vec4};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::field::{DisplacementField, SlopeField};
use crate::core::{Complex32, Result};
use crate::math::checkerboard_sign;
use crate::spectrum::{PackedSpectrum, SpectrumChannels};

/// Whitecap accumulation and decay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoamParams {
    /// Per-frame exponential decay rate.
    pub decay_rate: f32,
    /// Foam added per unit of Jacobian below `bias`.
    pub add_rate: f32,
    /// Jacobian value below which the surface produces foam.
    pub bias: f32,
    /// Source strength that must be exceeded before any foam is added.
    pub threshold: f32,
}

impl Default for FoamParams {
    fn default() -> Self {
        Self {
            decay_rate: 0.0175,
            add_rate: 0.1,
            bias: 0.85,
            threshold: 0.0,
        }
    }
}

/// Choppiness and foam settings for assembly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyParams {
    /// Horizontal displacement scale Λ along x and z.
    pub lambda: [f32; 2],
    pub foam: FoamParams,
}

impl Default for AssemblyParams {
    fn default() -> Self {
        Self {
            lambda: [1.0, 1.0],
            foam: FoamParams::default(),
        }
    }
}

/// Result of assembling a single texel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssembledTexel {
    pub displacement: Vec4,
    pub slope: Vec2,
    pub jacobian: f32,
}

/// Packs spatial samples into the output fields and integrates foam.
#[derive(Clone, Debug, Default)]
pub struct SurfaceAssembler {
    params: AssemblyParams,
}

impl SurfaceAssembler {
    pub fn new(params: AssemblyParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AssemblyParams {
        &self.params
    }

    pub fn set_params(&mut self, params: AssemblyParams) {
        self.params = params;
    }

    /// Determinant of the horizontal displacement Jacobian; below 1 the surface compresses.
    #[inline]
    pub fn jacobian(&self, dydxz: Complex32, dxxdzz: Complex32) -> f32 {
        let [lx, lz] = self.params.lambda;
        (1.0 + lx * dxxdzz.re) * (1.0 + lz * dxxdzz.im) - lx * lz * dydxz.im * dydxz.im
    }

    /// Decay `previous` and add foam where the Jacobian drops below the bias.
    #[inline]
    pub fn update_foam(&self, previous: f32, jacobian: f32) -> f32 {
        let foam = &self.params.foam;
        let mut next = previous * (-foam.decay_rate).exp();
        let source = (foam.bias - jacobian).max(0.0);
        if source > foam.threshold {
            next += foam.add_rate * source;
        }
        next.clamp(0.0, 1.0)
    }

    /// Assemble one texel from its (un-permuted) spatial channels.
    pub fn assemble_texel(
        &self,
        displacement: SpectrumChannels,
        slope: SpectrumChannels,
        sign: f32,
        previous_foam: f32,
    ) -> AssembledTexel {
        let [dxdz, dydxz] = displacement.map(|c| c * sign);
        let [dyxdyz, dxxdzz] = slope.map(|c| c * sign);
        let [lx, lz] = self.params.lambda;

        let slope = Vec2::new(
            dyxdyz.re / (1.0 + (lx * dxxdzz.re).abs()),
            dyxdyz.im / (1.0 + (lz * dxxdzz.im).abs()),
        );
        let jacobian = self.jacobian(dydxz, dxxdzz);
        let foam = self.update_foam(previous_foam, jacobian);

        AssembledTexel {
            displacement: Vec4::new(lx * dxdz.re, dydxz.re, lz * dxdz.im, foam),
            slope,
            jacobian,
        }
    }

    /// Write displacement (with next foam) and slope fields.
    ///
    /// `previous` supplies last frame's foam and may not alias the output.
    pub fn assemble_into(
        &self,
        displacement_spatial: &PackedSpectrum,
        slope_spatial: &PackedSpectrum,
        previous: &DisplacementField,
        out_displacement: &mut DisplacementField,
        out_slope: &mut SlopeField,
    ) -> Result<()> {
        let n = displacement_spatial.size();
        slope_spatial.ensure_size(n)?;
        previous.grid().ensure_size(n)?;
        out_displacement.grid().ensure_size(n)?;
        out_slope.grid().ensure_size(n)?;

        out_displacement
            .grid_mut()
            .cells_mut()
            .par_chunks_mut(n)
            .zip(out_slope.grid_mut().cells_mut().par_chunks_mut(n))
            .enumerate()
            .for_each(|(y, (disp_row, slope_row))| {
                for x in 0..n {
                    let texel = self.assemble_texel(
                        displacement_spatial.get(x, y),
                        slope_spatial.get(x, y),
                        checkerboard_sign(x, y),
                        previous.foam(x, y),
                    );
                    disp_row[x] = texel.displacement;
                    slope_row[x] = texel.slope;
                }
            });
        Ok(())
    }

    /// Allocating variant of [`assemble_into`](Self::assemble_into).
    pub fn assemble(
        &self,
        displacement_spatial: &PackedSpectrum,
        slope_spatial: &PackedSpectrum,
        previous: &DisplacementField,
    ) -> Result<(DisplacementField, SlopeField)> {
        let n = displacement_spatial.size();
        let patch = previous.patch_length();
        let mut displacement = DisplacementField::new(n, patch)?;
        let mut slope = SlopeField::new(n, patch)?;
        self.assemble_into(displacement_spatial, slope_spatial, previous, &mut displacement, &mut slope)?;
        Ok((displacement, slope))
    }
}
