//! A single ocean patch: spectrum, evolution, transform and assembly.

use std::time::Instant;

use crate::core::{Error, Result};
use crate::fft::SpectralTransform;
use crate::math::Grid;
use crate::params::{resolve, CascadeConfig, OceanConfig, ResolvedParameters, SimulationParameters};
use crate::spectrum::{
    GaussianNoise, InitialSpectrum, PackedSpectrum, SpectrumChannels, SpectrumSynthesizer, TimeEvolver,
};
use crate::surface::{AssemblyParams, SurfaceAssembler, SurfaceFrame};

/// Full per-frame pipeline for one patch.
///
/// Output is double-buffered: [`step`](Self::step) assembles into the back
/// frame and swaps only when the whole frame succeeded, so
/// [`surface`](Self::surface) always returns a complete frame.
pub struct OceanCascade {
    synthesizer: SpectrumSynthesizer,
    evolver: TimeEvolver,
    transform: SpectralTransform<SpectrumChannels>,
    assembler: SurfaceAssembler,
    noise: GaussianNoise,

    /// Raw layers the current spectrum was built from
    layers: Vec<SimulationParameters>,
    resolved: Vec<ResolvedParameters>,
    initial: InitialSpectrum,

    displacement_spectrum: PackedSpectrum,
    slope_spectrum: PackedSpectrum,
    front: SurfaceFrame,
    back: SurfaceFrame,
}

fn resolve_layers(layers: &[SimulationParameters]) -> Result<Vec<ResolvedParameters>> {
    layers.iter().map(resolve).collect()
}

/// Reject step times the evolver cannot reduce to a phase.
pub(crate) fn check_step_time(time: f64) -> Result<()> {
    if time.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid("time", time, "must be finite"))
    }
}

impl OceanCascade {
    /// Build a cascade and synthesize its initial spectrum.
    ///
    /// `layers[0]` is the primary layer; its depth drives dispersion and its
    /// repeat time the animation loop.
    pub fn new(
        size: usize,
        cascade: &CascadeConfig,
        layers: &[SimulationParameters],
        assembly: AssemblyParams,
        seed: u64,
    ) -> Result<Self> {
        let resolved = resolve_layers(layers)?;
        let primary = resolved
            .first()
            .ok_or_else(|| Error::invalid("layers", 0.0, "at least one spectrum layer is required"))?;

        let patch = cascade.patch_length;
        let synthesizer = SpectrumSynthesizer::new(size, patch)?.with_band(cascade.band_for(size));
        let evolver = TimeEvolver::new(size, patch, primary)?;
        let noise = GaussianNoise::new(seed);
        let initial = synthesizer.synthesize_layers(&resolved, noise)?;

        log::info!(
            "Created {}x{} ocean cascade: {:.1}m patch, seed {}, loop {:.1}s",
            size,
            size,
            patch,
            seed,
            primary.repeat_time,
        );

        Ok(Self {
            synthesizer,
            evolver,
            transform: SpectralTransform::new(size)?,
            assembler: SurfaceAssembler::new(assembly),
            noise,
            layers: layers.to_vec(),
            resolved,
            initial,
            displacement_spectrum: Grid::new(size, SpectrumChannels::default())?,
            slope_spectrum: Grid::new(size, SpectrumChannels::default())?,
            front: SurfaceFrame::flat(size, patch)?,
            back: SurfaceFrame::flat(size, patch)?,
        })
    }

    /// Cascade `index` of `config`, seeded with `config.seed + index`.
    pub fn from_config(config: &OceanConfig, index: usize) -> Result<Self> {
        let cascade = config
            .cascades
            .get(index)
            .ok_or_else(|| Error::invalid("cascade", index as f64, "no cascade with this index"))?;
        Self::new(
            config.grid_size,
            cascade,
            &config.layers(),
            config.assembly,
            config.seed.wrapping_add(index as u64),
        )
    }

    pub fn size(&self) -> usize {
        self.synthesizer.size()
    }

    pub fn patch_length(&self) -> f32 {
        self.synthesizer.patch_length()
    }

    /// Loop period of the animation, seconds
    pub fn repeat_time(&self) -> f32 {
        self.primary().repeat_time
    }

    pub fn primary(&self) -> &ResolvedParameters {
        &self.resolved[0]
    }

    pub fn resolved(&self) -> &[ResolvedParameters] {
        &self.resolved
    }

    pub fn initial_spectrum(&self) -> &InitialSpectrum {
        &self.initial
    }

    /// Latest complete frame.
    pub fn surface(&self) -> &SurfaceFrame {
        &self.front
    }

    pub fn assembly(&self) -> &AssemblyParams {
        self.assembler.params()
    }

    /// Takes effect from the next frame; foam state is kept.
    pub fn set_assembly(&mut self, assembly: AssemblyParams) {
        self.assembler.set_params(assembly);
    }

    /// Replace the spectrum layers.
    ///
    /// Returns `Ok(true)` if the spectrum was re-synthesized and `Ok(false)`
    /// if the parameters were unchanged. A rejected update leaves the
    /// previous parameters and spectrum in place.
    pub fn set_parameters(
        &mut self,
        primary: &SimulationParameters,
        swell: Option<&SimulationParameters>,
    ) -> Result<bool> {
        let layers = primary.with_swell(swell);
        if layers == self.layers {
            return Ok(false);
        }

        let resolved = resolve_layers(&layers).inspect_err(|e| {
            log::warn!("Rejected ocean parameter update: {}", e);
        })?;
        let initial = self.synthesizer.synthesize_layers(&resolved, self.noise)?;

        self.evolver.set_sea_state(&resolved[0]);
        self.initial = initial;
        self.resolved = resolved;
        self.layers = layers;
        Ok(true)
    }

    /// Advance the surface to `time` seconds and return the new frame.
    ///
    /// On error the previously returned frame stays current.
    pub fn step(&mut self, time: f64) -> Result<&SurfaceFrame> {
        let start = Instant::now();
        if let Err(e) = self.render_back(time) {
            log::warn!("Ocean frame at t={:.3}s failed, keeping previous frame: {}", time, e);
            return Err(e);
        }
        std::mem::swap(&mut self.front, &mut self.back);

        log::debug!(
            "Ocean frame {} (t={:.3}s, {:.1}m) in {:.2}ms",
            self.front.frame_index,
            time,
            self.patch_length(),
            start.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(&self.front)
    }

    /// Evolve, transform and assemble into the back frame.
    fn render_back(&mut self, time: f64) -> Result<()> {
        check_step_time(time)?;
        let repeat_time = self.resolved[0].repeat_time;

        self.evolver.evolve_into(
            &self.initial,
            time,
            repeat_time,
            &mut self.displacement_spectrum,
            &mut self.slope_spectrum,
        )?;
        self.transform.inverse_transform_2d(&mut self.displacement_spectrum)?;
        self.transform.inverse_transform_2d(&mut self.slope_spectrum)?;
        self.assembler.assemble_into(
            &self.displacement_spectrum,
            &self.slope_spectrum,
            &self.front.displacement,
            &mut self.back.displacement,
            &mut self.back.slope,
        )?;

        self.back.time = time;
        self.back.frame_index = self.front.frame_index + 1;
        Ok(())
    }
}
