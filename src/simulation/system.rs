//! Multi-cascade ocean driven by one clock.

use glam::{Vec2, Vec3, Vec4};

use super::cascade::{check_step_time, OceanCascade};
use crate::core::{Result, SimulationClock};
use crate::params::{OceanConfig, SimulationParameters};
use crate::surface::{slope_to_normal, AssemblyParams};

/// Several cascades at different patch lengths summed into one surface.
pub struct OceanSystem {
    cascades: Vec<OceanCascade>,
    clock: SimulationClock,
}

impl OceanSystem {
    pub fn new(config: &OceanConfig) -> Result<Self> {
        config.validate()?;
        let cascades = (0..config.cascades.len())
            .map(|index| OceanCascade::from_config(config, index))
            .collect::<Result<Vec<_>>>()?;
        log::info!("Ocean system ready with {} cascade(s)", cascades.len());
        Ok(Self {
            cascades,
            clock: SimulationClock::default(),
        })
    }

    pub fn cascades(&self) -> &[OceanCascade] {
        &self.cascades
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut SimulationClock {
        &mut self.clock
    }

    /// Step every cascade to `time`.
    ///
    /// An invalid time is rejected before any cascade advances. Cascades that
    /// fail later keep their previous frame.
    pub fn step(&mut self, time: f64) -> Result<()> {
        check_step_time(time)?;
        let mut first_error = None;
        for cascade in &mut self.cascades {
            if let Err(e) = cascade.step(time) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Advance the clock by `dt` seconds and step to the new time.
    pub fn advance(&mut self, dt: f64) -> Result<f64> {
        let time = self.clock.advance(dt);
        self.step(time)?;
        Ok(time)
    }

    /// Apply new spectrum layers to every cascade; `Ok(true)` if any re-synthesized.
    pub fn set_parameters(
        &mut self,
        primary: &SimulationParameters,
        swell: Option<&SimulationParameters>,
    ) -> Result<bool> {
        let mut changed = false;
        for cascade in &mut self.cascades {
            changed |= cascade.set_parameters(primary, swell)?;
        }
        Ok(changed)
    }

    pub fn set_assembly(&mut self, assembly: AssemblyParams) {
        for cascade in &mut self.cascades {
            cascade.set_assembly(assembly);
        }
    }

    /// Summed `(dx, dy, dz)` at a world-space position on the water plane.
    pub fn sample_displacement(&self, position: Vec2) -> Vec3 {
        self.sample_texel(position).truncate()
    }

    /// Foam coverage at `position`, clamped to `[0, 1]`.
    pub fn sample_foam(&self, position: Vec2) -> f32 {
        self.sample_texel(position).w.clamp(0.0, 1.0)
    }

    /// Surface normal from the summed slopes of every cascade.
    pub fn sample_normal(&self, position: Vec2) -> Vec3 {
        let slope = self
            .cascades
            .iter()
            .map(|c| c.surface().slope.sample(position))
            .fold(Vec2::ZERO, |acc, s| acc + s);
        slope_to_normal(slope)
    }

    fn sample_texel(&self, position: Vec2) -> Vec4 {
        self.cascades
            .iter()
            .map(|c| c.surface().displacement.sample(position))
            .fold(Vec4::ZERO, |acc, d| acc + d)
    }
}
