//! User-facing spectrum parameters and their physical derivation.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result, GRAVITY};

/// Largest repeat period accepted for the looping dispersion (seconds).
pub const MAX_REPEAT_TIME_SECONDS: f32 = 200.0;

/// Slider-level parameters for one spectrum layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Overall energy multiplier (>= 0).
    pub scale: f32,
    /// Blend between the cos² lobe (0) and the frequency-dependent cos-power spread (1).
    pub spread_blend: f32,
    /// Extra directional concentration for long-travelled waves `[0, 1]`.
    pub swell: f32,
    /// JONSWAP peak enhancement γ `[0, 7]`.
    pub peak_sharpness: f32,
    /// Gaussian attenuation length for short waves `[0, 1]`.
    pub short_waves_fade: f32,
    /// Wind heading in degrees `[0, 360]`.
    pub wind_direction_degrees: f32,
    /// Distance over which the wind has blown, meters `(0, 10000]`.
    pub fetch_meters: f32,
    /// Wind speed at 10 m, m/s `(0, 100]`.
    pub wind_speed: f32,
    /// Loop period of the animation, seconds `(0, 200]`.
    pub repeat_time_seconds: f32,
    /// Water depth, meters (> 0).
    pub water_depth_meters: f32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            scale: 1.0,
            spread_blend: 0.9,
            swell: 0.2,
            peak_sharpness: 3.3,
            short_waves_fade: 0.01,
            wind_direction_degrees: 22.0,
            fetch_meters: 8000.0,
            wind_speed: 10.0,
            repeat_time_seconds: MAX_REPEAT_TIME_SECONDS,
            water_depth_meters: 20.0,
        }
    }
}

/// Parameters with the physical constants derived, ready for synthesis.
///
/// Only produced by [`resolve`]; the derived fields are never edited directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedParameters {
    pub scale: f32,
    pub spread_blend: f32,
    pub swell: f32,
    pub gamma: f32,
    pub short_waves_fade: f32,
    pub depth: f32,
    pub repeat_time: f32,
    pub gravity: f32,
    /// Wind heading in radians
    pub wind_angle: f32,
    /// JONSWAP energy scale α
    pub alpha: f32,
    /// Peak angular frequency ωp (rad/s)
    pub peak_omega: f32,
}

fn check_range(name: &'static str, value: f32, min: f32, max: f32) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid(name, value, "must be finite"));
    }
    if value < min || value > max {
        return Err(Error::invalid(name, value, "out of range"));
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f32, max: f32) -> Result<()> {
    check_range(name, value, 0.0, max)?;
    if value <= 0.0 {
        return Err(Error::invalid(name, value, "must be greater than zero"));
    }
    Ok(())
}

fn check_derived(name: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(name, value, "derived value is not finite"))
    }
}

/// Validate `params` and derive wind angle, α and ωp.
///
/// Pure; call again whenever any slider changes.
pub fn resolve(params: &SimulationParameters) -> Result<ResolvedParameters> {
    check_range("scale", params.scale, 0.0, f32::MAX)?;
    check_range("spread_blend", params.spread_blend, 0.0, 1.0)?;
    check_range("swell", params.swell, 0.0, 1.0)?;
    check_range("peak_sharpness", params.peak_sharpness, 0.0, 7.0)?;
    check_range("short_waves_fade", params.short_waves_fade, 0.0, 1.0)?;
    check_range("wind_direction_degrees", params.wind_direction_degrees, 0.0, 360.0)?;
    check_positive("fetch_meters", params.fetch_meters, 10_000.0)?;
    check_positive("wind_speed", params.wind_speed, 100.0)?;
    check_positive("repeat_time_seconds", params.repeat_time_seconds, MAX_REPEAT_TIME_SECONDS)?;
    check_positive("water_depth_meters", params.water_depth_meters, f32::MAX)?;

    let g = GRAVITY;
    let fetch = params.fetch_meters;
    let wind = params.wind_speed;

    let alpha = check_derived("alpha", 0.076 * (g * fetch / (wind * wind)).powf(-0.22))?;
    let peak_omega = check_derived("peak_omega", 22.0 * (wind * fetch / (g * g)).powf(-0.33))?;

    Ok(ResolvedParameters {
        scale: params.scale,
        spread_blend: params.spread_blend,
        swell: params.swell,
        gamma: params.peak_sharpness,
        short_waves_fade: params.short_waves_fade,
        depth: params.water_depth_meters,
        repeat_time: params.repeat_time_seconds,
        gravity: g,
        wind_angle: params.wind_direction_degrees.to_radians(),
        alpha,
        peak_omega,
    })
}

impl SimulationParameters {
    /// Shorthand for `resolve(self)`
    pub fn resolve(&self) -> Result<ResolvedParameters> {
        resolve(self)
    }

    /// Spectrum layers with `self` as the primary and `swell` aligned to its sea state.
    pub fn with_swell(&self, swell: Option<&SimulationParameters>) -> Vec<SimulationParameters> {
        let mut layers = vec![*self];
        if let Some(swell) = swell {
            layers.push(swell.sharing_sea_state(self));
        }
        layers
    }

    /// Copy of `self` sharing the sea state of `primary` (depth and loop period).
    pub fn sharing_sea_state(&self, primary: &SimulationParameters) -> Self {
        Self {
            water_depth_meters: primary.water_depth_meters,
            repeat_time_seconds: primary.repeat_time_seconds,
            ..*self
        }
    }
}
