//! Directional JONSWAP wave spectrum with TMA shallow-water correction.
//!
//! All functions are pure and evaluated per cell. Angular frequencies are in
//! rad/s, wavenumbers in rad/m.

use std::f32::consts::PI;

use crate::math::WaveVector;
use crate::params::ResolvedParameters;

/// `k·depth` is clamped here before `tanh`/`cosh` (both saturate long before).
const MAX_KH: f32 = 20.0;

// ---------------------------------------------------------------------------
// Dispersion
// ---------------------------------------------------------------------------

/// Finite-depth dispersion relation `ω = sqrt(g·k·tanh(k·h))`.
#[inline]
pub fn dispersion(k: f32, gravity: f32, depth: f32) -> f32 {
    (gravity * k * (k * depth).min(MAX_KH).tanh()).sqrt()
}

/// Analytic `dω/dk` of [`dispersion`]. Zero where `ω` is zero.
#[inline]
pub fn dispersion_derivative(k: f32, gravity: f32, depth: f32) -> f32 {
    let omega = dispersion(k, gravity, depth);
    if omega <= 0.0 {
        return 0.0;
    }
    let kh = (k * depth).min(MAX_KH);
    let ch = kh.cosh();
    gravity * (depth * k / (ch * ch) + kh.tanh()) / omega / 2.0
}

// ---------------------------------------------------------------------------
// Frequency spectrum
// ---------------------------------------------------------------------------

/// Kitaigorodskii depth attenuation (TMA correction), 1.0 in deep water.
pub fn tma_correction(omega: f32, gravity: f32, depth: f32) -> f32 {
    let omega_h = omega * (depth / gravity).sqrt();
    if omega_h <= 1.0 {
        0.5 * omega_h * omega_h
    } else if omega_h < 2.0 {
        1.0 - 0.5 * (2.0 - omega_h) * (2.0 - omega_h)
    } else {
        1.0
    }
}

/// Peak-enhanced Pierson-Moskowitz (JONSWAP) energy density at `omega`.
pub fn jonswap(omega: f32, p: &ResolvedParameters) -> f32 {
    let peak = p.peak_omega;
    let sigma = if omega <= peak { 0.07 } else { 0.09 };
    let d = omega - peak;
    let r = (-d * d / (2.0 * sigma * sigma * peak * peak)).exp();

    let inv_omega = 1.0 / omega;
    let peak_over_omega = peak * inv_omega;
    p.scale
        * tma_correction(omega, p.gravity, p.depth)
        * p.alpha
        * p.gravity
        * p.gravity
        * inv_omega.powi(5)
        * (-1.25 * peak_over_omega.powi(4)).exp()
        * p.gamma.abs().powf(r)
}

// ---------------------------------------------------------------------------
// Directional spreading
// ---------------------------------------------------------------------------

/// Normalisation of the cos-2s spreading function (polynomial fit of `1/∫`).
pub fn normalization_factor(s: f32) -> f32 {
    let s2 = s * s;
    let s3 = s2 * s;
    let s4 = s3 * s;
    if s < 5.0 {
        -0.000564 * s4 + 0.00776 * s3 - 0.044 * s2 + 0.192 * s + 0.163
    } else {
        -4.80e-08 * s4 + 1.07e-05 * s3 - 9.53e-04 * s2 + 5.90e-02 * s + 3.93e-01
    }
}

/// Cosine-power spreading `Q(s)·|cos(θ/2)|^2s`.
pub fn cosine_2s(theta: f32, s: f32) -> f32 {
    normalization_factor(s) * (0.5 * theta).cos().abs().powf(2.0 * s)
}

/// Mitsuyasu spreading exponent as a function of `ω/ωp`.
pub fn spread_power(omega: f32, peak_omega: f32) -> f32 {
    let ratio = (omega / peak_omega).abs();
    if omega > peak_omega {
        9.77 * ratio.powf(-2.5)
    } else {
        6.97 * ratio.powf(5.0)
    }
}

/// Cardioid-like cos² lobe blended with the swell-sharpened cos-2s term.
///
/// `theta` is the wave heading; both terms are measured relative to the wind.
pub fn direction_spectrum(theta: f32, omega: f32, p: &ResolvedParameters) -> f32 {
    let s = spread_power(omega, p.peak_omega)
        + 16.0 * (omega / p.peak_omega).min(MAX_KH).tanh() * p.swell * p.swell;
    let relative = theta - p.wind_angle;
    let lobe = 2.0 / PI * relative.cos() * relative.cos();
    lobe + (cosine_2s(relative, s) - lobe) * p.spread_blend
}

/// Gaussian attenuation of high-wavenumber energy.
#[inline]
pub fn short_waves_fade(k: f32, fade: f32) -> f32 {
    (-fade * fade * k * k).exp()
}

/// Full directional density `S(ω)·D(θ, ω)·fade(k)` for one layer.
pub fn directional_density(wave: &WaveVector, omega: f32, p: &ResolvedParameters) -> f32 {
    jonswap(omega, p)
        * direction_spectrum(wave.angle(), omega, p)
        * short_waves_fade(wave.magnitude, p.short_waves_fade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GRAVITY;
    use crate::params::{resolve, SimulationParameters};

    fn resolved() -> ResolvedParameters {
        resolve(&SimulationParameters {
            water_depth_meters: 500.0,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_deep_water_dispersion() {
        let k = 0.5;
        let omega = dispersion(k, GRAVITY, 1000.0);
        assert!((omega - (GRAVITY * k).sqrt()).abs() < 1e-5);
    }

    #[test]
    fn test_shallow_water_dispersion() {
        // kh << 1 -> ω ≈ k·sqrt(g·h)
        let k = 0.01;
        let depth = 1.0;
        let omega = dispersion(k, GRAVITY, depth);
        let expected = k * (GRAVITY * depth).sqrt();
        assert!((omega - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_dispersion_derivative_matches_finite_difference() {
        for &(k, depth) in &[(0.05_f32, 5.0_f32), (0.3, 20.0), (2.0, 3.0), (4.0, 500.0)] {
            let h = 1e-3 * k;
            let numeric = (dispersion(k + h, GRAVITY, depth) - dispersion(k - h, GRAVITY, depth)) / (2.0 * h);
            let analytic = dispersion_derivative(k, GRAVITY, depth);
            assert!(
                (numeric - analytic).abs() / analytic < 1e-2,
                "k={k} depth={depth}: numeric {numeric} vs analytic {analytic}"
            );
        }
    }

    #[test]
    fn test_dispersion_derivative_zero_k() {
        assert_eq!(dispersion_derivative(0.0, GRAVITY, 10.0), 0.0);
    }

    #[test]
    fn test_tma_is_one_in_deep_water() {
        assert_eq!(tma_correction(2.0, GRAVITY, 500.0), 1.0);
        assert!(tma_correction(0.1, GRAVITY, 0.5) < 0.01);
    }

    #[test]
    fn test_jonswap_peaks_at_peak_frequency() {
        let p = resolved();
        let peak = p.peak_omega;
        let at_peak = jonswap(peak, &p);
        for factor in [0.7, 0.9, 1.1, 1.5, 3.0] {
            assert!(jonswap(peak * factor, &p) < at_peak, "factor {factor}");
        }
    }

    #[test]
    fn test_jonswap_gamma_enhances_peak_only() {
        let mut p = resolved();
        p.gamma = 1.0;
        let pm = jonswap(p.peak_omega, &p);
        let pm_tail = jonswap(p.peak_omega * 3.0, &p);
        p.gamma = 3.3;
        assert!((jonswap(p.peak_omega, &p) / pm - 3.3).abs() < 1e-3);
        assert!((jonswap(p.peak_omega * 3.0, &p) / pm_tail - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_cosine_2s_is_normalized() {
        const STEPS: usize = 4000;
        for s in [1.0_f32, 3.0, 10.0] {
            let d_theta = 2.0 * PI / STEPS as f32;
            let integral: f32 = (0..STEPS)
                .map(|i| cosine_2s(-PI + (i as f32 + 0.5) * d_theta, s) * d_theta)
                .sum();
            assert!((integral - 1.0).abs() < 0.03, "s={s}: integral {integral}");
        }
    }

    #[test]
    fn test_direction_spectrum_favours_wind() {
        let p = resolved();
        let omega = p.peak_omega;
        let downwind = direction_spectrum(p.wind_angle, omega, &p);
        let crosswind = direction_spectrum(p.wind_angle + PI / 2.0, omega, &p);
        assert!(downwind > crosswind * 10.0);
    }

    #[test]
    fn test_short_waves_fade() {
        assert_eq!(short_waves_fade(10.0, 0.0), 1.0);
        assert!(short_waves_fade(100.0, 0.1) < 1e-4);
    }
}
