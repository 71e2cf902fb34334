//! Ocean configuration loaded from JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::simulation::{resolve, SimulationParameters};
use crate::core::{Error, Result};
use crate::math::{validate_patch_length, validate_size};
use crate::spectrum::SpectrumBand;
use crate::surface::AssemblyParams;

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

/// One simulated patch. Cascades tile at different scales and split the
/// spectrum between them by wavenumber band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    /// Side length of the tiling patch, meters.
    pub patch_length: f32,
    /// Wavenumber band; `None` derives `[1e-4, π·N/L]` from the grid.
    pub band: Option<SpectrumBand>,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            patch_length: 256.0,
            band: None,
        }
    }
}

impl CascadeConfig {
    /// Band actually used for a grid of side `size`.
    pub fn band_for(&self, size: usize) -> SpectrumBand {
        self.band
            .unwrap_or_else(|| SpectrumBand::for_grid(size, self.patch_length))
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full simulation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanConfig {
    /// Texels per side of every cascade (power of two).
    pub grid_size: usize,
    /// Noise seed; cascade `i` uses `seed + i`.
    pub seed: u64,
    /// Wind-sea spectrum layer.
    pub parameters: SimulationParameters,
    /// Optional swell layer. Shares depth and repeat time with `parameters`.
    pub swell: Option<SimulationParameters>,
    /// Choppiness and foam.
    pub assembly: AssemblyParams,
    pub cascades: Vec<CascadeConfig>,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            grid_size: 256,
            seed: 0,
            parameters: SimulationParameters::default(),
            swell: None,
            assembly: AssemblyParams::default(),
            cascades: vec![CascadeConfig::default()],
        }
    }
}

impl OceanConfig {
    /// Every layer with its sea state aligned to the primary layer.
    pub fn layers(&self) -> Vec<SimulationParameters> {
        self.parameters.with_swell(self.swell.as_ref())
    }

    /// Check grid size, cascade geometry and spectrum parameters.
    pub fn validate(&self) -> Result<()> {
        validate_size(self.grid_size)?;
        if self.cascades.is_empty() {
            return Err(Error::invalid("cascades", 0.0, "at least one cascade is required"));
        }
        for cascade in &self.cascades {
            validate_patch_length(cascade.patch_length)?;
            let band = cascade.band_for(self.grid_size);
            if !band.low_cutoff.is_finite() || band.low_cutoff < 0.0 {
                return Err(Error::invalid("low_cutoff", band.low_cutoff, "must be finite and non-negative"));
            }
            if !band.high_cutoff.is_finite() || band.high_cutoff <= band.low_cutoff {
                return Err(Error::invalid("high_cutoff", band.high_cutoff, "must exceed low_cutoff"));
            }
        }
        for layer in self.layers() {
            resolve(&layer)?;
        }
        let [lx, lz] = self.assembly.lambda;
        for value in [lx, lz] {
            if !value.is_finite() {
                return Err(Error::invalid("lambda", value, "must be finite"));
            }
        }
        Ok(())
    }

    /// Load and validate a config file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded ocean config from {}", path.display());
        Ok(config)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = OceanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size, 256);
        assert_eq!(config.cascades.len(), 1);
        assert_eq!(config.layers().len(), 1);
    }

    #[test]
    fn test_derived_band() {
        let cascade = CascadeConfig { patch_length: 100.0, band: None };
        let band = cascade.band_for(64);
        assert_eq!(band.low_cutoff, SpectrumBand::MIN_WAVENUMBER);
        assert!((band.high_cutoff - std::f32::consts::PI * 0.64).abs() < 1e-5);
    }

    #[test]
    fn test_swell_layer_shares_sea_state() {
        let config = OceanConfig {
            parameters: SimulationParameters { water_depth_meters: 12.0, ..Default::default() },
            swell: Some(SimulationParameters { water_depth_meters: 500.0, wind_speed: 4.0, ..Default::default() }),
            ..Default::default()
        };
        let layers = config.layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].water_depth_meters, 12.0);
        assert_eq!(layers[1].wind_speed, 4.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            OceanConfig { grid_size: 100, ..Default::default() },
            OceanConfig { cascades: Vec::new(), ..Default::default() },
            OceanConfig { cascades: vec![CascadeConfig { patch_length: -1.0, band: None }], ..Default::default() },
            OceanConfig {
                cascades: vec![CascadeConfig {
                    patch_length: 50.0,
                    band: Some(SpectrumBand { low_cutoff: 2.0, high_cutoff: 1.0 }),
                }],
                ..Default::default()
            },
            OceanConfig {
                parameters: SimulationParameters { wind_speed: 0.0, ..Default::default() },
                ..Default::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_save_and_load_json() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("nested").join("ocean.json");
        let config = OceanConfig {
            grid_size: 64,
            seed: 42,
            swell: Some(SimulationParameters { wind_speed: 3.0, ..Default::default() }),
            cascades: vec![
                CascadeConfig { patch_length: 250.0, band: None },
                CascadeConfig {
                    patch_length: 17.0,
                    band: Some(SpectrumBand { low_cutoff: 0.8, high_cutoff: 11.0 }),
                },
            ],
            ..Default::default()
        };
        config.save_json(&path).unwrap();
        let loaded = OceanConfig::load_json(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: OceanConfig = serde_json::from_str(r#"{ "grid_size": 32, "parameters": { "wind_speed": 20.0 } }"#).unwrap();
        assert_eq!(config.grid_size, 32);
        assert_eq!(config.parameters.wind_speed, 20.0);
        assert_eq!(config.parameters.fetch_meters, 8000.0);
        assert_eq!(config.assembly.foam.bias, 0.85);
        assert_eq!(config.cascades, vec![CascadeConfig::default()]);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(OceanConfig::load_json(&path), Err(Error::Config(_))));
    }
}
