//! Frequency-domain ocean model: directional spectrum synthesis and time evolution.

pub mod evolution;
pub mod jonswap;
pub mod noise;
pub mod synthesizer;

pub use evolution::{
    derivative_channels, height_amplitude, DerivativeTerms, PackedSpectrum, SpectrumChannels, TimeEvolver,
};
pub use noise::GaussianNoise;
pub use synthesizer::{pair_conjugates, spectral_energy, InitialCell, InitialSpectrum, SpectrumBand, SpectrumSynthesizer};
