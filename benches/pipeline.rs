use criterion::{criterion_group, criterion_main, Criterion, black_box};

use rktri_ocean::core::Complex32;
use rktri_ocean::fft::SpectralTransform;
use rktri_ocean::math::Grid;
use rktri_ocean::params::{CascadeConfig, SimulationParameters};
use rktri_ocean::simulation::OceanCascade;
use rktri_ocean::spectrum::{GaussianNoise, SpectrumSynthesizer};
use rktri_ocean::surface::AssemblyParams;

fn cascade(size: usize) -> OceanCascade {
    let config = CascadeConfig { patch_length: 256.0, band: None };
    OceanCascade::new(size, &config, &[SimulationParameters::default()], AssemblyParams::default(), 0)
        .expect("valid cascade")
}

fn bench_frame_128(c: &mut Criterion) {
    let mut ocean = cascade(128);

    c.bench_function("ocean_frame_128", |b| {
        let mut time = 0.0f64;
        b.iter(|| {
            time += 1.0 / 60.0;
            ocean.step(black_box(time)).map(|frame| frame.frame_index)
        });
    });
}

fn bench_frame_256(c: &mut Criterion) {
    let mut ocean = cascade(256);

    c.bench_function("ocean_frame_256", |b| {
        let mut time = 0.0f64;
        b.iter(|| {
            time += 1.0 / 60.0;
            ocean.step(black_box(time)).map(|frame| frame.frame_index)
        });
    });
}

fn bench_inverse_fft_256(c: &mut Criterion) {
    let mut transform = SpectralTransform::<[Complex32; 2]>::new(256).expect("power of two");
    let mut grid = Grid::from_fn(256, |x, y| {
        [Complex32::new(x as f32, y as f32), Complex32::new(y as f32, -(x as f32))]
    })
    .expect("power of two");

    c.bench_function("inverse_fft_2d_256_packed", |b| {
        b.iter(|| transform.inverse_transform_2d(black_box(&mut grid)))
    });
}

fn bench_synthesize_256(c: &mut Criterion) {
    let synthesizer = SpectrumSynthesizer::new(256, 256.0).expect("valid geometry");
    let resolved = SimulationParameters::default().resolve().expect("default parameters");

    c.bench_function("spectrum_synthesize_256", |b| {
        b.iter(|| synthesizer.synthesize(black_box(&resolved), GaussianNoise::new(1)))
    });
}

criterion_group!(
    benches,
    bench_frame_128,
    bench_frame_256,
    bench_inverse_fft_256,
    bench_synthesize_256,
);
criterion_main!(benches);
