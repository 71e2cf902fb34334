//! Ocean bake binary: runs the simulation offline and writes a preview image.
//!
//! Usage: cargo run --release --bin bake_ocean -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>   Ocean config JSON (default: built-in defaults)
//!   --frames <N>      Frames to simulate (default: 120)
//!   --fps <F>         Simulation frames per second (default: 30)
//!   --grid <N>        Override grid size (power of two)
//!   --seed <SEED>     Override noise seed
//!   --out <PATH>      Output PNG (default: "ocean_preview.png")
//!   --save-config <PATH>  Write the effective config as JSON
//!
//! The preview shows the first cascade: height as shades of blue with foam
//! blended towards white.

use std::path::PathBuf;
use std::time::Instant;

use image::{Rgb, RgbImage};

use rktri_ocean::core::{logging, Error, Result};
use rktri_ocean::params::OceanConfig;
use rktri_ocean::simulation::OceanSystem;
use rktri_ocean::surface::DisplacementField;

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("bake_ocean failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let frames = parse_u64_arg(&args, "--frames").unwrap_or(120);
    let fps = parse_f64_arg(&args, "--fps").unwrap_or(30.0);
    let out = parse_str_arg(&args, "--out").unwrap_or_else(|| "ocean_preview.png".to_string());

    let mut config = match parse_str_arg(&args, "--config") {
        Some(path) => OceanConfig::load_json(&PathBuf::from(path))?,
        None => OceanConfig::default(),
    };
    if let Some(grid) = parse_usize_arg(&args, "--grid") {
        config.grid_size = grid;
    }
    if let Some(seed) = parse_u64_arg(&args, "--seed") {
        config.seed = seed;
    }
    if let Some(path) = parse_str_arg(&args, "--save-config") {
        config.save_json(&PathBuf::from(path))?;
    }
    if !(fps.is_finite() && fps > 0.0) {
        return Err(Error::InvalidParameter {
            name: "fps",
            value: fps,
            reason: "must be a positive finite rate",
        });
    }

    println!("=== Rktri Ocean Bake ===");
    println!("Grid:     {}x{}", config.grid_size, config.grid_size);
    println!("Cascades: {}", config.cascades.len());
    println!("Seed:     {}", config.seed);
    println!("Frames:   {} at {} fps", frames, fps);
    println!("Output:   {}", out);
    println!();

    let mut system = OceanSystem::new(&config)?;
    let dt = 1.0 / fps;
    let start = Instant::now();
    for frame in 0..frames {
        system.advance(dt)?;
        if (frame + 1) % 30 == 0 || frame + 1 == frames {
            eprintln!("  [{}/{}] t = {:.2}s", frame + 1, frames, system.clock().time());
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "Simulated {} frames in {:.2}s ({:.1} ms/frame)",
        frames,
        elapsed,
        elapsed * 1000.0 / frames.max(1) as f64,
    );

    let Some(cascade) = system.cascades().first() else {
        return Ok(());
    };
    let displacement = &cascade.surface().displacement;
    let (low, high) = displacement.height_range();
    println!("Height range: [{:.3}, {:.3}] m, mean foam {:.4}", low, high, displacement.mean_foam());

    render_preview(displacement)
        .save(&out)
        .map_err(|e| Error::Image(e.to_string()))?;
    println!("Wrote {}", out);
    Ok(())
}

fn render_preview(displacement: &DisplacementField) -> RgbImage {
    let size = displacement.size() as u32;
    let (low, high) = displacement.height_range();
    let span = (high - low).max(1e-6);

    RgbImage::from_fn(size, size, |x, y| {
        let texel = displacement.texel(x as usize, y as usize);
        let height = ((texel.y - low) / span).clamp(0.0, 1.0);
        let foam = texel.w.clamp(0.0, 1.0);
        let water = [0.05 + 0.25 * height, 0.2 + 0.4 * height, 0.35 + 0.45 * height];
        let rgb = water.map(|c| ((c + (1.0 - c) * foam) * 255.0).round() as u8);
        Rgb(rgb)
    })
}

fn parse_f64_arg(args: &[String], flag: &str) -> Option<f64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_u64_arg(args: &[String], flag: &str) -> Option<u64> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
