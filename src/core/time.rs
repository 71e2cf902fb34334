//! Simulation clock

use std::time::{Duration, Instant};

/// Monotonic simulation time driven by real frame deltas.
///
/// Simulation time is kept in `f64` so long sessions keep sub-millisecond
/// resolution; the time evolver reduces phases modulo the repeat period.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    time: f64,
    time_scale: f64,
    paused: bool,
    frame_count: u64,
    last_tick: Option<Instant>,
}

impl SimulationClock {
    /// Create a clock starting at `start_time` seconds
    pub fn new(start_time: f64) -> Self {
        Self {
            time: start_time,
            time_scale: 1.0,
            paused: false,
            frame_count: 0,
            last_tick: None,
        }
    }

    /// Advance by a fixed real-time delta (seconds). Negative deltas are ignored.
    pub fn advance(&mut self, dt: f64) -> f64 {
        self.frame_count += 1;
        if !self.paused && dt > 0.0 {
            self.time += dt * self.time_scale;
        }
        self.time
    }

    /// Advance by the wall-clock time since the previous tick
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map(|last| now - last)
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.advance(dt.as_secs_f64())
    }

    /// Current simulation time in seconds
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Number of ticks so far (paused ticks included)
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}
