//! Snowflake population
//!
//! Spawning follows the snow-active signal instantly, but dying does not:
//! when the signal drops, live flakes keep falling to completion. The
//! deliberate contrast with the fog buffer (which IS forcibly cleared on
//! reset) keeps the snow from popping out of existence mid-air.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tunables for the snow loop.
#[derive(Clone, Debug)]
pub struct SnowConfig {
    /// Hard cap on live flakes.
    pub max_flakes: usize,
    /// How far above/below the viewport flakes spawn and die, pixels.
    pub spawn_margin: f32,
    /// Glyph size range, pixels.
    pub size_min: f32,
    pub size_max: f32,
    /// Fall speed range, pixels per frame.
    pub fall_min: f32,
    pub fall_max: f32,
    /// Maximum linear horizontal drift, pixels per frame.
    pub drift_max: f32,
    /// Opacity range.
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Sinusoidal sway: phase advance per pixel fallen, and amplitude.
    pub sway_frequency: f32,
    pub sway_amplitude: f32,
    /// Fraction of the linear drift applied per frame.
    pub drift_factor: f32,
}

impl Default for SnowConfig {
    fn default() -> Self {
        SnowConfig {
            max_flakes: 100,
            spawn_margin: 50.0,
            size_min: 20.0,
            size_max: 60.0,
            fall_min: 0.5,
            fall_max: 2.0,
            drift_max: 1.0,
            opacity_min: 0.4,
            opacity_max: 0.9,
            sway_frequency: 0.01,
            sway_amplitude: 0.5,
            drift_factor: 0.2,
        }
    }
}

/// One falling snowflake. A renderer draws the glyph at the current
/// position, size and opacity.
#[derive(Debug, Clone, Copy)]
pub struct Snowflake {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub fall_speed: f32,
    pub drift: f32,
    pub opacity: f32,
}

/// The persistent snowflake population. Owned and mutated by exactly one
/// render loop.
pub struct SnowField {
    width: f32,
    height: f32,
    flakes: Vec<Snowflake>,
    config: SnowConfig,
    rng: StdRng,
}

impl SnowField {
    pub fn new(width: f32, height: f32, config: SnowConfig) -> Self {
        Self::with_rng(width, height, config, StdRng::from_entropy())
    }

    /// Seeded constructor for deterministic tests.
    pub fn with_seed(width: f32, height: f32, config: SnowConfig, seed: u64) -> Self {
        Self::with_rng(width, height, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f32, height: f32, config: SnowConfig, rng: StdRng) -> Self {
        SnowField {
            width,
            height,
            flakes: Vec::new(),
            config,
            rng,
        }
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn population(&self) -> usize {
        self.flakes.len()
    }

    /// Adopt a new viewport size. Live flakes are untouched; they will cull
    /// against the new bottom edge.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// One render frame: maybe spawn, then age every flake.
    pub fn step(&mut self, snow_active: bool) {
        if snow_active && self.flakes.len() < self.config.max_flakes {
            self.spawn();
        }

        let cfg = &self.config;
        for flake in &mut self.flakes {
            flake.y += flake.fall_speed;
            flake.x += (flake.y * cfg.sway_frequency).sin() * cfg.sway_amplitude
                + flake.drift * cfg.drift_factor;
        }

        let floor = self.height + self.config.spawn_margin;
        self.flakes.retain(|f| f.y <= floor);
    }

    fn spawn(&mut self) {
        if self.width <= 0.0 {
            return;
        }
        let cfg = &self.config;
        let flake = Snowflake {
            x: self.rng.gen_range(0.0..self.width),
            y: -cfg.spawn_margin,
            size: self.rng.gen_range(cfg.size_min..=cfg.size_max),
            fall_speed: self.rng.gen_range(cfg.fall_min..=cfg.fall_max),
            drift: self.rng.gen_range(-cfg.drift_max..=cfg.drift_max),
            opacity: self.rng.gen_range(cfg.opacity_min..=cfg.opacity_max),
        };
        self.flakes.push(flake);
    }
}
