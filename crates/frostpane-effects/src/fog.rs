//! Frost buffer and condensation drips
//!
//! The fog layer is an erasable alpha buffer: 1.0 is frosted, 0.0 is wiped
//! clear. Strokes punch through the fog (subtractive), they never deposit
//! ink. The buffer is filled opaque at construction, on every entry into the
//! Resetting state, and on every resize — a resize during active fogging
//! must never reveal a stale, undersized buffer.

use frostpane_core::{DisplayPoint, InteractionState};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tunables for the fog/ink loop.
#[derive(Clone, Debug)]
pub struct FogConfig {
    /// Erase stroke width in pixels.
    pub stroke_width: f32,
    /// Radius of the circular cap stamped at the stroke endpoint.
    pub cap_radius: f32,
    /// Fog opacity below which finger strokes are ignored (nothing visible
    /// to erase yet).
    pub min_drawable_opacity: f32,
    /// Chance per actively-erasing frame of spawning a drip.
    pub drip_spawn_chance: f64,
    /// Chance per frame of a drip jittering sideways.
    pub drip_jitter_chance: f64,
    /// Horizontal scatter of a new drip around the erase point, pixels.
    pub drip_scatter_x: f32,
    /// How far below the erase point a drip starts, pixels.
    pub drip_offset_y: f32,
    /// Fall speed range, pixels per frame.
    pub drip_speed_min: f32,
    pub drip_speed_max: f32,
    /// Drip radius range, pixels.
    pub drip_radius_min: f32,
    pub drip_radius_max: f32,
    /// Drip lifetime range, frames.
    pub drip_life_min: u32,
    pub drip_life_max: u32,
}

impl Default for FogConfig {
    fn default() -> Self {
        FogConfig {
            stroke_width: 60.0,
            cap_radius: 35.0,
            min_drawable_opacity: 0.2,
            drip_spawn_chance: 0.3,
            drip_jitter_chance: 0.2,
            drip_scatter_x: 20.0,
            drip_offset_y: 20.0,
            drip_speed_min: 1.0,
            drip_speed_max: 3.0,
            drip_radius_min: 2.0,
            drip_radius_max: 5.0,
            drip_life_min: 50,
            drip_life_max: 150,
        }
    }
}

/// A falling condensation drip. Erases a small circle wherever it passes.
#[derive(Debug, Clone, Copy)]
pub struct Drip {
    pub x: f32,
    pub y: f32,
    pub fall_speed: f32,
    pub radius: f32,
    pub life: u32,
}

/// The persistent, erasable fog buffer plus its drip population. Owned and
/// mutated by exactly one render loop.
pub struct FrostCanvas {
    width: usize,
    height: usize,
    alpha: Vec<f32>,
    drips: Vec<Drip>,
    last_point: Option<DisplayPoint>,
    in_reset: bool,
    config: FogConfig,
    rng: StdRng,
}

impl FrostCanvas {
    pub fn new(width: usize, height: usize, config: FogConfig) -> Self {
        Self::with_rng(width, height, config, StdRng::from_entropy())
    }

    /// Seeded constructor for deterministic tests.
    pub fn with_seed(width: usize, height: usize, config: FogConfig, seed: u64) -> Self {
        Self::with_rng(width, height, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: usize, height: usize, config: FogConfig, rng: StdRng) -> Self {
        FrostCanvas {
            width,
            height,
            alpha: vec![1.0; width * height],
            drips: Vec::new(),
            last_point: None,
            in_reset: false,
            config,
            rng,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Frost alpha at a pixel, 1.0 = frosted. Out-of-range reads as clear.
    pub fn alpha_at(&self, x: usize, y: usize) -> f32 {
        if x >= self.width || y >= self.height {
            return 0.0;
        }
        self.alpha[y * self.width + x]
    }

    /// The raw buffer, row-major, for a renderer to composite.
    pub fn alpha(&self) -> &[f32] {
        &self.alpha
    }

    /// Fraction of the buffer still frosted.
    pub fn frost_coverage(&self) -> f32 {
        if self.alpha.is_empty() {
            return 0.0;
        }
        let frosted = self.alpha.iter().filter(|&&a| a > 0.5).count();
        frosted as f32 / self.alpha.len() as f32
    }

    pub fn drips(&self) -> &[Drip] {
        &self.drips
    }

    /// Reprovision for a new viewport. Refills opaque and drops drips: the
    /// old buffer is the wrong size and must never show through.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.alpha = vec![1.0; width * height];
        self.drips.clear();
        self.last_point = None;
    }

    /// One render frame. Reads the latest draw point, the coarse state (for
    /// reset detection), and the current fog opacity.
    pub fn step(
        &mut self,
        draw_point: Option<DisplayPoint>,
        state: InteractionState,
        fog_opacity: f32,
    ) {
        if state == InteractionState::Resetting {
            // Clear once per Resetting entry, not once per frame in it.
            if !self.in_reset {
                self.fill_frost();
                self.drips.clear();
                self.last_point = None;
                self.in_reset = true;
            }
        } else {
            self.in_reset = false;
        }

        match draw_point.filter(|_| fog_opacity >= self.config.min_drawable_opacity) {
            Some(point) => {
                let (x, y) = point.to_pixels(self.width as f32, self.height as f32);

                if let Some(last) = self.last_point {
                    let (lx, ly) = last.to_pixels(self.width as f32, self.height as f32);
                    self.erase_stroke(lx, ly, x, y);
                }
                self.erase_circle(x, y, self.config.cap_radius);
                self.maybe_spawn_drip(x, y);

                self.last_point = Some(point);
            }
            None => {
                // A lifted finger must not connect the next stroke to a
                // stale prior location.
                self.last_point = None;
            }
        }

        self.age_drips();
    }

    /// Refill the whole buffer opaque.
    pub fn fill_frost(&mut self) {
        self.alpha.fill(1.0);
    }

    /// Erase a round-capped stroke by stamping circles along the segment.
    fn erase_stroke(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        let radius = self.config.stroke_width / 2.0;
        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();

        let step = (radius / 2.0).max(1.0);
        let stamps = (length / step).ceil() as usize;

        for i in 0..=stamps {
            let t = if stamps == 0 { 0.0 } else { i as f32 / stamps as f32 };
            self.erase_circle(x0 + dx * t, y0 + dy * t, radius);
        }
    }

    /// Punch a clear circle through the fog (subtractive compositing).
    fn erase_circle(&mut self, cx: f32, cy: f32, radius: f32) {
        let min_x = ((cx - radius).floor().max(0.0)) as usize;
        let min_y = ((cy - radius).floor().max(0.0)) as usize;
        let max_x = ((cx + radius).ceil().min(self.width as f32)) as usize;
        let max_y = ((cy + radius).ceil().min(self.height as f32)) as usize;
        let r2 = radius * radius;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.alpha[y * self.width + x] = 0.0;
                }
            }
        }
    }

    fn maybe_spawn_drip(&mut self, x: f32, y: f32) {
        if !self.rng.gen_bool(self.config.drip_spawn_chance) {
            return;
        }
        let cfg = &self.config;
        let drip = Drip {
            x: x + self.rng.gen_range(-cfg.drip_scatter_x..=cfg.drip_scatter_x),
            y: y + cfg.drip_offset_y,
            fall_speed: self.rng.gen_range(cfg.drip_speed_min..=cfg.drip_speed_max),
            radius: self.rng.gen_range(cfg.drip_radius_min..=cfg.drip_radius_max),
            life: self.rng.gen_range(cfg.drip_life_min..=cfg.drip_life_max),
        };
        self.drips.push(drip);
    }

    /// Advance every live drip one frame: fall, jitter, erase, decay, cull.
    fn age_drips(&mut self) {
        let mut drips = std::mem::take(&mut self.drips);

        for drip in &mut drips {
            drip.y += drip.fall_speed;
            if self.rng.gen_bool(self.config.drip_jitter_chance) {
                drip.x += self.rng.gen_range(-1.0..=1.0);
            }
            self.erase_circle(drip.x, drip.y, drip.radius);
            drip.life = drip.life.saturating_sub(1);
        }

        drips.retain(|d| d.life > 0 && d.y <= self.height as f32);
        self.drips = drips;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> FrostCanvas {
        FrostCanvas::with_seed(200, 200, FogConfig::default(), 7)
    }

    fn drawing_at(x: f32, y: f32) -> Option<DisplayPoint> {
        Some(DisplayPoint::new(x, y))
    }

    #[test]
    fn test_starts_fully_frosted() {
        let canvas = canvas();
        assert_eq!(canvas.frost_coverage(), 1.0);
        assert_eq!(canvas.alpha_at(100, 100), 1.0);
    }

    #[test]
    fn test_erase_punches_through() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.5, 0.5), InteractionState::Drawing, 0.95);

        assert_eq!(canvas.alpha_at(100, 100), 0.0);
        assert!(canvas.frost_coverage() < 1.0);
    }

    #[test]
    fn test_low_opacity_gates_erasing() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.5, 0.5), InteractionState::Drawing, 0.1);

        assert_eq!(canvas.frost_coverage(), 1.0);
    }

    #[test]
    fn test_consecutive_points_connect() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.1, 0.5), InteractionState::Drawing, 0.95);
        canvas.step(drawing_at(0.9, 0.5), InteractionState::Drawing, 0.95);

        // Midpoint of the stroke is erased even though no cap landed there.
        assert_eq!(canvas.alpha_at(100, 100), 0.0);
    }

    #[test]
    fn test_lifted_finger_does_not_connect() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.1, 0.1), InteractionState::Drawing, 0.95);
        canvas.step(None, InteractionState::Drawing, 0.95);
        canvas.step(drawing_at(0.9, 0.9), InteractionState::Drawing, 0.95);

        // The straight line between the two touches stays frosted.
        assert_eq!(canvas.alpha_at(100, 100), 1.0);
    }

    #[test]
    fn test_drips_spawn_while_erasing() {
        let mut canvas = canvas();

        for i in 0..30 {
            let x = 0.2 + i as f32 * 0.01;
            canvas.step(drawing_at(x, 0.3), InteractionState::Drawing, 0.95);
        }

        assert!(!canvas.drips().is_empty());
    }

    #[test]
    fn test_drip_population_decays_after_lift() {
        let mut canvas = canvas();

        for i in 0..30 {
            let x = 0.2 + i as f32 * 0.01;
            canvas.step(drawing_at(x, 0.3), InteractionState::Drawing, 0.95);
        }
        let mut previous = canvas.drips().len();
        assert!(previous > 0);

        // No spawning once the finger lifts; population only shrinks.
        for _ in 0..400 {
            canvas.step(None, InteractionState::Drawing, 0.95);
            let current = canvas.drips().len();
            assert!(current <= previous);
            previous = current;
        }
        assert_eq!(canvas.drips().len(), 0);
    }

    #[test]
    fn test_reset_refills_once_per_entry() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.5, 0.5), InteractionState::Drawing, 0.95);
        assert!(canvas.frost_coverage() < 1.0);

        canvas.step(None, InteractionState::Resetting, 0.5);
        assert_eq!(canvas.frost_coverage(), 1.0);
        assert!(canvas.drips().is_empty());

        // Still in Resetting: the buffer is not refilled again, so later
        // frames could in principle erase (they don't, signal is idle).
        canvas.step(None, InteractionState::Resetting, 0.5);
        canvas.step(None, InteractionState::Clear, 0.0);

        // A fresh Resetting entry refills again after new strokes.
        canvas.step(drawing_at(0.5, 0.5), InteractionState::Drawing, 0.95);
        assert!(canvas.frost_coverage() < 1.0);
        canvas.step(None, InteractionState::Resetting, 0.5);
        assert_eq!(canvas.frost_coverage(), 1.0);
    }

    #[test]
    fn test_resize_refills_opaque() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.5, 0.5), InteractionState::Drawing, 0.95);
        canvas.resize(300, 150);

        assert_eq!(canvas.width(), 300);
        assert_eq!(canvas.height(), 150);
        assert_eq!(canvas.frost_coverage(), 1.0);
        assert!(canvas.drips().is_empty());
    }

    #[test]
    fn test_resize_breaks_stroke_continuity() {
        let mut canvas = canvas();

        canvas.step(drawing_at(0.1, 0.1), InteractionState::Drawing, 0.95);
        canvas.resize(200, 200);
        canvas.step(drawing_at(0.9, 0.9), InteractionState::Drawing, 0.95);

        assert_eq!(canvas.alpha_at(100, 100), 1.0);
    }
}
