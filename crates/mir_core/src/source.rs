//! Substance sources: point/area emitters with stochastic respawn.

use rand::Rng;

use crate::config::SourceConfig;
use crate::grid::{SubstanceField, Torus};

/// A single emitter. Fully re-randomized on reincarnation.
#[derive(Debug, Clone)]
pub struct SubstanceSource {
    pub x: usize,
    pub y: usize,
    /// Half-width of the square emission footprint; 0 = single cell.
    pub radius: i32,
    pub substance: usize,
    /// Amount injected per covered cell per tick.
    pub intensity: f32,
    /// Ticks since (re)creation.
    pub age: u64,
}

impl SubstanceSource {
    /// Draws a fresh source: random position, radius within the
    /// configured bounds, a random good substance and a uniform
    /// intensity below the configured maximum.
    ///
    /// `good` must be non-empty; the world skips source creation
    /// entirely when no substance is worth emitting.
    pub fn random<R: Rng>(
        cfg: &SourceConfig,
        torus: Torus,
        good: &[usize],
        rng: &mut R,
    ) -> Self {
        let radius = if cfg.max_radius > cfg.min_radius {
            rng.gen_range(cfg.min_radius..cfg.max_radius)
        } else {
            cfg.max_radius
        };
        Self {
            x: rng.gen_range(0..torus.width),
            y: rng.gen_range(0..torus.height),
            radius,
            substance: good[rng.gen_range(0..good.len())],
            intensity: rng.gen_range(0.0..cfg.max_intensity),
            age: 0,
        }
    }

    /// Injects this source's substance into the field.
    ///
    /// The footprint is the square box `-radius..radius` around the
    /// source (2r×2r cells, the +r edge excluded), wrapped toroidally.
    /// No concentration ceiling is applied.
    pub fn emit(&self, field: &mut SubstanceField) {
        if self.radius == 0 {
            field.add(self.x as i64, self.y as i64, self.substance, self.intensity);
            return;
        }
        for dx in -(self.radius as i64)..self.radius as i64 {
            for dy in -(self.radius as i64)..self.radius as i64 {
                field.add(
                    self.x as i64 + dx,
                    self.y as i64 + dy,
                    self.substance,
                    self.intensity,
                );
            }
        }
    }
}

/// Emission phase: every source emits, then ages by one tick.
pub fn emit_all(sources: &mut [SubstanceSource], field: &mut SubstanceField) {
    for source in sources.iter_mut() {
        source.emit(field);
        source.age += 1;
    }
}

/// Reincarnation phase: each source independently has a `1/lifetime`
/// chance per tick of being fully re-randomized, regardless of its own
/// age. A negative lifetime disables respawn.
pub fn reincarnate_all<R: Rng>(
    sources: &mut [SubstanceSource],
    cfg: &SourceConfig,
    torus: Torus,
    good: &[usize],
    rng: &mut R,
) {
    if cfg.lifetime < 0 || good.is_empty() {
        return;
    }
    let chance = if cfg.lifetime == 0 {
        1.0
    } else {
        1.0 / cfg.lifetime as f64
    };
    for source in sources.iter_mut() {
        if rng.gen_bool(chance) {
            *source = SubstanceSource::random(cfg, torus, good, rng);
        }
    }
}
