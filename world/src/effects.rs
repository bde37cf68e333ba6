//! Short-lived presentation state and the DPS meter.

use std::time::Duration;

use merge_arena_core::{balance::DPS_WINDOW, Vec2};
use rand::Rng;

const PARTICLE_LIFE: Duration = Duration::from_millis(500);
const PARTICLE_GRAVITY: f32 = 100.0;
const DAMAGE_TEXT_RISE: f32 = 50.0;
const GOLD_TEXT_RISE: f32 = 30.0;

/// Death particle flying away from a killed enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Position in world units.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Time left before the particle disappears.
    pub remaining: Duration,
    /// Rendered size.
    pub size: f32,
    /// Whether the particle belongs to a boss burst.
    pub boss: bool,
}

/// What a floating text displays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextKind {
    /// Damage dealt by a hit.
    Damage {
        /// Whether the hit was critical.
        crit: bool,
    },
    /// Gold earned from a kill.
    Gold,
}

/// Number rising above the battlefield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloatingText {
    /// Position in world units.
    pub position: Vec2,
    /// Displayed value.
    pub value: u64,
    /// Kind of text.
    pub kind: TextKind,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

#[derive(Debug, Default)]
pub(crate) struct Effects {
    particles: Vec<Particle>,
    texts: Vec<FloatingText>,
}

impl Effects {
    pub(crate) fn burst<R: Rng>(&mut self, rng: &mut R, position: Vec2, boss: bool) {
        let (count, size) = if boss { (20, 8.0) } else { (8, 4.0) };
        for _ in 0..count {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = 50.0 + rng.gen::<f32>() * 100.0;
            self.particles.push(Particle {
                position,
                velocity: Vec2::from_angle(angle) * speed,
                remaining: PARTICLE_LIFE,
                size,
                boss,
            });
        }
    }

    pub(crate) fn damage_number(&mut self, position: Vec2, amount: f64, crit: bool) {
        self.texts.push(FloatingText {
            position,
            value: amount.max(0.0).floor() as u64,
            kind: TextKind::Damage { crit },
            alpha: 1.0,
        });
    }

    pub(crate) fn gold_text(&mut self, position: Vec2, gold: u64) {
        self.texts.push(FloatingText {
            position,
            value: gold,
            kind: TextKind::Gold,
            alpha: 1.0,
        });
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        let secs = dt.as_secs_f32();

        self.particles.retain_mut(|particle| {
            particle.position += particle.velocity * secs;
            particle.velocity.y += PARTICLE_GRAVITY * secs;
            particle.remaining = particle.remaining.saturating_sub(dt);
            !particle.remaining.is_zero()
        });

        self.texts.retain_mut(|text| {
            let (rise, fade) = match text.kind {
                TextKind::Damage { .. } => (DAMAGE_TEXT_RISE, 2.0),
                TextKind::Gold => (GOLD_TEXT_RISE, 1.0),
            };
            text.position.y -= rise * secs;
            text.alpha -= fade * secs;
            text.alpha > 0.0
        });
    }

    pub(crate) fn clear(&mut self) {
        self.particles.clear();
        self.texts.clear();
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn texts(&self) -> &[FloatingText] {
        &self.texts
    }
}

/// Sums landed damage and publishes it once per window.
#[derive(Debug, Default)]
pub(crate) struct DpsMeter {
    window_total: f64,
    elapsed: Duration,
    published: f64,
}

impl DpsMeter {
    pub(crate) fn record(&mut self, amount: f64) {
        self.window_total += amount;
    }

    /// Returns the finished window's total when a window boundary is crossed.
    pub(crate) fn advance(&mut self, dt: Duration) -> Option<f64> {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed < DPS_WINDOW {
            return None;
        }

        let window = DPS_WINDOW.as_nanos();
        let carried = self.elapsed.as_nanos() % window;
        self.elapsed = Duration::from_nanos(u64::try_from(carried).unwrap_or(0));
        self.published = self.window_total;
        self.window_total = 0.0;
        Some(self.published)
    }

    pub(crate) fn published(&self) -> f64 {
        self.published
    }
}
