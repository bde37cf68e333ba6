use std::{f32::consts::TAU, time::Duration};

use merge_arena_core::{
    resolve_hero_stats, EnemyId, HeroClassId, HeroSnapshot, HeroStats, HeroTarget, MergeGrid,
    UpgradeLevels, Vec2,
};
use rand::Rng;

use crate::World;

const WANDER_INTERVAL: Duration = Duration::from_millis(2_000);
const JITTER_INTERVAL: Duration = Duration::from_millis(1_000);
const WANDER_TURN: f32 = 0.5;
const WANDER_RING: f32 = 0.3;
const WANDER_ARRIVAL: f32 = 5.0;
const JITTER_STEP: f32 = 2.0;
const FORMATION_RING: f32 = 0.5;

#[derive(Debug)]
pub(crate) struct Hero {
    pub(crate) class: HeroClassId,
    pub(crate) position: Vec2,
    pub(crate) stats: HeroStats,
    pub(crate) target: Option<EnemyId>,
    wander_angle: f32,
    wander_point: Vec2,
    wander_timer: Duration,
    jitter_timer: Duration,
    pub(crate) last_attack: Option<Duration>,
    pub(crate) power_strike: Option<f64>,
}

impl Hero {
    pub(crate) fn ready_in(&self, clock: Duration) -> Duration {
        let Some(last) = self.last_attack else {
            return Duration::ZERO;
        };
        last.checked_add(self.stats.attack_interval())
            .unwrap_or(Duration::MAX)
            .saturating_sub(clock)
    }

    pub(crate) fn snapshot(&self, clock: Duration) -> HeroSnapshot {
        HeroSnapshot {
            hero: self.class,
            position: self.position,
            target: self.target,
            stats: self.stats,
            ready_in: self.ready_in(clock),
        }
    }

    fn steer<R: Rng>(&mut self, dt: Duration, goal: Option<Vec2>, rng: &mut R, home: Vec2, ring: f32) {
        let secs = dt.as_secs_f32();
        let speed = self.stats.move_speed as f32;

        if let Some(goal) = goal {
            let offset = goal - self.position;
            let distance = offset.length();
            if distance > self.stats.range as f32 {
                let step = (speed * secs).min(distance);
                self.position += offset / distance * step;
                self.jitter_timer = Duration::ZERO;
                return;
            }

            self.jitter_timer = self.jitter_timer.saturating_add(dt);
            if self.jitter_timer >= JITTER_INTERVAL {
                self.jitter_timer = Duration::ZERO;
                let angle = rng.gen_range(0.0..TAU);
                self.position += Vec2::from_angle(angle) * JITTER_STEP;
            }
            return;
        }

        self.wander_timer = self.wander_timer.saturating_add(dt);
        if self.wander_timer >= WANDER_INTERVAL {
            self.wander_timer = Duration::ZERO;
            self.wander_angle += rng.gen_range(-WANDER_TURN..=WANDER_TURN);
            self.wander_point = home + Vec2::from_angle(self.wander_angle) * ring;
        }

        let offset = self.wander_point - self.position;
        let distance = offset.length();
        if distance > WANDER_ARRIVAL {
            let step = (speed * 0.5 * secs).min(distance);
            self.position += offset / distance * step;
        }
    }
}

impl World {
    /// Lays the unlocked heroes out on a ring around the arena center.
    pub(crate) fn rebuild_heroes(&mut self) {
        let classes: Vec<HeroClassId> = self.profile.unlocked_classes().collect();
        let count = classes.len().max(1) as f32;
        let center = self.arena.center();
        let radius = self.arena.center_radius() * FORMATION_RING;

        self.heroes = classes
            .into_iter()
            .enumerate()
            .map(|(index, class)| {
                let angle = TAU * index as f32 / count;
                let position = center + Vec2::from_angle(angle) * radius;
                let wander_timer =
                    Duration::from_millis(self.rng.gen_range(0..WANDER_INTERVAL.as_millis() as u64));
                Hero {
                    class,
                    position,
                    stats: hero_stats(class, self.profile.grid(class), &self.profile.upgrades),
                    target: None,
                    wander_angle: angle,
                    wander_point: position,
                    wander_timer,
                    jitter_timer: Duration::ZERO,
                    last_attack: None,
                    power_strike: None,
                }
            })
            .collect();
    }

    /// Recomputes every hero's stats after a grid or upgrade change.
    pub(crate) fn refresh_hero_stats(&mut self) {
        for hero in &mut self.heroes {
            hero.stats = hero_stats(hero.class, self.profile.grid(hero.class), &self.profile.upgrades);
        }
    }

    pub(crate) fn hero_mut(&mut self, class: HeroClassId) -> Option<&mut Hero> {
        self.heroes.iter_mut().find(|hero| hero.class == class)
    }

    pub(crate) fn steer_heroes(&mut self, dt: Duration, targets: &[HeroTarget]) {
        let home = self.arena.center();
        let ring = self.arena.center_radius() * WANDER_RING;

        for hero in &mut self.heroes {
            let assigned = targets
                .iter()
                .find(|target| target.hero == hero.class)
                .and_then(|target| self.enemies.get(&target.enemy));
            hero.target = assigned.map(|enemy| enemy.id);
            let goal = assigned.map(|enemy| enemy.position);

            hero.steer(dt, goal, &mut self.rng, home, ring);
            hero.position = self.arena.clamp_hero(hero.position);
        }
    }
}

fn hero_stats(
    class: HeroClassId,
    grid: Option<&MergeGrid>,
    upgrades: &UpgradeLevels,
) -> HeroStats {
    let empty = MergeGrid::new();
    resolve_hero_stats(class, grid.unwrap_or(&empty), upgrades)
}
