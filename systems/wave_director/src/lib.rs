#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director that paces campaign waves, boss timers and tower floors.
//!
//! The director never touches the world directly. It listens to the events the
//! world broadcasts, reads a [`ProgressSnapshot`] and replies with commands that
//! spawn enemies, expire bosses and finish waves or floors.

use std::{f32::consts::TAU, time::Duration};

use log::{debug, info};
use merge_arena_core::{
    balance::{
        is_boss_wave, tower_enemy_count, wave_quota, BOSS_TIME_LIMIT, TOWER_MAX_ACTIVE_ENEMIES,
        WAVE_SPAWN_INTERVAL,
    },
    BossKind, Command, EnemyId, EnemyKind, Event, FloorRank, ProgressSnapshot, RunMode,
    SpawnPlan,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters that control the director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval: Duration,
    boss_time_limit: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration for the director.
    #[must_use]
    pub const fn new(spawn_interval: Duration, boss_time_limit: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            boss_time_limit,
            rng_seed,
        }
    }

    /// Simulated time between two spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }

    /// Simulated time a boss may stay before it escapes.
    #[must_use]
    pub const fn boss_time_limit(&self) -> Duration {
        self.boss_time_limit
    }

    /// Seed used to initialise the pseudo-random number generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(WAVE_SPAWN_INTERVAL, BOSS_TIME_LIMIT, 0)
    }
}

/// Timer tracking the boss currently on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BossClock {
    enemy: EnemyId,
    elapsed: Duration,
}

/// Pure system that turns elapsed time and kills into spawn and progress commands.
#[derive(Debug)]
pub struct WaveDirector {
    config: Config,
    rng: ChaCha8Rng,
    accumulator: Duration,
    spawned: u32,
    killed: u32,
    boss_clock: Option<BossClock>,
    floor_remaining: Option<u32>,
}

impl WaveDirector {
    /// Creates a new director using the provided configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            accumulator: Duration::ZERO,
            spawned: 0,
            killed: 0,
            boss_clock: None,
            floor_remaining: None,
        }
    }

    /// Number of enemies spawned for the current wave or floor.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Number of kills credited to the current wave.
    #[must_use]
    pub const fn killed(&self) -> u32 {
        self.killed
    }

    /// Simulated time the tracked boss has been on the field, if any.
    #[must_use]
    pub fn boss_elapsed(&self) -> Option<Duration> {
        self.boss_clock.map(|clock| clock.elapsed)
    }

    /// Consumes world events and emits the commands that keep the run moving.
    pub fn handle(&mut self, events: &[Event], progress: ProgressSnapshot, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            match event {
                Event::RunModeChanged { .. } => {
                    self.reset();
                    elapsed = Duration::ZERO;
                }
                Event::EnemyKilled { enemy, .. } | Event::EnemyEscaped { enemy } => {
                    self.killed = self.killed.saturating_add(1);
                    self.forget_boss(*enemy);
                }
                Event::BossAppeared { enemy, .. } => {
                    if progress.mode.runs_waves() {
                        self.boss_clock = Some(BossClock {
                            enemy: *enemy,
                            elapsed: Duration::ZERO,
                        });
                    }
                }
                Event::BossTimedOut { enemy } => self.forget_boss(*enemy),
                Event::TimeAdvanced { dt } => elapsed = elapsed.saturating_add(*dt),
                _ => {}
            }
        }

        match progress.mode {
            RunMode::Campaign | RunMode::Challenge(_) => self.run_wave(elapsed, progress, out),
            RunMode::Tower => self.run_floor(elapsed, progress, out),
        }
    }

    fn run_wave(&mut self, elapsed: Duration, progress: ProgressSnapshot, out: &mut Vec<Command>) {
        if let Some(clock) = self.boss_clock.as_mut() {
            clock.elapsed = clock.elapsed.saturating_add(elapsed);
            if clock.elapsed >= self.config.boss_time_limit {
                info!("boss #{} ran out of time on wave {}", clock.enemy.get(), progress.wave);
                out.push(Command::ExpireBoss { enemy: clock.enemy });
                self.boss_clock = None;
                self.spawned = 0;
                self.killed = 0;
                self.accumulator = Duration::ZERO;
                return;
            }
        }

        let quota = wave_quota(progress.wave);
        if self.killed >= quota {
            debug!("wave {} finished after {} kills", progress.wave, self.killed);
            out.push(Command::CompleteWave);
            self.spawned = 0;
            self.killed = 0;
            self.accumulator = Duration::ZERO;
            return;
        }

        if !self.tick_spawn_timer(elapsed) {
            return;
        }
        while self.spawned < quota && self.accumulator >= self.config.spawn_interval {
            self.accumulator -= self.config.spawn_interval;
            let plan = if is_boss_wave(progress.wave) {
                SpawnPlan::WaveBoss {
                    boss: self.roll_boss(),
                }
            } else {
                SpawnPlan::Wave {
                    enemy: EnemyKind::for_stage(progress.stage),
                }
            };
            self.spawn(plan, out);
        }
        if self.spawned >= quota {
            self.accumulator = Duration::ZERO;
        }
    }

    fn run_floor(&mut self, elapsed: Duration, progress: ProgressSnapshot, out: &mut Vec<Command>) {
        let floor = progress.tower_floor;
        let total = tower_enemy_count(floor);
        let remaining = *self.floor_remaining.get_or_insert(total);

        if remaining == 0 {
            self.accumulator = Duration::ZERO;
            if progress.live_enemies == 0 {
                out.push(Command::ClearTowerFloor);
                self.floor_remaining = None;
                self.spawned = 0;
            }
            return;
        }

        if !self.tick_spawn_timer(elapsed) {
            return;
        }
        let mut live = progress.live_enemies;
        let mut remaining = remaining;
        while remaining > 0
            && live < TOWER_MAX_ACTIVE_ENEMIES
            && self.accumulator >= self.config.spawn_interval
        {
            self.accumulator -= self.config.spawn_interval;
            remaining -= 1;
            live += 1;
            let rank = if remaining > 0 {
                FloorRank::Regular
            } else if floor % 5 == 0 {
                FloorRank::Boss(BossKind::for_floor(floor))
            } else if floor % 10 == 0 {
                FloorRank::Elite
            } else {
                FloorRank::Regular
            };
            self.spawn(SpawnPlan::Floor { floor, rank }, out);
        }
        if live >= TOWER_MAX_ACTIVE_ENEMIES {
            self.accumulator = self.accumulator.min(self.config.spawn_interval);
        }
        self.floor_remaining = Some(remaining);
    }

    fn tick_spawn_timer(&mut self, elapsed: Duration) -> bool {
        if self.config.spawn_interval.is_zero() {
            return false;
        }
        self.accumulator = self.accumulator.saturating_add(elapsed);
        self.accumulator >= self.config.spawn_interval
    }

    fn roll_boss(&mut self) -> BossKind {
        BossKind::ALL
            .choose_weighted(&mut self.rng, |boss| boss.weight())
            .copied()
            .unwrap_or(BossKind::KingSlime)
    }

    fn spawn(&mut self, plan: SpawnPlan, out: &mut Vec<Command>) {
        let angle = self.rng.gen_range(0.0..TAU);
        self.spawned = self.spawned.saturating_add(1);
        out.push(Command::SpawnEnemy { plan, angle });
    }

    fn forget_boss(&mut self, enemy: EnemyId) {
        if self.boss_clock.is_some_and(|clock| clock.enemy == enemy) {
            self.boss_clock = None;
        }
    }

    fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.spawned = 0;
        self.killed = 0;
        self.boss_clock = None;
        self.floor_remaining = None;
    }
}
