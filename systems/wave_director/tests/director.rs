use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use merge_arena_core::{
    balance::{BOSS_TIME_LIMIT, TOWER_MAX_ACTIVE_ENEMIES, WAVE_SPAWN_INTERVAL},
    Command, Event, RunMode,
};
use merge_arena_system_wave_director::{Config, WaveDirector};
use merge_arena_world::{self as world, query, Profile, World};

const FRAME: Duration = Duration::from_millis(100);

struct Harness {
    world: World,
    director: WaveDirector,
    pending: Vec<Event>,
    log: Vec<Event>,
}

impl Harness {
    fn new(profile: Profile, seed: u64) -> Self {
        Self {
            world: World::from_profile(profile, seed),
            director: WaveDirector::new(Config::new(WAVE_SPAWN_INTERVAL, BOSS_TIME_LIMIT, seed)),
            pending: Vec::new(),
            log: Vec::new(),
        }
    }

    fn command(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.pending);
    }

    fn frame(&mut self) {
        let mut events = std::mem::take(&mut self.pending);
        world::apply(&mut self.world, Command::Tick { dt: FRAME }, &mut events);

        let mut commands = Vec::new();
        self.director
            .handle(&events, query::progress(&self.world), &mut commands);
        self.log.extend(events);

        for command in commands {
            world::apply(&mut self.world, command, &mut self.pending);
        }
    }

    fn count(&self, predicate: impl Fn(&Event) -> bool) -> usize {
        self.log.iter().chain(&self.pending).filter(|event| predicate(event)).count()
    }
}

#[test]
fn campaign_wave_fills_its_quota() {
    let mut harness = Harness::new(Profile::default(), 7);
    for _ in 0..200 {
        harness.frame();
    }

    let spawned = harness.count(|event| matches!(event, Event::EnemySpawned { .. }));
    assert_eq!(spawned, 10, "a regular wave spawns ten enemies");
    assert_eq!(query::enemy_view(&harness.world).len(), 10);
    assert_eq!(query::profile(&harness.world).wave, 1, "no kills, no progress");
}

#[test]
fn boss_escapes_once_and_the_wave_restarts() {
    let mut profile = Profile::default();
    profile.wave = 5;
    let mut harness = Harness::new(profile, 3);

    for _ in 0..700 {
        harness.frame();
    }

    let timed_out = harness.count(|event| matches!(event, Event::BossTimedOut { .. }));
    let appeared = harness.count(|event| matches!(event, Event::BossAppeared { .. }));
    assert_eq!(timed_out, 1, "boss timer fires exactly once");
    assert_eq!(appeared, 2, "a fresh boss follows the escape");
    assert_eq!(query::profile(&harness.world).wave, 5, "escape does not advance the wave");
    assert_eq!(query::profile(&harness.world).gold, 100, "escape grants nothing");
}

#[test]
fn tower_never_exceeds_live_enemy_cap() {
    let mut profile = Profile::default();
    profile.best_stage = 10;
    profile.tower.floor = 20;
    let mut harness = Harness::new(profile, 5);
    harness.command(Command::SetRunMode {
        mode: RunMode::Tower,
    });

    for _ in 0..400 {
        harness.frame();
        assert!(
            query::enemy_view(&harness.world).len() <= TOWER_MAX_ACTIVE_ENEMIES,
            "tower cap exceeded"
        );
    }
    assert_eq!(
        query::enemy_view(&harness.world).len(),
        TOWER_MAX_ACTIVE_ENEMIES
    );
    assert_eq!(harness.count(|event| matches!(event, Event::BossAppeared { .. })), 0);
}

#[test]
fn director_replay_is_deterministic() {
    fn fingerprint(seed: u64) -> u64 {
        let mut harness = Harness::new(Profile::default(), seed);
        for _ in 0..200 {
            harness.frame();
        }
        let mut hasher = DefaultHasher::new();
        for event in &harness.log {
            if let Event::EnemySpawned {
                enemy,
                foe,
                position,
            } = event
            {
                enemy.hash(&mut hasher);
                foe.hash(&mut hasher);
                position.x.to_bits().hash(&mut hasher);
                position.y.to_bits().hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    assert_eq!(fingerprint(42), fingerprint(42), "same seed must replay identically");
    assert_ne!(fingerprint(42), fingerprint(43), "seed should drive spawn angles");
}
