use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use chrono::NaiveDate;
use merge_arena_core::{ActionError, Event, HeroClassId, RunMode};
use merge_arena_host::{
    GameSpeed, MemoryStore, SaveFile, SaveStore, Simulation, SimulationConfig,
};
use merge_arena_world::{query, Profile};

const FRAME: Duration = Duration::from_millis(16);

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date")
}

fn config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed,
        ..SimulationConfig::default()
    }
}

fn play(simulation: &mut Simulation, seconds: u64) -> Vec<Event> {
    let frames = seconds * 1_000 / FRAME.as_millis() as u64;
    let mut log = Vec::new();
    for _ in 0..frames {
        simulation.tick(FRAME);
        log.extend(simulation.drain_events());
    }
    log
}

#[test]
fn autonomous_session_clears_early_waves() {
    let mut simulation = Simulation::new(&config(12));
    simulation.set_speed(GameSpeed::Triple);
    for _ in 0..5 {
        simulation
            .summon(HeroClassId::Warrior)
            .expect("starting gold covers five summons");
    }

    let log = play(&mut simulation, 120);

    let kills = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count();
    assert!(kills >= 10, "expected a full wave of kills, saw {kills}");
    assert!(log.contains(&Event::WaveCompleted { wave: 1 }));
    assert!(query::profile(simulation.world()).wave >= 2);
}

#[test]
fn save_and_load_credit_offline_time() {
    let mut simulation = Simulation::new(&config(3));
    simulation.summon(HeroClassId::Warrior).expect("summon");
    let mut store = MemoryStore::default();
    simulation.save(&mut store, 1_000).expect("memory store never fails");

    let two_hours_later = 1_000 + 2 * 3_600 * 1_000;
    let mut restored = Simulation::load(&store, &config(3), two_hours_later, today());

    let profile = query::profile(restored.world());
    assert_eq!(profile.gold, 90 + 15 * 120, "stage one earns 15 gold per minute");
    assert_eq!(profile.stats.summons, 1);
    assert!(restored.drain_events().iter().any(|event| matches!(
        event,
        Event::OfflineRewardsGranted { report } if report.credited == Duration::from_secs(7_200)
    )));
}

#[test]
fn corrupt_save_falls_back_to_fresh_profile() {
    let store = MemoryStore::with_contents("{ definitely not a save");
    let simulation = Simulation::load(&store, &config(1), 0, today());
    let profile = query::profile(simulation.world());
    assert_eq!(profile.gold, 100);
    assert_eq!(profile.stage, 1);
    assert_eq!(profile.stats.summons, 0);
    assert_eq!(profile.quests.daily_start, Some(today()), "quests refresh on load");
}

#[test]
fn short_absence_grants_nothing() {
    let mut store = MemoryStore::default();
    let contents = SaveFile::new(Profile::default(), 10_000)
        .encode()
        .expect("encode");
    store.write(&contents).expect("write");

    let mut simulation = Simulation::load(&store, &config(1), 40_000, today());
    assert_eq!(query::profile(simulation.world()).gold, 100);
    assert!(!simulation
        .drain_events()
        .iter()
        .any(|event| matches!(event, Event::OfflineRewardsGranted { .. })));
}

#[test]
fn save_without_timestamp_keeps_profile_and_skips_offline_rewards() {
    let store = MemoryStore::with_contents(r#"{"profile":{"gold":250,"stage":3}}"#);
    let mut simulation = Simulation::load(&store, &config(1), 9_000_000, today());

    let profile = query::profile(simulation.world());
    assert_eq!(profile.gold, 250);
    assert_eq!(profile.stage, 3);
    assert!(!simulation
        .drain_events()
        .iter()
        .any(|event| matches!(event, Event::OfflineRewardsGranted { .. })));
}

#[test]
fn tower_requires_stage_ten() {
    let mut simulation = Simulation::new(&config(1));
    assert_eq!(
        simulation.switch_mode(RunMode::Tower),
        Err(ActionError::Locked { stage: 10 })
    );

    let mut profile = Profile::default();
    profile.best_stage = 10;
    let mut simulation = Simulation::from_profile(profile, &config(1));
    assert_eq!(simulation.switch_mode(RunMode::Tower), Ok(()));

    let log = play(&mut simulation, 5);
    assert!(log.iter().any(|event| matches!(event, Event::EnemySpawned { .. })));
    assert_eq!(query::run_mode(simulation.world()), RunMode::Tower);
}

#[test]
fn sessions_replay_identically() {
    fn fingerprint(seed: u64) -> u64 {
        let mut simulation = Simulation::new(&config(seed));
        simulation.set_speed(GameSpeed::Double);
        for _ in 0..3 {
            let _ = simulation.summon(HeroClassId::Warrior);
        }
        let log = play(&mut simulation, 30);

        let mut hasher = DefaultHasher::new();
        log.len().hash(&mut hasher);
        for event in &log {
            match event {
                Event::EnemyDamaged { enemy, amount, .. } => {
                    enemy.hash(&mut hasher);
                    amount.to_bits().hash(&mut hasher);
                }
                Event::EnemyKilled { enemy, reward, .. } => {
                    enemy.hash(&mut hasher);
                    reward.gold.hash(&mut hasher);
                }
                _ => {}
            }
        }
        let profile = query::profile(simulation.world());
        profile.gold.hash(&mut hasher);
        profile.stats.kills.hash(&mut hasher);
        hasher.finish()
    }

    assert_eq!(fingerprint(77), fingerprint(77), "same seed must replay identically");
}
