#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Merge Arena.
//!
//! The world owns the persisted [`Profile`] together with everything that only
//! lives for the current session: heroes, enemies, projectiles, effects and
//! timers. It mutates exclusively through [`apply`] and exposes read-only
//! access through [`query`].

mod arena;
mod combat;
mod economy;
mod effects;
mod heroes;
mod profile;
mod progression;
mod skills;

use std::{collections::BTreeMap, time::Duration};

use merge_arena_core::{
    ActionError, ActionKind, Command, EnemyId, Event, HeroClassId, RunMode,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use arena::Arena;
pub use combat::Projectile;
pub use effects::{FloatingText, Particle, TextKind};
pub use profile::{
    CodexEntry, DailyStreak, HeroProgress, LifetimeStats, Profile, QuestBook, Settings,
    TowerProgress,
};
pub use progression::ChallengeRun;

use combat::Enemy;
use effects::{DpsMeter, Effects};
use heroes::Hero;

const DEFAULT_SEED: u64 = 0x6d65_7267_6521_a7e5;

/// Represents the authoritative Merge Arena world state.
#[derive(Debug)]
pub struct World {
    profile: Profile,
    arena: Arena,
    clock: Duration,
    heroes: Vec<Hero>,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: u32,
    projectiles: Vec<Projectile>,
    effects: Effects,
    dps: DpsMeter,
    cooldowns: BTreeMap<HeroClassId, Duration>,
    selected_class: HeroClassId,
    mode: RunMode,
    challenge: Option<ChallengeRun>,
    minute_progress: Duration,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world with a fresh profile.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Creates a world with a fresh profile and the provided random seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_profile(Profile::default(), seed)
    }

    /// Creates a world resuming the provided profile.
    #[must_use]
    pub fn from_profile(profile: Profile, seed: u64) -> Self {
        let mut world = Self {
            profile: profile.normalized(),
            arena: Arena::default(),
            clock: Duration::ZERO,
            heroes: Vec::new(),
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            projectiles: Vec::new(),
            effects: Effects::default(),
            dps: DpsMeter::default(),
            cooldowns: BTreeMap::new(),
            selected_class: HeroClassId::STARTER,
            mode: RunMode::Campaign,
            challenge: None,
            minute_progress: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(seed),
        };
        world.rebuild_heroes();
        world
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        self.advance_projectiles(dt, out_events);
        self.advance_enemies(dt, out_events);
        self.effects.advance(dt);
        if let Some(dps) = self.dps.advance(dt) {
            out_events.push(Event::DpsPublished { dps });
        }
        self.advance_cooldowns(dt);
        self.advance_challenge(dt, out_events);
        self.check_achievements(out_events);
    }

    fn select_hero_class(&mut self, class: HeroClassId, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        if !self.profile.is_unlocked(class) {
            return Err(ActionError::Locked {
                stage: class.class().unlock_stage,
            });
        }
        self.selected_class = class;
        out_events.push(Event::HeroClassSelected { class });
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let outcome = match command {
        Command::Tick { dt } => {
            world.tick(dt, out_events);
            return;
        }
        Command::RecordPlayTime { elapsed } => {
            world.accrue_play_time(elapsed);
            return;
        }
        Command::SteerHeroes { dt, targets } => {
            world.steer_heroes(dt, &targets);
            return;
        }
        Command::HeroAttack { hero, target } => {
            world.hero_attack(hero, target, out_events);
            return;
        }
        Command::SpawnEnemy { plan, angle } => {
            world.spawn_enemy(plan, angle, out_events);
            return;
        }
        Command::ExpireBoss { enemy } => {
            world.expire_boss(enemy, out_events);
            return;
        }
        Command::CompleteWave => {
            world.complete_wave(out_events);
            return;
        }
        Command::ClearTowerFloor => {
            world.clear_tower_floor(out_events);
            return;
        }
        Command::ResizeArena { width, height } => {
            if Arena::accepts(width, height) {
                world.arena = Arena::new(width, height);
                world.rebuild_heroes();
                out_events.push(Event::ArenaResized { width, height });
            }
            return;
        }
        Command::Merge { class, from, to } => {
            world.merge(class, from, to, out_events);
            return;
        }
        Command::AutoMerge { class } => {
            world.auto_merge(class, out_events);
            return;
        }
        Command::SetAutoMerge { enabled } => {
            world.profile.settings.auto_merge = enabled;
            return;
        }
        Command::SetSound { enabled } => {
            world.profile.settings.sound = enabled;
            return;
        }
        Command::RefreshQuests { today } => {
            world.profile.quests.refresh(today);
            return;
        }
        Command::GrantOfflineRewards { elapsed } => {
            world.grant_offline_rewards(elapsed, out_events);
            return;
        }
        Command::SelectHeroClass { class } => (
            ActionKind::SelectHeroClass,
            world.select_hero_class(class, out_events),
        ),
        Command::Summon { class } => (ActionKind::Summon, world.summon(class, out_events)),
        Command::Sell { class, index } => (ActionKind::Sell, world.sell(class, index, out_events)),
        Command::PurchaseUpgrade { track } => (
            ActionKind::PurchaseUpgrade,
            world.purchase_upgrade(track, out_events),
        ),
        Command::BuyShopItem { item } => (
            ActionKind::BuyShopItem,
            world.buy_shop_item(item, out_events),
        ),
        Command::ActivateSkill { hero } => (
            ActionKind::ActivateSkill,
            world.activate_skill(hero, out_events),
        ),
        Command::SetRunMode { mode } => (ActionKind::SwitchMode, world.set_run_mode(mode, out_events)),
        Command::ClaimDailyReward { today } => (
            ActionKind::ClaimDailyReward,
            world.claim_daily_reward(today, out_events),
        ),
        Command::ClaimQuest { quest } => (ActionKind::ClaimQuest, world.claim_quest(quest, out_events)),
        Command::OpenLootBox { kind } => (
            ActionKind::OpenLootBox,
            world.open_loot_box(kind, out_events),
        ),
    };

    if let (action, Err(reason)) = outcome {
        out_events.push(Event::ActionRejected { action, reason });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use merge_arena_core::{
        balance::{self, TOWER_UNLOCK_STAGE},
        EnemyId, EnemySnapshot, EnemyView, HeroClassId, HeroStats, HeroView, ProgressSnapshot,
        RunMode,
    };

    use super::{Arena, ChallengeRun, FloatingText, Particle, Profile, Projectile, World};

    /// Persisted progress.
    #[must_use]
    pub fn profile(world: &World) -> &Profile {
        &world.profile
    }

    /// Battlefield dimensions.
    #[must_use]
    pub fn arena(world: &World) -> &Arena {
        &world.arena
    }

    /// Total simulated time.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Active run mode.
    #[must_use]
    pub fn run_mode(world: &World) -> RunMode {
        world.mode
    }

    /// Class whose grid is shown to the player and receives granted items.
    #[must_use]
    pub fn selected_class(world: &World) -> HeroClassId {
        world.selected_class
    }

    /// Snapshots of every hero in the arena.
    #[must_use]
    pub fn hero_view(world: &World) -> HeroView {
        HeroView::from_snapshots(
            world
                .heroes
                .iter()
                .map(|hero| hero.snapshot(world.clock))
                .collect(),
        )
    }

    /// Effective stats of a hero in the arena.
    #[must_use]
    pub fn hero_stats(world: &World, class: HeroClassId) -> Option<HeroStats> {
        world
            .heroes
            .iter()
            .find(|hero| hero.class == class)
            .map(|hero| hero.stats)
    }

    /// Snapshots of every living enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.values().map(|enemy| enemy.snapshot()).collect())
    }

    /// Snapshot of a single enemy, if it is alive.
    #[must_use]
    pub fn enemy(world: &World, id: EnemyId) -> Option<EnemySnapshot> {
        world.enemies.get(&id).map(|enemy| enemy.snapshot())
    }

    /// Projectiles in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Death particles.
    #[must_use]
    pub fn particles(world: &World) -> &[Particle] {
        world.effects.particles()
    }

    /// Damage numbers and gold texts.
    #[must_use]
    pub fn floating_texts(world: &World) -> &[FloatingText] {
        world.effects.texts()
    }

    /// Damage dealt during the last finished measurement window.
    #[must_use]
    pub fn dps(world: &World) -> f64 {
        world.dps.published()
    }

    /// Cooldown left on a hero's skill.
    #[must_use]
    pub fn skill_cooldown(world: &World, class: HeroClassId) -> Duration {
        world.skill_cooldown(class)
    }

    /// Counters the wave director plans with.
    #[must_use]
    pub fn progress(world: &World) -> ProgressSnapshot {
        ProgressSnapshot {
            mode: world.mode,
            stage: world.profile.stage,
            wave: world.profile.wave,
            tower_floor: world.profile.tower.floor,
            live_enemies: world.enemies.len(),
        }
    }

    /// Active challenge run, if any.
    #[must_use]
    pub fn challenge(world: &World) -> Option<&ChallengeRun> {
        world.challenge.as_ref()
    }

    /// Gold charged for the next summon.
    #[must_use]
    pub fn summon_price(world: &World) -> u64 {
        balance::summon_price(world.profile.summon_cost)
    }

    /// Reports whether grids merge automatically.
    #[must_use]
    pub fn auto_merge_enabled(world: &World) -> bool {
        world.profile.settings.auto_merge
    }

    /// Reports whether the endless tower may be entered.
    #[must_use]
    pub fn tower_unlocked(world: &World) -> bool {
        world.profile.best_stage >= TOWER_UNLOCK_STAGE
    }
}
