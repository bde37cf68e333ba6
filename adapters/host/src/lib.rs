#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single top-level controller that owns the world and drives every system.
//!
//! A [`Simulation`] turns raw frame deltas into scaled simulated time, runs the
//! per-frame system order, exposes the player request API and persists the
//! profile through a [`SaveStore`].

mod config;
mod persistence;

use std::{mem, time::Duration};

use chrono::NaiveDate;
use log::{info, warn};
use merge_arena_core::{
    ActionError, ChallengeKind, Command, Event, HeroClassId, HeroTarget, LootBoxKind, QuestId,
    RunMode, ShopItem, UpgradeTrack,
};
use merge_arena_system_auto_merge::{AutoMerge, Config as AutoMergeConfig};
use merge_arena_system_hero_combat::HeroCombat;
use merge_arena_system_hero_targeting::HeroTargeting;
use merge_arena_system_wave_director::{Config as DirectorConfig, WaveDirector};
use merge_arena_world::{self as world, query, Profile, World};

pub use config::{ConfigError, GameSpeed, SimulationConfig};
pub use persistence::{FileStore, MemoryStore, SaveFile, SaveStore, StorageError, SAVE_VERSION};

/// Delta substituted on the first frame and after stalls.
pub const FALLBACK_FRAME: Duration = Duration::from_millis(16);

/// Largest raw delta accepted as-is.
pub const MAX_FRAME: Duration = Duration::from_millis(100);

/// Owns the world and the systems and advances them one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    targeting: HeroTargeting,
    combat: HeroCombat,
    director: WaveDirector,
    auto_merge: AutoMerge,
    speed: GameSpeed,
    last_timestamp: Option<Duration>,
    first_frame: bool,
    targets: Vec<HeroTarget>,
    commands: Vec<Command>,
    backlog: Vec<Event>,
    journal: Vec<Event>,
}

impl Simulation {
    /// Creates a session with a fresh profile.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        Self::from_profile(Profile::default(), config)
    }

    /// Creates a session that continues the provided profile.
    #[must_use]
    pub fn from_profile(profile: Profile, config: &SimulationConfig) -> Self {
        let mut simulation = Self {
            world: World::from_profile(profile, config.seed),
            targeting: HeroTargeting::new(),
            combat: HeroCombat::new(),
            director: WaveDirector::new(DirectorConfig::new(
                config.spawn_interval(),
                config.boss_time_limit(),
                config.seed,
            )),
            auto_merge: AutoMerge::new(AutoMergeConfig::new(config.auto_merge_interval())),
            speed: config.speed,
            last_timestamp: None,
            first_frame: true,
            targets: Vec::new(),
            commands: Vec::new(),
            backlog: Vec::new(),
            journal: Vec::new(),
        };
        simulation.dispatch(Command::ResizeArena {
            width: config.arena_width,
            height: config.arena_height,
        });
        simulation
    }

    /// Restores a session from `store`, crediting offline rewards for the time away.
    ///
    /// Unreadable or corrupt saves are logged and replaced by a fresh profile.
    #[must_use]
    pub fn load(
        store: &impl SaveStore,
        config: &SimulationConfig,
        now_ms: u64,
        today: NaiveDate,
    ) -> Self {
        let stored = store.read().and_then(|contents| {
            contents
                .map(|text| SaveFile::decode(&text))
                .transpose()
        });
        let save = match stored {
            Ok(save) => save,
            Err(error) => {
                warn!("ignoring saved game: {error}");
                None
            }
        };

        let Some(save) = save else {
            let mut simulation = Self::new(config);
            simulation.dispatch(Command::RefreshQuests { today });
            return simulation;
        };

        let mut simulation = Self::from_profile(save.profile, config);
        simulation.dispatch(Command::RefreshQuests { today });
        match save.saved_at_ms {
            Some(saved_at_ms) => {
                info!("loaded save from {saved_at_ms} ms");
                let away = Duration::from_millis(now_ms.saturating_sub(saved_at_ms));
                simulation.dispatch(Command::GrantOfflineRewards { elapsed: away });
            }
            None => info!("loaded save without a timestamp; no offline rewards"),
        }
        simulation
    }

    /// Writes the current profile to `store`.
    ///
    /// Failures are logged and reported back; the session keeps running either way.
    pub fn save(&self, store: &mut impl SaveStore, now_ms: u64) -> Result<(), StorageError> {
        let result = SaveFile::new(query::profile(&self.world).clone(), now_ms)
            .encode()
            .and_then(|contents| store.write(&contents));
        match &result {
            Ok(()) => info!("game saved at {now_ms} ms"),
            Err(error) => warn!("save skipped: {error}"),
        }
        result
    }

    /// Read-only access to the world for queries and rendering.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current game speed.
    #[must_use]
    pub const fn speed(&self) -> GameSpeed {
        self.speed
    }

    /// Changes the game speed.
    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.speed = speed;
    }

    /// Advances the session using an absolute frame timestamp.
    pub fn frame(&mut self, timestamp: Duration) {
        let raw = match self.last_timestamp {
            Some(previous) => timestamp.saturating_sub(previous),
            None => FALLBACK_FRAME,
        };
        self.last_timestamp = Some(timestamp);
        self.tick(raw);
    }

    /// Advances the session by a raw frame delta.
    pub fn tick(&mut self, raw: Duration) {
        let raw = if self.first_frame || raw > MAX_FRAME {
            FALLBACK_FRAME
        } else {
            raw
        };
        self.first_frame = false;
        let dt = self.speed.scale(raw);

        let mut events = mem::take(&mut self.backlog);
        let fresh = events.len();

        self.targeting.handle(
            &query::hero_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        world::apply(
            &mut self.world,
            Command::SteerHeroes {
                dt,
                targets: self.targets.clone(),
            },
            &mut events,
        );

        self.combat.handle(
            &query::hero_view(&self.world),
            &query::enemy_view(&self.world),
            &self.targets,
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        world::apply(
            &mut self.world,
            Command::RecordPlayTime { elapsed: raw },
            &mut events,
        );

        self.director
            .handle(&events, query::progress(&self.world), &mut self.commands);
        self.auto_merge.handle(
            &events,
            query::auto_merge_enabled(&self.world),
            query::selected_class(&self.world),
            &mut self.commands,
        );
        self.journal.extend_from_slice(&events[fresh..]);

        let mut follow_up = Vec::new();
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut follow_up);
        }
        self.journal.extend_from_slice(&follow_up);
        self.backlog = follow_up;
    }

    /// Takes every event produced since the previous call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        mem::take(&mut self.journal)
    }

    /// Summons a random item into the grid of `class`.
    pub fn summon(&mut self, class: HeroClassId) -> Result<(), ActionError> {
        self.request(Command::Summon { class })
    }

    /// Merges or swaps two slots of the grid of `class`.
    pub fn merge(&mut self, class: HeroClassId, from: usize, to: usize) -> Result<(), ActionError> {
        if from == to {
            return Err(ActionError::InvalidReference("slot"));
        }
        self.request(Command::Merge { class, from, to })
    }

    /// Sells the item in `index` of the grid of `class`.
    pub fn sell(&mut self, class: HeroClassId, index: usize) -> Result<(), ActionError> {
        self.request(Command::Sell { class, index })
    }

    /// Buys the next level of an upgrade track.
    pub fn purchase_upgrade(&mut self, track: UpgradeTrack) -> Result<(), ActionError> {
        self.request(Command::PurchaseUpgrade { track })
    }

    /// Activates the skill of a hero.
    pub fn activate_skill(&mut self, hero: HeroClassId) -> Result<(), ActionError> {
        self.request(Command::ActivateSkill { hero })
    }

    /// Switches between the campaign, the tower and the challenges.
    pub fn switch_mode(&mut self, mode: RunMode) -> Result<(), ActionError> {
        self.request(Command::SetRunMode { mode })
    }

    /// Starts a challenge run.
    pub fn start_challenge(&mut self, kind: ChallengeKind) -> Result<(), ActionError> {
        self.switch_mode(RunMode::Challenge(kind))
    }

    /// Selects the grid shown to the player.
    pub fn select_class(&mut self, class: HeroClassId) -> Result<(), ActionError> {
        self.request(Command::SelectHeroClass { class })
    }

    /// Buys an entry of the gem shop.
    pub fn buy_shop_item(&mut self, item: ShopItem) -> Result<(), ActionError> {
        self.request(Command::BuyShopItem { item })
    }

    /// Opens a loot box from the inventory.
    pub fn open_loot_box(&mut self, kind: LootBoxKind) -> Result<(), ActionError> {
        self.request(Command::OpenLootBox { kind })
    }

    /// Claims the daily login reward.
    pub fn claim_daily_reward(&mut self, today: NaiveDate) -> Result<(), ActionError> {
        self.request(Command::ClaimDailyReward { today })
    }

    /// Resets quest counters whose period ended before `today`.
    pub fn refresh_quests(&mut self, today: NaiveDate) {
        self.dispatch(Command::RefreshQuests { today });
    }

    /// Claims a completed quest.
    pub fn claim_quest(&mut self, quest: QuestId) -> Result<(), ActionError> {
        self.request(Command::ClaimQuest { quest })
    }

    /// Turns auto-merge on or off.
    pub fn set_auto_merge(&mut self, enabled: bool) {
        self.dispatch(Command::SetAutoMerge { enabled });
    }

    /// Turns sound on or off.
    pub fn set_sound(&mut self, enabled: bool) {
        self.dispatch(Command::SetSound { enabled });
    }

    /// Resizes the arena. Unusable dimensions are ignored.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.dispatch(Command::ResizeArena { width, height });
    }

    fn request(&mut self, command: Command) -> Result<(), ActionError> {
        let start = self.backlog.len();
        self.dispatch(command);
        self.backlog[start..]
            .iter()
            .find_map(|event| match event {
                Event::ActionRejected { reason, .. } => Some(reason.clone()),
                _ => None,
            })
            .map_or(Ok(()), Err)
    }

    fn dispatch(&mut self, command: Command) {
        let start = self.backlog.len();
        world::apply(&mut self.world, command, &mut self.backlog);
        self.journal.extend_from_slice(&self.backlog[start..]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulation() -> Simulation {
        Simulation::new(&SimulationConfig::default())
    }

    #[test]
    fn first_and_stalled_frames_use_fallback_delta() {
        let mut simulation = simulation();
        simulation.tick(Duration::from_millis(40));
        assert_eq!(query::clock(simulation.world()), FALLBACK_FRAME);

        simulation.tick(Duration::from_millis(40));
        assert_eq!(query::clock(simulation.world()), Duration::from_millis(56));

        simulation.tick(Duration::from_secs(3));
        assert_eq!(query::clock(simulation.world()), Duration::from_millis(72));
    }

    #[test]
    fn game_speed_scales_simulated_time() {
        let mut simulation = simulation();
        simulation.set_speed(GameSpeed::Triple);
        simulation.tick(Duration::from_millis(16));
        simulation.tick(Duration::from_millis(20));
        assert_eq!(query::clock(simulation.world()), Duration::from_millis(108));
    }

    #[test]
    fn play_time_ignores_game_speed() {
        let mut simulation = simulation();
        simulation.set_speed(GameSpeed::Triple);
        simulation.tick(Duration::from_millis(16));
        simulation.tick(Duration::from_millis(20));
        assert_eq!(
            query::profile(simulation.world()).stats.play_time,
            Duration::from_millis(36)
        );
    }

    #[test]
    fn frame_timestamps_become_deltas() {
        let mut simulation = simulation();
        simulation.frame(Duration::from_secs(100));
        simulation.frame(Duration::from_millis(100_050));
        assert_eq!(query::clock(simulation.world()), Duration::from_millis(66));
    }

    #[test]
    fn requests_surface_rejections() {
        let mut simulation = simulation();
        assert_eq!(
            simulation.select_class(HeroClassId::Assassin),
            Err(ActionError::Locked { stage: 20 })
        );
        assert_eq!(
            simulation.merge(HeroClassId::Warrior, 2, 2),
            Err(ActionError::InvalidReference("slot"))
        );
        assert_eq!(simulation.summon(HeroClassId::Warrior), Ok(()));
        assert!(simulation
            .drain_events()
            .iter()
            .any(|event| matches!(event, Event::ItemSummoned { cost: 10, .. })));
    }

    #[test]
    fn configured_arena_is_applied() {
        let config = SimulationConfig {
            arena_width: 1_000.0,
            arena_height: 400.0,
            ..SimulationConfig::default()
        };
        let simulation = Simulation::new(&config);
        let arena = query::arena(simulation.world());
        assert!((arena.width() - 1_000.0).abs() < f32::EPSILON);
        assert!((arena.center_radius() - 100.0).abs() < f32::EPSILON);
    }
}
