#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Merge Arena engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Systems consume event streams, query
//! immutable snapshots, and respond exclusively with new command batches.
//!
//! The balancing tables, the merge grid and stat resolution live here as well
//! because every layer needs to agree on them.

pub mod balance;
pub mod catalog;
mod error;
pub mod grid;
pub mod stats;

use std::time::Duration;

use chrono::NaiveDate;
pub use glam::Vec2;

pub use catalog::{
    AchievementId, AttackType, BossKind, ChallengeKind, EnemyKind, FoeKind, HeroClassId,
    ItemKind, LootBoxKind, LootReward, QuestId, ShopItem, SkillEffect, UpgradeTrack,
};
pub use error::{ActionError, Currency};
pub use grid::{ItemStack, MergeGrid, MergeOutcome};
pub use stats::{resolve_hero_stats, HeroStats, UpgradeLevels};

/// Mutually exclusive run modes sharing the combat loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Stage and wave progression.
    Campaign,
    /// Endless tower floors.
    Tower,
    /// Timed or scored challenge layered on the campaign wave flow.
    Challenge(ChallengeKind),
}

impl RunMode {
    /// Reports whether campaign waves drive spawning in this mode.
    #[must_use]
    pub const fn runs_waves(self) -> bool {
        matches!(self, Self::Campaign | Self::Challenge(_))
    }
}

/// Player-facing actions, used to label rejections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Summoning an item.
    Summon,
    /// Merging or swapping two slots.
    Merge,
    /// Selling an item.
    Sell,
    /// Buying an upgrade level.
    PurchaseUpgrade,
    /// Buying from the gem shop.
    BuyShopItem,
    /// Activating a hero skill.
    ActivateSkill,
    /// Switching the run mode.
    SwitchMode,
    /// Selecting the merge grid shown to the player.
    SelectHeroClass,
    /// Claiming the daily login reward.
    ClaimDailyReward,
    /// Claiming a quest reward.
    ClaimQuest,
    /// Opening a loot box.
    OpenLootBox,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances projectiles, enemies, effects and timers by the provided delta time.
    Tick {
        /// Scaled simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Credits wall-clock play time, unaffected by game speed.
    RecordPlayTime {
        /// Clamped real time that elapsed since the previous frame.
        elapsed: Duration,
    },
    /// Assigns fresh targets to heroes and moves them for the provided delta time.
    SteerHeroes {
        /// Scaled simulated time that elapsed since the previous tick.
        dt: Duration,
        /// Nearest-enemy assignments; heroes missing from the list wander.
        targets: Vec<HeroTarget>,
    },
    /// Performs a basic attack from a hero against an enemy.
    HeroAttack {
        /// Attacking hero.
        hero: HeroClassId,
        /// Enemy being attacked.
        target: EnemyId,
    },
    /// Spawns an enemy on the spawn ring.
    SpawnEnemy {
        /// What to spawn.
        plan: SpawnPlan,
        /// Angle on the spawn ring, in radians.
        angle: f32,
    },
    /// Removes a boss whose timer ran out, without rewards.
    ExpireBoss {
        /// Boss that escaped.
        enemy: EnemyId,
    },
    /// Finishes the current campaign wave.
    CompleteWave,
    /// Finishes the current tower floor.
    ClearTowerFloor,
    /// Resizes the arena and rebuilds the hero formation.
    ResizeArena {
        /// Arena width in world units.
        width: f32,
        /// Arena height in world units.
        height: f32,
    },
    /// Selects the merge grid shown to the player.
    SelectHeroClass {
        /// Class whose grid becomes active.
        class: HeroClassId,
    },
    /// Buys a random level 1 item into the class grid.
    Summon {
        /// Class receiving the item.
        class: HeroClassId,
    },
    /// Merges or swaps two slots of a class grid.
    Merge {
        /// Grid owner.
        class: HeroClassId,
        /// Slot being dragged.
        from: usize,
        /// Slot being dropped onto.
        to: usize,
    },
    /// Performs the first available merge in a class grid.
    AutoMerge {
        /// Grid owner.
        class: HeroClassId,
    },
    /// Sells an item for gold.
    Sell {
        /// Grid owner.
        class: HeroClassId,
        /// Slot holding the item.
        index: usize,
    },
    /// Buys one level of a global upgrade.
    PurchaseUpgrade {
        /// Upgrade track.
        track: UpgradeTrack,
    },
    /// Buys an item from the gem shop.
    BuyShopItem {
        /// Shop entry.
        item: ShopItem,
    },
    /// Activates the skill of a hero.
    ActivateSkill {
        /// Hero whose skill fires.
        hero: HeroClassId,
    },
    /// Switches the run mode, clearing every in-flight entity.
    SetRunMode {
        /// Mode to enter.
        mode: RunMode,
    },
    /// Enables or disables the auto-merge feature.
    SetAutoMerge {
        /// Whether auto-merge runs.
        enabled: bool,
    },
    /// Enables or disables sound playback in presentation layers.
    SetSound {
        /// Whether sound plays.
        enabled: bool,
    },
    /// Claims the login reward for `today`.
    ClaimDailyReward {
        /// Calendar date of the claim.
        today: NaiveDate,
    },
    /// Resets quest counters whose period ended before `today`.
    RefreshQuests {
        /// Current calendar date.
        today: NaiveDate,
    },
    /// Claims a completed quest.
    ClaimQuest {
        /// Quest to claim.
        quest: QuestId,
    },
    /// Opens one loot box from the inventory.
    OpenLootBox {
        /// Rarity of the box.
        kind: LootBoxKind,
    },
    /// Converts time spent away into rewards.
    GrantOfflineRewards {
        /// Wall time elapsed since the last save.
        elapsed: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Reports that simulated time advanced.
    TimeAdvanced {
        /// Scaled simulated time that elapsed.
        dt: Duration,
    },
    /// Arena dimensions changed.
    ArenaResized {
        /// Arena width.
        width: f32,
        /// Arena height.
        height: f32,
    },
    /// An enemy entered the arena.
    EnemySpawned {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        foe: FoeKind,
        /// Spawn position.
        position: Vec2,
    },
    /// An enemy lost hit points.
    EnemyDamaged {
        /// Damaged enemy.
        enemy: EnemyId,
        /// Damage dealt.
        amount: f64,
        /// Whether the hit was critical.
        crit: bool,
        /// Hit points left after the hit; zero or less means the enemy died.
        remaining: f64,
    },
    /// An enemy died and its rewards were granted.
    EnemyKilled {
        /// Killed enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        foe: FoeKind,
        /// Rewards granted for the kill.
        reward: KillReward,
    },
    /// An enemy reached the center during a survival challenge.
    EnemyEscaped {
        /// Escaped enemy.
        enemy: EnemyId,
    },
    /// The campaign wave finished.
    WaveCompleted {
        /// Number of the wave that finished.
        wave: u32,
    },
    /// The campaign stage advanced.
    StageAdvanced {
        /// New stage.
        stage: u32,
    },
    /// A hero class became available.
    HeroUnlocked {
        /// Unlocked class.
        class: HeroClassId,
    },
    /// A boss entered the arena.
    BossAppeared {
        /// Identifier of the boss.
        enemy: EnemyId,
        /// Kind of boss.
        boss: BossKind,
    },
    /// A boss survived its timer and left without rewards.
    BossTimedOut {
        /// Identifier of the boss.
        enemy: EnemyId,
    },
    /// A boss was killed.
    BossDefeated {
        /// Identifier of the boss.
        enemy: EnemyId,
    },
    /// A hero skill fired.
    SkillActivated {
        /// Hero whose skill fired.
        hero: HeroClassId,
        /// Effect of the skill.
        effect: SkillEffect,
    },
    /// A summoned item was placed into a grid.
    ItemSummoned {
        /// Grid owner.
        class: HeroClassId,
        /// Slot receiving the item.
        slot: usize,
        /// Summoned item.
        item: ItemStack,
        /// Gold paid.
        cost: u64,
    },
    /// Two items merged.
    MergePerformed {
        /// Grid owner.
        class: HeroClassId,
        /// Slot holding the merged item.
        slot: usize,
        /// Merged item.
        item: ItemStack,
    },
    /// Two slots exchanged contents.
    ItemsSwapped {
        /// Grid owner.
        class: HeroClassId,
        /// First slot.
        from: usize,
        /// Second slot.
        to: usize,
    },
    /// An item was sold.
    ItemSold {
        /// Grid owner.
        class: HeroClassId,
        /// Emptied slot.
        slot: usize,
        /// Gold received.
        price: u64,
    },
    /// An item was granted outside of summoning.
    ItemGranted {
        /// Grid owner.
        class: HeroClassId,
        /// Slot receiving the item.
        slot: usize,
        /// Granted item.
        item: ItemStack,
    },
    /// An upgrade level was purchased.
    UpgradePurchased {
        /// Upgrade track.
        track: UpgradeTrack,
        /// New level.
        level: u32,
    },
    /// A shop item was purchased.
    ShopItemPurchased {
        /// Purchased entry.
        item: ShopItem,
    },
    /// The merge grid shown to the player changed.
    HeroClassSelected {
        /// Selected class.
        class: HeroClassId,
    },
    /// An achievement unlocked.
    AchievementUnlocked {
        /// Unlocked achievement.
        achievement: AchievementId,
        /// Gems granted.
        gems: u64,
    },
    /// A foe kind was killed for the first time.
    CodexDiscovered {
        /// Discovered foe.
        foe: FoeKind,
        /// Gems granted.
        gems: u64,
    },
    /// A loot box was added to the inventory.
    LootBoxDropped {
        /// Rarity of the box.
        kind: LootBoxKind,
    },
    /// A loot box was opened.
    LootBoxOpened {
        /// Rarity of the box.
        kind: LootBoxKind,
        /// Reward granted.
        reward: LootReward,
    },
    /// A tower floor was cleared.
    TowerFloorCleared {
        /// Cleared floor.
        floor: u32,
        /// Gold granted.
        gold: u64,
        /// Gems granted.
        gems: u64,
    },
    /// A challenge run started.
    ChallengeStarted {
        /// Challenge kind.
        kind: ChallengeKind,
    },
    /// A challenge run finished.
    ChallengeEnded {
        /// Challenge kind.
        kind: ChallengeKind,
        /// Final score.
        score: u64,
        /// Gold granted.
        gold: u64,
        /// Gems granted.
        gems: u64,
        /// Whether the score beat the previous best.
        record: bool,
    },
    /// The daily login reward was claimed.
    DailyRewardClaimed {
        /// Streak day, starting at 1.
        day: u32,
        /// Gold granted.
        gold: u64,
        /// Gems granted.
        gems: u64,
    },
    /// A quest reward was claimed.
    QuestClaimed {
        /// Claimed quest.
        quest: QuestId,
    },
    /// Offline rewards were granted.
    OfflineRewardsGranted {
        /// Summary of the grant.
        report: OfflineReport,
    },
    /// Damage dealt over the last measurement window.
    DpsPublished {
        /// Damage dealt in the window.
        dps: f64,
    },
    /// The run mode changed.
    RunModeChanged {
        /// Mode now active.
        mode: RunMode,
    },
    /// A player-facing action was rejected without side effects.
    ActionRejected {
        /// Action that failed.
        action: ActionKind,
        /// Human-readable reason.
        reason: ActionError,
    },
}

/// Rewards granted for a kill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KillReward {
    /// Gold credited.
    pub gold: u64,
    /// Gems credited, excluding codex bonuses.
    pub gems: u64,
    /// Whether the enemy was a boss.
    pub boss: bool,
}

/// Summary of rewards accrued while the player was away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OfflineReport {
    /// Time credited after capping.
    pub credited: Duration,
    /// Gold granted.
    pub gold: u64,
    /// Gems granted.
    pub gems: u64,
    /// Kills credited to the statistics.
    pub kills: u64,
    /// Whether a common loot box was granted.
    pub loot_box: bool,
}

/// What the director asks the world to spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPlan {
    /// Stage-scaled campaign enemy.
    Wave {
        /// Enemy kind.
        enemy: EnemyKind,
    },
    /// Campaign boss.
    WaveBoss {
        /// Boss kind.
        boss: BossKind,
    },
    /// Endless tower enemy.
    Floor {
        /// Floor the enemy belongs to.
        floor: u32,
        /// Strength tier.
        rank: FloorRank,
    },
}

/// Strength tiers of tower enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloorRank {
    /// Regular floor enemy.
    Regular,
    /// Last enemy of every tenth floor.
    Elite,
    /// Last enemy of every fifth floor.
    Boss(BossKind),
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Target assignment produced by the hero targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroTarget {
    /// Hero that acquired the target.
    pub hero: HeroClassId,
    /// Nearest enemy.
    pub enemy: EnemyId,
    /// Distance between hero and enemy when the target was chosen.
    pub distance: f32,
}

/// Read-only snapshot of a hero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroSnapshot {
    /// Hero class.
    pub hero: HeroClassId,
    /// Position in world units.
    pub position: Vec2,
    /// Enemy the hero is currently pursuing.
    pub target: Option<EnemyId>,
    /// Effective stats.
    pub stats: HeroStats,
    /// Simulated time until the next basic attack is allowed.
    pub ready_in: Duration,
}

/// Read-only view of every hero, ordered by class.
#[derive(Clone, Debug, Default)]
pub struct HeroView {
    snapshots: Vec<HeroSnapshot>,
}

impl HeroView {
    /// Creates a new hero view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<HeroSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.hero);
        Self { snapshots }
    }

    /// Iterator over the captured hero snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &HeroSnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided hero, if present.
    #[must_use]
    pub fn get(&self, hero: HeroClassId) -> Option<&HeroSnapshot> {
        self.snapshots
            .binary_search_by_key(&hero, |snapshot| snapshot.hero)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<HeroSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier of the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub foe: FoeKind,
    /// Position in world units.
    pub position: Vec2,
    /// Remaining hit points.
    pub hp: f64,
    /// Hit points at spawn.
    pub max_hp: f64,
    /// Collision radius.
    pub radius: f32,
    /// Whether the enemy is a boss.
    pub boss: bool,
}

/// Read-only view of every living enemy, ordered by identifier.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Snapshot of the provided enemy, if it is alive.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of living enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemy is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Progress counters the director needs to plan spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressSnapshot {
    /// Active run mode.
    pub mode: RunMode,
    /// Current campaign stage.
    pub stage: u32,
    /// Current campaign wave.
    pub wave: u32,
    /// Current tower floor.
    pub tower_floor: u32,
    /// Number of living enemies.
    pub live_enemies: usize,
}
