//! Static balancing tables describing heroes, items, foes and rewards.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::ItemStack;

/// Identifies one of the five hero classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroClassId {
    /// Sturdy melee starter class.
    Warrior,
    /// Slow melee class with heavy blows.
    Axe,
    /// Long range class firing arrows.
    Archer,
    /// Long range caster.
    Mage,
    /// Fast melee class with a teleport strike.
    Assassin,
}

impl HeroClassId {
    /// Every class in unlock order.
    pub const ALL: [Self; 5] = [
        Self::Warrior,
        Self::Axe,
        Self::Archer,
        Self::Mage,
        Self::Assassin,
    ];

    /// Class unlocked on a fresh profile.
    pub const STARTER: Self = Self::Warrior;

    /// Retrieves the static definition of the class.
    #[must_use]
    pub const fn class(self) -> HeroClass {
        match self {
            Self::Warrior => HeroClass {
                name: "Warrior",
                base_attack: 15.0,
                attack_speed: 1.0,
                range: 50.0,
                move_speed: 80.0,
                attack_type: AttackType::Melee,
                unlock_stage: 1,
                skill: Skill::new(SkillEffect::SpinAttack, 10),
            },
            Self::Axe => HeroClass {
                name: "Axe",
                base_attack: 25.0,
                attack_speed: 0.7,
                range: 60.0,
                move_speed: 60.0,
                attack_type: AttackType::Melee,
                unlock_stage: 5,
                skill: Skill::new(SkillEffect::PowerStrike, 12),
            },
            Self::Archer => HeroClass {
                name: "Archer",
                base_attack: 12.0,
                attack_speed: 1.3,
                range: 180.0,
                move_speed: 90.0,
                attack_type: AttackType::Ranged,
                unlock_stage: 10,
                skill: Skill::new(SkillEffect::MultiShot, 8),
            },
            Self::Mage => HeroClass {
                name: "Mage",
                base_attack: 20.0,
                attack_speed: 0.8,
                range: 200.0,
                move_speed: 70.0,
                attack_type: AttackType::Ranged,
                unlock_stage: 15,
                skill: Skill::new(SkillEffect::Meteor, 15),
            },
            Self::Assassin => HeroClass {
                name: "Assassin",
                base_attack: 30.0,
                attack_speed: 1.5,
                range: 40.0,
                move_speed: 120.0,
                attack_type: AttackType::Melee,
                unlock_stage: 20,
                skill: Skill::new(SkillEffect::ShadowStrike, 6),
            },
        }
    }
}

/// Static description of a hero class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroClass {
    /// Display name.
    pub name: &'static str,
    /// Attack damage before items and upgrades.
    pub base_attack: f64,
    /// Attacks per second before items and upgrades.
    pub attack_speed: f64,
    /// Engagement range in world units.
    pub range: f64,
    /// Movement speed in world units per second.
    pub move_speed: f64,
    /// Whether attacks land instantly or travel as projectiles.
    pub attack_type: AttackType,
    /// Campaign stage at which the class unlocks.
    pub unlock_stage: u32,
    /// Active skill owned by the class.
    pub skill: Skill,
}

/// Delivery mechanism of a hero's basic attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackType {
    /// Damage resolves immediately against the target.
    Melee,
    /// Damage travels in a projectile.
    Ranged,
}

/// Cooldown-gated special ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Skill {
    /// Behaviour triggered on activation.
    pub effect: SkillEffect,
    /// Time that must elapse before the skill can be used again.
    pub cooldown: Duration,
}

impl Skill {
    const fn new(effect: SkillEffect, cooldown_secs: u64) -> Self {
        Self {
            effect,
            cooldown: Duration::from_secs(cooldown_secs),
        }
    }
}

/// Effect kinds a skill may trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkillEffect {
    /// Area damage around the hero.
    SpinAttack,
    /// Multiplies the next successful hit.
    PowerStrike,
    /// Projectiles at the nearest enemies.
    MultiShot,
    /// Area damage at the arena center.
    Meteor,
    /// Teleport next to the nearest enemy and land a guaranteed critical hit.
    ShadowStrike,
}

impl SkillEffect {
    /// Attack multiplier applied by the effect.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::SpinAttack => 2.0,
            Self::PowerStrike => 3.0,
            Self::MultiShot => 1.5,
            Self::Meteor => 5.0,
            Self::ShadowStrike => 2.0,
        }
    }

    /// Radius of area effects; `None` for targeted effects.
    #[must_use]
    pub const fn radius(self) -> Option<f32> {
        match self {
            Self::SpinAttack => Some(100.0),
            Self::Meteor => Some(120.0),
            Self::PowerStrike | Self::MultiShot | Self::ShadowStrike => None,
        }
    }
}

/// Kinds of items that can be summoned into a merge grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Raises attack.
    SwordGem,
    /// Raises defense.
    ShieldGem,
    /// Raises attack speed.
    SpeedGem,
    /// Raises critical hit chance.
    CritGem,
    /// Raises hit points.
    LifeGem,
}

impl ItemKind {
    /// Every item kind; summons pick uniformly from this list.
    pub const ALL: [Self; 5] = [
        Self::SwordGem,
        Self::ShieldGem,
        Self::SpeedGem,
        Self::CritGem,
        Self::LifeGem,
    ];

    /// Stat the item contributes to.
    #[must_use]
    pub const fn category(self) -> StatCategory {
        match self {
            Self::SwordGem => StatCategory::Attack,
            Self::ShieldGem => StatCategory::Defense,
            Self::SpeedGem => StatCategory::AttackSpeed,
            Self::CritGem => StatCategory::CritChance,
            Self::LifeGem => StatCategory::Hp,
        }
    }

    /// Stat gained per item level.
    #[must_use]
    pub const fn value_per_level(self) -> f64 {
        match self {
            Self::SwordGem => 5.0,
            Self::ShieldGem => 3.0,
            Self::SpeedGem => 0.05,
            Self::CritGem => 0.02,
            Self::LifeGem => 10.0,
        }
    }
}

/// Stat bucket an item contributes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StatCategory {
    /// Flat attack damage.
    Attack,
    /// Reserved; heroes do not take damage.
    Defense,
    /// Attacks per second.
    AttackSpeed,
    /// Probability of a critical hit.
    CritChance,
    /// Reserved; heroes do not take damage.
    Hp,
}

/// Regular enemy kinds, ordered by the stage band they appear in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Stages 0 to 9.
    Slime,
    /// Stages 10 to 19.
    Goblin,
    /// Stages 20 to 29.
    Skeleton,
    /// Stages 30 to 39.
    Orc,
    /// Stage 40 onwards.
    Demon,
}

impl EnemyKind {
    const BANDS: [Self; 5] = [
        Self::Slime,
        Self::Goblin,
        Self::Skeleton,
        Self::Orc,
        Self::Demon,
    ];

    /// Enemy kind spawned during the provided stage.
    #[must_use]
    pub fn for_stage(stage: u32) -> Self {
        let index = (stage / 10).min(4) as usize;
        Self::BANDS[index]
    }

    /// Hit point multiplier relative to the stage baseline.
    #[must_use]
    pub const fn hp_multiplier(self) -> f64 {
        match self {
            Self::Slime => 1.0,
            Self::Goblin => 1.2,
            Self::Skeleton => 0.8,
            Self::Orc => 1.5,
            Self::Demon => 2.0,
        }
    }

    /// Speed multiplier relative to the base enemy speed.
    #[must_use]
    pub const fn speed_multiplier(self) -> f32 {
        match self {
            Self::Slime => 1.0,
            Self::Goblin => 1.1,
            Self::Skeleton => 1.3,
            Self::Orc => 0.8,
            Self::Demon => 0.9,
        }
    }
}

/// Boss kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossKind {
    /// Common boss.
    KingSlime,
    /// Uncommon boss.
    OrcChief,
    /// Rare boss.
    Dragon,
    /// Rarest boss.
    DemonLord,
}

impl BossKind {
    /// Every boss kind.
    pub const ALL: [Self; 4] = [
        Self::KingSlime,
        Self::OrcChief,
        Self::Dragon,
        Self::DemonLord,
    ];

    /// Relative likelihood of the boss appearing on a campaign boss wave.
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::KingSlime => 4,
            Self::OrcChief => 3,
            Self::Dragon => 2,
            Self::DemonLord => 1,
        }
    }

    /// Boss guarding the provided tower floor.
    #[must_use]
    pub fn for_floor(floor: u32) -> Self {
        Self::ALL[((floor / 5) % 4) as usize]
    }
}

/// Flat identifier covering every enemy and boss, used for the codex.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoeKind {
    /// [`EnemyKind::Slime`].
    Slime,
    /// [`EnemyKind::Goblin`].
    Goblin,
    /// [`EnemyKind::Skeleton`].
    Skeleton,
    /// [`EnemyKind::Orc`].
    Orc,
    /// [`EnemyKind::Demon`].
    Demon,
    /// [`BossKind::KingSlime`].
    KingSlime,
    /// [`BossKind::OrcChief`].
    OrcChief,
    /// [`BossKind::Dragon`].
    Dragon,
    /// [`BossKind::DemonLord`].
    DemonLord,
}

impl FoeKind {
    /// Reports whether the foe is a boss.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(
            self,
            Self::KingSlime | Self::OrcChief | Self::Dragon | Self::DemonLord
        )
    }
}

impl From<EnemyKind> for FoeKind {
    fn from(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Slime => Self::Slime,
            EnemyKind::Goblin => Self::Goblin,
            EnemyKind::Skeleton => Self::Skeleton,
            EnemyKind::Orc => Self::Orc,
            EnemyKind::Demon => Self::Demon,
        }
    }
}

impl From<BossKind> for FoeKind {
    fn from(kind: BossKind) -> Self {
        match kind {
            BossKind::KingSlime => Self::KingSlime,
            BossKind::OrcChief => Self::OrcChief,
            BossKind::Dragon => Self::Dragon,
            BossKind::DemonLord => Self::DemonLord,
        }
    }
}

/// Independent global upgrade tracks purchased with gold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeTrack {
    /// Multiplies attack.
    Attack,
    /// Multiplies attack speed.
    AttackSpeed,
    /// Multiplies movement speed.
    MoveSpeed,
    /// Adds critical hit chance.
    CritChance,
    /// Adds critical damage.
    CritDamage,
    /// Multiplies kill gold.
    GoldBonus,
}

impl UpgradeTrack {
    /// Every upgrade track.
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::AttackSpeed,
        Self::MoveSpeed,
        Self::CritChance,
        Self::CritDamage,
        Self::GoldBonus,
    ];

    /// Bonus granted per purchased level.
    #[must_use]
    pub const fn bonus_per_level(self) -> f64 {
        match self {
            Self::Attack => 0.05,
            Self::AttackSpeed => 0.03,
            Self::MoveSpeed => 0.02,
            Self::CritChance => 0.01,
            Self::CritDamage => 0.1,
            Self::GoldBonus => 0.05,
        }
    }

    const fn pricing(self) -> (f64, f64) {
        match self {
            Self::Attack => (100.0, 1.5),
            Self::AttackSpeed => (150.0, 1.6),
            Self::MoveSpeed => (120.0, 1.4),
            Self::CritChance => (200.0, 1.7),
            Self::CritDamage => (180.0, 1.6),
            Self::GoldBonus => (250.0, 1.8),
        }
    }

    /// Gold price of the next level when the track sits at `level`.
    #[must_use]
    pub fn cost(self, level: u32) -> u64 {
        let (base, growth) = self.pricing();
        (base * growth.powf(f64::from(level))).floor() as u64
    }
}

/// Items purchasable with gems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShopItem {
    /// Small gold bundle.
    GoldPack,
    /// Large gold bundle.
    MegaGold,
    /// Level 3 item for the selected class.
    RandomItem,
    /// Level 5 item for the selected class.
    LegendaryItem,
    /// Clears every skill cooldown.
    SkillReset,
}

impl ShopItem {
    /// Gem price.
    #[must_use]
    pub const fn gem_cost(self) -> u64 {
        match self {
            Self::GoldPack => 10,
            Self::MegaGold => 40,
            Self::RandomItem => 30,
            Self::LegendaryItem => 80,
            Self::SkillReset => 20,
        }
    }

    /// Effect of the purchase.
    #[must_use]
    pub const fn reward(self) -> ShopReward {
        match self {
            Self::GoldPack => ShopReward::Gold(1_000),
            Self::MegaGold => ShopReward::Gold(5_000),
            Self::RandomItem => ShopReward::Item { level: 3 },
            Self::LegendaryItem => ShopReward::Item { level: 5 },
            Self::SkillReset => ShopReward::SkillReset,
        }
    }
}

/// What a shop purchase delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShopReward {
    /// Gold credited immediately.
    Gold(u64),
    /// Random item of the given level placed in the selected grid.
    Item {
        /// Level of the granted item.
        level: u32,
    },
    /// Clears every skill cooldown.
    SkillReset,
}

/// Loot box rarities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LootBoxKind {
    /// Dropped rarely by regular enemies.
    Common,
    /// Boss drop.
    Rare,
    /// Boss drop.
    Epic,
    /// Boss drop.
    Legendary,
}

impl LootBoxKind {
    /// Weighted reward table rolled when the box opens.
    #[must_use]
    pub const fn drops(self) -> [LootDrop; 3] {
        match self {
            Self::Common => [
                LootDrop::new(LootRoll::Gold { min: 100, max: 500 }, 0.6),
                LootDrop::new(LootRoll::Item { min: 1, max: 1 }, 0.35),
                LootDrop::new(LootRoll::Gems { min: 1, max: 3 }, 0.05),
            ],
            Self::Rare => [
                LootDrop::new(LootRoll::Gold { min: 500, max: 2_000 }, 0.4),
                LootDrop::new(LootRoll::Item { min: 2, max: 3 }, 0.45),
                LootDrop::new(LootRoll::Gems { min: 5, max: 15 }, 0.15),
            ],
            Self::Epic => [
                LootDrop::new(LootRoll::Gold { min: 2_000, max: 5_000 }, 0.3),
                LootDrop::new(LootRoll::Item { min: 3, max: 5 }, 0.5),
                LootDrop::new(LootRoll::Gems { min: 15, max: 30 }, 0.2),
            ],
            Self::Legendary => [
                LootDrop::new(LootRoll::Gold { min: 5_000, max: 15_000 }, 0.2),
                LootDrop::new(LootRoll::Item { min: 5, max: 7 }, 0.55),
                LootDrop::new(LootRoll::Gems { min: 30, max: 100 }, 0.25),
            ],
        }
    }

    /// Box dropped by a boss for the provided uniform roll in `[0, 1)`.
    #[must_use]
    pub fn for_boss_roll(roll: f64) -> Self {
        if roll < 0.5 {
            Self::Rare
        } else if roll < 0.8 {
            Self::Epic
        } else {
            Self::Legendary
        }
    }
}

/// One weighted entry of a loot table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootDrop {
    /// Reward range.
    pub roll: LootRoll,
    /// Relative weight.
    pub weight: f64,
}

impl LootDrop {
    const fn new(roll: LootRoll, weight: f64) -> Self {
        Self { roll, weight }
    }
}

/// Inclusive reward ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LootRoll {
    /// Gold between `min` and `max`.
    Gold {
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },
    /// Random item with a level between `min` and `max`.
    Item {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },
    /// Gems between `min` and `max`.
    Gems {
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },
}

/// Concrete reward produced by opening a loot box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LootReward {
    /// Gold credited.
    Gold(u64),
    /// Gems credited.
    Gems(u64),
    /// Item placed into the selected grid.
    Item {
        /// Class whose grid received the item.
        class: HeroClassId,
        /// Slot that received the item.
        slot: usize,
        /// The granted item.
        item: ItemStack,
    },
    /// Item that found no free slot and was converted into gold.
    Converted {
        /// Gold credited instead of the item.
        gold: u64,
    },
}

/// Milestones that grant a one-time gem reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// First kill.
    FirstKill,
    /// 100 kills.
    Killer100,
    /// 1000 kills.
    Killer1000,
    /// Reach stage 10.
    Stage10,
    /// Reach stage 50.
    Stage50,
    /// Unlock every class.
    UnlockAll,
    /// 50 merges.
    Merge50,
    /// First boss kill.
    BossFirst,
    /// 10 boss kills.
    Boss10,
}

impl AchievementId {
    /// Every achievement.
    pub const ALL: [Self; 9] = [
        Self::FirstKill,
        Self::Killer100,
        Self::Killer1000,
        Self::Stage10,
        Self::Stage50,
        Self::UnlockAll,
        Self::Merge50,
        Self::BossFirst,
        Self::Boss10,
    ];

    /// Condition that completes the achievement.
    #[must_use]
    pub const fn requirement(self) -> Milestone {
        match self {
            Self::FirstKill => Milestone::Kills(1),
            Self::Killer100 => Milestone::Kills(100),
            Self::Killer1000 => Milestone::Kills(1_000),
            Self::Stage10 => Milestone::BestStage(10),
            Self::Stage50 => Milestone::BestStage(50),
            Self::UnlockAll => Milestone::UnlockedClasses(5),
            Self::Merge50 => Milestone::Merges(50),
            Self::BossFirst => Milestone::BossKills(1),
            Self::Boss10 => Milestone::BossKills(10),
        }
    }

    /// Gems granted when the achievement unlocks.
    #[must_use]
    pub const fn gem_reward(self) -> u64 {
        match self {
            Self::FirstKill => 5,
            Self::Killer100 => 20,
            Self::Killer1000 => 50,
            Self::Stage10 => 30,
            Self::Stage50 => 100,
            Self::UnlockAll => 200,
            Self::Merge50 => 25,
            Self::BossFirst => 15,
            Self::Boss10 => 50,
        }
    }
}

/// Threshold over lifetime statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    /// Lifetime kills.
    Kills(u64),
    /// Best stage reached.
    BestStage(u32),
    /// Number of unlocked classes.
    UnlockedClasses(usize),
    /// Lifetime merges.
    Merges(u64),
    /// Lifetime boss kills.
    BossKills(u64),
}

/// Reset cadence of a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestPeriod {
    /// Resets when the calendar date changes.
    Daily,
    /// Resets at the start of each ISO week.
    Weekly,
}

/// Counter a quest tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestMetric {
    /// Enemies killed.
    Kills,
    /// Bosses killed.
    BossKills,
    /// Merges performed.
    Merges,
    /// Items summoned.
    Summons,
    /// Stages cleared.
    StageClears,
    /// Whole minutes of play.
    PlayMinutes,
}

/// Daily and weekly quests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestId {
    /// Kill 50 enemies today.
    DailyKills,
    /// Kill a boss today.
    DailyBoss,
    /// Merge 10 times today.
    DailyMerges,
    /// Summon 5 items today.
    DailySummons,
    /// Clear a stage today.
    DailyStageClear,
    /// Kill 500 enemies this week.
    WeeklyKills,
    /// Kill 10 bosses this week.
    WeeklyBosses,
    /// Merge 100 times this week.
    WeeklyMerges,
    /// Play for 60 minutes this week.
    WeeklyPlaytime,
}

impl QuestId {
    /// Every quest.
    pub const ALL: [Self; 9] = [
        Self::DailyKills,
        Self::DailyBoss,
        Self::DailyMerges,
        Self::DailySummons,
        Self::DailyStageClear,
        Self::WeeklyKills,
        Self::WeeklyBosses,
        Self::WeeklyMerges,
        Self::WeeklyPlaytime,
    ];

    /// Static definition of the quest.
    #[must_use]
    pub const fn definition(self) -> Quest {
        use QuestMetric as M;
        use QuestPeriod as P;
        match self {
            Self::DailyKills => Quest::new(P::Daily, M::Kills, 50, 500, 5),
            Self::DailyBoss => Quest::new(P::Daily, M::BossKills, 1, 1_000, 10),
            Self::DailyMerges => Quest::new(P::Daily, M::Merges, 10, 300, 3),
            Self::DailySummons => Quest::new(P::Daily, M::Summons, 5, 200, 2),
            Self::DailyStageClear => Quest::new(P::Daily, M::StageClears, 1, 800, 8),
            Self::WeeklyKills => Quest::new(P::Weekly, M::Kills, 500, 5_000, 50),
            Self::WeeklyBosses => Quest::new(P::Weekly, M::BossKills, 10, 10_000, 100),
            Self::WeeklyMerges => Quest::new(P::Weekly, M::Merges, 100, 3_000, 30),
            Self::WeeklyPlaytime => Quest::new(P::Weekly, M::PlayMinutes, 60, 2_000, 20),
        }
    }
}

/// Target and reward of a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quest {
    /// Reset cadence.
    pub period: QuestPeriod,
    /// Tracked counter.
    pub metric: QuestMetric,
    /// Counter value that completes the quest.
    pub target: u64,
    /// Gold reward.
    pub gold: u64,
    /// Gem reward.
    pub gems: u64,
}

impl Quest {
    const fn new(period: QuestPeriod, metric: QuestMetric, target: u64, gold: u64, gems: u64) -> Self {
        Self {
            period,
            metric,
            target,
            gold,
            gems,
        }
    }
}

/// Reward for one day of the login streak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DailyReward {
    /// Gold granted.
    pub gold: u64,
    /// Gems granted.
    pub gems: u64,
    /// Level of the bonus item, if any.
    pub item_level: Option<u32>,
}

/// Seven-day login reward cycle.
pub const DAILY_REWARDS: [DailyReward; 7] = [
    DailyReward { gold: 500, gems: 5, item_level: None },
    DailyReward { gold: 800, gems: 8, item_level: None },
    DailyReward { gold: 1_200, gems: 12, item_level: None },
    DailyReward { gold: 1_500, gems: 15, item_level: None },
    DailyReward { gold: 2_000, gems: 20, item_level: None },
    DailyReward { gold: 2_500, gems: 25, item_level: None },
    DailyReward { gold: 5_000, gems: 50, item_level: Some(3) },
];

/// Challenge runs layered on the campaign wave flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    /// Climb floors by killing a growing number of enemies.
    InfiniteTower,
    /// Kill as many enemies as possible in three minutes.
    TimeAttack,
    /// Keep enemies away from the center for as long as possible.
    Survival,
}

impl ChallengeKind {
    /// Gold and gems granted for a finished run with the provided score.
    #[must_use]
    pub const fn reward(self, score: u64) -> (u64, u64) {
        match self {
            Self::InfiniteTower => (score * 100, score / 5),
            Self::TimeAttack => (score * 50, score / 10),
            Self::Survival => (score * 20, score / 30),
        }
    }
}
