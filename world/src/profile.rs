//! Persisted player progress.
//!
//! Every structure in this module deserializes with `#[serde(default)]`, so
//! snapshots written by older builds load with documented defaults for the
//! fields they lack.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use chrono::{Datelike, Days, NaiveDate};
use merge_arena_core::{
    balance::{STARTING_GOLD, SUMMON_COST_BASE},
    catalog::{Quest, QuestMetric, QuestPeriod},
    AchievementId, ActionError, ChallengeKind, FoeKind, HeroClassId, LootBoxKind, MergeGrid,
    QuestId, UpgradeLevels,
};
use serde::{Deserialize, Serialize};

/// Persisted game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Soft currency. Defaults to 100.
    pub gold: u64,
    /// Premium currency. Defaults to 0.
    pub gems: u64,
    /// Current campaign stage. Defaults to 1.
    pub stage: u32,
    /// Current campaign wave. Defaults to 1.
    pub wave: u32,
    /// Highest stage ever reached. Defaults to 1.
    pub best_stage: u32,
    /// Unlock flag and merge grid of every class. Only the starter class is unlocked by default.
    pub heroes: BTreeMap<HeroClassId, HeroProgress>,
    /// Global upgrade levels. Default to 0.
    pub upgrades: UpgradeLevels,
    /// Lifetime counters.
    pub stats: LifetimeStats,
    /// Unlocked achievements.
    pub achievements: BTreeSet<AchievementId>,
    /// Unfloored price of the next summon. Defaults to 10.
    pub summon_cost: f64,
    /// Player settings.
    pub settings: Settings,
    /// Login reward streak.
    pub daily: DailyStreak,
    /// Quest progress.
    pub quests: QuestBook,
    /// Unopened loot boxes per rarity.
    pub loot_boxes: BTreeMap<LootBoxKind, u32>,
    /// Best score of every challenge kind.
    pub challenges: BTreeMap<ChallengeKind, u64>,
    /// Discovered foes.
    pub codex: BTreeMap<FoeKind, CodexEntry>,
    /// Endless tower progress.
    pub tower: TowerProgress,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            gold: STARTING_GOLD,
            gems: 0,
            stage: 1,
            wave: 1,
            best_stage: 1,
            heroes: HeroClassId::ALL
                .into_iter()
                .map(|class| (class, HeroProgress::new(class == HeroClassId::STARTER)))
                .collect(),
            upgrades: UpgradeLevels::default(),
            stats: LifetimeStats::default(),
            achievements: BTreeSet::new(),
            summon_cost: SUMMON_COST_BASE,
            settings: Settings::default(),
            daily: DailyStreak::default(),
            quests: QuestBook::default(),
            loot_boxes: BTreeMap::new(),
            challenges: BTreeMap::new(),
            codex: BTreeMap::new(),
            tower: TowerProgress::default(),
        }
    }
}

impl Profile {
    /// Repairs values a partial or hand-edited snapshot may carry.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for class in HeroClassId::ALL {
            let _ = self
                .heroes
                .entry(class)
                .or_insert_with(|| HeroProgress::new(false));
        }
        if let Some(starter) = self.heroes.get_mut(&HeroClassId::STARTER) {
            starter.unlocked = true;
        }
        self.wave = self.wave.max(1);
        self.best_stage = self.best_stage.max(self.stage);
        if !self.summon_cost.is_finite() || self.summon_cost < SUMMON_COST_BASE {
            self.summon_cost = SUMMON_COST_BASE;
        }
        self.tower.floor = self.tower.floor.max(1);
        self
    }

    /// Reports whether `class` is unlocked.
    #[must_use]
    pub fn is_unlocked(&self, class: HeroClassId) -> bool {
        self.heroes.get(&class).is_some_and(|hero| hero.unlocked)
    }

    /// Unlocked classes in catalog order.
    pub fn unlocked_classes(&self) -> impl Iterator<Item = HeroClassId> + '_ {
        HeroClassId::ALL
            .into_iter()
            .filter(|class| self.is_unlocked(*class))
    }

    /// Merge grid of `class`.
    #[must_use]
    pub fn grid(&self, class: HeroClassId) -> Option<&MergeGrid> {
        self.heroes.get(&class).map(|hero| &hero.grid)
    }

    pub(crate) fn grid_mut(&mut self, class: HeroClassId) -> Option<&mut MergeGrid> {
        self.heroes.get_mut(&class).map(|hero| &mut hero.grid)
    }

    /// Number of unopened loot boxes of `kind`.
    #[must_use]
    pub fn loot_box_count(&self, kind: LootBoxKind) -> u32 {
        self.loot_boxes.get(&kind).copied().unwrap_or(0)
    }
}

/// Unlock flag and merge grid of a class.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroProgress {
    /// Whether the class fights in the arena.
    pub unlocked: bool,
    /// Equipped items.
    pub grid: MergeGrid,
}

impl HeroProgress {
    fn new(unlocked: bool) -> Self {
        Self {
            unlocked,
            grid: MergeGrid::new(),
        }
    }
}

/// Lifetime counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifetimeStats {
    /// Enemies killed, including offline credit.
    pub kills: u64,
    /// Bosses killed.
    pub boss_kills: u64,
    /// Merges performed.
    pub merges: u64,
    /// Items summoned.
    pub summons: u64,
    /// Gold earned from kills and offline rewards.
    pub gold_earned: u64,
    /// Simulated time played.
    pub play_time: Duration,
}

/// Player settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether grids merge automatically. Defaults to off.
    pub auto_merge: bool,
    /// Whether presentation layers play sound. Defaults to on.
    pub sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_merge: false,
            sound: true,
        }
    }
}

/// Login reward streak.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyStreak {
    /// Date of the last claim.
    pub last_claim: Option<NaiveDate>,
    /// Consecutive days claimed.
    pub streak: u32,
}

impl DailyStreak {
    /// Zero-based index into the reward cycle for a claim on `today`.
    pub(crate) fn claim(&mut self, today: NaiveDate) -> Result<usize, ActionError> {
        if let Some(last) = self.last_claim {
            if last == today {
                return Err(ActionError::AlreadyClaimed);
            }
            if (today - last).num_days() > 1 {
                self.streak = 0;
            }
        }
        let index = (self.streak % 7) as usize;
        self.streak = self.streak.saturating_add(1);
        self.last_claim = Some(today);
        Ok(index)
    }
}

/// Daily and weekly quest progress.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestBook {
    /// Date the daily counters started.
    pub daily_start: Option<NaiveDate>,
    /// Monday the weekly counters started.
    pub weekly_start: Option<NaiveDate>,
    /// Daily counters.
    pub daily: BTreeMap<QuestMetric, u64>,
    /// Weekly counters.
    pub weekly: BTreeMap<QuestMetric, u64>,
    /// Quests claimed in their current period.
    pub claimed: BTreeSet<QuestId>,
}

impl QuestBook {
    /// Adds `amount` to `metric` in both buckets.
    pub(crate) fn record(&mut self, metric: QuestMetric, amount: u64) {
        for bucket in [&mut self.daily, &mut self.weekly] {
            let counter = bucket.entry(metric).or_insert(0);
            *counter = counter.saturating_add(amount);
        }
    }

    /// Current counter value for `quest`.
    #[must_use]
    pub fn progress(&self, quest: QuestId) -> u64 {
        let definition = quest.definition();
        let bucket = match definition.period {
            QuestPeriod::Daily => &self.daily,
            QuestPeriod::Weekly => &self.weekly,
        };
        bucket.get(&definition.metric).copied().unwrap_or(0)
    }

    /// Starts new periods that began on or before `today`.
    pub(crate) fn refresh(&mut self, today: NaiveDate) {
        if self.daily_start != Some(today) {
            self.daily.clear();
            self.claimed
                .retain(|quest| quest.definition().period != QuestPeriod::Daily);
            self.daily_start = Some(today);
        }

        let monday = week_start(today);
        if self.weekly_start != Some(monday) {
            self.weekly.clear();
            self.claimed
                .retain(|quest| quest.definition().period != QuestPeriod::Weekly);
            self.weekly_start = Some(monday);
        }
    }

    /// Marks a finished quest as claimed and returns its definition.
    pub(crate) fn claim(&mut self, quest: QuestId) -> Result<Quest, ActionError> {
        if self.claimed.contains(&quest) {
            return Err(ActionError::AlreadyClaimed);
        }
        let definition = quest.definition();
        if self.progress(quest) < definition.target {
            return Err(ActionError::Incomplete);
        }
        let _ = self.claimed.insert(quest);
        Ok(definition)
    }
}

fn week_start(day: NaiveDate) -> NaiveDate {
    let offset = u64::from(day.weekday().num_days_from_monday());
    day.checked_sub_days(Days::new(offset)).unwrap_or(day)
}

/// Codex record of a foe kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodexEntry {
    /// Kills of this kind.
    pub kills: u64,
    /// Stage during which the kind was first killed.
    pub first_stage: u32,
}

/// Endless tower progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerProgress {
    /// Floor the next tower run fights on. Defaults to 1.
    pub floor: u32,
    /// Highest floor reached. Defaults to 0.
    pub highest_floor: u32,
}

impl Default for TowerProgress {
    fn default() -> Self {
        Self {
            floor: 1,
            highest_floor: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn defaults_unlock_only_the_starter() {
        let profile = Profile::default();
        assert_eq!(profile.gold, 100);
        assert_eq!(profile.stage, 1);
        assert_eq!(
            profile.unlocked_classes().collect::<Vec<_>>(),
            vec![HeroClassId::Warrior]
        );
        assert!(profile.settings.sound);
        assert!(!profile.settings.auto_merge);
    }

    #[test]
    fn missing_fields_take_documented_defaults() {
        let profile: Profile =
            serde_json::from_str(r#"{"gems": 7, "heroes": {"axe": {"unlocked": true}}}"#)
                .expect("partial profile");
        let profile = profile.normalized();

        assert_eq!(profile.gold, 100);
        assert_eq!(profile.gems, 7);
        assert!(profile.is_unlocked(HeroClassId::Warrior));
        assert!(profile.is_unlocked(HeroClassId::Axe));
        assert!(!profile.is_unlocked(HeroClassId::Mage));
        assert_eq!(profile.heroes.len(), HeroClassId::ALL.len());
        assert_eq!(profile.summon_cost, SUMMON_COST_BASE);
    }

    #[test]
    fn daily_streak_resets_after_a_gap() {
        let mut streak = DailyStreak::default();
        assert_eq!(streak.claim(date(2024, 3, 1)), Ok(0));
        assert_eq!(streak.claim(date(2024, 3, 1)), Err(ActionError::AlreadyClaimed));
        assert_eq!(streak.claim(date(2024, 3, 2)), Ok(1));
        assert_eq!(streak.claim(date(2024, 3, 5)), Ok(0));
    }

    #[test]
    fn quest_periods_reset_independently() {
        let mut book = QuestBook::default();
        book.refresh(date(2024, 3, 6));
        book.record(QuestMetric::Kills, 60);
        assert_eq!(book.progress(QuestId::DailyKills), 60);
        assert!(book.claim(QuestId::DailyKills).is_ok());
        assert_eq!(book.claim(QuestId::DailyKills), Err(ActionError::AlreadyClaimed));
        assert_eq!(book.claim(QuestId::WeeklyKills), Err(ActionError::Incomplete));

        book.refresh(date(2024, 3, 7));
        assert_eq!(book.progress(QuestId::DailyKills), 0);
        assert_eq!(book.progress(QuestId::WeeklyKills), 60);
        assert!(!book.claimed.contains(&QuestId::DailyKills));

        book.refresh(date(2024, 3, 11));
        assert_eq!(book.progress(QuestId::WeeklyKills), 0);
        assert_eq!(book.weekly_start, Some(date(2024, 3, 11)));
    }
}
