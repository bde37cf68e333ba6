//! Waves, stages, tower floors, achievements and challenge runs.

use std::time::Duration;

use log::info;
use merge_arena_core::{
    balance::{advances_stage, tower_floor_reward, TOWER_UNLOCK_STAGE},
    catalog::{Milestone, QuestMetric},
    AchievementId, ActionError, ChallengeKind, Event, HeroClassId, RunMode,
};

use crate::World;

const TIME_ATTACK_LIMIT: Duration = Duration::from_secs(180);
const SURVIVAL_HP: u32 = 100;
const SURVIVAL_BREACH_DAMAGE: u32 = 10;
const CLIMB_FIRST_TARGET: u32 = 5;
const CLIMB_MAX_TARGET: u32 = 20;
const PLAY_MINUTE: Duration = Duration::from_secs(60);

/// State of an active challenge run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChallengeRun {
    kind: ChallengeKind,
    elapsed: Duration,
    kills: u64,
    floor: u32,
    floor_kills: u32,
    floor_target: u32,
    hp: u32,
}

impl ChallengeRun {
    pub(crate) fn new(kind: ChallengeKind) -> Self {
        Self {
            kind,
            elapsed: Duration::ZERO,
            kills: 0,
            floor: 1,
            floor_kills: 0,
            floor_target: CLIMB_FIRST_TARGET,
            hp: SURVIVAL_HP,
        }
    }

    /// Challenge being played.
    #[must_use]
    pub const fn kind(&self) -> ChallengeKind {
        self.kind
    }

    /// Simulated time since the run started.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Kills during the run.
    #[must_use]
    pub const fn kills(&self) -> u64 {
        self.kills
    }

    /// Floor reached in an infinite tower run.
    #[must_use]
    pub const fn floor(&self) -> u32 {
        self.floor
    }

    /// Hit points left in a survival run.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Simulated time left in a time attack run.
    #[must_use]
    pub fn time_left(&self) -> Option<Duration> {
        (self.kind == ChallengeKind::TimeAttack)
            .then(|| TIME_ATTACK_LIMIT.saturating_sub(self.elapsed))
    }

    /// Score the run would be rewarded for if it ended now.
    #[must_use]
    pub const fn score(&self) -> u64 {
        match self.kind {
            ChallengeKind::InfiniteTower => self.floor as u64,
            ChallengeKind::TimeAttack => self.kills,
            ChallengeKind::Survival => self.elapsed.as_secs(),
        }
    }

    pub(crate) fn record_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
        if self.kind != ChallengeKind::InfiniteTower {
            return;
        }
        self.floor_kills += 1;
        if self.floor_kills >= self.floor_target {
            self.floor = self.floor.saturating_add(1);
            self.floor_kills = 0;
            self.floor_target = CLIMB_MAX_TARGET.min(CLIMB_FIRST_TARGET + self.floor);
        }
    }

    pub(crate) fn breach(&mut self) {
        self.hp = self.hp.saturating_sub(SURVIVAL_BREACH_DAMAGE);
    }

    fn finished(&self) -> bool {
        match self.kind {
            ChallengeKind::InfiniteTower => false,
            ChallengeKind::TimeAttack => self.elapsed >= TIME_ATTACK_LIMIT,
            ChallengeKind::Survival => self.hp == 0,
        }
    }
}

impl World {
    pub(crate) fn complete_wave(&mut self, out_events: &mut Vec<Event>) {
        if !self.mode.runs_waves() {
            return;
        }
        let finished = self.profile.wave;
        self.profile.wave = finished.saturating_add(1);
        out_events.push(Event::WaveCompleted { wave: finished });

        if !advances_stage(self.profile.wave) {
            return;
        }
        let profile = &mut self.profile;
        profile.stage = profile.stage.saturating_add(1);
        profile.best_stage = profile.best_stage.max(profile.stage);
        profile.quests.record(QuestMetric::StageClears, 1);
        info!("advanced to stage {}", profile.stage);
        out_events.push(Event::StageAdvanced {
            stage: profile.stage,
        });

        self.unlock_heroes(out_events);
        self.rebuild_heroes();
    }

    fn unlock_heroes(&mut self, out_events: &mut Vec<Event>) {
        let stage = self.profile.stage;
        for class in HeroClassId::ALL {
            let Some(hero) = self.profile.heroes.get_mut(&class) else {
                continue;
            };
            if !hero.unlocked && class.class().unlock_stage <= stage {
                hero.unlocked = true;
                info!("{} joined the arena", class.class().name);
                out_events.push(Event::HeroUnlocked { class });
            }
        }
    }

    pub(crate) fn check_achievements(&mut self, out_events: &mut Vec<Event>) {
        for achievement in AchievementId::ALL {
            if self.profile.achievements.contains(&achievement) || !self.milestone_met(achievement) {
                continue;
            }
            let gems = achievement.gem_reward();
            let _ = self.profile.achievements.insert(achievement);
            self.profile.gems = self.profile.gems.saturating_add(gems);
            out_events.push(Event::AchievementUnlocked { achievement, gems });
        }
    }

    fn milestone_met(&self, achievement: AchievementId) -> bool {
        let stats = &self.profile.stats;
        match achievement.requirement() {
            Milestone::Kills(kills) => stats.kills >= kills,
            Milestone::BestStage(stage) => self.profile.best_stage >= stage,
            Milestone::UnlockedClasses(count) => self.profile.unlocked_classes().count() >= count,
            Milestone::Merges(merges) => stats.merges >= merges,
            Milestone::BossKills(kills) => stats.boss_kills >= kills,
        }
    }

    pub(crate) fn clear_tower_floor(&mut self, out_events: &mut Vec<Event>) {
        if self.mode != RunMode::Tower {
            return;
        }
        let tower = &mut self.profile.tower;
        let floor = tower.floor;
        tower.floor = floor.saturating_add(1);
        tower.highest_floor = tower.highest_floor.max(tower.floor);

        let (gold, gems) = tower_floor_reward(floor);
        self.profile.gold = self.profile.gold.saturating_add(gold);
        self.profile.gems = self.profile.gems.saturating_add(gems);
        self.profile.stats.gold_earned = self.profile.stats.gold_earned.saturating_add(gold);
        info!("tower floor {floor} cleared for {gold} gold and {gems} gems");
        out_events.push(Event::TowerFloorCleared { floor, gold, gems });
    }

    pub(crate) fn set_run_mode(&mut self, mode: RunMode, out_events: &mut Vec<Event>) -> Result<(), ActionError> {
        if mode == RunMode::Tower && self.profile.best_stage < TOWER_UNLOCK_STAGE {
            return Err(ActionError::Locked {
                stage: TOWER_UNLOCK_STAGE,
            });
        }

        if let Some(run) = self.challenge.take() {
            self.end_challenge(run, out_events);
        }
        self.clear_battlefield();
        self.mode = mode;
        if let RunMode::Challenge(kind) = mode {
            self.challenge = Some(ChallengeRun::new(kind));
            info!("{kind:?} challenge started");
            out_events.push(Event::ChallengeStarted { kind });
        }
        out_events.push(Event::RunModeChanged { mode });
        Ok(())
    }

    pub(crate) fn advance_challenge(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Some(run) = self.challenge.as_mut() else {
            return;
        };
        run.elapsed = run.elapsed.saturating_add(dt);
        if !run.finished() {
            return;
        }

        let run = *run;
        self.challenge = None;
        self.end_challenge(run, out_events);
        self.clear_battlefield();
        self.mode = RunMode::Campaign;
        out_events.push(Event::RunModeChanged {
            mode: RunMode::Campaign,
        });
    }

    fn end_challenge(&mut self, run: ChallengeRun, out_events: &mut Vec<Event>) {
        let kind = run.kind;
        let score = run.score();
        let (gold, gems) = kind.reward(score);
        let best = self.profile.challenges.entry(kind).or_insert(0);
        let record = score > *best;
        if record {
            *best = score;
        }
        self.profile.gold = self.profile.gold.saturating_add(gold);
        self.profile.gems = self.profile.gems.saturating_add(gems);
        info!("{kind:?} challenge ended with score {score}");
        out_events.push(Event::ChallengeEnded {
            kind,
            score,
            gold,
            gems,
            record,
        });
    }

    pub(crate) fn accrue_play_time(&mut self, dt: Duration) {
        self.profile.stats.play_time = self.profile.stats.play_time.saturating_add(dt);
        self.minute_progress = self.minute_progress.saturating_add(dt);
        while self.minute_progress >= PLAY_MINUTE {
            self.minute_progress -= PLAY_MINUTE;
            self.profile.quests.record(QuestMetric::PlayMinutes, 1);
        }
    }
}
