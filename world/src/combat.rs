//! Enemies, projectiles, damage and kill resolution.

use std::{mem, time::Duration};

use log::{debug, info};
use merge_arena_core::{
    balance::{
        stage_enemy_hp, stage_gold_bounty, tower_enemy_gold, tower_enemy_hp, BOSS_GEM_REWARD,
        BOSS_HP_MULTIPLIER, BOSS_RADIUS, BOSS_SPEED_MULTIPLIER, CODEX_BOSS_GEMS, CODEX_ENEMY_GEMS,
        COMMON_BOX_CHANCE, ENEMY_ARRIVAL_DISTANCE, ENEMY_BASE_SPEED, ENEMY_RADIUS,
        GEM_DROP_CHANCE, PROJECTILE_BOUNDS_MARGIN, PROJECTILE_SPEED, TOWER_BOSS_SPEED,
        TOWER_ELITE_RADIUS, TOWER_ENEMY_RADIUS, TOWER_ENEMY_SPEED,
    },
    catalog::QuestMetric,
    AttackType, ChallengeKind, EnemyId, EnemyKind, EnemySnapshot, Event, FloorRank, FoeKind,
    HeroClassId, KillReward, LootBoxKind, RunMode, SpawnPlan, Vec2,
};
use rand::Rng;

use crate::World;

const SURVIVAL_BREACH_DISTANCE: f32 = 30.0;
const ELITE_MULTIPLIER: f64 = 3.0;
const TOWER_BOSS_MULTIPLIER: f64 = 10.0;

/// Gold an enemy drops, before the gold upgrade.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Bounty {
    /// Campaign bounty scaled by the stage current at the kill.
    Stage,
    /// Tower bounty.
    Fixed(u64),
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) foe: FoeKind,
    pub(crate) position: Vec2,
    pub(crate) hp: f64,
    max_hp: f64,
    speed: f32,
    pub(crate) radius: f32,
    pub(crate) boss: bool,
    bounty: Bounty,
}

impl Enemy {
    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            foe: self.foe,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            radius: self.radius,
            boss: self.boss,
        }
    }
}

/// Arrow or bolt flying on the heading it was launched with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projectile {
    /// Position in world units.
    pub position: Vec2,
    /// Velocity in world units per second, fixed at launch.
    pub velocity: Vec2,
    /// Enemy the projectile can hit. Other enemies in its path are ignored.
    pub target: EnemyId,
    /// Damage dealt on impact.
    pub damage: f64,
    /// Whether the hit counts as critical.
    pub crit: bool,
}

impl Projectile {
    pub(crate) fn launch(from: Vec2, towards: Vec2, target: EnemyId, damage: f64, crit: bool) -> Self {
        Self {
            position: from,
            velocity: (towards - from).normalize_or_zero() * PROJECTILE_SPEED,
            target,
            damage,
            crit,
        }
    }
}

struct Blueprint {
    foe: FoeKind,
    hp: f64,
    speed: f32,
    radius: f32,
    boss: bool,
    bounty: Bounty,
}

impl World {
    pub(crate) fn spawn_enemy(&mut self, plan: SpawnPlan, angle: f32, out_events: &mut Vec<Event>) {
        let stage = self.profile.stage;
        let blueprint = match (plan, self.mode) {
            (SpawnPlan::Wave { enemy }, mode) if mode.runs_waves() => wave_blueprint(enemy, stage),
            (SpawnPlan::WaveBoss { boss }, mode) if mode.runs_waves() => Blueprint {
                foe: boss.into(),
                hp: stage_enemy_hp(stage) * BOSS_HP_MULTIPLIER,
                speed: ENEMY_BASE_SPEED * BOSS_SPEED_MULTIPLIER,
                radius: BOSS_RADIUS,
                boss: true,
                bounty: Bounty::Stage,
            },
            (SpawnPlan::Floor { floor, rank }, RunMode::Tower) => floor_blueprint(floor, rank),
            _ => return,
        };

        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let position = self.arena.spawn_point(angle);
        debug!("spawned {:?} #{} at {position}", blueprint.foe, id.get());

        let _ = self.enemies.insert(
            id,
            Enemy {
                id,
                foe: blueprint.foe,
                position,
                hp: blueprint.hp,
                max_hp: blueprint.hp,
                speed: blueprint.speed,
                radius: blueprint.radius,
                boss: blueprint.boss,
                bounty: blueprint.bounty,
            },
        );
        out_events.push(Event::EnemySpawned {
            enemy: id,
            foe: blueprint.foe,
            position,
        });
        if let SpawnPlan::WaveBoss { boss }
        | SpawnPlan::Floor {
            rank: FloorRank::Boss(boss),
            ..
        } = plan
        {
            out_events.push(Event::BossAppeared { enemy: id, boss });
        }
    }

    /// Performs a basic attack when the hero is in range and off cooldown.
    pub(crate) fn hero_attack(&mut self, class: HeroClassId, target: EnemyId, out_events: &mut Vec<Event>) {
        let clock = self.clock;
        let Some(enemy) = self.enemies.get(&target) else {
            return;
        };
        let (enemy_position, enemy_radius) = (enemy.position, enemy.radius);
        let Some(hero) = self.heroes.iter_mut().find(|hero| hero.class == class) else {
            return;
        };

        let reach = hero.stats.range as f32 + enemy_radius;
        if hero.position.distance(enemy_position) > reach || !hero.ready_in(clock).is_zero() {
            return;
        }

        let stats = hero.stats;
        let crit = self.rng.gen::<f64>() < stats.crit_chance;
        let mut damage = stats.attack;
        if crit {
            damage *= stats.crit_damage;
        }
        if let Some(multiplier) = hero.power_strike.take() {
            damage *= multiplier;
        }
        hero.last_attack = Some(clock);
        let origin = hero.position;

        match stats.attack_type {
            AttackType::Melee => self.strike(target, damage, crit, out_events),
            AttackType::Ranged => self
                .projectiles
                .push(Projectile::launch(origin, enemy_position, target, damage, crit)),
        }
    }

    /// Lands damage on an enemy, resolving the kill when its hit points run out.
    pub(crate) fn strike(&mut self, id: EnemyId, amount: f64, crit: bool, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return;
        };
        enemy.hp -= amount;
        let remaining = enemy.hp;
        self.dps.record(amount);
        self.effects.damage_number(enemy.position, amount, crit);
        out_events.push(Event::EnemyDamaged {
            enemy: id,
            amount,
            crit,
            remaining,
        });

        if remaining <= 0.0 {
            self.resolve_kill(id, out_events);
        }
    }

    /// Grants every kill reward. The enemy leaves the map first, so a second call is a no-op.
    pub(crate) fn resolve_kill(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.remove(&id) else {
            return;
        };

        let multiplier = self.profile.upgrades.gold_multiplier();
        let gold = match enemy.bounty {
            Bounty::Stage => stage_gold_bounty(self.profile.stage, multiplier, enemy.boss),
            Bounty::Fixed(bounty) => (bounty as f64 * multiplier).floor() as u64,
        };
        let gems = if enemy.boss {
            BOSS_GEM_REWARD
        } else {
            u64::from(self.rng.gen_bool(GEM_DROP_CHANCE))
        };

        let profile = &mut self.profile;
        profile.gold = profile.gold.saturating_add(gold);
        profile.gems = profile.gems.saturating_add(gems);
        profile.stats.kills = profile.stats.kills.saturating_add(1);
        profile.stats.gold_earned = profile.stats.gold_earned.saturating_add(gold);
        profile.quests.record(QuestMetric::Kills, 1);
        if enemy.boss {
            profile.stats.boss_kills = profile.stats.boss_kills.saturating_add(1);
            profile.quests.record(QuestMetric::BossKills, 1);
        }

        let stage = profile.stage;
        let entry = profile.codex.entry(enemy.foe).or_default();
        if entry.kills == 0 {
            entry.first_stage = stage;
            let bonus = if enemy.boss {
                CODEX_BOSS_GEMS
            } else {
                CODEX_ENEMY_GEMS
            };
            profile.gems = profile.gems.saturating_add(bonus);
            out_events.push(Event::CodexDiscovered {
                foe: enemy.foe,
                gems: bonus,
            });
        }
        entry.kills = entry.kills.saturating_add(1);

        let loot = if enemy.boss {
            Some(LootBoxKind::for_boss_roll(self.rng.gen()))
        } else if self.rng.gen_bool(COMMON_BOX_CHANCE) {
            Some(LootBoxKind::Common)
        } else {
            None
        };
        if let Some(kind) = loot {
            let count = self.profile.loot_boxes.entry(kind).or_insert(0);
            *count = count.saturating_add(1);
            out_events.push(Event::LootBoxDropped { kind });
        }

        if let Some(run) = self.challenge.as_mut() {
            run.record_kill();
        }

        self.effects.burst(&mut self.rng, enemy.position, enemy.boss);
        self.effects.gold_text(enemy.position, gold);

        out_events.push(Event::EnemyKilled {
            enemy: id,
            foe: enemy.foe,
            reward: KillReward {
                gold,
                gems,
                boss: enemy.boss,
            },
        });
        if enemy.boss {
            info!("boss {:?} defeated for {gold} gold", enemy.foe);
            out_events.push(Event::BossDefeated { enemy: id });
        }
    }

    pub(crate) fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let secs = dt.as_secs_f32();
        let mut in_flight = Vec::with_capacity(self.projectiles.len());

        for mut projectile in mem::take(&mut self.projectiles) {
            projectile.position += projectile.velocity * secs;

            let hit = self.enemies.get(&projectile.target).is_some_and(|enemy| {
                enemy.position.distance(projectile.position) < enemy.radius
            });
            if hit {
                self.strike(projectile.target, projectile.damage, projectile.crit, out_events);
                continue;
            }

            if self.arena.contains(projectile.position, PROJECTILE_BOUNDS_MARGIN) {
                in_flight.push(projectile);
            }
        }

        in_flight.append(&mut self.projectiles);
        self.projectiles = in_flight;
    }

    pub(crate) fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let secs = dt.as_secs_f32();
        let center = self.arena.center();
        let survival = self.mode == RunMode::Challenge(ChallengeKind::Survival);
        let mut breached = Vec::new();

        for enemy in self.enemies.values_mut() {
            let offset = center - enemy.position;
            let distance = offset.length();
            if distance > ENEMY_ARRIVAL_DISTANCE {
                let step = (enemy.speed * secs).min(distance - ENEMY_ARRIVAL_DISTANCE);
                enemy.position += offset / distance * step;
            }
            if survival && enemy.position.distance(center) <= SURVIVAL_BREACH_DISTANCE {
                breached.push(enemy.id);
            }
        }

        for id in breached {
            let _ = self.enemies.remove(&id);
            if let Some(run) = self.challenge.as_mut() {
                run.breach();
            }
            out_events.push(Event::EnemyEscaped { enemy: id });
        }
    }

    /// Removes a boss whose timer ran out. Grants nothing.
    pub(crate) fn expire_boss(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        if !self.enemies.get(&id).is_some_and(|enemy| enemy.boss) {
            return;
        }
        if let Some(boss) = self.enemies.remove(&id) {
            info!("boss {:?} escaped after its time limit", boss.foe);
            out_events.push(Event::BossTimedOut { enemy: id });
        }
    }

    pub(crate) fn clear_battlefield(&mut self) {
        self.enemies.clear();
        self.projectiles.clear();
        self.effects.clear();
        for hero in &mut self.heroes {
            hero.target = None;
        }
    }
}

fn wave_blueprint(enemy: EnemyKind, stage: u32) -> Blueprint {
    Blueprint {
        foe: enemy.into(),
        hp: stage_enemy_hp(stage) * enemy.hp_multiplier(),
        speed: ENEMY_BASE_SPEED * enemy.speed_multiplier(),
        radius: ENEMY_RADIUS,
        boss: false,
        bounty: Bounty::Stage,
    }
}

fn floor_blueprint(floor: u32, rank: FloorRank) -> Blueprint {
    let hp = tower_enemy_hp(floor);
    let gold = tower_enemy_gold(floor) as f64;
    let regular: FoeKind = EnemyKind::for_stage(floor).into();
    match rank {
        FloorRank::Regular => Blueprint {
            foe: regular,
            hp,
            speed: TOWER_ENEMY_SPEED,
            radius: TOWER_ENEMY_RADIUS,
            boss: false,
            bounty: Bounty::Fixed(gold as u64),
        },
        FloorRank::Elite => Blueprint {
            foe: regular,
            hp: hp * ELITE_MULTIPLIER,
            speed: TOWER_ENEMY_SPEED,
            radius: TOWER_ELITE_RADIUS,
            boss: false,
            bounty: Bounty::Fixed((gold * ELITE_MULTIPLIER) as u64),
        },
        FloorRank::Boss(boss) => Blueprint {
            foe: boss.into(),
            hp: hp * TOWER_BOSS_MULTIPLIER,
            speed: TOWER_BOSS_SPEED,
            radius: BOSS_RADIUS,
            boss: true,
            bounty: Bounty::Fixed((gold * TOWER_BOSS_MULTIPLIER) as u64),
        },
    }
}
