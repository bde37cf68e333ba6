//! Balancing constants and the pure formulas built on them.

use std::time::Duration;

/// Number of slots in each class's merge grid.
pub const GRID_SLOTS: usize = 9;

/// Gold held by a fresh profile.
pub const STARTING_GOLD: u64 = 100;
/// Price of the first summon.
pub const SUMMON_COST_BASE: f64 = 10.0;
/// Factor applied to the summon price after every summon.
pub const SUMMON_COST_GROWTH: f64 = 1.08;

/// Spawn quota of a regular wave.
pub const ENEMIES_PER_WAVE: u32 = 10;
/// Every n-th wave is a boss wave.
pub const BOSS_WAVE_INTERVAL: u32 = 5;
/// Completed waves per stage.
pub const WAVES_PER_STAGE: u32 = 10;
/// Simulated time between two spawns.
pub const WAVE_SPAWN_INTERVAL: Duration = Duration::from_millis(1_500);
/// Time a boss may stay alive before it escapes.
pub const BOSS_TIME_LIMIT: Duration = Duration::from_secs(60);

/// Hit points of a stage 0 slime.
pub const ENEMY_BASE_HP: f64 = 50.0;
/// Per-stage hit point growth.
pub const ENEMY_HP_SCALING: f64 = 1.15;
/// Movement speed of a slime in world units per second.
pub const ENEMY_BASE_SPEED: f32 = 30.0;
/// Collision radius of regular enemies.
pub const ENEMY_RADIUS: f32 = 25.0;
/// Boss hit point multiplier.
pub const BOSS_HP_MULTIPLIER: f64 = 10.0;
/// Boss speed relative to the base enemy speed.
pub const BOSS_SPEED_MULTIPLIER: f32 = 0.7;
/// Collision radius of bosses.
pub const BOSS_RADIUS: f32 = 60.0;
/// Enemies stop advancing once this close to the center.
pub const ENEMY_ARRIVAL_DISTANCE: f32 = 10.0;
/// Distance beyond the spawn ring at which enemies appear.
pub const SPAWN_RING_OFFSET: f32 = 30.0;

/// Gold dropped by a stage 0 enemy.
pub const GOLD_PER_ENEMY: f64 = 5.0;
/// Per-stage gold growth.
pub const GOLD_SCALING: f64 = 1.05;
/// Boss gold multiplier.
pub const BOSS_GOLD_MULTIPLIER: f64 = 10.0;
/// Chance for a regular enemy to drop one gem.
pub const GEM_DROP_CHANCE: f64 = 0.02;
/// Gems granted for a boss kill.
pub const BOSS_GEM_REWARD: u64 = 10;
/// Gems granted the first time a regular enemy kind is killed.
pub const CODEX_ENEMY_GEMS: u64 = 2;
/// Gems granted the first time a boss kind is killed.
pub const CODEX_BOSS_GEMS: u64 = 10;
/// Chance for a regular enemy to drop a common loot box.
pub const COMMON_BOX_CHANCE: f64 = 0.01;

/// Critical hit chance before items and upgrades.
pub const BASE_CRIT_CHANCE: f64 = 0.05;
/// Critical damage multiplier before upgrades.
pub const BASE_CRIT_DAMAGE: f64 = 1.5;

/// Projectile speed in world units per second.
pub const PROJECTILE_SPEED: f32 = 300.0;
/// Distance outside the arena at which projectiles are discarded.
pub const PROJECTILE_BOUNDS_MARGIN: f32 = 50.0;
/// Heroes are kept this far inside the arena edges.
pub const HERO_MARGIN: f32 = 30.0;

/// Length of the DPS measurement window.
pub const DPS_WINDOW: Duration = Duration::from_secs(1);
/// Cadence of the auto-merge feature.
pub const AUTO_MERGE_INTERVAL: Duration = Duration::from_millis(2_000);

/// Enemies alive at once in the endless tower.
pub const TOWER_MAX_ACTIVE_ENEMIES: usize = 10;
/// Best stage required to enter the endless tower.
pub const TOWER_UNLOCK_STAGE: u32 = 10;
/// Collision radius of tower enemies.
pub const TOWER_ENEMY_RADIUS: f32 = 30.0;
/// Collision radius of tower elites.
pub const TOWER_ELITE_RADIUS: f32 = 45.0;
/// Movement speed of tower enemies.
pub const TOWER_ENEMY_SPEED: f32 = 24.0;
/// Movement speed of tower bosses.
pub const TOWER_BOSS_SPEED: f32 = 12.0;

/// Offline time below this threshold earns nothing.
pub const OFFLINE_MINIMUM: Duration = Duration::from_secs(60);
/// Offline accrual cap.
pub const OFFLINE_CAP: Duration = Duration::from_secs(12 * 60 * 60);
/// Offline time after which a common loot box may be granted.
pub const OFFLINE_BOX_THRESHOLD: Duration = Duration::from_secs(30 * 60);
/// Chance of the offline loot box.
pub const OFFLINE_BOX_CHANCE: f64 = 0.3;

/// Hit points of an enemy spawned during `stage` before kind multipliers.
#[must_use]
pub fn stage_enemy_hp(stage: u32) -> f64 {
    ENEMY_BASE_HP * ENEMY_HP_SCALING.powf(f64::from(stage))
}

/// Gold bounty for a campaign kill.
#[must_use]
pub fn stage_gold_bounty(stage: u32, gold_multiplier: f64, boss: bool) -> u64 {
    let boss_multiplier = if boss { BOSS_GOLD_MULTIPLIER } else { 1.0 };
    (GOLD_PER_ENEMY * GOLD_SCALING.powf(f64::from(stage)) * gold_multiplier * boss_multiplier)
        .floor() as u64
}

/// Gold paid when an item of the given level is sold.
#[must_use]
pub fn sell_price(level: u32) -> u64 {
    (5.0 * (2.0_f64.powf(f64::from(level)) - 1.0)).floor() as u64
}

/// Gold charged for a summon at the provided unfloored cost.
#[must_use]
pub fn summon_price(cost: f64) -> u64 {
    cost.floor() as u64
}

/// Reports whether the given wave number is a boss wave.
#[must_use]
pub const fn is_boss_wave(wave: u32) -> bool {
    wave % BOSS_WAVE_INTERVAL == 0
}

/// Number of spawns required to complete the given wave.
#[must_use]
pub const fn wave_quota(wave: u32) -> u32 {
    if is_boss_wave(wave) {
        1
    } else {
        ENEMIES_PER_WAVE
    }
}

/// Reports whether reaching `wave` advances the stage.
#[must_use]
pub const fn advances_stage(wave: u32) -> bool {
    wave % WAVES_PER_STAGE == 0
}

/// Number of enemies on a tower floor.
#[must_use]
pub fn tower_enemy_count(floor: u32) -> u32 {
    (5.0 + f64::from(floor) * 0.5 + f64::from(floor / 10) * 5.0).floor() as u32
}

/// Hit points of a regular tower enemy.
#[must_use]
pub fn tower_enemy_hp(floor: u32) -> f64 {
    (100.0 * 1.15_f64.powf(f64::from(floor.saturating_sub(1)))).floor()
}

/// Gold bounty of a regular tower enemy.
#[must_use]
pub const fn tower_enemy_gold(floor: u32) -> u64 {
    10 + floor as u64 * 3
}

/// Gold and gems granted for clearing a tower floor.
#[must_use]
pub const fn tower_floor_reward(floor: u32) -> (u64, u64) {
    let floor = floor as u64;
    let mut gold = 50 * floor;
    let mut gems = 1;
    if floor % 50 == 0 {
        gold += 10_000;
        gems += 50;
    } else if floor % 10 == 0 {
        gold += 1_000;
        gems += 10;
    }
    (gold, gems)
}

/// Radius of the hero area for an arena of the given size.
#[must_use]
pub fn center_radius(width: f32, height: f32) -> f32 {
    (width.min(height) * 0.25).max(40.0)
}

/// Radius of the enemy spawn ring for an arena of the given size.
#[must_use]
pub fn spawn_radius(width: f32, height: f32) -> f32 {
    (width.min(height) * 0.45).max(80.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sell_price_doubles_plus_five() {
        assert_eq!(sell_price(1), 5);
        assert_eq!(sell_price(2), 15);
        assert_eq!(sell_price(3), 35);
        assert_eq!(sell_price(5), 155);
    }

    #[test]
    fn sell_price_is_monotonic() {
        let prices: Vec<u64> = (1..20).map(sell_price).collect();
        assert!(prices.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn stage_scaling_matches_ten_stage_ratio() {
        let ratio = stage_enemy_hp(10) / stage_enemy_hp(0);
        assert!((ratio - 1.15_f64.powi(10)).abs() < 1e-9);
        assert!((ratio - 4.046).abs() < 1e-3, "ratio was {ratio}");
        assert!((stage_enemy_hp(0) - ENEMY_BASE_HP).abs() < f64::EPSILON);
    }

    #[test]
    fn boss_waves_and_stage_boundaries() {
        let boss_waves: Vec<u32> = (1..=20).filter(|wave| is_boss_wave(*wave)).collect();
        assert_eq!(boss_waves, vec![5, 10, 15, 20]);
        assert_eq!(wave_quota(4), ENEMIES_PER_WAVE);
        assert_eq!(wave_quota(5), 1);
        let stage_waves: Vec<u32> = (1..=30).filter(|wave| advances_stage(*wave)).collect();
        assert_eq!(stage_waves, vec![10, 20, 30]);
    }

    #[test]
    fn gold_bounty_scales_with_stage_and_boss() {
        assert_eq!(stage_gold_bounty(0, 1.0, false), 5);
        assert_eq!(stage_gold_bounty(0, 1.0, true), 50);
        assert_eq!(stage_gold_bounty(1, 1.0, false), 5);
        assert_eq!(stage_gold_bounty(10, 1.0, false), 8);
    }

    #[test]
    fn tower_formulas() {
        assert_eq!(tower_enemy_count(1), 5);
        assert_eq!(tower_enemy_count(10), 15);
        assert_eq!(tower_enemy_hp(1), 100.0);
        assert_eq!(tower_enemy_hp(3), 132.0);
        assert_eq!(tower_enemy_gold(4), 22);
        assert_eq!(tower_floor_reward(3), (150, 1));
        assert_eq!(tower_floor_reward(10), (1_500, 11));
        assert_eq!(tower_floor_reward(50), (12_500, 51));
    }

    #[test]
    fn arena_radii_have_floors() {
        assert_eq!(center_radius(100.0, 100.0), 40.0);
        assert_eq!(center_radius(800.0, 600.0), 150.0);
        assert_eq!(spawn_radius(100.0, 100.0), 80.0);
        assert!((spawn_radius(800.0, 600.0) - 270.0).abs() < 1e-3);
    }
}
