//! Effective hero statistics derived from class, equipment and upgrades.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    balance::{BASE_CRIT_CHANCE, BASE_CRIT_DAMAGE},
    catalog::{AttackType, HeroClassId, StatCategory, UpgradeTrack},
    grid::MergeGrid,
};

/// Purchased level of every global upgrade track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    /// Level of [`UpgradeTrack::Attack`].
    pub attack: u32,
    /// Level of [`UpgradeTrack::AttackSpeed`].
    pub attack_speed: u32,
    /// Level of [`UpgradeTrack::MoveSpeed`].
    pub move_speed: u32,
    /// Level of [`UpgradeTrack::CritChance`].
    pub crit_chance: u32,
    /// Level of [`UpgradeTrack::CritDamage`].
    pub crit_damage: u32,
    /// Level of [`UpgradeTrack::GoldBonus`].
    pub gold_bonus: u32,
}

impl UpgradeLevels {
    /// Current level of `track`.
    #[must_use]
    pub const fn level(&self, track: UpgradeTrack) -> u32 {
        match track {
            UpgradeTrack::Attack => self.attack,
            UpgradeTrack::AttackSpeed => self.attack_speed,
            UpgradeTrack::MoveSpeed => self.move_speed,
            UpgradeTrack::CritChance => self.crit_chance,
            UpgradeTrack::CritDamage => self.crit_damage,
            UpgradeTrack::GoldBonus => self.gold_bonus,
        }
    }

    /// Raises `track` by one level and returns the new level.
    pub fn raise(&mut self, track: UpgradeTrack) -> u32 {
        let slot = match track {
            UpgradeTrack::Attack => &mut self.attack,
            UpgradeTrack::AttackSpeed => &mut self.attack_speed,
            UpgradeTrack::MoveSpeed => &mut self.move_speed,
            UpgradeTrack::CritChance => &mut self.crit_chance,
            UpgradeTrack::CritDamage => &mut self.crit_damage,
            UpgradeTrack::GoldBonus => &mut self.gold_bonus,
        };
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Additive bonus accumulated on `track`.
    #[must_use]
    pub fn bonus(&self, track: UpgradeTrack) -> f64 {
        f64::from(self.level(track)) * track.bonus_per_level()
    }

    /// Multiplier applied to kill gold.
    #[must_use]
    pub fn gold_multiplier(&self) -> f64 {
        1.0 + self.bonus(UpgradeTrack::GoldBonus)
    }
}

/// Effective combat statistics of a hero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeroStats {
    /// Damage of a basic attack.
    pub attack: f64,
    /// Attacks per second.
    pub attack_speed: f64,
    /// World units travelled per second.
    pub move_speed: f64,
    /// Engagement range.
    pub range: f64,
    /// Probability of a critical hit.
    pub crit_chance: f64,
    /// Damage multiplier of a critical hit.
    pub crit_damage: f64,
    /// Delivery mechanism of basic attacks.
    pub attack_type: AttackType,
}

impl HeroStats {
    /// Minimum simulated time between two basic attacks.
    #[must_use]
    pub fn attack_interval(&self) -> Duration {
        if self.attack_speed <= 0.0 {
            return Duration::MAX;
        }
        Duration::try_from_secs_f64(1.0 / self.attack_speed).unwrap_or(Duration::MAX)
    }
}

/// Resolves the effective stats of `class` wearing `grid` under `upgrades`.
#[must_use]
pub fn resolve_hero_stats(
    class: HeroClassId,
    grid: &MergeGrid,
    upgrades: &UpgradeLevels,
) -> HeroStats {
    let base = class.class();
    let mut stats = HeroStats {
        attack: base.base_attack,
        attack_speed: base.attack_speed,
        move_speed: base.move_speed,
        range: base.range,
        crit_chance: BASE_CRIT_CHANCE,
        crit_damage: BASE_CRIT_DAMAGE,
        attack_type: base.attack_type,
    };

    for item in grid.items() {
        let amount = item.kind.value_per_level() * f64::from(item.level);
        match item.kind.category() {
            StatCategory::Attack => stats.attack += amount,
            StatCategory::AttackSpeed => stats.attack_speed += amount,
            StatCategory::CritChance => stats.crit_chance += amount,
            StatCategory::Defense | StatCategory::Hp => {}
        }
    }

    stats.attack *= 1.0 + upgrades.bonus(UpgradeTrack::Attack);
    stats.attack_speed *= 1.0 + upgrades.bonus(UpgradeTrack::AttackSpeed);
    stats.move_speed *= 1.0 + upgrades.bonus(UpgradeTrack::MoveSpeed);
    stats.crit_chance += upgrades.bonus(UpgradeTrack::CritChance);
    stats.crit_damage += upgrades.bonus(UpgradeTrack::CritDamage);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::ItemKind, grid::ItemStack};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn bare_class_uses_base_values() {
        let stats = resolve_hero_stats(
            HeroClassId::Archer,
            &MergeGrid::new(),
            &UpgradeLevels::default(),
        );
        assert!(close(stats.attack, 12.0));
        assert!(close(stats.attack_speed, 1.3));
        assert!(close(stats.range, 180.0));
        assert!(close(stats.crit_chance, 0.05));
        assert!(close(stats.crit_damage, 1.5));
        assert_eq!(stats.attack_type, AttackType::Ranged);
    }

    #[test]
    fn items_add_per_level_before_upgrade_multipliers() {
        let mut grid = MergeGrid::new();
        let _ = grid.insert(ItemStack::new(ItemKind::SwordGem, 2));
        let _ = grid.insert(ItemStack::new(ItemKind::SpeedGem, 1));
        let _ = grid.insert(ItemStack::new(ItemKind::CritGem, 3));
        let _ = grid.insert(ItemStack::new(ItemKind::ShieldGem, 9));
        let _ = grid.insert(ItemStack::new(ItemKind::LifeGem, 9));
        let upgrades = UpgradeLevels {
            attack: 2,
            attack_speed: 1,
            move_speed: 5,
            crit_chance: 4,
            crit_damage: 3,
            gold_bonus: 0,
        };

        let stats = resolve_hero_stats(HeroClassId::Warrior, &grid, &upgrades);

        assert!(close(stats.attack, (15.0 + 10.0) * 1.1), "attack {}", stats.attack);
        assert!(close(stats.attack_speed, 1.05 * 1.03));
        assert!(close(stats.move_speed, 80.0 * 1.1));
        assert!(close(stats.crit_chance, 0.05 + 0.06 + 0.04));
        assert!(close(stats.crit_damage, 1.8));
    }

    #[test]
    fn resolution_is_idempotent() {
        let mut grid = MergeGrid::new();
        let _ = grid.insert(ItemStack::new(ItemKind::SwordGem, 4));
        let upgrades = UpgradeLevels {
            attack: 3,
            ..UpgradeLevels::default()
        };
        let first = resolve_hero_stats(HeroClassId::Mage, &grid, &upgrades);
        let second = resolve_hero_stats(HeroClassId::Mage, &grid, &upgrades);
        assert_eq!(first, second);
    }

    #[test]
    fn attack_interval_follows_attack_speed() {
        let stats = resolve_hero_stats(
            HeroClassId::Warrior,
            &MergeGrid::new(),
            &UpgradeLevels::default(),
        );
        assert_eq!(stats.attack_interval(), Duration::from_secs(1));
    }

    #[test]
    fn raise_reports_new_level() {
        let mut upgrades = UpgradeLevels::default();
        assert_eq!(upgrades.raise(UpgradeTrack::GoldBonus), 1);
        assert_eq!(upgrades.raise(UpgradeTrack::GoldBonus), 2);
        assert!(close(upgrades.gold_multiplier(), 1.1));
    }
}
