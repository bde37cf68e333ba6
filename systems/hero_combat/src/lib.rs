#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits basic attack commands for heroes in reach of their target.

use merge_arena_core::{Command, EnemyView, HeroTarget, HeroView};

/// Hero combat system that queues attack commands for ready heroes.
#[derive(Debug, Default)]
pub struct HeroCombat {
    scratch: Vec<Command>,
}

impl HeroCombat {
    /// Creates a new hero combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::HeroAttack` for every hero whose target lies within
    /// `range + target radius` and whose attack interval has elapsed.
    pub fn handle(
        &mut self,
        heroes: &HeroView,
        enemies: &EnemyView,
        targets: &[HeroTarget],
        out: &mut Vec<Command>,
    ) {
        if targets.is_empty() {
            return;
        }

        self.scratch.clear();
        for target in targets {
            let Some(hero) = heroes.get(target.hero) else {
                continue;
            };
            let Some(enemy) = enemies.get(target.enemy) else {
                continue;
            };
            if !hero.ready_in.is_zero() {
                continue;
            }

            let reach = hero.stats.range as f32 + enemy.radius;
            if hero.position.distance(enemy.position) <= reach {
                self.scratch.push(Command::HeroAttack {
                    hero: target.hero,
                    target: target.enemy,
                });
            }
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use merge_arena_core::{
        resolve_hero_stats, EnemyId, EnemySnapshot, FoeKind, HeroClassId, HeroSnapshot,
        MergeGrid, UpgradeLevels, Vec2,
    };

    use super::*;

    fn hero(class: HeroClassId, x: f32, ready_in: Duration) -> HeroSnapshot {
        HeroSnapshot {
            hero: class,
            position: Vec2::new(x, 0.0),
            target: None,
            stats: resolve_hero_stats(class, &MergeGrid::new(), &UpgradeLevels::default()),
            ready_in,
        }
    }

    fn enemy(id: u32, x: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            foe: FoeKind::Goblin,
            position: Vec2::new(x, 0.0),
            hp: 10.0,
            max_hp: 10.0,
            radius: 25.0,
            boss: false,
        }
    }

    fn target(class: HeroClassId, id: u32) -> HeroTarget {
        HeroTarget {
            hero: class,
            enemy: EnemyId::new(id),
            distance: 0.0,
        }
    }

    #[test]
    fn attacks_when_target_within_range_plus_radius() {
        let mut system = HeroCombat::new();
        let heroes = HeroView::from_snapshots(vec![hero(HeroClassId::Warrior, 0.0, Duration::ZERO)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 75.0)]);
        let mut out = Vec::new();

        system.handle(&heroes, &enemies, &[target(HeroClassId::Warrior, 1)], &mut out);

        assert_eq!(
            out,
            vec![Command::HeroAttack {
                hero: HeroClassId::Warrior,
                target: EnemyId::new(1),
            }]
        );
    }

    #[test]
    fn out_of_reach_or_recharging_heroes_hold() {
        let mut system = HeroCombat::new();
        let heroes = HeroView::from_snapshots(vec![
            hero(HeroClassId::Warrior, 0.0, Duration::ZERO),
            hero(HeroClassId::Axe, 0.0, Duration::from_millis(200)),
        ]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 76.0), enemy(2, 10.0)]);
        let mut out = Vec::new();

        system.handle(
            &heroes,
            &enemies,
            &[target(HeroClassId::Warrior, 1), target(HeroClassId::Axe, 2)],
            &mut out,
        );

        assert!(out.is_empty(), "unexpected commands: {out:?}");
    }

    #[test]
    fn missing_target_is_skipped() {
        let mut system = HeroCombat::new();
        let heroes = HeroView::from_snapshots(vec![hero(HeroClassId::Warrior, 0.0, Duration::ZERO)]);
        let mut out = Vec::new();

        system.handle(&heroes, &EnemyView::default(), &[target(HeroClassId::Warrior, 5)], &mut out);

        assert!(out.is_empty());
    }
}
