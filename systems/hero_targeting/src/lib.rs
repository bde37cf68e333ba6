#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that assigns every hero the nearest living enemy.

use merge_arena_core::{EnemyId, EnemyView, HeroTarget, HeroView, Vec2};

/// Hero targeting system that reuses a scratch buffer between frames.
#[derive(Debug, Default)]
pub struct HeroTargeting {
    enemy_workspace: Vec<Candidate>,
}

impl HeroTargeting {
    /// Creates a new hero targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the nearest-enemy assignment of every hero.
    ///
    /// The output buffer is cleared first. Heroes are emitted in class order and
    /// equidistant enemies resolve to the lower identifier.
    pub fn handle(&mut self, heroes: &HeroView, enemies: &EnemyView, out: &mut Vec<HeroTarget>) {
        out.clear();
        if enemies.is_empty() {
            return;
        }

        self.enemy_workspace.clear();
        self.enemy_workspace.extend(enemies.iter().map(|enemy| Candidate {
            id: enemy.id,
            position: enemy.position,
        }));

        for hero in heroes.iter() {
            let mut best: Option<(f32, EnemyId)> = None;
            for candidate in &self.enemy_workspace {
                let distance = hero.position.distance(candidate.position);
                let closer = match best {
                    None => true,
                    Some((best_distance, best_id)) => {
                        distance < best_distance
                            || (distance == best_distance && candidate.id < best_id)
                    }
                };
                if closer {
                    best = Some((distance, candidate.id));
                }
            }

            if let Some((distance, enemy)) = best {
                out.push(HeroTarget {
                    hero: hero.hero,
                    enemy,
                    distance,
                });
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: EnemyId,
    position: Vec2,
}
