use std::time::Duration;

use merge_arena_core::{ActionError, EnemyId, Event, HeroClassId, SkillEffect, Vec2};

use crate::{combat::Projectile, World};

const MULTI_SHOT_TARGETS: usize = 3;
const SHADOW_STRIKE_OFFSET: Vec2 = Vec2::new(30.0, 0.0);

impl World {
    pub(crate) fn activate_skill(
        &mut self,
        class: HeroClassId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), ActionError> {
        let Some(hero) = self.heroes.iter().find(|hero| hero.class == class) else {
            return Err(ActionError::InvalidReference("hero"));
        };
        let remaining = self.skill_cooldown(class);
        if !remaining.is_zero() {
            return Err(ActionError::SkillOnCooldown { remaining });
        }

        let skill = class.class().skill;
        let (origin, stats) = (hero.position, hero.stats);
        let _ = self.cooldowns.insert(class, skill.cooldown);
        out_events.push(Event::SkillActivated {
            hero: class,
            effect: skill.effect,
        });

        let damage = stats.attack * skill.effect.multiplier();
        match skill.effect {
            SkillEffect::SpinAttack => self.blast(origin, skill.effect, damage, out_events),
            SkillEffect::Meteor => {
                let center = self.arena.center();
                self.blast(center, skill.effect, damage, out_events);
            }
            SkillEffect::PowerStrike => {
                if let Some(hero) = self.hero_mut(class) {
                    hero.power_strike = Some(skill.effect.multiplier());
                }
            }
            SkillEffect::MultiShot => {
                for (id, position) in self.nearest_enemies(origin, MULTI_SHOT_TARGETS) {
                    self.projectiles
                        .push(Projectile::launch(origin, position, id, damage, false));
                }
            }
            SkillEffect::ShadowStrike => {
                let Some((id, position)) = self.nearest_enemies(origin, 1).into_iter().next() else {
                    return Ok(());
                };
                if let Some(hero) = self.hero_mut(class) {
                    hero.position = position + SHADOW_STRIKE_OFFSET;
                }
                let damage = stats.attack * stats.crit_damage * skill.effect.multiplier();
                self.strike(id, damage, true, out_events);
            }
        }
        Ok(())
    }

    pub(crate) fn skill_cooldown(&self, class: HeroClassId) -> Duration {
        self.cooldowns.get(&class).copied().unwrap_or(Duration::ZERO)
    }

    pub(crate) fn advance_cooldowns(&mut self, dt: Duration) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(dt);
        }
    }

    fn blast(&mut self, at: Vec2, effect: SkillEffect, damage: f64, out_events: &mut Vec<Event>) {
        let radius = effect.radius().unwrap_or(0.0);
        let caught: Vec<EnemyId> = self
            .enemies
            .values()
            .filter(|enemy| enemy.position.distance(at) <= radius)
            .map(|enemy| enemy.id)
            .collect();
        for id in caught {
            self.strike(id, damage, false, out_events);
        }
    }

    fn nearest_enemies(&self, from: Vec2, count: usize) -> Vec<(EnemyId, Vec2)> {
        let mut ranked: Vec<(f32, EnemyId, Vec2)> = self
            .enemies
            .values()
            .map(|enemy| (enemy.position.distance(from), enemy.id, enemy.position))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        ranked
            .into_iter()
            .take(count)
            .map(|(_, id, position)| (id, position))
            .collect()
    }
}
