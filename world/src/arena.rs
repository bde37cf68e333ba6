use merge_arena_core::{
    balance::{center_radius, spawn_radius, HERO_MARGIN, SPAWN_RING_OFFSET},
    Vec2,
};

const DEFAULT_WIDTH: f32 = 800.0;
const DEFAULT_HEIGHT: f32 = 600.0;

/// Rectangular battlefield with a hero area around its center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
    center: Vec2,
    center_radius: f32,
    spawn_radius: f32,
}

impl Arena {
    /// Creates an arena of the provided size.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            center: Vec2::new(width / 2.0, height / 2.0),
            center_radius: center_radius(width, height),
            spawn_radius: spawn_radius(width, height),
        }
    }

    /// Reports whether the dimensions describe a usable arena.
    #[must_use]
    pub fn accepts(width: f32, height: f32) -> bool {
        width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
    }

    /// Width in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Point enemies walk towards.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Radius of the hero area.
    #[must_use]
    pub const fn center_radius(&self) -> f32 {
        self.center_radius
    }

    /// Radius of the enemy spawn ring.
    #[must_use]
    pub const fn spawn_radius(&self) -> f32 {
        self.spawn_radius
    }

    pub(crate) fn spawn_point(&self, angle: f32) -> Vec2 {
        self.center + Vec2::from_angle(angle) * (self.spawn_radius + SPAWN_RING_OFFSET)
    }

    pub(crate) fn clamp_hero(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            position.x.max(HERO_MARGIN).min(self.width - HERO_MARGIN),
            position.y.max(HERO_MARGIN).min(self.height - HERO_MARGIN),
        )
    }

    pub(crate) fn contains(&self, position: Vec2, margin: f32) -> bool {
        position.x >= -margin
            && position.y >= -margin
            && position.x <= self.width + margin
            && position.y <= self.height + margin
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_ring_sits_outside_spawn_radius() {
        let arena = Arena::default();
        let point = arena.spawn_point(0.0);
        let distance = point.distance(arena.center());
        assert!(
            (distance - (arena.spawn_radius() + SPAWN_RING_OFFSET)).abs() < 1e-3,
            "spawned {distance} from center"
        );
    }

    #[test]
    fn heroes_stay_inside_margin() {
        let arena = Arena::new(400.0, 300.0);
        assert_eq!(arena.clamp_hero(Vec2::new(-50.0, 900.0)), Vec2::new(30.0, 270.0));
        assert_eq!(arena.clamp_hero(Vec2::new(200.0, 150.0)), Vec2::new(200.0, 150.0));
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(Arena::accepts(10.0, 10.0));
        assert!(!Arena::accepts(0.0, 10.0));
        assert!(!Arena::accepts(f32::NAN, 10.0));
        assert!(!Arena::accepts(10.0, f32::INFINITY));
    }
}
