//! Raycast port (narrow contract to the physics collaborator)

use bevy::prelude::*;

/// Collision layer bits.
pub mod layers {
    pub const PLAYER: u32 = 1 << 1;
    pub const ENEMY: u32 = 1 << 2;
    pub const PROJECTILE: u32 = 1 << 3;
    pub const WALL: u32 = 1 << 10;
    pub const ALL: u32 = u32::MAX;
}

/// Layer filter for one query, symmetric membership test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaycastFilter {
    pub belongs_to: u32,
    pub collides_with: u32,
    /// Entity ignored by the query (shooter of a projectile)
    pub exclude: Option<Entity>,
}

/// Enemy line of sight: видит стены и игрока, не видит других врагов.
pub const SIGHT_FILTER: RaycastFilter = RaycastFilter {
    belongs_to: layers::ENEMY,
    collides_with: layers::WALL | layers::PLAYER,
    exclude: None,
};

pub const PROJECTILE_FILTER: RaycastFilter = RaycastFilter {
    belongs_to: layers::PROJECTILE,
    collides_with: layers::WALL | layers::PLAYER | layers::ENEMY,
    exclude: None,
};

impl RaycastFilter {
    pub fn excluding(mut self, entity: Entity) -> Self {
        self.exclude = Some(entity);
        self
    }

    /// Can a query with this filter hit a collider with these layers?
    pub fn accepts(&self, entity: Entity, belongs_to: u32, collides_with: u32) -> bool {
        if self.exclude == Some(entity) {
            return false;
        }
        (self.belongs_to & collides_with) != 0 && (self.collides_with & belongs_to) != 0
    }
}

/// First hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
}

/// Synchronous segment query against the physics world snapshot.
///
/// Shared by every worker of a sweep, поэтому `Send + Sync`.
pub trait RaycastPort: Send + Sync {
    /// Nearest hit on the segment `start → end`, or `None`.
    fn cast_ray(&self, start: Vec3, end: Vec3, filter: &RaycastFilter) -> Option<RayHit>;

    /// Any hit at all (blocked segment).
    fn is_blocked(&self, start: Vec3, end: Vec3, filter: &RaycastFilter) -> bool {
        self.cast_ray(start, end, filter).is_some()
    }
}

/// Port with no geometry: every ray is clear.
pub struct NoObstacles;

impl RaycastPort for NoObstacles {
    fn cast_ray(&self, _start: Vec3, _end: Vec3, _filter: &RaycastFilter) -> Option<RayHit> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sight_filter_layers() {
        let wall = Entity::from_raw(1);
        let enemy = Entity::from_raw(2);
        let player = Entity::from_raw(3);

        assert!(SIGHT_FILTER.accepts(wall, layers::WALL, layers::ALL));
        assert!(SIGHT_FILTER.accepts(player, layers::PLAYER, layers::ALL));
        assert!(!SIGHT_FILTER.accepts(enemy, layers::ENEMY, layers::ALL));
    }

    #[test]
    fn test_filter_respects_target_mask() {
        let wall = Entity::from_raw(1);
        // Стена, которая не сталкивается с врагами
        assert!(!SIGHT_FILTER.accepts(wall, layers::WALL, layers::PLAYER));
    }

    #[test]
    fn test_exclude() {
        let shooter = Entity::from_raw(5);
        let filter = PROJECTILE_FILTER.excluding(shooter);
        assert!(!filter.accepts(shooter, layers::ENEMY, layers::ALL));
        assert!(filter.accepts(Entity::from_raw(6), layers::ENEMY, layers::ALL));
    }
}
