//! Built-in physics snapshot: AABB colliders captured once per tick
//!
//! Headless / тестовый backend для RaycastPort (в игре raycast идёт через Rapier).
//! Снимок строится в Snapshot set и не меняется до конца тика.

use bevy::prelude::*;

use super::raycast::{layers, RayHit, RaycastFilter, RaycastPort};

/// Axis-aligned box collider centred on the entity `Transform`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SightCollider {
    pub half_extents: Vec3,
    pub belongs_to: u32,
    pub collides_with: u32,
}

impl SightCollider {
    pub fn new(half_extents: Vec3, belongs_to: u32) -> Self {
        Self {
            half_extents,
            belongs_to,
            collides_with: layers::ALL,
        }
    }

    pub fn wall(half_extents: Vec3) -> Self {
        Self::new(half_extents, layers::WALL)
    }

    /// Capsule-ish box 0.8 × 1.8 × 0.8
    pub fn player() -> Self {
        Self::new(Vec3::new(0.4, 0.9, 0.4), layers::PLAYER)
    }

    pub fn enemy() -> Self {
        Self::new(Vec3::new(0.4, 0.9, 0.4), layers::ENEMY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SnapshotCollider {
    entity: Entity,
    min: Vec3,
    max: Vec3,
    belongs_to: u32,
    collides_with: u32,
}

/// Immutable-per-tick collision world.
#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderSnapshot {
    colliders: Vec<SnapshotCollider>,
}

impl ColliderSnapshot {
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn insert(&mut self, entity: Entity, center: Vec3, collider: &SightCollider) {
        self.colliders.push(SnapshotCollider {
            entity,
            min: center - collider.half_extents,
            max: center + collider.half_extents,
            belongs_to: collider.belongs_to,
            collides_with: collider.collides_with,
        });
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }
}

impl RaycastPort for ColliderSnapshot {
    fn cast_ray(&self, start: Vec3, end: Vec3, filter: &RaycastFilter) -> Option<RayHit> {
        let mut nearest: Option<(f32, Entity)> = None;

        for collider in &self.colliders {
            if !filter.accepts(collider.entity, collider.belongs_to, collider.collides_with) {
                continue;
            }

            let Some(fraction) = segment_vs_aabb(start, end, collider.min, collider.max) else {
                continue;
            };

            if nearest.map_or(true, |(best, _)| fraction < best) {
                nearest = Some((fraction, collider.entity));
            }
        }

        nearest.map(|(fraction, entity)| RayHit {
            entity,
            point: start.lerp(end, fraction),
        })
    }
}

/// Slab test. Returns entry fraction along `start → end` in `[0, 1]`.
fn segment_vs_aabb(start: Vec3, end: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    const PARALLEL_EPSILON: f32 = 1e-7;

    let dir = end - start;
    let mut t_enter = 0.0_f32;
    let mut t_exit = 1.0_f32;

    for axis in 0..3 {
        let origin = start[axis];
        let delta = dir[axis];

        if delta.abs() < PARALLEL_EPSILON {
            // Параллельно плоскостям: либо внутри slab, либо мимо
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / delta;
        let mut t_near = (min[axis] - origin) * inv;
        let mut t_far = (max[axis] - origin) * inv;
        if t_near > t_far {
            std::mem::swap(&mut t_near, &mut t_far);
        }

        t_enter = t_enter.max(t_near);
        t_exit = t_exit.min(t_far);
        if t_enter > t_exit {
            return None;
        }
    }

    Some(t_enter)
}

/// System: rebuild ColliderSnapshot from `SightCollider` entities (Snapshot set)
pub fn capture_collider_snapshot(
    colliders: Query<(Entity, &Transform, &SightCollider)>,
    mut snapshot: ResMut<ColliderSnapshot>,
) {
    snapshot.clear();
    for (entity, transform, collider) in colliders.iter() {
        snapshot.insert(entity, transform.translation, collider);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{PROJECTILE_FILTER, SIGHT_FILTER};

    fn world_with_wall_and_player() -> (ColliderSnapshot, Entity, Entity) {
        let wall = Entity::from_raw(10);
        let player = Entity::from_raw(20);

        let mut snapshot = ColliderSnapshot::default();
        snapshot.insert(wall, Vec3::new(5.0, 0.0, 0.0), &SightCollider::wall(Vec3::new(0.5, 2.0, 2.0)));
        snapshot.insert(player, Vec3::new(10.0, 0.0, 0.0), &SightCollider::player());

        (snapshot, wall, player)
    }

    #[test]
    fn test_nearest_hit_wins() {
        let (snapshot, wall, _) = world_with_wall_and_player();
        let hit = snapshot
            .cast_ray(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &SIGHT_FILTER)
            .expect("wall in the way");

        assert_eq!(hit.entity, wall);
        assert!((hit.point.x - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_clear_line_hits_player() {
        let (snapshot, _, player) = world_with_wall_and_player();
        // Обходим стену по z
        let hit = snapshot
            .cast_ray(Vec3::new(0.0, 0.0, 5.0), Vec3::new(10.0, 0.0, 0.2), &SIGHT_FILTER)
            .expect("player reachable");
        assert_eq!(hit.entity, player);
    }

    #[test]
    fn test_segment_stops_before_collider() {
        let (snapshot, _, _) = world_with_wall_and_player();
        assert!(snapshot
            .cast_ray(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), &SIGHT_FILTER)
            .is_none());
    }

    #[test]
    fn test_filter_skips_enemies() {
        let mut snapshot = ColliderSnapshot::default();
        snapshot.insert(Entity::from_raw(1), Vec3::new(2.0, 0.0, 0.0), &SightCollider::enemy());

        assert!(snapshot.cast_ray(Vec3::ZERO, Vec3::X * 5.0, &SIGHT_FILTER).is_none());
        assert!(snapshot.cast_ray(Vec3::ZERO, Vec3::X * 5.0, &PROJECTILE_FILTER).is_some());
    }

    #[test]
    fn test_zero_length_segment_outside_is_clear() {
        let (snapshot, _, _) = world_with_wall_and_player();
        let point = Vec3::new(1.0, 0.2, 1.0);
        assert!(snapshot.cast_ray(point, point, &SIGHT_FILTER).is_none());
    }
}
