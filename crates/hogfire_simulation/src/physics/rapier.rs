//! Rapier backend для RaycastPort (feature "rapier")
//!
//! Колайдеры должны нести `CollisionGroups` с теми же битами, что и
//! `physics::layers`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::raycast::{RayHit, RaycastFilter, RaycastPort};

/// Borrowed Rapier context for the duration of one sweep.
pub struct RapierSight<'a> {
    context: &'a RapierContext<'a>,
}

impl<'a> RapierSight<'a> {
    pub fn new(context: &'a RapierContext<'a>) -> Self {
        Self { context }
    }
}

impl RaycastPort for RapierSight<'_> {
    fn cast_ray(&self, start: Vec3, end: Vec3, filter: &RaycastFilter) -> Option<RayHit> {
        let groups = CollisionGroups::new(
            Group::from_bits_truncate(filter.belongs_to),
            Group::from_bits_truncate(filter.collides_with),
        );
        let mut query = QueryFilter::new().groups(groups);
        if let Some(excluded) = filter.exclude {
            query = query.exclude_collider(excluded);
        }

        // dir не нормализуем: toi ∈ [0, 1] = доля отрезка
        let dir = end - start;
        self.context
            .cast_ray(start, dir, 1.0, true, query)
            .map(|(entity, toi)| RayHit {
                entity,
                point: start + dir * toi,
            })
    }
}
