//! Projectiles: spawned by fire control, swept once per tick
//!
//! Каждый тик снаряд летит вдоль forward, отрезок previous → next
//! проверяется raycast'ом (PROJECTILE_FILTER, shooter исключён).
//! Попадание → BulletCollisionEvent + despawn, истёк lifetime → despawn.

use bevy::prelude::*;

use super::components::ProjectileType;
use crate::ai::EnemyState;
use crate::components::Player;
use crate::events::{BulletCollisionEvent, CollisionKind, SimulationEvents};
use crate::physics::{ColliderSnapshot, RayHit, RaycastPort, PROJECTILE_FILTER};
use crate::tick::TickSnapshot;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub kind: ProjectileType,
    /// Owner of the weapon that fired (never hit by its own projectiles)
    pub shooter: Entity,
    /// Start of the next swept segment
    pub previous_position: Vec3,
    /// Seconds left before despawn
    pub lifetime: f32,
}

impl Projectile {
    pub fn new(kind: ProjectileType, shooter: Entity, previous_position: Vec3) -> Self {
        Self {
            kind,
            shooter,
            previous_position,
            lifetime: kind.lifetime(),
        }
    }
}

/// Projectile entity touched by the sweep.
pub type ProjectileData = (Entity, &'static mut Transform, &'static mut Projectile);

/// (is player, is enemy) for hit classification.
pub type TargetKind = (Has<Player>, Has<EnemyState>);

/// Outcome of one projectile tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileStep {
    Flying,
    Hit(RayHit),
    Expired,
}

/// Advance one projectile by `delta` seconds against `port`.
pub fn step_projectile<P: RaycastPort + ?Sized>(
    projectile: &mut Projectile,
    transform: &mut Transform,
    delta: f32,
    port: &P,
) -> ProjectileStep {
    let forward = transform.rotation * Vec3::NEG_Z;
    let next = transform.translation + forward * projectile.kind.speed() * delta;

    let filter = PROJECTILE_FILTER.excluding(projectile.shooter);
    if let Some(hit) = port.cast_ray(projectile.previous_position, next, &filter) {
        transform.translation = hit.point;
        return ProjectileStep::Hit(hit);
    }

    transform.translation = next;
    projectile.previous_position = next;
    projectile.lifetime -= delta;

    if projectile.lifetime <= 0.0 {
        ProjectileStep::Expired
    } else {
        ProjectileStep::Flying
    }
}

/// Player / Enemy by marker component, everything else is a wall.
pub fn classify_collision(is_player: bool, is_enemy: bool) -> CollisionKind {
    if is_player {
        CollisionKind::Player
    } else if is_enemy {
        CollisionKind::Enemy
    } else {
        CollisionKind::Wall
    }
}

/// Parallel sweep shared by both physics backends.
pub(crate) fn sweep_projectiles<P: RaycastPort + ?Sized>(
    port: &P,
    snapshot: &TickSnapshot,
    events: &SimulationEvents,
    targets: &Query<TargetKind>,
    projectiles: &mut Query<ProjectileData>,
    par_commands: &ParallelCommands,
) {
    projectiles
        .par_iter_mut()
        .for_each(|(entity, mut transform, mut projectile)| {
            match step_projectile(&mut projectile, &mut transform, snapshot.delta, port) {
                ProjectileStep::Flying => {}
                ProjectileStep::Hit(hit) => {
                    let (is_player, is_enemy) = targets.get(hit.entity).unwrap_or((false, false));
                    events.bullet.push(BulletCollisionEvent {
                        projectile: entity,
                        projectile_type: projectile.kind,
                        target: hit.entity,
                        collision: classify_collision(is_player, is_enemy),
                        position: hit.point,
                        rotation: transform.rotation,
                        frame_timestamp: snapshot.elapsed,
                    });
                    par_commands.command_scope(|mut commands| {
                        commands.entity(entity).despawn();
                    });
                }
                ProjectileStep::Expired => {
                    par_commands.command_scope(|mut commands| {
                        commands.entity(entity).despawn();
                    });
                }
            }
        });
}

/// System: projectile sweep против ColliderSnapshot (Sweep set)
pub fn projectile_sweep(
    snapshot: Res<TickSnapshot>,
    colliders: Res<ColliderSnapshot>,
    events: Res<SimulationEvents>,
    targets: Query<TargetKind>,
    mut projectiles: Query<ProjectileData>,
    par_commands: ParallelCommands,
) {
    sweep_projectiles(
        &*colliders,
        &snapshot,
        &events,
        &targets,
        &mut projectiles,
        &par_commands,
    );
}

/// System: projectile sweep через Rapier query pipeline (feature "rapier")
#[cfg(feature = "rapier")]
pub fn projectile_sweep_rapier(
    snapshot: Res<TickSnapshot>,
    rapier: bevy_rapier3d::prelude::ReadRapierContext,
    events: Res<SimulationEvents>,
    targets: Query<TargetKind>,
    mut projectiles: Query<ProjectileData>,
    par_commands: ParallelCommands,
) {
    let Ok(context) = rapier.single() else {
        crate::logger::log_warning("projectile_sweep_rapier: no RapierContext, skipping tick");
        return;
    };
    let sight = crate::physics::RapierSight::new(&context);

    sweep_projectiles(&sight, &snapshot, &events, &targets, &mut projectiles, &par_commands);
}
