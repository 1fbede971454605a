//! Event distribution pipeline
//!
//! Parallel sweeps → `SimulationEvents` (multi-producer queues) → serial drain
//! → `FrameEvents` (ordered, frame-scoped streams для presentation/audio).
//!
//! Оба ресурса: явный контекст симуляции (живут ровно столько, сколько World),
//! никаких глобальных static-очередей.

use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::{ProjectileType, WeaponType};
use crate::tick::TickSnapshot;

pub mod queue;

pub use queue::{EventQueue, FrameStream, QueueWriter};

/// What a weapon did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponEventKind {
    Shoot,
    Reload,
}

impl WeaponEventKind {
    pub const COUNT: usize = 2;

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// What a projectile hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionKind {
    Wall,
    Enemy,
    Player,
}

impl CollisionKind {
    pub const COUNT: usize = 3;

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

/// Weapon-fired stream element (muzzle transform at fire/reload time).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireEvent {
    pub weapon: Entity,
    pub weapon_type: WeaponType,
    pub kind: WeaponEventKind,
    pub position: Vec3,
    pub rotation: Quat,
    /// Elapsed simulation time of the producing tick
    pub frame_timestamp: f64,
}

/// Bullet-collision stream element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletCollisionEvent {
    pub projectile: Entity,
    pub projectile_type: ProjectileType,
    pub target: Entity,
    pub collision: CollisionKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub frame_timestamp: f64,
}

/// Producer side: one queue per event category.
#[derive(Resource)]
pub struct SimulationEvents {
    pub weapon: EventQueue<FireEvent>,
    pub bullet: EventQueue<BulletCollisionEvent>,
}

impl Default for SimulationEvents {
    fn default() -> Self {
        Self {
            weapon: EventQueue::with_capacity("weapon-fired", 64),
            bullet: EventQueue::with_capacity("bullet-collision", 256),
        }
    }
}

/// Consumer side: streams replaced by every drain.
#[derive(Resource, Default)]
pub struct FrameEvents {
    pub weapon: FrameStream<FireEvent>,
    pub bullet: FrameStream<BulletCollisionEvent>,
}

/// System: размер очередей под worst case (одно событие на weapon за тик)
pub fn size_event_queues(
    mut queues: ResMut<SimulationEvents>,
    weapons: Query<(), With<crate::combat::Weapon>>,
    projectiles: Query<(), With<crate::combat::Projectile>>,
) {
    queues.weapon.ensure_capacity(weapons.iter().count());
    queues.bullet.ensure_capacity(projectiles.iter().count());
}

/// System: drain weapon-fired queue (after fire_control_sweep joined)
pub fn drain_weapon_events(
    mut queues: ResMut<SimulationEvents>,
    mut frame: ResMut<FrameEvents>,
    snapshot: Res<TickSnapshot>,
) {
    let drained = queues.weapon.drain_into(&mut frame.weapon, snapshot.tick);
    if drained > 0 {
        crate::logger::log(&format!("🔫 tick {}: {} weapon events", snapshot.tick, drained));
    }
}

/// System: drain bullet-collision queue (after projectile_sweep joined)
pub fn drain_bullet_events(
    mut queues: ResMut<SimulationEvents>,
    mut frame: ResMut<FrameEvents>,
    snapshot: Res<TickSnapshot>,
) {
    let drained = queues.bullet.drain_into(&mut frame.bullet, snapshot.tick);
    if drained > 0 {
        crate::logger::log(&format!("💥 tick {}: {} bullet collisions", snapshot.tick, drained));
    }
}
