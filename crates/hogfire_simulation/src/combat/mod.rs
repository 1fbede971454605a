//! Combat module: weapon fire control + projectiles
//!
//! ECS ответственность:
//! - Weapon state: magazine/reserve, reload / between-shot / swap таймеры
//! - Fire control: решение Reload / Shoot раз в тик (parallel sweep)
//! - Projectiles: muzzle pattern → spawn → swept raycast → BulletCollisionEvent
//!
//! Presentation (VFX/audio) читает только FrameEvents, combat state не трогает.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

pub mod components;
pub mod pattern;
pub mod projectile;
pub mod systems;

// Re-export основных типов
pub use components::{ProjectileType, Weapon, WeaponHolder, WeaponProfile, WeaponType};
pub use pattern::{spawn_pattern, MuzzlePattern, ProjectileSpawn};
pub use projectile::{classify_collision, step_projectile, Projectile, ProjectileStep};
pub use systems::{fire_control_sweep, step_weapon};

use crate::SimulationSet;

/// Combat Plugin
///
/// Sweep set, порядок:
/// 1. projectile sweep: летят снаряды прошлых тиков
/// 2. fire_control_sweep: новые выстрелы (spawn применяется после sweep)
pub struct CombatPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for CombatPlugin {
    fn default() -> Self {
        Self {
            schedule: FixedUpdate.intern(),
        }
    }
}

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(feature = "rapier"))]
        let projectile_sweep = projectile::projectile_sweep;
        #[cfg(feature = "rapier")]
        let projectile_sweep = projectile::projectile_sweep_rapier;

        app.add_systems(
            self.schedule,
            (projectile_sweep, systems::fire_control_sweep)
                .chain()
                .in_set(SimulationSet::Sweep),
        );
    }
}
