//! HOGFIRE Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: враги (Wander / Chase / Attack) + fire control.
//!
//! Тик:
//! 1. Snapshot: время, позиция игрока, collider snapshot (read-only до конца тика)
//! 2. Sweep: parallel behavior / fire control / projectile sweeps → event queues
//! 3. Drain: serial drain очередей в FrameEvents (заменяются каждый тик)
//! 4. Movement: шаг агентов к position_to_go
//! 5. Present: FrameEvents → visual / audio cue batches

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod logger;
pub mod physics;
pub mod presentation;
pub mod tick;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AttackRange, EnemyState, PathFollow, PathWaypoint, PathWaypoints};
pub use combat::{
    spawn_pattern, CombatPlugin, Projectile, ProjectileType, Weapon, WeaponHolder, WeaponProfile, WeaponType,
};
pub use components::*;
pub use config::{BehaviorConfig, SimulationConfig};
pub use error::SimulationError;
pub use events::{BulletCollisionEvent, CollisionKind, FireEvent, FrameEvents, SimulationEvents, WeaponEventKind};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use physics::{ColliderSnapshot, RaycastPort, SightCollider};
pub use presentation::{Audio, CueLibrary, PresentationPlugin, Visual};
pub use tick::TickSnapshot;

/// Фазы тика (выполняются строго по порядку).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Snapshot,
    Sweep,
    Drain,
    Movement,
    Present,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub config: SimulationConfig,
    /// FixedUpdate по умолчанию; тесты гоняют в Update с ручным шагом времени
    pub schedule: InternedScheduleLabel,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl SimulationPlugin {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            schedule: FixedUpdate.intern(),
        }
    }

    pub fn in_schedule(mut self, schedule: impl ScheduleLabel) -> Self {
        self.schedule = schedule.intern();
        self
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let schedule = self.schedule;

        app
            // Fixed timestep (60Hz по умолчанию)
            .insert_resource(Time::<Fixed>::from_hz(self.config.tick_hz))
            .insert_resource(self.config.clone())
            .init_resource::<tick::TickSnapshot>()
            .init_resource::<events::SimulationEvents>()
            .init_resource::<events::FrameEvents>()
            .configure_sets(
                schedule,
                (
                    SimulationSet::Snapshot,
                    SimulationSet::Sweep,
                    SimulationSet::Drain,
                    SimulationSet::Movement,
                    SimulationSet::Present,
                )
                    .chain(),
            )
            .add_systems(
                schedule,
                (tick::capture_tick_snapshot, events::size_event_queues).in_set(SimulationSet::Snapshot),
            )
            .add_systems(
                schedule,
                (events::drain_weapon_events, events::drain_bullet_events)
                    .chain()
                    .in_set(SimulationSet::Drain),
            )
            // Подсистемы
            .add_plugins((
                CombatPlugin { schedule },
                AIPlugin { schedule },
                PresentationPlugin { schedule },
            ));

        // Headless backend: снимок колайдеров нужен только без Rapier
        #[cfg(not(feature = "rapier"))]
        app.init_resource::<physics::ColliderSnapshot>().add_systems(
            schedule,
            physics::capture_collider_snapshot.in_set(SimulationSet::Snapshot),
        );
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// TransformPlugin нужен fire control: muzzle читается из GlobalTransform.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, bevy::transform::TransformPlugin));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
