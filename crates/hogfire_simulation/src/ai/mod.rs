//! Enemy AI module
//!
//! FSM Wander / Chase / Attack для врагов, преследующих игрока.
//! Behavior sweep решает куда идти (position_to_go), movement исполняет.

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::{AttackRange, EnemyState, PathFollow, PathWaypoint, PathWaypoints};
pub use systems::{
    attack_step, chase_target, evaluate_transition, step_enemy, step_movement, wander_seed, wander_step,
    BehaviorContext,
};

use crate::SimulationSet;

/// AI Plugin
///
/// Порядок выполнения:
/// 1. enemy_behavior_sweep (Sweep set): action по текущему state + transition
/// 2. enemy_movement (Movement set): шаг к position_to_go
pub struct AIPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for AIPlugin {
    fn default() -> Self {
        Self {
            schedule: FixedUpdate.intern(),
        }
    }
}

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        #[cfg(not(feature = "rapier"))]
        let behavior_sweep = systems::enemy_behavior_sweep;
        #[cfg(feature = "rapier")]
        let behavior_sweep = systems::enemy_behavior_sweep_rapier;

        app.add_systems(self.schedule, behavior_sweep.in_set(SimulationSet::Sweep))
            .add_systems(
                self.schedule,
                systems::enemy_movement.in_set(SimulationSet::Movement),
            );
    }
}
