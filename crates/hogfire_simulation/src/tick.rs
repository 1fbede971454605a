//! Tick snapshot: shared read-only state captured once at tick start
//!
//! Все sweeps одного тика видят один и тот же player position и время,
//! независимо от порядка выполнения workers.

use bevy::prelude::*;

use crate::components::Player;
use crate::error::SimulationError;

/// Player entity + position at tick start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSnapshot {
    pub entity: Entity,
    pub position: Vec3,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct TickSnapshot {
    /// Monotonic tick counter (first captured tick = 1)
    pub tick: u64,
    /// Elapsed simulation time (seconds)
    pub elapsed: f64,
    /// Frame delta time (seconds)
    pub delta: f32,
    /// `None` если игрока нет: behavior sweep становится no-op
    pub player: Option<PlayerSnapshot>,
    missing_player_reported: bool,
}

impl TickSnapshot {
    /// Snapshot for driving pure step functions outside the ECS.
    pub fn new(tick: u64, elapsed: f64, delta: f32, player: Option<PlayerSnapshot>) -> Self {
        Self {
            tick,
            elapsed,
            delta,
            player,
            missing_player_reported: false,
        }
    }
}

/// System: capture time + player transform (Snapshot set, before sweeps)
pub fn capture_tick_snapshot(
    time: Res<Time>,
    players: Query<(Entity, &Transform), With<Player>>,
    mut snapshot: ResMut<TickSnapshot>,
) {
    snapshot.tick += 1;
    snapshot.elapsed = time.elapsed_secs_f64();
    snapshot.delta = time.delta_secs();

    match players.single() {
        Ok((entity, transform)) => {
            snapshot.player = Some(PlayerSnapshot {
                entity,
                position: transform.translation,
            });
            snapshot.missing_player_reported = false;
        }
        Err(err) => {
            snapshot.player = None;
            // Логируем один раз, не каждый тик
            if !snapshot.missing_player_reported {
                let missing = SimulationError::MissingDependency { what: "player" };
                crate::logger::log_warning(&format!("{} ({}), enemy behavior idle", missing, err));
                snapshot.missing_player_reported = true;
            }
        }
    }
}
