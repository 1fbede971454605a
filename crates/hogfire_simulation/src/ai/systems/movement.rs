//! Enemy movement: walk toward `position_to_go`.

use bevy::prelude::*;

use crate::ai::{AttackRange, PathFollow, PathWaypoints};
use crate::config::SimulationConfig;
use crate::tick::TickSnapshot;

/// Move one agent toward its target by `speed * delta`.
///
/// В radius атаки (`in_range`) агент стоит. При прибытии `path_index`
/// переезжает на достигнутый узел, если он лежит на пути.
pub fn step_movement(
    transform: &mut Transform,
    follow: &mut PathFollow,
    range: &AttackRange,
    path: &PathWaypoints,
    speed: f32,
    arrive_distance: f32,
    delta: f32,
) {
    if range.in_range {
        return;
    }
    let Some(target) = follow.position_to_go else {
        return;
    };

    let goal = Vec3::new(target.x as f32, transform.translation.y, target.y as f32);
    let offset = goal - transform.translation;
    let distance = offset.length();
    let step = speed * delta;

    if distance <= arrive_distance.max(step) {
        transform.translation = goal;
        follow.reached_target = true;
        if let Some(index) = path.index_of(target) {
            follow.path_index = index;
        }
        return;
    }

    let direction = offset / distance;
    transform.translation += direction * step;
    transform.look_to(direction, Vec3::Y);
}

/// System: enemy movement (Movement set, после drain)
pub fn enemy_movement(
    config: Res<SimulationConfig>,
    snapshot: Res<TickSnapshot>,
    mut agents: Query<(&mut Transform, &mut PathFollow, &AttackRange, &PathWaypoints)>,
) {
    let speed = config.behavior.move_speed;
    let arrive = config.behavior.arrive_distance;

    agents
        .par_iter_mut()
        .for_each(|(mut transform, mut follow, range, path)| {
            step_movement(&mut transform, &mut follow, range, path, speed, arrive, snapshot.delta);
        });
}
