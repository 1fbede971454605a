//! Enemy behavior FSM systems (state action → transition, parallel sweep).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::{AttackRange, EnemyState, PathFollow, PathWaypoints};
use crate::config::{BehaviorConfig, SimulationConfig};
use crate::error::SimulationError;
use crate::physics::{ColliderSnapshot, RaycastPort, SIGHT_FILTER};
use crate::tick::{PlayerSnapshot, TickSnapshot};

/// Per-enemy data touched by the behavior sweep.
pub type EnemyAgent = (
    Entity,
    &'static Transform,
    &'static mut EnemyState,
    &'static mut PathFollow,
    &'static mut AttackRange,
    &'static PathWaypoints,
);

/// Read-only state shared by every worker of one behavior sweep.
pub struct BehaviorContext<'a, P: RaycastPort + ?Sized> {
    pub config: &'a BehaviorConfig,
    pub port: &'a P,
    pub player: PlayerSnapshot,
    pub elapsed: f64,
    pub delta: f32,
}

/// World position → ground grid cell (xz, truncated).
pub fn ground_cell(position: Vec3) -> IVec2 {
    IVec2::new(position.x as i32, position.z as i32)
}

/// Ground grid cell → world point at `height`.
pub fn cell_point(cell: IVec2, height: f32) -> Vec3 {
    Vec3::new(cell.x as f32, height, cell.y as f32)
}

/// Seed of the wander RNG: зависит только от (elapsed time, agent index).
pub fn wander_seed(elapsed: f64, agent_index: u32) -> u64 {
    elapsed.to_bits().wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ (u64::from(agent_index) + 1)
}

/// One behavior tick for a single enemy: action by current state, then transition.
pub fn step_enemy<P: RaycastPort + ?Sized>(
    ctx: &BehaviorContext<'_, P>,
    entity: Entity,
    translation: Vec3,
    state: &mut EnemyState,
    follow: &mut PathFollow,
    range: &mut AttackRange,
    path: &PathWaypoints,
) {
    range.in_range = false;

    match *state {
        EnemyState::Attack => attack_step(follow, range, translation, ctx.player.position),
        EnemyState::Chase => chase_target(ctx.port, ctx.config, path, follow, ctx.player.entity),
        EnemyState::Wander => wander_step(
            ctx.port,
            ctx.config,
            follow,
            translation,
            wander_seed(ctx.elapsed, entity.index()),
            ctx.delta,
        ),
    }

    let next = evaluate_transition(ctx.port, ctx.config, *state, translation, ctx.player);
    if next != *state {
        crate::logger::log(&format!("🧠 {:?}: {:?} → {:?}", entity, *state, next));
        *state = next;
    }
}

/// Transition rule (pure in distance + line of sight).
///
/// Луч без попаданий (даже игрока) оставляет state как есть.
pub fn evaluate_transition<P: RaycastPort + ?Sized>(
    port: &P,
    config: &BehaviorConfig,
    current: EnemyState,
    translation: Vec3,
    player: PlayerSnapshot,
) -> EnemyState {
    let distance = translation.distance(player.position);
    if distance > config.detection_range {
        return EnemyState::Wander;
    }

    match port.cast_ray(translation, player.position, &SIGHT_FILTER) {
        Some(hit) if hit.entity == player.entity => {
            if distance > config.chase_range {
                EnemyState::Chase
            } else {
                EnemyState::Attack
            }
        }
        Some(_) => EnemyState::Wander,
        None => current,
    }
}

/// Attack: подходим на attack range, внутри: стоим.
pub fn attack_step(follow: &mut PathFollow, range: &mut AttackRange, translation: Vec3, player_position: Vec3) {
    if translation.distance(player_position) >= range.distance {
        follow.position_to_go = Some(ground_cell(player_position));
    } else {
        range.in_range = true;
    }
}

/// Chase: path smoothing.
///
/// От `path_index` назад (к концу пути) до `chase_lookback` проверок: луч
/// от текущего узла к кандидату. Первый кандидат, луч к которому упирается
/// не в игрока, отсекает окно: целью становится предыдущий (ещё видимый) узел.
/// Если ни один луч не заблокирован: следующий узел пути.
pub fn chase_target<P: RaycastPort + ?Sized>(
    port: &P,
    config: &BehaviorConfig,
    path: &PathWaypoints,
    follow: &mut PathFollow,
    player: Entity,
) {
    let len = path.len();
    if len == 0 {
        follow.position_to_go = None;
        return;
    }

    if follow.path_index >= len {
        let invalid = SimulationError::InvalidIndex {
            index: follow.path_index,
            len,
        };
        crate::logger::log_warning(&format!("{}, clamping", invalid));
        follow.path_index = len - 1;
    }

    let index = follow.path_index;
    let height = config.path_probe_height;
    let origin = cell_point(path.0[index].position, height);

    for step in 0..config.chase_lookback.min(len) {
        let candidate = index.saturating_sub(step);
        let end = cell_point(path.0[candidate].position, height);

        match port.cast_ray(origin, end, &SIGHT_FILTER) {
            Some(hit) if hit.entity != player => {
                follow.position_to_go = path.get((candidate + 1).min(len - 1));
                follow.reached_target = false;
                return;
            }
            _ => {}
        }
    }

    follow.position_to_go = path.get(index.saturating_sub(1));
    follow.reached_target = false;
}

/// Wander: random point around the agent every 1–6 seconds.
pub fn wander_step<P: RaycastPort + ?Sized>(
    port: &P,
    config: &BehaviorConfig,
    follow: &mut PathFollow,
    translation: Vec3,
    seed: u64,
    delta: f32,
) {
    if follow.wander_timer >= 0.0 {
        follow.wander_timer -= delta;
        return;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let angle = (config.wander_angle.sample(&mut rng) as f32).to_radians();
    let radius = config.wander_radius.sample(&mut rng) as f32;

    let target = IVec2::new(
        (translation.x + angle.cos() * radius) as i32,
        (translation.z + angle.sin() * radius) as i32,
    );
    let probe = cell_point(target, config.wander_probe_height);

    if port.is_blocked(translation, probe, &SIGHT_FILTER) {
        follow.position_to_go = None;
        follow.wander_timer = 0.0;
        return;
    }

    follow.position_to_go = Some(target);
    follow.reached_target = false;
    follow.wander_timer = config.wander_duration.sample(&mut rng) as f32;
}

/// Parallel sweep shared by both physics backends.
pub(crate) fn sweep_enemies<P: RaycastPort + ?Sized>(
    port: &P,
    config: &BehaviorConfig,
    snapshot: &TickSnapshot,
    enemies: &mut Query<EnemyAgent>,
) {
    // Нет игрока → no-op (залогировано в capture_tick_snapshot)
    let Some(player) = snapshot.player else {
        return;
    };

    let ctx = BehaviorContext {
        config,
        port,
        player,
        elapsed: snapshot.elapsed,
        delta: snapshot.delta,
    };

    enemies
        .par_iter_mut()
        .for_each(|(entity, transform, mut state, mut follow, mut range, path)| {
            step_enemy(
                &ctx,
                entity,
                transform.translation,
                &mut state,
                &mut follow,
                &mut range,
                path,
            );
        });
}

/// System: enemy behavior sweep против ColliderSnapshot (Sweep set)
pub fn enemy_behavior_sweep(
    config: Res<SimulationConfig>,
    snapshot: Res<TickSnapshot>,
    colliders: Res<ColliderSnapshot>,
    mut enemies: Query<EnemyAgent>,
) {
    sweep_enemies(&*colliders, &config.behavior, &snapshot, &mut enemies);
}

/// System: enemy behavior sweep через Rapier query pipeline (feature "rapier")
#[cfg(feature = "rapier")]
pub fn enemy_behavior_sweep_rapier(
    config: Res<SimulationConfig>,
    snapshot: Res<TickSnapshot>,
    rapier: bevy_rapier3d::prelude::ReadRapierContext,
    mut enemies: Query<EnemyAgent>,
) {
    let Ok(context) = rapier.single() else {
        crate::logger::log_warning("enemy_behavior_sweep_rapier: no RapierContext, skipping tick");
        return;
    };
    let sight = crate::physics::RapierSight::new(&context);

    sweep_enemies(&sight, &config.behavior, &snapshot, &mut enemies);
}
