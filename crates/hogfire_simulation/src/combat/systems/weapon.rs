//! Weapon fire control (per-weapon state machine, parallel sweep).

use bevy::prelude::*;

use crate::combat::pattern::spawn_pattern;
use crate::combat::{Projectile, Weapon, WeaponHolder};
use crate::components::CombatState;
use crate::error::SimulationError;
use crate::events::{FireEvent, SimulationEvents, WeaponEventKind};
use crate::tick::TickSnapshot;

/// One fire-control tick for a single weapon.
///
/// Порядок веток (первая сработавшая завершает тик для этого оружия):
/// 0. swap delay
/// 1. reload in flight → countdown, completion
/// 2. between-shot cooldown
/// 3. пустой магазин + reserve → auto reload (`Reload`)
/// 3b. owner просит reload → manual reload (`Reload`)
/// 4. owner Attacking + патроны → выстрел (`Shoot`)
pub fn step_weapon(
    weapon: &mut Weapon,
    owner_state: CombatState,
    delta: f32,
) -> Option<WeaponEventKind> {
    if weapon.is_swapping() {
        weapon.swap_timer -= delta;
        return None;
    }

    if weapon.is_reloading() {
        weapon.reload_timer -= delta;
        if weapon.reload_timer <= 0.0 {
            weapon.complete_reload();
        }
        return None;
    }

    if weapon.is_between_shot() {
        weapon.between_shot_timer -= delta;
        return None;
    }

    if weapon.is_empty() && weapon.ammo_reserve > 0 {
        weapon.start_reload();
        return Some(WeaponEventKind::Reload);
    }

    if owner_state == CombatState::Reloading && !weapon.is_full() && weapon.ammo_reserve > 0 {
        weapon.start_reload();
        return Some(WeaponEventKind::Reload);
    }

    if owner_state == CombatState::Attacking && !weapon.is_empty() {
        weapon.ammo_in_magazine -= 1;
        weapon.between_shot_timer = weapon.reset_between_shot_time;
        return Some(WeaponEventKind::Shoot);
    }

    None
}

/// System: fire control sweep (Sweep set, parallel по weapon entities)
///
/// Owner = `WeaponHolder::owner` или сам weapon. Owner без `CombatState`
/// пропускается (лог), остальные оружия тика не страдают.
/// Projectiles спавнятся через ParallelCommands (применяются после sweep).
/// Muzzle и owner origin берутся из `GlobalTransform`: оружие обычно child
/// владельца (`ChildOf`), локальный Transform тут бесполезен.
pub fn fire_control_sweep(
    snapshot: Res<TickSnapshot>,
    events: Res<SimulationEvents>,
    owners: Query<(&CombatState, &GlobalTransform)>,
    mut weapons: Query<(Entity, &mut Weapon, &GlobalTransform, Option<&WeaponHolder>)>,
    par_commands: ParallelCommands,
) {
    weapons
        .par_iter_mut()
        .for_each(|(entity, mut weapon, muzzle, holder)| {
            let owner = holder.map_or(entity, |holder| holder.owner);
            let Ok((state, owner_transform)) = owners.get(owner) else {
                let missing = SimulationError::MissingDependency {
                    what: "weapon owner CombatState",
                };
                crate::logger::log_warning(&format!("{} (weapon {:?}, owner {:?})", missing, entity, owner));
                return;
            };

            let Some(kind) = step_weapon(&mut weapon, *state, snapshot.delta) else {
                return;
            };

            let (_, muzzle_rotation, muzzle_position) = muzzle.to_scale_rotation_translation();
            events.weapon.push(FireEvent {
                weapon: entity,
                weapon_type: weapon.weapon_type,
                kind,
                position: muzzle_position,
                rotation: muzzle_rotation,
                frame_timestamp: snapshot.elapsed,
            });

            if kind != WeaponEventKind::Shoot {
                return;
            }

            let spawns = spawn_pattern(weapon.weapon_type, muzzle_position, muzzle_rotation);
            let projectile_type = weapon.weapon_type.projectile();
            let origin = owner_transform.translation();

            par_commands.command_scope(|mut commands| {
                commands.spawn_batch(spawns.into_iter().map(move |spawn| {
                    (
                        Projectile::new(projectile_type, owner, origin),
                        Transform::from_translation(spawn.position).with_rotation(spawn.rotation),
                    )
                }));
            });
        });
}
