//! Тесты детерминизма
//!
//! Проверяем что одинаковая арена с одинаковым шагом времени даёт
//! идентичные траектории врагов и состояние оружия, несмотря на
//! параллельные sweeps (порядок workers не важен).

// Сценарии завязаны на ColliderSnapshot; с Rapier нужен живой physics world
#![cfg(not(feature = "rapier"))]

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use hogfire_simulation::*;

const TICK_COUNT: usize = 600;

fn spawn_arena(world: &mut World) {
    world.spawn((
        Player,
        CombatState::Idle,
        Transform::from_xyz(0.0, 0.0, 0.0),
        SightCollider::player(),
    ));
    world.spawn((
        Transform::from_xyz(6.0, 1.0, 6.0),
        SightCollider::wall(Vec3::new(2.0, 1.0, 2.0)),
    ));

    for i in 0..40 {
        let angle = i as f32 * 0.37;
        let radius = 10.0 + (i % 5) as f32 * 8.0;
        let position = Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius);
        let weapon_type = WeaponType::ALL[i % WeaponType::COUNT];

        let mut waypoints = PathWaypoints::default();
        let mut follow = PathFollow::default();
        let steps = radius as i32;
        follow.assign_path(
            &mut waypoints,
            (0..=steps).map(|s| {
                let t = s as f32 / steps as f32;
                IVec2::new((position.x * t) as i32, (position.z * t) as i32)
            }),
        );

        world.spawn((
            EnemyState::default(),
            AttackRange::new(6.0),
            Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
            SightCollider::enemy(),
            waypoints,
            follow,
            CombatState::Attacking,
            Weapon::new(weapon_type, 20),
        ));
    }
}

/// Snapshot врагов: позиции + FSM + оружие (projectiles не входят,
/// их Entity id зависят от порядка применения команд)
fn run_simulation(ticks: usize) -> Vec<u8> {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin::default().in_schedule(Update))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));
    spawn_arena(app.world_mut());

    for _ in 0..ticks {
        app.update();
    }

    let world = app.world_mut();
    let mut snapshot = world_snapshot::<EnemyState>(world);
    snapshot.extend(world_snapshot::<PathFollow>(world));
    snapshot.extend(world_snapshot::<Weapon>(world));

    let mut enemies = world.query_filtered::<(Entity, &Transform), With<EnemyState>>();
    let mut positions: Vec<_> = enemies
        .iter(world)
        .map(|(entity, transform)| (entity.index(), transform.translation))
        .collect();
    positions.sort_by_key(|(index, _)| *index);
    snapshot.extend(format!("{:?}", positions).into_bytes());

    snapshot
}

#[test]
fn test_determinism_same_timing() {
    let snapshot1 = run_simulation(TICK_COUNT);
    let snapshot2 = run_simulation(TICK_COUNT);

    assert_eq!(snapshot1, snapshot2, "Симуляция с одинаковым шагом дала разные результаты!");
}

#[test]
fn test_determinism_multiple_runs() {
    // Запускаем 3 раза: все должны быть идентичны
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(200)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_ammo_invariants_over_arena_run() {
    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin::default().in_schedule(Update))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)));
    spawn_arena(app.world_mut());

    // total ammo по оружию, в порядке Entity index
    let totals = |world: &mut World| -> Vec<u32> {
        let mut weapons = world.query::<(Entity, &Weapon)>();
        let mut rows: Vec<_> = weapons
            .iter(world)
            .map(|(entity, weapon)| (entity.index(), weapon.total_ammo()))
            .collect();
        rows.sort_unstable();
        rows.into_iter().map(|(_, total)| total).collect()
    };

    let mut previous = totals(app.world_mut());
    for _ in 0..TICK_COUNT {
        app.update();

        let mut weapons = app.world_mut().query::<&Weapon>();
        for weapon in weapons.iter(app.world()) {
            assert!(weapon.ammo_in_magazine <= weapon.magazine_capacity);
        }

        let current = totals(app.world_mut());
        for (before, after) in previous.iter().zip(&current) {
            assert!(after <= before, "ammo total grew: {} → {}", before, after);
        }
        previous = current;
    }
}
