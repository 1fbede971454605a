//! Headless симуляция HOGFIRE
//!
//! Арена: игрок, стены, враги с оружием. 1000 тиков без рендера.
//! Первый аргумент (опционально): путь к TOML конфигу.

use bevy::prelude::*;
use hogfire_simulation::*;

fn spawn_arena(world: &mut World, config: &SimulationConfig) {
    world.spawn((
        Player,
        CombatState::Attacking,
        Transform::from_xyz(0.0, 0.0, 0.0),
        SightCollider::player(),
    ));

    // Стены по периметру 60×60
    for (center, half_extents) in [
        (Vec3::new(0.0, 1.0, 30.0), Vec3::new(30.0, 1.0, 0.5)),
        (Vec3::new(0.0, 1.0, -30.0), Vec3::new(30.0, 1.0, 0.5)),
        (Vec3::new(30.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 30.0)),
        (Vec3::new(-30.0, 1.0, 0.0), Vec3::new(0.5, 1.0, 30.0)),
        (Vec3::new(8.0, 1.0, 8.0), Vec3::new(2.0, 1.0, 2.0)),
    ] {
        world.spawn((Transform::from_translation(center), SightCollider::wall(half_extents)));
    }

    let loadout = [
        WeaponType::Pistol,
        WeaponType::Shotgun,
        WeaponType::PigWeapon,
        WeaponType::GorillaWeapon,
        WeaponType::Machinegun,
    ];
    for (i, weapon_type) in loadout.into_iter().enumerate() {
        let angle = i as f32 * std::f32::consts::TAU / loadout.len() as f32;
        let position = Vec3::new(angle.cos() * 25.0, 0.0, angle.sin() * 25.0);
        let transform = Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y);
        let profile = config.weapons.get(weapon_type);

        world.spawn((
            EnemyState::default(),
            CombatState::Attacking,
            AttackRange::new(10.0),
            transform,
            SightCollider::enemy(),
            Weapon::from_profile(weapon_type, profile, profile.magazine_capacity * 3),
        ));
    }
}

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    println!("Starting HOGFIRE headless simulation ({} Hz)", config.tick_hz);

    let mut app = create_headless_app();
    app.add_plugins(SimulationPlugin::new(config.clone()).in_schedule(Update));
    app.insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(
        std::time::Duration::from_secs_f64(1.0 / config.tick_hz),
    ));
    spawn_arena(app.world_mut(), &config);

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        app.update();

        if tick % 100 == 0 {
            let frame = app.world().resource::<FrameEvents>();
            let entity_count = app.world().entities().len();
            println!(
                "Tick {}: {} entities, {} weapon events, {} bullet collisions",
                tick,
                entity_count,
                frame.weapon.len(),
                frame.bullet.len()
            );
        }
    }

    println!("Simulation complete!");
}
