//! Muzzle patterns: weapon type + muzzle transform → projectile spawn descriptors
//!
//! Чистые функции, без состояния. Forward = `rotation * -Z` (Bevy convention),
//! разброс: yaw вокруг локальной оси Y.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::components::WeaponType;

/// Spatial layout of one shot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MuzzlePattern {
    /// One projectile along muzzle forward
    Single,
    /// `count` projectiles evenly spaced across `spread` radians, centred on forward
    Fan { count: usize, spread: f32 },
    /// `count` projectiles evenly spaced around the full circle
    Ring { count: usize },
}

impl MuzzlePattern {
    pub fn for_weapon(weapon_type: WeaponType) -> Self {
        match weapon_type {
            WeaponType::Pistol | WeaponType::Machinegun => MuzzlePattern::Single,
            WeaponType::Shotgun => MuzzlePattern::fan(100),
            WeaponType::PigWeapon => MuzzlePattern::fan(3),
            WeaponType::GorillaWeapon => MuzzlePattern::Ring { count: 15 },
        }
    }

    /// Cone width scales with the pellet count (2° per projectile).
    pub fn fan(count: usize) -> Self {
        MuzzlePattern::Fan {
            count,
            spread: (count as f32 * 2.0).to_radians(),
        }
    }

    pub fn count(&self) -> usize {
        match *self {
            MuzzlePattern::Single => 1,
            MuzzlePattern::Fan { count, .. } | MuzzlePattern::Ring { count } => count,
        }
    }

    /// Yaw offset (radians) of projectile `i` relative to muzzle forward.
    pub fn yaw_offset(&self, i: usize) -> f32 {
        match *self {
            MuzzlePattern::Single => 0.0,
            MuzzlePattern::Fan { count, spread } => {
                let step = spread / count as f32;
                (i as f32 - (count as f32 - 1.0) * 0.5) * step
            }
            MuzzlePattern::Ring { count } => i as f32 * TAU / count as f32,
        }
    }
}

/// One projectile to spawn (`spawnProjectile` descriptor minus prefab).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: Vec3,
    pub rotation: Quat,
}

impl ProjectileSpawn {
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// Spawn descriptors for one shot of `weapon_type` from the given muzzle.
pub fn spawn_pattern(weapon_type: WeaponType, position: Vec3, rotation: Quat) -> Vec<ProjectileSpawn> {
    let pattern = MuzzlePattern::for_weapon(weapon_type);

    (0..pattern.count())
        .map(|i| ProjectileSpawn {
            position,
            rotation: rotation * Quat::from_rotation_y(pattern.yaw_offset(i)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(WeaponType::Pistol, 1)]
    #[case(WeaponType::Machinegun, 1)]
    #[case(WeaponType::Shotgun, 100)]
    #[case(WeaponType::PigWeapon, 3)]
    #[case(WeaponType::GorillaWeapon, 15)]
    fn test_pattern_counts(#[case] weapon_type: WeaponType, #[case] expected: usize) {
        let spawns = spawn_pattern(weapon_type, Vec3::ZERO, Quat::IDENTITY);
        assert_eq!(spawns.len(), expected);
    }

    #[test]
    fn test_single_follows_muzzle() {
        let muzzle = Quat::from_rotation_y(0.7);
        let spawns = spawn_pattern(WeaponType::Pistol, Vec3::new(1.0, 2.0, 3.0), muzzle);

        assert_eq!(spawns[0].position, Vec3::new(1.0, 2.0, 3.0));
        assert!(spawns[0].rotation.abs_diff_eq(muzzle, 1e-6));
    }

    #[test]
    fn test_shotgun_symmetric_around_forward() {
        let pattern = MuzzlePattern::for_weapon(WeaponType::Shotgun);
        let spawns = spawn_pattern(WeaponType::Shotgun, Vec3::ZERO, Quat::IDENTITY);

        for i in 0..spawns.len() {
            let mirror = spawns.len() - 1 - i;
            assert_relative_eq!(pattern.yaw_offset(i), -pattern.yaw_offset(mirror), epsilon = 1e-5);

            // Зеркальные пары: x противоположен, z совпадает
            let a = spawns[i].forward();
            let b = spawns[mirror].forward();
            assert_relative_eq!(a.x, -b.x, epsilon = 1e-5);
            assert_relative_eq!(a.z, b.z, epsilon = 1e-5);
        }

        let mean: Vec3 = spawns.iter().map(|s| s.forward()).sum::<Vec3>() / spawns.len() as f32;
        assert_relative_eq!(mean.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_fan_evenly_spaced() {
        let pattern = MuzzlePattern::for_weapon(WeaponType::PigWeapon);
        let step = pattern.yaw_offset(1) - pattern.yaw_offset(0);

        assert_relative_eq!(step, 2.0_f32.to_radians(), epsilon = 1e-6);
        assert_relative_eq!(pattern.yaw_offset(2) - pattern.yaw_offset(1), step, epsilon = 1e-6);
        assert_relative_eq!(pattern.yaw_offset(1), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_gorilla_ring_even_spacing() {
        let spawns = spawn_pattern(WeaponType::GorillaWeapon, Vec3::ZERO, Quat::IDENTITY);
        let expected = TAU / 15.0;

        for i in 0..spawns.len() {
            let next = (i + 1) % spawns.len();
            let angle = spawns[i].forward().angle_between(spawns[next].forward());
            assert_relative_eq!(angle, expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_pattern_is_pure() {
        let rotation = Quat::from_rotation_y(1.3);
        let a = spawn_pattern(WeaponType::Shotgun, Vec3::ONE, rotation);
        let b = spawn_pattern(WeaponType::Shotgun, Vec3::ONE, rotation);
        assert_eq!(a, b);
    }
}
