//! Tests for Weapon component.

#[cfg(test)]
mod tests {
    use super::super::weapon::*;

    #[test]
    fn test_weapon_starts_with_full_magazine() {
        let weapon = Weapon::new(WeaponType::Pistol, 24);
        assert_eq!(weapon.ammo_in_magazine, weapon.magazine_capacity);
        assert_eq!(weapon.ammo_reserve, 24);
        assert!(!weapon.is_reloading());
        assert!(!weapon.is_between_shot());
    }

    #[test]
    fn test_with_magazine_clamps_to_capacity() {
        let weapon = Weapon::new(WeaponType::Shotgun, 0).with_magazine(50);
        assert_eq!(weapon.ammo_in_magazine, 2);
    }

    #[test]
    fn test_complete_reload_from_empty() {
        let mut weapon = Weapon::new(WeaponType::Pistol, 10).with_magazine(0);
        weapon.start_reload();
        assert!(weapon.is_reloading());

        weapon.complete_reload();
        assert!(!weapon.is_reloading());
        assert_eq!(weapon.ammo_in_magazine, 10); // min(10, 12)
        assert_eq!(weapon.ammo_reserve, 0);
    }

    #[test]
    fn test_complete_reload_tops_up_partial_magazine() {
        let mut weapon = Weapon::new(WeaponType::Pistol, 100).with_magazine(5);
        weapon.start_reload();
        weapon.complete_reload();

        assert_eq!(weapon.ammo_in_magazine, 12);
        assert_eq!(weapon.ammo_reserve, 93);
        assert_eq!(weapon.total_ammo(), 105);
    }

    #[test]
    fn test_replenish_saturates() {
        let mut weapon = Weapon::new(WeaponType::Machinegun, u32::MAX - 1);
        weapon.replenish(10);
        assert_eq!(weapon.ammo_reserve, u32::MAX);
    }

    #[test]
    fn test_projectile_mapping() {
        assert_eq!(WeaponType::Pistol.projectile(), ProjectileType::Bullet);
        assert_eq!(WeaponType::Machinegun.projectile(), ProjectileType::Bullet);
        assert_eq!(WeaponType::Shotgun.projectile(), ProjectileType::Pellet);
        assert_eq!(WeaponType::GorillaWeapon.projectile(), ProjectileType::Shockwave);
    }

    #[test]
    fn test_ordinals_are_dense() {
        for (index, weapon_type) in WeaponType::ALL.iter().enumerate() {
            assert_eq!(weapon_type.ordinal(), index);
        }
    }
}
