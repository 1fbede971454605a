//! Weapon component (ammo bookkeeping + fire-control timers)
//!
//! Architecture:
//! - ECS хранит: magazine/reserve, reload и between-shot таймеры
//! - fire_control_sweep: раз в тик решает Reload / Shoot (см. combat/systems/weapon.rs)
//! - Presentation: читает FireEvent stream, сам Weapon не трогает

use bevy::prelude::*;
use serde::Deserialize;

/// Weapon family. Determines muzzle pattern and projectile prefab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponType {
    Pistol,
    Shotgun,
    PigWeapon,
    GorillaWeapon,
    Machinegun,
}

impl WeaponType {
    pub const COUNT: usize = 5;

    pub const ALL: [WeaponType; Self::COUNT] = [
        WeaponType::Pistol,
        WeaponType::Shotgun,
        WeaponType::PigWeapon,
        WeaponType::GorillaWeapon,
        WeaponType::Machinegun,
    ];

    /// Ordinal for fixed lookup tables.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Projectile prefab spawned by this weapon.
    pub fn projectile(self) -> ProjectileType {
        match self {
            WeaponType::Pistol | WeaponType::Machinegun => ProjectileType::Bullet,
            WeaponType::Shotgun => ProjectileType::Pellet,
            WeaponType::PigWeapon => ProjectileType::Spit,
            WeaponType::GorillaWeapon => ProjectileType::Shockwave,
        }
    }
}

/// Projectile prefab reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileType {
    Bullet,
    Pellet,
    Spit,
    Shockwave,
}

impl ProjectileType {
    pub const COUNT: usize = 4;

    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Скорость полёта (м/с)
    pub fn speed(self) -> f32 {
        match self {
            ProjectileType::Bullet => 40.0,
            ProjectileType::Pellet => 30.0,
            ProjectileType::Spit => 15.0,
            ProjectileType::Shockwave => 12.0,
        }
    }

    /// Время жизни до despawn (секунды)
    pub fn lifetime(self) -> f32 {
        match self {
            ProjectileType::Bullet | ProjectileType::Pellet => 2.0,
            ProjectileType::Spit | ProjectileType::Shockwave => 3.0,
        }
    }
}

/// Static stats of one weapon family (overridable from config).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub magazine_capacity: u32,
    /// Reload duration (seconds)
    pub reload_time: f32,
    /// Delay between two shots (seconds)
    pub between_shot_time: f32,
}

impl WeaponProfile {
    pub fn for_type(weapon_type: WeaponType) -> Self {
        let (magazine_capacity, reload_time, between_shot_time) = match weapon_type {
            WeaponType::Pistol => (12, 1.2, 0.3),
            WeaponType::Shotgun => (2, 2.0, 0.8),
            WeaponType::PigWeapon => (6, 1.5, 0.6),
            WeaponType::GorillaWeapon => (3, 3.0, 1.2),
            WeaponType::Machinegun => (30, 2.5, 0.08),
        };

        Self {
            magazine_capacity,
            reload_time,
            between_shot_time,
        }
    }
}

/// Weapon state (one per gun-equipped entity).
///
/// Инварианты:
/// - `ammo_in_magazine <= magazine_capacity`
/// - `ammo_in_magazine + ammo_reserve` не растёт (кроме `replenish`)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    pub weapon_type: WeaponType,
    pub magazine_capacity: u32,
    pub ammo_in_magazine: u32,
    pub ammo_reserve: u32,

    /// Reload duration restored on every reload start
    pub reset_reload_time: f32,
    /// Seconds left until reload completes (≤ 0 = ready)
    pub reload_timer: f32,
    /// Latched while a reload is in flight, cleared by reload completion
    pub reloading: bool,

    pub reset_between_shot_time: f32,
    /// Seconds left until next shot is allowed (≤ 0 = ready)
    pub between_shot_timer: f32,

    /// Delay after swapping to this weapon (blocks everything)
    pub swap_timer: f32,
}

impl Weapon {
    /// Weapon with a full magazine and `reserve` rounds on the owner.
    pub fn from_profile(weapon_type: WeaponType, profile: WeaponProfile, reserve: u32) -> Self {
        Self {
            weapon_type,
            magazine_capacity: profile.magazine_capacity,
            ammo_in_magazine: profile.magazine_capacity,
            ammo_reserve: reserve,
            reset_reload_time: profile.reload_time,
            reload_timer: 0.0,
            reloading: false,
            reset_between_shot_time: profile.between_shot_time,
            between_shot_timer: 0.0,
            swap_timer: 0.0,
        }
    }

    /// Weapon with built-in stats for `weapon_type`.
    pub fn new(weapon_type: WeaponType, reserve: u32) -> Self {
        Self::from_profile(weapon_type, WeaponProfile::for_type(weapon_type), reserve)
    }

    /// Override magazine contents (clamped to capacity).
    pub fn with_magazine(mut self, rounds: u32) -> Self {
        self.ammo_in_magazine = rounds.min(self.magazine_capacity);
        self
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn is_between_shot(&self) -> bool {
        self.between_shot_timer > 0.0
    }

    pub fn is_swapping(&self) -> bool {
        self.swap_timer > 0.0
    }

    pub fn is_empty(&self) -> bool {
        self.ammo_in_magazine == 0
    }

    pub fn is_full(&self) -> bool {
        self.ammo_in_magazine >= self.magazine_capacity
    }

    pub fn total_ammo(&self) -> u32 {
        self.ammo_in_magazine + self.ammo_reserve
    }

    /// Start the swap delay (weapon picked up / switched to).
    pub fn start_swap(&mut self, delay: f32) {
        self.swap_timer = delay;
    }

    /// External ammo pickup. Only way the total ammo grows.
    pub fn replenish(&mut self, rounds: u32) {
        self.ammo_reserve = self.ammo_reserve.saturating_add(rounds);
    }

    pub(crate) fn start_reload(&mut self) {
        self.reload_timer = self.reset_reload_time;
        self.reloading = true;
    }

    /// Moves `min(reserve, free magazine space)` rounds from reserve to magazine.
    pub(crate) fn complete_reload(&mut self) {
        let space = self.magazine_capacity.saturating_sub(self.ammo_in_magazine);
        let moved = self.ammo_reserve.min(space);

        self.ammo_reserve -= moved;
        self.ammo_in_magazine += moved;
        self.reload_timer = 0.0;
        self.reloading = false;
    }
}

/// Link weapon → owner (entity with `CombatState` and the owner position).
///
/// Без компонента weapon считается своим собственным owner.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct WeaponHolder {
    pub owner: Entity,
}
