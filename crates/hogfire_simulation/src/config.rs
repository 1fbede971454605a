//! Simulation config (TOML)
//!
//! Все поля опциональны: отсутствующие берутся из `Default`, который
//! воспроизводит боевые константы игры (40 / 20 / lookback 4 и т.д.).

use std::path::Path;

use bevy::prelude::*;
use rand::Rng;
use serde::Deserialize;

use crate::combat::{WeaponProfile, WeaponType};
use crate::error::SimulationError;
use crate::presentation::{default_audio_cues, default_visual_cues, CueLink};

/// Half-open integer range `[min, max)`, as drawn by the wander RNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &'static str, lowest: i32) -> Result<(), SimulationError> {
        if self.min > self.max {
            return Err(SimulationError::ConfigValue { field, reason: "min is greater than max" });
        }
        if self.min < lowest {
            return Err(SimulationError::ConfigValue { field, reason: "min is below the allowed floor" });
        }
        Ok(())
    }

    /// Uniform draw; degenerate range yields `min`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> i32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }
}

/// Enemy behavior tuning.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Beyond this distance the player is undetectable → Wander
    pub detection_range: f32,
    /// Visible and farther than this → Chase, otherwise Attack
    pub chase_range: f32,
    /// Max visibility checks when smoothing the chase path
    pub chase_lookback: usize,
    /// Wander bearing, degrees
    pub wander_angle: IntRange,
    /// Wander radius, units
    pub wander_radius: IntRange,
    /// Wander decision interval, seconds
    pub wander_duration: IntRange,
    /// Height of path-node rays
    pub path_probe_height: f32,
    /// Height of the wander target probe
    pub wander_probe_height: f32,
    /// Walking speed toward `position_to_go` (units/s)
    pub move_speed: f32,
    pub arrive_distance: f32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            detection_range: 40.0,
            chase_range: 20.0,
            chase_lookback: 4,
            wander_angle: IntRange::new(0, 360),
            wander_radius: IntRange::new(3, 7),
            wander_duration: IntRange::new(1, 6),
            path_probe_height: 0.2,
            wander_probe_height: 0.5,
            move_speed: 4.0,
            arrive_distance: 0.1,
        }
    }
}

/// Partial profile from TOML; missing fields fall back to the family defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct ProfilePatch {
    magazine_capacity: Option<u32>,
    reload_time: Option<f32>,
    between_shot_time: Option<f32>,
}

impl BehaviorConfig {
    fn validate(&self) -> Result<(), SimulationError> {
        non_negative("behavior.detection_range", self.detection_range)?;
        non_negative("behavior.chase_range", self.chase_range)?;
        if self.chase_range > self.detection_range {
            return Err(SimulationError::ConfigValue {
                field: "behavior.chase_range",
                reason: "must not exceed detection_range",
            });
        }
        self.wander_angle.check("behavior.wander_angle", i32::MIN)?;
        self.wander_radius.check("behavior.wander_radius", 0)?;
        self.wander_duration.check("behavior.wander_duration", 0)?;
        non_negative("behavior.move_speed", self.move_speed)?;
        non_negative("behavior.arrive_distance", self.arrive_distance)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::ConfigValue { field, reason: "must be finite and non-negative" })
    }
}

fn check_profile(field: &'static str, profile: &WeaponProfile) -> Result<(), SimulationError> {
    if profile.magazine_capacity == 0 {
        return Err(SimulationError::ConfigValue { field, reason: "magazine_capacity must be positive" });
    }
    non_negative(field, profile.reload_time)?;
    non_negative(field, profile.between_shot_time)
}

impl ProfilePatch {
    fn apply(self, weapon_type: WeaponType) -> WeaponProfile {
        let base = WeaponProfile::for_type(weapon_type);
        WeaponProfile {
            magazine_capacity: self.magazine_capacity.unwrap_or(base.magazine_capacity),
            reload_time: self.reload_time.unwrap_or(base.reload_time),
            between_shot_time: self.between_shot_time.unwrap_or(base.between_shot_time),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
struct RawWeaponProfiles {
    pistol: ProfilePatch,
    shotgun: ProfilePatch,
    pig_weapon: ProfilePatch,
    gorilla_weapon: ProfilePatch,
    machinegun: ProfilePatch,
}

impl From<RawWeaponProfiles> for WeaponProfiles {
    fn from(raw: RawWeaponProfiles) -> Self {
        Self {
            pistol: raw.pistol.apply(WeaponType::Pistol),
            shotgun: raw.shotgun.apply(WeaponType::Shotgun),
            pig_weapon: raw.pig_weapon.apply(WeaponType::PigWeapon),
            gorilla_weapon: raw.gorilla_weapon.apply(WeaponType::GorillaWeapon),
            machinegun: raw.machinegun.apply(WeaponType::Machinegun),
        }
    }
}

/// Per-family weapon stats.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "RawWeaponProfiles")]
pub struct WeaponProfiles {
    pub pistol: WeaponProfile,
    pub shotgun: WeaponProfile,
    pub pig_weapon: WeaponProfile,
    pub gorilla_weapon: WeaponProfile,
    pub machinegun: WeaponProfile,
}

impl Default for WeaponProfiles {
    fn default() -> Self {
        Self {
            pistol: WeaponProfile::for_type(WeaponType::Pistol),
            shotgun: WeaponProfile::for_type(WeaponType::Shotgun),
            pig_weapon: WeaponProfile::for_type(WeaponType::PigWeapon),
            gorilla_weapon: WeaponProfile::for_type(WeaponType::GorillaWeapon),
            machinegun: WeaponProfile::for_type(WeaponType::Machinegun),
        }
    }
}

impl WeaponProfiles {
    fn validate(&self) -> Result<(), SimulationError> {
        check_profile("weapons.pistol", &self.pistol)?;
        check_profile("weapons.shotgun", &self.shotgun)?;
        check_profile("weapons.pig_weapon", &self.pig_weapon)?;
        check_profile("weapons.gorilla_weapon", &self.gorilla_weapon)?;
        check_profile("weapons.machinegun", &self.machinegun)
    }

    pub fn get(&self, weapon_type: WeaponType) -> WeaponProfile {
        match weapon_type {
            WeaponType::Pistol => self.pistol,
            WeaponType::Shotgun => self.shotgun,
            WeaponType::PigWeapon => self.pig_weapon,
            WeaponType::GorillaWeapon => self.gorilla_weapon,
            WeaponType::Machinegun => self.machinegun,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed timestep frequency
    pub tick_hz: f64,
    pub behavior: BehaviorConfig,
    pub weapons: WeaponProfiles,
    pub visual_cues: Vec<CueLink>,
    pub audio_cues: Vec<CueLink>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            behavior: BehaviorConfig::default(),
            weapons: WeaponProfiles::default(),
            visual_cues: default_visual_cues(),
            audio_cues: default_audio_cues(),
        }
    }
}

impl SimulationConfig {
    /// Parse + validate. Невалидные значения (tick_hz = 0 и т.п.) дальше
    /// не проходят: `Time::<Fixed>::from_hz` на них паникует.
    pub fn from_toml_str(source: &str) -> Result<Self, SimulationError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.tick_hz.is_finite() && self.tick_hz > 0.0) {
            return Err(SimulationError::ConfigValue {
                field: "tick_hz",
                reason: "must be finite and positive",
            });
        }
        self.behavior.validate()?;
        self.weapons.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rstest::rstest;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_defaults_match_game_constants() {
        let config = SimulationConfig::default();
        assert_eq!(config.tick_hz, 60.0);
        assert_eq!(config.behavior.detection_range, 40.0);
        assert_eq!(config.behavior.chase_range, 20.0);
        assert_eq!(config.behavior.chase_lookback, 4);
        assert_eq!(config.weapons.get(WeaponType::Shotgun).magazine_capacity, 2);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tick_hz = 30.0

            [behavior]
            detection_range = 25.0
            wander_radius = { min = 1, max = 2 }

            [weapons.shotgun]
            magazine_capacity = 8
            "#,
        )
        .expect("valid config");

        assert_eq!(config.tick_hz, 30.0);
        assert_eq!(config.behavior.detection_range, 25.0);
        assert_eq!(config.behavior.chase_range, 20.0);
        assert_eq!(config.behavior.wander_radius, IntRange::new(1, 2));
        assert_eq!(config.weapons.shotgun.magazine_capacity, 8);
        // Остальные поля: дефолты именно shotgun, не pistol
        let shotgun = WeaponProfile::for_type(WeaponType::Shotgun);
        assert_eq!(config.weapons.shotgun.reload_time, shotgun.reload_time);
        assert_eq!(config.weapons.pistol, WeaponProfile::for_type(WeaponType::Pistol));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SimulationConfig::from_toml_str("tick_hz = \"fast\"").unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero_tick("tick_hz = 0.0", "tick_hz")]
    #[case::negative_tick("tick_hz = -60.0", "tick_hz")]
    #[case::inverted_radius("[behavior]\nwander_radius = { min = 7, max = 3 }", "behavior.wander_radius")]
    #[case::negative_duration("[behavior]\nwander_duration = { min = -1, max = 6 }", "behavior.wander_duration")]
    #[case::negative_speed("[behavior]\nmove_speed = -4.0", "behavior.move_speed")]
    #[case::chase_beyond_detection("[behavior]\nchase_range = 50.0", "behavior.chase_range")]
    #[case::empty_magazine("[weapons.pistol]\nmagazine_capacity = 0", "weapons.pistol")]
    #[case::negative_reload("[weapons.shotgun]\nreload_time = -1.0", "weapons.shotgun")]
    fn test_out_of_range_values_are_rejected(#[case] source: &str, #[case] expected: &str) {
        let err = SimulationConfig::from_toml_str(source).unwrap_err();
        match err {
            SimulationError::ConfigValue { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ConfigValue, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, SimulationError::Io(_)));
    }

    #[test]
    fn test_int_range_sampling() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let range = IntRange::new(3, 7);
        for _ in 0..100 {
            let value = range.sample(&mut rng);
            assert!((3..7).contains(&value));
        }
        assert_eq!(IntRange::new(5, 5).sample(&mut rng), 5);
    }
}
