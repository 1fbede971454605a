//! Presentation routing: frame event streams → visual / audio cue batches
//!
//! Какой VFX/звук играть для пары (weapon type, event) или
//! (projectile type, collision): фиксированная двухуровневая таблица по
//! ordinal'ам enum'ов, строится один раз при старте из `CueLink` списков.
//! Текстуры, ассеты и воспроизведение: не здесь, только батчи инстансов.

use std::fmt::Debug;
use std::marker::PhantomData;

use bevy::ecs::schedule::{InternedScheduleLabel, ScheduleLabel};
use bevy::prelude::*;
use serde::Deserialize;

use crate::combat::{ProjectileType, WeaponType};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::events::{CollisionKind, FrameEvents, WeaponEventKind};
use crate::SimulationSet;

/// Index of a cue inside its library.
pub type CueId = usize;

/// One cue and the event pairs that trigger it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CueLink {
    pub name: String,
    /// Max instances per tick (extra instances are dropped for this cue only)
    #[serde(default = "default_cue_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub weapon: Vec<(WeaponType, WeaponEventKind)>,
    #[serde(default)]
    pub bullets: Vec<(ProjectileType, CollisionKind)>,
}

fn default_cue_capacity() -> usize {
    64
}

impl CueLink {
    pub fn new(name: &str, capacity: usize) -> Self {
        Self {
            name: name.to_owned(),
            capacity,
            weapon: Vec::new(),
            bullets: Vec::new(),
        }
    }

    pub fn on_weapon(mut self, weapon_type: WeaponType, kind: WeaponEventKind) -> Self {
        self.weapon.push((weapon_type, kind));
        self
    }

    pub fn on_bullet(mut self, projectile_type: ProjectileType, collision: CollisionKind) -> Self {
        self.bullets.push((projectile_type, collision));
        self
    }
}

/// Fixed lookup: enum ordinals → cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTable {
    weapon: [[Option<CueId>; WeaponEventKind::COUNT]; WeaponType::COUNT],
    bullet: [[Option<CueId>; CollisionKind::COUNT]; ProjectileType::COUNT],
}

impl Default for CueTable {
    fn default() -> Self {
        Self {
            weapon: [[None; WeaponEventKind::COUNT]; WeaponType::COUNT],
            bullet: [[None; CollisionKind::COUNT]; ProjectileType::COUNT],
        }
    }
}

impl CueTable {
    /// Build from links; `CueId` = position in `links`.
    pub fn build(table: &'static str, links: &[CueLink]) -> Result<Self, SimulationError> {
        let mut cues = Self::default();

        for (id, link) in links.iter().enumerate() {
            for &(weapon_type, kind) in &link.weapon {
                let slot = &mut cues.weapon[weapon_type.ordinal()][kind.ordinal()];
                link_slot(table, slot, id, (weapon_type, kind))?;
            }
            for &(projectile_type, collision) in &link.bullets {
                let slot = &mut cues.bullet[projectile_type.ordinal()][collision.ordinal()];
                link_slot(table, slot, id, (projectile_type, collision))?;
            }
        }

        Ok(cues)
    }

    pub fn weapon_cue(&self, weapon_type: WeaponType, kind: WeaponEventKind) -> Option<CueId> {
        self.weapon[weapon_type.ordinal()][kind.ordinal()]
    }

    pub fn bullet_cue(&self, projectile_type: ProjectileType, collision: CollisionKind) -> Option<CueId> {
        self.bullet[projectile_type.ordinal()][collision.ordinal()]
    }
}

fn link_slot(
    table: &'static str,
    slot: &mut Option<CueId>,
    id: CueId,
    pair: impl Debug,
) -> Result<(), SimulationError> {
    match *slot {
        Some(first) if first != id => Err(SimulationError::DuplicateCue {
            table,
            pair: format!("{:?}", pair),
            first,
            second: id,
        }),
        _ => {
            *slot = Some(id);
            Ok(())
        }
    }
}

/// One cue instance to render / play this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueInstance {
    pub position: Vec3,
    pub direction: Vec3,
}

/// Per-cue instances of the current frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CueBatch {
    pub name: String,
    pub capacity: usize,
    pub instances: Vec<CueInstance>,
}

impl CueBatch {
    fn push(&mut self, instance: CueInstance) {
        if self.instances.len() < self.capacity {
            self.instances.push(instance);
        }
    }
}

/// Cue flavour: where its links come from in the config.
pub trait CueKind: Send + Sync + 'static {
    const TABLE: &'static str;

    fn links(config: &SimulationConfig) -> &[CueLink];
}

/// Visual effects (muzzle flash, impacts).
pub struct Visual;

/// Sound effects.
pub struct Audio;

impl CueKind for Visual {
    const TABLE: &'static str = "visual";

    fn links(config: &SimulationConfig) -> &[CueLink] {
        &config.visual_cues
    }
}

impl CueKind for Audio {
    const TABLE: &'static str = "audio";

    fn links(config: &SimulationConfig) -> &[CueLink] {
        &config.audio_cues
    }
}

#[derive(Resource)]
pub struct CueLibrary<K: CueKind> {
    table: CueTable,
    batches: Vec<CueBatch>,
    _kind: PhantomData<K>,
}

impl<K: CueKind> Default for CueLibrary<K> {
    fn default() -> Self {
        Self {
            table: CueTable::default(),
            batches: Vec::new(),
            _kind: PhantomData,
        }
    }
}

impl<K: CueKind> CueLibrary<K> {
    pub fn from_links(links: &[CueLink]) -> Result<Self, SimulationError> {
        Ok(Self {
            table: CueTable::build(K::TABLE, links)?,
            batches: links
                .iter()
                .map(|link| CueBatch {
                    name: link.name.clone(),
                    capacity: link.capacity,
                    instances: Vec::with_capacity(link.capacity),
                })
                .collect(),
            _kind: PhantomData,
        })
    }

    pub fn table(&self) -> &CueTable {
        &self.table
    }

    pub fn batches(&self) -> &[CueBatch] {
        &self.batches
    }

    pub fn batch(&self, name: &str) -> Option<&CueBatch> {
        self.batches.iter().find(|batch| batch.name == name)
    }

    fn reset(&mut self) {
        for batch in &mut self.batches {
            batch.instances.clear();
        }
    }

    fn route(&mut self, cue: Option<CueId>, position: Vec3, rotation: Quat) {
        let Some(batch) = cue.and_then(|id| self.batches.get_mut(id)) else {
            return;
        };
        batch.push(CueInstance {
            position,
            direction: rotation * Vec3::NEG_Z,
        });
    }

    /// Replace batches with this frame's events (bullets first, then weapons).
    pub fn collect(&mut self, frame: &FrameEvents) {
        self.reset();

        for event in &frame.bullet {
            let cue = self.table.bullet_cue(event.projectile_type, event.collision);
            self.route(cue, event.position, event.rotation);
        }
        for event in &frame.weapon {
            let cue = self.table.weapon_cue(event.weapon_type, event.kind);
            self.route(cue, event.position, event.rotation);
        }
    }
}

/// System: route frame streams into `CueLibrary<K>` (Present set)
pub fn collect_cues<K: CueKind>(frame: Res<FrameEvents>, mut library: ResMut<CueLibrary<K>>) {
    library.collect(&frame);
}

fn build_library<K: CueKind>(config: &SimulationConfig) -> CueLibrary<K> {
    CueLibrary::from_links(K::links(config)).unwrap_or_else(|err| {
        crate::logger::log_error(&format!("❌ {} cues disabled: {}", K::TABLE, err));
        CueLibrary::default()
    })
}

/// Presentation Plugin: cue libraries + routing systems.
pub struct PresentationPlugin {
    pub schedule: InternedScheduleLabel,
}

impl Default for PresentationPlugin {
    fn default() -> Self {
        Self {
            schedule: FixedUpdate.intern(),
        }
    }
}

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        app.insert_resource(build_library::<Visual>(&config))
            .insert_resource(build_library::<Audio>(&config))
            .add_systems(
                self.schedule,
                (collect_cues::<Visual>, collect_cues::<Audio>).in_set(SimulationSet::Present),
            );
    }
}

pub fn default_visual_cues() -> Vec<CueLink> {
    let muzzle_flash = WeaponType::ALL
        .iter()
        .fold(CueLink::new("muzzle_flash", 64), |link, &weapon_type| {
            link.on_weapon(weapon_type, WeaponEventKind::Shoot)
        });

    let mut wall_impact = CueLink::new("wall_impact", 256);
    let mut creature_hit = CueLink::new("creature_hit", 256);
    for projectile_type in [
        ProjectileType::Bullet,
        ProjectileType::Pellet,
        ProjectileType::Spit,
        ProjectileType::Shockwave,
    ] {
        wall_impact = wall_impact.on_bullet(projectile_type, CollisionKind::Wall);
        creature_hit = creature_hit
            .on_bullet(projectile_type, CollisionKind::Enemy)
            .on_bullet(projectile_type, CollisionKind::Player);
    }

    vec![muzzle_flash, wall_impact, creature_hit]
}

pub fn default_audio_cues() -> Vec<CueLink> {
    let reload = WeaponType::ALL
        .iter()
        .fold(CueLink::new("reload", 16), |link, &weapon_type| {
            link.on_weapon(weapon_type, WeaponEventKind::Reload)
        });

    vec![
        CueLink::new("shot_light", 16)
            .on_weapon(WeaponType::Pistol, WeaponEventKind::Shoot)
            .on_weapon(WeaponType::Machinegun, WeaponEventKind::Shoot),
        CueLink::new("shot_heavy", 8).on_weapon(WeaponType::Shotgun, WeaponEventKind::Shoot),
        CueLink::new("shot_creature", 8)
            .on_weapon(WeaponType::PigWeapon, WeaponEventKind::Shoot)
            .on_weapon(WeaponType::GorillaWeapon, WeaponEventKind::Shoot),
        reload,
        CueLink::new("ricochet", 8)
            .on_bullet(ProjectileType::Bullet, CollisionKind::Wall)
            .on_bullet(ProjectileType::Pellet, CollisionKind::Wall),
        CueLink::new("splat", 8)
            .on_bullet(ProjectileType::Spit, CollisionKind::Wall)
            .on_bullet(ProjectileType::Spit, CollisionKind::Player)
            .on_bullet(ProjectileType::Spit, CollisionKind::Enemy),
    ]
}
