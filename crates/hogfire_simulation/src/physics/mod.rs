//! Physics query port
//!
//! Ядро физику не симулирует, только задаёт raycast-вопросы через `RaycastPort`.
//! Backends:
//! - `ColliderSnapshot`: AABB снимок мира на тик. Headless / тестовый порт
//!   (сборка по умолчанию), не физический движок.
//! - `RapierSight`: обёртка над `RapierContext` (feature "rapier"), production
//!   raycast по физическому миру игры. С этой feature снимок не собирается.

pub mod raycast;
pub mod snapshot;

#[cfg(feature = "rapier")]
pub mod rapier;

pub use raycast::{layers, NoObstacles, RayHit, RaycastFilter, RaycastPort, PROJECTILE_FILTER, SIGHT_FILTER};
pub use snapshot::{capture_collider_snapshot, ColliderSnapshot, SightCollider};

#[cfg(feature = "rapier")]
pub use rapier::RapierSight;
