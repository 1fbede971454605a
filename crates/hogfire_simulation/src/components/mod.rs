//! ECS Components shared между доменами
//!
//! - player: player marker (цель для enemy AI)
//! - combat: логическое боевое состояние владельца оружия

pub mod combat;
pub mod player;

pub use combat::*;
pub use player::*;
