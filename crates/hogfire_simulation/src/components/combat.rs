//! Owner combat state (input для fire control)

use bevy::prelude::*;

/// Logical combat state of a weapon owner (player input or AI).
///
/// Fire control reads it from the owner, never writes it.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum CombatState {
    #[default]
    Idle,
    /// Trigger held: fire whenever the weapon is ready
    Attacking,
    /// Manual reload requested
    Reloading,
}
