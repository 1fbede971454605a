use bevy::prelude::*;

/// Player marker. Ровно один на мир: enemy AI преследует его.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Player;
