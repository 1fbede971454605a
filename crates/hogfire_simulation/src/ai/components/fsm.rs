//! Enemy behavior FSM components
//!
//! Wander → Chase → Attack, переходы по distance + line of sight.
//! Path заполняет внешний planner, ядро только читает его.

use bevy::prelude::*;

/// Enemy FSM state. Обновляется раз в тик behavior sweep'ом.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
#[require(PathFollow, PathWaypoints, AttackRange, Transform)]
pub enum EnemyState {
    /// Игрок не обнаружен: случайные точки вокруг
    #[default]
    Wander,
    /// Игрок виден, но далеко: идём по path
    Chase,
    /// Игрок виден и близко: подходим на attack range
    Attack,
}

/// Path node (grid coordinates, xz plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct PathWaypoint {
    pub position: IVec2,
}

/// Path toward the player.
///
/// `0`: конец пути (около игрока), агент стартует с `len - 1`
/// и идёт к меньшим индексам.
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PathWaypoints(pub Vec<PathWaypoint>);

impl PathWaypoints {
    pub fn from_positions(positions: impl IntoIterator<Item = IVec2>) -> Self {
        Self(
            positions
                .into_iter()
                .map(|position| PathWaypoint { position })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<IVec2> {
        self.0.get(index).map(|waypoint| waypoint.position)
    }

    /// Index of the waypoint at `position`, if it lies on the path.
    pub fn index_of(&self, position: IVec2) -> Option<usize> {
        self.0.iter().position(|waypoint| waypoint.position == position)
    }
}

/// Per-agent movement intent + path cursor.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PathFollow {
    /// Cursor into `PathWaypoints` (всегда `< len`, если path не пуст)
    pub path_index: usize,
    /// Next target on the ground grid, `None` = стоим
    pub position_to_go: Option<IVec2>,
    /// Seconds until the next wander decision (< 0 = решить сейчас)
    pub wander_timer: f32,
    pub reached_target: bool,
}

impl Default for PathFollow {
    fn default() -> Self {
        Self {
            path_index: 0,
            position_to_go: None,
            wander_timer: -1.0,
            reached_target: false,
        }
    }
}

impl PathFollow {
    /// Install a fresh path from the planner and rewind the cursor to its start.
    pub fn assign_path(&mut self, waypoints: &mut PathWaypoints, path: impl IntoIterator<Item = IVec2>) {
        *waypoints = PathWaypoints::from_positions(path);
        self.path_index = waypoints.len().saturating_sub(1);
        self.reached_target = false;
    }
}

/// Attack distance + "стоим и стреляем" флаг.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackRange {
    pub distance: f32,
    /// Recomputed every tick (false unless Attack and within `distance`)
    pub in_range: bool,
}

impl Default for AttackRange {
    fn default() -> Self {
        Self {
            distance: 8.0,
            in_range: false,
        }
    }
}

impl AttackRange {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            in_range: false,
        }
    }
}
