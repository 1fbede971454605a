//! Tests for FSM AI components.

use bevy::prelude::*;

use super::fsm::{AttackRange, EnemyState, PathFollow, PathWaypoints};

#[test]
fn test_enemy_state_default() {
    assert_eq!(EnemyState::default(), EnemyState::Wander);
}

#[test]
fn test_path_follow_default_decides_now() {
    let follow = PathFollow::default();
    assert!(follow.wander_timer < 0.0);
    assert_eq!(follow.position_to_go, None);
}

#[test]
fn test_assign_path_rewinds_to_start() {
    let mut follow = PathFollow {
        path_index: 0,
        reached_target: true,
        ..default()
    };
    let mut waypoints = PathWaypoints::default();

    follow.assign_path(
        &mut waypoints,
        [IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0)],
    );

    assert_eq!(waypoints.len(), 3);
    assert_eq!(follow.path_index, 2);
    assert!(!follow.reached_target);
    assert_eq!(waypoints.index_of(IVec2::new(1, 0)), Some(1));
    assert_eq!(waypoints.index_of(IVec2::new(9, 9)), None);
}

#[test]
fn test_assign_empty_path() {
    let mut follow = PathFollow::default();
    let mut waypoints = PathWaypoints::from_positions([IVec2::ONE]);

    follow.assign_path(&mut waypoints, std::iter::empty());

    assert!(waypoints.is_empty());
    assert_eq!(follow.path_index, 0);
}

#[test]
fn test_attack_range_starts_out_of_range() {
    let range = AttackRange::new(5.0);
    assert_eq!(range.distance, 5.0);
    assert!(!range.in_range);
}
