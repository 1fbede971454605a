//! Tests for enemy movement.

use approx::assert_relative_eq;
use bevy::prelude::*;

use crate::ai::{AttackRange, PathFollow, PathWaypoints};

use super::movement::step_movement;

#[test]
fn test_walks_toward_target() {
    let mut transform = Transform::default();
    let mut follow = PathFollow {
        position_to_go: Some(IVec2::new(10, 0)),
        ..default()
    };

    step_movement(&mut transform, &mut follow, &AttackRange::default(), &PathWaypoints::default(), 4.0, 0.1, 0.5);

    assert_relative_eq!(transform.translation.x, 2.0, epsilon = 1e-5);
    assert!(!follow.reached_target);
}

#[test]
fn test_arrival_snaps_path_index() {
    let path = PathWaypoints::from_positions([IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0)]);
    let mut transform = Transform::from_xyz(1.05, 0.0, 0.0);
    let mut follow = PathFollow {
        path_index: 2,
        position_to_go: Some(IVec2::new(1, 0)),
        ..default()
    };

    step_movement(&mut transform, &mut follow, &AttackRange::default(), &path, 4.0, 0.1, 0.016);

    assert!(follow.reached_target);
    assert_eq!(follow.path_index, 1);
    assert_eq!(transform.translation, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_in_range_holds_position() {
    let mut transform = Transform::default();
    let mut follow = PathFollow {
        position_to_go: Some(IVec2::new(10, 0)),
        ..default()
    };
    let range = AttackRange {
        distance: 20.0,
        in_range: true,
    };

    step_movement(&mut transform, &mut follow, &range, &PathWaypoints::default(), 4.0, 0.1, 0.5);
    assert_eq!(transform.translation, Vec3::ZERO);
}

#[test]
fn test_no_target_no_movement() {
    let mut transform = Transform::from_xyz(3.0, 0.0, 3.0);
    let mut follow = PathFollow::default();

    step_movement(&mut transform, &mut follow, &AttackRange::default(), &PathWaypoints::default(), 4.0, 0.1, 0.5);
    assert_eq!(transform.translation, Vec3::new(3.0, 0.0, 3.0));
}
