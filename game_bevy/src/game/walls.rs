use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;

use minerink_shared::team::GoalSide;

use crate::constants::{color_from_hex, Colors, RINK_HALF_HEIGHT};
use crate::rink::geometry::{
    center_line, goal_pocket_segments, rink_wall_segments, Segment, WALL_COLLIDER_THICKNESS,
};

pub struct WallsPlugin;

impl Plugin for WallsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_walls);
    }
}

fn spawn_walls(mut commands: Commands) {
    let body = commands
        .spawn((
            RigidBody::Fixed,
            Transform::default(),
            GlobalTransform::default(),
        ))
        .id();

    for seg in rink_wall_segments() {
        spawn_segment_collider(&mut commands, body, seg);
    }
    for side in [GoalSide::Left, GoalSide::Right] {
        for seg in goal_pocket_segments(side) {
            spawn_segment_collider(&mut commands, body, seg);
        }
    }

    let wall_color = color_from_hex(Colors::WALL);
    for seg in rink_wall_segments() {
        spawn_line_visual(&mut commands, seg, wall_color, 3.0, 2.0);
    }
    for side in [GoalSide::Left, GoalSide::Right] {
        for seg in goal_pocket_segments(side) {
            spawn_line_visual(&mut commands, seg, wall_color, 3.0, 2.0);
        }
    }

    let line_color = color_from_hex(Colors::CENTER_LINE);
    spawn_line_visual(&mut commands, center_line(), line_color, 2.0, 1.5);
    commands.spawn((
        ShapeBuilder::with(&shapes::Circle {
            radius: RINK_HALF_HEIGHT * 0.3,
            center: Vec2::ZERO,
        })
        .stroke((line_color, 2.0))
        .build(),
        Transform::from_xyz(0.0, 0.0, 1.5),
    ));
}

fn spawn_segment_collider(commands: &mut Commands, parent: Entity, seg: Segment) {
    let mid = (seg.from + seg.to) * 0.5;
    let d = seg.to - seg.from;
    let len = d.length();
    let angle = d.y.atan2(d.x);

    let child = commands
        .spawn((
            Collider::cuboid(len * 0.5, WALL_COLLIDER_THICKNESS),
            Restitution::coefficient(0.7),
            Friction::coefficient(0.1),
            Transform::from_xyz(mid.x, mid.y, 0.0).with_rotation(Quat::from_rotation_z(angle)),
            GlobalTransform::default(),
        ))
        .id();
    commands.entity(parent).add_child(child);
}

fn spawn_line_visual(commands: &mut Commands, seg: Segment, color: Color, width: f32, z: f32) {
    let line = shapes::Line(seg.from, seg.to);

    commands.spawn((
        ShapeBuilder::with(&line).stroke((color, width)).build(),
        Transform::from_xyz(0.0, 0.0, z),
    ));
}
