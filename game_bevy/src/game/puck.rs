use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;

use crate::constants::{color_from_hex, Colors, PUCK_RADIUS, PUCK_RESTITUTION};
use crate::rink::geometry;

use super::core::GameSettings;
use super::orchestrator::MatchPhase;
use super::FixedSet;

pub struct PuckPlugin;

#[derive(Component)]
pub(crate) struct Puck;

/// Tracks how long the puck has been near-stationary, for the wall nudge.
#[derive(Component, Default)]
pub(crate) struct StillTimer {
    pub(crate) seconds: f32,
}

impl Plugin for PuckPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_puck).add_systems(
            FixedUpdate,
            (
                clamp_puck_speed,
                keep_alive.run_if(in_state(MatchPhase::Live)),
                unstuck_nudge.run_if(in_state(MatchPhase::Live)),
            )
                .chain()
                .in_set(FixedSet::Simulate),
        );
    }
}

fn spawn_puck(mut commands: Commands) {
    let spawn = geometry::puck_spawn();
    let color = color_from_hex(Colors::PUCK);

    commands.spawn((
        // Physics; the puck starts frozen, the orchestrator releases it.
        (
            RigidBody::Dynamic,
            Collider::ball(PUCK_RADIUS),
            Restitution::coefficient(PUCK_RESTITUTION),
            Friction::coefficient(0.1),
            ActiveEvents::COLLISION_EVENTS,
            Ccd::enabled(),
            Velocity::zero(),
            ExternalForce::default(),
            ExternalImpulse::default(),
            ReadMassProperties::default(),
            RigidBodyDisabled,
        ),
        // Transform (shared by physics + visual)
        Transform::from_translation(spawn.extend(4.0)),
        // Visual
        ShapeBuilder::with(&shapes::Circle {
            radius: PUCK_RADIUS,
            center: Vec2::ZERO,
        })
        .fill(color.with_alpha(0.9))
        .stroke((color, 2.0))
        .build(),
        // Game state
        Puck,
        StillTimer::default(),
    ));
}

/// Freeze the puck in place and park it on its spawn point.
pub(crate) fn freeze_puck(
    commands: &mut Commands,
    entity: Entity,
    transform: &mut Transform,
    vel: &mut Velocity,
) {
    vel.linvel = Vec2::ZERO;
    vel.angvel = 0.0;
    commands.entity(entity).insert(RigidBodyDisabled);
    let spawn = geometry::puck_spawn();
    transform.translation.x = spawn.x;
    transform.translation.y = spawn.y;
}

pub(crate) fn unfreeze_puck(commands: &mut Commands, entity: Entity) {
    commands.entity(entity).remove::<RigidBodyDisabled>();
}

fn clamp_puck_speed(
    settings: Res<GameSettings>,
    mut q_puck: Query<&mut Velocity, With<Puck>>,
) {
    let max = settings.0.puck.max_speed;
    for mut vel in &mut q_puck {
        if vel.linvel.length() > max {
            vel.linvel = vel.linvel.normalize() * max;
        }
    }
}

/// A slow puck makes for a dead rink; gently re-energize it along its
/// current heading, or along a time-derived direction when at rest.
fn keep_alive(
    settings: Res<GameSettings>,
    time: Res<Time>,
    mut q_puck: Query<(&Velocity, &mut ExternalForce, &ReadMassProperties), With<Puck>>,
) {
    let cfg = &settings.0.puck;
    for (vel, mut force, mass_props) in &mut q_puck {
        if vel.linvel.length() >= cfg.min_keep_alive_speed {
            force.force = Vec2::ZERO;
            continue;
        }

        let dir = if vel.linvel.length_squared() > 0.01 {
            vel.linvel.normalize()
        } else {
            let angle = time.elapsed_secs() * 7.3;
            Vec2::new(angle.cos(), angle.sin())
        };
        let mass = mass_props.mass.max(0.0001);
        force.force = dir * cfg.keep_alive_force * mass;
    }
}

/// A puck resting against the boards for long enough gets nudged back into
/// play.
fn unstuck_nudge(
    settings: Res<GameSettings>,
    time: Res<Time>,
    mut q_puck: Query<
        (
            &Transform,
            &Velocity,
            &mut StillTimer,
            &mut ExternalImpulse,
            &ReadMassProperties,
        ),
        With<Puck>,
    >,
) {
    let cfg = &settings.0.puck;
    let dt = time.delta_secs();

    for (transform, vel, mut still, mut impulse, mass_props) in &mut q_puck {
        if vel.linvel.length() < cfg.unstuck_min_speed {
            still.seconds += dt;
        } else {
            still.seconds = 0.0;
        }

        if still.seconds < cfg.unstuck_check_time {
            continue;
        }

        let pos = transform.translation.truncate();
        if let Some(push) = geometry::unstuck_push(pos, PUCK_RADIUS) {
            let mass = mass_props.mass.max(0.0001);
            impulse.impulse += push * cfg.unstuck_nudge * mass;
            still.seconds = 0.0;
        }
    }
}
