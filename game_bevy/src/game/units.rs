use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;

use minerink_shared::team::Team;

use crate::constants::{color_from_hex, team_color, Colors, DISK_RADIUS, DISK_RESTITUTION};
use crate::rink::geometry;

use super::core::GameSettings;
use super::orchestrator::MatchPhase;
use super::puck::Puck;
use super::teams::route_team_input;
use super::{FixedSet, UpdateSet};

pub struct UnitsPlugin;

/// A player-controlled disk, bound to one roster slot for its lifetime.
#[derive(Component)]
pub(crate) struct Disk {
    pub(crate) team: Team,
    pub(crate) slot: usize,
}

/// Per-tick movement intent. `dir` is forced to zero whenever the disk is
/// not its team's active one.
#[derive(Component, Default)]
pub(crate) struct DiskMotion {
    pub(crate) dir: Vec2,
    pub(crate) active: bool,
}

/// Present from elimination until despawn; the grace delay lets the
/// knockback impulse play out before the body disappears.
#[derive(Component)]
pub(crate) struct Eliminated {
    pub(crate) seconds_left: f32,
}

#[derive(Component)]
struct ActiveRing;

/// Emitted exactly once per disk, on elimination.
#[derive(Message)]
pub(crate) struct DiskDestroyed {
    pub(crate) disk: Entity,
    pub(crate) team: Team,
}

impl Plugin for UnitsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<DiskDestroyed>()
            .add_systems(
                FixedUpdate,
                steer_disks
                    .in_set(FixedSet::Simulate)
                    .after(route_team_input)
                    .run_if(in_state(MatchPhase::Live)),
            )
            .add_systems(
                FixedUpdate,
                (clamp_disk_positions, puck_hit_boost)
                    .chain()
                    .in_set(FixedSet::PostPhysics),
            )
            .add_systems(FixedUpdate, tick_eliminated.in_set(FixedSet::Spawn))
            .add_systems(Update, update_active_rings.in_set(UpdateSet::Visuals));
    }
}

pub(crate) fn spawn_disk(
    commands: &mut Commands,
    team: Team,
    slot: usize,
    pos: Vec2,
    active: bool,
) -> Entity {
    let color = team_color(team);

    let disk = commands
        .spawn((
            // Physics
            RigidBody::Dynamic,
            Collider::ball(DISK_RADIUS),
            Restitution::coefficient(DISK_RESTITUTION),
            Friction::coefficient(0.3),
            ActiveEvents::COLLISION_EVENTS,
            Ccd::enabled(),
            Velocity::zero(),
            ExternalForce::default(),
            ExternalImpulse::default(),
            ReadMassProperties::default(),
            // Transform (shared by physics + visual)
            Transform::from_translation(pos.extend(4.0)),
            // Visual
            ShapeBuilder::with(&shapes::Circle {
                radius: DISK_RADIUS,
                center: Vec2::ZERO,
            })
            .fill(color.with_alpha(0.25))
            .stroke((color, 2.0))
            .build(),
            // Game state
            Disk { team, slot },
            DiskMotion {
                dir: Vec2::ZERO,
                active,
            },
        ))
        .id();

    let ring = commands
        .spawn((
            ShapeBuilder::with(&shapes::Circle {
                radius: DISK_RADIUS + 5.0,
                center: Vec2::ZERO,
            })
            .stroke((color_from_hex(Colors::ACTIVE_RING), 2.0))
            .build(),
            Transform::from_xyz(0.0, 0.0, 0.1),
            Visibility::Hidden,
            ActiveRing,
        ))
        .id();
    commands.entity(disk).add_child(ring);

    disk
}

/// Zero both linear and angular velocity. A halted disk stops dead, it does
/// not coast.
pub(crate) fn halt(vel: &mut Velocity) {
    vel.linvel = Vec2::ZERO;
    vel.angvel = 0.0;
}

/// Disable the disk and notify its team, once. Callers are responsible for
/// not invoking this on an already-`Eliminated` disk.
pub(crate) fn eliminate_disk(
    commands: &mut Commands,
    destroyed: &mut MessageWriter<DiskDestroyed>,
    disk: Entity,
    team: Team,
    grace: f32,
) {
    commands.entity(disk).insert((
        Eliminated {
            seconds_left: grace,
        },
        ColliderDisabled,
        Visibility::Hidden,
    ));
    destroyed.write(DiskDestroyed { disk, team });
}

fn steer_disks(
    settings: Res<GameSettings>,
    mut q_disks: Query<
        (
            &DiskMotion,
            &mut ExternalForce,
            &mut Velocity,
            &ReadMassProperties,
        ),
        (With<Disk>, Without<Eliminated>),
    >,
) {
    let cfg = &settings.0.movement;
    for (motion, mut force, mut vel, mass_props) in &mut q_disks {
        if motion.active {
            let mass = mass_props.mass.max(0.0001);
            force.force = motion.dir * cfg.move_force * mass;
            if vel.linvel.length() > cfg.max_speed {
                vel.linvel = vel.linvel.normalize() * cfg.max_speed;
            }
        } else {
            force.force = Vec2::ZERO;
        }
    }
}

/// Keep each disk inside its own half, independent of collision response.
pub(crate) fn clamp_disk_positions(
    settings: Res<GameSettings>,
    mut q_disks: Query<(&Disk, &mut Transform), Without<Eliminated>>,
) {
    if !settings.0.movement.clamp_to_half {
        return;
    }
    for (disk, mut transform) in &mut q_disks {
        let bounds = geometry::disk_bounds(disk.team);
        let clamped = bounds.clamp(transform.translation.truncate());
        transform.translation.x = clamped.x;
        transform.translation.y = clamped.y;
    }
}

/// Hit feel: the active disk feeds the puck an extra impulse on contact,
/// beyond the plain rigid-body transfer.
fn puck_hit_boost(
    settings: Res<GameSettings>,
    mut collision_events: MessageReader<CollisionEvent>,
    q_disks: Query<(&DiskMotion, &Transform, &Velocity), (With<Disk>, Without<Eliminated>)>,
    mut q_puck: Query<
        (&Transform, &mut ExternalImpulse, &ReadMassProperties),
        (With<Puck>, Without<Disk>),
    >,
) {
    let cfg = &settings.0.movement;
    if cfg.hit_boost <= 0.0 {
        return;
    }

    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        for (disk_entity, puck_entity) in [(*a, *b), (*b, *a)] {
            let Ok((motion, disk_transform, disk_vel)) = q_disks.get(disk_entity) else {
                continue;
            };
            if !motion.active {
                continue;
            }
            let Ok((puck_transform, mut impulse, mass_props)) = q_puck.get_mut(puck_entity)
            else {
                continue;
            };

            let to_puck =
                (puck_transform.translation - disk_transform.translation).truncate();
            let Some(dir) = to_puck.try_normalize() else {
                continue;
            };
            let speed = disk_vel.linvel.length().min(cfg.max_speed);
            let mass = mass_props.mass.max(0.0001);
            impulse.impulse += dir * speed * cfg.hit_boost * mass;
        }
    }
}

fn tick_eliminated(
    mut commands: Commands,
    time: Res<Time>,
    mut q_eliminated: Query<(Entity, &mut Eliminated)>,
) {
    let dt = time.delta_secs();
    for (entity, mut eliminated) in &mut q_eliminated {
        eliminated.seconds_left -= dt;
        if eliminated.seconds_left <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}

fn update_active_rings(
    q_disks: Query<&DiskMotion, With<Disk>>,
    mut q_rings: Query<(&ChildOf, &mut Visibility), With<ActiveRing>>,
) {
    for (child_of, mut visibility) in &mut q_rings {
        let Ok(motion) = q_disks.get(child_of.parent()) else {
            continue;
        };
        *visibility = if motion.active {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}
