use std::collections::HashSet;

use bevy::prelude::*;
use bevy_prototype_lyon::prelude::*;
use bevy_rapier2d::prelude::*;

use minerink_shared::team::Team;

use crate::constants::{team_color, MINE_RADIUS};

use super::core::GameSettings;
use super::orchestrator::MatchPhase;
use super::puck::Puck;
use super::units::{clamp_disk_positions, eliminate_disk, Disk, DiskDestroyed, Eliminated};
use super::FixedSet;

pub struct MinesPlugin;

/// A placed hazard. Inert until armed; only ever harms the opposing team.
#[derive(Component)]
pub(crate) struct Mine {
    pub(crate) team: Team,
    pub(crate) armed: bool,
}

/// Present once the mine has fired; it despawns when the delay runs out and
/// can never fire again.
#[derive(Component)]
pub(crate) struct MineSpent {
    pub(crate) seconds_left: f32,
}

impl Plugin for MinesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            mine_contacts
                .in_set(FixedSet::PostPhysics)
                .after(clamp_disk_positions)
                .run_if(in_state(MatchPhase::Live)),
        )
        .add_systems(FixedUpdate, tick_spent_mines.in_set(FixedSet::Spawn));
    }
}

/// Spawn a visible, unarmed mine at a placement point.
pub(crate) fn spawn_mine(commands: &mut Commands, team: Team, pos: Vec2) -> Entity {
    let color = team_color(team);

    commands
        .spawn((
            RigidBody::Fixed,
            Collider::ball(MINE_RADIUS),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            Transform::from_translation(pos.extend(1.0)),
            ShapeBuilder::with(&shapes::Circle {
                radius: MINE_RADIUS,
                center: Vec2::ZERO,
            })
            .fill(color.with_alpha(0.35))
            .stroke((color, 1.5))
            .build(),
            Visibility::default(),
            Mine { team, armed: false },
        ))
        .id()
}

/// Resolve mine contacts: friendly disks pass through, opposing disks get a
/// knockback impulse and are eliminated, and the mine consumes itself.
/// First contact wins; a second contact in the same tick finds the mine
/// already spent.
pub(crate) fn mine_contacts(
    mut commands: Commands,
    settings: Res<GameSettings>,
    mut collision_events: MessageReader<CollisionEvent>,
    q_mines: Query<(&Mine, &Transform), Without<MineSpent>>,
    mut q_disks: Query<
        (&Disk, &Transform, &mut ExternalImpulse, &ReadMassProperties),
        (Without<Eliminated>, Without<Puck>),
    >,
    mut q_puck: Query<
        (&Transform, &mut ExternalImpulse, &ReadMassProperties),
        (With<Puck>, Without<Disk>),
    >,
    mut destroyed: MessageWriter<DiskDestroyed>,
) {
    let mine_cfg = &settings.0.mines;
    let grace = settings.0.movement.despawn_grace;
    let mut spent: HashSet<Entity> = HashSet::new();
    let mut killed: HashSet<Entity> = HashSet::new();

    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        for (mine_entity, other) in [(*a, *b), (*b, *a)] {
            let Ok((mine, mine_transform)) = q_mines.get(mine_entity) else {
                continue;
            };
            if !mine.armed || spent.contains(&mine_entity) {
                continue;
            }

            if let Ok((disk, disk_transform, mut impulse, mass_props)) = q_disks.get_mut(other)
            {
                if killed.contains(&other) {
                    continue;
                }
                if disk.team == mine.team {
                    continue;
                }

                let dir = (disk_transform.translation - mine_transform.translation)
                    .truncate()
                    .normalize_or_zero();
                let mass = mass_props.mass.max(0.0001);
                impulse.impulse += dir * mine_cfg.knockback * mass;

                eliminate_disk(&mut commands, &mut destroyed, other, disk.team, grace);
                killed.insert(other);

                spend_mine(&mut commands, &mut spent, mine_entity, mine_cfg.destroy_delay);
            } else if mine_cfg.affect_puck {
                if let Ok((puck_transform, mut impulse, mass_props)) = q_puck.get_mut(other) {
                    let dir = (puck_transform.translation - mine_transform.translation)
                        .truncate()
                        .normalize_or_zero();
                    let mass = mass_props.mass.max(0.0001);
                    impulse.impulse += dir * mine_cfg.knockback * mass;

                    spend_mine(&mut commands, &mut spent, mine_entity, mine_cfg.destroy_delay);
                }
            }
        }
    }
}

fn spend_mine(
    commands: &mut Commands,
    spent: &mut HashSet<Entity>,
    mine: Entity,
    destroy_delay: f32,
) {
    spent.insert(mine);
    commands.entity(mine).insert(MineSpent {
        seconds_left: destroy_delay,
    });
}

fn tick_spent_mines(
    mut commands: Commands,
    time: Res<Time>,
    mut q_spent: Query<(Entity, &mut MineSpent)>,
) {
    let dt = time.delta_secs();
    for (entity, mut spent) in &mut q_spent {
        spent.seconds_left -= dt;
        if spent.seconds_left <= 0.0 {
            commands.entity(entity).despawn();
        }
    }
}
