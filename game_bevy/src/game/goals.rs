use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

use minerink_shared::team::{GoalSide, Team};

use crate::rink::geometry::{goal_sensor_center, goal_sensor_half_extents};

use super::core::GameSettings;
use super::orchestrator::{GoalResetState, MatchPhase};
use super::puck::Puck;
use super::units::clamp_disk_positions;
use super::{FixedSet, UpdateSet};

pub struct GoalsPlugin;

/// Scoring sensor behind one goal mouth.
#[derive(Component)]
pub(crate) struct GoalTrigger {
    pub(crate) side: GoalSide,
}

/// Present while a fired trigger waits to re-enable itself. The delay is
/// longer than the orchestrator's reset window so the trigger cannot race
/// the unlock.
#[derive(Component)]
pub(crate) struct GoalCooldown {
    pub(crate) seconds_left: f32,
}

/// Scoring report to the orchestrator, already resolved to the crediting
/// team.
#[derive(Message)]
pub(crate) struct GoalScored {
    pub(crate) team: Team,
}

impl Plugin for GoalsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GoalScored>()
            .add_systems(Startup, spawn_goal_triggers)
            .add_systems(
                FixedUpdate,
                detect_goal_breaches
                    .in_set(FixedSet::PostPhysics)
                    .after(clamp_disk_positions)
                    .run_if(in_state(MatchPhase::Live)),
            )
            .add_systems(
                Update,
                tick_goal_cooldowns
                    .in_set(UpdateSet::Flow)
                    .run_if(in_state(MatchPhase::Live)),
            );
    }
}

fn spawn_goal_triggers(mut commands: Commands) {
    let half = goal_sensor_half_extents();
    for side in [GoalSide::Left, GoalSide::Right] {
        let center = goal_sensor_center(side);
        commands.spawn((
            RigidBody::Fixed,
            Collider::cuboid(half.x, half.y),
            Sensor,
            ActiveEvents::COLLISION_EVENTS,
            // Disabled until the orchestrator opens play.
            ColliderDisabled,
            Transform::from_xyz(center.x, center.y, 0.0),
            GlobalTransform::default(),
            GoalTrigger { side },
        ));
    }
}

/// Report puck entries. While the global goal lock is held the breach is
/// dropped entirely; otherwise the trigger disables itself before anything
/// else can fire it and names the scoring team.
pub(crate) fn detect_goal_breaches(
    mut commands: Commands,
    settings: Res<GameSettings>,
    reset: Res<GoalResetState>,
    mut collision_events: MessageReader<CollisionEvent>,
    q_goals: Query<&GoalTrigger, Without<GoalCooldown>>,
    q_puck: Query<(), With<Puck>>,
    mut scored: MessageWriter<GoalScored>,
) {
    if reset.locked {
        return;
    }

    let mut fired: HashSet<Entity> = HashSet::new();
    for event in collision_events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        for (goal_entity, other) in [(*a, *b), (*b, *a)] {
            let Ok(trigger) = q_goals.get(goal_entity) else {
                continue;
            };
            if q_puck.get(other).is_err() {
                continue;
            }
            if !fired.insert(goal_entity) {
                continue;
            }

            commands.entity(goal_entity).insert((
                ColliderDisabled,
                GoalCooldown {
                    seconds_left: settings.0.match_rules.goal_reenable_delay(),
                },
            ));

            let team = match trigger.side {
                GoalSide::Left => settings.0.goals.left_breach_scores,
                GoalSide::Right => settings.0.goals.right_breach_scores,
            };
            scored.write(GoalScored { team });
        }
    }
}

fn tick_goal_cooldowns(
    mut commands: Commands,
    time: Res<Time>,
    mut q_cooldowns: Query<(Entity, &mut GoalCooldown), With<GoalTrigger>>,
) {
    let dt = time.delta_secs();
    for (entity, mut cooldown) in &mut q_cooldowns {
        cooldown.seconds_left -= dt;
        if cooldown.seconds_left <= 0.0 {
            commands
                .entity(entity)
                .remove::<GoalCooldown>()
                .remove::<ColliderDisabled>();
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_rapier2d::rapier::geometry::CollisionEventFlags;

    use super::*;

    fn make_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(GameSettings(minerink_shared::config::GameConfig::default()));
        app.init_resource::<GoalResetState>();
        app.add_message::<CollisionEvent>();
        app.add_message::<GoalScored>();
        app.add_systems(Update, detect_goal_breaches);
        app
    }

    fn spawn_goal(app: &mut App, side: GoalSide) -> Entity {
        app.world_mut().spawn(GoalTrigger { side }).id()
    }

    fn spawn_puck(app: &mut App) -> Entity {
        app.world_mut().spawn(Puck).id()
    }

    fn drain_scored(app: &mut App) -> Vec<Team> {
        app.world_mut()
            .resource_mut::<Messages<GoalScored>>()
            .drain()
            .map(|g| g.team)
            .collect()
    }

    #[test]
    fn left_breach_credits_the_configured_team() {
        let mut app = make_test_app();
        let goal = spawn_goal(&mut app, GoalSide::Left);
        let puck = spawn_puck(&mut app);

        app.world_mut()
            .write_message(CollisionEvent::Started(puck, goal, CollisionEventFlags::SENSOR));
        app.update();

        assert_eq!(drain_scored(&mut app), vec![Team::Red]);
        // The trigger disabled itself and started its cooldown.
        assert!(app.world().get::<ColliderDisabled>(goal).is_some());
        assert!(app.world().get::<GoalCooldown>(goal).is_some());
    }

    #[test]
    fn right_breach_credits_the_other_team() {
        let mut app = make_test_app();
        let goal = spawn_goal(&mut app, GoalSide::Right);
        let puck = spawn_puck(&mut app);

        app.world_mut()
            .write_message(CollisionEvent::Started(goal, puck, CollisionEventFlags::SENSOR));
        app.update();

        assert_eq!(drain_scored(&mut app), vec![Team::Blue]);
    }

    #[test]
    fn breach_while_locked_is_dropped_entirely() {
        let mut app = make_test_app();
        app.world_mut().resource_mut::<GoalResetState>().locked = true;
        let goal = spawn_goal(&mut app, GoalSide::Left);
        let puck = spawn_puck(&mut app);

        app.world_mut()
            .write_message(CollisionEvent::Started(puck, goal, CollisionEventFlags::SENSOR));
        app.update();

        assert!(drain_scored(&mut app).is_empty());
        assert!(app.world().get::<GoalCooldown>(goal).is_none());
    }

    #[test]
    fn double_contact_fires_a_single_report() {
        let mut app = make_test_app();
        let goal = spawn_goal(&mut app, GoalSide::Left);
        let puck = spawn_puck(&mut app);

        app.world_mut()
            .write_message(CollisionEvent::Started(puck, goal, CollisionEventFlags::SENSOR));
        app.world_mut()
            .write_message(CollisionEvent::Started(goal, puck, CollisionEventFlags::SENSOR));
        app.update();

        assert_eq!(drain_scored(&mut app).len(), 1);
    }

    #[test]
    fn cooling_trigger_ignores_further_breaches() {
        let mut app = make_test_app();
        let goal = spawn_goal(&mut app, GoalSide::Left);
        app.world_mut()
            .entity_mut(goal)
            .insert(GoalCooldown { seconds_left: 0.5 });
        let puck = spawn_puck(&mut app);

        app.world_mut()
            .write_message(CollisionEvent::Started(puck, goal, CollisionEventFlags::SENSOR));
        app.update();

        assert!(drain_scored(&mut app).is_empty());
    }

    #[test]
    fn expired_cooldown_reenables_the_trigger() {
        let mut app = make_test_app();
        app.add_systems(Update, tick_goal_cooldowns);
        let goal = spawn_goal(&mut app, GoalSide::Right);
        app.world_mut()
            .entity_mut(goal)
            .insert((ColliderDisabled, GoalCooldown { seconds_left: 0.0 }));

        app.update();

        assert!(app.world().get::<GoalCooldown>(goal).is_none());
        assert!(app.world().get::<ColliderDisabled>(goal).is_none());
    }

    #[test]
    fn non_puck_bodies_do_not_score() {
        let mut app = make_test_app();
        let goal = spawn_goal(&mut app, GoalSide::Left);
        let intruder = app.world_mut().spawn_empty().id();

        app.world_mut()
            .write_message(CollisionEvent::Started(intruder, goal, CollisionEventFlags::SENSOR));
        app.update();

        assert!(drain_scored(&mut app).is_empty());
    }
}
