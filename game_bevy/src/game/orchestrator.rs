use bevy::prelude::*;
use bevy_rapier2d::prelude::{ColliderDisabled, Velocity};

use minerink_shared::team::Team;

use crate::rink::geometry;
use crate::rink::match_flow::{compute_result, result_text, Clock, MatchResult, Scoreboard};

use super::core::GameSettings;
use super::goals::{GoalCooldown, GoalScored, GoalTrigger};
use super::mines::Mine;
use super::placement::PlacementController;
use super::puck::{freeze_puck, unfreeze_puck, Puck};
use super::teams::{RosterState, Rosters, TeamWiped};
use super::units::{halt, spawn_disk, Disk, Eliminated};
use super::UpdateSet;

pub struct MatchPlugin;

/// Match phase. GoalReset is a sub-phase of Live, expressed by the goal
/// lock in [`GoalResetState`] rather than a state of its own: the clock
/// keeps counting through it.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) enum MatchPhase {
    #[default]
    PreGame,
    Placing(Team),
    Live,
    Ended,
}

/// External begin signal (menu action).
#[derive(Message)]
pub(crate) struct BeginMatch;

/// Notification for anything that wants to react to the final whistle.
#[derive(Message)]
pub(crate) struct MatchEnded {
    #[allow(dead_code)]
    pub(crate) result: MatchResult,
}

#[derive(Resource, Default)]
pub(crate) struct MatchScore(pub(crate) Scoreboard);

#[derive(Resource)]
pub(crate) struct MatchClock(pub(crate) Clock);

/// The goal lock plus the remaining reset delay. While `locked` no goal can
/// be processed anywhere, so at most one goal resolves at a time.
#[derive(Resource, Default)]
pub(crate) struct GoalResetState {
    pub(crate) locked: bool,
    pub(crate) seconds_left: f32,
}

/// Winner forced by a team wipe, overriding the scoreboard.
#[derive(Resource, Default)]
pub(crate) struct ForcedWinner(pub(crate) Option<Team>);

/// Final result, set once on entering Ended; the HUD result panel reads it.
#[derive(Resource, Default)]
pub(crate) struct MatchOutcome(pub(crate) Option<MatchResult>);

/// Every armed hazard on the rink, accumulated from the placement batches.
#[derive(Resource, Default)]
pub(crate) struct HazardSet(pub(crate) Vec<Entity>);

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<MatchPhase>()
            .add_message::<BeginMatch>()
            .add_message::<MatchEnded>()
            .init_resource::<MatchScore>()
            .insert_resource(MatchClock(Clock::new(0.0)))
            .init_resource::<GoalResetState>()
            .init_resource::<ForcedWinner>()
            .init_resource::<MatchOutcome>()
            .init_resource::<HazardSet>()
            .add_systems(OnEnter(MatchPhase::PreGame), enter_pregame)
            .add_systems(OnEnter(MatchPhase::Placing(Team::Blue)), enter_placing)
            .add_systems(OnEnter(MatchPhase::Placing(Team::Red)), enter_placing)
            .add_systems(OnEnter(MatchPhase::Live), enter_live)
            .add_systems(OnEnter(MatchPhase::Ended), enter_ended)
            .add_systems(
                Update,
                (
                    begin_match.run_if(in_state(MatchPhase::PreGame)),
                    advance_placement.run_if(placement_running),
                    tick_clock.run_if(in_state(MatchPhase::Live)),
                    handle_goal_reports.run_if(in_state(MatchPhase::Live)),
                    tick_goal_reset.run_if(in_state(MatchPhase::Live)),
                    handle_team_wiped.run_if(in_state(MatchPhase::Live)),
                )
                    .chain()
                    .in_set(UpdateSet::Flow),
            );
    }
}

pub(crate) fn placement_running(phase: Res<State<MatchPhase>>) -> bool {
    matches!(phase.get(), MatchPhase::Placing(_))
}

/// Clean slate: frozen centered puck, disabled goals, fresh rosters, no
/// hazards, zeroed score.
fn enter_pregame(
    mut commands: Commands,
    settings: Res<GameSettings>,
    mut score: ResMut<MatchScore>,
    mut clock: ResMut<MatchClock>,
    mut reset: ResMut<GoalResetState>,
    mut forced: ResMut<ForcedWinner>,
    mut outcome: ResMut<MatchOutcome>,
    mut hazards: ResMut<HazardSet>,
    mut rosters: ResMut<Rosters>,
    mut q_puck: Query<(Entity, &mut Transform, &mut Velocity), With<Puck>>,
    q_goals: Query<Entity, With<GoalTrigger>>,
    q_disks: Query<Entity, With<Disk>>,
    q_mines: Query<Entity, With<Mine>>,
) {
    score.0 = Scoreboard::default();
    clock.0 = Clock::new(settings.0.match_rules.match_duration);
    *reset = GoalResetState::default();
    forced.0 = None;
    outcome.0 = None;

    if let Ok((entity, mut transform, mut vel)) = q_puck.single_mut() {
        freeze_puck(&mut commands, entity, &mut transform, &mut vel);
    }
    for goal in &q_goals {
        commands
            .entity(goal)
            .insert(ColliderDisabled)
            .remove::<GoalCooldown>();
    }
    for mine in &q_mines {
        commands.entity(mine).despawn();
    }
    hazards.0.clear();

    respawn_full_rosters(&mut commands, &settings, &mut rosters, &q_disks);
}

/// Despawn whatever disks remain and rebuild both rosters at their spawn
/// slots, everyone alive again.
fn respawn_full_rosters(
    commands: &mut Commands,
    settings: &GameSettings,
    rosters: &mut Rosters,
    q_disks: &Query<Entity, With<Disk>>,
) {
    for disk in q_disks {
        commands.entity(disk).despawn();
    }
    for team in [Team::Blue, Team::Red] {
        let slots = geometry::spawn_slots(team, settings.0.match_rules.disks_per_team);
        let disks = slots
            .iter()
            .enumerate()
            .map(|(slot, pos)| spawn_disk(commands, team, slot, *pos, slot == 0))
            .collect();
        *rosters.get_mut(team) = RosterState::new(disks);
    }
}

fn begin_match(
    mut begin: MessageReader<BeginMatch>,
    settings: Res<GameSettings>,
    mut next: ResMut<NextState<MatchPhase>>,
) {
    if begin.read().next().is_none() {
        return;
    }
    info!(
        "match starting, {} mines per team",
        settings.0.match_rules.mines_per_team
    );
    next.set(MatchPhase::Placing(Team::Blue));
}

fn enter_placing(
    phase: Res<State<MatchPhase>>,
    settings: Res<GameSettings>,
    mut controller: ResMut<PlacementController>,
) {
    let MatchPhase::Placing(team) = *phase.get() else {
        return;
    };
    let quota = settings.0.match_rules.mines_per_team;
    controller.begin(team, quota);
    info!("{} placing {} mines", team.name(), quota);
}

/// The orchestrator's suspension point: placement runs on its own until the
/// controller reports finished, then the batch moves into the global hazard
/// set and the next turn (or live play) starts. Strictly sequential, Blue
/// before Red.
pub(crate) fn advance_placement(
    phase: Res<State<MatchPhase>>,
    mut controller: ResMut<PlacementController>,
    mut hazards: ResMut<HazardSet>,
    mut next: ResMut<NextState<MatchPhase>>,
) {
    let MatchPhase::Placing(team) = *phase.get() else {
        return;
    };
    if !controller.is_finished() {
        return;
    }

    hazards.0.append(&mut controller.drain_batch());
    match team {
        Team::Blue => next.set(MatchPhase::Placing(Team::Red)),
        Team::Red => next.set(MatchPhase::Live),
    }
}

/// Arm every placed hazard (concealing them once more for good measure),
/// open the goals, release the puck and start the clock.
fn enter_live(
    mut commands: Commands,
    settings: Res<GameSettings>,
    mut clock: ResMut<MatchClock>,
    mut q_mines: Query<(Entity, &mut Mine)>,
    q_goals: Query<Entity, With<GoalTrigger>>,
    q_puck: Query<Entity, With<Puck>>,
) {
    for (entity, mut mine) in &mut q_mines {
        mine.armed = true;
        commands.entity(entity).insert(Visibility::Hidden);
    }
    for goal in &q_goals {
        commands
            .entity(goal)
            .remove::<ColliderDisabled>()
            .remove::<GoalCooldown>();
    }
    if let Ok(entity) = q_puck.single() {
        unfreeze_puck(&mut commands, entity);
    }
    clock.0 = Clock::new(settings.0.match_rules.match_duration);
    info!("match live");
}

fn tick_clock(
    time: Res<Time>,
    mut clock: ResMut<MatchClock>,
    mut next: ResMut<NextState<MatchPhase>>,
) {
    if clock.0.tick(time.delta_secs()) {
        next.set(MatchPhase::Ended);
    }
}

/// Start the goal-reset sub-phase for the first unlocked report: take the
/// lock, score, shut the goals, park the puck and send every surviving disk
/// home. Reports that arrive while locked change nothing.
fn handle_goal_reports(
    mut commands: Commands,
    settings: Res<GameSettings>,
    mut scored: MessageReader<GoalScored>,
    mut score: ResMut<MatchScore>,
    mut reset: ResMut<GoalResetState>,
    q_goals: Query<Entity, With<GoalTrigger>>,
    mut q_puck: Query<(Entity, &mut Transform, &mut Velocity), With<Puck>>,
    mut q_disks: Query<
        (&Disk, &mut Transform, &mut Velocity),
        (Without<Eliminated>, Without<Puck>),
    >,
) {
    for report in scored.read() {
        if reset.locked {
            continue;
        }
        reset.locked = true;
        reset.seconds_left = settings.0.match_rules.post_goal_delay;

        score.0.add(report.team);
        info!(
            "GOAL! Blue {} : Red {} ({} scored)",
            score.0.blue,
            score.0.red,
            report.team.name()
        );

        for goal in &q_goals {
            commands.entity(goal).insert(ColliderDisabled);
        }
        if let Ok((entity, mut transform, mut vel)) = q_puck.single_mut() {
            freeze_puck(&mut commands, entity, &mut transform, &mut vel);
        }
        respawn_alive_disks(&settings, &mut q_disks);
    }
}

/// Send every surviving disk back to its spawn slot. Eliminated disks stay
/// eliminated; a missing slot skips that one disk only.
fn respawn_alive_disks(
    settings: &GameSettings,
    q_disks: &mut Query<
        (&Disk, &mut Transform, &mut Velocity),
        (Without<Eliminated>, Without<Puck>),
    >,
) {
    let count = settings.0.match_rules.disks_per_team;
    for (disk, mut transform, mut vel) in q_disks {
        let slots = geometry::spawn_slots(disk.team, count);
        let Some(slot) = slots.get(disk.slot) else {
            continue;
        };
        halt(&mut vel);
        transform.translation.x = slot.x;
        transform.translation.y = slot.y;
    }
}

/// End of the goal-reset sub-phase: release the puck and the goals, then
/// the lock.
fn tick_goal_reset(
    mut commands: Commands,
    time: Res<Time>,
    mut reset: ResMut<GoalResetState>,
    q_goals: Query<Entity, With<GoalTrigger>>,
    q_puck: Query<Entity, With<Puck>>,
) {
    if !reset.locked {
        return;
    }
    reset.seconds_left -= time.delta_secs();
    if reset.seconds_left > 0.0 {
        return;
    }

    if let Ok(entity) = q_puck.single() {
        unfreeze_puck(&mut commands, entity);
    }
    for goal in &q_goals {
        commands
            .entity(goal)
            .remove::<ColliderDisabled>()
            .remove::<GoalCooldown>();
    }
    reset.locked = false;
}

/// A wiped team loses on the spot; the survivors win regardless of score.
fn handle_team_wiped(
    mut wiped: MessageReader<TeamWiped>,
    mut forced: ResMut<ForcedWinner>,
    mut next: ResMut<NextState<MatchPhase>>,
) {
    for report in wiped.read() {
        if forced.0.is_some() {
            continue;
        }
        forced.0 = Some(report.team.opponent());
        info!("{} has no disks left", report.team.name());
        next.set(MatchPhase::Ended);
    }
}

/// Final whistle: shut everything down, revive both teams for the final
/// tableau, resolve and surface the result.
fn enter_ended(
    mut commands: Commands,
    settings: Res<GameSettings>,
    score: Res<MatchScore>,
    mut forced: ResMut<ForcedWinner>,
    mut outcome: ResMut<MatchOutcome>,
    mut reset: ResMut<GoalResetState>,
    mut rosters: ResMut<Rosters>,
    mut q_puck: Query<(Entity, &mut Transform, &mut Velocity), With<Puck>>,
    q_goals: Query<Entity, With<GoalTrigger>>,
    q_disks: Query<Entity, With<Disk>>,
    mut ended: MessageWriter<MatchEnded>,
) {
    for goal in &q_goals {
        commands
            .entity(goal)
            .insert(ColliderDisabled)
            .remove::<GoalCooldown>();
    }
    if let Ok((entity, mut transform, mut vel)) = q_puck.single_mut() {
        freeze_puck(&mut commands, entity, &mut transform, &mut vel);
    }
    *reset = GoalResetState::default();

    respawn_full_rosters(&mut commands, &settings, &mut rosters, &q_disks);

    let result = match forced.0.take() {
        Some(team) => MatchResult::Winner(team),
        None => compute_result(score.0),
    };
    outcome.0 = Some(result);
    ended.write(MatchEnded { result });
    info!("MATCH OVER: {}", result_text(result));
}

#[cfg(test)]
mod tests {
    use bevy::state::app::StatesPlugin;

    use super::*;
    use crate::game::units::DiskDestroyed;

    fn make_test_app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin));
        app.init_state::<MatchPhase>();
        app.insert_resource(GameSettings(minerink_shared::config::GameConfig::default()));
        app.init_resource::<MatchScore>();
        app.insert_resource(MatchClock(Clock::new(0.0)));
        app.init_resource::<GoalResetState>();
        app.init_resource::<ForcedWinner>();
        app.init_resource::<MatchOutcome>();
        app.init_resource::<HazardSet>();
        app.init_resource::<Rosters>();
        app.init_resource::<PlacementController>();
        app.add_message::<BeginMatch>();
        app.add_message::<MatchEnded>();
        app.add_message::<GoalScored>();
        app.add_message::<TeamWiped>();
        app.add_message::<DiskDestroyed>();
        app
    }

    fn phase(app: &App) -> MatchPhase {
        *app.world().resource::<State<MatchPhase>>().get()
    }

    fn set_phase(app: &mut App, phase: MatchPhase) {
        app.world_mut()
            .resource_mut::<NextState<MatchPhase>>()
            .set(phase);
        app.update();
    }

    #[test]
    fn begin_signal_starts_blue_placement() {
        let mut app = make_test_app();
        app.add_systems(Update, begin_match.run_if(in_state(MatchPhase::PreGame)));

        assert_eq!(phase(&app), MatchPhase::PreGame);
        app.world_mut().write_message(BeginMatch);
        app.update();
        app.update();

        assert_eq!(phase(&app), MatchPhase::Placing(Team::Blue));
    }

    #[test]
    fn placement_runs_blue_then_red_then_live() {
        let mut app = make_test_app();
        app.add_systems(OnEnter(MatchPhase::Placing(Team::Blue)), enter_placing);
        app.add_systems(OnEnter(MatchPhase::Placing(Team::Red)), enter_placing);
        app.add_systems(Update, advance_placement.run_if(placement_running));

        set_phase(&mut app, MatchPhase::Placing(Team::Blue));
        // Turn just began: not finished, so the phase holds.
        app.update();
        assert_eq!(phase(&app), MatchPhase::Placing(Team::Blue));

        // Blue exhausts its quota.
        let quota = app
            .world()
            .resource::<GameSettings>()
            .0
            .match_rules
            .mines_per_team;
        let dummies: Vec<Entity> = (0..quota)
            .map(|i| {
                let entity = app.world_mut().spawn_empty().id();
                let mut controller = app.world_mut().resource_mut::<PlacementController>();
                controller.register(entity);
                let point = Vec2::new(-50.0 - i as f32, 0.0);
                assert!(matches!(
                    controller.try_place(point),
                    crate::rink::placement::PlacementOutcome::Accepted { .. }
                ));
                entity
            })
            .collect();

        app.update();
        app.update();
        assert_eq!(phase(&app), MatchPhase::Placing(Team::Red));
        // Blue's batch moved into the global hazard set, exactly once.
        assert_eq!(app.world().resource::<HazardSet>().0, dummies);

        // Red exhausts its quota.
        for i in 0..quota {
            let entity = app.world_mut().spawn_empty().id();
            let mut controller = app.world_mut().resource_mut::<PlacementController>();
            controller.register(entity);
            let point = Vec2::new(50.0 + i as f32, 0.0);
            assert!(matches!(
                controller.try_place(point),
                crate::rink::placement::PlacementOutcome::Accepted { .. }
            ));
        }

        app.update();
        app.update();
        assert_eq!(phase(&app), MatchPhase::Live);
        assert_eq!(app.world().resource::<HazardSet>().0.len(), 2 * quota as usize);
    }

    #[test]
    fn first_goal_takes_the_lock_and_scores_once() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_goal_reports);

        // Two triggers fire in the same instant.
        app.world_mut().write_message(GoalScored { team: Team::Blue });
        app.world_mut().write_message(GoalScored { team: Team::Blue });
        app.update();

        let score = app.world().resource::<MatchScore>();
        assert_eq!(score.0.blue, 1);
        assert_eq!(score.0.red, 0);
        let reset = app.world().resource::<GoalResetState>();
        assert!(reset.locked);
        assert!(reset.seconds_left > 0.0);
    }

    #[test]
    fn reports_while_locked_never_change_the_score() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_goal_reports);

        app.world_mut().resource_mut::<GoalResetState>().locked = true;
        app.world_mut().write_message(GoalScored { team: Team::Red });
        app.update();

        let score = app.world().resource::<MatchScore>();
        assert_eq!(score.0.red, 0);
    }

    #[test]
    fn goal_reports_after_the_final_whistle_are_ignored() {
        let mut app = make_test_app();
        app.add_systems(
            Update,
            handle_goal_reports.run_if(in_state(MatchPhase::Live)),
        );

        set_phase(&mut app, MatchPhase::Ended);
        app.world_mut().write_message(GoalScored { team: Team::Blue });
        app.update();

        let score = app.world().resource::<MatchScore>();
        assert_eq!(score.0.blue, 0);
    }

    #[test]
    fn reset_timer_expiry_releases_the_lock() {
        let mut app = make_test_app();
        app.add_systems(Update, tick_goal_reset);

        {
            let mut reset = app.world_mut().resource_mut::<GoalResetState>();
            reset.locked = true;
            reset.seconds_left = 0.0;
        }
        app.update();

        assert!(!app.world().resource::<GoalResetState>().locked);
    }

    #[test]
    fn expired_clock_ends_the_match() {
        let mut app = make_test_app();
        app.add_systems(Update, tick_clock.run_if(in_state(MatchPhase::Live)));

        set_phase(&mut app, MatchPhase::Live);
        // Clock already at zero: the next tick ends it.
        app.update();
        app.update();

        assert_eq!(phase(&app), MatchPhase::Ended);
    }

    #[test]
    fn team_wipe_ends_the_match_with_the_survivors_winning() {
        let mut app = make_test_app();
        app.add_systems(
            Update,
            handle_team_wiped.run_if(in_state(MatchPhase::Live)),
        );
        app.add_systems(OnEnter(MatchPhase::Ended), enter_ended);

        set_phase(&mut app, MatchPhase::Live);
        // Red is ahead on goals, but loses every disk.
        app.world_mut().resource_mut::<MatchScore>().0 =
            Scoreboard { blue: 0, red: 2 };
        app.world_mut().write_message(TeamWiped { team: Team::Red });
        app.update();
        app.update();

        assert_eq!(phase(&app), MatchPhase::Ended);
        let outcome = app.world().resource::<MatchOutcome>();
        assert_eq!(outcome.0, Some(MatchResult::Winner(Team::Blue)));
    }

    #[test]
    fn ended_by_clock_resolves_the_result_from_the_scoreboard() {
        let mut app = make_test_app();
        app.add_systems(OnEnter(MatchPhase::Ended), enter_ended);

        app.world_mut().resource_mut::<MatchScore>().0 =
            Scoreboard { blue: 3, red: 1 };
        set_phase(&mut app, MatchPhase::Ended);

        let outcome = app.world().resource::<MatchOutcome>();
        assert_eq!(outcome.0, Some(MatchResult::Winner(Team::Blue)));
        assert_eq!(
            result_text(outcome.0.unwrap()),
            "Blue Wins!"
        );
    }

    #[test]
    fn ended_with_level_scores_is_a_draw() {
        let mut app = make_test_app();
        app.add_systems(OnEnter(MatchPhase::Ended), enter_ended);

        app.world_mut().resource_mut::<MatchScore>().0 =
            Scoreboard { blue: 2, red: 2 };
        set_phase(&mut app, MatchPhase::Ended);

        let outcome = app.world().resource::<MatchOutcome>();
        assert_eq!(outcome.0, Some(MatchResult::Draw));
        assert_eq!(result_text(outcome.0.unwrap()), "Draw!");
    }

    #[test]
    fn match_end_revives_both_full_rosters() {
        let mut app = make_test_app();
        app.add_systems(OnEnter(MatchPhase::Ended), enter_ended);

        set_phase(&mut app, MatchPhase::Ended);

        let rosters = app.world().resource::<Rosters>();
        let expected = app
            .world()
            .resource::<GameSettings>()
            .0
            .match_rules
            .disks_per_team as usize;
        assert_eq!(rosters.blue.disks.len(), expected);
        assert_eq!(rosters.red.disks.len(), expected);
        assert!(rosters.blue.active_disk().is_some());
    }

    #[test]
    fn pregame_entry_resets_score_and_bookkeeping() {
        let mut app = make_test_app();
        app.add_systems(OnEnter(MatchPhase::PreGame), enter_pregame);

        set_phase(&mut app, MatchPhase::Ended);
        app.world_mut().resource_mut::<MatchScore>().0 =
            Scoreboard { blue: 5, red: 5 };
        app.world_mut().resource_mut::<GoalResetState>().locked = true;
        app.world_mut().resource_mut::<MatchOutcome>().0 = Some(MatchResult::Draw);
        app.world_mut()
            .resource_mut::<HazardSet>()
            .0
            .push(Entity::PLACEHOLDER);

        // Back to PreGame (the external full reset itself is out of scope,
        // but the entry sequence must leave a clean slate).
        set_phase(&mut app, MatchPhase::PreGame);

        assert_eq!(app.world().resource::<MatchScore>().0, Scoreboard::default());
        assert!(!app.world().resource::<GoalResetState>().locked);
        assert_eq!(app.world().resource::<MatchOutcome>().0, None);
        assert!(app.world().resource::<HazardSet>().0.is_empty());
        let clock = app.world().resource::<MatchClock>();
        assert_eq!(clock.0.format(), "02:00");
    }
}
