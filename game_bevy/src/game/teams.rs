use bevy::prelude::*;
use bevy_rapier2d::prelude::Velocity;

use minerink_shared::team::Team;

use crate::rink::roster;

use super::input::TeamInputs;
use super::mines::mine_contacts;
use super::orchestrator::MatchPhase;
use super::units::{halt, Disk, DiskDestroyed, DiskMotion, Eliminated};
use super::FixedSet;

pub struct TeamsPlugin;

/// One team's ordered roster plus its active cursor. Insertion order is
/// cycle order.
#[derive(Debug, Default, Clone)]
pub(crate) struct RosterState {
    pub(crate) disks: Vec<Entity>,
    pub(crate) active: usize,
}

impl RosterState {
    pub(crate) fn new(disks: Vec<Entity>) -> Self {
        Self { disks, active: 0 }
    }

    pub(crate) fn active_disk(&self) -> Option<Entity> {
        self.disks.get(self.active).copied()
    }

    pub(crate) fn is_wiped(&self) -> bool {
        self.disks.is_empty()
    }

    /// Advance the cursor, returning the previously active disk so it can
    /// be halted.
    pub(crate) fn cycle(&mut self) -> Option<Entity> {
        let prev = self.active_disk();
        self.active = roster::next_active(self.active, self.disks.len());
        prev
    }

    /// Drop a destroyed disk and renormalize the cursor. Returns false when
    /// the disk was not part of this roster.
    pub(crate) fn remove(&mut self, disk: Entity) -> bool {
        let Some(index) = self.disks.iter().position(|&d| d == disk) else {
            return false;
        };
        self.disks.remove(index);
        self.active = roster::active_after_removal(self.active, index, self.disks.len())
            .unwrap_or_default();
        true
    }
}

#[derive(Resource, Default)]
pub(crate) struct Rosters {
    pub(crate) blue: RosterState,
    pub(crate) red: RosterState,
}

impl Rosters {
    pub(crate) fn get(&self, team: Team) -> &RosterState {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }

    pub(crate) fn get_mut(&mut self, team: Team) -> &mut RosterState {
        match team {
            Team::Blue => &mut self.blue,
            Team::Red => &mut self.red,
        }
    }
}

/// A team just lost its last disk.
#[derive(Message)]
pub(crate) struct TeamWiped {
    pub(crate) team: Team,
}

impl Plugin for TeamsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Rosters>()
            .add_message::<TeamWiped>()
            .add_systems(
                FixedUpdate,
                route_team_input
                    .in_set(FixedSet::Simulate)
                    .run_if(in_state(MatchPhase::Live)),
            )
            .add_systems(
                FixedUpdate,
                handle_disk_destroyed
                    .in_set(FixedSet::PostPhysics)
                    .after(mine_contacts),
            );
    }
}

/// Route the sampled direction to the single active disk and keep every
/// other roster member dead still. Cycling halts the disk that loses
/// control before the switch takes effect.
pub(crate) fn route_team_input(
    mut inputs: ResMut<TeamInputs>,
    mut rosters: ResMut<Rosters>,
    mut q_disks: Query<(&mut DiskMotion, &mut Velocity), (With<Disk>, Without<Eliminated>)>,
) {
    for team in [Team::Blue, Team::Red] {
        let input = inputs.consume(team);
        let roster = rosters.get_mut(team);
        if roster.is_wiped() {
            continue;
        }

        if input.cycle {
            if let Some(prev) = roster.cycle() {
                if let Ok((_, mut vel)) = q_disks.get_mut(prev) {
                    halt(&mut vel);
                }
            }
        }

        let active = roster.active_disk();
        for &disk in &roster.disks {
            let Ok((mut motion, mut vel)) = q_disks.get_mut(disk) else {
                continue;
            };
            let is_active = Some(disk) == active;
            motion.active = is_active;
            motion.dir = if is_active { input.dir } else { Vec2::ZERO };
            // Halting non-active disks every tick, not just on transition,
            // guarantees no residual drift.
            if !is_active {
                halt(&mut vel);
            }
        }
    }
}

/// Same-tick reaction to an elimination: shrink the roster, renormalize the
/// cursor and reassert active flags on the survivors.
pub(crate) fn handle_disk_destroyed(
    mut destroyed: MessageReader<DiskDestroyed>,
    mut rosters: ResMut<Rosters>,
    mut wiped: MessageWriter<TeamWiped>,
    mut q_motion: Query<&mut DiskMotion, With<Disk>>,
) {
    for msg in destroyed.read() {
        let roster = rosters.get_mut(msg.team);
        if !roster.remove(msg.disk) {
            continue;
        }
        if roster.is_wiped() {
            wiped.write(TeamWiped { team: msg.team });
            continue;
        }

        let active = roster.active_disk();
        for &disk in &roster.disks {
            if let Ok(mut motion) = q_motion.get_mut(disk) {
                motion.active = Some(disk) == active;
                motion.dir = Vec2::ZERO;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.init_resource::<TeamInputs>();
        app.init_resource::<Rosters>();
        app.add_message::<DiskDestroyed>();
        app.add_message::<TeamWiped>();
        app
    }

    fn spawn_bare_disk(app: &mut App, team: Team, slot: usize, active: bool) -> Entity {
        app.world_mut()
            .spawn((
                Disk { team, slot },
                DiskMotion {
                    dir: Vec2::ZERO,
                    active,
                },
                Velocity::zero(),
            ))
            .id()
    }

    fn active_flags(app: &App, disks: &[Entity]) -> Vec<bool> {
        disks
            .iter()
            .map(|&d| app.world().get::<DiskMotion>(d).unwrap().active)
            .collect()
    }

    #[test]
    fn direction_reaches_only_the_active_disk() {
        let mut app = make_test_app();
        app.add_systems(Update, route_team_input);

        let disks: Vec<Entity> = (0..3)
            .map(|slot| spawn_bare_disk(&mut app, Team::Blue, slot, slot == 0))
            .collect();
        app.world_mut().resource_mut::<Rosters>().blue = RosterState::new(disks.clone());
        app.world_mut().resource_mut::<TeamInputs>().blue.dir = Vec2::Y;

        app.update();

        assert_eq!(
            app.world().get::<DiskMotion>(disks[0]).unwrap().dir,
            Vec2::Y
        );
        for &other in &disks[1..] {
            assert_eq!(app.world().get::<DiskMotion>(other).unwrap().dir, Vec2::ZERO);
        }
        assert_eq!(active_flags(&app, &disks), vec![true, false, false]);
    }

    #[test]
    fn cycling_advances_the_cursor_and_halts_the_previous_disk() {
        let mut app = make_test_app();
        app.add_systems(Update, route_team_input);

        let disks: Vec<Entity> = (0..3)
            .map(|slot| spawn_bare_disk(&mut app, Team::Red, slot, slot == 0))
            .collect();
        app.world_mut()
            .entity_mut(disks[0])
            .insert(Velocity::linear(Vec2::new(50.0, 0.0)));
        app.world_mut().resource_mut::<Rosters>().red = RosterState::new(disks.clone());
        app.world_mut().resource_mut::<TeamInputs>().red.cycle = true;

        app.update();

        assert_eq!(active_flags(&app, &disks), vec![false, true, false]);
        let prev_vel = app.world().get::<Velocity>(disks[0]).unwrap();
        assert_eq!(prev_vel.linvel, Vec2::ZERO);

        // The latch was consumed; a second update without a new press must
        // not cycle again.
        app.update();
        assert_eq!(active_flags(&app, &disks), vec![false, true, false]);
    }

    #[test]
    fn cycling_wraps_back_to_the_first_disk() {
        let mut app = make_test_app();
        app.add_systems(Update, route_team_input);

        let disks: Vec<Entity> = (0..2)
            .map(|slot| spawn_bare_disk(&mut app, Team::Blue, slot, slot == 0))
            .collect();
        app.world_mut().resource_mut::<Rosters>().blue = RosterState::new(disks.clone());

        for _ in 0..2 {
            app.world_mut().resource_mut::<TeamInputs>().blue.cycle = true;
            app.update();
        }

        assert_eq!(active_flags(&app, &disks), vec![true, false]);
    }

    #[test]
    fn non_active_disks_are_halted_every_tick() {
        let mut app = make_test_app();
        app.add_systems(Update, route_team_input);

        let disks: Vec<Entity> = (0..2)
            .map(|slot| spawn_bare_disk(&mut app, Team::Blue, slot, slot == 0))
            .collect();
        app.world_mut().resource_mut::<Rosters>().blue = RosterState::new(disks.clone());
        app.update();

        // Some external impulse sets the idle disk drifting mid-match.
        app.world_mut()
            .entity_mut(disks[1])
            .insert(Velocity::linear(Vec2::new(12.0, -3.0)));
        app.update();

        let vel = app.world().get::<Velocity>(disks[1]).unwrap();
        assert_eq!(vel.linvel, Vec2::ZERO);
    }

    #[test]
    fn destroying_the_active_disk_promotes_a_survivor_in_the_same_step() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_disk_destroyed);

        let disks: Vec<Entity> = (0..3)
            .map(|slot| spawn_bare_disk(&mut app, Team::Blue, slot, slot == 1))
            .collect();
        app.world_mut().resource_mut::<Rosters>().blue = RosterState {
            disks: disks.clone(),
            active: 1,
        };

        app.world_mut().write_message(DiskDestroyed {
            disk: disks[1],
            team: Team::Blue,
        });
        app.update();

        let rosters = app.world().resource::<Rosters>();
        assert_eq!(rosters.blue.disks, vec![disks[0], disks[2]]);
        assert_eq!(rosters.blue.active_disk(), Some(disks[2]));
        assert_eq!(active_flags(&app, &[disks[0], disks[2]]), vec![false, true]);
    }

    #[test]
    fn destroying_a_disk_before_the_cursor_keeps_the_same_disk_active() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_disk_destroyed);

        let disks: Vec<Entity> = (0..3)
            .map(|slot| spawn_bare_disk(&mut app, Team::Red, slot, slot == 2))
            .collect();
        app.world_mut().resource_mut::<Rosters>().red = RosterState {
            disks: disks.clone(),
            active: 2,
        };

        app.world_mut().write_message(DiskDestroyed {
            disk: disks[0],
            team: Team::Red,
        });
        app.update();

        let rosters = app.world().resource::<Rosters>();
        assert_eq!(rosters.red.active_disk(), Some(disks[2]));
    }

    #[test]
    fn losing_the_last_disk_reports_a_wipe_and_goes_inert() {
        let mut app = make_test_app();
        app.add_systems(Update, (handle_disk_destroyed, route_team_input).chain());

        let only = spawn_bare_disk(&mut app, Team::Blue, 0, true);
        app.world_mut().resource_mut::<Rosters>().blue = RosterState::new(vec![only]);

        app.world_mut().write_message(DiskDestroyed {
            disk: only,
            team: Team::Blue,
        });
        // Routing runs in the same update; an empty roster must not panic.
        app.update();

        let rosters = app.world().resource::<Rosters>();
        assert!(rosters.blue.is_wiped());
        assert!(rosters.blue.active_disk().is_none());

        let wiped: Vec<Team> = app
            .world_mut()
            .resource_mut::<Messages<TeamWiped>>()
            .drain()
            .map(|w| w.team)
            .collect();
        assert_eq!(wiped, vec![Team::Blue]);
    }

    #[test]
    fn unknown_disk_removal_is_ignored() {
        let mut app = make_test_app();
        app.add_systems(Update, handle_disk_destroyed);

        let known = spawn_bare_disk(&mut app, Team::Blue, 0, true);
        let stranger = spawn_bare_disk(&mut app, Team::Red, 0, false);
        app.world_mut().resource_mut::<Rosters>().blue = RosterState::new(vec![known]);

        app.world_mut().write_message(DiskDestroyed {
            disk: stranger,
            team: Team::Blue,
        });
        app.update();

        let rosters = app.world().resource::<Rosters>();
        assert_eq!(rosters.blue.disks, vec![known]);
    }
}
