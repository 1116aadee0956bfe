use bevy::prelude::*;

use minerink_shared::team::Team;

use crate::rink::placement::{PlacementOutcome, PlacementProtocol};

use super::input::PlacementInput;
use super::mines;
use super::orchestrator::{advance_placement, placement_running};
use super::UpdateSet;

pub struct PlacementPlugin;

/// Bevy-side wrapper around the placement protocol: tracks the entities
/// spawned for the current batch so they can be concealed together and then
/// handed to the orchestrator exactly once.
#[derive(Resource)]
pub(crate) struct PlacementController {
    protocol: PlacementProtocol,
    batch: Vec<Entity>,
}

impl Default for PlacementController {
    fn default() -> Self {
        Self {
            protocol: PlacementProtocol::new(0),
            batch: Vec::new(),
        }
    }
}

impl PlacementController {
    pub(crate) fn begin(&mut self, team: Team, quota: u32) {
        self.protocol = PlacementProtocol::new(quota);
        self.protocol.begin(team);
        self.batch.clear();
    }

    pub(crate) fn team(&self) -> Option<Team> {
        self.protocol.team()
    }

    pub(crate) fn remaining(&self) -> u32 {
        self.protocol.remaining()
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.protocol.is_finished()
    }

    pub(crate) fn try_place(&mut self, point: Vec2) -> PlacementOutcome {
        self.protocol.try_place(point)
    }

    pub(crate) fn register(&mut self, mine: Entity) {
        self.batch.push(mine);
    }

    /// Hand the finished batch over; a second drain yields nothing.
    pub(crate) fn drain_batch(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.batch)
    }
}

impl Plugin for PlacementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlacementController>().add_systems(
            Update,
            place_mines
                .in_set(UpdateSet::Flow)
                .before(advance_placement)
                .run_if(placement_running),
        );
    }
}

/// Turn a confirm click into a mine, if the point survives the field and
/// half checks. Rejected clicks are simply not consumed. The batch is
/// concealed as a whole the moment the quota is exhausted, so the opposing
/// team's placement turn cannot see it.
fn place_mines(
    mut commands: Commands,
    input: Res<PlacementInput>,
    mut controller: ResMut<PlacementController>,
) {
    if !input.confirm {
        return;
    }
    let Some(point) = input.cursor_world else {
        return;
    };
    let Some(team) = controller.team() else {
        return;
    };

    match controller.try_place(point) {
        PlacementOutcome::Accepted { finished } => {
            let mine = mines::spawn_mine(&mut commands, team, point);
            controller.register(mine);
            if finished {
                for &placed in &controller.batch {
                    commands.entity(placed).insert(Visibility::Hidden);
                }
                info!("{} placement finished", team.name());
            }
        }
        PlacementOutcome::OutsideField
        | PlacementOutcome::WrongHalf
        | PlacementOutcome::Inactive => {}
    }
}
