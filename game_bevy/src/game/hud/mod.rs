mod spawn;
mod systems;
mod types;

use bevy::prelude::*;

use super::UpdateSet;

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn::spawn_hud).add_systems(
            Update,
            (
                systems::update_clock_text,
                systems::update_score_text,
                systems::update_phase_text,
                systems::update_result_panel,
            )
                .chain()
                .in_set(UpdateSet::Visuals),
        );
    }
}
