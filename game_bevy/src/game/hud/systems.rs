use bevy::prelude::*;

use crate::game::orchestrator::{GoalResetState, MatchClock, MatchOutcome, MatchPhase, MatchScore};
use crate::game::placement::PlacementController;
use crate::rink::match_flow::result_text;

use super::types::{HudClockText, HudPhaseText, HudResultPanel, HudResultText, HudScoreText};

pub(super) fn update_clock_text(
    clock: Res<MatchClock>,
    mut q_clock: Query<&mut Text, With<HudClockText>>,
) {
    if let Ok(mut text) = q_clock.single_mut() {
        text.0 = clock.0.format();
    }
}

pub(super) fn update_score_text(
    score: Res<MatchScore>,
    mut q_scores: Query<(&HudScoreText, &mut Text)>,
) {
    for (marker, mut text) in &mut q_scores {
        text.0 = score.0.get(marker.team).to_string();
    }
}

/// Phase-dependent one-liner under the clock: placement prompts during
/// setup, a goal callout while the reset lock is held.
pub(super) fn update_phase_text(
    phase: Res<State<MatchPhase>>,
    reset: Res<GoalResetState>,
    controller: Res<PlacementController>,
    mut q_label: Query<&mut Text, With<HudPhaseText>>,
) {
    let Ok(mut text) = q_label.single_mut() else {
        return;
    };

    let label = match phase.get() {
        MatchPhase::Placing(team) => {
            format!("{}: place your {} mines", team.name(), controller.remaining())
        }
        MatchPhase::Live if reset.locked => "GOAL!".to_string(),
        _ => String::new(),
    };

    if text.0 != label {
        text.0 = label;
    }
}

pub(super) fn update_result_panel(
    outcome: Res<MatchOutcome>,
    mut q_panel: Query<&mut Visibility, With<HudResultPanel>>,
    mut q_text: Query<&mut Text, With<HudResultText>>,
) {
    let Ok(mut visibility) = q_panel.single_mut() else {
        return;
    };

    match outcome.0 {
        Some(result) => {
            *visibility = Visibility::Visible;
            if let Ok(mut text) = q_text.single_mut() {
                text.0 = result_text(result);
            }
        }
        None => {
            *visibility = Visibility::Hidden;
        }
    }
}
