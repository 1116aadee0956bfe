use bevy::prelude::*;

use minerink_shared::team::Team;

use crate::constants::color_from_hex;

pub(super) const CLOCK_TOP: f32 = 12.0;
pub(super) const SCORE_TOP: f32 = 12.0;
pub(super) const SCORE_SIDE_INSET: f32 = 60.0;
pub(super) const PHASE_LABEL_TOP: f32 = 48.0;

pub(super) const RESULT_PANEL_WIDTH: f32 = 260.0;
pub(super) const RESULT_PANEL_HEIGHT: f32 = 90.0;

#[derive(Component)]
pub(super) struct HudClockText;

#[derive(Component)]
pub(super) struct HudScoreText {
    pub(super) team: Team,
}

#[derive(Component)]
pub(super) struct HudPhaseText;

#[derive(Component)]
pub(super) struct HudResultPanel;

#[derive(Component)]
pub(super) struct HudResultText;

pub(super) fn panel_bg(alpha: f32) -> Color {
    Color::srgba(5.0 / 255.0, 5.0 / 255.0, 16.0 / 255.0, alpha)
}

pub(super) fn panel_border(alpha: f32) -> Color {
    color_from_hex(crate::constants::Colors::WALL).with_alpha(alpha)
}
