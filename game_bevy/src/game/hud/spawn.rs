use bevy::prelude::*;

use minerink_shared::team::Team;

use crate::constants::{color_from_hex, team_color, Colors};

use super::types::{
    panel_bg, panel_border, HudClockText, HudPhaseText, HudResultPanel, HudResultText,
    HudScoreText, CLOCK_TOP, PHASE_LABEL_TOP, RESULT_PANEL_HEIGHT, RESULT_PANEL_WIDTH,
    SCORE_SIDE_INSET, SCORE_TOP,
};

pub(super) fn spawn_hud(mut commands: Commands) {
    let clock_font = TextFont::from_font_size(26.0);
    let score_font = TextFont::from_font_size(26.0);
    let label_font = TextFont::from_font_size(15.0);

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(CLOCK_TOP),
            left: Val::Percent(50.0),
            margin: UiRect::left(Val::Px(-34.0)),
            ..default()
        },
        Text::new("00:00"),
        clock_font,
        TextColor(color_from_hex(Colors::WALL)),
        HudClockText,
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(SCORE_TOP),
            left: Val::Px(SCORE_SIDE_INSET),
            ..default()
        },
        Text::new("0"),
        score_font.clone(),
        TextColor(team_color(Team::Blue)),
        HudScoreText { team: Team::Blue },
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(SCORE_TOP),
            right: Val::Px(SCORE_SIDE_INSET),
            ..default()
        },
        Text::new("0"),
        score_font,
        TextColor(team_color(Team::Red)),
        HudScoreText { team: Team::Red },
    ));

    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(PHASE_LABEL_TOP),
            left: Val::Percent(50.0),
            margin: UiRect::left(Val::Px(-120.0)),
            width: Val::Px(240.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
        Text::new(""),
        label_font,
        TextColor(color_from_hex(Colors::UI_DIM)),
        HudPhaseText,
    ));

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Percent(50.0),
                top: Val::Percent(50.0),
                margin: UiRect {
                    left: Val::Px(-RESULT_PANEL_WIDTH * 0.5),
                    top: Val::Px(-RESULT_PANEL_HEIGHT * 0.5),
                    ..default()
                },
                width: Val::Px(RESULT_PANEL_WIDTH),
                height: Val::Px(RESULT_PANEL_HEIGHT),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(panel_bg(0.9)),
            BorderColor::all(panel_border(0.8)),
            Visibility::Hidden,
            HudResultPanel,
        ))
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont::from_font_size(28.0),
                TextColor(color_from_hex(Colors::WALL)),
                HudResultText,
            ));
        });
}
