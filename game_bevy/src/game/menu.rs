use bevy::prelude::*;

use crate::constants::{color_from_hex, Colors};

use super::orchestrator::{BeginMatch, MatchPhase};
use super::UpdateSet;

pub struct MenuPlugin;

#[derive(Component)]
struct MenuRoot;

#[derive(Component)]
struct StartButton;

#[derive(Component)]
struct QuitButton;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_menu).add_systems(
            Update,
            handle_menu_buttons
                .in_set(UpdateSet::Flow)
                .run_if(in_state(MatchPhase::PreGame)),
        );
    }
}

const RULES_TEXT: &str = "Two teams, three disks each, one puck.\n\
Each team hides its mines on its own half before play,\n\
then fights to put the puck in the other goal.\n\
Mines take out enemy disks for the rest of the match.\n\n\
Blue: WASD to move, Q to switch disk.\n\
Red: arrows to move, right Ctrl to switch disk.\n\
Mines: left click on your own half.";

fn spawn_menu(mut commands: Commands) {
    let border = color_from_hex(Colors::WALL);

    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                row_gap: Val::Px(18.0),
                ..default()
            },
            BackgroundColor(color_from_hex(Colors::RINK_BG).with_alpha(0.92)),
            MenuRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("MINE RINK"),
                TextFont::from_font_size(42.0),
                TextColor(border),
            ));
            parent.spawn((
                Text::new(RULES_TEXT),
                TextFont::from_font_size(14.0),
                TextColor(color_from_hex(Colors::UI_DIM)),
            ));
            spawn_menu_button(parent, "START", border, StartButton);
            spawn_menu_button(parent, "QUIT", color_from_hex(Colors::UI_DIM), QuitButton);
        });
}

fn spawn_menu_button(
    parent: &mut ChildSpawnerCommands,
    label: &str,
    color: Color,
    marker: impl Component,
) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(160.0),
                height: Val::Px(40.0),
                align_items: AlignItems::Center,
                justify_content: JustifyContent::Center,
                border: UiRect::all(Val::Px(1.0)),
                ..default()
            },
            BackgroundColor(Color::NONE),
            BorderColor::all(color.with_alpha(0.8)),
            marker,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont::from_font_size(18.0),
                TextColor(color),
            ));
        });
}

fn handle_menu_buttons(
    q_buttons: Query<
        (&Interaction, Option<&StartButton>, Option<&QuitButton>),
        (Changed<Interaction>, With<Button>),
    >,
    mut q_root: Query<&mut Visibility, With<MenuRoot>>,
    mut begin: MessageWriter<BeginMatch>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, start, quit) in &q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }

        if start.is_some() {
            for mut visibility in &mut q_root {
                *visibility = Visibility::Hidden;
            }
            begin.write(BeginMatch);
        }
        if quit.is_some() {
            exit.write(AppExit::Success);
        }
    }
}
