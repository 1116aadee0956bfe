use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use minerink_shared::config::TeamKeys;
use minerink_shared::team::Team;

use super::core::{GameSettings, MainCamera};
use super::UpdateSet;

pub struct InputPlugin;

/// Sampled controls for one team. `cycle` latches until the fixed-tick
/// router consumes it, so a press between fixed steps is never lost.
#[derive(Default, Clone, Copy)]
pub(crate) struct TeamInput {
    pub(crate) dir: Vec2,
    pub(crate) cycle: bool,
}

#[derive(Resource, Default)]
pub(crate) struct TeamInputs {
    pub(crate) blue: TeamInput,
    pub(crate) red: TeamInput,
}

impl TeamInputs {
    fn slot_mut(&mut self, team: Team) -> &mut TeamInput {
        match team {
            Team::Blue => &mut self.blue,
            Team::Red => &mut self.red,
        }
    }

    /// Read a team's input and consume its cycle edge.
    pub(crate) fn consume(&mut self, team: Team) -> TeamInput {
        let slot = self.slot_mut(team);
        let out = *slot;
        slot.cycle = false;
        out
    }
}

/// Mine placement pointer state for the current frame.
#[derive(Resource, Default)]
pub(crate) struct PlacementInput {
    pub(crate) confirm: bool,
    pub(crate) cursor_world: Option<Vec2>,
}

#[derive(Clone, Copy)]
pub(crate) struct TeamBindings {
    pub(crate) up: KeyCode,
    pub(crate) down: KeyCode,
    pub(crate) left: KeyCode,
    pub(crate) right: KeyCode,
    pub(crate) cycle: KeyCode,
}

#[derive(Resource)]
pub(crate) struct KeyBindings {
    pub(crate) blue: TeamBindings,
    pub(crate) red: TeamBindings,
}

const BLUE_DEFAULTS: TeamBindings = TeamBindings {
    up: KeyCode::KeyW,
    down: KeyCode::KeyS,
    left: KeyCode::KeyA,
    right: KeyCode::KeyD,
    cycle: KeyCode::KeyQ,
};

const RED_DEFAULTS: TeamBindings = TeamBindings {
    up: KeyCode::ArrowUp,
    down: KeyCode::ArrowDown,
    left: KeyCode::ArrowLeft,
    right: KeyCode::ArrowRight,
    cycle: KeyCode::ControlRight,
};

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TeamInputs>()
            .init_resource::<PlacementInput>()
            .add_systems(Startup, bind_keys)
            .add_systems(
                Update,
                (sample_team_input, sample_placement_input).in_set(UpdateSet::Input),
            );
    }
}

fn bind_keys(mut commands: Commands, settings: Res<GameSettings>) {
    let controls = &settings.0.controls;
    commands.insert_resource(KeyBindings {
        blue: resolve_bindings(&controls.blue, BLUE_DEFAULTS, Team::Blue),
        red: resolve_bindings(&controls.red, RED_DEFAULTS, Team::Red),
    });
}

/// Resolve configured key names, falling back per key so one bad name only
/// loses that one binding to its default.
fn resolve_bindings(keys: &TeamKeys, fallback: TeamBindings, team: Team) -> TeamBindings {
    let resolve = |name: &str, fallback: KeyCode| match keycode_from_name(name) {
        Some(code) => code,
        None => {
            warn!("unknown {} key name {name:?}, using default", team.name());
            fallback
        }
    };

    TeamBindings {
        up: resolve(&keys.up, fallback.up),
        down: resolve(&keys.down, fallback.down),
        left: resolve(&keys.left, fallback.left),
        right: resolve(&keys.right, fallback.right),
        cycle: resolve(&keys.cycle, fallback.cycle),
    }
}

pub(crate) fn keycode_from_name(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    if name.len() == 1 {
        let c = name.chars().next()?.to_ascii_uppercase();
        return match c {
            'A'..='Z' => Some(letter_keycode(c)),
            '0'..='9' => Some(digit_keycode(c)),
            _ => None,
        };
    }

    match name.to_ascii_lowercase().as_str() {
        "up" => Some(KeyCode::ArrowUp),
        "down" => Some(KeyCode::ArrowDown),
        "left" => Some(KeyCode::ArrowLeft),
        "right" => Some(KeyCode::ArrowRight),
        "space" => Some(KeyCode::Space),
        "enter" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "leftshift" => Some(KeyCode::ShiftLeft),
        "rightshift" => Some(KeyCode::ShiftRight),
        "leftctrl" => Some(KeyCode::ControlLeft),
        "rightctrl" => Some(KeyCode::ControlRight),
        "leftalt" => Some(KeyCode::AltLeft),
        "rightalt" => Some(KeyCode::AltRight),
        "comma" => Some(KeyCode::Comma),
        "period" => Some(KeyCode::Period),
        "slash" => Some(KeyCode::Slash),
        _ => None,
    }
}

fn letter_keycode(c: char) -> KeyCode {
    match c {
        'A' => KeyCode::KeyA,
        'B' => KeyCode::KeyB,
        'C' => KeyCode::KeyC,
        'D' => KeyCode::KeyD,
        'E' => KeyCode::KeyE,
        'F' => KeyCode::KeyF,
        'G' => KeyCode::KeyG,
        'H' => KeyCode::KeyH,
        'I' => KeyCode::KeyI,
        'J' => KeyCode::KeyJ,
        'K' => KeyCode::KeyK,
        'L' => KeyCode::KeyL,
        'M' => KeyCode::KeyM,
        'N' => KeyCode::KeyN,
        'O' => KeyCode::KeyO,
        'P' => KeyCode::KeyP,
        'Q' => KeyCode::KeyQ,
        'R' => KeyCode::KeyR,
        'S' => KeyCode::KeyS,
        'T' => KeyCode::KeyT,
        'U' => KeyCode::KeyU,
        'V' => KeyCode::KeyV,
        'W' => KeyCode::KeyW,
        'X' => KeyCode::KeyX,
        'Y' => KeyCode::KeyY,
        _ => KeyCode::KeyZ,
    }
}

fn digit_keycode(c: char) -> KeyCode {
    match c {
        '0' => KeyCode::Digit0,
        '1' => KeyCode::Digit1,
        '2' => KeyCode::Digit2,
        '3' => KeyCode::Digit3,
        '4' => KeyCode::Digit4,
        '5' => KeyCode::Digit5,
        '6' => KeyCode::Digit6,
        '7' => KeyCode::Digit7,
        '8' => KeyCode::Digit8,
        _ => KeyCode::Digit9,
    }
}

fn sample_team_input(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut inputs: ResMut<TeamInputs>,
) {
    inputs.blue.dir = sampled_direction(&keys, &bindings.blue);
    inputs.red.dir = sampled_direction(&keys, &bindings.red);

    if keys.just_pressed(bindings.blue.cycle) {
        inputs.blue.cycle = true;
    }
    if keys.just_pressed(bindings.red.cycle) {
        inputs.red.cycle = true;
    }
}

fn sampled_direction(keys: &ButtonInput<KeyCode>, bindings: &TeamBindings) -> Vec2 {
    Vec2::new(
        (keys.pressed(bindings.right) as i32 - keys.pressed(bindings.left) as i32) as f32,
        (keys.pressed(bindings.up) as i32 - keys.pressed(bindings.down) as i32) as f32,
    )
    .normalize_or_zero()
}

fn sample_placement_input(
    mouse: Res<ButtonInput<MouseButton>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut placement: ResMut<PlacementInput>,
) {
    placement.confirm = mouse.just_pressed(MouseButton::Left);
    placement.cursor_world = None;

    let Ok(window) = q_window.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = q_camera.single() else {
        return;
    };
    placement.cursor_world = camera.viewport_to_world_2d(camera_transform, cursor).ok();
}
