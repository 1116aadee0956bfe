mod constants;
mod game;
mod rink;

use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use bevy_prototype_lyon::prelude::ShapePlugin;
use bevy_rapier2d::prelude::*;

use minerink_shared::config::GameConfig;

use constants::PPM;
use game::{
    CorePlugin, GoalsPlugin, HudPlugin, InputPlugin, MatchPlugin, MenuPlugin, MinesPlugin,
    PlacementPlugin, PuckPlugin, TeamsPlugin, UnitsPlugin, WallsPlugin,
};

fn main() {
    let config = load_config();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Mine Rink".to_string(),
                resolution: WindowResolution::new(1000, 620),
                present_mode: PresentMode::AutoVsync,
                resizable: true,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(PPM).in_fixed_schedule())
        .add_plugins(ShapePlugin)
        .add_plugins(CorePlugin { config })
        .add_plugins(WallsPlugin)
        .add_plugins(PuckPlugin)
        .add_plugins(UnitsPlugin)
        .add_plugins(TeamsPlugin)
        .add_plugins(MinesPlugin)
        .add_plugins(PlacementPlugin)
        .add_plugins(GoalsPlugin)
        .add_plugins(MatchPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(MenuPlugin)
        .add_plugins(HudPlugin)
        .run();
}

/// Read the optional config file next to the binary (or wherever
/// MINERINK_CONFIG points). Anything unreadable or invalid falls back to
/// the compiled-in defaults; a broken config never blocks a match.
fn load_config() -> GameConfig {
    let path = std::env::var("MINERINK_CONFIG").unwrap_or_else(|_| "minerink.json".to_string());

    match std::fs::read_to_string(&path) {
        Ok(text) => match GameConfig::from_json(&text) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("ignoring invalid config {path}: {err}");
                GameConfig::default()
            }
        },
        Err(_) => GameConfig::default(),
    }
}
