use bevy::prelude::*;
use bevy::time::Virtual;
use bevy::window::PrimaryWindow;
use bevy_rapier2d::prelude::{PhysicsSet, RapierConfiguration, TimestepMode};
use std::time::Duration;

use minerink_shared::config::GameConfig;

use crate::constants::{
    color_from_hex, Colors, CANVAS_HEIGHT, CANVAS_WIDTH, PHYSICS_DT, PHYSICS_MAX_CATCHUP_SECS,
    PHYSICS_MAX_STEPS_PER_FRAME, PHYSICS_SUBSTEPS,
};

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum UpdateSet {
    Input,
    Flow,
    Visuals,
}

#[derive(SystemSet, Debug, Hash, Eq, PartialEq, Clone)]
pub(crate) enum FixedSet {
    Simulate,
    PostPhysics,
    Spawn,
}

/// Static configuration, loaded at startup and injected; read-only afterwards.
#[derive(Resource)]
pub(crate) struct GameSettings(pub(crate) GameConfig);

pub struct CorePlugin {
    pub config: GameConfig,
}

#[derive(Component)]
pub(crate) struct MainCamera;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameSettings(self.config.clone()))
            .insert_resource(ClearColor(color_from_hex(Colors::RINK_BG)))
            .insert_resource(Time::<Fixed>::from_seconds(PHYSICS_DT as f64))
            .insert_resource(TimestepMode::Fixed {
                dt: PHYSICS_DT,
                substeps: PHYSICS_SUBSTEPS,
            })
            .configure_sets(
                Update,
                (UpdateSet::Input, UpdateSet::Flow, UpdateSet::Visuals).chain(),
            )
            .configure_sets(
                FixedUpdate,
                (FixedSet::Simulate, FixedSet::PostPhysics, FixedSet::Spawn).chain(),
            )
            .configure_sets(
                FixedUpdate,
                FixedSet::Simulate.before(PhysicsSet::SyncBackend),
            )
            .configure_sets(
                FixedUpdate,
                FixedSet::PostPhysics.after(PhysicsSet::Writeback),
            )
            .add_systems(
                Startup,
                (
                    setup_camera,
                    configure_virtual_time_catchup_cap,
                    configure_rapier_gravity,
                )
                    .chain(),
            )
            .add_systems(Update, fit_camera_to_canvas);
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Msaa::Sample4, MainCamera));
}

fn configure_rapier_gravity(mut q_config: Query<&mut RapierConfiguration>) {
    // Top-down rink: no ambient gravity, disks and puck only move under
    // player forces and collisions.
    for mut cfg in &mut q_config {
        cfg.gravity = Vec2::ZERO;
    }
}

fn configure_virtual_time_catchup_cap(mut virtual_time: ResMut<Time<Virtual>>) {
    // Limit catch-up after a long frame to a bounded number of fixed steps.
    let max_delta = Duration::from_secs_f64(PHYSICS_MAX_CATCHUP_SECS);
    debug_assert_eq!(
        PHYSICS_MAX_CATCHUP_SECS,
        (PHYSICS_DT as f64) * (PHYSICS_MAX_STEPS_PER_FRAME as f64)
    );
    virtual_time.set_max_delta(max_delta);
}

fn fit_camera_to_canvas(
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_projection: Query<&mut Projection, With<MainCamera>>,
) {
    let Ok(window) = q_window.single() else {
        return;
    };

    if window.width() <= 0.0 || window.height() <= 0.0 {
        return;
    }

    let scale_x = CANVAS_WIDTH / window.width();
    let scale_y = CANVAS_HEIGHT / window.height();
    let target_scale = scale_x.max(scale_y).max(0.0001);

    for mut projection in &mut q_projection {
        if let Projection::Orthographic(ortho) = &mut *projection {
            ortho.scale = target_scale;
        }
    }
}
