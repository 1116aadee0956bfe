pub const CANVAS_WIDTH: f32 = 980.0;
pub const CANVAS_HEIGHT: f32 = 560.0;

/// Rapier pixels_per_meter scaling factor. Rapier divides internally by this
/// so we can work in pixel coordinates everywhere.
pub const PPM: f32 = 50.0;

/// Playable field half extents (world pixels, centered on the origin).
pub const RINK_HALF_WIDTH: f32 = 400.0;
pub const RINK_HALF_HEIGHT: f32 = 200.0;

/// Goal mouth half height and pocket depth behind each mouth.
pub const GOAL_MOUTH_HALF: f32 = 60.0;
pub const GOAL_DEPTH: f32 = 40.0;

pub const DISK_RADIUS: f32 = 22.0;
pub const PUCK_RADIUS: f32 = 14.0;
pub const MINE_RADIUS: f32 = 16.0;

pub const DISK_RESTITUTION: f32 = 0.6;
pub const PUCK_RESTITUTION: f32 = 0.9;

pub const PHYSICS_DT: f32 = 1.0 / 120.0;
pub const PHYSICS_SUBSTEPS: usize = 1;
pub const PHYSICS_MAX_STEPS_PER_FRAME: u32 = 8;
pub const PHYSICS_MAX_CATCHUP_SECS: f64 = PHYSICS_DT as f64 * PHYSICS_MAX_STEPS_PER_FRAME as f64;

#[derive(Clone, Copy)]
pub struct Colors;

impl Colors {
    pub const RINK_BG: u32 = 0x050510;
    pub const WALL: u32 = 0x4da6a6;
    pub const CENTER_LINE: u32 = 0x2a5a5a;
    pub const BLUE_TEAM: u32 = 0x4d9be6;
    pub const RED_TEAM: u32 = 0xe65a5a;
    pub const PUCK: u32 = 0xf0f0f0;
    pub const ACTIVE_RING: u32 = 0x44ff88;
    pub const UI_DIM: u32 = 0x888888;
}

pub fn color_from_hex(rgb: u32) -> bevy::prelude::Color {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    bevy::prelude::Color::srgb(r, g, b)
}

pub fn team_color(team: minerink_shared::team::Team) -> bevy::prelude::Color {
    match team {
        minerink_shared::team::Team::Blue => color_from_hex(Colors::BLUE_TEAM),
        minerink_shared::team::Team::Red => color_from_hex(Colors::RED_TEAM),
    }
}
