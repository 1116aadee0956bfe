mod core;
mod goals;
mod hud;
mod input;
mod menu;
mod mines;
mod orchestrator;
mod placement;
mod puck;
mod teams;
mod units;
mod walls;

pub use core::CorePlugin;
pub(crate) use core::{FixedSet, UpdateSet};
pub use goals::GoalsPlugin;
pub use hud::HudPlugin;
pub use input::InputPlugin;
pub use menu::MenuPlugin;
pub use mines::MinesPlugin;
pub use orchestrator::MatchPlugin;
pub use placement::PlacementPlugin;
pub use puck::PuckPlugin;
pub use teams::TeamsPlugin;
pub use units::UnitsPlugin;
pub use walls::WallsPlugin;
