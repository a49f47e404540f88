mod devcards;
mod game;
mod phase;
mod piece;
mod player;
mod resources;

pub use devcards::*;
pub use game::*;
pub use phase::*;
pub use piece::*;
pub use player::*;
pub use resources::*;
