mod coords;
mod geometry;

pub use coords::*;
pub use geometry::*;
