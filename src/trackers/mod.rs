mod possible;
mod tracker;

pub use possible::*;
pub use tracker::*;
