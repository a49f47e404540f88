mod negotiator;
mod offer;
mod plan;
mod strategy;

pub use negotiator::*;
pub use offer::*;
pub use plan::*;
pub use strategy::*;
