//! The brain driver and the state/recovery modules it stands on.

mod driver;
mod recovery;
mod state;

pub use driver::*;
pub use state::*;
