pub mod board;
pub mod brain;
pub mod diagnostics;
pub mod model;
pub mod oracle;
pub mod planner;
pub mod trackers;
pub mod wire;

mod actor;
pub use actor::*;

/// seat / player identity
pub type SeatId = u8;
pub const MAX_SEATS: usize = 6;
/// sentinel identity used when a tracker must reconcile one of our own
/// refused placements; never a real seat
pub const DUMMY_CANCEL_SEAT: SeatId = SeatId::MAX;

/// dimensional analysis types
pub type ResourceCount = u16;
pub type Eta = u16;
pub type Score = f32;

/// brain-level tunables, see wire::BrainConfig

/// install an `env_logger` subscriber from `RUST_LOG`, defaulting to `info`.
/// a no-op outside the `demo` feature so library consumers aren't forced to
/// take the dependency.
#[cfg(feature = "demo")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(not(feature = "demo"))]
pub fn init_logging() {}
