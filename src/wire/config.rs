//! Brain-level configuration.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "demo", derive(clap::ValueEnum))]
pub enum Strategy {
    Fast,
    Smart,
}

impl From<Strategy> for crate::planner::Strategy {
    fn from(s: Strategy) -> Self {
        match s {
            Strategy::Fast => crate::planner::Strategy::Fast,
            Strategy::Smart => crate::planner::Strategy::Smart,
        }
    }
}

/// brain-level tunables, constructed programmatically by whatever embeds
/// the brain (a bot-hosting process); the `demo` binary additionally
/// exposes these as CLI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "demo", derive(clap::Parser))]
#[cfg_attr(feature = "demo", command(author, version, about))]
pub struct BrainConfig {
    #[cfg_attr(feature = "demo", arg(long, value_enum, default_value_t = Strategy::Smart))]
    pub strategy: Strategy,
    /// if true, trading is entirely disabled for this brain
    #[cfg_attr(feature = "demo", arg(long = "no-trade", default_value_t = false))]
    pub trade_disabled: bool,
    #[cfg_attr(feature = "demo", arg(long, default_value_t = 3))]
    pub max_denied_per_turn: u8,
    /// set automatically in 6-player games; not user-facing on the CLI
    #[cfg_attr(feature = "demo", arg(skip))]
    pub pause_faster: bool,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Smart,
            trade_disabled: false,
            max_denied_per_turn: 3,
            pause_faster: false,
        }
    }
}
