mod config;
mod inbound;
mod outbound;

pub use config::*;
pub use inbound::*;
pub use outbound::*;
