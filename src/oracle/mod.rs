mod queries;

pub use queries::*;
