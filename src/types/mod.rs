pub mod bot;
pub mod prediction;
pub mod snapshot;

pub use bot::*;
pub use prediction::*;
pub use snapshot::*;
