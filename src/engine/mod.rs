pub mod calc;
pub mod format;
pub mod live;

pub use calc::CharacterStats;
pub use live::{LiveStats, WpmSample};
