pub mod event;
pub mod input;
pub mod mode;
pub mod result;
pub mod typing;
pub mod word;

pub use event::EngineEvent;
pub use input::{Key, KeyOutcome};
pub use mode::{Difficulty, EngineLimits, ModeKind, TestConfig, TestMode};
pub use result::{ResultStatus, ResultsRecord};
pub use typing::{TestStatus, TypingTest};
pub use word::{DisplayChar, WordSlot};
