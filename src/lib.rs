//! Typing speed test engine.
//!
//! [`session::TypingTest`] owns one test: it consumes key tokens, judges each
//! character against the expected words and produces a
//! [`session::ResultsRecord`] when the test ends. Words come from a
//! [`generator::WordSource`]; time comes from a [`clock::Clock`]. Rendering
//! and persistence are left to the caller.

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod logging;
pub mod session;
pub mod store;
