use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::generator::WordSource;
use crate::generator::quotes::QuoteLength;
use crate::generator::wordlist::{DEFAULT_LANGUAGE, FALLBACK_WORDS};

/// Shown when Quote mode finds no quote to type.
pub const NO_QUOTE_WORDS: [&str; 3] = ["No", "quotes", "available"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Normal,
    /// A word submitted with any mismatch fails the test.
    Expert,
    /// Any incorrect character fails the test immediately.
    Master,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Normal => "normal",
            Difficulty::Expert => "expert",
            Difficulty::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Difficulty::Normal),
            "expert" => Ok(Difficulty::Expert),
            "master" => Ok(Difficulty::Master),
            other => Err(format!("unknown difficulty {other:?}")),
        }
    }
}

/// Mode name without its parameters, as echoed in results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    Words,
    Time,
    Quote,
    Custom,
}

impl ModeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeKind::Words => "words",
            ModeKind::Time => "time",
            ModeKind::Quote => "quote",
            ModeKind::Custom => "custom",
        }
    }
}

impl FromStr for ModeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "words" => Ok(ModeKind::Words),
            "time" => Ok(ModeKind::Time),
            "quote" => Ok(ModeKind::Quote),
            "custom" => Ok(ModeKind::Custom),
            other => Err(format!("unknown mode {other:?}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TestMode {
    Words {
        count: usize,
    },
    Time {
        seconds: u32,
    },
    Quote {
        category: Option<String>,
        length: Option<QuoteLength>,
    },
    Custom {
        count: usize,
    },
}

impl TestMode {
    pub fn kind(&self) -> ModeKind {
        match self {
            TestMode::Words { .. } => ModeKind::Words,
            TestMode::Time { .. } => ModeKind::Time,
            TestMode::Quote { .. } => ModeKind::Quote,
            TestMode::Custom { .. } => ModeKind::Custom,
        }
    }

    /// Word count or seconds; zero for Quote.
    pub fn mode_value(&self) -> usize {
        match self {
            TestMode::Words { count } | TestMode::Custom { count } => *count,
            TestMode::Time { seconds } => *seconds as usize,
            TestMode::Quote { .. } => 0,
        }
    }

    pub fn time_limit(&self) -> Option<f64> {
        match self {
            TestMode::Time { seconds } => Some(f64::from(*seconds)),
            _ => None,
        }
    }

    /// Whether submitting the last word ends the test.
    pub fn ends_with_last_word(&self) -> bool {
        !matches!(self, TestMode::Time { .. })
    }

    /// Whether the buffer needs a further batch with the cursor at `index`.
    pub fn needs_more_words(&self, index: usize, len: usize, threshold: usize) -> bool {
        match self {
            TestMode::Time { .. } => len.saturating_sub(index) <= threshold,
            _ => false,
        }
    }

    /// Initial word sequence for a fresh (or reset) test, and the id of the
    /// quote it came from.
    pub fn build_words(
        &self,
        settings: &TestConfig,
        source: &mut dyn WordSource,
    ) -> (Vec<String>, Option<u32>) {
        let count = match self {
            TestMode::Words { count } | TestMode::Custom { count } => *count,
            TestMode::Time { .. } => settings.limits.time_mode_buffer,
            TestMode::Quote { category, length } => {
                return match source.random_quote(category.as_deref(), *length) {
                    Some(quote) if !quote.words().is_empty() => (quote.words(), quote.id),
                    _ => (NO_QUOTE_WORDS.iter().map(|w| w.to_string()).collect(), None),
                };
            }
        };

        match source.generate_words(
            count,
            &settings.language,
            settings.punctuation,
            settings.numbers,
        ) {
            Ok(words) => (words, None),
            Err(err) => {
                error!(%err, count, "word generation failed, using fallback words");
                let words = FALLBACK_WORDS
                    .iter()
                    .cycle()
                    .take(count)
                    .map(|w| w.to_string())
                    .collect();
                (words, None)
            }
        }
    }
}

/// Tunables for the engine's buffering, sampling and display window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineLimits {
    pub time_mode_buffer: usize,
    pub time_mode_batch: usize,
    pub replenish_threshold: usize,
    pub wpm_sample_interval: usize,
    pub window_before: usize,
    pub window_after: usize,
}

impl Default for EngineLimits {
    fn default() -> Self {
        Self {
            time_mode_buffer: 500,
            time_mode_batch: 100,
            replenish_threshold: 10,
            wpm_sample_interval: 20,
            window_before: 2,
            window_after: 10,
        }
    }
}

/// Everything a test needs, handed over at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct TestConfig {
    pub mode: TestMode,
    pub language: String,
    pub difficulty: Difficulty,
    pub punctuation: bool,
    pub numbers: bool,
    pub limits: EngineLimits,
}

impl TestConfig {
    pub fn new(mode: TestMode) -> Self {
        Self {
            mode,
            language: DEFAULT_LANGUAGE.to_string(),
            difficulty: Difficulty::Normal,
            punctuation: false,
            numbers: false,
            limits: EngineLimits::default(),
        }
    }

    pub fn words(count: usize) -> Self {
        Self::new(TestMode::Words { count })
    }

    pub fn time(seconds: u32) -> Self {
        Self::new(TestMode::Time { seconds })
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_decorations(mut self, punctuation: bool, numbers: bool) -> Self {
        self.punctuation = punctuation;
        self.numbers = numbers;
        self
    }

    pub fn with_limits(mut self, limits: EngineLimits) -> Self {
        self.limits = limits;
        self
    }
}
