use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::calc::{self, CharacterStats};
use crate::engine::live::{LiveStats, WpmSample};
use crate::session::mode::{Difficulty, ModeKind, TestConfig};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResultStatus {
    Completed,
    Failed { reason: String },
}

impl ResultStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, ResultStatus::Completed)
    }
}

/// Final figures of a finished test, echoed with its configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultsRecord {
    pub timestamp: DateTime<Utc>,
    pub mode: ModeKind,
    pub mode_value: usize,
    pub language: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub punctuation: bool,
    #[serde(default)]
    pub numbers: bool,
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    /// Seconds between start and end.
    pub duration: f64,
    pub characters: CharacterStats,
    pub words_completed: usize,
    pub total_words: usize,
    pub status: ResultStatus,
    #[serde(default)]
    pub wpm_history: Vec<WpmSample>,
    #[serde(default)]
    pub word_speeds: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<u32>,
}

/// Position of the test at the moment it ended.
#[derive(Clone, Copy, Debug)]
pub struct Progress {
    pub elapsed_secs: f64,
    pub words_completed: usize,
    pub total_words: usize,
}

impl ResultsRecord {
    pub fn capture(
        settings: &TestConfig,
        stats: &LiveStats,
        progress: Progress,
        status: ResultStatus,
        quote_id: Option<u32>,
    ) -> Self {
        let elapsed = progress.elapsed_secs;
        Self {
            timestamp: Utc::now(),
            mode: settings.mode.kind(),
            mode_value: settings.mode.mode_value(),
            language: settings.language.clone(),
            difficulty: settings.difficulty,
            punctuation: settings.punctuation,
            numbers: settings.numbers,
            wpm: stats.wpm(elapsed),
            raw_wpm: stats.raw_wpm(elapsed),
            accuracy: stats.accuracy(),
            consistency: stats.consistency(),
            duration: calc::round2(elapsed),
            characters: stats.char_stats(),
            words_completed: progress.words_completed,
            total_words: progress.total_words,
            status,
            wpm_history: stats.wpm_history.clone(),
            word_speeds: stats.word_speeds.clone(),
            quote_id,
        }
    }

    /// Key used for personal bests: same mode, value and language.
    pub fn personal_best_key(&self) -> String {
        format!(
            "{}_{}_{}",
            self.mode.as_str(),
            self.mode_value,
            self.language
        )
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }

    /// Whether anything was typed. A timed test that expired untouched has
    /// no input and is not worth keeping in the history.
    pub fn has_input(&self) -> bool {
        self.words_completed > 0 || self.characters.total() > 0
    }
}
