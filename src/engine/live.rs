use serde::{Deserialize, Serialize};

use crate::engine::calc::{self, CharacterStats};

/// One point of the live speed series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WpmSample {
    pub t: f64,
    pub wpm: f64,
}

impl From<(f64, f64)> for WpmSample {
    fn from(v: (f64, f64)) -> Self {
        Self { t: v.0, wpm: v.1 }
    }
}

/// Running counters for a single test.
///
/// Backspace lowers the matching character counter but never
/// `total_keystrokes`: every key that was pressed stays counted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveStats {
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub extra_chars: usize,
    pub missed_chars: usize,
    pub total_keystrokes: usize,
    pub word_speeds: Vec<f64>,
    pub wpm_history: Vec<WpmSample>,
}

impl LiveStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add_correct_char(&mut self) {
        self.correct_chars += 1;
        self.total_keystrokes += 1;
    }

    pub fn add_incorrect_char(&mut self) {
        self.incorrect_chars += 1;
        self.total_keystrokes += 1;
    }

    pub fn add_extra_char(&mut self) {
        self.extra_chars += 1;
        self.total_keystrokes += 1;
    }

    pub fn remove_char(&mut self, was_correct: bool) {
        if was_correct {
            self.correct_chars = self.correct_chars.saturating_sub(1);
        } else {
            self.incorrect_chars = self.incorrect_chars.saturating_sub(1);
        }
    }

    pub fn remove_extra_char(&mut self) {
        self.extra_chars = self.extra_chars.saturating_sub(1);
    }

    pub fn complete_word(&mut self, word_wpm: f64) {
        self.word_speeds.push(word_wpm);
    }

    pub fn add_missed_chars(&mut self, count: usize) {
        self.missed_chars += count;
    }

    pub fn record_wpm(&mut self, t: f64, wpm: f64) {
        self.wpm_history.push(WpmSample { t, wpm });
    }

    /// Characters judged at positions inside the expected word.
    pub fn total_chars(&self) -> usize {
        self.correct_chars + self.incorrect_chars
    }

    pub fn wpm(&self, elapsed_secs: f64) -> f64 {
        calc::wpm(self.correct_chars, elapsed_secs)
    }

    pub fn raw_wpm(&self, elapsed_secs: f64) -> f64 {
        calc::raw_wpm(self.total_chars(), elapsed_secs)
    }

    pub fn accuracy(&self) -> f64 {
        calc::accuracy(self.correct_chars, self.total_chars())
    }

    pub fn consistency(&self) -> f64 {
        calc::consistency(&self.word_speeds)
    }

    pub fn char_stats(&self) -> CharacterStats {
        CharacterStats {
            correct: self.correct_chars,
            incorrect: self.incorrect_chars,
            extra: self.extra_chars,
            missed: self.missed_chars,
        }
    }
}
