use std::fmt;

use serde::{Deserialize, Serialize};

pub const CHARS_PER_WORD: f64 = 5.0;

/// Round half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Net words per minute from correctly typed characters.
pub fn wpm(correct_chars: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let words = correct_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_secs / 60.0;
    round2(words / minutes)
}

/// Words per minute over every judged character, right or wrong.
///
/// Extra and missed characters are not part of `total_chars`.
pub fn raw_wpm(total_chars: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    let words = total_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_secs / 60.0;
    round2(words / minutes)
}

pub fn accuracy(correct_chars: usize, total_chars: usize) -> f64 {
    if total_chars == 0 {
        return 100.0;
    }
    round2(correct_chars as f64 / total_chars as f64 * 100.0)
}

/// Speed of a single word from its own start/end stamps.
pub fn burst_wpm(chars: usize, secs: f64) -> f64 {
    if secs <= 0.0 {
        return 0.0;
    }
    wpm(chars, secs)
}

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std_dev(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = m - *value;
            diff * diff
        })
        .sum::<f64>()
        / (data.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Score in [0, 100]: 100 minus the coefficient of variation of the
/// positive word speeds, as a percentage.
pub fn consistency(word_speeds: &[f64]) -> f64 {
    let speeds: Vec<f64> = word_speeds.iter().copied().filter(|s| *s > 0.0).collect();
    if speeds.len() < 2 {
        return 100.0;
    }
    let (Some(m), Some(sd)) = (mean(&speeds), sample_std_dev(&speeds)) else {
        return 100.0;
    };
    if m <= 0.0 {
        return 100.0;
    }
    round2((100.0 - sd / m * 100.0).clamp(0.0, 100.0))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub correct: usize,
    pub incorrect: usize,
    pub extra: usize,
    pub missed: usize,
}

impl CharacterStats {
    pub fn total(&self) -> usize {
        self.correct + self.incorrect + self.extra
    }
}

impl fmt::Display for CharacterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.correct, self.incorrect, self.extra, self.missed
        )
    }
}

/// Positional comparison of a finished word against its target.
pub fn char_stats(expected: &str, typed: &str) -> CharacterStats {
    let expected: Vec<char> = expected.chars().collect();
    let typed: Vec<char> = typed.chars().collect();
    let mut stats = CharacterStats::default();

    for (e, t) in expected.iter().zip(typed.iter()) {
        if e == t {
            stats.correct += 1;
        } else {
            stats.incorrect += 1;
        }
    }
    stats.extra = typed.len().saturating_sub(expected.len());
    stats.missed = expected.len().saturating_sub(typed.len());
    stats
}
