use std::time::Duration;

use crate::engine::calc;

/// One accepted character, judged against the expected word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keystroke {
    /// `None` when typed past the end of the expected word.
    pub expected: Option<char>,
    pub typed: char,
    pub correct: bool,
}

impl Keystroke {
    pub fn is_extra(&self) -> bool {
        self.expected.is_none()
    }
}

/// How a character of the word should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayChar {
    Correct(char),
    /// Typed char shown over the expected one.
    Incorrect { expected: char, typed: char },
    Pending(char),
    Extra(char),
}

#[derive(Clone, Debug, PartialEq)]
pub struct WordSlot {
    pub expected: String,
    expected_chars: Vec<char>,
    pub typed: String,
    pub keystrokes: Vec<Keystroke>,
    pub completed: bool,
    pub all_correct: bool,
    pub start_time: Option<Duration>,
    pub end_time: Option<Duration>,
}

impl WordSlot {
    pub fn new(expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self {
            expected_chars: expected.chars().collect(),
            expected,
            typed: String::new(),
            keystrokes: Vec::new(),
            completed: false,
            all_correct: true,
            start_time: None,
            end_time: None,
        }
    }

    pub fn expected_len(&self) -> usize {
        self.expected_chars.len()
    }

    pub fn typed_len(&self) -> usize {
        self.keystrokes.len()
    }

    pub fn expected_char(&self, index: usize) -> Option<char> {
        self.expected_chars.get(index).copied()
    }

    /// Expected characters the user never reached.
    pub fn missing_chars(&self) -> usize {
        self.expected_len().saturating_sub(self.typed_len())
    }

    /// Judge `ch` at `index` and append it.
    pub fn push(&mut self, ch: char, index: usize) -> Keystroke {
        let expected = self.expected_char(index);
        let keystroke = Keystroke {
            expected,
            typed: ch,
            correct: expected == Some(ch),
        };
        self.typed.push(ch);
        self.keystrokes.push(keystroke);
        self.refresh();
        keystroke
    }

    pub fn pop(&mut self) -> Option<Keystroke> {
        let keystroke = self.keystrokes.pop()?;
        self.typed.pop();
        self.refresh();
        Some(keystroke)
    }

    fn refresh(&mut self) {
        self.all_correct = self.keystrokes.iter().all(|k| k.correct);
    }

    /// Close the word at `at`, marking it wrong if characters are missing.
    pub fn submit(&mut self, at: Duration) -> usize {
        let missing = self.missing_chars();
        self.completed = true;
        self.end_time = Some(at);
        if missing > 0 {
            self.all_correct = false;
        }
        missing
    }

    /// Speed over this word alone, from its expected length.
    pub fn burst_wpm(&self) -> f64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => calc::burst_wpm(
                self.expected_len(),
                end.saturating_sub(start).as_secs_f64(),
            ),
            _ => 0.0,
        }
    }

    pub fn display_chars(&self) -> Vec<DisplayChar> {
        let mut out: Vec<DisplayChar> = self
            .expected_chars
            .iter()
            .enumerate()
            .map(|(i, &exp)| match self.keystrokes.get(i) {
                Some(k) if k.correct => DisplayChar::Correct(exp),
                Some(k) => DisplayChar::Incorrect {
                    expected: exp,
                    typed: k.typed,
                },
                None => DisplayChar::Pending(exp),
            })
            .collect();
        out.extend(
            self.keystrokes
                .iter()
                .filter(|k| k.is_extra())
                .map(|k| DisplayChar::Extra(k.typed)),
        );
        out
    }
}
