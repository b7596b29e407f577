use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::engine::live::LiveStats;
use crate::generator::WordSource;
use crate::session::event::{EngineEvent, EventBus};
use crate::session::input::{Key, KeyOutcome};
use crate::session::mode::{Difficulty, TestConfig};
use crate::session::result::{Progress, ResultStatus, ResultsRecord};
use crate::session::word::WordSlot;

pub const MASTER_FAILURE: &str = "Incorrect character in Master mode";
pub const EXPERT_FAILURE: &str = "Incorrect word in Expert mode";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    NotStarted,
    InProgress,
    Completed,
    Failed,
}

impl TestStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TestStatus::Completed | TestStatus::Failed)
    }
}

/// A single typing test: word sequence, cursor, live statistics and the
/// lifecycle `NotStarted -> InProgress -> Completed | Failed`.
///
/// All timing comes from the injected [`Clock`], so a session can be replayed
/// deterministically.
pub struct TypingTest {
    settings: TestConfig,
    source: Box<dyn WordSource>,
    clock: Box<dyn Clock>,
    words: Vec<WordSlot>,
    current_word: usize,
    current_char: usize,
    status: TestStatus,
    stats: LiveStats,
    /// When the current word sequence was built.
    armed_at: Duration,
    start_time: Option<Duration>,
    end_time: Option<Duration>,
    quote_id: Option<u32>,
    results: Option<ResultsRecord>,
    events: EventBus,
}

impl TypingTest {
    pub fn new(settings: TestConfig, source: Box<dyn WordSource>, clock: Box<dyn Clock>) -> Self {
        let mut test = Self {
            settings,
            source,
            clock,
            words: Vec::new(),
            current_word: 0,
            current_char: 0,
            status: TestStatus::NotStarted,
            stats: LiveStats::new(),
            armed_at: Duration::ZERO,
            start_time: None,
            end_time: None,
            quote_id: None,
            results: None,
            events: EventBus::new(),
        };
        test.reset();
        test
    }

    /// Discard all progress and build a fresh word sequence. Subscribers
    /// stay registered.
    pub fn reset(&mut self) {
        self.stats.reset();
        let (words, quote_id) = self
            .settings
            .mode
            .build_words(&self.settings, self.source.as_mut());
        self.words = words.into_iter().map(WordSlot::new).collect();
        self.quote_id = quote_id;
        self.current_word = 0;
        self.current_char = 0;
        self.status = TestStatus::NotStarted;
        self.start_time = None;
        self.end_time = None;
        self.results = None;
        self.armed_at = self.clock.now();
        debug!(
            mode = self.settings.mode.kind().as_str(),
            words = self.words.len(),
            "test reset"
        );
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&EngineEvent) + 'static) {
        self.events.subscribe(subscriber);
    }

    pub fn settings(&self) -> &TestConfig {
        &self.settings
    }

    pub fn status(&self) -> TestStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == TestStatus::InProgress
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn stats(&self) -> &LiveStats {
        &self.stats
    }

    pub fn words(&self) -> &[WordSlot] {
        &self.words
    }

    pub fn current_word_index(&self) -> usize {
        self.current_word
    }

    pub fn current_char_index(&self) -> usize {
        self.current_char
    }

    pub fn current_word(&self) -> Option<&WordSlot> {
        self.words.get(self.current_word)
    }

    pub fn start_time(&self) -> Option<Duration> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Duration> {
        self.end_time
    }

    /// Results of the finished test, once it has ended.
    pub fn results(&self) -> Option<&ResultsRecord> {
        self.results.as_ref()
    }

    /// Seconds since start, frozen at the end time once the test is over.
    pub fn elapsed(&self) -> f64 {
        let Some(start) = self.start_time else {
            return 0.0;
        };
        let end = self.end_time.unwrap_or_else(|| self.clock.now());
        end.saturating_sub(start).as_secs_f64()
    }

    /// Seconds left in a timed test.
    pub fn remaining(&self) -> Option<f64> {
        self.settings
            .mode
            .time_limit()
            .map(|limit| (limit - self.elapsed()).max(0.0))
    }

    /// Percent done: share of time for timed tests, share of words otherwise.
    pub fn progress(&self) -> f64 {
        if let Some(limit) = self.settings.mode.time_limit() {
            if limit <= 0.0 {
                return 100.0;
            }
            return (self.elapsed() / limit * 100.0).min(100.0);
        }
        if self.words.is_empty() {
            return 0.0;
        }
        self.current_word as f64 / self.words.len() as f64 * 100.0
    }

    /// Words around the cursor, each flagged whether it is the current one.
    pub fn display_words(&self, before: usize, after: usize) -> Vec<(&WordSlot, bool)> {
        let start = self.current_word.saturating_sub(before);
        let end = (self.current_word + after + 1).min(self.words.len());
        (start..end)
            .map(|i| (&self.words[i], i == self.current_word))
            .collect()
    }

    /// [`display_words`](Self::display_words) with the configured window.
    pub fn window(&self) -> Vec<(&WordSlot, bool)> {
        let limits = self.settings.limits;
        self.display_words(limits.window_before, limits.window_after)
    }

    pub fn start(&mut self) {
        if self.status == TestStatus::NotStarted {
            let now = self.clock.now();
            self.begin(now);
        }
    }

    fn begin(&mut self, at: Duration) {
        self.start_time = Some(at);
        self.status = TestStatus::InProgress;
        if let Some(word) = self.words.get_mut(self.current_word) {
            word.start_time = Some(at);
        }
        info!(
            mode = self.settings.mode.kind().as_str(),
            value = self.settings.mode.mode_value(),
            "test started"
        );
    }

    /// Complete a timed test whose limit has passed. Returns whether it
    /// ended.
    ///
    /// A timed test nobody started expires `limit` seconds after it was
    /// built, with zero words completed.
    pub fn check_time_limit(&mut self) -> bool {
        self.expire_if_due().is_some()
    }

    fn time_expired(&self) -> bool {
        let Some(limit) = self.settings.mode.time_limit() else {
            return false;
        };
        match self.status {
            TestStatus::InProgress => self.elapsed() >= limit,
            TestStatus::NotStarted => {
                self.clock.now().saturating_sub(self.armed_at).as_secs_f64() >= limit
            }
            TestStatus::Completed | TestStatus::Failed => false,
        }
    }

    fn expire_if_due(&mut self) -> Option<KeyOutcome> {
        if !self.time_expired() {
            return None;
        }
        if self.status == TestStatus::NotStarted {
            self.begin(self.armed_at);
        }
        info!(elapsed = self.elapsed(), "time limit reached");
        Some(self.complete())
    }

    pub fn process_key(&mut self, key: impl Into<Key>) -> KeyOutcome {
        let key = key.into();
        if let Some(outcome) = self.expire_if_due() {
            return outcome;
        }
        if self.status == TestStatus::NotStarted && key.starts_test() {
            self.start();
        }
        if self.status != TestStatus::InProgress {
            return KeyOutcome::Ignored {
                reason: "test not active",
            };
        }
        if self.current_word >= self.words.len() {
            return self.complete();
        }

        match key {
            Key::Char(ch) => self.add_char(ch),
            Key::Space => self.submit_word(),
            Key::Backspace => self.delete_char(),
            Key::Escape | Key::Tab | Key::Other(_) => KeyOutcome::Ignored {
                reason: "unknown key",
            },
        }
    }

    fn add_char(&mut self, ch: char) -> KeyOutcome {
        let index = self.current_char;
        let keystroke = self.words[self.current_word].push(ch, index);
        let extra = keystroke.is_extra();
        let correct = keystroke.correct;

        if extra {
            self.stats.add_extra_char();
        } else if correct {
            self.stats.add_correct_char();
        } else {
            self.stats.add_incorrect_char();
        }
        self.current_char += 1;
        self.events
            .emit(&EngineEvent::CharacterJudged { ch, correct, extra });

        if !extra && !correct && self.settings.difficulty == Difficulty::Master {
            return self.fail(MASTER_FAILURE);
        }

        let interval = self.settings.limits.wpm_sample_interval;
        if !extra && interval > 0 && self.stats.total_chars() % interval == 0 {
            self.sample_wpm();
        }

        self.events.emit(&EngineEvent::Updated);
        KeyOutcome::CharAdded { ch, correct, extra }
    }

    fn delete_char(&mut self) -> KeyOutcome {
        let word = &mut self.words[self.current_word];
        let expected_len = word.expected_len();
        let Some(keystroke) = word.pop() else {
            return KeyOutcome::Ignored {
                reason: "nothing to delete",
            };
        };

        if self.current_char > expected_len {
            self.stats.remove_extra_char();
        } else {
            self.stats.remove_char(keystroke.correct);
        }
        self.current_char = self.current_char.saturating_sub(1);

        self.events.emit(&EngineEvent::Updated);
        KeyOutcome::CharDeleted { ch: keystroke.typed }
    }

    fn submit_word(&mut self) -> KeyOutcome {
        let now = self.clock.now();
        let word = &mut self.words[self.current_word];
        if word.typed.is_empty() {
            return KeyOutcome::Ignored {
                reason: "must type before advancing",
            };
        }

        let missed = word.submit(now);
        let word_wpm = word.burst_wpm();
        let correct = word.all_correct;
        let expected = word.expected.clone();

        self.stats.add_missed_chars(missed);
        self.stats.complete_word(word_wpm);
        self.events.emit(&EngineEvent::WordSubmitted {
            word: expected.clone(),
            correct,
            wpm: word_wpm,
        });

        if !correct && self.settings.difficulty == Difficulty::Expert {
            return self.fail(EXPERT_FAILURE);
        }

        self.current_word += 1;
        self.current_char = 0;
        if let Some(next) = self.words.get_mut(self.current_word) {
            next.start_time = Some(now);
        }

        if self.settings.mode.ends_with_last_word() && self.current_word >= self.words.len() {
            return self.complete();
        }
        self.replenish();

        self.events.emit(&EngineEvent::Updated);
        KeyOutcome::WordSubmitted {
            word: expected,
            correct,
            wpm: word_wpm,
        }
    }

    /// Append a batch of words when a timed test runs low. A failing source
    /// is logged and the test carries on with the words it has.
    fn replenish(&mut self) {
        let limits = self.settings.limits;
        if !self.settings.mode.needs_more_words(
            self.current_word,
            self.words.len(),
            limits.replenish_threshold,
        ) {
            return;
        }
        match self.source.generate_words(
            limits.time_mode_batch,
            &self.settings.language,
            self.settings.punctuation,
            self.settings.numbers,
        ) {
            Ok(batch) => {
                debug!(added = batch.len(), total = self.words.len(), "replenished words");
                self.words.extend(batch.into_iter().map(WordSlot::new));
            }
            Err(err) => error!(%err, "failed to generate more words"),
        }
    }

    fn sample_wpm(&mut self) {
        let elapsed = self.elapsed();
        let wpm = self.stats.wpm(elapsed);
        self.stats.record_wpm(elapsed, wpm);
    }

    fn complete(&mut self) -> KeyOutcome {
        let results = self.finish(ResultStatus::Completed);
        info!(wpm = results.wpm, accuracy = results.accuracy, "test completed");
        self.events
            .emit(&EngineEvent::TestCompleted(Box::new(results.clone())));
        KeyOutcome::TestCompleted {
            results: Box::new(results),
        }
    }

    fn fail(&mut self, reason: &str) -> KeyOutcome {
        let results = self.finish(ResultStatus::Failed {
            reason: reason.to_string(),
        });
        info!(reason, "test failed");
        self.events.emit(&EngineEvent::TestFailed {
            reason: reason.to_string(),
            results: Box::new(results.clone()),
        });
        KeyOutcome::TestFailed {
            reason: reason.to_string(),
            results: Box::new(results),
        }
    }

    fn finish(&mut self, status: ResultStatus) -> ResultsRecord {
        self.end_time = Some(self.clock.now());
        self.status = if status.is_completed() {
            TestStatus::Completed
        } else {
            TestStatus::Failed
        };
        self.sample_wpm();

        let results = ResultsRecord::capture(
            &self.settings,
            &self.stats,
            Progress {
                elapsed_secs: self.elapsed(),
                words_completed: self.current_word,
                total_words: self.words.len(),
            },
            status,
            self.quote_id,
        );
        self.results = Some(results.clone());
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::SupplyResult;
    use crate::generator::quotes::{Quote, QuoteLength};
    use crate::session::mode::TestMode;
    use crate::session::word::DisplayChar;

    /// Serves words from a fixed list, cycling.
    struct Scripted {
        words: Vec<&'static str>,
        next: usize,
    }

    impl Scripted {
        fn new(words: &[&'static str]) -> Box<Self> {
            Box::new(Self {
                words: words.to_vec(),
                next: 0,
            })
        }
    }

    impl WordSource for Scripted {
        fn generate_words(
            &mut self,
            count: usize,
            _language: &str,
            _punctuation: bool,
            _numbers: bool,
        ) -> SupplyResult<Vec<String>> {
            let out = (0..count)
                .map(|i| self.words[(self.next + i) % self.words.len()].to_string())
                .collect();
            self.next += count;
            Ok(out)
        }

        fn random_quote(
            &mut self,
            _category: Option<&str>,
            _length: Option<QuoteLength>,
        ) -> Option<Quote> {
            None
        }
    }

    fn build(settings: TestConfig, words: &[&'static str]) -> (TypingTest, ManualClock) {
        let clock = ManualClock::new();
        let test = TypingTest::new(settings, Scripted::new(words), Box::new(clock.clone()));
        (test, clock)
    }

    fn type_str(test: &mut TypingTest, text: &str) -> Vec<KeyOutcome> {
        text.chars().map(|c| test.process_key(c)).collect()
    }

    #[test]
    fn test_new_test_is_not_started() {
        let (test, _) = build(TestConfig::words(3), &["a", "b"]);
        assert_eq!(test.status(), TestStatus::NotStarted);
        assert_eq!(test.words().len(), 3);
        assert_eq!(test.elapsed(), 0.0);
        assert_eq!(test.progress(), 0.0);
        assert_eq!(test.remaining(), None);
        assert!(test.results().is_none());
    }

    #[test]
    fn test_first_char_starts_test() {
        let (mut test, clock) = build(TestConfig::words(1), &["cat"]);
        clock.advance_secs(3.0);
        let outcome = test.process_key("c");
        assert_eq!(
            outcome,
            KeyOutcome::CharAdded {
                ch: 'c',
                correct: true,
                extra: false
            }
        );
        assert!(test.is_active());
        assert_eq!(test.start_time(), Some(Duration::from_secs(3)));
        assert_eq!(test.words()[0].start_time, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_backspace_escape_tab_do_not_start() {
        let (mut test, _) = build(TestConfig::words(1), &["cat"]);
        for key in ["backspace", "escape", "tab"] {
            assert_eq!(
                test.process_key(key),
                KeyOutcome::Ignored {
                    reason: "test not active"
                }
            );
        }
        assert_eq!(test.status(), TestStatus::NotStarted);
    }

    #[test]
    fn test_unknown_key_in_progress_is_ignored() {
        let (mut test, _) = build(TestConfig::words(1), &["cat"]);
        test.process_key("c");
        assert_eq!(
            test.process_key("escape"),
            KeyOutcome::Ignored {
                reason: "unknown key"
            }
        );
        assert_eq!(test.stats().total_keystrokes, 1);
    }

    #[test]
    fn test_words_mode_completes_on_last_word() {
        let (mut test, clock) = build(TestConfig::words(2), &["hi", "yo"]);
        type_str(&mut test, "hi");
        clock.advance_secs(1.0);
        assert!(matches!(
            test.process_key("space"),
            KeyOutcome::WordSubmitted { correct: true, .. }
        ));
        assert_eq!(test.current_word_index(), 1);
        assert_eq!(test.progress(), 50.0);

        type_str(&mut test, "yo");
        clock.advance_secs(1.0);
        let outcome = test.process_key("space");
        let results = outcome.results().unwrap();
        assert_eq!(test.status(), TestStatus::Completed);
        assert_eq!(results.words_completed, 2);
        assert_eq!(results.total_words, 2);
        assert_eq!(results.duration, 2.0);
        assert_eq!(results.wpm, 24.0);
        assert_eq!(test.stats().wpm_history.len(), 1);
        assert_eq!(test.progress(), 100.0);
    }

    #[test]
    fn test_keys_after_completion_are_ignored() {
        let (mut test, _) = build(TestConfig::words(1), &["a"]);
        test.process_key('a');
        test.process_key(' ');
        assert!(test.is_complete());
        assert_eq!(
            test.process_key('b'),
            KeyOutcome::Ignored {
                reason: "test not active"
            }
        );
        assert_eq!(test.stats().total_keystrokes, 1);
    }

    #[test]
    fn test_submit_with_missing_chars() {
        let (mut test, _) = build(TestConfig::words(2), &["hello"]);
        type_str(&mut test, "he");
        assert!(matches!(
            test.process_key("space"),
            KeyOutcome::WordSubmitted { correct: false, .. }
        ));
        assert_eq!(test.stats().missed_chars, 3);
        assert!(test.words()[0].completed);
    }

    #[test]
    fn test_extra_chars_and_backspace() {
        let (mut test, _) = build(TestConfig::words(1), &["ab"]);
        type_str(&mut test, "abcd");
        assert_eq!(test.stats().extra_chars, 2);
        assert_eq!(test.current_char_index(), 4);
        assert!(!test.current_word().unwrap().all_correct);

        assert_eq!(
            test.process_key("backspace"),
            KeyOutcome::CharDeleted { ch: 'd' }
        );
        test.process_key("backspace");
        assert_eq!(test.stats().extra_chars, 0);
        assert_eq!(test.stats().correct_chars, 2);
        assert!(test.current_word().unwrap().all_correct);
        assert_eq!(test.stats().total_keystrokes, 4);
    }

    #[test]
    fn test_master_fails_on_wrong_char_but_not_extra() {
        let settings = TestConfig::words(2).with_difficulty(Difficulty::Master);
        let (mut test, _) = build(settings, &["ab"]);
        type_str(&mut test, "abz");
        assert!(test.is_active());

        test.process_key("space");
        let outcome = test.process_key('x');
        match outcome {
            KeyOutcome::TestFailed { reason, results } => {
                assert_eq!(reason, MASTER_FAILURE);
                assert!(!results.is_completed());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(test.status(), TestStatus::Failed);
    }

    #[test]
    fn test_expert_fails_on_wrong_word() {
        let settings = TestConfig::words(3).with_difficulty(Difficulty::Expert);
        let (mut test, _) = build(settings, &["ab"]);
        type_str(&mut test, "ab");
        test.process_key("space");
        type_str(&mut test, "xb");
        assert!(test.is_active());
        let outcome = test.process_key("space");
        assert!(matches!(outcome, KeyOutcome::TestFailed { .. }));
        assert_eq!(test.current_word_index(), 1);
        assert_eq!(test.results().unwrap().words_completed, 1);
    }

    #[test]
    fn test_expert_corrected_word_passes() {
        let settings = TestConfig::words(2).with_difficulty(Difficulty::Expert);
        let (mut test, _) = build(settings, &["ab"]);
        type_str(&mut test, "ax");
        test.process_key("backspace");
        test.process_key('b');
        assert!(matches!(
            test.process_key("space"),
            KeyOutcome::WordSubmitted { correct: true, .. }
        ));
    }

    #[test]
    fn test_wpm_sampled_every_twenty_chars() {
        let (mut test, clock) = build(TestConfig::words(50), &["abcd"]);
        test.start();
        for _ in 0..5 {
            for ch in "abcd".chars() {
                clock.advance_secs(0.25);
                test.process_key(ch);
            }
            test.process_key("space");
        }
        assert_eq!(test.stats().total_chars(), 20);
        let history = &test.stats().wpm_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].t, 5.0);
        assert_eq!(history[0].wpm, 48.0);
    }

    #[test]
    fn test_time_mode_expires_on_key_after_limit() {
        let (mut test, clock) = build(TestConfig::time(15), &["go"]);
        test.process_key('g');
        clock.advance_secs(14.9);
        assert!(!test.check_time_limit());
        assert_eq!(test.remaining().map(|r| (r * 10.0).round()), Some(1.0));
        clock.advance_secs(0.1);
        let outcome = test.process_key('o');
        assert!(matches!(outcome, KeyOutcome::TestCompleted { .. }));
        assert_eq!(test.stats().total_keystrokes, 1);
        assert_eq!(test.remaining(), Some(0.0));
        assert_eq!(test.progress(), 100.0);
    }

    #[test]
    fn test_check_time_limit_completes_once() {
        let (mut test, clock) = build(TestConfig::time(10), &["go"]);
        test.process_key('g');
        clock.advance_secs(10.0);
        assert!(test.check_time_limit());
        assert!(!test.check_time_limit());
        assert_eq!(test.status(), TestStatus::Completed);
    }

    #[test]
    fn test_time_mode_replenishes() {
        let mut settings = TestConfig::time(60);
        settings.limits.time_mode_buffer = 12;
        settings.limits.time_mode_batch = 5;
        let (mut test, _) = build(settings, &["a"]);
        assert_eq!(test.words().len(), 12);

        test.process_key('a');
        test.process_key("space");
        assert_eq!(test.words().len(), 12);
        test.process_key('a');
        test.process_key("space");
        assert_eq!(test.words().len(), 17);
    }

    #[test]
    fn test_window() {
        let (mut test, _) = build(TestConfig::words(20), &["a"]);
        assert_eq!(test.window().len(), 11);
        for _ in 0..5 {
            test.process_key('a');
            test.process_key("space");
        }
        let window = test.display_words(2, 3);
        assert_eq!(window.len(), 6);
        assert!(window[2].1);
        assert_eq!(window.iter().filter(|(_, current)| *current).count(), 1);
        assert_eq!(
            window[0].0.display_chars(),
            vec![DisplayChar::Correct('a')]
        );
    }

    #[test]
    fn test_reset_keeps_subscribers() {
        use std::cell::Cell;
        use std::rc::Rc;

        let (mut test, _) = build(TestConfig::words(1), &["a"]);
        let updates = Rc::new(Cell::new(0));
        let seen = Rc::clone(&updates);
        test.subscribe(move |event| {
            if *event == EngineEvent::Updated {
                seen.set(seen.get() + 1);
            }
        });
        test.process_key('a');
        test.reset();
        assert_eq!(test.status(), TestStatus::NotStarted);
        assert_eq!(test.stats().total_keystrokes, 0);
        test.process_key('a');
        assert_eq!(updates.get(), 2);
    }

    #[test]
    fn test_quote_mode_without_quotes() {
        let (mut test, _) = build(
            TestConfig::new(TestMode::Quote {
                category: None,
                length: None,
            }),
            &["a"],
        );
        let expected: Vec<&str> = test.words().iter().map(|w| w.expected.as_str()).collect();
        assert_eq!(expected, vec!["No", "quotes", "available"]);
        for word in ["No", "quotes", "available"] {
            type_str(&mut test, word);
            test.process_key("space");
        }
        assert_eq!(test.status(), TestStatus::Completed);
        assert_eq!(test.results().unwrap().mode_value, 0);
    }

    #[test]
    fn test_empty_words_test_completes_on_first_key() {
        let (mut test, _) = build(TestConfig::words(0), &["a"]);
        assert!(matches!(
            test.process_key('a'),
            KeyOutcome::TestCompleted { .. }
        ));
    }
}
