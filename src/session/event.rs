use crate::session::result::ResultsRecord;

/// Notifications pushed to observers of a running test.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// Some visible state changed (character, deletion or submitted word).
    Updated,
    CharacterJudged {
        ch: char,
        correct: bool,
        extra: bool,
    },
    WordSubmitted {
        word: String,
        correct: bool,
        wpm: f64,
    },
    TestCompleted(Box<ResultsRecord>),
    TestFailed {
        reason: String,
        results: Box<ResultsRecord>,
    },
}

pub type Subscriber = Box<dyn FnMut(&EngineEvent)>;

#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&EngineEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn emit(&mut self, event: &EngineEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}
