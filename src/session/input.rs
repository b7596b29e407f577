use crate::session::result::ResultsRecord;

/// A key as delivered by the front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Backspace,
    Escape,
    Tab,
    Other(String),
}

impl Key {
    /// Parse a key token: `"space"`, `"backspace"`, `"escape"`, `"tab"` or a
    /// single printable character. A literal `" "` is treated as space.
    pub fn parse(token: &str) -> Self {
        match token {
            "space" | " " => return Key::Space,
            "backspace" => return Key::Backspace,
            "escape" => return Key::Escape,
            "tab" => return Key::Tab,
            _ => {}
        }
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Key::Char(ch),
            _ => Key::Other(token.to_string()),
        }
    }

    /// Whether this key moves a fresh test into progress.
    pub fn starts_test(&self) -> bool {
        !matches!(self, Key::Backspace | Key::Escape | Key::Tab)
    }
}

impl From<&str> for Key {
    fn from(token: &str) -> Self {
        Key::parse(token)
    }
}

impl From<char> for Key {
    fn from(ch: char) -> Self {
        if ch == ' ' { Key::Space } else { Key::Char(ch) }
    }
}

/// What a single key did to the test.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyOutcome {
    Ignored {
        reason: &'static str,
    },
    CharAdded {
        ch: char,
        correct: bool,
        extra: bool,
    },
    CharDeleted {
        ch: char,
    },
    WordSubmitted {
        word: String,
        correct: bool,
        wpm: f64,
    },
    TestCompleted {
        results: Box<ResultsRecord>,
    },
    TestFailed {
        reason: String,
        results: Box<ResultsRecord>,
    },
}

impl KeyOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, KeyOutcome::Ignored { .. })
    }

    pub fn results(&self) -> Option<&ResultsRecord> {
        match self {
            KeyOutcome::TestCompleted { results } | KeyOutcome::TestFailed { results, .. } => {
                Some(&**results)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_keys() {
        assert_eq!(Key::parse("space"), Key::Space);
        assert_eq!(Key::parse(" "), Key::Space);
        assert_eq!(Key::parse("backspace"), Key::Backspace);
        assert_eq!(Key::parse("escape"), Key::Escape);
        assert_eq!(Key::parse("tab"), Key::Tab);
    }

    #[test]
    fn test_parse_characters() {
        assert_eq!(Key::parse("a"), Key::Char('a'));
        assert_eq!(Key::parse("é"), Key::Char('é'));
        assert_eq!(Key::parse("\n"), Key::Other("\n".to_string()));
        assert_eq!(Key::parse("f1"), Key::Other("f1".to_string()));
        assert_eq!(Key::parse(""), Key::Other(String::new()));
    }

    #[test]
    fn test_starts_test() {
        assert!(Key::Char('a').starts_test());
        assert!(Key::Space.starts_test());
        assert!(!Key::Backspace.starts_test());
        assert!(!Key::Escape.starts_test());
        assert!(!Key::Tab.starts_test());
        assert_eq!(Key::from(' '), Key::Space);
    }
}
