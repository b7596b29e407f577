use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use keystride::session::Key;

/// What the driver loop acts on.
#[derive(Debug, PartialEq)]
pub enum Command {
    /// A key for the typing test.
    Type(Key),
    /// Throw the current words away and start over.
    Restart,
    Quit,
    /// No input within one tick; time limits are checked here.
    Tick,
}

impl Command {
    /// Map a terminal key press. Releases and keys the test has no use for
    /// map to `None`.
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return (key.code == KeyCode::Char('c')).then_some(Command::Quit);
        }
        let command = match key.code {
            KeyCode::Esc => Command::Quit,
            KeyCode::Tab => Command::Restart,
            KeyCode::Backspace => Command::Type(Key::Backspace),
            KeyCode::Char(ch) => Command::Type(Key::from(ch)),
            _ => return None,
        };
        Some(command)
    }
}

/// Terminal input read on a background thread.
///
/// The thread exits once the handler is dropped.
pub struct EventHandler {
    rx: mpsc::Receiver<Command>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            loop {
                let command = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => Command::from_key(&key),
                        _ => None,
                    }
                } else {
                    Some(Command::Tick)
                };
                if let Some(command) = command
                    && tx.send(command).is_err()
                {
                    return;
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> anyhow::Result<Command> {
        Ok(self.rx.recv()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_typing_keys() {
        assert_eq!(
            Command::from_key(&press(KeyCode::Char('a'))),
            Some(Command::Type(Key::Char('a')))
        );
        assert_eq!(
            Command::from_key(&press(KeyCode::Char(' '))),
            Some(Command::Type(Key::Space))
        );
        assert_eq!(
            Command::from_key(&press(KeyCode::Backspace)),
            Some(Command::Type(Key::Backspace))
        );
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Command::Type(Key::Char('A')))
        );
    }

    #[test]
    fn test_driver_keys() {
        assert_eq!(Command::from_key(&press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(Command::from_key(&press(KeyCode::Tab)), Some(Command::Restart));
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
        assert_eq!(
            Command::from_key(&KeyEvent::new(KeyCode::Char('w'), KeyModifiers::CONTROL)),
            None
        );
    }

    #[test]
    fn test_ignored_keys() {
        assert_eq!(Command::from_key(&press(KeyCode::Left)), None);
        assert_eq!(Command::from_key(&press(KeyCode::F(1))), None);
        let release = KeyEvent::new_with_kind(
            KeyCode::Char('a'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(Command::from_key(&release), None);
    }
}
