//! Structured logging setup.
//!
//! The library only emits `tracing` events; the binary decides where they go.
//! `RUST_LOG` overrides the default `keystride=info` filter and
//! `RUST_LOG_FORMAT=json` switches to JSON lines.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keystride=info"))
}

fn wants_json() -> bool {
    std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Install the global subscriber writing to stderr.
///
/// Subsequent calls are no-ops.
pub fn init() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(true);

    if wants_json() {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

/// Install the global subscriber appending to `path`.
///
/// Used while the terminal is in raw mode, where stderr output would tear
/// the screen. Falls back to [`init`] when the file cannot be opened.
pub fn init_with_file(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return init(),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    if wants_json() {
        let _ = subscriber.json().try_init();
    } else {
        let _ = subscriber.try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }

    #[test]
    fn default_filter_names_crate() {
        let filter = EnvFilter::new("keystride=debug");
        assert!(format!("{filter:?}").contains("keystride"));
    }
}
