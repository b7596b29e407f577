use std::path::PathBuf;

use thiserror::Error;

/// Failures while resolving or reading word lists and quotes.
///
/// None of these reach the keystroke path: `WordSupply` turns them into the
/// fallback list (or no quote) after logging.
#[derive(Debug, Error)]
pub enum SupplyError {
    #[error("language key {0:?} is empty after sanitizing")]
    InvalidLanguage(String),
    #[error("word list path {} escapes {}", .path.display(), .root.display())]
    OutsideWordlistDir { path: PathBuf, root: PathBuf },
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("word list {} has no words", .0.display())]
    EmptyWordlist(PathBuf),
    #[error("failed to parse quotes: {0}")]
    QuoteParse(#[from] serde_json::Error),
    #[error("word source unavailable: {0}")]
    Unavailable(String),
}

pub type SupplyResult<T> = Result<T, SupplyError>;
