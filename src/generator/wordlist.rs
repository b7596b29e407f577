use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{SupplyError, SupplyResult};

/// Returned whenever a list cannot be resolved or read.
pub const FALLBACK_WORDS: [&str; 9] = [
    "the", "quick", "brown", "fox", "jumps", "over", "the", "lazy", "dog",
];

pub const DEFAULT_LANGUAGE: &str = "english";

/// Strip path syntax from a user-supplied language key.
pub fn sanitize_language(key: &str) -> String {
    key.replace("..", "").replace(['/', '\\'], "")
}

/// File name for a (sanitized) language key. Unknown keys map to English.
pub fn wordlist_file(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "english" | "english_us" => "english_2k.txt",
        "english_uk" => "english_uk.txt",
        "programming" => "programming.txt",
        _ => "english_2k.txt",
    }
}

pub fn parse_wordlist(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Newline-separated word lists under one directory, cached per language.
///
/// A language that fails to load is remembered too: it keeps getting the
/// fallback list without touching the disk again.
pub struct WordLists {
    dir: PathBuf,
    cache: HashMap<String, Vec<String>>,
    unavailable: HashSet<String>,
    fallback: Vec<String>,
}

impl WordLists {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
            unavailable: HashSet::new(),
            fallback: FALLBACK_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Words for `language`, or the fallback list if loading fails.
    pub fn words(&mut self, language: &str) -> &[String] {
        let key = sanitize_language(language);
        if self.unavailable.contains(&key) {
            return &self.fallback;
        }
        if !self.cache.contains_key(&key) {
            match self.try_load(&key) {
                Ok(words) => {
                    self.cache.insert(key.clone(), words);
                }
                Err(err) => {
                    warn!(language, %err, "word list unavailable, using fallback words");
                    self.unavailable.insert(key);
                    return &self.fallback;
                }
            }
        }
        &self.cache[&key]
    }

    pub fn is_cached(&self, language: &str) -> bool {
        self.cache.contains_key(&sanitize_language(language))
    }

    fn try_load(&self, key: &str) -> SupplyResult<Vec<String>> {
        if key.is_empty() {
            return Err(SupplyError::InvalidLanguage(key.to_string()));
        }
        let path = self.resolve(key)?;
        let text = fs::read_to_string(&path).map_err(|source| SupplyError::Io {
            path: path.clone(),
            source,
        })?;
        let words = parse_wordlist(&text);
        if words.is_empty() {
            return Err(SupplyError::EmptyWordlist(path));
        }
        Ok(words)
    }

    /// Canonical path of the list for `key`, guaranteed to lie inside the
    /// word-list directory.
    fn resolve(&self, key: &str) -> SupplyResult<PathBuf> {
        let candidate = self.dir.join(wordlist_file(key));
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source: std::io::Error| SupplyError::Io { path, source }
        };
        let root = self.dir.canonicalize().map_err(io_err(&self.dir))?;
        let path = candidate.canonicalize().map_err(io_err(&candidate))?;
        if !path.starts_with(&root) {
            return Err(SupplyError::OutsideWordlistDir { path, root });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists_with(files: &[(&str, &str)]) -> (tempfile::TempDir, WordLists) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let lists = WordLists::new(dir.path());
        (dir, lists)
    }

    #[test]
    fn test_sanitize_language() {
        assert_eq!(sanitize_language("english"), "english");
        assert_eq!(sanitize_language("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_language("..\\secret"), "secret");
    }

    #[test]
    fn test_wordlist_file_mapping() {
        assert_eq!(wordlist_file("english"), "english_2k.txt");
        assert_eq!(wordlist_file("English_US"), "english_2k.txt");
        assert_eq!(wordlist_file("english_uk"), "english_uk.txt");
        assert_eq!(wordlist_file("programming"), "programming.txt");
        assert_eq!(wordlist_file("klingon"), "english_2k.txt");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        assert_eq!(parse_wordlist("a\n\n  b  \r\nc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_loads_and_caches() {
        let (dir, mut lists) = lists_with(&[("english_2k.txt", "cat\ndog\n")]);
        assert_eq!(lists.words("english"), ["cat", "dog"]);
        assert!(lists.is_cached("english"));

        // Cached: later edits on disk are not observed.
        fs::write(dir.path().join("english_2k.txt"), "emu\n").unwrap();
        assert_eq!(lists.words("english"), ["cat", "dog"]);
    }

    #[test]
    fn test_unknown_language_uses_english() {
        let (_dir, mut lists) = lists_with(&[("english_2k.txt", "cat\n")]);
        assert_eq!(lists.words("klingon"), ["cat"]);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let (_dir, mut lists) = lists_with(&[]);
        assert_eq!(lists.words("english"), FALLBACK_WORDS);
        assert!(!lists.is_cached("english"));
    }

    #[test]
    fn test_failed_load_is_remembered() {
        let (dir, mut lists) = lists_with(&[]);
        assert_eq!(lists.words("english"), FALLBACK_WORDS);

        // Not retried: a list appearing later is not picked up.
        fs::write(dir.path().join("english_2k.txt"), "cat\n").unwrap();
        assert_eq!(lists.words("english"), FALLBACK_WORDS);
        assert_eq!(lists.words("../english"), FALLBACK_WORDS);
        assert!(!lists.is_cached("english"));
    }

    #[test]
    fn test_empty_file_falls_back() {
        let (_dir, mut lists) = lists_with(&[("english_2k.txt", "\n \n")]);
        assert_eq!(lists.words("english"), FALLBACK_WORDS);
    }

    #[test]
    fn test_traversal_key_falls_back_or_stays_inside() {
        let (_dir, mut lists) = lists_with(&[("english_2k.txt", "cat\n")]);
        assert_eq!(lists.words("../../../etc/passwd"), ["cat"]);
        assert_eq!(lists.words("/.."), FALLBACK_WORDS);
    }

    #[test]
    fn test_missing_directory_falls_back() {
        let mut lists = WordLists::new("/definitely/not/a/real/dir");
        assert_eq!(lists.words("english"), FALLBACK_WORDS);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_out_of_dir_rejected() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "hidden\n").unwrap();
        let (dir, mut lists) = lists_with(&[]);
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            dir.path().join("english_2k.txt"),
        )
        .unwrap();

        assert_eq!(lists.words("english"), FALLBACK_WORDS);
    }
}
