pub mod bundled;
pub mod numbers;
pub mod punctuate;
pub mod quotes;
pub mod wordlist;

use std::path::{Path, PathBuf};

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, warn};

use crate::error::SupplyResult;
use quotes::{Quote, QuoteBook, QuoteLength};
use wordlist::{WordLists, sanitize_language};

/// Supplies the words a typing test is built from.
///
/// `generate_words` is fallible so the engine can survive a source that
/// stops producing words mid-session; [`WordSupply`] itself never fails.
pub trait WordSource {
    fn generate_words(
        &mut self,
        count: usize,
        language: &str,
        punctuation: bool,
        numbers: bool,
    ) -> SupplyResult<Vec<String>>;

    fn random_quote(&mut self, category: Option<&str>, length: Option<QuoteLength>)
    -> Option<Quote>;
}

/// Word lists and quotes read from a data directory.
pub struct WordSupply {
    lists: WordLists,
    quotes: QuoteBook,
    rng: SmallRng,
}

impl WordSupply {
    /// Supply rooted at `data_dir`, installing the bundled defaults for any
    /// missing file.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_rng(data_dir, SmallRng::from_entropy())
    }

    pub fn with_rng(data_dir: impl Into<PathBuf>, rng: SmallRng) -> Self {
        let data_dir = data_dir.into();
        bundled::install_defaults(&data_dir);
        Self::from_parts(
            data_dir.join(bundled::WORDLISTS_SUBDIR),
            data_dir
                .join(bundled::QUOTES_SUBDIR)
                .join(bundled::QUOTES_FILE),
            rng,
        )
    }

    /// Supply over explicit locations, without touching the filesystem.
    pub fn from_parts(wordlists_dir: PathBuf, quotes_path: PathBuf, rng: SmallRng) -> Self {
        Self {
            lists: WordLists::new(wordlists_dir),
            quotes: QuoteBook::new(quotes_path),
            rng,
        }
    }

    pub fn wordlists_dir(&self) -> &Path {
        self.lists.dir()
    }

    pub fn load_wordlist(&mut self, language: &str) -> &[String] {
        self.lists.words(language)
    }

    /// `count` words drawn uniformly with replacement, then decorated.
    ///
    /// The `programming` list already carries syntax tokens, so it is never
    /// decorated.
    pub fn generate_words(
        &mut self,
        count: usize,
        language: &str,
        punctuation: bool,
        numbers: bool,
    ) -> Vec<String> {
        let list = self.lists.words(language);
        let mut words: Vec<String> = (0..count)
            .map(|_| list[self.rng.gen_range(0..list.len())].clone())
            .collect();

        if sanitize_language(language).eq_ignore_ascii_case("programming") {
            return words;
        }
        if punctuation {
            words = punctuate::apply_punctuation(words, &mut self.rng);
        }
        if numbers {
            words = numbers::apply_numbers(words, &mut self.rng);
        }
        words
    }

    pub fn get_random_quote(
        &mut self,
        category: Option<&str>,
        length: Option<QuoteLength>,
    ) -> Option<Quote> {
        let candidates = match self.quotes.filtered(category, length) {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(path = %self.quotes.path().display(), %err, "quotes unavailable");
                return None;
            }
        };
        if candidates.is_empty() {
            debug!(?category, ?length, "no quote matches filters");
            return None;
        }
        let pick = self.rng.gen_range(0..candidates.len());
        Some(candidates[pick].clone())
    }

    pub fn get_quote_words(quote: &Quote) -> Vec<String> {
        quote.words()
    }
}

impl WordSource for WordSupply {
    fn generate_words(
        &mut self,
        count: usize,
        language: &str,
        punctuation: bool,
        numbers: bool,
    ) -> SupplyResult<Vec<String>> {
        Ok(WordSupply::generate_words(
            self,
            count,
            language,
            punctuation,
            numbers,
        ))
    }

    fn random_quote(
        &mut self,
        category: Option<&str>,
        length: Option<QuoteLength>,
    ) -> Option<Quote> {
        self.get_random_quote(category, length)
    }
}
