use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SupplyError, SupplyResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub id: Option<u32>,
    pub text: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub length: Option<usize>,
}

impl Quote {
    /// Stored length, or the text's character count when the record has none.
    pub fn length(&self) -> usize {
        self.length.unwrap_or_else(|| self.text.chars().count())
    }

    /// Words to type: the text split on whitespace.
    pub fn words(&self) -> Vec<String> {
        self.text.split_whitespace().map(str::to_string).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteLength {
    Short,
    Medium,
    Long,
    Extended,
}

impl QuoteLength {
    pub fn contains(self, length: usize) -> bool {
        match self {
            QuoteLength::Short => length < 100,
            QuoteLength::Medium => (100..200).contains(&length),
            QuoteLength::Long => (200..400).contains(&length),
            QuoteLength::Extended => length >= 400,
        }
    }
}

impl FromStr for QuoteLength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(QuoteLength::Short),
            "medium" => Ok(QuoteLength::Medium),
            "long" => Ok(QuoteLength::Long),
            "extended" => Ok(QuoteLength::Extended),
            other => Err(format!("unknown quote length {other:?}")),
        }
    }
}

/// Quote collection stored as one JSON array, loaded once.
pub struct QuoteBook {
    path: PathBuf,
    quotes: Option<Vec<Quote>>,
}

impl QuoteBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quotes: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&mut self) -> SupplyResult<&[Quote]> {
        if self.quotes.is_none() {
            let content = fs::read_to_string(&self.path).map_err(|source| SupplyError::Io {
                path: self.path.clone(),
                source,
            })?;
            let quotes: Vec<Quote> = serde_json::from_str(&content)?;
            self.quotes = Some(quotes);
        }
        Ok(self.quotes.as_deref().unwrap_or_default())
    }

    pub fn filtered(
        &mut self,
        category: Option<&str>,
        length: Option<QuoteLength>,
    ) -> SupplyResult<Vec<&Quote>> {
        let quotes = self.all()?;
        Ok(quotes
            .iter()
            .filter(|q| category.is_none_or(|c| q.category.as_deref() == Some(c)))
            .filter(|q| length.is_none_or(|l| l.contains(q.length())))
            .collect())
    }
}
