use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::generator::quotes::QuoteLength;
use crate::generator::wordlist::DEFAULT_LANGUAGE;
use crate::session::mode::{Difficulty, EngineLimits, ModeKind, TestConfig, TestMode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub test: TestSettings,
    #[serde(default)]
    pub engine: EngineLimits,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestSettings {
    #[serde(default = "default_mode")]
    pub mode: ModeKind,
    #[serde(default = "default_word_count")]
    pub word_count: usize,
    #[serde(default = "default_time_seconds")]
    pub time_seconds: u32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub punctuation: bool,
    #[serde(default)]
    pub numbers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_length: Option<QuoteLength>,
}

fn default_mode() -> ModeKind {
    ModeKind::Words
}
fn default_word_count() -> usize {
    50
}
fn default_time_seconds() -> u32 {
    60
}
fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keystride")
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            word_count: default_word_count(),
            time_seconds: default_time_seconds(),
            language: default_language(),
            difficulty: Difficulty::default(),
            punctuation: false,
            numbers: false,
            quote_category: None,
            quote_length: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            test: TestSettings::default(),
            engine: EngineLimits::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, or return defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keystride")
            .join("config.toml")
    }

    pub fn test_mode(&self) -> TestMode {
        let test = &self.test;
        match test.mode {
            ModeKind::Words => TestMode::Words {
                count: test.word_count,
            },
            ModeKind::Custom => TestMode::Custom {
                count: test.word_count,
            },
            ModeKind::Time => TestMode::Time {
                seconds: test.time_seconds,
            },
            ModeKind::Quote => TestMode::Quote {
                category: test.quote_category.clone(),
                length: test.quote_length,
            },
        }
    }

    /// Settings handed to a new typing test.
    pub fn test_config(&self) -> TestConfig {
        TestConfig {
            mode: self.test_mode(),
            language: self.test.language.clone(),
            difficulty: self.test.difficulty,
            punctuation: self.test.punctuation,
            numbers: self.test.numbers,
            limits: self.engine,
        }
    }
}
