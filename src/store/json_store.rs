use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::session::result::ResultsRecord;
use crate::store::schema::{HistoryData, PersonalBestsData};

const HISTORY_FILE: &str = "history.json";
const PERSONAL_BESTS_FILE: &str = "personal_bests.json";

/// Where finished tests are kept.
pub trait ResultStore {
    /// Append `result` to the history. Returns whether it set a new personal
    /// best.
    fn save_result(&mut self, result: &ResultsRecord) -> Result<bool>;

    /// Most recent results first, at most `limit` of them.
    fn history(&self, limit: usize) -> Vec<ResultsRecord>;

    fn personal_best(&self, key: &str) -> Option<ResultsRecord>;
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("creating store directory {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    /// Missing or unreadable files load as empty data.
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        let parsed = fs::read_to_string(&path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(data) => data,
            Err(err) => {
                warn!(path = %path.display(), %err, "ignoring unreadable store file");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        debug!(path = %path.display(), "store file written");
        Ok(())
    }

    pub fn load_history(&self) -> HistoryData {
        self.load(HISTORY_FILE)
    }

    pub fn load_personal_bests(&self) -> PersonalBestsData {
        self.load(PERSONAL_BESTS_FILE)
    }

    /// Remove every stored result and personal best.
    pub fn clear(&self) -> Result<()> {
        self.save(HISTORY_FILE, &HistoryData::default())?;
        self.save(PERSONAL_BESTS_FILE, &PersonalBestsData::default())?;
        info!("history cleared");
        Ok(())
    }
}

impl ResultStore for JsonStore {
    fn save_result(&mut self, result: &ResultsRecord) -> Result<bool> {
        let mut history = self.load_history();
        history.results.push(result.clone());
        self.save(HISTORY_FILE, &history)?;

        let mut bests = self.load_personal_bests();
        let is_best = bests.consider(result);
        if is_best {
            self.save(PERSONAL_BESTS_FILE, &bests)?;
            info!(
                key = %result.personal_best_key(),
                wpm = result.wpm,
                "new personal best"
            );
        }
        Ok(is_best)
    }

    fn history(&self, limit: usize) -> Vec<ResultsRecord> {
        self.load_history()
            .results
            .into_iter()
            .rev()
            .take(limit)
            .collect()
    }

    fn personal_best(&self, key: &str) -> Option<ResultsRecord> {
        self.load_personal_bests().bests.remove(key)
    }
}
