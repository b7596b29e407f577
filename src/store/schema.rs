use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::result::ResultsRecord;

pub const SCHEMA_VERSION: u32 = 1;

/// Lowest accuracy a result may have to count as a personal best.
pub const MINIMUM_ACCURACY_FOR_PB: f64 = 95.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryData {
    pub schema_version: u32,
    /// Oldest first.
    pub results: Vec<ResultsRecord>,
}

impl Default for HistoryData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            results: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonalBestsData {
    pub schema_version: u32,
    /// Keyed by [`ResultsRecord::personal_best_key`].
    pub bests: BTreeMap<String, ResultsRecord>,
}

impl Default for PersonalBestsData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            bests: BTreeMap::new(),
        }
    }
}

impl PersonalBestsData {
    /// Record `result` if it beats the stored best for its key.
    pub fn consider(&mut self, result: &ResultsRecord) -> bool {
        if !result.is_completed() || result.accuracy < MINIMUM_ACCURACY_FOR_PB {
            return false;
        }
        let key = result.personal_best_key();
        if self.bests.get(&key).is_some_and(|best| best.wpm >= result.wpm) {
            return false;
        }
        self.bests.insert(key, result.clone());
        true
    }
}
