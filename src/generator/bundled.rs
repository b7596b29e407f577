use std::fs;
use std::path::Path;

use rust_embed::Embed;
use tracing::{debug, warn};

#[derive(Embed)]
#[folder = "assets/"]
struct BundledData;

pub const WORDLISTS_SUBDIR: &str = "wordlists";
pub const QUOTES_SUBDIR: &str = "quotes";
pub const QUOTES_FILE: &str = "quotes.json";

/// Write every bundled word list and quote file that is missing from
/// `data_dir`. Existing files are left alone so users can edit them.
///
/// Failures are logged; the supply falls back at read time.
pub fn install_defaults(data_dir: &Path) {
    for name in BundledData::iter() {
        let target = data_dir.join(name.as_ref());
        if target.exists() {
            continue;
        }
        let Some(file) = BundledData::get(name.as_ref()) else {
            continue;
        };
        if let Some(parent) = target.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(dir = %parent.display(), %err, "cannot create data directory");
                continue;
            }
        }
        match fs::write(&target, file.data.as_ref()) {
            Ok(()) => debug!(path = %target.display(), "installed bundled data file"),
            Err(err) => warn!(path = %target.display(), %err, "cannot install bundled data file"),
        }
    }
}
