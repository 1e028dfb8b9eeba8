//! High-score persistence - JSON file store
//!
//! Scores live in one JSON object keyed by palette size:
//!
//! ```json
//! {"5": 0, "6": 1230, "7": 0, "8": 450}
//! ```
//!
//! A missing or unreadable file is never fatal: every size reads as 0 and a
//! warning is logged. Writes go through a temporary file and an atomic
//! rename, so a crash mid-write leaves the previous table intact.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use swapem_core::types::{MAX_COLORS, MIN_COLORS};
use swapem_core::HighScoreStore;

/// Default file name
pub const HIGHSCORE_FILE_NAME: &str = "swap_em_highscores.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("high-score file I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("high-score file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Best score per palette size, serialized as `{"5": n, ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScoreTable {
    scores: BTreeMap<u8, u32>,
}

impl HighScoreTable {
    /// Every supported size at 0
    pub fn zeroed() -> Self {
        Self {
            scores: (MIN_COLORS..=MAX_COLORS).map(|n| (n, 0)).collect(),
        }
    }

    pub fn get(&self, colors: u8) -> u32 {
        self.scores.get(&colors).copied().unwrap_or(0)
    }

    /// Set the score for a supported size. Unsupported sizes are ignored.
    pub fn set(&mut self, colors: u8, score: u32) -> bool {
        if !(MIN_COLORS..=MAX_COLORS).contains(&colors) {
            return false;
        }
        self.scores.insert(colors, score);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.scores.iter().map(|(&k, &v)| (k, v))
    }

    /// Parse a table, filling in sizes the JSON does not mention.
    pub fn from_json(json: &str) -> Result<Self> {
        let parsed: HighScoreTable = serde_json::from_str(json)?;
        let mut table = Self::zeroed();
        for (colors, score) in parsed.iter() {
            table.set(colors, score);
        }
        Ok(table)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for HighScoreTable {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// File-backed [`HighScoreStore`].
///
/// The table is read once on open and kept in memory; every save rewrites
/// the file.
#[derive(Debug, Clone)]
pub struct JsonHighScoreStore {
    path: PathBuf,
    table: HighScoreTable,
}

impl JsonHighScoreStore {
    /// Open the store at `path`, falling back to zeros if the file is
    /// missing or corrupt.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let table = match Self::read_table(&path) {
            Ok(Some(table)) => {
                debug!(path = %path.display(), "loaded high scores");
                table
            }
            Ok(None) => {
                debug!(path = %path.display(), "no high-score file yet");
                HighScoreTable::zeroed()
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable high-score file");
                HighScoreTable::zeroed()
            }
        };
        Self { path, table }
    }

    /// Read a table from disk. `Ok(None)` when the file does not exist.
    pub fn read_table(path: &Path) -> Result<Option<HighScoreTable>> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        HighScoreTable::from_json(&json).map(Some)
    }

    /// Write the current table (temp file, then rename).
    pub fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, self.table.to_json()?)?;
        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), "saved high scores");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn table(&self) -> &HighScoreTable {
        &self.table
    }
}

impl HighScoreStore for JsonHighScoreStore {
    fn load_high_score(&self, colors: u8) -> u32 {
        self.table.get(colors)
    }

    fn save_high_score(&mut self, colors: u8, score: u32) {
        if !self.table.set(colors, score) {
            return;
        }
        if let Err(err) = self.flush() {
            warn!(path = %self.path.display(), error = %err, "failed to save high scores");
        }
    }
}
