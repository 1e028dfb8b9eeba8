//! Runtime configuration from environment variables.
//!
//! `.env` is loaded by the binary before `AppConfig::from_env` runs.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use directories::ProjectDirs;

use crate::core::ColorPalette;
use crate::store::HIGHSCORE_FILE_NAME;
use crate::types::{MAX_COLORS, MIN_COLORS};

const APP_NAME: &str = "swapem";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// `SWAPEM_SEED`; a time-derived seed is used when unset
    pub seed: Option<u64>,
    /// `SWAPEM_COLORS`; when set the start menu is skipped
    pub colors: Option<u8>,
    /// `SWAPEM_HIGHSCORE_PATH`
    pub highscore_path: PathBuf,
    /// `SWAPEM_LOG_DIR`
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dirs = ProjectDirs::from("", "", APP_NAME);
        let data_dir = dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let log_dir = dirs
            .as_ref()
            .map(|d| d.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"));

        Self {
            seed: None,
            colors: None,
            highscore_path: data_dir.join(HIGHSCORE_FILE_NAME),
            log_dir,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.seed = read_env::<u64>("SWAPEM_SEED");
        config.colors =
            read_env::<u8>("SWAPEM_COLORS").filter(|c| (MIN_COLORS..=MAX_COLORS).contains(c));
        if let Some(path) = read_env_path("SWAPEM_HIGHSCORE_PATH") {
            config.highscore_path = path;
        }
        if let Some(dir) = read_env_path("SWAPEM_LOG_DIR") {
            config.log_dir = dir;
        }

        config
    }

    /// Configured seed, or one derived from the clock.
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Palette for the first session (the menu may change it).
    pub fn palette(&self) -> ColorPalette {
        self.colors
            .and_then(|c| ColorPalette::new(c).ok())
            .unwrap_or_default()
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}

fn read_env_path(key: &str) -> Option<PathBuf> {
    let value = env::var(key).ok()?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}
