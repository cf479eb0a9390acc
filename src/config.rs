use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::celebration::CelebrationStyle;
use crate::error::{QuizError, Result};
use crate::session::{SessionConfig, DEFAULT_QUESTION_COUNT, MIN_TABLE};
use crate::timers::{FEEDBACK_DELAY_MS, MAX_FEEDBACK_DELAY_MS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub table: u8,
    pub question_count: u32,
    pub feedback_delay_ms: u64,
    pub celebration: CelebrationStyle,
    pub bell: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table: MIN_TABLE,
            question_count: DEFAULT_QUESTION_COUNT,
            feedback_delay_ms: FEEDBACK_DELAY_MS as u64,
            celebration: CelebrationStyle::Confetti,
            bell: true,
        }
    }
}

impl Config {
    pub fn session_config(&self) -> Result<SessionConfig> {
        SessionConfig::new(self.table, self.question_count)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feedback_delay_ms > MAX_FEEDBACK_DELAY_MS {
            return Err(QuizError::InvalidFeedbackDelay(self.feedback_delay_ms));
        }
        self.session_config().map(|_| ())
    }

    /// Remembers the table and question count the player finished on
    pub fn remember(&mut self, session: SessionConfig) {
        self.table = session.table();
        self.question_count = session.question_count();
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "multiquiz") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("multiquiz_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing, unreadable or out-of-range files fall back to defaults
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) if cfg.validate().is_ok() => cfg,
            Ok(cfg) => {
                warn!(path = %self.path.display(), ?cfg, "config out of range, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
