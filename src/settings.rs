// ⚙️ Console Settings - defaults < hbnb.toml < HBNB_* environment
//
//   file_path = "file.json"     # where the storage engine persists
//   prompt    = "(hbnb) "       # shown only on an interactive terminal
//   log_level = "warn"          # used when RUST_LOG is unset

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::storage::DEFAULT_FILE_PATH;

pub const DEFAULT_SETTINGS_FILE: &str = "hbnb.toml";
pub const DEFAULT_PROMPT: &str = "(hbnb) ";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConsoleSettings {
    pub file_path: PathBuf,
    pub prompt: String,
    pub log_level: String,
}

impl ConsoleSettings {
    /// Load from `hbnb.toml` in the working directory (optional) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_SETTINGS_FILE))
    }

    /// Load with an explicit settings file; a missing file is not an error
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("file_path", DEFAULT_FILE_PATH)?
            .set_default("prompt", DEFAULT_PROMPT)?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("HBNB"))
            .build()?
            .try_deserialize()
    }
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        ConsoleSettings {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
            prompt: DEFAULT_PROMPT.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
