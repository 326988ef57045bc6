use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use log::debug;
use serde::{Deserialize, Serialize};

pub const APP_DIR: &str = "bailian-multimodal";
pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";
pub const DEFAULT_GENERATION_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/multimodal-generation/generation";

/// Endpoints and timeouts. Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// OpenAI-compatible API root, used for transcription
    pub compatible_base_url: String,
    /// Raw multimodal-generation endpoint, used for images and speech
    pub generation_url: String,
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            compatible_base_url: DEFAULT_BASE_URL.into(),
            generation_url: DEFAULT_GENERATION_URL.into(),
            timeout_secs: 120,
            connect_timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.compatible_base_url.trim_end_matches('/')
        )
    }
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or(eyre!("Couldn't find home dir"))?
        .join(".config")
        .join(APP_DIR))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.ron"))
}

pub fn api_key_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("api_key.txt"))
}

/// Missing file means defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let src = fs::read_to_string(path)?;
    ron::from_str(&src).wrap_err_with(|| format!("Invalid config file {}", path.display()))
}
