//! User settings: `~/.config/media-shelf/settings.toml`.
//!
//! Every section is optional and every missing key falls back to its
//! default, so an absent file behaves like an empty one. CLI flags are
//! applied on top by the caller.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shelf_frontend::{DEFAULT_FRAME_OFFSET, MaterializeOptions, PathRewrite};
use shelf_scraper::{ClientConfig, DEFAULT_USER_AGENT, Politeness, RetryPolicy};

use crate::error::ShelfError;

/// Canonical path to the settings file: `~/.config/media-shelf/settings.toml`.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("media-shelf").join("settings.toml")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub paths: PathSettings,
    pub network: NetworkSettings,
    pub materialize: MaterializeSettings,
}

/// `[paths]`: the prefix rewrite applied to video sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub rewrite_from: Option<String>,
    pub rewrite_to: Option<String>,
}

impl PathSettings {
    /// The configured rewrite, if both ends are set and `from` is non-empty.
    pub fn rewrite(&self) -> Option<PathRewrite> {
        match (&self.rewrite_from, &self.rewrite_to) {
            (Some(from), Some(to)) if !from.is_empty() => Some(PathRewrite::new(from, to)),
            _ => None,
        }
    }
}

/// `[network]`: retry policy, timeouts and politeness for the scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    pub attempts: u32,
    pub retry_delay_secs: u64,
    pub timeout_secs: u64,
    pub politeness_min_ms: u64,
    pub politeness_max_ms: u64,
    pub user_agent: Option<String>,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            attempts: 2,
            retry_delay_secs: 5,
            timeout_secs: 5,
            politeness_min_ms: 1000,
            politeness_max_ms: 3000,
            user_agent: None,
        }
    }
}

impl NetworkSettings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            retry: RetryPolicy {
                max_attempts: self.attempts,
                delay: Duration::from_secs(self.retry_delay_secs),
            },
            politeness: Politeness {
                min: Duration::from_millis(self.politeness_min_ms),
                max: Duration::from_millis(self.politeness_max_ms),
            },
        }
    }
}

/// `[materialize]`: frame-extraction fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeSettings {
    pub frame_offset_secs: f64,
    /// `ffmpeg` binary; looked up on `PATH` when unset.
    pub ffmpeg: Option<PathBuf>,
}

impl Default for MaterializeSettings {
    fn default() -> Self {
        Self {
            frame_offset_secs: DEFAULT_FRAME_OFFSET.as_secs_f64(),
            ffmpeg: None,
        }
    }
}

impl MaterializeSettings {
    /// The configured offset; negative or non-finite values fall back to the
    /// default.
    pub fn frame_offset(&self) -> Duration {
        Duration::try_from_secs_f64(self.frame_offset_secs).unwrap_or(DEFAULT_FRAME_OFFSET)
    }
}

impl Settings {
    /// Load settings from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ShelfError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents, path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ShelfError::io(path, e)),
        }
    }

    /// Load from the canonical location.
    pub fn load_default() -> Result<Self, ShelfError> {
        Self::load(&settings_path())
    }

    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ShelfError> {
        toml::from_str(contents).map_err(|e| ShelfError::settings(origin, e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Write atomically, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ShelfError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ShelfError::io(parent, e))?;
        }
        let serialized = self
            .to_toml_string()
            .map_err(|e| ShelfError::settings(path, e.to_string()))?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, serialized).map_err(|e| ShelfError::io(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| ShelfError::io(path, e))?;
        Ok(())
    }

    /// Materializer options from `[paths]` and `[materialize]`.
    pub fn materialize_options(&self, overwrite: bool) -> MaterializeOptions {
        MaterializeOptions {
            overwrite,
            path_rewrite: self.paths.rewrite(),
            frame_offset: self.materialize.frame_offset(),
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
