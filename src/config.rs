use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RehearsalError, Result};
use crate::feedback::Tone;
use crate::reply::DEFAULT_REPLY_DELAY;
use crate::session::ReplyPolicy;

const APP_DIR: &str = "rehearsal-room";

/// Settings read from `config.json`. Every field is optional on disk.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub default_mood: Option<String>,
    pub reply_delay_ms: Option<u64>,
    pub reply_policy: Option<String>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mood: Option<String>,
    pub delay_ms: Option<u64>,
    pub keep_stale_replies: bool,
    pub log_file: Option<PathBuf>,
    pub verbose: bool,
}

/// Fully resolved settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mood: Tone,
    pub reply_delay: Duration,
    pub reply_policy: ReplyPolicy,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the default location; a missing file yields defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Merge CLI overrides and fill in defaults
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings> {
        let mood = match overrides.mood.as_ref().or(self.default_mood.as_ref()) {
            Some(name) => Tone::from_str(name)
                .ok_or_else(|| RehearsalError::Config(format!("Unknown mood: {}", name)))?,
            None => Tone::default(),
        };

        let reply_policy = if overrides.keep_stale_replies {
            ReplyPolicy::Keep
        } else {
            match &self.reply_policy {
                Some(name) => ReplyPolicy::from_str(name).ok_or_else(|| {
                    RehearsalError::Config(format!("Unknown reply policy: {}", name))
                })?,
                None => ReplyPolicy::default(),
            }
        };

        let reply_delay = overrides
            .delay_ms
            .or(self.reply_delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REPLY_DELAY);

        let log_file = overrides
            .log_file
            .clone()
            .or_else(|| self.log_file.clone())
            .or_else(Self::default_log_path);

        let log_level = if overrides.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone().unwrap_or_else(|| "info".to_string())
        };

        Ok(Settings {
            mood,
            reply_delay,
            reply_policy,
            log_file,
            log_level,
        })
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RehearsalError::Config("Could not determine config directory".to_string()))?;

        Ok(config_dir.join(APP_DIR).join("config.json"))
    }

    fn default_log_path() -> Option<PathBuf> {
        dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join("rehearse.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());

        let settings = config.resolve(&Overrides::default()).unwrap();
        assert_eq!(settings.mood, Tone::Calm);
        assert_eq!(settings.reply_delay, Duration::from_millis(600));
        assert_eq!(settings.reply_policy, ReplyPolicy::Cancel);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_mood": "friendly", "reply_policy": "keep" }"#).unwrap();

        let settings = Config::load_from(&path).unwrap().resolve(&Overrides::default()).unwrap();
        assert_eq!(settings.mood, Tone::Friendly);
        assert_eq!(settings.reply_policy, ReplyPolicy::Keep);
        assert_eq!(settings.reply_delay, DEFAULT_REPLY_DELAY);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config {
            default_mood: Some("calm".to_string()),
            reply_delay_ms: Some(1000),
            reply_policy: Some("cancel".to_string()),
            log_file: Some(PathBuf::from("/tmp/from-config.log")),
            log_level: Some("warn".to_string()),
        };
        let overrides = Overrides {
            mood: Some("Professional".to_string()),
            delay_ms: Some(10),
            keep_stale_replies: true,
            log_file: Some(PathBuf::from("/tmp/from-cli.log")),
            verbose: true,
        };

        let settings = config.resolve(&overrides).unwrap();
        assert_eq!(settings.mood, Tone::Professional);
        assert_eq!(settings.reply_delay, Duration::from_millis(10));
        assert_eq!(settings.reply_policy, ReplyPolicy::Keep);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/from-cli.log")));
        assert_eq!(settings.log_level, "debug");
    }

    #[test]
    fn test_unknown_mood_is_config_error() {
        let config = Config {
            default_mood: Some("grumpy".to_string()),
            ..Config::default()
        };
        let err = config.resolve(&Overrides::default()).unwrap_err();
        assert!(matches!(err, RehearsalError::Config(_)));
        assert!(err.to_string().contains("grumpy"));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(RehearsalError::Json(_))));
    }
}
