//! TOML-based application configuration.
//!
//! Stores quiz tuning:
//! - Per-question countdown and warning threshold
//! - Pass threshold
//! - Answer feedback timing
//! - Optional path to a custom question file
//!
//! Configuration is stored at `<data dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::quiz::QuizSettings;

/// Countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_question_secs")]
    pub question_secs: u64,
    #[serde(default = "default_warning_threshold_secs")]
    pub warning_threshold_secs: u64,
}

/// Scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Minimum correct answers for a pass, regardless of quiz length.
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: usize,
}

/// Answer feedback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_clear_delay_ms")]
    pub clear_delay_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
    /// JSON question file used instead of the built-in bank.
    #[serde(default)]
    pub questions_path: Option<String>,
}

fn default_question_secs() -> u64 {
    50
}
fn default_warning_threshold_secs() -> u64 {
    10
}
fn default_pass_threshold() -> usize {
    8
}
fn default_clear_delay_ms() -> u64 {
    500
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            question_secs: default_question_secs(),
            warning_threshold_secs: default_warning_threshold_secs(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            clear_delay_ms: default_clear_delay_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            scoring: ScoringConfig::default(),
            feedback: FeedbackConfig::default(),
            questions_path: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    // Optional string keys serialize as null when unset; an
                    // empty value unsets them again.
                    serde_json::Value::Null | serde_json::Value::String(_) if value.is_empty() => {
                        serde_json::Value::Null
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data dir, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults there if it is missing.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
        }
    }

    /// Persist to the data dir.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check that the countdown can run and warn before it completes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let timer = &self.timer;
        if timer.question_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timer.question_secs".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if timer.warning_threshold_secs == 0 || timer.warning_threshold_secs >= timer.question_secs {
            return Err(ConfigError::InvalidValue {
                key: "timer.warning_threshold_secs".to_string(),
                message: format!(
                    "must be at least 1 and below timer.question_secs ({})",
                    timer.question_secs
                ),
            });
        }
        Ok(())
    }

    /// Set a value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn settings(&self) -> QuizSettings {
        QuizSettings {
            question_secs: self.timer.question_secs,
            warning_threshold_secs: self.timer.warning_threshold_secs,
            pass_threshold: self.scoring.pass_threshold,
            feedback_clear_ms: self.feedback.clear_delay_ms,
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Using default configuration: {}", e);
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.timer.question_secs, 50);
        assert_eq!(parsed.scoring.pass_threshold, 8);
        assert!(parsed.questions_path.is_none());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[timer]\nquestion_secs = 30\n").unwrap();
        assert_eq!(parsed.timer.question_secs, 30);
        assert_eq!(parsed.timer.warning_threshold_secs, 10);
        assert_eq!(parsed.feedback.clear_delay_ms, 500);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("timer.question_secs").as_deref(), Some("50"));
        assert_eq!(cfg.get("scoring.pass_threshold").as_deref(), Some("8"));
        assert!(cfg.get("timer.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "feedback.clear_delay_ms", "750").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "feedback.clear_delay_ms").unwrap(),
            &serde_json::Value::Number(750.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "timer.nonexistent_key", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "timer.question_secs", "soon");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn apply_rejects_zero_question_secs() {
        let mut cfg = Config::default();
        let result = cfg.apply("timer.question_secs", "0");
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::InvalidValue { ref key, .. })) if key == "timer.question_secs"
        ));
        assert_eq!(cfg.timer.question_secs, 50);
    }

    #[test]
    fn apply_rejects_zero_warning_threshold() {
        let mut cfg = Config::default();
        let result = cfg.apply("timer.warning_threshold_secs", "0");
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::InvalidValue { ref key, .. })) if key == "timer.warning_threshold_secs"
        ));
        assert_eq!(cfg.timer.warning_threshold_secs, 10);
    }

    #[test]
    fn apply_rejects_warning_threshold_at_or_above_duration() {
        let mut cfg = Config::default();
        assert!(cfg.apply("timer.warning_threshold_secs", "50").is_err());
        assert!(cfg.apply("timer.warning_threshold_secs", "80").is_err());
        // Shrinking the duration below the threshold is rejected as well.
        assert!(cfg.apply("timer.question_secs", "10").is_err());
        assert_eq!(cfg.timer.question_secs, 50);

        cfg.apply("timer.warning_threshold_secs", "49").unwrap();
        assert_eq!(cfg.settings().warning_threshold_secs, 49);
    }

    #[test]
    fn load_from_rejects_threshold_outside_duration() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\nquestion_secs = 5\nwarning_threshold_secs = 10\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn apply_clears_questions_path_after_it_was_set() {
        let mut cfg = Config::default();
        cfg.apply("questions_path", "/tmp/questions.json").unwrap();
        cfg.apply("questions_path", "").unwrap();
        assert_eq!(cfg.questions_path, None);
        assert_eq!(cfg.get("questions_path").as_deref(), Some("null"));
    }

    #[test]
    fn apply_sets_optional_questions_path() {
        let mut cfg = Config::default();
        cfg.apply("questions_path", "/tmp/questions.json").unwrap();
        assert_eq!(cfg.questions_path.as_deref(), Some("/tmp/questions.json"));
        cfg.apply("questions_path", "").unwrap();
        assert!(cfg.questions_path.is_none());
    }

    #[test]
    fn settings_follow_config() {
        let mut cfg = Config::default();
        cfg.apply("scoring.pass_threshold", "5").unwrap();
        cfg.apply("timer.question_secs", "20").unwrap();
        let settings = cfg.settings();
        assert_eq!(settings.pass_threshold, 5);
        assert_eq!(settings.question_secs, 20);
        assert_eq!(settings.warning_threshold_secs, 10);
        assert_eq!(settings.feedback_clear_ms, 500);
    }

    #[test]
    fn load_from_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let first = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(first.timer.question_secs, 50);

        let mut changed = first.clone();
        changed.apply("timer.question_secs", "15").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().timer.question_secs, 15);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timer = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
