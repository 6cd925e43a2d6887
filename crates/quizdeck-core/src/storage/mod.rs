mod config;
pub mod database;
mod memory;

pub use config::{Config, FeedbackConfig, ScoringConfig, TimerConfig};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Snapshot of an in-flight quiz, JSON-encoded `QuizProgress`.
pub const PROGRESS_KEY: &str = "quizProgress";
/// Name entered on the start screen, written once per quiz.
pub const USER_NAME_KEY: &str = "quizUserName";
/// Email entered on the start screen, written once per quiz.
pub const USER_EMAIL_KEY: &str = "quizUserEmail";

/// Opaque key-value capability used for progress snapshots.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `QUIZDECK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/quizdeck[-dev]/`, with `QUIZDECK_ENV=dev` selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var_os("QUIZDECK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("QUIZDECK_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("quizdeck-dev")
            } else {
                base_dir.join("quizdeck")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
