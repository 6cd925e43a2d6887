pub mod config;
pub mod play;
pub mod progress;
pub mod questions;

use std::path::Path;

use quizdeck_core::{Config, CoreError, QuestionBank};

/// Question set for this run: explicit file, then `questions_path` from
/// config, then the built-in bank.
pub fn load_bank(config: &Config, explicit: Option<&Path>) -> Result<QuestionBank, CoreError> {
    let configured = config
        .questions_path
        .as_deref()
        .filter(|path| !path.trim().is_empty())
        .map(Path::new);
    match explicit.or(configured) {
        Some(path) => {
            tracing::debug!("Loading questions from {}", path.display());
            QuestionBank::load(path)
        }
        None => Ok(QuestionBank::builtin()),
    }
}
