use clap::Subcommand;
use quizdeck_core::storage::{PROGRESS_KEY, USER_EMAIL_KEY, USER_NAME_KEY};
use quizdeck_core::{KeyValueStore, QuizProgress, SqliteStore};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print the saved snapshot and last user details as JSON
    Show,
    /// Delete the saved snapshot
    Clear,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SqliteStore::open()?;

    match action {
        ProgressAction::Show => {
            let progress = match store.get(PROGRESS_KEY)? {
                Some(raw) => match serde_json::from_str::<QuizProgress>(&raw) {
                    Ok(progress) => Some(progress),
                    Err(e) => {
                        tracing::warn!("Saved progress is unreadable: {}", e);
                        None
                    }
                },
                None => None,
            };
            let output = serde_json::json!({
                "progress": progress,
                "userName": store.get(USER_NAME_KEY)?,
                "userEmail": store.get(USER_EMAIL_KEY)?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ProgressAction::Clear => {
            store.remove(PROGRESS_KEY)?;
            println!("saved progress cleared");
        }
    }
    Ok(())
}
