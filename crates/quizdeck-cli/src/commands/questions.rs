use std::path::PathBuf;

use clap::Subcommand;
use quizdeck_core::quiz::option_label;
use quizdeck_core::{Config, QuestionBank};

#[derive(Subcommand)]
pub enum QuestionsAction {
    /// List the active question set
    List {
        /// JSON question file, overriding `questions_path`
        #[arg(long)]
        questions: Option<PathBuf>,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a JSON question file without playing it
    Validate {
        /// Path to the question file
        path: PathBuf,
    },
}

pub fn run(action: QuestionsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        QuestionsAction::List { questions, json } => {
            let config = Config::load_or_default();
            let bank = super::load_bank(&config, questions.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bank)?);
            } else {
                print_bank(&bank);
            }
        }
        QuestionsAction::Validate { path } => {
            let bank = QuestionBank::load(&path)?;
            println!("ok: {} questions in {}", bank.len(), path.display());
        }
    }
    Ok(())
}

fn print_bank(bank: &QuestionBank) {
    for (index, question) in bank.iter().enumerate() {
        println!("{}. [id {}] {}", index + 1, question.id, question.text);
        for (option_index, option) in question.options.iter().enumerate() {
            let mark = if question.is_correct(option_index) { " *" } else { "" };
            println!("   {}. {}{}", option_label(option_index), option, mark);
        }
    }
}
