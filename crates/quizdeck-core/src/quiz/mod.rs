mod controller;
mod progress;
mod question;
mod report;
mod scoring;
mod state;
mod view;

pub use controller::{Feedback, QuizController};
pub use progress::{AnswerRecord, QuizProgress};
pub use question::{option_label, Question, QuestionBank, OPTION_COUNT};
pub use report::{QuizReport, ReviewItem, ReviewOption, ReviewStatus};
pub use scoring::{format_duration, ExitSummary, QuizSummary};
pub use state::{QuizSettings, QuizState, Screen};
pub use view::{OptionView, QuestionView, View};
