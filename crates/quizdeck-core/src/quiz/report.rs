//! Post-quiz review report.

use serde::{Deserialize, Serialize};

use super::progress::QuizProgress;
use super::question::{option_label, QuestionBank};
use super::scoring::QuizSummary;

/// How an option is marked in the review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// The correct option. Always marked.
    Correct,
    /// The user's selection, which was wrong.
    YourAnswer,
    /// A wrong option on a question the user left unanswered.
    Incorrect,
    Unmarked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOption {
    pub label: char,
    pub text: String,
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewItem {
    /// 1-based position in the quiz.
    pub number: usize,
    pub text: String,
    pub answered: bool,
    pub options: Vec<ReviewOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizReport {
    pub summary: QuizSummary,
    pub items: Vec<ReviewItem>,
}

impl QuizReport {
    /// One item per question in the bank, whether or not it was reached.
    pub fn build(bank: &QuestionBank, progress: &QuizProgress, summary: QuizSummary) -> Self {
        let items = bank
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = progress
                    .answer_for(question.id)
                    .and_then(|answer| answer.selected_index);
                let answered = selected.is_some();

                let options = question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(option_index, text)| {
                        let status = if question.is_correct(option_index) {
                            ReviewStatus::Correct
                        } else if selected == Some(option_index) {
                            ReviewStatus::YourAnswer
                        } else if !answered {
                            ReviewStatus::Incorrect
                        } else {
                            ReviewStatus::Unmarked
                        };
                        ReviewOption {
                            label: option_label(option_index),
                            text: text.clone(),
                            status,
                        }
                    })
                    .collect();

                ReviewItem {
                    number: index + 1,
                    text: question.text.clone(),
                    answered,
                    options,
                }
            })
            .collect();

        Self { summary, items }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::progress::AnswerRecord;
    use crate::quiz::question::Question;

    fn bank() -> QuestionBank {
        QuestionBank::new(
            (1..=3)
                .map(|id| Question {
                    id,
                    text: format!("Question {id}"),
                    options: ["w", "x", "y", "z"].map(str::to_string),
                    correct_answer_index: 1,
                })
                .collect(),
        )
        .unwrap()
    }

    fn statuses(item: &ReviewItem) -> Vec<ReviewStatus> {
        item.options.iter().map(|o| o.status).collect()
    }

    #[test]
    fn marks_each_option() {
        use ReviewStatus::*;

        let bank = bank();
        let mut progress = QuizProgress::default();
        progress.record(AnswerRecord::for_question(bank.get(0).unwrap(), Some(1)));
        progress.record(AnswerRecord::for_question(bank.get(1).unwrap(), Some(3)));
        progress.record(AnswerRecord::for_question(bank.get(2).unwrap(), None));
        progress.current_index = 3;

        let summary = QuizSummary::compute(&progress, bank.len(), 8);
        let report = QuizReport::build(&bank, &progress, summary);

        assert_eq!(report.items.len(), 3);
        assert_eq!(statuses(&report.items[0]), vec![Unmarked, Correct, Unmarked, Unmarked]);
        assert_eq!(statuses(&report.items[1]), vec![Unmarked, Correct, Unmarked, YourAnswer]);
        assert_eq!(statuses(&report.items[2]), vec![Incorrect, Correct, Incorrect, Incorrect]);
        assert!(!report.items[2].answered);
        assert_eq!(report.items[2].number, 3);
        assert_eq!(report.items[0].options[2].label, 'C');
    }
}
