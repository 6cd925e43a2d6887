//! Mutable attempt state and its persisted snapshot form.

use serde::{Deserialize, Serialize};

use super::question::{Question, QuestionBank};

/// Finalized outcome for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: u32,
    /// `None` when the question was left unanswered.
    pub selected_index: Option<usize>,
    pub is_correct: bool,
}

impl AnswerRecord {
    pub fn for_question(question: &Question, selected_index: Option<usize>) -> Self {
        Self {
            question_id: question.id,
            selected_index,
            is_correct: selected_index.is_some_and(|i| question.is_correct(i)),
        }
    }

    pub fn is_answered(&self) -> bool {
        self.selected_index.is_some()
    }
}

/// Full state of one attempt. Serialized as-is under the `quizProgress` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub current_index: usize,
    pub score: usize,
    pub answers: Vec<AnswerRecord>,
    pub total_elapsed_seconds: u64,
    pub per_question_seconds: Vec<u64>,
    pub user_name: String,
    pub user_email: String,
}

impl QuizProgress {
    pub fn new(user_name: impl Into<String>, user_email: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            user_email: user_email.into(),
            ..Self::default()
        }
    }

    /// Append a finalized answer, keeping `score` in step.
    pub fn record(&mut self, answer: AnswerRecord) {
        if answer.is_correct {
            self.score += 1;
        }
        self.answers.push(answer);
    }

    /// Add one question's elapsed seconds.
    pub fn add_elapsed(&mut self, secs: u64) {
        self.per_question_seconds.push(secs);
        self.total_elapsed_seconds += secs;
    }

    pub fn answer_for(&self, question_id: u32) -> Option<&AnswerRecord> {
        self.answers.iter().find(|a| a.question_id == question_id)
    }

    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct).count()
    }

    /// Whether a snapshot can be resumed against `bank`: the next question
    /// exists, one answer per finalized question, and the score agrees.
    pub fn is_resumable(&self, bank: &QuestionBank) -> bool {
        self.current_index < bank.len()
            && self.answers.len() == self.current_index
            && self.score == self.correct_count()
            && self
                .answers
                .iter()
                .zip(bank.iter())
                .all(|(answer, question)| answer.question_id == question.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, correct: usize) -> Question {
        Question {
            id,
            text: format!("Question {id}"),
            options: ["a", "b", "c", "d"].map(str::to_string),
            correct_answer_index: correct,
        }
    }

    #[test]
    fn unanswered_is_never_correct() {
        let record = AnswerRecord::for_question(&question(1, 0), None);
        assert!(!record.is_correct);
        assert!(!record.is_answered());
    }

    #[test]
    fn record_keeps_score_in_step() {
        let mut progress = QuizProgress::new("Ada", "ada@example.com");
        progress.record(AnswerRecord::for_question(&question(1, 2), Some(2)));
        progress.record(AnswerRecord::for_question(&question(2, 2), Some(1)));
        progress.record(AnswerRecord::for_question(&question(3, 2), None));
        assert_eq!(progress.score, 1);
        assert_eq!(progress.score, progress.correct_count());
        assert_eq!(progress.answers.len(), 3);
    }

    #[test]
    fn snapshot_uses_camel_case_keys() {
        let mut progress = QuizProgress::new("Ada", "ada@example.com");
        progress.record(AnswerRecord::for_question(&question(1, 0), Some(0)));
        progress.current_index = 1;
        progress.add_elapsed(12);

        let json: serde_json::Value = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["currentIndex"], 1);
        assert_eq!(json["totalElapsedSeconds"], 12);
        assert_eq!(json["perQuestionSeconds"][0], 12);
        assert_eq!(json["userName"], "Ada");
        assert_eq!(json["answers"][0]["questionId"], 1);
        assert_eq!(json["answers"][0]["selectedIndex"], 0);
        assert_eq!(json["answers"][0]["isCorrect"], true);
    }

    #[test]
    fn resumable_requires_consistent_snapshot() {
        let bank = QuestionBank::new(vec![question(1, 0), question(2, 1)]).unwrap();
        let mut progress = QuizProgress::new("Ada", "ada@example.com");
        assert!(progress.is_resumable(&bank));

        progress.record(AnswerRecord::for_question(bank.get(0).unwrap(), Some(0)));
        assert!(!progress.is_resumable(&bank), "index lags answers");

        progress.current_index = 1;
        assert!(progress.is_resumable(&bank));

        progress.score = 0;
        assert!(!progress.is_resumable(&bank), "score disagrees");

        progress.score = 1;
        progress.current_index = 2;
        assert!(!progress.is_resumable(&bank), "nothing left to resume");
    }
}
