//! Question records and the ordered bank they are presented from.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, ValidationError};

/// Every question offers exactly this many options, labeled A-D.
pub const OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(alias = "question")]
    pub text: String,
    pub options: [String; OPTION_COUNT],
    #[serde(alias = "correctAnswer")]
    pub correct_answer_index: usize,
}

impl Question {
    pub fn is_correct(&self, option_index: usize) -> bool {
        option_index == self.correct_answer_index
    }
}

/// Letter shown next to an option: 0 -> 'A', 3 -> 'D'.
pub fn option_label(option_index: usize) -> char {
    (b'A' + option_index as u8) as char
}

/// Ordered, validated question set. Insertion order is presentation order.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, rejecting empty sets, duplicate ids and out-of-range
    /// correct indexes.
    pub fn new(questions: Vec<Question>) -> Result<Self, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::EmptyCollection("questions".into()));
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(ValidationError::DuplicateId(question.id));
            }
            if question.correct_answer_index >= OPTION_COUNT {
                return Err(ValidationError::OutOfBounds {
                    collection: format!("options of question {}", question.id),
                    index: question.correct_answer_index,
                    len: OPTION_COUNT,
                });
            }
        }

        Ok(Self { questions })
    }

    /// Parse a JSON array of questions.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Ok(Self::new(questions)?)
    }

    /// Load a JSON question file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    /// The fifteen questions shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            questions: builtin_questions(),
        }
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

fn q(id: u32, text: &str, options: [&str; OPTION_COUNT], correct: usize) -> Question {
    Question {
        id,
        text: text.to_string(),
        options: options.map(str::to_string),
        correct_answer_index: correct,
    }
}

fn builtin_questions() -> Vec<Question> {
    vec![
        q(1, "What does HTML stand for?",
            ["Hyper Text Markup Language", "High Tech Modern Language", "Hyperlink and Text Management Language", "Home Tool Markup Language"], 0),
        q(2, "Which HTTP status code means \"Not Found\"?",
            ["200", "301", "404", "500"], 2),
        q(3, "Which data structure follows first-in, first-out order?",
            ["Stack", "Queue", "Tree", "Graph"], 1),
        q(4, "What is the time complexity of binary search on a sorted array?",
            ["O(n)", "O(n log n)", "O(1)", "O(log n)"], 3),
        q(5, "Which protocol is used to send email?",
            ["FTP", "SMTP", "SSH", "DNS"], 1),
        q(6, "In Git, which command creates a new commit from staged changes?",
            ["git push", "git add", "git commit", "git merge"], 2),
        q(7, "What does CSS primarily control?",
            ["Page presentation", "Server routing", "Database queries", "Network packets"], 0),
        q(8, "Which of these is not a programming language?",
            ["Rust", "Python", "HTTP", "Go"], 2),
        q(9, "How many bits are in a byte?",
            ["4", "8", "16", "32"], 1),
        q(10, "Which port does HTTPS use by default?",
            ["21", "80", "8080", "443"], 3),
        q(11, "What does SQL stand for?",
            ["Structured Query Language", "Simple Question Language", "Sequential Query Logic", "Server Query Layer"], 0),
        q(12, "Which number system uses only 0 and 1?",
            ["Decimal", "Hexadecimal", "Binary", "Octal"], 2),
        q(13, "What does JSON stand for?",
            ["Java Standard Object Notation", "JavaScript Object Notation", "Joined Serial Object Network", "JavaScript Ordered Nodes"], 1),
        q(14, "Which component executes program instructions?",
            ["RAM", "SSD", "GPU fan", "CPU"], 3),
        q(15, "Which tag creates a hyperlink in HTML?",
            ["<a>", "<link>", "<href>", "<p>"], 0),
    ]
}
